// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Inventory records.

use crate::StoreError;
use crate::base::{InventoryId, PetId};
use crate::validation::{FieldKind, FieldRule, Schema};
use serde::{Deserialize, Serialize};

/// Stock level for an item, optionally tied to a pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventoryRecord {
    pub id: InventoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<PetId>,
    /// Quantity on hand.
    #[serde(default)]
    pub inventory: u32,
}

impl InventoryRecord {
    /// The record created for a freshly added pet.
    pub fn for_pet(id: InventoryId, pet_id: PetId) -> Self {
        Self {
            id,
            pet_id: Some(pet_id),
            inventory: 1,
        }
    }

    /// Fails with [`StoreError::InsufficientStock`] unless `amount` units are on hand.
    pub fn ensure_available(&self, amount: u32) -> Result<(), StoreError> {
        if self.inventory < amount {
            return Err(StoreError::InsufficientStock {
                inventory_id: self.id,
                available: self.inventory,
                requested: amount,
            });
        }
        Ok(())
    }

    /// Removes `amount` units. The stock is untouched on error.
    pub fn withdraw(&mut self, amount: u32) -> Result<(), StoreError> {
        self.ensure_available(amount)?;
        self.inventory -= amount;
        Ok(())
    }
}

/// Body of a create-inventory request.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewInventory {
    pub id: Option<InventoryId>,
    pub inventory: u32,
    pub pet_id: Option<PetId>,
}

impl NewInventory {
    pub const SCHEMA: Schema = Schema::new(&[
        FieldRule::optional("id", FieldKind::PositiveInteger),
        FieldRule::required("inventory", FieldKind::NonNegativeInteger),
        FieldRule::optional("pet_id", FieldKind::PositiveInteger),
    ]);

    pub(crate) fn into_record(self, id: InventoryId) -> InventoryRecord {
        InventoryRecord {
            id,
            pet_id: self.pet_id,
            inventory: self.inventory,
        }
    }
}
