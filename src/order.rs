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

//! Orders.
//!
//! Two flavors share one table and one id space:
//! - **Stock** orders buy `amount_purchase` units from an inventory record.
//! - **Reservation** orders hold a single pet by moving it to `pending`.
//!
//! Clients send the target as `inven_id` for both flavors. Stored orders
//! carry an explicit `kind` and a correctly named reference instead.

use crate::base::{InventoryId, OrderId, PetId};
use crate::pet::PetStatus;
use crate::validation::{FieldKind, FieldRule, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OrderDetail {
    Stock {
        inventory_id: InventoryId,
        amount_purchase: u32,
    },
    Reservation {
        pet_id: PetId,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    #[serde(flatten)]
    pub detail: OrderDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl Order {
    pub fn reservation(id: OrderId, pet_id: PetId, status: PetStatus) -> Self {
        Self {
            id,
            detail: OrderDetail::Reservation { pet_id },
            status: Some(status),
        }
    }

    /// Pet reserved by this order, if it is a reservation.
    pub fn reserved_pet(&self) -> Option<PetId> {
        match self.detail {
            OrderDetail::Reservation { pet_id } => Some(pet_id),
            OrderDetail::Stock { .. } => None,
        }
    }
}

/// Body of a stock order: buy `amount_purchase` units of inventory record `inven_id`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct StockOrderRequest {
    #[serde(rename = "inven_id")]
    pub inventory_id: InventoryId,
    pub amount_purchase: u32,
    pub status: Option<PetStatus>,
}

impl StockOrderRequest {
    // Presence and type of both fields are checked before either range.
    pub const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("inven_id", FieldKind::Integer),
        FieldRule::required("amount_purchase", FieldKind::Integer),
        FieldRule::required("amount_purchase", FieldKind::PositiveInteger),
        FieldRule::required("inven_id", FieldKind::PositiveInteger),
        FieldRule::optional("status", FieldKind::OneOf(PetStatus::NAMES)),
    ]);
}

/// Body of a reservation order: reserve the pet whose id is `inven_id`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PetOrderRequest {
    #[serde(rename = "inven_id")]
    pub pet_id: PetId,
}

impl PetOrderRequest {
    pub const SCHEMA: Schema = Schema::new(&[FieldRule::required(
        "inven_id",
        FieldKind::PositiveInteger,
    )]);
}

/// Body of an order status update.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: PetStatus,
}

impl StatusUpdate {
    pub const SCHEMA: Schema = Schema::new(&[FieldRule::required(
        "status",
        FieldKind::OneOf(PetStatus::NAMES),
    )]);
}
