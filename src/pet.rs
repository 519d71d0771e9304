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

//! Pets and their order-related state.
//!
//! A pet's `status` and `order_id` are only changed by the order workflow:
//!
//! ```text
//!  Available ──place pet order──► Pending ──status "sold"──► Sold
//!      ▲                            │  ▲                      │
//!      │                            │  └───status "pending"───┘
//!      └────status "available"──────┴──── (from any state; order deleted)
//! ```

use crate::base::{OrderId, PetId};
use crate::validation::{FieldKind, FieldRule, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PetKind {
    Dog,
    Cat,
    Bird,
    Rabbit,
}

impl PetKind {
    pub const NAMES: &'static [&'static str] = &["dog", "cat", "bird", "rabbit"];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    /// Accepted wire values, in the order they are listed in error messages.
    pub const NAMES: &'static [&'static str] = &["available", "sold", "pending"];

    pub fn as_str(self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PetKind,
    #[serde(default)]
    pub status: PetStatus,
    /// Active order; `None` is written as `0` on the wire.
    #[serde(default, with = "order_ref")]
    pub order_id: Option<OrderId>,
}

impl Pet {
    pub fn is_available(&self) -> bool {
        self.status == PetStatus::Available
    }
}

/// Body of a create-pet request.
///
/// New pets never start with an order; `order_id` in the payload is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NewPet {
    pub id: Option<PetId>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PetKind,
    pub status: Option<PetStatus>,
}

impl NewPet {
    pub const SCHEMA: Schema = Schema::new(&[
        FieldRule::optional("id", FieldKind::PositiveInteger),
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("type", FieldKind::OneOf(PetKind::NAMES)),
        FieldRule::optional("status", FieldKind::OneOf(PetStatus::NAMES)),
    ]);

    pub(crate) fn into_pet(self, id: PetId) -> Pet {
        Pet {
            id,
            name: self.name,
            kind: self.kind,
            status: self.status.unwrap_or_default(),
            order_id: None,
        }
    }
}

/// `order_id` uses `0` for "no active order".
mod order_ref {
    use crate::base::OrderId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<OrderId>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(id.map_or(0, |id| id.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<OrderId>, D::Error> {
        let raw = Option::<u32>::deserialize(d)?;
        Ok(raw.filter(|&id| id != 0).map(OrderId))
    }
}
