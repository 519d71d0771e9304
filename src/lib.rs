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

//! # Pet Store
//!
//! This library provides an in-memory pet store: pets, inventory, orders and
//! a handful of side collections, with the rules that keep pets, stock and
//! orders consistent with each other.
//!
//! ## Core Components
//!
//! - [`Store`]: Owns every collection and runs the order workflow
//! - [`Pet`], [`InventoryRecord`], [`Order`]: The records the workflow touches
//! - [`validation`]: Payload schemas checked before any mutation
//! - [`StoreError`]: Error types for rejected operations
//! - [`api`]: REST adapter over the store
//!
//! ## Example
//!
//! ```
//! use petstore_rs::Store;
//! use serde_json::json;
//!
//! let store = Store::new();
//!
//! // Creating a pet also creates its inventory record
//! let pet = store
//!     .create_pet(json!({"name": "Rex", "type": "dog"}).as_object().unwrap())
//!     .unwrap();
//! let record = store.ensure_inventory_for_pet(pet.id);
//! assert_eq!(record.inventory, 1);
//!
//! // Buying that unit empties the record
//! let order = json!({"inven_id": record.id, "amount_purchase": 1});
//! store.place_stock_order(order.as_object().unwrap()).unwrap();
//! assert_eq!(store.inventory_record(record.id).unwrap().inventory, 0);
//! ```
//!
//! ## Thread Safety
//!
//! The store can be shared across threads. Operations that touch pets,
//! inventory or orders are serialized on one lock; the side collections are
//! independent concurrent maps.

pub mod api;
mod base;
mod directory;
pub mod error;
mod fixtures;
mod inventory;
mod order;
mod pet;
pub mod records;
mod store;
pub mod validation;

pub use base::{InventoryId, OrderId, PetId, RecordId, next_free_id};
pub use directory::Directory;
pub use error::{ErrorKind, LoadError, StoreError};
pub use fixtures::Fixtures;
pub use inventory::{InventoryRecord, NewInventory};
pub use order::{Order, OrderDetail, PetOrderRequest, StatusUpdate, StockOrderRequest};
pub use pet::{NewPet, Pet, PetKind, PetStatus};
pub use records::{Customer, Event, Record, Trainer, Vendor, Vet};
pub use store::{StatusChange, Store};
