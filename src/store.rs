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

//! The entity store.
//!
//! The [`Store`] owns every collection and exposes the operations that
//! touch them:
//!
//! - **Create pet**: stores the pet, then makes sure exactly one inventory
//!   record with `inventory = 1` exists for it.
//! - **Stock order**: checks the referenced inventory record has enough
//!   stock, decrements it and records the order.
//! - **Pet order**: reserves an available pet (status `pending`) and links
//!   it to the new order.
//! - **Status update**: copies the new status onto the order's pet. Setting
//!   `available` cancels the order: it is deleted and the pet unlinked.
//!
//! # Thread Safety
//!
//! Pets, inventory and orders share a single [`Mutex`] so that every
//! multi-collection operation runs as one critical section. The side
//! collections never take part in those operations and live in
//! independent [`Directory`] values.

use crate::base::{InventoryId, OrderId, PetId, next_free_id};
use crate::directory::Directory;
use crate::error::LoadError;
use crate::fixtures::Fixtures;
use crate::inventory::{InventoryRecord, NewInventory};
use crate::order::{Order, OrderDetail, PetOrderRequest, StatusUpdate, StockOrderRequest};
use crate::pet::{NewPet, Pet, PetStatus};
use crate::records::{Customer, Event, Trainer, Vendor, Vet};
use crate::validation::Payload;
use crate::StoreError;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::debug;

/// Collections that take part in cross-collection rules.
#[derive(Debug, Default)]
struct Catalog {
    pets: BTreeMap<PetId, Pet>,
    inventory: BTreeMap<InventoryId, InventoryRecord>,
    orders: BTreeMap<OrderId, Order>,
}

impl Catalog {
    fn next_order_id(&self) -> OrderId {
        OrderId(next_free_id(self.orders.keys().map(|id| id.0)))
    }

    /// Returns the inventory record for `pet_id`, creating it if missing.
    fn ensure_inventory_for_pet(&mut self, pet_id: PetId) -> InventoryRecord {
        if let Some(existing) = self
            .inventory
            .values()
            .find(|record| record.pet_id == Some(pet_id))
        {
            return existing.clone();
        }

        let id = InventoryId(next_free_id(self.inventory.keys().map(|id| id.0)));
        let record = InventoryRecord::for_pet(id, pet_id);
        self.inventory.insert(id, record.clone());
        debug!(%pet_id, inventory_id = %id, "created inventory record for pet");
        record
    }

    /// The pet whose status follows `order`.
    ///
    /// Stock orders reach their pet through the inventory record they drew from.
    fn pet_for_order(&self, order: &Order) -> Result<PetId, StoreError> {
        match order.detail {
            OrderDetail::Reservation { pet_id } => Ok(pet_id),
            OrderDetail::Stock { inventory_id, .. } => self
                .inventory
                .get(&inventory_id)
                .and_then(|record| record.pet_id)
                .ok_or_else(|| StoreError::not_found("pet for order", order.id)),
        }
    }
}

/// Outcome of [`Store::update_order_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub order_id: OrderId,
    pub pet_id: PetId,
    pub status: PetStatus,
    /// The order was cancelled and no longer exists.
    pub cancelled: bool,
}

/// In-memory pet store.
///
/// # Invariants
///
/// - Ids are unique and positive within each collection; stock and
///   reservation orders share one id space.
/// - Inventory quantities never go negative.
/// - A failed operation leaves every collection unchanged.
/// - Cancelling an order (status `available`) deletes it and resets the
///   pet's `order_id`.
#[derive(Debug, Default)]
pub struct Store {
    catalog: Mutex<Catalog>,
    customers: Directory<Customer>,
    vets: Directory<Vet>,
    vendors: Directory<Vendor>,
    trainers: Directory<Trainer>,
    events: Directory<Event>,
}

impl Store {
    /// Creates a store with every collection empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from fixture data.
    ///
    /// Orders are not stored in fixtures: a reservation order is derived
    /// from every pet whose `order_id` is set, carrying that pet's status.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateId`] if ids collide within a collection
    /// or two pets claim the same order.
    pub fn from_fixtures(fixtures: Fixtures) -> Result<Self, LoadError> {
        let mut catalog = Catalog::default();

        for pet in fixtures.pets {
            if let Some(order_id) = pet.order_id {
                let order = Order::reservation(order_id, pet.id, pet.status);
                if catalog.orders.insert(order_id, order).is_some() {
                    return Err(LoadError::DuplicateId {
                        collection: "order",
                        id: order_id.0,
                    });
                }
            }
            let id = pet.id;
            if catalog.pets.insert(id, pet).is_some() {
                return Err(LoadError::DuplicateId {
                    collection: "pet",
                    id: id.0,
                });
            }
        }

        for record in fixtures.inventory {
            let id = record.id;
            if catalog.inventory.insert(id, record).is_some() {
                return Err(LoadError::DuplicateId {
                    collection: "inventory",
                    id: id.0,
                });
            }
        }

        debug!(
            pets = catalog.pets.len(),
            inventory = catalog.inventory.len(),
            orders = catalog.orders.len(),
            "seeded store"
        );

        Ok(Self {
            catalog: Mutex::new(catalog),
            customers: Directory::from_records(fixtures.customers)?,
            vets: Directory::from_records(fixtures.vets)?,
            vendors: Directory::from_records(fixtures.vendors)?,
            trainers: Directory::from_records(fixtures.trainers)?,
            events: Directory::from_records(fixtures.events)?,
        })
    }

    // === Pets ===

    /// Creates a pet and its inventory record.
    ///
    /// `status` defaults to `available`. A client-supplied `id` is kept;
    /// otherwise the smallest free id is assigned.
    ///
    /// # Errors
    ///
    /// - Validation errors for `name`, `type`, `status` or `id`.
    /// - [`StoreError::Conflict`] - The supplied `id` is already taken.
    pub fn create_pet(&self, payload: &Payload) -> Result<Pet, StoreError> {
        let request: NewPet = NewPet::SCHEMA.parse(payload)?;
        let mut catalog = self.catalog.lock();

        let id = match request.id {
            Some(id) if catalog.pets.contains_key(&id) => {
                return Err(StoreError::Conflict {
                    entity: "pet",
                    id: id.0,
                });
            }
            Some(id) => id,
            None => PetId(next_free_id(catalog.pets.keys().map(|id| id.0))),
        };

        let pet = request.into_pet(id);
        catalog.pets.insert(id, pet.clone());
        catalog.ensure_inventory_for_pet(id);
        debug!(pet_id = %id, name = %pet.name, "created pet");
        Ok(pet)
    }

    /// Ensures an inventory record exists for `pet_id`.
    ///
    /// Creates `{pet_id, inventory: 1}` under a fresh id when none exists
    /// and returns the existing record otherwise, so repeated calls are
    /// no-ops.
    pub fn ensure_inventory_for_pet(&self, pet_id: PetId) -> InventoryRecord {
        self.catalog.lock().ensure_inventory_for_pet(pet_id)
    }

    pub fn pet(&self, id: PetId) -> Result<Pet, StoreError> {
        self.catalog
            .lock()
            .pets
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("pet", id))
    }

    /// Returns the lowest-id pet called `name`.
    pub fn pet_by_name(&self, name: &str) -> Result<Pet, StoreError> {
        self.catalog
            .lock()
            .pets
            .values()
            .find(|pet| pet.name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "pet",
                id: format!("name {name}"),
            })
    }

    /// Returns every pet, ordered by id.
    pub fn pets(&self) -> Vec<Pet> {
        self.catalog.lock().pets.values().cloned().collect()
    }

    // === Inventory ===

    /// Creates an inventory record.
    ///
    /// Unlike pet creation this does not check whether `pet_id` already has
    /// a record.
    ///
    /// # Errors
    ///
    /// - Validation errors for `inventory`, `pet_id` or `id`.
    /// - [`StoreError::Conflict`] - The supplied `id` is already taken.
    pub fn create_inventory(&self, payload: &Payload) -> Result<InventoryRecord, StoreError> {
        let request: NewInventory = NewInventory::SCHEMA.parse(payload)?;
        let mut catalog = self.catalog.lock();

        let id = match request.id {
            Some(id) if catalog.inventory.contains_key(&id) => {
                return Err(StoreError::Conflict {
                    entity: "inventory",
                    id: id.0,
                });
            }
            Some(id) => id,
            None => InventoryId(next_free_id(catalog.inventory.keys().map(|id| id.0))),
        };

        let record = request.into_record(id);
        catalog.inventory.insert(id, record.clone());
        Ok(record)
    }

    pub fn inventory_record(&self, id: InventoryId) -> Result<InventoryRecord, StoreError> {
        self.catalog
            .lock()
            .inventory
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("inventory item", id))
    }

    /// Returns every inventory record, ordered by id.
    pub fn inventory(&self) -> Vec<InventoryRecord> {
        self.catalog.lock().inventory.values().cloned().collect()
    }

    // === Orders ===

    /// Places a stock order against an inventory record.
    ///
    /// # Errors
    ///
    /// - Validation errors for `inven_id`, `amount_purchase` or `status`.
    /// - [`StoreError::NotFound`] - No inventory record has id `inven_id`.
    /// - [`StoreError::InsufficientStock`] - `amount_purchase` exceeds the stock.
    pub fn place_stock_order(&self, payload: &Payload) -> Result<Order, StoreError> {
        let request: StockOrderRequest = StockOrderRequest::SCHEMA.parse(payload)?;
        let mut guard = self.catalog.lock();
        let catalog = &mut *guard;

        let record = catalog
            .inventory
            .get_mut(&request.inventory_id)
            .ok_or_else(|| StoreError::not_found("inventory item", request.inventory_id))?;
        record.withdraw(request.amount_purchase)?;
        let remaining = record.inventory;

        let order = Order {
            id: catalog.next_order_id(),
            detail: OrderDetail::Stock {
                inventory_id: request.inventory_id,
                amount_purchase: request.amount_purchase,
            },
            status: request.status,
        };
        catalog.orders.insert(order.id, order);

        debug!(
            order_id = %order.id,
            inventory_id = %request.inventory_id,
            amount = request.amount_purchase,
            remaining,
            "placed stock order"
        );
        Ok(order)
    }

    /// Reserves the pet whose id is `inven_id`.
    ///
    /// The pet moves to `pending` and is linked to the new order.
    ///
    /// # Errors
    ///
    /// - Validation errors for `inven_id`.
    /// - [`StoreError::NotFound`] - No pet has that id.
    /// - [`StoreError::InvalidState`] - The pet is not `available`.
    pub fn place_pet_order(&self, payload: &Payload) -> Result<Order, StoreError> {
        let PetOrderRequest { pet_id } = PetOrderRequest::SCHEMA.parse(payload)?;
        let mut guard = self.catalog.lock();
        let Catalog { pets, orders, .. } = &mut *guard;

        let pet = pets
            .get_mut(&pet_id)
            .ok_or_else(|| StoreError::not_found("pet", pet_id))?;
        if !pet.is_available() {
            return Err(StoreError::InvalidState {
                entity: "pet",
                id: pet_id.0,
                reason: "is not available for order",
            });
        }

        let order_id = OrderId(next_free_id(orders.keys().map(|id| id.0)));
        let order = Order::reservation(order_id, pet_id, PetStatus::Pending);
        pet.status = PetStatus::Pending;
        pet.order_id = Some(order_id);
        orders.insert(order_id, order);

        debug!(%order_id, %pet_id, "reserved pet");
        Ok(order)
    }

    /// Sets the status of an order's pet.
    ///
    /// `order_id` is the raw path segment; anything that is not an integer
    /// is reported as not found. Setting `available` cancels the order: it is
    /// deleted and the pet's `order_id` is reset. A pet still reserved by a
    /// different order is left untouched by the cancellation. Any other
    /// status is also recorded on the order.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] - Unknown or malformed order id, or the
    ///   order's pet does not exist.
    /// - [`StoreError::MissingField`] - No `status` in the payload.
    /// - [`StoreError::InvalidEnum`] - `status` is not a pet status.
    pub fn update_order_status(
        &self,
        order_id: &str,
        payload: &Payload,
    ) -> Result<StatusChange, StoreError> {
        let id = order_id
            .trim()
            .parse::<u32>()
            .map(OrderId)
            .map_err(|_| StoreError::not_found("order", order_id))?;

        let mut guard = self.catalog.lock();
        let order = *guard
            .orders
            .get(&id)
            .ok_or_else(|| StoreError::not_found("order", id))?;
        let StatusUpdate { status } = StatusUpdate::SCHEMA.parse(payload)?;
        let pet_id = guard.pet_for_order(&order)?;

        let Catalog { pets, orders, .. } = &mut *guard;
        let pet = pets
            .get_mut(&pet_id)
            .ok_or_else(|| StoreError::not_found("pet", pet_id))?;

        let cancelled = status == PetStatus::Available;
        // The reservation that holds the pet outlives any other order on it.
        let held_elsewhere = pet.order_id.is_some_and(|linked| linked != id);
        if !(cancelled && held_elsewhere) {
            pet.status = status;
        }

        if cancelled {
            if pet.order_id == Some(id) {
                pet.order_id = None;
            }
            orders.remove(&id);
            debug!(order_id = %id, %pet_id, "cancelled order");
        } else if let Some(order) = orders.get_mut(&id) {
            order.status = Some(status);
            debug!(order_id = %id, %pet_id, %status, "updated order status");
        }

        Ok(StatusChange {
            order_id: id,
            pet_id,
            status,
            cancelled,
        })
    }

    pub fn order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.catalog
            .lock()
            .orders
            .get(&id)
            .copied()
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    /// Returns every order, ordered by id.
    pub fn orders(&self) -> Vec<Order> {
        self.catalog.lock().orders.values().copied().collect()
    }

    // === Side collections ===

    pub fn customers(&self) -> &Directory<Customer> {
        &self.customers
    }

    pub fn vets(&self) -> &Directory<Vet> {
        &self.vets
    }

    pub fn vendors(&self) -> &Directory<Vendor> {
        &self.vendors
    }

    pub fn trainers(&self) -> &Directory<Trainer> {
        &self.trainers
    }

    pub fn events(&self) -> &Directory<Event> {
        &self.events
    }
}
