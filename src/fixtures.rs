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

//! JSON fixture loading.
//!
//! A data directory holds one JSON array per collection:
//!
//! | File | Collection |
//! |------|------------|
//! | `pet.json` | pets |
//! | `inventory.json` | inventory |
//! | `customers.json` | customers |
//! | `vet.json` | vets |
//! | `vendors.json` | vendors |
//! | `trainers.json` | trainers |
//! | `events.json` | events |
//!
//! The files are independent, so each one is read on its own thread.

use crate::error::LoadError;
use crate::inventory::InventoryRecord;
use crate::pet::Pet;
use crate::records::{Customer, Event, Record, Trainer, Vendor, Vet};
use crossbeam::thread::ScopedJoinHandle;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub const PETS_FILE: &str = "pet.json";
pub const INVENTORY_FILE: &str = "inventory.json";

/// Raw collections read from a data directory.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub pets: Vec<Pet>,
    pub inventory: Vec<InventoryRecord>,
    pub customers: Vec<Customer>,
    pub vets: Vec<Vet>,
    pub vendors: Vec<Vendor>,
    pub trainers: Vec<Trainer>,
    pub events: Vec<Event>,
}

impl Fixtures {
    /// Reads every fixture file in `dir` in parallel.
    ///
    /// # Errors
    ///
    /// Fails on the first file that is missing, unreadable or not a JSON
    /// array of the expected records.
    pub fn load_dir(dir: &Path) -> Result<Self, LoadError> {
        crossbeam::thread::scope(|scope| -> Result<Fixtures, LoadError> {
            let pets = scope.spawn(|_| read_collection::<Pet>(dir, PETS_FILE));
            let inventory = scope.spawn(|_| read_collection::<InventoryRecord>(dir, INVENTORY_FILE));
            let customers = scope.spawn(|_| read_collection::<Customer>(dir, Customer::FIXTURE));
            let vets = scope.spawn(|_| read_collection::<Vet>(dir, Vet::FIXTURE));
            let vendors = scope.spawn(|_| read_collection::<Vendor>(dir, Vendor::FIXTURE));
            let trainers = scope.spawn(|_| read_collection::<Trainer>(dir, Trainer::FIXTURE));
            let events = scope.spawn(|_| read_collection::<Event>(dir, Event::FIXTURE));

            Ok(Fixtures {
                pets: join(pets)?,
                inventory: join(inventory)?,
                customers: join(customers)?,
                vets: join(vets)?,
                vendors: join(vendors)?,
                trainers: join(trainers)?,
                events: join(events)?,
            })
        })
        .map_err(|_| LoadError::WorkerPanicked)?
    }
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T, LoadError>>) -> Result<T, LoadError> {
    handle.join().map_err(|_| LoadError::WorkerPanicked)?
}

fn read_collection<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, LoadError> {
    let path = dir.join(file);
    let reader = File::open(&path).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;
    let rows: Vec<T> = serde_json::from_reader(BufReader::new(reader))
        .map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;
    debug!(path = %path.display(), rows = rows.len(), "loaded fixture");
    Ok(rows)
}
