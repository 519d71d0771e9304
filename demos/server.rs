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

//! Pet store API server seeded with the shipped fixtures.
//!
//! Run with: `cargo run --example server`
//!
//! ## Example Usage
//!
//! ```bash
//! # List pets
//! curl http://localhost:5000/pets
//!
//! # Reserve pet 1
//! curl -X POST http://localhost:5000/store/order/pet \
//!   -H "Content-Type: application/json" \
//!   -d '{"inven_id": 1}'
//!
//! # Mark the reservation sold
//! curl -X PATCH http://localhost:5000/store/order/3 \
//!   -H "Content-Type: application/json" \
//!   -d '{"status": "sold"}'
//!
//! # Inventory levels
//! curl http://localhost:5000/inventory
//! ```

use petstore_rs::{Fixtures, Store, api};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let fixtures = Fixtures::load_dir(&data_dir).unwrap();
    let store = Arc::new(Store::from_fixtures(fixtures).unwrap());

    let listener = TcpListener::bind("127.0.0.1:5000").await.unwrap();
    println!("Pet store API running on http://127.0.0.1:5000");
    println!();
    println!("Endpoints:");
    println!("  GET       /pets, /pets/{{id|name}}");
    println!("  GET|POST  /inventory, /customer, /vet, /vendor, /event, /trainers");
    println!("  POST      /store/order, /store/order/pet");
    println!("  GET|PATCH /store/order/{{id}}");
    println!("  GET       /store/orders");

    api::serve(listener, store).await.unwrap();
}
