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

use clap::{Parser, Subcommand};
use csv::{ReaderBuilder, Trim, Writer};
use petstore_rs::validation::Payload;
use petstore_rs::{Fixtures, Store, StoreError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Pet Store - Serve the REST API or replay order batches
///
/// Loads the JSON fixtures from the data directory into memory, then either
/// serves them over HTTP or applies a CSV of order operations.
#[derive(Parser, Debug)]
#[command(name = "petstore")]
#[command(about = "An in-memory pet store with a REST API", long_about = None)]
struct Args {
    /// Directory holding pet.json, inventory.json and the other fixtures
    #[arg(long, env = "PETSTORE_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// Address to listen on
        #[arg(long, env = "PETSTORE_BIND", default_value = "127.0.0.1:5000")]
        bind: SocketAddr,
    },
    /// Replay a CSV of order operations and print the resulting inventory
    ///
    /// Expected format: op,inven_id,amount_purchase,order_id,status
    /// Example: petstore process orders.csv > inventory.csv
    Process {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let store = match load_store(&args.data_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error loading fixtures from '{}': {}", args.data_dir.display(), e);
            process::exit(1);
        }
    };

    match args.command {
        Command::Serve { bind } => {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("Error starting runtime: {}", e);
                    process::exit(1);
                }
            };
            if let Err(e) = runtime.block_on(serve(bind, store)) {
                eprintln!("Error serving on {}: {}", bind, e);
                process::exit(1);
            }
        }
        Command::Process { input } => {
            let file = match File::open(&input) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error opening file '{}': {}", input.display(), e);
                    process::exit(1);
                }
            };

            if let Err(e) = process_orders(&store, BufReader::new(file)) {
                eprintln!("Error processing orders: {}", e);
                process::exit(1);
            }

            if let Err(e) = write_inventory(&store, std::io::stdout()) {
                eprintln!("Error writing output: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Logs go to stderr so `process` output stays clean. Filter with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_store(data_dir: &Path) -> Result<Store, petstore_rs::LoadError> {
    let store = Store::from_fixtures(Fixtures::load_dir(data_dir)?)?;
    info!(
        data_dir = %data_dir.display(),
        pets = store.pets().len(),
        inventory = store.inventory().len(),
        orders = store.orders().len(),
        "loaded fixtures"
    );
    Ok(store)
}

async fn serve(bind: SocketAddr, store: Store) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(address = %listener.local_addr()?, "pet store API listening");
    petstore_rs::api::serve(listener, Arc::new(store)).await
}

/// Raw CSV record matching the input format.
///
/// Fields: `op, inven_id, amount_purchase, order_id, status`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    op: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    inven_id: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount_purchase: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    order_id: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    status: Option<String>,
}

#[derive(Debug)]
enum Operation {
    StockOrder(Payload),
    PetOrder(Payload),
    UpdateStatus { order_id: String, payload: Payload },
}

impl CsvRecord {
    /// Converts a CSV record into a store operation.
    ///
    /// Returns `None` for unknown operations or a status row without `order_id`.
    fn into_operation(self) -> Option<Operation> {
        let mut payload = Payload::new();
        if let Some(inven_id) = self.inven_id {
            payload.insert("inven_id".to_string(), inven_id.into());
        }
        if let Some(amount) = self.amount_purchase {
            payload.insert("amount_purchase".to_string(), amount.into());
        }
        if let Some(status) = self.status {
            payload.insert("status".to_string(), status.into());
        }

        match self.op.to_lowercase().as_str() {
            "stock" => Some(Operation::StockOrder(payload)),
            "pet" => Some(Operation::PetOrder(payload)),
            "status" => Some(Operation::UpdateStatus {
                order_id: self.order_id?,
                payload,
            }),
            _ => None,
        }
    }
}

impl Operation {
    fn apply(&self, store: &Store) -> Result<(), StoreError> {
        match self {
            Operation::StockOrder(payload) => store.place_stock_order(payload).map(drop),
            Operation::PetOrder(payload) => store.place_pet_order(payload).map(drop),
            Operation::UpdateStatus { order_id, payload } => {
                store.update_order_status(order_id, payload).map(drop)
            }
        }
    }
}

/// Counts of rows applied and skipped by [`process_orders`].
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    applied: usize,
    skipped: usize,
}

/// Applies order operations from a CSV reader, in file order.
///
/// Rows are streamed, so arbitrarily large files are fine. Malformed rows and
/// rejected operations are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `op, inven_id, amount_purchase, order_id, status`
/// - `op`: `stock` (stock order), `pet` (reserve a pet) or `status` (update an order)
/// - `inven_id`: inventory id for `stock`, pet id for `pet`
/// - `amount_purchase`: units to buy (`stock` only)
/// - `order_id`: order to update (`status` only)
/// - `status`: `available`, `pending` or `sold`
///
/// # Example
///
/// ```csv
/// op,inven_id,amount_purchase,order_id,status
/// stock,6,2,,
/// pet,1,,,
/// status,,,3,sold
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails.
fn process_orders<R: Read>(store: &Store, reader: R) -> Result<Summary, csv::Error> {
    let mut summary = Summary::default();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " stock "
        .flexible(true) // Allow trailing columns to be left out
        .has_headers(true)
        .from_reader(reader);

    for (index, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let row = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row, error = %e, "skipping malformed row");
                summary.skipped += 1;
                continue;
            }
        };

        let Some(operation) = record.into_operation() else {
            warn!(row, "skipping unknown operation");
            summary.skipped += 1;
            continue;
        };

        match operation.apply(store) {
            Ok(()) => summary.applied += 1,
            Err(e) => {
                warn!(row, code = e.kind().code(), error = %e, "skipping rejected operation");
                summary.skipped += 1;
            }
        }
    }

    info!(applied = summary.applied, skipped = summary.skipped, "processed orders");
    Ok(summary)
}

/// Output row for [`write_inventory`].
#[derive(Debug, Serialize)]
struct InventoryRow {
    id: u32,
    pet_id: Option<u32>,
    inventory: u32,
}

/// Write inventory state to a CSV writer
///
/// # CSV Format
///
/// Columns: `id, pet_id, inventory`
///
/// # Example
///
/// ```csv
/// id,pet_id,inventory
/// 1,1,1
/// 6,,38
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_inventory<W: Write>(store: &Store, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for record in store.inventory() {
        wtr.serialize(InventoryRow {
            id: record.id.0,
            pet_id: record.pet_id.map(|id| id.0),
            inventory: record.inventory,
        })?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use petstore_rs::{InventoryId, OrderId, PetId, PetStatus};
    use serde_json::json;
    use std::io::Cursor;

    fn seeded_store() -> Store {
        let store = Store::new();
        store
            .create_pet(json!({"name": "Rex", "type": "dog"}).as_object().unwrap())
            .unwrap();
        store
            .create_inventory(json!({"id": 6, "inventory": 10}).as_object().unwrap())
            .unwrap();
        store
    }

    #[test]
    fn parse_stock_order() {
        let store = seeded_store();
        let csv = "op,inven_id,amount_purchase,order_id,status\nstock,6,3,,\n";

        let summary = process_orders(&store, Cursor::new(csv)).unwrap();

        assert_eq!(summary, Summary { applied: 1, skipped: 0 });
        assert_eq!(store.inventory_record(InventoryId(6)).unwrap().inventory, 7);
    }

    #[test]
    fn parse_pet_order_and_status_update() {
        let store = seeded_store();
        let csv = "op,inven_id,amount_purchase,order_id,status\n\
                   pet,1,,,\n\
                   status,,,1,sold\n";

        let summary = process_orders(&store, Cursor::new(csv)).unwrap();

        assert_eq!(summary.applied, 2);
        let pet = store.pet(PetId(1)).unwrap();
        assert_eq!(pet.status, PetStatus::Sold);
        assert_eq!(pet.order_id, Some(OrderId(1)));
    }

    #[test]
    fn parse_cancellation() {
        let store = seeded_store();
        let csv = "op,inven_id,amount_purchase,order_id,status\n\
                   pet,1,,,\n\
                   status,,,1,available\n";

        process_orders(&store, Cursor::new(csv)).unwrap();

        let pet = store.pet(PetId(1)).unwrap();
        assert_eq!(pet.status, PetStatus::Available);
        assert_eq!(pet.order_id, None);
        assert!(store.orders().is_empty());
    }

    #[test]
    fn parse_with_whitespace_and_short_rows() {
        let store = seeded_store();
        let csv = "op,inven_id,amount_purchase,order_id,status\n stock , 6 , 4 \n";

        let summary = process_orders(&store, Cursor::new(csv)).unwrap();

        assert_eq!(summary.applied, 1);
        assert_eq!(store.inventory_record(InventoryId(6)).unwrap().inventory, 6);
    }

    #[test]
    fn skip_rejected_and_unknown_rows() {
        let store = seeded_store();
        let csv = "op,inven_id,amount_purchase,order_id,status\n\
                   stock,6,50,,\n\
                   refund,6,1,,\n\
                   status,,,,sold\n\
                   stock,6,1,,\n";

        let summary = process_orders(&store, Cursor::new(csv)).unwrap();

        assert_eq!(summary, Summary { applied: 1, skipped: 3 });
        assert_eq!(store.inventory_record(InventoryId(6)).unwrap().inventory, 9);
    }

    #[test]
    fn write_inventory_to_csv() {
        let store = seeded_store();

        let mut output = Vec::new();
        write_inventory(&store, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "id,pet_id,inventory\n1,1,1\n6,,10\n");
    }
}
