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

//! Benchmarks for the pet store.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Payload validation
//! - Single-threaded pet creation and stock orders
//! - Reservation lifecycle
//! - Multi-threaded stock orders and directory inserts

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use petstore_rs::validation::Payload;
use petstore_rs::{StockOrderRequest, Store};
use rayon::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

fn payload(value: Value) -> Payload {
    value.as_object().cloned().unwrap()
}

fn stock_order(inven_id: u32, amount: u32) -> Payload {
    payload(json!({"inven_id": inven_id, "amount_purchase": amount}))
}

fn new_pet(i: usize) -> Payload {
    payload(json!({"name": format!("pet-{i}"), "type": "dog"}))
}

fn stocked_store(records: u32, units: u32) -> Store {
    let store = Store::new();
    for id in 1..=records {
        store
            .create_inventory(&payload(json!({"id": id, "inventory": units})))
            .unwrap();
    }
    store
}

// =============================================================================
// Single-Threaded Benchmarks
// =============================================================================

fn bench_validation(c: &mut Criterion) {
    let valid = stock_order(1, 2);
    let invalid = payload(json!({"inven_id": 1, "amount_purchase": true}));

    c.bench_function("validate_stock_order", |b| {
        b.iter(|| StockOrderRequest::SCHEMA.validate(black_box(&valid)))
    });
    c.bench_function("reject_stock_order", |b| {
        b.iter(|| StockOrderRequest::SCHEMA.validate(black_box(&invalid)))
    });
}

fn bench_create_pets(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_pets");

    for count in [100, 1_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let store = Store::new();
                for i in 0..count {
                    store.create_pet(&new_pet(i)).unwrap();
                }
                black_box(&store);
            })
        });
    }
    group.finish();
}

fn bench_stock_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("stock_orders");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_batched(
                || stocked_store(1, count as u32),
                |store| {
                    for _ in 0..count {
                        store.place_stock_order(&stock_order(1, 1)).unwrap();
                    }
                    black_box(&store);
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_reservation_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("reservation_lifecycle");

    group.bench_function("reserve_cancel", |b| {
        let store = Store::new();
        store.create_pet(&new_pet(0)).unwrap();
        let reserve = payload(json!({"inven_id": 1}));
        let cancel = payload(json!({"status": "available"}));

        b.iter(|| {
            let order = store.place_pet_order(&reserve).unwrap();
            store
                .update_order_status(&order.id.to_string(), &cancel)
                .unwrap();
        })
    });

    group.bench_function("reserve_sell", |b| {
        let sell = payload(json!({"status": "sold"}));

        b.iter_batched(
            || {
                let store = Store::new();
                store.create_pet(&new_pet(0)).unwrap();
                store
            },
            |store| {
                let order = store
                    .place_pet_order(&payload(json!({"inven_id": 1})))
                    .unwrap();
                store
                    .update_order_status(&order.id.to_string(), &sell)
                    .unwrap();
                black_box(&store);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

// =============================================================================
// Multi-Threaded Benchmarks
// =============================================================================

fn bench_parallel_stock_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_stock_orders");

    for count in [1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter_batched(
                || Arc::new(stocked_store(10, count as u32)),
                |store| {
                    (0..count).into_par_iter().for_each(|i| {
                        let inven_id = (i % 10) as u32 + 1;
                        store.place_stock_order(&stock_order(inven_id, 1)).unwrap();
                    });
                    black_box(&store);
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_parallel_directory_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_directory_inserts");

    for count in [100, 1_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.iter(|| {
                let store = Store::new();
                (0..count).into_par_iter().for_each(|i| {
                    store
                        .events()
                        .create(&payload(json!({
                            "name": format!("event-{i}"),
                            "date": "2025-07-04",
                            "location": 1
                        })))
                        .unwrap();
                });
                black_box(&store);
            })
        });
    }
    group.finish();
}

criterion_group!(single_threaded, bench_validation, bench_create_pets, bench_stock_orders,);

criterion_group!(lifecycle, bench_reservation_lifecycle,);

criterion_group!(
    multi_threaded,
    bench_parallel_stock_orders,
    bench_parallel_directory_inserts,
);

criterion_main!(single_threaded, lifecycle, multi_threaded);
