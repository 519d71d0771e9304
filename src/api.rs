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

//! REST API over the [`Store`].
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET|POST /pets`, `GET /pets/{id or name}`
//! - `GET|POST /inventory`, `GET /inventory/{id}`
//! - `GET|POST /customer`, `/vet`, `/vendor`, `/event`, `/trainers` and `GET /<collection>/{id}`
//! - `POST /store/order` - Stock order
//! - `POST /store/order/pet` - Pet (reservation) order
//! - `GET /store/order/{id}`, `PATCH /store/order/{id}` - Read or update an order
//! - `GET /store/orders` - List orders
//!
//! ## Example Usage
//!
//! ```bash
//! # Create a pet (also creates its inventory record)
//! curl -X POST http://localhost:5000/pets \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Rex", "type": "dog"}'
//!
//! # Buy two units of inventory item 6
//! curl -X POST http://localhost:5000/store/order \
//!   -H "Content-Type: application/json" \
//!   -d '{"inven_id": 6, "amount_purchase": 2}'
//!
//! # Cancel order 3
//! curl -X PATCH http://localhost:5000/store/order/3 \
//!   -H "Content-Type: application/json" \
//!   -d '{"status": "available"}'
//! ```

use crate::base::{InventoryId, OrderId, PetId, RecordId};
use crate::directory::Directory;
use crate::records::Record;
use crate::validation::Payload;
use crate::{ErrorKind, Store, StoreError};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const SERVICE_NAME: &str = "pet-store-api";
pub const ORDER_UPDATED: &str = "Order and pet status updated successfully";

// === Request/Response DTOs ===

/// Response body for errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

// === Application State ===

/// Shared application state containing the store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

// === Error Handling ===

/// Wrapper for converting `StoreError` into HTTP responses.
#[derive(Debug)]
pub struct AppError(StoreError);

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError(err)
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::MissingField
        | ErrorKind::InvalidType
        | ErrorKind::InvalidRange
        | ErrorKind::InvalidEnum
        | ErrorKind::InsufficientStock
        | ErrorKind::InvalidState => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        debug!(code = kind.code(), error = %self.0, "request rejected");
        (
            status_for(kind),
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: kind.code().to_string(),
            }),
        )
            .into_response()
    }
}

/// Decodes a request body into a payload; an empty body is an empty payload.
fn payload(body: &Bytes) -> Result<Payload, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Payload::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(AppError(StoreError::InvalidType {
            field: "payload".to_string(),
            expected: "a JSON object",
        })),
    }
}

/// Path ids that are not integers are reported as not found.
fn parse_id(raw: &str, entity: &'static str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| AppError(StoreError::not_found(entity, raw)))
}

// === Handlers ===

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /pets
async fn list_pets(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.pets())
}

/// POST /pets - Create a pet and its inventory record.
async fn create_pet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let pet = state.store.create_pet(&payload(&body)?)?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// GET /pets/{key} - Look up by id when numeric, otherwise by name.
async fn get_pet(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let pet = match key.parse::<u32>() {
        Ok(id) => state.store.pet(PetId(id))?,
        Err(_) => state.store.pet_by_name(&key)?,
    };
    Ok(Json(pet))
}

/// GET /inventory
async fn list_inventory(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.inventory())
}

/// POST /inventory
async fn create_inventory(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let record = state.store.create_inventory(&payload(&body)?)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /inventory/{id}
async fn get_inventory(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&raw, "inventory item")?;
    Ok(Json(state.store.inventory_record(InventoryId(id))?))
}

/// POST /store/order - Buy units from an inventory record.
async fn place_stock_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let order = state.store.place_stock_order(&payload(&body)?)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /store/order/pet - Reserve a pet.
async fn place_pet_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let order = state.store.place_pet_order(&payload(&body)?)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /store/order/{order_id}
async fn get_order(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&raw, "order")?;
    Ok(Json(state.store.order(OrderId(id))?))
}

/// PATCH /store/order/{order_id} - Update (or cancel) an order.
async fn update_order(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    // The store reports malformed ids itself, so the body is only decoded
    // once the id has been checked.
    let change = match payload(&body) {
        Ok(payload) => state.store.update_order_status(&raw, &payload)?,
        Err(error) => {
            let id = parse_id(&raw, "order")?;
            state.store.order(OrderId(id))?;
            return Err(error);
        }
    };
    debug!(order_id = %change.order_id, cancelled = change.cancelled, "order updated");
    Ok(Json(MessageResponse {
        message: ORDER_UPDATED.to_string(),
    }))
}

/// GET /store/orders
async fn list_orders(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.orders())
}

/// List, create and fetch routes for one side collection.
fn directory_routes<T: Record>(select: fn(&Store) -> &Directory<T>) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(move |State(state): State<AppState>| async move {
                Json(select(&state.store).list())
            })
            .post(move |State(state): State<AppState>, body: Bytes| async move {
                let record = select(&state.store).create(&payload(&body)?)?;
                Ok::<_, AppError>((StatusCode::CREATED, Json(record)))
            }),
        )
        .route(
            "/{id}",
            get(
                move |State(state): State<AppState>, Path(raw): Path<String>| async move {
                    let id = parse_id(&raw, T::LABEL)?;
                    let record = select(&state.store).get(RecordId(id))?;
                    Ok::<_, AppError>(Json(record))
                },
            ),
        )
}

// === Router ===

/// Builds the application router.
pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{key}", get(get_pet))
        .route("/inventory", get(list_inventory).post(create_inventory))
        .route("/inventory/{id}", get(get_inventory))
        .route("/store/order", post(place_stock_order))
        .route("/store/order/pet", post(place_pet_order))
        .route("/store/order/{order_id}", get(get_order).patch(update_order))
        .route("/store/orders", get(list_orders))
        .nest("/customer", directory_routes(Store::customers))
        .nest("/vet", directory_routes(Store::vets))
        .nest("/vendor", directory_routes(Store::vendors))
        .nest("/event", directory_routes(Store::events))
        .nest("/trainers", directory_routes(Store::trainers))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Serves the API on `listener` until the process stops.
pub async fn serve(listener: TcpListener, store: Arc<Store>) -> std::io::Result<()> {
    axum::serve(listener, router(store)).await
}
