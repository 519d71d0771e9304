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

//! Error types for store operations and fixture loading.

use crate::base::InventoryId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Store operation errors.
///
/// Every operation validates its payload and looks up every referenced entity
/// before mutating anything, so an `Err` always means the store is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A required payload field is absent (or an empty string)
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// A field is present but has the wrong type
    #[error("{field} must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// A numeric field is outside its allowed bounds
    #[error("{field} must be {expected}")]
    InvalidRange {
        field: String,
        expected: &'static str,
    },

    /// A string field is outside its allowed value set
    #[error("invalid {field} '{value}', valid values are {allowed}")]
    InvalidEnum {
        field: String,
        value: String,
        allowed: String,
    },

    /// A referenced entity does not exist
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Creation attempted with an id that is already taken
    #[error("{entity} with ID {id} already exists")]
    Conflict { entity: &'static str, id: u32 },

    /// Purchase quantity exceeds the current stock
    #[error(
        "not enough inventory for item ID {inventory_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        inventory_id: InventoryId,
        available: u32,
        requested: u32,
    },

    /// The entity's current state forbids the operation
    #[error("{entity} with ID {id} {reason}")]
    InvalidState {
        entity: &'static str,
        id: u32,
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the transport-agnostic kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::MissingField { .. } => ErrorKind::MissingField,
            StoreError::InvalidType { .. } => ErrorKind::InvalidType,
            StoreError::InvalidRange { .. } => ErrorKind::InvalidRange,
            StoreError::InvalidEnum { .. } => ErrorKind::InvalidEnum,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Conflict { .. } => ErrorKind::Conflict,
            StoreError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            StoreError::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

/// Discriminant of [`StoreError`], used by adapters to pick a response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingField,
    InvalidType,
    InvalidRange,
    InvalidEnum,
    NotFound,
    Conflict,
    InsufficientStock,
    InvalidState,
}

impl ErrorKind {
    /// Stable machine-readable code, e.g. `INSUFFICIENT_STOCK`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MissingField => "MISSING_FIELD",
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::InvalidRange => "INVALID_RANGE",
            ErrorKind::InvalidEnum => "INVALID_ENUM",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::InvalidState => "INVALID_STATE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fixture loading errors.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two fixture rows in one collection share an id
    #[error("duplicate id {id} in {collection} fixtures")]
    DuplicateId { collection: &'static str, id: u32 },

    #[error("fixture loader thread panicked")]
    WorkerPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            StoreError::MissingField {
                field: "status".into()
            }
            .to_string(),
            "missing required field: status"
        );
        assert_eq!(
            StoreError::InvalidRange {
                field: "amount_purchase".into(),
                expected: "a positive integer",
            }
            .to_string(),
            "amount_purchase must be a positive integer"
        );
        assert_eq!(
            StoreError::InvalidEnum {
                field: "status".into(),
                value: "archived".into(),
                allowed: "available, sold, pending".into(),
            }
            .to_string(),
            "invalid status 'archived', valid values are available, sold, pending"
        );
        assert_eq!(
            StoreError::not_found("order", "abc").to_string(),
            "order with ID abc not found"
        );
        assert_eq!(
            StoreError::Conflict { entity: "pet", id: 3 }.to_string(),
            "pet with ID 3 already exists"
        );
        assert_eq!(
            StoreError::InsufficientStock {
                inventory_id: InventoryId(5),
                available: 1,
                requested: 5,
            }
            .to_string(),
            "not enough inventory for item ID 5: available 1, requested 5"
        );
        assert_eq!(
            StoreError::InvalidState {
                entity: "pet",
                id: 9,
                reason: "is not available for order",
            }
            .to_string(),
            "pet with ID 9 is not available for order"
        );
    }

    #[test]
    fn kinds_map_to_codes() {
        let error = StoreError::not_found("pet", 1);
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.kind().code(), "NOT_FOUND");
        assert_eq!(ErrorKind::InsufficientStock.to_string(), "INSUFFICIENT_STOCK");
    }

    #[test]
    fn errors_are_cloneable() {
        let error = StoreError::Conflict { entity: "vet", id: 2 };
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
