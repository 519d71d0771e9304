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

//! Payload validation.
//!
//! Each operation declares its payload contract as a [`Schema`]: an ordered
//! list of [`FieldRule`]s. [`Schema::validate`] walks the rules in order and
//! stops at the first violation, so callers get exactly one error.
//!
//! # Example
//!
//! ```
//! use petstore_rs::validation::{FieldKind, FieldRule, Payload, Schema};
//! use petstore_rs::ErrorKind;
//! use serde_json::json;
//!
//! const ORDER: Schema = Schema::new(&[
//!     FieldRule::required("inven_id", FieldKind::PositiveInteger),
//!     FieldRule::required("amount_purchase", FieldKind::PositiveInteger),
//! ]);
//!
//! let payload: Payload = json!({"inven_id": 5, "amount_purchase": true})
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//! let error = ORDER.validate(&payload).unwrap_err();
//! assert_eq!(error.kind(), ErrorKind::InvalidType);
//! ```

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A request payload: field name to JSON value.
pub type Payload = Map<String, Value>;

/// Accepted shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any integer. Booleans and floats are rejected.
    Integer,
    /// Integer in `1..=u32::MAX`.
    PositiveInteger,
    /// Integer in `0..=u32::MAX`.
    NonNegativeInteger,
    /// Any string.
    Text,
    /// String drawn from a fixed set.
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    fn check(&self, payload: &Payload) -> Result<(), StoreError> {
        // JSON null is treated as an absent field.
        let value = match payload.get(self.name) {
            None | Some(Value::Null) => return self.absent(),
            Some(value) => value,
        };

        match self.kind {
            FieldKind::Integer => {
                integer(value).ok_or_else(|| self.invalid_type("an integer"))?;
            }
            FieldKind::PositiveInteger => {
                let n = integer(value).ok_or_else(|| self.invalid_type("a positive integer"))?;
                if n < 1 || n > i64::from(u32::MAX) {
                    return Err(self.invalid_range("a positive integer"));
                }
            }
            FieldKind::NonNegativeInteger => {
                let n =
                    integer(value).ok_or_else(|| self.invalid_type("a non-negative integer"))?;
                if n < 0 || n > i64::from(u32::MAX) {
                    return Err(self.invalid_range("a non-negative integer"));
                }
            }
            FieldKind::Text => {
                let text = value.as_str().ok_or_else(|| self.invalid_type("a string"))?;
                if text.is_empty() {
                    return self.absent();
                }
            }
            FieldKind::OneOf(allowed) => {
                let text = value.as_str().ok_or_else(|| self.invalid_type("a string"))?;
                if text.is_empty() {
                    return self.absent();
                }
                if !allowed.contains(&text) {
                    return Err(StoreError::InvalidEnum {
                        field: self.name.to_string(),
                        value: text.to_string(),
                        allowed: allowed.join(", "),
                    });
                }
            }
        }
        Ok(())
    }

    fn absent(&self) -> Result<(), StoreError> {
        if self.required {
            Err(StoreError::MissingField {
                field: self.name.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn invalid_type(&self, expected: &'static str) -> StoreError {
        StoreError::InvalidType {
            field: self.name.to_string(),
            expected,
        }
    }

    fn invalid_range(&self, expected: &'static str) -> StoreError {
        StoreError::InvalidRange {
            field: self.name.to_string(),
            expected,
        }
    }
}

/// Extracts an integer, refusing booleans and floats.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Ordered set of field contracts for one operation.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    rules: &'static [FieldRule],
}

impl Schema {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// Checks every rule in declaration order, returning the first failure.
    pub fn validate(&self, payload: &Payload) -> Result<(), StoreError> {
        self.rules.iter().try_for_each(|rule| rule.check(payload))
    }

    /// Validates `payload` and then decodes it into `T`.
    ///
    /// Fields not named by the schema are ignored.
    pub fn parse<T: DeserializeOwned>(&self, payload: &Payload) -> Result<T, StoreError> {
        self.validate(payload)?;

        // Only the fields the schema vouches for reach the decoder, with nulls
        // and empty strings dropped so they decode as `None`.
        let checked: Payload = self
            .rules
            .iter()
            .filter_map(|rule| {
                payload
                    .get(rule.name)
                    .filter(|value| !value.is_null() && value.as_str() != Some(""))
                    .map(|value| (rule.name.to_string(), value.clone()))
            })
            .collect();

        serde_json::from_value(Value::Object(checked)).map_err(|_| StoreError::InvalidType {
            field: "payload".to_string(),
            expected: "an object matching the schema",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Deserialize;
    use serde_json::json;

    const STATUSES: &[&str] = &["available", "sold", "pending"];

    const SCHEMA: Schema = Schema::new(&[
        FieldRule::required("count", FieldKind::PositiveInteger),
        FieldRule::optional("stock", FieldKind::NonNegativeInteger),
        FieldRule::optional("name", FieldKind::Text),
        FieldRule::optional("status", FieldKind::OneOf(STATUSES)),
        FieldRule::optional("phone", FieldKind::Integer),
    ]);

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn kind_of(value: Value) -> Option<ErrorKind> {
        SCHEMA.validate(&payload(value)).err().map(|e| e.kind())
    }

    #[test]
    fn accepts_valid_payload() {
        assert_eq!(
            kind_of(json!({"count": 2, "stock": 0, "name": "Rex", "status": "sold", "phone": -5})),
            None
        );
    }

    #[test]
    fn missing_required_field() {
        let error = SCHEMA.validate(&payload(json!({}))).unwrap_err();
        assert_eq!(
            error,
            StoreError::MissingField {
                field: "count".into()
            }
        );
    }

    #[test]
    fn null_counts_as_missing() {
        assert_eq!(kind_of(json!({"count": null})), Some(ErrorKind::MissingField));
        assert_eq!(kind_of(json!({"count": 1, "name": null})), None);
    }

    #[test]
    fn booleans_are_not_integers() {
        assert_eq!(kind_of(json!({"count": true})), Some(ErrorKind::InvalidType));
        assert_eq!(kind_of(json!({"count": 1, "phone": false})), Some(ErrorKind::InvalidType));
    }

    #[test]
    fn floats_and_strings_are_not_integers() {
        assert_eq!(kind_of(json!({"count": 1.5})), Some(ErrorKind::InvalidType));
        assert_eq!(kind_of(json!({"count": "3"})), Some(ErrorKind::InvalidType));
    }

    #[test]
    fn range_checks() {
        assert_eq!(kind_of(json!({"count": 0})), Some(ErrorKind::InvalidRange));
        assert_eq!(kind_of(json!({"count": -2})), Some(ErrorKind::InvalidRange));
        assert_eq!(kind_of(json!({"count": 1, "stock": -1})), Some(ErrorKind::InvalidRange));
        assert_eq!(
            kind_of(json!({"count": 5_000_000_000_i64})),
            Some(ErrorKind::InvalidRange)
        );
    }

    #[test]
    fn enum_checks() {
        let error = SCHEMA
            .validate(&payload(json!({"count": 1, "status": "archived"})))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidEnum);
        assert_eq!(
            error.to_string(),
            "invalid status 'archived', valid values are available, sold, pending"
        );
        assert_eq!(kind_of(json!({"count": 1, "status": 3})), Some(ErrorKind::InvalidType));
    }

    #[test]
    fn first_failure_wins() {
        // `count` is declared before `status`, so its error is reported.
        assert_eq!(
            kind_of(json!({"count": 0, "status": "archived"})),
            Some(ErrorKind::InvalidRange)
        );
    }

    #[test]
    fn empty_required_text_is_missing() {
        const NAMED: Schema = Schema::new(&[FieldRule::required("name", FieldKind::Text)]);
        let error = NAMED.validate(&payload(json!({"name": ""}))).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingField);
    }

    #[test]
    fn parse_decodes_checked_fields() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Decoded {
            count: u32,
            name: Option<String>,
        }

        let decoded: Decoded = SCHEMA
            .parse(&payload(json!({"count": 3, "name": null, "extra": [1, 2]})))
            .unwrap();
        assert_eq!(
            decoded,
            Decoded {
                count: 3,
                name: None
            }
        );
    }

    #[test]
    fn parse_treats_empty_optional_strings_as_absent() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Status {
            Available,
            Sold,
            Pending,
        }

        #[derive(Debug, Deserialize, PartialEq)]
        struct Decoded {
            count: u32,
            name: Option<String>,
            status: Option<Status>,
        }

        let decoded: Decoded = SCHEMA
            .parse(&payload(json!({"count": 1, "name": "", "status": ""})))
            .unwrap();
        assert_eq!(
            decoded,
            Decoded {
                count: 1,
                name: None,
                status: None
            }
        );

        let decoded: Decoded = SCHEMA
            .parse(&payload(json!({"count": 1, "status": "sold"})))
            .unwrap();
        assert_eq!(decoded.status, Some(Status::Sold));
    }
}
