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

//! Records kept in the side collections.
//!
//! These collections have no cross-collection rules; they only need an id,
//! a label for error messages, and a payload schema.

use crate::base::RecordId;
use crate::validation::{FieldKind, FieldRule, Schema};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

/// A record stored in a [`Directory`](crate::Directory).
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Lowercase entity name used in error messages.
    const LABEL: &'static str;

    /// Fixture file the collection is seeded from.
    const FIXTURE: &'static str;

    /// Payload contract for creation, excluding `id`.
    const SCHEMA: Schema;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);
}

const CONTACT_FORMS: &[&str] = &["phone", "email", "website"];
const TRAINER_CONTACT_FORMS: &[&str] = &["phone", "email", "website", "text"];

macro_rules! record {
    ($name:ident, $label:literal, $fixture:literal) => {
        impl Record for $name {
            const LABEL: &'static str = $label;
            const FIXTURE: &'static str = $fixture;
            const SCHEMA: Schema = $name::RULES;

            fn id(&self) -> RecordId {
                self.id
            }

            fn set_id(&mut self, id: RecordId) {
                self.id = id;
            }
        }
    };
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub date: String,
    /// Inventory id of the purchased item.
    pub purchase: i64,
    pub email: String,
}

impl Customer {
    const RULES: Schema = Schema::new(&[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("date", FieldKind::Text),
        FieldRule::required("purchase", FieldKind::Integer),
        FieldRule::required("email", FieldKind::Text),
    ]);
}

record!(Customer, "customer", "customers.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vet {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub contact_form: String,
    pub contact_info: i64,
}

impl Vet {
    const RULES: Schema = Schema::new(&[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("contact_form", FieldKind::OneOf(CONTACT_FORMS)),
        FieldRule::required("contact_info", FieldKind::Integer),
    ]);
}

record!(Vet, "vet", "vet.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trainer {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub contact_form: String,
    pub contact_info: i64,
}

impl Trainer {
    const RULES: Schema = Schema::new(&[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("contact_form", FieldKind::OneOf(TRAINER_CONTACT_FORMS)),
        FieldRule::required("contact_info", FieldKind::Integer),
    ]);
}

record!(Trainer, "trainer", "trainers.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vendor {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub contact_form: String,
    pub contact_info: String,
    pub point_of_contact: String,
    /// Inventory id of the supplied product.
    pub product: i64,
}

impl Vendor {
    const RULES: Schema = Schema::new(&[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("contact_form", FieldKind::OneOf(CONTACT_FORMS)),
        FieldRule::required("contact_info", FieldKind::Text),
        FieldRule::required("point_of_contact", FieldKind::Text),
        FieldRule::required("product", FieldKind::Integer),
    ]);
}

record!(Vendor, "vendor", "vendors.json");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub date: String,
    pub location: i64,
}

impl Event {
    const RULES: Schema = Schema::new(&[
        FieldRule::required("name", FieldKind::Text),
        FieldRule::required("date", FieldKind::Text),
        FieldRule::required("location", FieldKind::Integer),
    ]);
}

record!(Event, "event", "events.json");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn vet_contact_form_is_restricted() {
        let payload = json!({"name": "Dr. Paws", "contact_form": "pigeon", "contact_info": 5550100});
        let error = Vet::SCHEMA
            .validate(payload.as_object().unwrap())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidEnum);
    }

    #[test]
    fn trainers_may_be_texted() {
        let payload = json!({"name": "Sam", "contact_form": "text", "contact_info": 5550100});
        assert!(Trainer::SCHEMA.validate(payload.as_object().unwrap()).is_ok());
        assert!(Vet::SCHEMA.validate(payload.as_object().unwrap()).is_err());
    }

    #[test]
    fn vendor_contact_info_is_text() {
        let payload = json!({
            "name": "Kibble Co",
            "contact_form": "email",
            "contact_info": 42,
            "point_of_contact": "Ann",
            "product": 3
        });
        let error = Vendor::SCHEMA
            .validate(payload.as_object().unwrap())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidType);
    }

    #[test]
    fn customer_decodes_without_id() {
        let customer: Customer = Customer::SCHEMA
            .parse(
                json!({"name": "Ann", "date": "2024-01-01", "purchase": 1, "email": "a@b.c"})
                    .as_object()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(customer.id, RecordId(0));
        assert_eq!(Customer::LABEL, "customer");
    }
}
