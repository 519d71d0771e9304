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

//! Concurrent keyed collection for the side records.

use crate::base::{RecordId, next_free_id};
use crate::error::LoadError;
use crate::records::Record;
use crate::validation::{FieldKind, FieldRule, Payload, Schema};
use crate::StoreError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Deserialize;

/// Optional client-chosen id shared by every create payload.
const REQUESTED_ID: Schema =
    Schema::new(&[FieldRule::optional("id", FieldKind::PositiveInteger)]);

#[derive(Deserialize)]
struct RequestedId<I> {
    id: Option<I>,
}

/// A thread-safe collection of records keyed by id.
///
/// Records never reference each other across collections, so each
/// directory is independent and uses the [`DashMap`] entry API for
/// atomic check-and-insert instead of a store-wide lock.
#[derive(Debug)]
pub struct Directory<T: Record> {
    records: DashMap<RecordId, T>,
}

impl<T: Record> Directory<T> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Builds a directory from fixture rows.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateId`] if two rows share an id.
    pub fn from_records(records: Vec<T>) -> Result<Self, LoadError> {
        let directory = Self::new();
        for record in records {
            let id = record.id();
            if directory.records.insert(id, record).is_some() {
                return Err(LoadError::DuplicateId {
                    collection: T::LABEL,
                    id: id.0,
                });
            }
        }
        Ok(directory)
    }

    pub fn get(&self, id: RecordId) -> Result<T, StoreError> {
        self.records
            .get(&id)
            .map(|record| record.value().clone())
            .ok_or_else(|| StoreError::not_found(T::LABEL, id))
    }

    /// Returns every record, ordered by id.
    pub fn list(&self) -> Vec<T> {
        let mut records: Vec<T> = self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|record| record.id());
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates `payload` and stores it as a new record.
    ///
    /// A client-supplied `id` is kept as is; otherwise the smallest free id
    /// is assigned.
    ///
    /// # Errors
    ///
    /// - Validation errors from the record's schema.
    /// - [`StoreError::Conflict`] - The supplied `id` is already taken.
    pub fn create(&self, payload: &Payload) -> Result<T, StoreError> {
        let RequestedId { id: requested } = REQUESTED_ID.parse::<RequestedId<RecordId>>(payload)?;
        let mut record: T = T::SCHEMA.parse(payload)?;

        if let Some(id) = requested {
            return match self.records.entry(id) {
                Entry::Occupied(_) => Err(StoreError::Conflict {
                    entity: T::LABEL,
                    id: id.0,
                }),
                Entry::Vacant(entry) => {
                    record.set_id(id);
                    entry.insert(record.clone());
                    Ok(record)
                }
            };
        }

        // Another writer may claim the free id between the scan and the
        // insert; rescan until a vacant slot is won.
        loop {
            let id = RecordId(next_free_id(self.records.iter().map(|r| r.key().0)));
            if let Entry::Vacant(entry) = self.records.entry(id) {
                record.set_id(id);
                entry.insert(record.clone());
                return Ok(record);
            }
        }
    }
}

impl<T: Record> Default for Directory<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::records::Event;
    use serde_json::{Value, json};

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn event(id: u32, name: &str) -> Event {
        Event {
            id: RecordId(id),
            name: name.to_string(),
            date: "2025-06-01".to_string(),
            location: 1,
        }
    }

    #[test]
    fn create_allocates_smallest_free_id() {
        let events = Directory::from_records(vec![event(1, "Adoption day"), event(3, "Vaccines")])
            .unwrap();
        let created = events
            .create(&payload(json!({"name": "Parade", "date": "2025-07-04", "location": 9})))
            .unwrap();
        assert_eq!(created.id, RecordId(2));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn create_keeps_requested_id() {
        let events = Directory::<Event>::new();
        let created = events
            .create(&payload(
                json!({"id": 10, "name": "Parade", "date": "2025-07-04", "location": 9}),
            ))
            .unwrap();
        assert_eq!(created.id, RecordId(10));
        assert_eq!(events.get(RecordId(10)).unwrap(), created);
    }

    #[test]
    fn create_with_taken_id_conflicts() {
        let events = Directory::from_records(vec![event(1, "Adoption day")]).unwrap();
        let error = events
            .create(&payload(
                json!({"id": 1, "name": "Parade", "date": "2025-07-04", "location": 9}),
            ))
            .unwrap_err();
        assert_eq!(error, StoreError::Conflict { entity: "event", id: 1 });
        assert_eq!(events.get(RecordId(1)).unwrap().name, "Adoption day");
    }

    #[test]
    fn create_rejects_non_integer_id() {
        let events = Directory::<Event>::new();
        let error = events
            .create(&payload(
                json!({"id": "7", "name": "Parade", "date": "2025-07-04", "location": 9}),
            ))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidType);
        assert!(events.is_empty());
    }

    #[test]
    fn invalid_payload_is_not_stored() {
        let events = Directory::<Event>::new();
        let error = events
            .create(&payload(json!({"name": "Parade", "date": "2025-07-04"})))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingField);
        assert!(events.is_empty());
    }

    #[test]
    fn list_is_ordered_by_id() {
        let events = Directory::from_records(vec![event(3, "c"), event(1, "a"), event(2, "b")])
            .unwrap();
        let ids: Vec<u32> = events.list().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_fixture_ids_are_rejected() {
        let result = Directory::from_records(vec![event(1, "a"), event(1, "b")]);
        assert!(matches!(
            result,
            Err(LoadError::DuplicateId {
                collection: "event",
                id: 1
            })
        ));
    }

    #[test]
    fn missing_record_is_not_found() {
        let events = Directory::<Event>::new();
        assert_eq!(events.get(RecordId(4)).unwrap_err().kind(), ErrorKind::NotFound);
    }
}
