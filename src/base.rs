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

//! Core identifier types and id allocation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a pet.
    PetId
);

id_type!(
    /// Unique identifier for an inventory record.
    InventoryId
);

id_type!(
    /// Unique identifier for an order.
    ///
    /// Stock and reservation orders share one id space.
    OrderId
);

id_type!(
    /// Identifier for records in the side collections
    /// (customers, vets, vendors, trainers, events).
    RecordId
);

/// Returns the smallest positive id not present in `ids`.
///
/// An empty collection yields `1`. Gaps left by deleted records are reused.
pub fn next_free_id<I>(ids: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let used: HashSet<u32> = ids.into_iter().collect();
    (1..=u32::MAX)
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(u32::MAX)
}
