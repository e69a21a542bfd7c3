//! Store port: where attribute and resource records live.
//!
//! The engine never performs I/O itself. Handlers read through an
//! [`AttributeStore`] once to populate their cache and write every mutation
//! back through a [`ChangeObserver`](crate::observer::ChangeObserver).
//!
//! Records are keyed by `(owner, category, name)`:
//! ```text
//! #42 / attributes / Strength  -> { type: "attribute", base: 12, ... }
//! #42 / resources  / health    -> { type: "resource", current_value: 80, ... }
//! ```

use std::fmt;

use crate::error::StoreError;
use crate::record::Record;

/// Identifier of the entity owning an attribute set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for OwnerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Key/value backing store for persisted records.
///
/// Implementations must be safe to share between the handlers of one sheet
/// and the tasks driving recharge.
pub trait AttributeStore: Send + Sync {
    /// Load one record.
    fn lookup(&self, owner: OwnerId, category: &str, name: &str)
    -> Result<Option<Record>, StoreError>;

    /// Load every record of one owner and category.
    fn fetch_all(&self, owner: OwnerId, category: &str) -> Result<Vec<Record>, StoreError>;

    /// Create or replace one record.
    fn upsert(
        &self,
        owner: OwnerId,
        category: &str,
        name: &str,
        record: &Record,
    ) -> Result<(), StoreError>;

    /// Delete one record. Fails with `NotFound` when it does not exist.
    fn delete(&self, owner: OwnerId, category: &str, name: &str) -> Result<(), StoreError>;

    /// Check if a record exists
    fn exists(&self, owner: OwnerId, category: &str, name: &str) -> Result<bool, StoreError> {
        Ok(self.lookup(owner, category, name)?.is_some())
    }
}
