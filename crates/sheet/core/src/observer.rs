//! Change notification.
//!
//! Every mutation that goes through a handler produces exactly one
//! [`ChangeEvent`], delivered synchronously before the mutating call returns.
//! [`StoreObserver`] writes the event through to an [`AttributeStore`], which
//! keeps the persisted copy in step with the cache.

use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::record::Record;
use crate::store::{AttributeStore, OwnerId};

/// A single create, update, or delete of one named record.
#[derive(Clone, Debug, PartialEq)]
pub enum ChangeEvent {
    Created { name: String, record: Record },
    Updated { name: String, record: Record },
    Deleted { name: String },
}

impl ChangeEvent {
    pub fn name(&self) -> &str {
        match self {
            Self::Created { name, .. } | Self::Updated { name, .. } | Self::Deleted { name } => {
                name
            }
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "create",
            Self::Updated { .. } => "update",
            Self::Deleted { .. } => "delete",
        }
    }
}

/// Receives every mutation of one handler.
pub trait ChangeObserver: Send {
    fn notify(&mut self, event: ChangeEvent) -> Result<(), StoreError>;
}

/// Writes events through to the owner's records in a store.
///
/// Holds only the owner id and category; the record travels in the event.
pub struct StoreObserver {
    owner: OwnerId,
    category: String,
    store: Arc<dyn AttributeStore>,
}

impl StoreObserver {
    pub fn new(owner: OwnerId, category: impl Into<String>, store: Arc<dyn AttributeStore>) -> Self {
        Self {
            owner,
            category: category.into(),
            store,
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl ChangeObserver for StoreObserver {
    fn notify(&mut self, event: ChangeEvent) -> Result<(), StoreError> {
        tracing::debug!(
            owner = %self.owner,
            category = %self.category,
            name = event.name(),
            kind = event.kind(),
            "writing change through to store"
        );
        match event {
            ChangeEvent::Created { name, record } | ChangeEvent::Updated { name, record } => {
                self.store.upsert(self.owner, &self.category, &name, &record)
            }
            ChangeEvent::Deleted { name } => self.store.delete(self.owner, &self.category, &name),
        }
    }
}

/// Captures events in memory.
///
/// Clones share the same log, so a test keeps one clone and hands the other to
/// a handler.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event received so far.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn take(&self) -> Vec<ChangeEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl ChangeObserver for RecordingObserver {
    fn notify(&mut self, event: ChangeEvent) -> Result<(), StoreError> {
        self.events
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(event);
        Ok(())
    }
}
