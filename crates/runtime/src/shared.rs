//! Thread-safe sheet wrapper.

use std::sync::{Arc, Mutex};

use sheet_core::CharacterSheet;

use crate::error::{Result, RuntimeError};

/// A [`CharacterSheet`] shared between tasks.
///
/// Every read-modify-write sequence runs under one lock, so a recharge tick
/// and a command from the host never interleave.
#[derive(Clone)]
pub struct SharedSheet {
    inner: Arc<Mutex<CharacterSheet>>,
}

impl SharedSheet {
    pub fn new(sheet: CharacterSheet) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sheet)),
        }
    }

    /// Runs `f` with exclusive access to the sheet.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut CharacterSheet) -> sheet_core::Result<R>,
    ) -> Result<R> {
        let mut sheet = self.inner.lock().map_err(|_| RuntimeError::LockPoisoned)?;
        Ok(f(&mut sheet)?)
    }
}

impl From<CharacterSheet> for SharedSheet {
    fn from(sheet: CharacterSheet) -> Self {
        Self::new(sheet)
    }
}
