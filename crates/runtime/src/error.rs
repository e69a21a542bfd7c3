//! Unified error type surfaced by the runtime crate.

use sheet_core::AttributeError;
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("shared sheet lock was poisoned")]
    LockPoisoned,

    #[error("recharge scheduler requires a tokio runtime")]
    NoRuntime(#[source] tokio::runtime::TryCurrentError),
}
