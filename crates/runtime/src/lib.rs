//! Runtime adapters for the attribute engine.
//!
//! `sheet-core` is synchronous and performs no I/O. This crate supplies the
//! pieces a host process needs around it:
//! - [`repository`] implements the store port (in-memory and JSON files)
//! - [`scheduler`] drives periodic recharge with tokio timers
//! - [`shared`] wraps a sheet for use from several tasks
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod shared;

pub use error::{Result, RuntimeError};
pub use repository::{FileAttributeStore, InMemoryAttributeStore, RepositoryError};
pub use scheduler::{RechargeScheduler, TokioScheduler, TokioTimerHandle};
pub use shared::SharedSheet;
