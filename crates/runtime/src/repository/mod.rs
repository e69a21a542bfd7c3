//! Store adapters implementing [`sheet_core::AttributeStore`].
//!
//! - [`InMemoryAttributeStore`]: process-local, for tests and tools
//! - [`FileAttributeStore`]: one JSON document per owner and category

mod error;
mod file;
mod memory;

pub use error::RepositoryError;
pub use file::FileAttributeStore;
pub use memory::InMemoryAttributeStore;
