//! Data-driven sheet content and loaders.
//!
//! Content decides which attributes exist and how they are computed:
//! - Formula registry (RON): `name -> "BASE" | formula`
//! - Sheet template (TOML): starting attributes and resources
//! - Sheet configuration (TOML): store categories and recharge defaults
//!
//! Everything here is validated at load time, so broken formulas are rejected
//! before any character is built.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, FormulaLoader, ResourceTemplate, SheetTemplate, TemplateLoader,
};
