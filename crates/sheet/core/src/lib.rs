//! Attribute and modifier resolution engine.
//!
//! `sheet-core` computes the runtime value of character attributes (stored
//! numbers or formulas over other attributes) with transient modifiers layered
//! on top, and models bounded resources whose limits are attributes
//! themselves. All mutation flows through [`handler::Handler`], which keeps an
//! in-memory cache in step with an external [`store::AttributeStore`].
pub mod attribute;
pub mod config;
pub mod error;
pub mod formula;
pub mod handler;
pub mod modifier;
pub mod observer;
pub mod record;
pub mod resource;
pub mod sheet;
pub mod store;
pub mod timer;

pub use attribute::{Attribute, AttributeKind};
pub use config::SheetConfig;
pub use error::{AttributeError, ErrorSeverity, Result, StoreError};
pub use formula::{AttributeLookup, EvalTrace, Formula, FormulaRegistry, FormulaSpec};
pub use handler::{AttributeHandler, CacheState, Entity, Handler, ResourceHandler};
pub use modifier::{Modifier, ModifierFilter, ModifierStack, OperatorClass, OriginRef};
pub use observer::{ChangeEvent, ChangeObserver, RecordingObserver, StoreObserver};
pub use record::{AttributeRecord, BaseRecord, DerivedRecord, Record, ResourceRecord};
pub use resource::{Bound, Resource};
pub use sheet::{CharacterSheet, CharacterSheetBuilder};
pub use store::{AttributeStore, OwnerId};
pub use timer::{Scheduler, TimerCallback, TimerHandle};
