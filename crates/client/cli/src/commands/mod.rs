//! Subcommands.

mod recharge;
mod resource;
mod seed;
mod set;
mod show;
mod validate;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Subcommand;
use sheet_content::ContentFactory;
use sheet_core::{CharacterSheet, OwnerId};
use sheet_runtime::FileAttributeStore;

use crate::config::CliConfig;

pub use recharge::Recharge;
pub use resource::ResourceCmd;
pub use seed::Seed;
pub use set::{Modify, Set};
pub use show::Show;
pub use validate::Validate;

#[derive(Subcommand)]
pub enum Command {
    /// Check content files without touching the store
    Validate(Validate),

    /// Add the template's starting attributes and resources
    Seed(Seed),

    /// Print attribute values and resource levels
    Show(Show),

    /// Set the stored value of a base attribute
    Set(Set),

    /// Add or remove a modifier on an attribute
    Modify(Modify),

    /// Restore, deplete, recharge, consume or replenish a resource
    Resource(ResourceCmd),

    /// Run recharge timers for a while
    Recharge(Recharge),
}

impl Command {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Self::Validate(cmd) => cmd.execute(ctx),
            Self::Seed(cmd) => cmd.execute(ctx),
            Self::Show(cmd) => cmd.execute(ctx),
            Self::Set(cmd) => cmd.execute(ctx),
            Self::Modify(cmd) => cmd.execute(ctx),
            Self::Resource(cmd) => cmd.execute(ctx),
            Self::Recharge(cmd) => cmd.execute(ctx),
        }
    }
}

/// Shared state for all subcommands.
pub struct Context {
    config: CliConfig,
    factory: ContentFactory,
}

impl Context {
    pub fn new(config: CliConfig) -> Self {
        let factory = ContentFactory::new(config.content_dir.clone());
        Self { config, factory }
    }

    pub fn factory(&self) -> &ContentFactory {
        &self.factory
    }

    pub fn owner(&self) -> OwnerId {
        OwnerId(self.config.owner)
    }

    pub fn store(&self) -> Result<Arc<FileAttributeStore>> {
        let store = FileAttributeStore::new(&self.config.data_dir).with_context(|| {
            format!("Failed to open store at {}", self.config.data_dir.display())
        })?;
        Ok(Arc::new(store))
    }

    /// The owner's sheet over the file store, wired with content.
    pub fn sheet(&self) -> Result<CharacterSheet> {
        self.factory.build_sheet(self.owner(), self.store()?)
    }
}
