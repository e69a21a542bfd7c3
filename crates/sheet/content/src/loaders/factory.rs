//! Content factory for building sheets from a data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sheet_core::{AttributeStore, CharacterSheet, FormulaRegistry, OwnerId, SheetConfig};

use crate::loaders::{ConfigLoader, FormulaLoader, LoadResult, SheetTemplate, TemplateLoader};

/// Content factory that loads all sheet content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml     (optional)
/// ├── formulas.ron
/// └── sheet.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load `config.toml`, falling back to defaults when the file is absent.
    pub fn load_config(&self) -> LoadResult<SheetConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(SheetConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load and validate `formulas.ron`.
    pub fn load_formulas(&self) -> LoadResult<FormulaRegistry> {
        FormulaLoader::load(&self.data_dir.join("formulas.ron"))
    }

    /// Load `sheet.toml`.
    pub fn load_template(&self) -> LoadResult<SheetTemplate> {
        TemplateLoader::load(&self.data_dir.join("sheet.toml"))
    }

    /// Builds a sheet for `owner` over `store`, wired with the loaded
    /// configuration and formula registry. Nothing is seeded.
    pub fn build_sheet(&self, owner: OwnerId, store: Arc<dyn AttributeStore>) -> LoadResult<CharacterSheet> {
        Ok(CharacterSheet::builder(owner, store)
            .config(self.load_config()?)
            .registry(self.load_formulas()?)
            .build())
    }

    /// [`Self::build_sheet`] plus the template's starting entries.
    pub fn build_seeded_sheet(
        &self,
        owner: OwnerId,
        store: Arc<dyn AttributeStore>,
    ) -> LoadResult<CharacterSheet> {
        let mut sheet = self.build_sheet(owner, store)?;
        self.load_template()?.seed(&mut sheet)?;
        Ok(sheet)
    }
}
