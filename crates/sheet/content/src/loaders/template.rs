//! Sheet template loader.
//!
//! A template lists the attributes and resources every new character starts
//! with. File format (TOML):
//!
//! ```toml
//! [[attributes]]
//! type = "attribute"
//! name = "Constitution"
//! min = 0
//! max = 100
//! base = 10
//!
//! [[attributes]]
//! type = "derived"
//! name = "Armor"
//! min = 0
//! max = 500
//! formula = "(Dexterity * 5) + 100"
//!
//! [[resources]]
//! name = "health"
//! recharge_rate = 5
//! will_recharge = true
//! min = { type = "attribute", name = "health_min", min = 0, max = 0, base = 0 }
//! max = { type = "derived", name = "health_max", min = 1, max = 1000, formula = "Constitution * 10" }
//! ```
//!
//! A resource without `current_value` starts full; one without
//! `recharge_interval` uses the configured default.

use std::path::Path;

use serde::Deserialize;
use sheet_core::{AttributeRecord, CharacterSheet, ResourceRecord, SheetConfig};

use crate::loaders::{LoadResult, read_file};

/// Starting resource definition.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResourceTemplate {
    pub name: String,
    pub min: AttributeRecord,
    pub max: AttributeRecord,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub recharge_rate: f64,
    #[serde(default)]
    pub recharge_interval: Option<f64>,
    #[serde(default)]
    pub will_recharge: bool,
}

impl ResourceTemplate {
    pub fn to_record(&self, config: &SheetConfig) -> ResourceRecord {
        ResourceRecord {
            name: self.name.clone(),
            min: self.min.clone(),
            max: self.max.clone(),
            current_value: self.current_value.unwrap_or(0.0),
            recharge_rate: self.recharge_rate,
            recharge_interval: self
                .recharge_interval
                .unwrap_or(config.default_recharge_interval),
            will_recharge: self.will_recharge,
        }
    }
}

/// Attributes and resources a new sheet starts with.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SheetTemplate {
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
    #[serde(default)]
    pub resources: Vec<ResourceTemplate>,
}

impl SheetTemplate {
    /// Adds every template entry the sheet does not have yet.
    ///
    /// Attributes go first so resource bounds can reference them. Returns how
    /// many entries were added.
    pub fn seed(&self, sheet: &mut CharacterSheet) -> sheet_core::Result<usize> {
        let mut added = 0;

        for record in &self.attributes {
            if sheet.attributes().contains(record.name())? {
                continue;
            }
            sheet.add_attribute(record.clone())?;
            added += 1;
        }

        let config = sheet.config().clone();
        for template in &self.resources {
            if sheet.resources().contains(&template.name)? {
                continue;
            }
            sheet.add_resource(template.to_record(&config))?;
            if template.current_value.is_none() {
                sheet.restore(&template.name)?;
            }
            added += 1;
        }

        tracing::debug!(owner = %sheet.owner(), added, "seeded sheet from template");
        Ok(added)
    }
}

/// Loader for sheet templates from TOML files.
pub struct TemplateLoader;

impl TemplateLoader {
    pub fn load(path: &Path) -> LoadResult<SheetTemplate> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid sheet template at {:?}: {}", path, e))
    }

    /// Parses a template and checks every entry builds.
    pub fn parse(content: &str) -> LoadResult<SheetTemplate> {
        let template: SheetTemplate = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse template TOML: {}", e))?;

        for record in &template.attributes {
            sheet_core::Attribute::from_record(record.clone())?;
        }
        for resource in &template.resources {
            sheet_core::Resource::from_record(resource.to_record(&SheetConfig::default()))?;
        }
        Ok(template)
    }
}
