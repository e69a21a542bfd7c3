//! Sheet configuration loader.

use std::path::Path;

use sheet_core::SheetConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for sheet configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> LoadResult<SheetConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SheetConfig> {
        let config: SheetConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        config.default_recharge_duration()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("default_recharge_interval = 15.0\n").unwrap();
        assert_eq!(config.default_recharge_interval, 15.0);
        assert_eq!(config.attributes_category, SheetConfig::DEFAULT_ATTRIBUTES_CATEGORY);
    }

    #[test]
    fn rejects_non_positive_interval() {
        assert!(ConfigLoader::parse("default_recharge_interval = 0.0\n").is_err());
    }

    #[test]
    fn rejects_interval_too_long_for_a_timer() {
        assert!(ConfigLoader::parse("default_recharge_interval = 1e20\n").is_err());
    }
}
