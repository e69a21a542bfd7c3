//! Formula registry loader.
//!
//! File format: a RON map from attribute name to `"BASE"` or a formula.
//!
//! ```ron
//! {
//!     "Strength": "BASE",
//!     "Dexterity": "BASE",
//!     "Health": "(Strength * 2) + 100",
//!     "Attack_Power": "Strength / 2",
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use sheet_core::FormulaRegistry;

use crate::loaders::{LoadResult, read_file};

pub struct FormulaLoader;

impl FormulaLoader {
    /// Loads and validates a registry: every formula parses, every reference
    /// names a registered attribute, and no formula depends on itself.
    pub fn load(path: &Path) -> LoadResult<FormulaRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid formula registry at {:?}: {}", path, e))
    }

    pub fn parse(content: &str) -> LoadResult<FormulaRegistry> {
        let raw: BTreeMap<String, String> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse formula RON: {}", e))?;

        let registry = FormulaRegistry::from_raw(raw)?;
        registry.validate()?;

        tracing::debug!(entries = registry.len(), "loaded formula registry");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::FormulaSpec;

    #[test]
    fn parses_registry() {
        let registry = FormulaLoader::parse(
            r#"{
                "Strength": "BASE",
                "Health": "(Strength * 2) + 100",
            }"#,
        )
        .unwrap();
        assert_eq!(registry.get("Strength"), Some(&FormulaSpec::Base));
        assert!(registry.get("Health").and_then(FormulaSpec::formula).is_some());
    }

    #[test]
    fn rejects_cyclic_content() {
        let err = FormulaLoader::parse(
            r#"{ "Strength": "5 * Agility + 10", "Agility": "Strength + 5" }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cyclic"));
    }

    #[test]
    fn rejects_malformed_formula() {
        assert!(FormulaLoader::parse(r#"{ "Health": "Strength *" }"#).is_err());
    }
}
