//! Formula registry: which attributes exist and how each one is computed.
//!
//! Content declares every attribute either as a stored `BASE` value or as a
//! formula over other attributes:
//!
//! ```text
//! Strength      = BASE
//! Dexterity     = BASE
//! Health        = (Strength * 2) + 100
//! Attack_Power  = Strength / 2
//! ```
//!
//! The registry is plain configuration handed to the attribute handler at
//! construction. [`FormulaRegistry::validate`] checks the static dependency
//! graph when content is loaded, so broken formulas are caught before play.

use std::collections::{BTreeMap, HashMap};

use super::Formula;
use crate::error::{AttributeError, Result};

/// How a registered attribute obtains its value.
#[derive(Clone, Debug, PartialEq)]
pub enum FormulaSpec {
    /// Stored value, no formula.
    Base,
    /// Computed from other attributes.
    Derived(Formula),
}

impl FormulaSpec {
    /// Token content files use for stored attributes.
    pub const BASE_TOKEN: &'static str = "BASE";

    /// Parses a raw registry entry: the `BASE` token or a formula.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim() == Self::BASE_TOKEN {
            Ok(Self::Base)
        } else {
            Formula::parse(raw).map(Self::Derived)
        }
    }

    pub fn formula(&self) -> Option<&Formula> {
        match self {
            Self::Base => None,
            Self::Derived(formula) => Some(formula),
        }
    }
}

/// Name → formula table for one game.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormulaRegistry {
    entries: BTreeMap<String, FormulaSpec>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

impl FormulaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from raw `name -> "BASE" | formula` pairs.
    pub fn from_raw<I, K, V>(raw: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut registry = Self::new();
        for (name, spec) in raw {
            registry.insert(name, FormulaSpec::parse(spec.as_ref())?);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FormulaSpec) -> Option<FormulaSpec> {
        self.entries.insert(name.into(), spec)
    }

    pub fn insert_base(&mut self, name: impl Into<String>) {
        self.insert(name, FormulaSpec::Base);
    }

    pub fn insert_formula(&mut self, name: impl Into<String>, source: &str) -> Result<()> {
        self.insert(name, FormulaSpec::Derived(Formula::parse(source)?));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FormulaSpec> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormulaSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every formula only references registered attributes and
    /// that the dependency graph is acyclic.
    pub fn validate(&self) -> Result<()> {
        for (name, spec) in &self.entries {
            if let Some(formula) = spec.formula() {
                if let Some(missing) = formula
                    .dependencies()
                    .into_iter()
                    .find(|dep| !self.entries.contains_key(*dep))
                {
                    tracing::warn!(attribute = %name, missing, "formula references unknown attribute");
                    return Err(AttributeError::not_found(missing));
                }
            }
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        for name in self.entries.keys() {
            self.visit(name, &mut marks, &mut path)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Result<()> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                let start = path.iter().position(|n| *n == name).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(name.to_owned());
                return Err(AttributeError::CyclicDependency {
                    attribute: name.to_owned(),
                    path: cycle,
                });
            }
            None => {}
        }

        marks.insert(name, Mark::InProgress);
        path.push(name);
        if let Some(formula) = self.entries.get(name).and_then(FormulaSpec::formula) {
            for dep in formula.dependencies() {
                self.visit(dep, marks, path)?;
            }
        }
        path.pop();
        marks.insert(name, Mark::Done);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_token_and_formulas() {
        let registry = FormulaRegistry::from_raw([
            ("Strength", "BASE"),
            ("Health", "(Strength * 2) + 100"),
        ])
        .unwrap();

        assert_eq!(registry.get("Strength"), Some(&FormulaSpec::Base));
        assert_eq!(
            registry
                .get("Health")
                .and_then(FormulaSpec::formula)
                .map(Formula::source),
            Some("(Strength * 2) + 100")
        );
        registry.validate().unwrap();
    }

    #[test]
    fn malformed_formula_fails_at_load() {
        let err = FormulaRegistry::from_raw([("Health", "Strength * ")]).unwrap_err();
        assert!(matches!(err, AttributeError::InvalidFormula { .. }));
    }

    #[test]
    fn validate_reports_cycles() {
        let registry = FormulaRegistry::from_raw([
            ("Strength", "5 * Agility + 10"),
            ("Agility", "Strength + 5"),
            ("Luck", "BASE"),
        ])
        .unwrap();

        match registry.validate().unwrap_err() {
            AttributeError::CyclicDependency { attribute, path } => {
                assert_eq!(attribute, "Agility");
                assert_eq!(path, vec!["Agility", "Strength", "Agility"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn validate_reports_unknown_references() {
        let registry = FormulaRegistry::from_raw([("Armor", "Dexterity * 5")]).unwrap();
        assert!(matches!(
            registry.validate(),
            Err(AttributeError::AttributeNotFound { name }) if name == "Dexterity"
        ));
    }

    #[test]
    fn diamond_dependencies_are_not_cycles() {
        let registry = FormulaRegistry::from_raw([
            ("Agility", "BASE"),
            ("Dexterity", "2 * Agility"),
            ("Strength", "(5 * Agility) + 10 + Dexterity"),
        ])
        .unwrap();
        registry.validate().unwrap();
    }
}
