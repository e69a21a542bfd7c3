//! Attribute-specific handler operations.

use std::collections::BTreeMap;

use super::AttributeHandler;
use crate::attribute::Attribute;
use crate::error::{AttributeError, Result};
use crate::formula::{FormulaRegistry, FormulaSpec};
use crate::modifier::{Modifier, ModifierFilter, OriginRef};
use crate::record::AttributeRecord;

impl AttributeHandler {
    /// Builds the variant selected by `record` and adds it.
    pub fn add(&mut self, record: AttributeRecord) -> Result<&Attribute> {
        let attribute = Attribute::from_record(record)?;
        self.insert(attribute)
    }

    /// Adds an attribute declared in `registry`: `BASE` entries store `base`,
    /// formula entries become derived attributes.
    pub fn add_registered(
        &mut self,
        registry: &FormulaRegistry,
        name: &str,
        min: f64,
        max: f64,
        base: f64,
    ) -> Result<&Attribute> {
        let record = match registry.get(name) {
            Some(FormulaSpec::Base) => AttributeRecord::base(name, min, max, base),
            Some(FormulaSpec::Derived(formula)) => {
                AttributeRecord::derived(name, min, max, formula.source())
            }
            None => return Err(AttributeError::not_found(name)),
        };
        self.add(record)
    }

    /// The cache as a formula lookup.
    pub fn lookup(&mut self) -> Result<&BTreeMap<String, Attribute>> {
        let entries: &BTreeMap<String, Attribute> = self.ensure_loaded()?;
        Ok(entries)
    }

    /// Effective value of one attribute, resolving formulas against this
    /// handler's own attributes.
    pub fn value(&mut self, name: &str) -> Result<f64> {
        let entries = self.ensure_loaded()?;
        let attribute = entries
            .get(name)
            .ok_or_else(|| AttributeError::not_found(name))?;
        attribute.effective_value(&*entries)
    }

    /// Effective value of every attribute, ordered by name.
    pub fn values(&mut self) -> Result<Vec<(String, f64)>> {
        let entries = self.ensure_loaded()?;
        entries
            .values()
            .map(|attribute| {
                attribute
                    .effective_value(&*entries)
                    .map(|value| (attribute.name().to_owned(), value))
            })
            .collect()
    }

    /// Stores a new base value (clamped) and notifies.
    pub fn set_base(&mut self, name: &str, value: f64) -> Result<f64> {
        self.modify(name, |attribute| attribute.set_base(value))
    }

    pub fn add_modifier(&mut self, name: &str, modifier: Modifier) -> Result<()> {
        self.modify(name, |attribute| {
            attribute.add_modifier(modifier);
            Ok(())
        })
    }

    pub fn remove_modifier(&mut self, name: &str, modifier: &Modifier) -> Result<Modifier> {
        self.modify(name, |attribute| attribute.remove_modifier(modifier))
    }

    pub fn get_modifier(
        &mut self,
        name: &str,
        description: &str,
        filter: &ModifierFilter,
    ) -> Result<Modifier> {
        self.get(name)?
            .get_modifier(description, filter)
            .cloned()
    }

    /// Drops every modifier contributed by `origin` across all attributes.
    ///
    /// Only attributes that actually lose a modifier are notified.
    pub fn remove_modifiers_from(&mut self, origin: &OriginRef) -> Result<usize> {
        let affected: Vec<String> = self
            .ensure_loaded()?
            .values()
            .filter(|a| a.modifiers().iter().any(|m| m.origin() == Some(origin)))
            .map(|a| a.name().to_owned())
            .collect();

        let mut removed = 0;
        for name in affected {
            removed += self.modify(&name, |attribute| {
                Ok(attribute.remove_modifiers_from(origin))
            })?;
        }
        Ok(removed)
    }
}
