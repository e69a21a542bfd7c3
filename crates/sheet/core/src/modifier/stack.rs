//! Ordered modifier collection with two-tier resolution.
//!
//! Resolution order:
//! 1. Multiply / Divide modifiers, in insertion order, each applied to the running value
//! 2. Add / Subtract modifiers, in insertion order, applied to the pass-1 result
//!
//! This is a flat precedence reduction, not an expression: a `+5` inserted
//! before a `*2` still applies after it. Floating point and division make the
//! result order-dependent, so insertion order is part of the contract.

use super::{Modifier, ModifierFilter, OriginRef};
use crate::error::{AttributeError, Result};

/// Modifiers attached to one attribute.
///
/// # Example
/// ```
/// # use sheet_core::modifier::{Modifier, ModifierStack};
/// let mut stack = ModifierStack::new();
/// stack.add(Modifier::add("ring", 10.0));
/// stack.add(Modifier::subtract("curse", 10.0));
/// stack.add(Modifier::multiply("rage", 10.0));
/// stack.add(Modifier::multiply("fatigue", 0.5));
///
/// // = 10 × 10 × 0.5 + 10 − 10
/// assert_eq!(stack.resolve(10.0).unwrap(), 50.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ModifierStack {
    modifiers: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self {
            modifiers: Vec::new(),
        }
    }

    /// Appends a modifier. Duplicates are legal (two poison stacks are two modifiers).
    pub fn add(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Add multiple modifiers at once
    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = Modifier>) {
        self.modifiers.extend(modifiers);
    }

    /// Removes the first modifier structurally equal to `modifier`.
    pub fn remove(&mut self, modifier: &Modifier) -> Result<Modifier> {
        let index = self
            .modifiers
            .iter()
            .position(|m| m == modifier)
            .ok_or_else(|| AttributeError::ModifierNotFound {
                description: modifier.description().to_owned(),
            })?;
        Ok(self.modifiers.remove(index))
    }

    /// Removes every modifier contributed by `origin`, returning how many were dropped.
    pub fn remove_by_origin(&mut self, origin: &OriginRef) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.origin() != Some(origin));
        before - self.modifiers.len()
    }

    /// First modifier with `description` that satisfies every filter field.
    pub fn get(&self, description: &str, filter: &ModifierFilter) -> Result<&Modifier> {
        self.modifiers
            .iter()
            .find(|m| m.description() == description && filter.matches(m))
            .ok_or_else(|| AttributeError::ModifierNotFound {
                description: description.to_owned(),
            })
    }

    /// All modifiers sharing a description, in insertion order.
    pub fn by_description<'a>(
        &'a self,
        description: &'a str,
    ) -> impl Iterator<Item = &'a Modifier> + 'a {
        self.modifiers
            .iter()
            .filter(move |m| m.description() == description)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Modifier> {
        self.modifiers.iter()
    }

    /// Resolves every modifier against `base`.
    ///
    /// Pure function of the current sequence. Fails with `DivisionByZero` when a
    /// divide modifier has value 0.
    pub fn resolve(&self, base: f64) -> Result<f64> {
        // Pass 1: multiplicative class
        let scaled = self
            .modifiers
            .iter()
            .filter(|m| m.operator().is_multiplicative())
            .try_fold(base, |acc, m| m.apply_to(acc))?;

        // Pass 2: additive class
        self.modifiers
            .iter()
            .filter(|m| !m.operator().is_multiplicative())
            .try_fold(scaled, |acc, m| m.apply_to(acc))
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }
}

impl FromIterator<Modifier> for ModifierStack {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self {
            modifiers: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Modifier>> for ModifierStack {
    fn from(modifiers: Vec<Modifier>) -> Self {
        Self { modifiers }
    }
}

impl From<ModifierStack> for Vec<Modifier> {
    fn from(stack: ModifierStack) -> Self {
        stack.modifiers
    }
}
