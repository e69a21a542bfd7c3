//! Attributes: bounded numeric traits.
//!
//! An attribute is either a **base** attribute holding a stored number or a
//! **derived** attribute holding a formula over other attributes. Both carry
//! `[min, max]` bounds and a [`ModifierStack`]:
//!
//! ```text
//! base:     effective = clamp(stack.resolve(stored),            min, max)
//! derived:  effective = clamp(stack.resolve(formula(lookup)),   min, max)
//! ```
//!
//! The stored value of a base attribute is clamped on write as well, so it can
//! never drift outside its bounds while modifiers apply on top.

use crate::error::{AttributeError, Result};
use crate::formula::{AttributeLookup, EvalTrace, Formula};
use crate::modifier::{Modifier, ModifierFilter, ModifierStack, OriginRef};
use crate::record::{AttributeRecord, BaseRecord, DerivedRecord};

/// Clamps without panicking when bounds cross; `max` wins.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Base or derived value source.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeKind {
    Base { value: f64 },
    Derived { formula: Formula },
}

/// A named, bounded trait owned by one character.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    min: f64,
    max: f64,
    kind: AttributeKind,
    modifiers: ModifierStack,
}

impl Attribute {
    /// Creates a base attribute; `value` is clamped into `[min, max]`.
    pub fn base(name: impl Into<String>, min: f64, max: f64, value: f64) -> Result<Self> {
        let name = name.into();
        check_bounds(&name, min, max)?;
        if value.is_nan() {
            return Err(AttributeError::NonFiniteValue { name, value });
        }
        Ok(Self {
            kind: AttributeKind::Base {
                value: clamp(value, min, max),
            },
            name,
            min,
            max,
            modifiers: ModifierStack::new(),
        })
    }

    /// Creates a derived attribute, parsing `formula` eagerly.
    pub fn derived(name: impl Into<String>, min: f64, max: f64, formula: &str) -> Result<Self> {
        let name = name.into();
        check_bounds(&name, min, max)?;
        Ok(Self {
            kind: AttributeKind::Derived {
                formula: Formula::parse(formula)?,
            },
            name,
            min,
            max,
            modifiers: ModifierStack::new(),
        })
    }

    /// Builds the variant selected by the record's discriminant.
    pub fn from_record(record: AttributeRecord) -> Result<Self> {
        let (attribute, modifiers) = match record {
            AttributeRecord::Base(BaseRecord {
                name,
                min,
                max,
                base,
                modifiers,
            }) => (Self::base(name, min, max, base)?, modifiers),
            AttributeRecord::Derived(DerivedRecord {
                name,
                min,
                max,
                formula,
                modifiers,
            }) => (Self::derived(name, min, max, &formula)?, modifiers),
        };
        Ok(attribute.with_modifiers(modifiers))
    }

    pub fn to_record(&self) -> AttributeRecord {
        let modifiers = self.modifiers.iter().cloned().collect();
        match &self.kind {
            AttributeKind::Base { value } => AttributeRecord::Base(BaseRecord {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
                base: *value,
                modifiers,
            }),
            AttributeKind::Derived { formula } => AttributeRecord::Derived(DerivedRecord {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
                formula: formula.source().to_owned(),
                modifiers,
            }),
        }
    }

    /// Attaches starting modifiers (builder pattern).
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.kind, AttributeKind::Derived { .. })
    }

    /// Stored value of a base attribute.
    pub fn base_value(&self) -> Option<f64> {
        match self.kind {
            AttributeKind::Base { value } => Some(value),
            AttributeKind::Derived { .. } => None,
        }
    }

    pub fn formula(&self) -> Option<&Formula> {
        match &self.kind {
            AttributeKind::Base { .. } => None,
            AttributeKind::Derived { formula } => Some(formula),
        }
    }

    /// Attribute names a derived formula reads; empty for base attributes.
    pub fn dependencies(&self) -> Vec<&str> {
        self.formula()
            .map(|f| f.dependencies().into_iter().collect())
            .unwrap_or_default()
    }

    pub fn modifiers(&self) -> &ModifierStack {
        &self.modifiers
    }

    /// Fully resolved, clamped value.
    ///
    /// Derived attributes resolve their dependencies through `lookup`; cycles
    /// fail with `CyclicDependency`.
    pub fn effective_value(&self, lookup: &dyn AttributeLookup) -> Result<f64> {
        self.effective_value_traced(lookup, &mut EvalTrace::new())
    }

    /// [`Self::effective_value`] continuing an in-progress evaluation.
    pub fn effective_value_traced(
        &self,
        lookup: &dyn AttributeLookup,
        trace: &mut EvalTrace,
    ) -> Result<f64> {
        let raw = match &self.kind {
            AttributeKind::Base { value } => *value,
            AttributeKind::Derived { formula } => {
                trace.enter(&self.name)?;
                let result = crate::formula::evaluate(formula.expr(), lookup, trace);
                trace.exit();
                let value = result?;
                if !value.is_finite() {
                    return Err(AttributeError::NonFiniteValue {
                        name: self.name.clone(),
                        value,
                    });
                }
                value
            }
        };

        let modified = self.modifiers.resolve(raw)?;
        if modified.is_nan() {
            return Err(AttributeError::NonFiniteValue {
                name: self.name.clone(),
                value: modified,
            });
        }
        Ok(clamp(modified, self.min, self.max))
    }

    /// Overwrites the stored value of a base attribute, clamped to bounds.
    ///
    /// Returns the value actually stored.
    pub fn set_base(&mut self, value: f64) -> Result<f64> {
        match &mut self.kind {
            AttributeKind::Base { value: stored } => {
                if value.is_nan() {
                    return Err(AttributeError::NonFiniteValue {
                        name: self.name.clone(),
                        value,
                    });
                }
                *stored = clamp(value, self.min, self.max);
                Ok(*stored)
            }
            AttributeKind::Derived { .. } => Err(AttributeError::UnsupportedOperation {
                name: self.name.clone(),
                operation: "set_base on a derived attribute",
            }),
        }
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.add(modifier);
    }

    pub fn remove_modifier(&mut self, modifier: &Modifier) -> Result<Modifier> {
        self.modifiers.remove(modifier)
    }

    pub fn get_modifier(&self, description: &str, filter: &ModifierFilter) -> Result<&Modifier> {
        self.modifiers.get(description, filter)
    }

    /// Drops every modifier contributed by `origin`.
    pub fn remove_modifiers_from(&mut self, origin: &OriginRef) -> usize {
        self.modifiers.remove_by_origin(origin)
    }
}

fn check_bounds(name: &str, min: f64, max: f64) -> Result<()> {
    if min.is_nan() || max.is_nan() || min > max {
        return Err(AttributeError::InvalidBounds {
            name: name.to_owned(),
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::NoDependencies;

    #[test]
    fn base_value_is_clamped_on_write_and_read() {
        let mut agility = Attribute::base("Agility", 0.0, 100.0, 150.0).unwrap();
        assert_eq!(agility.base_value(), Some(100.0));

        assert_eq!(agility.set_base(-5.0).unwrap(), 0.0);
        agility.set_base(90.0).unwrap();
        agility.add_modifier(Modifier::add("boots", 30.0));
        assert_eq!(agility.effective_value(&NoDependencies).unwrap(), 100.0);

        agility.add_modifier(Modifier::multiply("slow", 0.0));
        assert_eq!(agility.effective_value(&NoDependencies).unwrap(), 30.0);
    }

    #[test]
    fn derived_from_base() {
        let attrs = vec![
            Attribute::base("Agility", 0.0, 100.0, 10.0).unwrap(),
            Attribute::derived("Strength", 0.0, 100.0, "(5 * Agility) + 10").unwrap(),
        ];
        let strength = attrs.attribute("Strength").unwrap();
        assert_eq!(strength.effective_value(&attrs).unwrap(), 60.0);
    }

    #[test]
    fn derived_from_derived() {
        let attrs = vec![
            Attribute::base("Agility", 0.0, 100.0, 10.0).unwrap(),
            Attribute::derived("Dexterity", 0.0, 100.0, "2 * Agility").unwrap(),
            Attribute::derived("Strength", 0.0, 100.0, "(5*Agility)+10+Dexterity").unwrap(),
        ];
        let strength = attrs.attribute("Strength").unwrap();
        assert_eq!(strength.effective_value(&attrs).unwrap(), 80.0);
    }

    #[test]
    fn derived_value_is_clamped() {
        let attrs = vec![
            Attribute::base("Agility", 0.0, 100.0, 20.0).unwrap(),
            Attribute::derived("Strength", 0.0, 100.0, "(5 * Agility) + 10").unwrap(),
            Attribute::derived("Stamina", 50.0, 100.0, "Agility - 5").unwrap(),
        ];
        assert_eq!(
            attrs
                .attribute("Strength")
                .unwrap()
                .effective_value(&attrs)
                .unwrap(),
            100.0
        );
        assert_eq!(
            attrs
                .attribute("Stamina")
                .unwrap()
                .effective_value(&attrs)
                .unwrap(),
            50.0
        );
    }

    #[test]
    fn dependency_modifiers_flow_into_derived_values() {
        let mut agility = Attribute::base("Agility", 0.0, 100.0, 10.0).unwrap();
        agility.add_modifier(Modifier::add("ring", 2.0));
        let attrs = vec![
            agility,
            Attribute::derived("Strength", 0.0, 100.0, "(5 * Agility) + 10")
                .unwrap()
                .with_modifiers([Modifier::multiply("rage", 0.5)]),
        ];
        // (5 * 12 + 10) * 0.5
        assert_eq!(
            attrs
                .attribute("Strength")
                .unwrap()
                .effective_value(&attrs)
                .unwrap(),
            35.0
        );
    }

    #[test]
    fn cyclic_formulas_fail() {
        let attrs = vec![
            Attribute::derived("Strength", 0.0, 100.0, "5*Agility+10").unwrap(),
            Attribute::derived("Agility", 0.0, 100.0, "Strength+5").unwrap(),
        ];
        let err = attrs
            .attribute("Strength")
            .unwrap()
            .effective_value(&attrs)
            .unwrap_err();
        match err {
            AttributeError::CyclicDependency { attribute, path } => {
                assert_eq!(attribute, "Strength");
                assert_eq!(path, vec!["Strength", "Agility", "Strength"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let attrs = vec![
            Attribute::derived("Luck", 0.0, 100.0, "Luck + 1").unwrap(),
        ];
        assert!(matches!(
            attrs.attribute("Luck").unwrap().effective_value(&attrs),
            Err(AttributeError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn set_base_on_derived_is_unsupported() {
        let mut armor = Attribute::derived("Armor", 0.0, 100.0, "Agility * 2").unwrap();
        assert!(matches!(
            armor.set_base(5.0),
            Err(AttributeError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(matches!(
            Attribute::base("Broken", 10.0, 5.0, 7.0),
            Err(AttributeError::InvalidBounds { .. })
        ));
        assert!(matches!(
            Attribute::derived("Broken", f64::NAN, 5.0, "1"),
            Err(AttributeError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn non_finite_results_are_reported() {
        let attrs = vec![
            Attribute::derived("Weird", f64::NEG_INFINITY, f64::INFINITY, "(0 - 8) ^ 0.5").unwrap(),
        ];
        assert!(matches!(
            attrs.attribute("Weird").unwrap().effective_value(&attrs),
            Err(AttributeError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn overflowing_formulas_are_reported() {
        let attrs = vec![Attribute::derived("Huge", 0.0, 100.0, "10 ^ 400").unwrap()];
        assert!(matches!(
            attrs.attribute("Huge").unwrap().effective_value(&attrs),
            Err(AttributeError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn record_round_trip_preserves_variant_and_modifiers() {
        let original = Attribute::derived("Armor", 0.0, 500.0, "(Dexterity * 5) + 100")
            .unwrap()
            .with_modifiers([Modifier::add("shield", 20.0)]);
        let rebuilt = Attribute::from_record(original.to_record()).unwrap();
        assert_eq!(rebuilt, original);
        assert_eq!(rebuilt.dependencies(), vec!["Dexterity"]);
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::modifier::OperatorClass;

    #[derive(Clone, Debug)]
    enum Op {
        AddModifier { derived: bool, modifier: Modifier },
        RemoveFirst { derived: bool },
        SetBase(f64),
    }

    fn modifier_strategy() -> impl Strategy<Value = Modifier> {
        let operator = prop_oneof![
            Just(OperatorClass::Add),
            Just(OperatorClass::Subtract),
            Just(OperatorClass::Multiply),
            Just(OperatorClass::Divide),
        ];
        let value = prop_oneof![Just(0.0), Just(-1.0), -50.0f64..50.0];
        (operator, value).prop_map(|(operator, value)| Modifier::new(operator, value, "random"))
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<bool>(), modifier_strategy())
                .prop_map(|(derived, modifier)| Op::AddModifier { derived, modifier }),
            any::<bool>().prop_map(|derived| Op::RemoveFirst { derived }),
            (-500.0f64..500.0).prop_map(Op::SetBase),
        ]
    }

    fn bounds() -> impl Strategy<Value = (f64, f64)> {
        (-100.0f64..100.0, 0.0f64..200.0).prop_map(|(min, span)| (min, min + span))
    }

    proptest! {
        #[test]
        fn effective_value_stays_within_bounds(
            (base_min, base_max) in bounds(),
            (derived_min, derived_max) in bounds(),
            start in -500.0f64..500.0,
            ops in proptest::collection::vec(op_strategy(), 0..24),
        ) {
            let mut attrs = vec![
                Attribute::base("Agility", base_min, base_max, start).unwrap(),
                Attribute::derived("Reflex", derived_min, derived_max, "Agility * 3 - 40").unwrap(),
            ];

            for op in ops {
                match op {
                    Op::AddModifier { derived, modifier } => {
                        attrs[usize::from(derived)].add_modifier(modifier);
                    }
                    Op::RemoveFirst { derived } => {
                        let target = &mut attrs[usize::from(derived)];
                        let first = target.modifiers().iter().next().cloned();
                        if let Some(first) = first {
                            target.remove_modifier(&first).unwrap();
                        }
                    }
                    Op::SetBase(value) => {
                        let stored = attrs[0].set_base(value).unwrap();
                        prop_assert!(base_min <= stored && stored <= base_max);
                    }
                }

                for attribute in &attrs {
                    if let Ok(value) = attribute.effective_value(&attrs) {
                        prop_assert!(attribute.min() <= value && value <= attribute.max());
                    }
                }
            }
        }
    }
}
