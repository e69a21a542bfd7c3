//! Modifiers: typed numeric adjustments with provenance.
//!
//! A [`Modifier`] pairs a value with an [`OperatorClass`] and remembers where it
//! came from ([`OriginRef`]), so a buff or an equipped item can later find and
//! remove exactly the modifiers it contributed. Modifiers are value objects:
//! immutable once built and compared structurally.
//!
//! Modifiers on one attribute are collected in a [`ModifierStack`], which
//! resolves them with a fixed two-tier precedence (see [`stack`]).

pub mod stack;

pub use stack::ModifierStack;

use std::str::FromStr;

use crate::error::{AttributeError, Result};

/// Arithmetic applied by a modifier.
///
/// The symbol form (`+ - * /`) is what persisted records and content files use.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatorClass {
    #[strum(serialize = "+")]
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Add,

    #[strum(serialize = "-")]
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Subtract,

    #[strum(serialize = "*")]
    #[cfg_attr(feature = "serde", serde(rename = "*"))]
    Multiply,

    #[strum(serialize = "/")]
    #[cfg_attr(feature = "serde", serde(rename = "/"))]
    Divide,
}

impl OperatorClass {
    /// Parses an operator symbol, failing with `InvalidOperator`.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        Self::from_str(symbol).map_err(|_| AttributeError::InvalidOperator {
            symbol: symbol.to_owned(),
        })
    }

    /// The persisted symbol for this operator.
    pub fn symbol(self) -> &'static str {
        self.into()
    }

    /// Multiply/Divide resolve before Add/Subtract.
    pub const fn is_multiplicative(self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }
}

/// Opaque reference to whatever contributed a modifier (an item, a spell, a script).
///
/// Used only for lookup and removal, never in computation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OriginRef {
    pub id: u64,
    pub kind: String,
}

impl OriginRef {
    pub fn new(id: u64, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

/// A single adjustment applied on top of an attribute's value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    #[cfg_attr(feature = "serde", serde(rename = "desc"))]
    description: String,

    #[cfg_attr(feature = "serde", serde(rename = "val"))]
    value: f64,

    operator: OperatorClass,

    #[cfg_attr(
        feature = "serde",
        serde(rename = "origin_ref", default, skip_serializing_if = "Option::is_none")
    )]
    origin: Option<OriginRef>,
}

impl Modifier {
    pub fn new(operator: OperatorClass, value: f64, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            value,
            operator,
            origin: None,
        }
    }

    /// Factory keyed by operator symbol, as used by content and persisted records.
    ///
    /// Fails with `InvalidOperator` unless `symbol` is one of `+ - * /`.
    pub fn from_symbol(
        symbol: &str,
        value: f64,
        description: impl Into<String>,
        origin: Option<OriginRef>,
    ) -> Result<Self> {
        let operator = OperatorClass::from_symbol(symbol)?;
        Ok(Self {
            origin,
            ..Self::new(operator, value, description)
        })
    }

    pub fn add(description: impl Into<String>, value: f64) -> Self {
        Self::new(OperatorClass::Add, value, description)
    }

    pub fn subtract(description: impl Into<String>, value: f64) -> Self {
        Self::new(OperatorClass::Subtract, value, description)
    }

    pub fn multiply(description: impl Into<String>, value: f64) -> Self {
        Self::new(OperatorClass::Multiply, value, description)
    }

    pub fn divide(description: impl Into<String>, value: f64) -> Self {
        Self::new(OperatorClass::Divide, value, description)
    }

    /// Attaches provenance (builder pattern).
    #[must_use]
    pub fn with_origin(mut self, origin: OriginRef) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn operator(&self) -> OperatorClass {
        self.operator
    }

    pub fn origin(&self) -> Option<&OriginRef> {
        self.origin.as_ref()
    }

    /// Applies this modifier to a running value.
    ///
    /// Dividing by a zero-valued modifier is an error, never infinity.
    pub fn apply_to(&self, current: f64) -> Result<f64> {
        match self.operator {
            OperatorClass::Add => Ok(current + self.value),
            OperatorClass::Subtract => Ok(current - self.value),
            OperatorClass::Multiply => Ok(current * self.value),
            OperatorClass::Divide if self.value == 0.0 => Err(
                AttributeError::division_by_zero(format!("modifier '{}'", self.description)),
            ),
            OperatorClass::Divide => Ok(current / self.value),
        }
    }
}

/// Field filters used by [`ModifierStack::get`].
///
/// Unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierFilter {
    pub origin_id: Option<u64>,
    pub origin_kind: Option<String>,
    pub operator: Option<OperatorClass>,
    pub value: Option<f64>,
}

impl ModifierFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn origin_id(mut self, id: u64) -> Self {
        self.origin_id = Some(id);
        self
    }

    #[must_use]
    pub fn origin_kind(mut self, kind: impl Into<String>) -> Self {
        self.origin_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn operator(mut self, operator: OperatorClass) -> Self {
        self.operator = Some(operator);
        self
    }

    #[must_use]
    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn matches(&self, modifier: &Modifier) -> bool {
        let origin = modifier.origin();
        self.origin_id
            .is_none_or(|id| origin.is_some_and(|o| o.id == id))
            && self
                .origin_kind
                .as_deref()
                .is_none_or(|kind| origin.is_some_and(|o| o.kind == kind))
            && self.operator.is_none_or(|op| op == modifier.operator())
            && self.value.is_none_or(|v| v == modifier.value())
    }
}
