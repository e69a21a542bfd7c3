//! Formula system for derived attributes.
//!
//! A formula is plain arithmetic over numeric literals and attribute names:
//!
//! ```text
//! (5 * Agility) + 10 + Dexterity
//! Strength ^ 2 / 100
//! ```
//!
//! Supported operators are `+ - * / ^` plus parentheses and unary minus. There
//! is no modulo and no function call syntax. Formulas are parsed once into an
//! [`Expr`] tree when the attribute is built; evaluation walks the tree and asks
//! an [`AttributeLookup`] for every referenced attribute.
//!
//! ## Cycle detection
//!
//! Evaluating an identifier evaluates that attribute's own effective value, so
//! derived attributes may depend on other derived attributes. An [`EvalTrace`]
//! records which derived attributes are currently being evaluated; entering one
//! that is already on the trace fails with `CyclicDependency` instead of
//! recursing forever. The check runs on every read because formulas and
//! content can change at runtime.

pub mod evaluate;
pub mod parse;
pub mod registry;

pub use evaluate::evaluate;
pub use registry::{FormulaRegistry, FormulaSpec};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::attribute::Attribute;
use crate::error::{AttributeError, Result};

// ============================================================================
// Expression Tree
// ============================================================================

/// Binary arithmetic operators available in formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Pow => '^',
        }
    }
}

/// Parsed formula node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(f64),
    Ident(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Collects every attribute name referenced by this expression.
    pub fn collect_identifiers<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Ident(name) => {
                out.insert(name.as_str());
            }
            Expr::Neg(inner) => inner.collect_identifiers(out),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
        }
    }
}

/// A formula source string together with its parsed tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parses `source`, failing with `InvalidFormula` on malformed input.
    pub fn parse(source: &str) -> Result<Self> {
        let expr = parse::parse(source)?;
        Ok(Self {
            source: source.trim().to_owned(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Attribute names this formula reads, sorted and deduplicated.
    pub fn dependencies(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.expr.collect_identifiers(&mut names);
        names
    }

    /// Evaluates the formula against `lookup` with a fresh trace.
    pub fn evaluate(&self, lookup: &dyn AttributeLookup) -> Result<f64> {
        evaluate(&self.expr, lookup, &mut EvalTrace::new())
    }
}

impl FromStr for Formula {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ============================================================================
// Dependency Resolution
// ============================================================================

/// Resolves attribute names referenced from formulas.
///
/// Normally backed by the owner's attribute cache.
pub trait AttributeLookup {
    fn attribute(&self, name: &str) -> Option<&Attribute>;
}

impl AttributeLookup for BTreeMap<String, Attribute> {
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.get(name)
    }
}

impl AttributeLookup for HashMap<String, Attribute> {
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.get(name)
    }
}

impl AttributeLookup for [Attribute] {
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.iter().find(|a| a.name() == name)
    }
}

impl AttributeLookup for Vec<Attribute> {
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.as_slice().attribute(name)
    }
}

/// Lookup that resolves nothing; enough for base attributes and literal formulas.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDependencies;

impl AttributeLookup for NoDependencies {
    fn attribute(&self, _name: &str) -> Option<&Attribute> {
        None
    }
}

/// Derived attributes currently being evaluated, outermost first.
#[derive(Clone, Debug, Default)]
pub struct EvalTrace {
    stack: Vec<String>,
}

impl EvalTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as in progress.
    ///
    /// Fails with `CyclicDependency` when `name` is already being evaluated.
    pub fn enter(&mut self, name: &str) -> Result<()> {
        if self.contains(name) {
            let mut path = self.stack.clone();
            path.push(name.to_owned());
            tracing::warn!(attribute = name, path = ?path, "cyclic formula dependency");
            return Err(AttributeError::CyclicDependency {
                attribute: name.to_owned(),
                path,
            });
        }
        self.stack.push(name.to_owned());
        Ok(())
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stack.iter().any(|n| n == name)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
