//! Formula evaluation logic.

use super::{AttributeLookup, BinaryOp, EvalTrace, Expr};
use crate::error::{AttributeError, Result};

/// Evaluate an expression tree to a number.
///
/// ## Error Handling
/// - `AttributeNotFound` if an identifier is unknown to `lookup`
/// - `CyclicDependency` if a referenced derived attribute is already on `trace`
/// - `DivisionByZero` for `x / 0`
/// - errors raised while resolving a dependency propagate unchanged
pub fn evaluate(expr: &Expr, lookup: &dyn AttributeLookup, trace: &mut EvalTrace) -> Result<f64> {
    match expr {
        Expr::Literal(value) => Ok(*value),

        Expr::Ident(name) => {
            let attribute = lookup
                .attribute(name)
                .ok_or_else(|| AttributeError::not_found(name.as_str()))?;
            attribute.effective_value_traced(lookup, trace)
        }

        Expr::Neg(inner) => Ok(-evaluate(inner, lookup, trace)?),

        Expr::Binary { op, lhs, rhs } => {
            let left = evaluate(lhs, lookup, trace)?;
            let right = evaluate(rhs, lookup, trace)?;
            match op {
                BinaryOp::Add => Ok(left + right),
                BinaryOp::Sub => Ok(left - right),
                BinaryOp::Mul => Ok(left * right),
                BinaryOp::Div if right == 0.0 => Err(AttributeError::division_by_zero(format!(
                    "{left} / {right}"
                ))),
                BinaryOp::Div => Ok(left / right),
                BinaryOp::Pow => Ok(left.powf(right)),
            }
        }
    }
}
