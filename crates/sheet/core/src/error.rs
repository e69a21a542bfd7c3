//! Error infrastructure for sheet-core.
//!
//! Every fallible operation in the engine returns [`AttributeError`]. Errors
//! raised by the backing store are wrapped in [`StoreError`] and travel through
//! `AttributeError::Store` unchanged, so callers always see the original cause.
//!
//! Errors are classified with [`ErrorSeverity`] so hosts can decide how to react
//! (reject the command, fall back to a default, or flag broken content).

use thiserror::Error;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: lookup misses and rejected adds; the caller picks a fallback
/// - **Validation**: malformed content (bad operator, bad formula, bad bounds)
/// - **Internal**: evaluation failures such as cycles or division by zero
/// - **Fatal**: the backing store failed; the persisted record may be stale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - caller decides the fallback.
    Recoverable,

    /// Validation error - offending content should be fixed at load time.
    Validation,

    /// Internal error - the value read failed, the process keeps running.
    Internal,

    /// Fatal error - the persisted record could not be written or read.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Errors surfaced by the attribute engine.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// A formula dependency chain references itself.
    #[error("cyclic formula dependency closes at '{attribute}' ({})", .path.join(" -> "))]
    CyclicDependency {
        attribute: String,
        path: Vec<String>,
    },

    #[error("attribute '{name}' not found")]
    AttributeNotFound { name: String },

    #[error("no modifier '{description}' matches the given filters")]
    ModifierNotFound { description: String },

    #[error("attribute '{name}' already exists")]
    DuplicateAttribute { name: String },

    #[error("invalid modifier operator '{symbol}' (expected one of + - * /)")]
    InvalidOperator { symbol: String },

    #[error("invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },

    #[error("invalid bounds for '{name}': min {min} > max {max}")]
    InvalidBounds { name: String, min: f64, max: f64 },

    #[error("invalid record '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("unsupported operation on '{name}': {operation}")]
    UnsupportedOperation {
        name: String,
        operation: &'static str,
    },

    #[error("division by zero while computing '{context}'")]
    DivisionByZero { context: String },

    #[error("'{name}' evaluated to a non-finite value ({value})")]
    NonFiniteValue { name: String, value: f64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AttributeError {
    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::AttributeNotFound { name: name.into() }
    }

    pub(crate) fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }

    /// Returns the severity level of this error.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AttributeNotFound { .. }
            | Self::ModifierNotFound { .. }
            | Self::DuplicateAttribute { .. }
            | Self::UnsupportedOperation { .. } => ErrorSeverity::Recoverable,
            Self::InvalidOperator { .. }
            | Self::InvalidFormula { .. }
            | Self::InvalidBounds { .. }
            | Self::InvalidRecord { .. } => ErrorSeverity::Validation,
            Self::CyclicDependency { .. }
            | Self::DivisionByZero { .. }
            | Self::NonFiniteValue { .. } => ErrorSeverity::Internal,
            Self::Store(_) => ErrorSeverity::Fatal,
        }
    }

    /// Returns a static string identifier for this error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CyclicDependency { .. } => "CYCLIC_DEPENDENCY",
            Self::AttributeNotFound { .. } => "ATTRIBUTE_NOT_FOUND",
            Self::ModifierNotFound { .. } => "MODIFIER_NOT_FOUND",
            Self::DuplicateAttribute { .. } => "DUPLICATE_ATTRIBUTE",
            Self::InvalidOperator { .. } => "INVALID_OPERATOR",
            Self::InvalidFormula { .. } => "INVALID_FORMULA",
            Self::InvalidBounds { .. } => "INVALID_BOUNDS",
            Self::InvalidRecord { .. } => "INVALID_RECORD",
            Self::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Self::DivisionByZero { .. } => "DIVISION_BY_ZERO",
            Self::NonFiniteValue { .. } => "NON_FINITE_VALUE",
            Self::Store(_) => "STORE",
        }
    }
}

/// Errors raised by [`AttributeStore`](crate::store::AttributeStore)
/// implementations and by observers writing through to them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("owner {owner} has no '{category}' record named '{name}'")]
    NotFound {
        owner: String,
        category: String,
        name: String,
    },

    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("corrupted record '{name}': {reason}")]
    Corrupted { name: String, reason: String },

    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = AttributeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_dependency_message_lists_path() {
        let err = AttributeError::CyclicDependency {
            attribute: "Strength".into(),
            path: vec!["Strength".into(), "Agility".into(), "Strength".into()],
        };
        assert_eq!(
            err.to_string(),
            "cyclic formula dependency closes at 'Strength' (Strength -> Agility -> Strength)"
        );
        assert_eq!(err.severity(), ErrorSeverity::Internal);
    }

    #[test]
    fn store_errors_are_fatal_and_transparent() {
        let err: AttributeError = StoreError::LockPoisoned.into();
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.to_string(), "store lock was poisoned");
        assert_eq!(err.error_code(), "STORE");
    }

    #[test]
    fn lookup_misses_are_recoverable() {
        assert!(
            AttributeError::not_found("Luck")
                .severity()
                .is_recoverable()
        );
    }
}
