//! Errors raised while building, differentiating or evaluating formulas.
use thiserror::Error;

/// Every failure in this crate is local to a single call: inputs are pure data, so nothing is
/// retried and no partially built formula is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// Operand dimensions violate the rule of `op`.
    ///
    /// For `Scal` and the scalar-only unary operations, `left` is the dimension the operation
    /// requires of its scalar operand (1) or the actual one, and `right` the other side.
    #[error("dimension mismatch in {op}: {left} vs {right}")]
    DimensionMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    /// Leaves must have a positive output dimension.
    #[error("invalid dimension {dim}: formulas have positive dimension")]
    InvalidDimension { dim: usize },

    /// Integer exponents are unrestricted, except that differentiating `Pow(F, i32::MIN)` would
    /// need an exponent that does not fit.
    #[error("exponent {exponent} cannot be differentiated without overflow")]
    InvalidExponent { exponent: i32 },

    /// Evaluation reached a variable with no buffer bound to it.
    #[error("variable {index} is not bound")]
    UnboundVariable { index: usize },

    /// A bound buffer does not have the variable's declared length.
    #[error("buffer for variable {index} has length {got}, expected {expected}")]
    BindingLength {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// A flat graph description could not be rebuilt into a formula.
    #[error("malformed formula graph: {0}")]
    MalformedGraph(String),
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, FormulaError>;
