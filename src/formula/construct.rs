//! Smart constructors for the primitive operations.
//!
//! `add`, `scal` and `scalprod` consult their rule tables in [`super::rules`] before allocating
//! a generic node; `exp`, `log` and `pow` only check dimensions.
use super::node::{Formula, Kind};
use super::rules::{first_match, Rule, ADD_RULES, SCALPROD_RULES, SCAL_RULES};
use crate::error::Result;

use log::debug;

// Check dimensions, then return the result of the first matching rule, falling back to a
// generic node.
fn rewrite(kind: Kind, rules: &'static [Rule], a: &Formula, b: &Formula) -> Result<Formula> {
    let children = vec![a.clone(), b.clone()];
    kind.output_dim(&children)?;

    match first_match(rules, a, b) {
        Some((name, rewritten)) => {
            debug!("applied rewrite rule {name} to {a} {} {b}", kind.name());
            rewritten
        }
        None => Formula::generic(kind, children),
    }
}

impl Formula {
    /// `self + other`.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::error::FormulaError::DimensionMismatch) unless both
    /// operands have the same dimension.
    pub fn add(&self, other: &Formula) -> Result<Formula> {
        rewrite(Kind::Add, ADD_RULES, self, other)
    }

    /// The scalar `self` times the vector `other`.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::error::FormulaError::DimensionMismatch) unless `self` has
    /// dimension 1.
    pub fn scal(&self, other: &Formula) -> Result<Formula> {
        rewrite(Kind::Scal, SCAL_RULES, self, other)
    }

    /// The dot product `<self|other>`, a scalar.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::error::FormulaError::DimensionMismatch) unless both
    /// operands have the same dimension.
    pub fn scalprod(&self, other: &Formula) -> Result<Formula> {
        rewrite(Kind::Scalprod, SCALPROD_RULES, self, other)
    }

    pub fn exp(&self) -> Result<Formula> {
        Formula::generic(Kind::Exp, vec![self.clone()])
    }

    pub fn log(&self) -> Result<Formula> {
        Formula::generic(Kind::Log, vec![self.clone()])
    }

    /// `self` to the integer power `m`. Any `m` is accepted; `m = 0` evaluates to 1.
    pub fn pow(&self, m: i32) -> Result<Formula> {
        Formula::generic(Kind::Pow(m), vec![self.clone()])
    }
}
