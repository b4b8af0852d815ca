//! Operator syntax for building formulas.
//!
//! Operators are implemented on `&Formula` only, and delegate to the rewriting constructors;
//! there are no impls on owned formulas, so `a.add(&b)` always resolves to the fallible
//! constructor even with `std::ops::Add` in scope. They cannot report errors, so they panic where the constructors would fail; use the
//! constructors directly to handle dimension errors.
//!
//! ```rust
//! use formula_graph::prelude::*;
//!
//! let x = Formula::variable(0, 1).unwrap();
//! let y = Formula::variable(1, 1).unwrap();
//! let f = &(&x * &y) - &(&x / &y);
//! assert_eq!(f.dim(), 1);
//! ```
use crate::error::Result;
use crate::formula::Formula;

use std::ops::{Add, Div, Mul, Neg, Sub};

fn valid(op: &str, f: Result<Formula>) -> Formula {
    match f {
        Ok(f) => f,
        Err(e) => panic!("cannot build `{op}`: {e}"),
    }
}

/// # Panics
///
/// If the operands have different dimensions.
impl Add for &Formula {
    type Output = Formula;

    fn add(self, rhs: &Formula) -> Formula {
        valid("+", Formula::add(self, rhs))
    }
}

/// # Panics
///
/// If the operands have different dimensions.
impl Sub for &Formula {
    type Output = Formula;

    fn sub(self, rhs: &Formula) -> Formula {
        valid("-", self.subtract(rhs))
    }
}

/// Scalar times vector.
///
/// # Panics
///
/// If the left operand is not scalar.
impl Mul for &Formula {
    type Output = Formula;

    fn mul(self, rhs: &Formula) -> Formula {
        valid("*", self.scal(rhs))
    }
}

/// Vector divided by scalar.
///
/// # Panics
///
/// If the right operand is not scalar.
impl Div for &Formula {
    type Output = Formula;

    fn div(self, rhs: &Formula) -> Formula {
        valid("/", rhs.inv().and_then(|inv| inv.scal(self)))
    }
}

impl Neg for &Formula {
    type Output = Formula;

    fn neg(self) -> Formula {
        valid("-", self.minus())
    }
}
