//! Priority-ordered rewrite rules consulted by the [`Add`](Kind::Add), [`Scal`](Kind::Scal) and
//! [`Scalprod`](Kind::Scalprod) constructors.
//!
//! Every rule is tried on operands whose dimensions have already been checked against the rule
//! of the operation being built. Rules build their replacement through the same constructors,
//! so one rewrite may trigger others further down the formula.
use super::node::{Formula, Kind};
use crate::error::Result;

/// A named construction-time rewrite of a binary operation.
pub struct Rule {
    pub name: &'static str,
    rewrite: fn(&Formula, &Formula) -> Option<Result<Formula>>,
}

impl Rule {
    /// Returns `None` when the pattern of this rule does not match `(a, b)`.
    pub fn apply(&self, a: &Formula, b: &Formula) -> Option<Result<Formula>> {
        (self.rewrite)(a, b)
    }
}

/// The first rule of `rules` matching `(a, b)`, with its result.
pub fn first_match(
    rules: &'static [Rule],
    a: &Formula,
    b: &Formula,
) -> Option<(&'static str, Result<Formula>)> {
    rules
        .iter()
        .find_map(|rule| rule.apply(a, b).map(|r| (rule.name, r)))
}

/// Rules for `a + b`, first match wins.
pub const ADD_RULES: &[Rule] = &[
    Rule {
        name: "zero_plus_zero",
        rewrite: zero_plus_zero,
    },
    Rule {
        name: "a_plus_zero",
        rewrite: a_plus_zero,
    },
    Rule {
        name: "zero_plus_b",
        rewrite: zero_plus_b,
    },
    Rule {
        name: "int_plus_int",
        rewrite: int_plus_int,
    },
    Rule {
        name: "f_plus_f",
        rewrite: f_plus_f,
    },
    Rule {
        name: "f_plus_scaled_f",
        rewrite: f_plus_scaled_f,
    },
    Rule {
        name: "scaled_f_plus_f",
        rewrite: scaled_f_plus_f,
    },
    Rule {
        name: "scaled_plus_scaled",
        rewrite: scaled_plus_scaled,
    },
    Rule {
        name: "add_int_to_left",
        rewrite: add_int_to_left,
    },
];

/// Rules for `a * b` where `a` is scalar, first match wins.
pub const SCAL_RULES: &[Rule] = &[
    Rule {
        name: "scal_by_zero",
        rewrite: scal_by_zero,
    },
    Rule {
        name: "zero_scal",
        rewrite: zero_scal,
    },
    Rule {
        name: "int_times_int",
        rewrite: int_times_int,
    },
    Rule {
        name: "scal_int_to_left",
        rewrite: scal_int_to_left,
    },
    Rule {
        name: "reassociate",
        rewrite: reassociate,
    },
];

/// Rules for `<a|b>`, first match wins.
pub const SCALPROD_RULES: &[Rule] = &[
    Rule {
        name: "scalprod_zero",
        rewrite: scalprod_zero,
    },
    Rule {
        name: "scalar_scalprod",
        rewrite: scalar_scalprod,
    },
];

// Operands of `f` when it is a `Scal` node.
fn scal_operands(f: &Formula) -> Option<(&Formula, &Formula)> {
    match f.kind() {
        Kind::Scal => f.operands(),
        _ => None,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Add

// 0 + 0 = 0
fn zero_plus_zero(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    (a.is_zero() && b.is_zero()).then(|| Ok(a.clone()))
}

// A + 0 = A
fn a_plus_zero(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    b.is_zero().then(|| Ok(a.clone()))
}

// 0 + B = B
fn zero_plus_b(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    a.is_zero().then(|| Ok(b.clone()))
}

// m + n folds, unless the sum overflows.
fn int_plus_int(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    let n = a.as_int()?.checked_add(b.as_int()?)?;
    Some(Ok(Formula::int(n)))
}

// F + F = 2 * F
fn f_plus_f(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    (a == b).then(|| Formula::int(2).scal(a))
}

// F + G*F = (1 + G) * F
fn f_plus_scaled_f(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    let (g, f) = scal_operands(b)?;
    (f == a).then(|| Formula::int(1).add(g)?.scal(f))
}

// G*F + F = (1 + G) * F
fn scaled_f_plus_f(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    let (g, f) = scal_operands(a)?;
    (f == b).then(|| Formula::int(1).add(g)?.scal(f))
}

// G*F + H*F = (G + H) * F
fn scaled_plus_scaled(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    let (g, f) = scal_operands(a)?;
    let (h, f2) = scal_operands(b)?;
    (f == f2).then(|| g.add(h)?.scal(f))
}

// F + n = n + F, for F not itself a constant
fn add_int_to_left(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    (a.as_int().is_none() && b.as_int().is_some()).then(|| b.add(a))
}

////////////////////////////////////////////////////////////////////////////////
// Scal

// A * 0 = 0, including 0 * 0
fn scal_by_zero(_: &Formula, b: &Formula) -> Option<Result<Formula>> {
    b.is_zero().then(|| Ok(b.clone()))
}

// 0 * B = 0, of the dimension of B
fn zero_scal(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    a.is_zero().then(|| Formula::zero(b.dim()))
}

// m * n folds, unless the product overflows.
fn int_times_int(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    let n = a.as_int()?.checked_mul(b.as_int()?)?;
    Some(Ok(Formula::int(n)))
}

// A * n = n * A, for A not itself a constant
fn scal_int_to_left(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    (a.as_int().is_none() && b.as_int().is_some()).then(|| b.scal(a))
}

// A * (F * G) = (A * F) * G
fn reassociate(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    let (f, g) = scal_operands(b)?;
    Some(a.scal(f).and_then(|af| af.scal(g)))
}

////////////////////////////////////////////////////////////////////////////////
// Scalprod

// <0|B> = <A|0> = 0
fn scalprod_zero(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    (a.is_zero() || b.is_zero()).then(|| Formula::zero(1))
}

// <a|b> = a * b for scalars
fn scalar_scalprod(a: &Formula, b: &Formula) -> Option<Result<Formula>> {
    (a.dim() == 1).then(|| a.scal(b))
}
