//! # Formula Graph
//!
//! A [Formula](crate::formula::Formula) is a symbolic expression over vector-valued
//! [variables](crate::formula::Variable), built from sums, scalar products, dot products,
//! exponentials, logarithms and integer powers. Every node has an output dimension fixed when
//! it is built, so a formula can be type checked before any number is computed.
//!
//! The crate provides three things:
//!
//! - **Construction with simplification.** The constructors on [`Formula`](formula::Formula)
//!   check dimensions and apply algebraic [rewrite rules](crate::formula::rules) before
//!   allocating a node: `x + 0 = x`, `2 + 3 = 5`, `x + 2x = 3x`, and so on.
//! - **Transposed differentiation.** [`diff_t`](crate::diff::diff_t) builds a new formula
//!   computing the vector-Jacobian product of a formula with respect to a variable. It is built
//!   through the same constructors, so derivatives come out simplified.
//! - **Evaluation.** [`eval`](crate::eval::eval) computes a formula numerically, for any
//!   [`Float`](num_traits::Float) type.
//!
//! # Example
//!
//! ```rust
//! use formula_graph::prelude::*;
//!
//! // f(x) = exp(2x)
//! let v = Variable::new(0, 1).unwrap();
//! let x = Formula::from(v);
//! let f = Formula::int(2).scal(&x).unwrap().exp().unwrap();
//!
//! // df/dx = 2 exp(2x), with the constant collected on the left
//! let df = f.grad(&v).unwrap();
//! assert_eq!(df.to_string(), "(2 * Exp((2 * x0)))");
//!
//! let bindings = Bindings::new().with(&v, vec![1.5]).unwrap();
//! let value = f.eval(&bindings).unwrap()[0];
//! let slope = df.eval(&bindings).unwrap()[0];
//! assert!((value - 3.0f64.exp()).abs() < 1e-12);
//! assert!((slope - 2.0 * 3.0f64.exp()).abs() < 1e-12);
//! ```
//!
//! # Sharing and concurrency
//!
//! Formulas are immutable and reference counted ([`std::sync::Arc`]): sub-formulas may be
//! shared by any number of parents, and a formula can be read, differentiated or evaluated from
//! several threads at once.

pub mod diff;
pub mod error;
pub mod eval;
pub mod flat;
pub mod formula;
pub mod layer;
pub mod ops;

pub mod prelude {
    //! The types needed to build, differentiate and evaluate formulas.
    pub use crate::diff::diff_t;
    pub use crate::error::FormulaError;
    pub use crate::eval::{eval, Bindings};
    pub use crate::flat::{FlatFormula, FlatNode};
    pub use crate::formula::{Formula, Kind, Variable};
}
