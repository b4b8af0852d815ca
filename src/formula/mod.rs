//! Dimension-typed formula graphs.
//!
//! A [`Formula`] is a shared reference to an immutable [`Node`]. Formulas are built bottom-up
//! through the constructors on [`Formula`], which check the dimension rules of each operation
//! and apply the rewrite rules of [`rules`] before allocating anything:
//!
//! ```rust
//! use formula_graph::formula::*;
//!
//! let x = Formula::variable(0, 1).unwrap();
//! let zero = Formula::zero(1).unwrap();
//!
//! // x + 0 = x, and x + x = 2 * x
//! assert_eq!(x.add(&zero).unwrap(), x);
//! assert_eq!(x.add(&x).unwrap().to_string(), "(2 * x0)");
//! ```
pub mod construct;
pub mod derived;
pub mod display;
pub mod node;
pub mod rules;

pub use node::*;
