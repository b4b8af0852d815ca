//! Reverse-mode (transposed) differentiation of formulas.
//!
//! `diff_t(f, v, g)` builds the formula for `[∂_v f]ᵀ · g`: the vector-Jacobian product of `f`
//! with respect to the variable `v`, contracted against the seed `g`. The result has the
//! dimension of `v`.
//!
//! Every node kind transposes in terms of the transpositions of its children:
//! `DiffT(Exp(F), V, g) = Exp(F) * DiffT(F, V, g)`, and so on. Since `DiffT` is linear in its
//! seed, this is computed as `DiffT(F, V, Exp(F) * g)`: each node receives the sum of the seeds
//! of its parents, then passes a seed on to each child that depends on `V`. Shared sub-formulas
//! are therefore transposed once, whatever the number of paths leading to them.
//!
//! All nodes of the result are built through the rewriting constructors of
//! [`crate::formula`], so the derivative comes out simplified: nothing is built for
//! sub-formulas that do not depend on `v`, and a formula independent of `v` has derivative
//! `Zero`.
//!
//! ```rust
//! use formula_graph::prelude::*;
//!
//! let v = Variable::new(0, 1).unwrap();
//! let x = Formula::from(v);
//!
//! // d/dx x^3 = 3 * x^2
//! let d = x.pow(3).unwrap().grad(&v).unwrap();
//! assert_eq!(d.to_string(), "(3 * Pow(x0,2))");
//! ```
use crate::error::{FormulaError, Result};
use crate::formula::{Formula, Kind, Node, Variable};
use crate::layer::postorder;

use log::trace;
use std::collections::{HashMap, HashSet};

/// Transposed derivative of `f` with respect to `v`, contracted against `gradin`.
///
/// The input formula is only read; the result shares sub-formulas of `f` where the rules reuse
/// them (e.g. `Exp(F)` in its own derivative).
///
/// # Errors
///
/// - [`FormulaError::DimensionMismatch`] if `gradin.dim() != f.dim()`
/// - [`FormulaError::InvalidExponent`] when differentiating `Pow(F, i32::MIN)`
pub fn diff_t(f: &Formula, v: &Variable, gradin: &Formula) -> Result<Formula> {
    if gradin.dim() != f.dim() {
        return Err(FormulaError::DimensionMismatch {
            op: "DiffT",
            left: f.dim(),
            right: gradin.dim(),
        });
    }

    let order = postorder(f);
    let depends = dependents(&order, v);
    trace!(
        "DiffT w.r.t. x{}: {} of {} nodes depend on it",
        v.index(),
        depends.len(),
        order.len()
    );

    // Seeds accumulated so far, by node. Every node is visited after all of its parents.
    let mut seeds: HashMap<*const Node, Formula> = HashMap::new();
    if depends.contains(&f.as_ptr()) {
        seeds.insert(f.as_ptr(), gradin.clone());
    }

    let mut result = Formula::zero(v.dim())?;
    for node in order.iter().rev() {
        let Some(g) = seeds.remove(&node.as_ptr()) else {
            continue;
        };
        if let Kind::Variable(_) = node.kind() {
            result = result.add(&g)?;
            continue;
        }
        for (child, seed) in transpose(node, &g, &depends)? {
            let seed = match seeds.remove(&child.as_ptr()) {
                Some(acc) => acc.add(&seed)?,
                None => seed,
            };
            seeds.insert(child.as_ptr(), seed);
        }
    }
    Ok(result)
}

// Nodes of `order` (children before parents) with `v` among their leaves.
fn dependents(order: &[Formula], v: &Variable) -> HashSet<*const Node> {
    let mut depends = HashSet::new();
    for node in order {
        let hit = match node.kind() {
            Kind::Variable(w) => w == v,
            _ => node
                .children()
                .iter()
                .any(|c| depends.contains(&c.as_ptr())),
        };
        if hit {
            depends.insert(node.as_ptr());
        }
    }
    depends
}

// Seeds passed from `f`, itself seeded with `g`, to those of its children in `depends`.
fn transpose(
    f: &Formula,
    g: &Formula,
    depends: &HashSet<*const Node>,
) -> Result<Vec<(Formula, Formula)>> {
    let wanted = |c: &Formula| depends.contains(&c.as_ptr());
    let mut seeds = Vec::with_capacity(2);

    match f.kind() {
        Kind::Zero(_) | Kind::IntConstant(_) | Kind::Variable(_) => {}

        // [∂(A + B)]ᵀ.g = [∂A]ᵀ.g + [∂B]ᵀ.g
        Kind::Add => {
            let (a, b) = binary(f)?;
            for c in [a, b] {
                if wanted(c) {
                    seeds.push((c.clone(), g.clone()));
                }
            }
        }

        // [∂(A * B)]ᵀ.g = [∂A]ᵀ.<g|B> + A * [∂B]ᵀ.g
        Kind::Scal => {
            let (a, b) = binary(f)?;
            if wanted(a) {
                seeds.push((a.clone(), g.scalprod(b)?));
            }
            if wanted(b) {
                seeds.push((b.clone(), a.scal(g)?));
            }
        }

        // [∂<A|B>]ᵀ.g = [∂A]ᵀ.(g * B) + [∂B]ᵀ.(g * A)
        Kind::Scalprod => {
            let (a, b) = binary(f)?;
            if wanted(a) {
                seeds.push((a.clone(), g.scal(b)?));
            }
            if wanted(b) {
                seeds.push((b.clone(), g.scal(a)?));
            }
        }

        // [∂exp(F)]ᵀ.g = exp(F) * [∂F]ᵀ.g
        Kind::Exp => {
            let inner = unary(f)?;
            seeds.push((inner.clone(), f.scal(g)?));
        }

        // [∂log(F)]ᵀ.g = F^-1 * [∂F]ᵀ.g
        Kind::Log => {
            let inner = unary(f)?;
            seeds.push((inner.clone(), inner.inv()?.scal(g)?));
        }

        // [∂F^M]ᵀ.g = (M * F^(M-1)) * [∂F]ᵀ.g
        Kind::Pow(m) => {
            let inner = unary(f)?;
            let m1 = m
                .checked_sub(1)
                .ok_or(FormulaError::InvalidExponent { exponent: *m })?;
            let coefficient = Formula::int(*m).scal(&inner.pow(m1)?)?;
            seeds.push((inner.clone(), coefficient.scal(g)?));
        }
    }
    Ok(seeds)
}

fn unary(f: &Formula) -> Result<&Formula> {
    f.children()
        .first()
        .ok_or_else(|| FormulaError::MalformedGraph(format!("{} without operand", f.kind().name())))
}

fn binary(f: &Formula) -> Result<(&Formula, &Formula)> {
    f.operands()
        .ok_or_else(|| FormulaError::MalformedGraph(format!("{} without operands", f.kind().name())))
}

impl Formula {
    /// See [`diff_t`].
    pub fn diff_t(&self, v: &Variable, gradin: &Formula) -> Result<Formula> {
        diff_t(self, v, gradin)
    }

    /// Gradient of a scalar formula: [`diff_t`] with seed `IntConstant(1)`.
    pub fn grad(&self, v: &Variable) -> Result<Formula> {
        diff_t(self, v, &Formula::int(1))
    }
}
