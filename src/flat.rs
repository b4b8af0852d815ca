//! A flat, array-based description of a formula graph.
//!
//! Nodes are stored in an array with children before parents; each node refers to its children
//! by position. This is the form in which a formula is handed to code generators or persisted
//! (with the `serde` feature).
//!
//! ```rust
//! use formula_graph::prelude::*;
//!
//! let x = Formula::variable(0, 1).unwrap();
//! let e = x.exp().unwrap();
//! let f = e.add(&e.log().unwrap()).unwrap();
//!
//! let flat = f.to_flat();
//! // x, Exp(x), Log(Exp(x)) and the sum: the shared Exp(x) is stored once
//! assert_eq!(flat.nodes.len(), 4);
//! assert_eq!(flat.to_formula().unwrap(), f);
//! ```
use crate::error::{FormulaError, Result};
use crate::formula::{Formula, Kind, Node};
use crate::layer::postorder;

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatNode {
    pub kind: Kind,
    pub dim: usize,
    /// Positions of the children in [`FlatFormula::nodes`], all smaller than this node's own.
    pub children: Vec<usize>,
}

/// Distinct nodes of a formula in topological order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatFormula {
    pub nodes: Vec<FlatNode>,
    pub root: usize,
}

impl Formula {
    /// Flatten this formula, storing each distinct node once.
    pub fn to_flat(&self) -> FlatFormula {
        let order = postorder(self);
        let position: HashMap<*const Node, usize> = order
            .iter()
            .enumerate()
            .map(|(i, f)| (f.as_ptr(), i))
            .collect();

        let nodes = order
            .iter()
            .map(|f| FlatNode {
                kind: *f.kind(),
                dim: f.dim(),
                children: f.children().iter().map(|c| position[&c.as_ptr()]).collect(),
            })
            .collect();

        FlatFormula {
            nodes,
            root: order.len() - 1,
        }
    }
}

impl FlatFormula {
    /// Rebuild the formula node by node, without rewriting, so the result has exactly the
    /// described structure.
    ///
    /// # Errors
    ///
    /// Fails if a child index does not point to an earlier node, if a node breaks the dimension
    /// rules of its kind, or if a stored `dim` disagrees with the one implied by its children.
    pub fn to_formula(&self) -> Result<Formula> {
        let mut built: Vec<Formula> = Vec::with_capacity(self.nodes.len());

        for (i, node) in self.nodes.iter().enumerate() {
            let children = node
                .children
                .iter()
                .map(|&c| {
                    if c < i {
                        Ok(built[c].clone())
                    } else {
                        Err(FormulaError::MalformedGraph(format!(
                            "node {i} refers to child {c}, which does not precede it"
                        )))
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            let f = Formula::generic(node.kind, children)?;
            if f.dim() != node.dim {
                return Err(FormulaError::MalformedGraph(format!(
                    "node {i} declares dimension {} but computes {}",
                    node.dim,
                    f.dim()
                )));
            }
            built.push(f);
        }

        built
            .get(self.root)
            .cloned()
            .ok_or_else(|| FormulaError::MalformedGraph(format!("no root node {}", self.root)))
    }
}
