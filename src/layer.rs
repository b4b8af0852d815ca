//! Traversal and layering of formula graphs.
//!
//! A formula is a DAG: a sub-formula may be shared by several parents. The functions here visit
//! each *distinct* node (by identity, not structure) exactly once.
use crate::formula::{Formula, Node};

use std::collections::{HashMap, HashSet};

/// All distinct nodes of `f`, children before parents, ending with `f` itself.
pub fn postorder(f: &Formula) -> Vec<Formula> {
    let mut order = Vec::new();
    let mut visited: HashSet<*const Node> = HashSet::new();

    // (node, children already pushed)
    let mut stack = vec![(f.clone(), false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if !visited.insert(node.as_ptr()) {
            continue;
        }
        stack.push((node.clone(), true));
        for child in node.children().iter().rev() {
            if !visited.contains(&child.as_ptr()) {
                stack.push((child.clone(), false));
            }
        }
    }
    order
}

/// Compute a *layering* of `f`: distinct nodes grouped by height, where leaves are in layer 0
/// and every other node sits one layer above its highest child.
///
/// Nodes in the same layer never depend on each other, so a kernel may evaluate a whole layer
/// at once.
pub fn layer(f: &Formula) -> Vec<Vec<Formula>> {
    let mut height: HashMap<*const Node, usize> = HashMap::new();
    let mut layers: Vec<Vec<Formula>> = Vec::new();

    for node in postorder(f) {
        let h = node
            .children()
            .iter()
            .map(|c| height[&c.as_ptr()] + 1)
            .max()
            .unwrap_or(0);
        height.insert(node.as_ptr(), h);

        if layers.len() <= h {
            layers.resize_with(h + 1, Vec::new);
        }
        layers[h].push(node);
    }
    layers
}

impl Formula {
    /// Number of distinct nodes in this formula.
    pub fn size(&self) -> usize {
        postorder(self).len()
    }
}
