//! A reference evaluator for formulas.
//!
//! [`operation`] is the numeric contract of each node kind: given the evaluated buffers of its
//! children, fill the node's output buffer. [`eval`] drives it bottom-up, layer by layer, and
//! computes each shared sub-formula once.
use crate::error::{FormulaError, Result};
use crate::formula::{Formula, Kind, Node, Variable};
use crate::layer::layer;

use num_traits::Float;
use std::collections::HashMap;

/// Numeric buffers bound to variables, keyed by variable index.
#[derive(Clone, Debug, Default)]
pub struct Bindings<T> {
    values: HashMap<usize, Vec<T>>,
}

impl<T: Float> Bindings<T> {
    pub fn new() -> Self {
        Bindings {
            values: HashMap::new(),
        }
    }

    /// Bind `values` to `v`, replacing any previous binding of the same index.
    ///
    /// # Errors
    ///
    /// [`FormulaError::BindingLength`] if `values.len() != v.dim()`.
    pub fn bind(&mut self, v: &Variable, values: Vec<T>) -> Result<&mut Self> {
        if values.len() != v.dim() {
            return Err(FormulaError::BindingLength {
                index: v.index(),
                expected: v.dim(),
                got: values.len(),
            });
        }
        self.values.insert(v.index(), values);
        Ok(self)
    }

    /// Builder form of [`Bindings::bind`].
    pub fn with(mut self, v: &Variable, values: Vec<T>) -> Result<Self> {
        self.bind(v, values)?;
        Ok(self)
    }

    pub fn get(&self, index: usize) -> Option<&[T]> {
        self.values.get(&index).map(|v| v.as_slice())
    }
}

// Integer constants always fit in a float.
fn constant<T: Float>(n: i32) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

/// Compute the output of a node of kind `kind` into `out` from the outputs of its children.
///
/// `inputs[i]` must have the dimension of child `i` and `out` the dimension of the node.
///
/// # Errors
///
/// Variables have no operation: their buffers come from [`Bindings`], so a `Variable` kind
/// yields [`FormulaError::UnboundVariable`].
pub fn operation<T: Float>(kind: &Kind, inputs: &[&[T]], out: &mut [T]) -> Result<()> {
    debug_assert_eq!(inputs.len(), kind.arity());
    match kind {
        Kind::Zero(_) => out.fill(T::zero()),
        Kind::IntConstant(n) => out[0] = constant(*n),
        Kind::Variable(v) => return Err(FormulaError::UnboundVariable { index: v.index() }),
        Kind::Add => {
            for (k, o) in out.iter_mut().enumerate() {
                *o = inputs[0][k] + inputs[1][k];
            }
        }
        Kind::Scal => {
            let a = inputs[0][0];
            for (o, &b) in out.iter_mut().zip(inputs[1]) {
                *o = a * b;
            }
        }
        Kind::Scalprod => {
            out[0] = inputs[0]
                .iter()
                .zip(inputs[1])
                .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
        }
        Kind::Exp => out[0] = inputs[0][0].exp(),
        Kind::Log => out[0] = inputs[0][0].ln(),
        Kind::Pow(m) => out[0] = inputs[0][0].powi(*m),
    }
    Ok(())
}

/// Evaluate `f` with variable buffers taken from `bindings`.
///
/// # Errors
///
/// - [`FormulaError::UnboundVariable`] if a variable of `f` has no buffer
/// - [`FormulaError::BindingLength`] if a buffer was bound under the index of a variable with
///   another dimension
pub fn eval<T: Float>(f: &Formula, bindings: &Bindings<T>) -> Result<Vec<T>> {
    // Outputs of every node evaluated so far
    let mut mem: HashMap<*const Node, Vec<T>> = HashMap::new();

    for nodes in layer(f) {
        for node in nodes {
            let value = match node.kind() {
                Kind::Variable(v) => {
                    let values = bindings
                        .get(v.index())
                        .ok_or(FormulaError::UnboundVariable { index: v.index() })?;
                    if values.len() != v.dim() {
                        return Err(FormulaError::BindingLength {
                            index: v.index(),
                            expected: v.dim(),
                            got: values.len(),
                        });
                    }
                    values.to_vec()
                }
                kind => {
                    let inputs: Vec<&[T]> = node
                        .children()
                        .iter()
                        .map(|c| mem[&c.as_ptr()].as_slice())
                        .collect();
                    let mut out = vec![T::zero(); node.dim()];
                    operation(kind, &inputs, &mut out)?;
                    out
                }
            };
            mem.insert(node.as_ptr(), value);
        }
    }

    mem.remove(&f.as_ptr())
        .ok_or_else(|| FormulaError::MalformedGraph("root was not evaluated".to_string()))
}

impl Formula {
    /// See [`eval`].
    pub fn eval<T: Float>(&self, bindings: &Bindings<T>) -> Result<Vec<T>> {
        eval(self, bindings)
    }
}
