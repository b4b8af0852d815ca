use crate::error::{FormulaError, Result};

use log::trace;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An opaque external input, identified by a stable index and a declared dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "VariableFields"))]
pub struct Variable {
    index: usize,
    dim: usize,
}

// Deserialized form of a `Variable`, validated through `Variable::new`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VariableFields {
    index: usize,
    dim: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<VariableFields> for Variable {
    type Error = FormulaError;

    fn try_from(fields: VariableFields) -> Result<Self> {
        Variable::new(fields.index, fields.dim)
    }
}

impl Variable {
    /// Declare variable `index` of dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::InvalidDimension`] if `dim == 0`.
    pub fn new(index: usize, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(FormulaError::InvalidDimension { dim });
        }
        Ok(Variable { index, dim })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

/// The tag of a [`Node`], together with its kind-specific payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    /// The zero vector of the given dimension.
    Zero(usize),
    /// A scalar integer constant.
    IntConstant(i32),
    Variable(Variable),
    /// Element-wise sum of two vectors of equal dimension.
    Add,
    /// Scalar (first child) times vector (second child).
    Scal,
    /// Dot product of two vectors of equal dimension.
    Scalprod,
    Exp,
    Log,
    /// Integer power of a scalar.
    Pow(i32),
}

impl Kind {
    /// Number of children a node of this kind owns.
    pub fn arity(&self) -> usize {
        match self {
            Kind::Zero(_) | Kind::IntConstant(_) | Kind::Variable(_) => 0,
            Kind::Exp | Kind::Log | Kind::Pow(_) => 1,
            Kind::Add | Kind::Scal | Kind::Scalprod => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Zero(_) => "Zero",
            Kind::IntConstant(_) => "IntConstant",
            Kind::Variable(_) => "Variable",
            Kind::Add => "Add",
            Kind::Scal => "Scal",
            Kind::Scalprod => "Scalprod",
            Kind::Exp => "Exp",
            Kind::Log => "Log",
            Kind::Pow(_) => "Pow",
        }
    }

    /// Compute the output dimension of a node of this kind over `children`, checking the
    /// dimension rules of the kind.
    pub fn output_dim(&self, children: &[Formula]) -> Result<usize> {
        if children.len() != self.arity() {
            return Err(FormulaError::MalformedGraph(format!(
                "{} expects {} children, got {}",
                self.name(),
                self.arity(),
                children.len()
            )));
        }

        let op = self.name();
        match self {
            Kind::Zero(dim) => positive(*dim),
            Kind::IntConstant(_) => Ok(1),
            Kind::Variable(v) => positive(v.dim),
            Kind::Add => {
                let (a, b) = (children[0].dim(), children[1].dim());
                if a != b {
                    return Err(FormulaError::DimensionMismatch { op, left: a, right: b });
                }
                Ok(a)
            }
            Kind::Scal => {
                let (a, b) = (children[0].dim(), children[1].dim());
                if a != 1 {
                    return Err(FormulaError::DimensionMismatch { op, left: a, right: b });
                }
                Ok(b)
            }
            Kind::Scalprod => {
                let (a, b) = (children[0].dim(), children[1].dim());
                if a != b {
                    return Err(FormulaError::DimensionMismatch { op, left: a, right: b });
                }
                Ok(1)
            }
            Kind::Exp | Kind::Log | Kind::Pow(_) => {
                let f = children[0].dim();
                if f != 1 {
                    return Err(FormulaError::DimensionMismatch { op, left: 1, right: f });
                }
                Ok(1)
            }
        }
    }
}

fn positive(dim: usize) -> Result<usize> {
    if dim == 0 {
        Err(FormulaError::InvalidDimension { dim })
    } else {
        Ok(dim)
    }
}

/// A single operation in a formula graph.
///
/// # Invariants
///
/// - `children.len() == kind.arity()`
/// - `dim` is the value of [`Kind::output_dim`] on `children`
///
/// Both are established when the node is allocated and never change afterwards.
#[derive(Debug)]
pub struct Node {
    kind: Kind,
    dim: usize,
    children: Vec<Formula>,
    // Structural hash over kind, dim and the hashes of the children
    hash: u64,
}

impl Node {
    fn new(kind: Kind, dim: usize, children: Vec<Formula>) -> Node {
        let mut hasher = DefaultHasher::new();
        kind.hash(&mut hasher);
        dim.hash(&mut hasher);
        for child in &children {
            child.0.hash.hash(&mut hasher);
        }
        let hash = hasher.finish();
        Node {
            kind,
            dim,
            children,
            hash,
        }
    }
}

// Release uniquely owned descendants from a work list, so that dropping a deep formula does not
// recurse once per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Ok(mut node) = Arc::try_unwrap(child.0) {
                pending.append(&mut node.children);
            }
        }
    }
}

/// A shared, immutable reference to the root [`Node`] of a formula.
///
/// Equality is structural: two independently built formulas with the same kinds, payloads and
/// children compare equal.
#[derive(Clone, Debug)]
pub struct Formula(pub(crate) Arc<Node>);

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.0.hash != other.0.hash {
            return false;
        }

        // Pairs already queued are not compared twice, so shared sub-formulas cost one visit.
        let mut seen: HashSet<(*const Node, *const Node)> = HashSet::new();
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.ptr_eq(b) || !seen.insert((a.as_ptr(), b.as_ptr())) {
                continue;
            }
            if a.0.hash != b.0.hash || a.kind() != b.kind() || a.dim() != b.dim() {
                return false;
            }
            stack.extend(a.children().iter().zip(b.children()));
        }
        true
    }
}

// Consistent with `Eq`: structurally equal formulas have equal structural hashes.
impl Hash for Formula {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state);
    }
}

impl Eq for Formula {}

impl Formula {
    /// Allocate a node of kind `kind` over `children` without consulting any rewrite rule.
    ///
    /// This is the fallthrough of every rule table; it is also how flat graphs are rebuilt
    /// exactly as they were described.
    ///
    /// # Errors
    ///
    /// Fails if the number of children or their dimensions do not fit `kind`.
    pub fn generic(kind: Kind, children: Vec<Formula>) -> Result<Formula> {
        let dim = kind.output_dim(&children)?;
        trace!("allocating {} node of dimension {}", kind.name(), dim);
        Ok(Formula(Arc::new(Node::new(kind, dim, children))))
    }

    /// The zero vector of dimension `dim`.
    pub fn zero(dim: usize) -> Result<Formula> {
        Formula::generic(Kind::Zero(dim), vec![])
    }

    /// The scalar integer constant `n`.
    pub fn int(n: i32) -> Formula {
        Formula(Arc::new(Node::new(Kind::IntConstant(n), 1, vec![])))
    }

    /// A leaf standing for variable `index` of dimension `dim`.
    pub fn variable(index: usize, dim: usize) -> Result<Formula> {
        Ok(Variable::new(index, dim)?.into())
    }

    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// Output dimension: the length of the buffer this formula evaluates to.
    pub fn dim(&self) -> usize {
        self.0.dim
    }

    pub fn children(&self) -> &[Formula] {
        &self.0.children
    }

    /// Both operands of a binary node.
    pub fn operands(&self) -> Option<(&Formula, &Formula)> {
        match self.children() {
            [a, b] => Some((a, b)),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self.kind(), Kind::Zero(_))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.kind() {
            Kind::IntConstant(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<Variable> {
        match self.kind() {
            Kind::Variable(v) => Some(*v),
            _ => None,
        }
    }

    /// Identity of the underlying node, as opposed to structural equality.
    pub fn ptr_eq(&self, other: &Formula) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn as_ptr(&self) -> *const Node {
        Arc::as_ptr(&self.0)
    }
}

impl From<Variable> for Formula {
    fn from(v: Variable) -> Self {
        Formula(Arc::new(Node::new(Kind::Variable(v), v.dim, vec![])))
    }
}
