use crate::ast::ArithOp;

/// A variable reference, optionally followed by a dotted field path.
///
/// # Example
/// ```text
/// $            // Var { name: "$", path: [] }
/// x.a.b        // Var { name: "x", path: ["a", "b"] }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    /// The bound name this reference resolves against
    pub name: String,

    /// Field names, outermost first
    pub path: Vec<String>,
}

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        Var {
            name: name.into(),
            path: Vec::new(),
        }
    }

    /// True when this is a bare reference without a field path.
    pub fn is_bare(&self) -> bool {
        self.path.is_empty()
    }

    /// The last segment of the dotted path, or the root name for a bare
    /// reference. Used to name object pairs built from a variable.
    pub fn leaf_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or(self.name.as_str())
    }

    /// One node for the root plus one per path segment.
    pub fn node_count(&self) -> usize {
        1 + self.path.len()
    }
}

/// One `"name": value` field of an object constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub name: String,
    pub value: Expr,
}

impl Pair {
    pub fn node_count(&self) -> usize {
        1 + self.value.node_count()
    }
}

/// Value-producing expression.
///
/// Appears in transform templates, predicate operands and as the input of a
/// pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Opaque JSON text passed through untouched
    ///
    /// # Example
    /// ```text
    /// [ {"a": 1}, {"a": 2} ]
    /// ```
    Json(String),

    /// Object constructor
    ///
    /// # Example
    /// ```text
    /// { "total": x.price * 2, x.name }
    /// ```
    Object(Vec<Pair>),

    /// Array constructor; elements may be any expression
    Array(Vec<Expr>),

    /// Variable reference or field path
    Var(Var),

    /// Arithmetic that could not be folded at construction time.
    ///
    /// For `+` and `*`, a variable or nested operand always sits in `left`.
    /// `-` and `/` keep the written order, so code generation must accept a
    /// literal on the left of either.
    Operation {
        left: Box<Expr>,
        op: ArithOp,
        right: Box<Expr>,
    },

    /// Integer literal
    Integer(i64),

    /// Double literal
    Double(f64),

    /// String literal
    String(String),

    /// Boolean literal
    Boolean(bool),
}

impl Expr {
    /// Variables and operations; the shapes code generation evaluates per
    /// element rather than once.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Expr::Var(_) | Expr::Operation { .. })
    }

    /// Integer or double literal.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Expr::Integer(_) | Expr::Double(_))
    }

    /// String or boolean literal; neither takes part in arithmetic.
    pub fn is_non_numeric_scalar(&self) -> bool {
        matches!(self, Expr::String(_) | Expr::Boolean(_))
    }

    /// Number of tree nodes this expression occupies, operators included.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Json(_)
            | Expr::Integer(_)
            | Expr::Double(_)
            | Expr::String(_)
            | Expr::Boolean(_) => 1,
            Expr::Var(var) => var.node_count(),
            Expr::Object(pairs) => 1 + pairs.iter().map(Pair::node_count).sum::<usize>(),
            Expr::Array(elems) => 1 + elems.iter().map(Expr::node_count).sum::<usize>(),
            Expr::Operation { left, right, .. } => 2 + left.node_count() + right.node_count(),
        }
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::Var(var)
    }
}
