use crate::ast::{BoolOp, CmpOp, Expr};

/// Boolean test evaluated by a filter stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Simple comparison
    ///
    /// # Example
    /// ```text
    /// x.price > 100
    /// ```
    Compare {
        left: Expr,
        op: CmpOp,
        right: Expr,
    },

    /// Predicates joined by a boolean connective.
    ///
    /// `left` is absent for the unary `!`.
    ///
    /// # Example
    /// ```text
    /// x.a == 1 && x.b < 2
    /// !(x.a > 1)
    /// ```
    Compound {
        left: Option<Box<Predicate>>,
        op: BoolOp,
        right: Box<Predicate>,
    },
}

impl Predicate {
    /// True for a bare `==` comparison, the only shape `!` folds into.
    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            Predicate::Compare {
                op: CmpOp::Equal,
                ..
            }
        )
    }

    pub fn node_count(&self) -> usize {
        match self {
            Predicate::Compare { left, right, .. } => 2 + left.node_count() + right.node_count(),
            Predicate::Compound { left, right, .. } => {
                2 + left.as_ref().map_or(0, |p| p.node_count()) + right.node_count()
            }
        }
    }
}
