use std::{fmt, ops::Deref};

use crate::ast::{Expr, Predicate, Var};

/// One criterion of a sort stage.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Field path to order by; its root must be the stage's bound variable
    pub var: Var,

    /// Ascending (`asc`) when true, descending (`desc`) otherwise
    pub ascending: bool,
}

impl SortKey {
    pub fn node_count(&self) -> usize {
        1 + self.var.node_count()
    }
}

/// The criteria of a sort stage in priority order.
///
/// Always holds at least one key: it can only be started from a first key
/// and grown from there.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKeys(Vec<SortKey>);

impl SortKeys {
    pub fn new(first: SortKey) -> Self {
        SortKeys(vec![first])
    }

    pub fn push(&mut self, key: SortKey) {
        self.0.push(key);
    }

    pub fn node_count(&self) -> usize {
        self.0.iter().map(SortKey::node_count).sum()
    }
}

impl From<SortKey> for SortKeys {
    fn from(first: SortKey) -> Self {
        SortKeys::new(first)
    }
}

impl Deref for SortKeys {
    type Target = [SortKey];

    fn deref(&self) -> &[SortKey] {
        &self.0
    }
}

impl IntoIterator for SortKeys {
    type Item = SortKey;
    type IntoIter = std::vec::IntoIter<SortKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Pipeline stage.
///
/// Every looping stage carries the variable it binds each element to; all
/// variable references inside the stage are resolved against that name.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Pipeline input: a variable or a JSON literal
    ///
    /// # Example
    /// ```text
    /// $in
    /// [ 1, 2, 3 ]
    /// ```
    Source(Expr),

    /// Keep elements matching the predicate
    ///
    /// # Example
    /// ```text
    /// -> filter each x x.price > 100
    /// ```
    Filter { var: Var, predicate: Predicate },

    /// Map every element through a template
    ///
    /// # Example
    /// ```text
    /// -> transform each x { x.name, "total": x.price * 2 }
    /// ```
    Transform { var: Var, template: Expr },

    /// Flatten the array found at `expr` into the output
    ///
    /// # Example
    /// ```text
    /// -> expand each x x.items
    /// ```
    Expand { var: Var, expr: Var },

    /// Stable ordering by one or more keys
    ///
    /// # Example
    /// ```text
    /// -> sort each x by [ x.a asc, x.b desc ]
    /// ```
    Sort { var: Var, keys: SortKeys },

    /// Keep at most this many elements
    Top(u64),

    /// Pipeline sink; a name stores the result in a variable, `None` prints it
    ///
    /// # Example
    /// ```text
    /// => out
    /// ```
    Output(Option<String>),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Source(_) => StageKind::Source,
            Stage::Filter { .. } => StageKind::Filter,
            Stage::Transform { .. } => StageKind::Transform,
            Stage::Expand { .. } => StageKind::Expand,
            Stage::Sort { .. } => StageKind::Sort,
            Stage::Top(_) => StageKind::Top,
            Stage::Output(_) => StageKind::Output,
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Stage::Source(expr) => expr.node_count(),
            Stage::Filter { var, predicate } => 1 + var.node_count() + predicate.node_count(),
            Stage::Transform { var, template } => 1 + var.node_count() + template.node_count(),
            Stage::Expand { var, expr } => 1 + var.node_count() + expr.node_count(),
            Stage::Sort { var, keys } => 1 + var.node_count() + keys.node_count(),
            Stage::Top(_) | Stage::Output(_) => 1,
        }
    }
}

/// Stage names as they appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Source,
    Filter,
    Transform,
    Expand,
    Sort,
    Top,
    Output,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Source => "source",
            StageKind::Filter => "filter",
            StageKind::Transform => "transform",
            StageKind::Expand => "expand",
            StageKind::Sort => "sort",
            StageKind::Top => "top",
            StageKind::Output => "output",
        };
        f.write_str(name)
    }
}
