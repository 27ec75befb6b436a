use crate::ast::Stage;

/// An ordered chain of stages, input first.
///
/// Stages are appended in parse order and never reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Start a pipeline with its first stage (usually its input).
    pub fn new(first: Stage) -> Self {
        Pipeline {
            stages: vec![first],
        }
    }

    /// Append to the tail of the chain.
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }

    /// Total number of nodes in the tree, every stage included.
    pub fn node_count(&self) -> usize {
        self.stages.iter().map(Stage::node_count).sum()
    }
}
