use crate::ast::StageKind;

/// Errors that can occur while constructing a statement's tree.
///
/// A statement either builds completely or yields exactly one of these; the
/// message is what the driver shows the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A stage references a variable other than the one it binds
    UnknownVariable { stage: StageKind, name: String },

    /// Negative `top` count
    InvalidLimit(i64),

    /// Arithmetic with a string or boolean operand
    ArithmeticOnNonNumeric,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::UnknownVariable { stage, name } => {
                write!(f, "{}: unknown variable: {}", stage, name)
            }
            BuildError::InvalidLimit(n) => write!(f, "top: invalid limit: {}", n),
            BuildError::ArithmeticOnNonNumeric => {
                write!(f, "cannot perform arithmetic on string or boolean values")
            }
        }
    }
}

impl std::error::Error for BuildError {}

pub type Result<T> = std::result::Result<T, BuildError>;
