//! Variable environment shared between statements.
//!
//! Statements ending in `=> name` store their result under `name`, and later
//! statements read it back as pipeline input. What is stored is up to the
//! execution engine: the environment only maps names to opaque handles and
//! owns them until they are replaced, removed or the environment is dropped.

/// Errors raised by environment lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    /// Lookup of a name that was never assigned
    NoSuchVariable(String),
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::NoSuchVariable(name) => write!(f, "no such variable: {}", name),
        }
    }
}

impl std::error::Error for EnvError {}

/// Insertion-ordered map from variable names to engine handles.
///
/// # Examples
///
/// ```
/// use jaql_ast::env::VarEnv;
///
/// let mut env = VarEnv::new();
/// env.set("out", 7u32);
/// assert_eq!(env.get("out"), Ok(&7));
/// assert!(env.get("missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct VarEnv<H> {
    vars: Vec<(String, H)>,
}

impl<H> Default for VarEnv<H> {
    fn default() -> Self {
        VarEnv { vars: Vec::new() }
    }
}

impl<H> VarEnv<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the handle stored under `name`.
    pub fn get(&self, name: &str) -> Result<&H, EnvError> {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h)
            .ok_or_else(|| EnvError::NoSuchVariable(name.to_string()))
    }

    /// Store `handle` under `name`.
    ///
    /// An existing entry keeps its position and its old handle is returned;
    /// new names are appended.
    pub fn set(&mut self, name: impl Into<String>, handle: H) -> Option<H> {
        let name = name.into();
        match self.vars.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, handle)),
            None => {
                self.vars.push((name, handle));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<H> {
        let idx = self.vars.iter().position(|(n, _)| n == name)?;
        Some(self.vars.remove(idx).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Names and handles in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> {
        self.vars.iter().map(|(n, h)| (n.as_str(), h))
    }

    /// Drop every stored handle.
    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut env = VarEnv::new();
        env.set("a", 1);
        env.set("b", 2);
        assert_eq!(env.set("a", 3), Some(1));

        let names: Vec<_> = env.iter().map(|(n, h)| (n.to_string(), *h)).collect();
        assert_eq!(names, vec![("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_missing_variable_message() {
        let env: VarEnv<()> = VarEnv::new();
        assert_eq!(env.get("x").unwrap_err().to_string(), "no such variable: x");
    }

    #[test]
    fn test_remove() {
        let mut env = VarEnv::new();
        env.set("a", "h");
        assert_eq!(env.remove("a"), Some("h"));
        assert!(env.is_empty());
        assert_eq!(env.remove("a"), None);
    }
}
