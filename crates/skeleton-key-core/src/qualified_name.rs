use std::fmt;

use crate::TypeHash;

/// Qualified name of a registered type or capability interface.
///
/// The simple name is what signatures render and what conversion hints are
/// compared against.
///
/// # Examples
///
/// ```
/// use skeleton_key_core::QualifiedName;
///
/// let house = QualifiedName::global("House");
/// assert_eq!(house.to_string(), "House");
///
/// let key = QualifiedName::from_qualified_string("examples::house::Key");
/// assert_eq!(key.simple_name(), "Key");
/// assert_eq!(key.to_string(), "examples::house::Key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Simple name (e.g., "House", "Key")
    pub name: String,
    /// Namespace path, empty for the global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a qualified string (e.g., "house::Key").
    ///
    /// Splits on "::"; the last segment is the name. Leading "::" is ignored.
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split("::")
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Compute the TypeHash of this name.
    pub fn to_type_hash(&self) -> TypeHash {
        TypeHash::from_name(&self.to_string())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}

impl From<&QualifiedName> for QualifiedName {
    fn from(name: &QualifiedName) -> Self {
        name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_name() {
        let name = QualifiedName::global("House");
        assert!(name.is_global());
        assert_eq!(name.simple_name(), "House");
        assert_eq!(name.to_string(), "House");
    }

    #[test]
    fn from_qualified_string() {
        let name = QualifiedName::from_qualified_string("examples::house::Safe");
        assert_eq!(name.name, "Safe");
        assert_eq!(name.namespace, vec!["examples", "house"]);
    }

    #[test]
    fn leading_colons_are_normalized() {
        assert_eq!(
            QualifiedName::from_qualified_string("::house::Key"),
            QualifiedName::from_qualified_string("house::Key")
        );
        assert_eq!(QualifiedName::from_qualified_string("::").name, "");
    }

    #[test]
    fn hash_follows_full_name() {
        let a = QualifiedName::from("a::Key");
        let b = QualifiedName::from("b::Key");
        assert_eq!(a.simple_name(), b.simple_name());
        assert_ne!(a.to_type_hash(), b.to_type_hash());
    }
}
