//! Class entry.

use std::sync::Arc;

use crate::{QualifiedName, Slots, TypeHash};

use super::{ConstructorEntry, FieldEntry, MethodEntry};

/// A registered class with its declared members.
///
/// Members are kept in declaration order; lookups that may match more than
/// one member (overloads) return them in that order.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    /// Qualified name.
    pub name: QualifiedName,
    /// Hash of the qualified name.
    pub type_hash: TypeHash,
    /// Direct base class; `None` only for the root sentinel.
    pub base: Option<QualifiedName>,
    /// Names of capability interfaces this class declares it implements.
    pub interfaces: Vec<QualifiedName>,
    /// Declared fields.
    pub fields: Vec<Arc<FieldEntry>>,
    /// Declared methods.
    pub methods: Vec<Arc<MethodEntry>>,
    /// Declared constructors.
    pub constructors: Vec<Arc<ConstructorEntry>>,
    /// Static field storage, shared by every instance.
    pub statics: Arc<Slots>,
}

impl ClassEntry {
    /// Create an empty class entry.
    pub fn new(name: QualifiedName, base: Option<QualifiedName>) -> Self {
        Self {
            type_hash: name.to_type_hash(),
            name,
            base,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            statics: Arc::new(Slots::new()),
        }
    }

    /// Find a declared field by name.
    pub fn find_field(&self, name: &str) -> Option<&Arc<FieldEntry>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared methods with this name, in declaration order.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<MethodEntry>> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// The declared no-argument constructor, if any.
    pub fn default_constructor(&self) -> Option<&Arc<ConstructorEntry>> {
        self.constructors.iter().find(|c| c.is_default())
    }

    /// Check if this class is the root sentinel.
    pub fn is_root(&self) -> bool {
        self.base.is_none()
    }

    /// The simple name.
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }
}
