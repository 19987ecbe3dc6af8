//! TypeRegistry - owner of all target and capability metadata.
//!
//! The registry stores registered classes and capability interfaces by
//! qualified name, walks class ancestry, answers assignability questions and
//! allocates instances.
//!
//! # Lifecycle
//!
//! The registry is populated single-threaded during setup and is read-only
//! afterwards; binders share it behind an `Arc`. The only metadata that
//! changes after setup is a field's FINAL bit (see
//! [`FieldEntry::strip_final`](skeleton_key_core::FieldEntry::strip_final))
//! and the contents of static field storage.
//!
//! # Example
//!
//! ```
//! use skeleton_key_registry::TypeRegistry;
//! use skeleton_key_core::{QualifiedName, Value};
//!
//! let mut registry = TypeRegistry::with_builtins();
//! registry
//!     .register_type("LockedObject")
//!     .field("private String myField")?
//!     .build()?;
//!
//! let name = QualifiedName::global("LockedObject");
//! let obj = registry.instantiate(&name)?;
//! assert_eq!(obj.get_declared(&name, "myField"), Some(Value::Null));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use skeleton_key_core::{
    CapabilityInterface, ClassEntry, ConstructorEntry, DataType, Object, ObjectRef, QualifiedName,
    ROOT_TYPE, RegistrationError, ResolveError, STRING_TYPE, Slots, TargetError, Value,
};

use crate::ClassBuilder;

/// A registered type.
#[derive(Debug, Clone)]
pub enum TypeEntry {
    Class(Arc<ClassEntry>),
    Interface(Arc<CapabilityInterface>),
}

impl TypeEntry {
    pub fn as_class(&self) -> Option<&Arc<ClassEntry>> {
        match self {
            TypeEntry::Class(class) => Some(class),
            TypeEntry::Interface(_) => None,
        }
    }

    pub fn as_interface(&self) -> Option<&Arc<CapabilityInterface>> {
        match self {
            TypeEntry::Interface(iface) => Some(iface),
            TypeEntry::Class(_) => None,
        }
    }
}

/// Registry of classes and capability interfaces.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: FxHashMap<QualifiedName, TypeEntry>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the root sentinel and `String` registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register the root sentinel and `String`, if missing.
    pub fn register_builtins(&mut self) {
        let root = QualifiedName::global(ROOT_TYPE);
        self.types
            .entry(root.clone())
            .or_insert_with(|| TypeEntry::Class(Arc::new(ClassEntry::new(root.clone(), None))));

        let string = QualifiedName::global(STRING_TYPE);
        self.types.entry(string.clone()).or_insert_with(|| {
            TypeEntry::Class(Arc::new(ClassEntry::new(string, Some(root))))
        });
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Start building a class.
    pub fn register_type(&mut self, name: impl Into<QualifiedName>) -> ClassBuilder<'_> {
        ClassBuilder::new(self, name.into())
    }

    /// Register a class entry.
    ///
    /// The base class must already be registered. Static field storage is
    /// seeded with each static field's initial value.
    pub fn register_class(&mut self, entry: ClassEntry) -> Result<(), RegistrationError> {
        if self.types.contains_key(&entry.name) {
            return Err(RegistrationError::DuplicateType(entry.name.to_string()));
        }
        if let Some(base) = &entry.base
            && self.get_class(base).is_none()
        {
            return Err(RegistrationError::UnknownBaseClass {
                class: entry.name.to_string(),
                base: base.to_string(),
            });
        }

        for field in entry.fields.iter().filter(|f| f.is_static()) {
            entry.statics.set(field.id, field.initial_value());
        }

        debug!(
            class = %entry.name,
            fields = entry.fields.len(),
            methods = entry.methods.len(),
            constructors = entry.constructors.len(),
            "registered class"
        );
        self.types
            .insert(entry.name.clone(), TypeEntry::Class(Arc::new(entry)));
        Ok(())
    }

    /// Register a capability interface.
    pub fn register_interface(
        &mut self,
        iface: CapabilityInterface,
    ) -> Result<Arc<CapabilityInterface>, RegistrationError> {
        if self.types.contains_key(iface.name()) {
            return Err(RegistrationError::DuplicateType(iface.name().to_string()));
        }
        debug!(
            interface = %iface.name(),
            operations = iface.operations().len(),
            "registered capability interface"
        );
        let iface = Arc::new(iface);
        self.types
            .insert(iface.name().clone(), TypeEntry::Interface(Arc::clone(&iface)));
        Ok(iface)
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get a type by qualified name.
    pub fn get(&self, name: &QualifiedName) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    /// Get a class by qualified name.
    pub fn get_class(&self, name: &QualifiedName) -> Option<&Arc<ClassEntry>> {
        self.types.get(name).and_then(TypeEntry::as_class)
    }

    /// Get a class, failing with `UnknownType`.
    pub fn class(&self, name: &QualifiedName) -> Result<&Arc<ClassEntry>, ResolveError> {
        self.get_class(name)
            .ok_or_else(|| ResolveError::UnknownType(name.to_string()))
    }

    /// Get a capability interface by qualified name.
    pub fn get_interface(&self, name: &QualifiedName) -> Option<&Arc<CapabilityInterface>> {
        self.types.get(name).and_then(TypeEntry::as_interface)
    }

    /// Get a capability interface, failing with `UnknownInterface`.
    pub fn interface(&self, name: &QualifiedName) -> Result<&Arc<CapabilityInterface>, ResolveError> {
        self.get_interface(name)
            .ok_or_else(|| ResolveError::UnknownInterface(name.to_string()))
    }

    /// Iterate over registered classes.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassEntry>> {
        self.types.values().filter_map(TypeEntry::as_class)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==========================================================================
    // Inheritance
    // ==========================================================================

    /// The ancestry of a class, most-derived first.
    ///
    /// Starts with the class itself and stops before the root sentinel, so
    /// members declared on the root are never visible through it. Each level
    /// is visited once even if the base chain is cyclic.
    pub fn ancestry(&self, name: &QualifiedName) -> Vec<&Arc<ClassEntry>> {
        let mut chain: Vec<&Arc<ClassEntry>> = Vec::new();
        let mut current = self.get_class(name);

        while let Some(class) = current
            && !class.is_root()
            && !chain.iter().any(|c| c.name == class.name)
        {
            trace!(level = %class.name, "ancestry level");
            chain.push(class);
            current = class.base.as_ref().and_then(|base| self.get_class(base));
        }

        chain
    }

    /// Check if `class` is `ancestor` or derives from it.
    pub fn is_subclass(&self, class: &QualifiedName, ancestor: &QualifiedName) -> bool {
        if ancestor.simple_name() == ROOT_TYPE && ancestor.is_global() {
            return self.get_class(class).is_some();
        }
        self.ancestry(class).iter().any(|c| &c.name == ancestor)
    }

    /// Check if a class, or any of its ancestors, implements an interface.
    pub fn implements(&self, class: &QualifiedName, iface: &QualifiedName) -> bool {
        self.ancestry(class)
            .iter()
            .any(|c| c.interfaces.iter().any(|i| i == iface))
    }

    /// Check if a value of type `from` may be stored where `to` is declared.
    ///
    /// Primitives are only assignable to themselves; the root accepts every
    /// reference type.
    pub fn is_assignable(&self, to: &DataType, from: &DataType) -> bool {
        if to == from {
            return true;
        }
        match (to, from) {
            (DataType::Object(to), DataType::Boxed(_)) => is_root(to),
            (DataType::Object(to), DataType::Object(from)) => {
                is_root(to)
                    || self.is_subclass(from, to)
                    || (self.get_interface(to).is_some() && self.implements(from, to))
            }
            _ => false,
        }
    }

    /// Check if a runtime value fits a declared type.
    ///
    /// Primitive and boxed declarations accept either form of the same
    /// primitive. Null fits reference types only.
    pub fn value_conforms(&self, declared: &DataType, value: &Value) -> bool {
        let Some(actual) = value.runtime_type() else {
            return declared.is_reference();
        };
        match declared.primitive_kind() {
            Some(kind) => actual.primitive_kind() == Some(kind),
            None => self.is_assignable(declared, &actual.boxed()),
        }
    }

    // ==========================================================================
    // Instantiation
    // ==========================================================================

    /// Allocate an instance with every instance field at its initial value.
    ///
    /// No constructor body runs.
    pub fn instantiate(&self, name: &QualifiedName) -> Result<ObjectRef, ResolveError> {
        Ok(self.allocate(self.class(name)?))
    }

    /// Allocate an instance of a registered class.
    pub fn allocate(&self, class: &ClassEntry) -> ObjectRef {
        let slots = self
            .ancestry(&class.name)
            .into_iter()
            .flat_map(|level| level.fields.iter())
            .filter(|field| !field.is_static())
            .map(|field| (field.id, field.initial_value()));
        Arc::new(Object::with_slots(
            class.name.clone(),
            Slots::with_values(slots),
        ))
    }

    /// Allocate an instance and run one of its class's constructors on it.
    pub fn construct(
        &self,
        class: &ClassEntry,
        ctor: &ConstructorEntry,
        args: &[Value],
    ) -> Result<ObjectRef, TargetError> {
        let obj = self.allocate(class);
        ctor.initialize(&obj, args, &class.statics)?;
        trace!(class = %class.name, args = args.len(), "constructed instance");
        Ok(obj)
    }
}

fn is_root(name: &QualifiedName) -> bool {
    name.is_global() && name.simple_name() == ROOT_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;
    use skeleton_key_core::{FieldEntry, MemberFlags};

    fn with_hierarchy() -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins();
        registry
            .register_type("LockedSuper")
            .field("private String myField")
            .unwrap()
            .field("private int count")
            .unwrap()
            .build()
            .unwrap();
        registry
            .register_type("LockedObject")
            .extends("LockedSuper")
            .implements("Lockable")
            .field("private String myField")
            .unwrap()
            .build()
            .unwrap();
        registry
    }

    #[test]
    fn builtins_registered() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(registry.type_count(), 2);
        let root = registry.get_class(&QualifiedName::global(ROOT_TYPE)).unwrap();
        assert!(root.is_root());
        assert!(registry.ancestry(&root.name).is_empty());
    }

    #[test]
    fn duplicate_type_error() {
        let mut registry = TypeRegistry::with_builtins();
        let result = registry.register_class(ClassEntry::new(
            QualifiedName::global(STRING_TYPE),
            Some(QualifiedName::global(ROOT_TYPE)),
        ));
        assert_eq!(result, Err(RegistrationError::DuplicateType("String".into())));
    }

    #[test]
    fn unknown_base_error() {
        let mut registry = TypeRegistry::with_builtins();
        let result = registry.register_type("Orphan").extends("Missing").build();
        assert!(matches!(
            result,
            Err(RegistrationError::UnknownBaseClass { .. })
        ));
    }

    #[test]
    fn ancestry_is_most_derived_first_without_root() {
        let registry = with_hierarchy();
        let names: Vec<_> = registry
            .ancestry(&QualifiedName::global("LockedObject"))
            .iter()
            .map(|c| c.name.to_string())
            .collect();
        assert_eq!(names, vec!["LockedObject", "LockedSuper"]);
    }

    #[test]
    fn instantiate_allocates_shadowed_fields() {
        let registry = with_hierarchy();
        let derived = QualifiedName::global("LockedObject");
        let base = QualifiedName::global("LockedSuper");
        let obj = registry.instantiate(&derived).unwrap();
        assert_eq!(obj.slots().len(), 3);
        assert_eq!(obj.get_declared(&base, "count"), Some(Value::Int(0)));
        assert_eq!(obj.get_declared(&derived, "myField"), Some(Value::Null));
    }

    #[test]
    fn assignability() {
        let registry = with_hierarchy();
        let sup = DataType::object("LockedSuper");
        let sub = DataType::object("LockedObject");
        assert!(registry.is_assignable(&sup, &sub));
        assert!(!registry.is_assignable(&sub, &sup));
        assert!(registry.is_assignable(&DataType::root(), &sub));
        assert!(registry.is_assignable(&DataType::root(), &DataType::string()));
        assert!(!registry.is_assignable(&DataType::int(), &DataType::long()));
        assert!(!registry.is_assignable(&DataType::root(), &DataType::int()));
    }

    #[test]
    fn interface_assignability() {
        let mut registry = with_hierarchy();
        registry
            .register_interface(CapabilityInterface::new("Lockable"))
            .unwrap();
        assert!(registry.is_assignable(
            &DataType::object("Lockable"),
            &DataType::object("LockedObject")
        ));
        assert!(!registry.is_assignable(
            &DataType::object("Lockable"),
            &DataType::object("LockedSuper")
        ));
    }

    #[test]
    fn values_conform_boxing_aware() {
        let registry = TypeRegistry::with_builtins();
        let boxed = DataType::Boxed(skeleton_key_core::PrimitiveKind::Int32);
        assert!(registry.value_conforms(&DataType::int(), &Value::Int(1)));
        assert!(registry.value_conforms(&boxed, &Value::Int(1)));
        assert!(registry.value_conforms(&boxed, &Value::Null));
        assert!(!registry.value_conforms(&DataType::int(), &Value::Null));
        assert!(!registry.value_conforms(&DataType::int(), &Value::Long(1)));
        assert!(registry.value_conforms(&DataType::root(), &Value::Int(1)));
        assert!(registry.value_conforms(&DataType::string(), &Value::from("s")));
        assert!(!registry.value_conforms(&DataType::string(), &Value::Int(1)));
    }

    #[test]
    fn statics_seeded_on_register() {
        let mut registry = TypeRegistry::with_builtins();
        let owner = QualifiedName::global("Singleton");
        let mut entry = ClassEntry::new(owner.clone(), Some(QualifiedName::global(ROOT_TYPE)));
        entry.fields.push(Arc::new(
            FieldEntry::new(owner.clone(), "instances", DataType::int(), MemberFlags::STATIC)
                .with_initial(7),
        ));
        registry.register_class(entry).unwrap();
        let class = registry.get_class(&owner).unwrap();
        assert_eq!(class.statics.get(class.fields[0].id), Some(Value::Int(7)));
    }
}
