//! Instances of registered classes and their field storage.
//!
//! An [`Object`] holds one slot per field of every class in its ancestry.
//! Slots are keyed by the field's member hash (declaring class + name), so a
//! subclass field never overwrites a shadowed base-class field.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rustc_hash::FxHashMap;

use crate::{QualifiedName, TypeHash, Value};

/// Shared handle to an instance.
pub type ObjectRef = Arc<Object>;

/// Field slot storage with interior mutability.
///
/// Used for instance fields inside [`Object`] and for per-class static
/// storage.
#[derive(Default)]
pub struct Slots {
    slots: RwLock<FxHashMap<TypeHash, Value>>,
}

impl Slots {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage from initial slot values.
    pub fn with_values(values: impl IntoIterator<Item = (TypeHash, Value)>) -> Self {
        Self {
            slots: RwLock::new(values.into_iter().collect()),
        }
    }

    /// Read a slot.
    pub fn get(&self, key: TypeHash) -> Option<Value> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Write a slot, returning the previous value.
    pub fn set(&self, key: TypeHash, value: Value) -> Option<Value> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value)
    }

    /// Check if a slot exists.
    pub fn contains(&self, key: TypeHash) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Slots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slots").field("len", &self.len()).finish()
    }
}

/// An instance of a registered class.
pub struct Object {
    class: QualifiedName,
    slots: Slots,
}

impl Object {
    /// Create an instance with no field slots.
    pub fn new(class: QualifiedName) -> Self {
        Self {
            class,
            slots: Slots::new(),
        }
    }

    /// Create an instance with initial field slots.
    pub fn with_slots(class: QualifiedName, slots: Slots) -> Self {
        Self { class, slots }
    }

    /// The instance's concrete class.
    pub fn class(&self) -> &QualifiedName {
        &self.class
    }

    /// Read a field slot by the field's member hash.
    pub fn get(&self, field: TypeHash) -> Option<Value> {
        self.slots.get(field)
    }

    /// Write a field slot by the field's member hash.
    pub fn set(&self, field: TypeHash, value: Value) -> Option<Value> {
        self.slots.set(field, value)
    }

    /// Read a field declared on `owner` by name.
    pub fn get_declared(&self, owner: &QualifiedName, name: &str) -> Option<Value> {
        self.get(TypeHash::from_member(owner.to_type_hash(), name, &[]))
    }

    /// Write a field declared on `owner` by name.
    pub fn set_declared(&self, owner: &QualifiedName, name: &str, value: Value) -> Option<Value> {
        self.set(TypeHash::from_member(owner.to_type_hash(), name, &[]), value)
    }

    /// The field slots.
    pub fn slots(&self) -> &Slots {
        &self.slots
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class)
            .field("slots", &self.slots)
            .finish()
    }
}
