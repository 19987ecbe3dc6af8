//! Field entry.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::{DataType, QualifiedName, TypeHash, Value};

use super::MemberFlags;

/// A declared field.
///
/// The modifier bits are atomic: the FINAL bit can be cleared after the
/// entry is shared (see [`FieldEntry::strip_final`]). That is the only
/// mutation a field entry ever sees, and it is never reversed.
pub struct FieldEntry {
    /// Member hash, also the slot key in instance/static storage.
    pub id: TypeHash,
    /// Field name.
    pub name: String,
    /// Declaring class.
    pub owner: QualifiedName,
    /// Declared type.
    pub data_type: DataType,
    /// Value the slot starts with; the type default when absent.
    pub initial: Option<Value>,
    flags: AtomicU8,
}

impl FieldEntry {
    /// Create a new field entry.
    pub fn new(
        owner: QualifiedName,
        name: impl Into<String>,
        data_type: DataType,
        flags: MemberFlags,
    ) -> Self {
        let name = name.into();
        Self {
            id: TypeHash::from_member(owner.to_type_hash(), &name, &[]),
            name,
            owner,
            data_type,
            initial: None,
            flags: AtomicU8::new(flags.bits()),
        }
    }

    /// Set the initial value.
    pub fn with_initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Current modifiers.
    pub fn flags(&self) -> MemberFlags {
        MemberFlags::from_bits_truncate(self.flags.load(Ordering::Acquire))
    }

    pub fn is_static(&self) -> bool {
        self.flags().is_static()
    }

    pub fn is_final(&self) -> bool {
        self.flags().is_final()
    }

    /// Check if this field holds a literal constant.
    pub fn is_constant(&self) -> bool {
        self.flags().contains(MemberFlags::CONSTANT)
    }

    /// Clear the FINAL bit so the field can be written through a setter.
    ///
    /// Returns `true` if the bit was set. Member bodies that captured a
    /// CONSTANT field's literal keep seeing the literal.
    pub fn strip_final(&self) -> bool {
        let prev = self
            .flags
            .fetch_and(!MemberFlags::FINAL.bits(), Ordering::AcqRel);
        MemberFlags::from_bits_truncate(prev).is_final()
    }

    /// The value a fresh slot for this field starts with.
    pub fn initial_value(&self) -> Value {
        if let Some(value) = &self.initial {
            return value.clone();
        }
        match &self.data_type {
            DataType::Primitive(kind) => default_primitive(*kind),
            _ => Value::Null,
        }
    }
}

fn default_primitive(kind: crate::PrimitiveKind) -> Value {
    use crate::PrimitiveKind::*;
    match kind {
        Bool => Value::Bool(false),
        Char => Value::Char('\0'),
        Int8 => Value::Byte(0),
        Int16 => Value::Short(0),
        Int32 => Value::Int(0),
        Int64 => Value::Long(0),
        Float => Value::Float(0.0),
        Double => Value::Double(0.0),
    }
}

impl fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEntry")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("flags", &self.flags())
            .finish()
    }
}
