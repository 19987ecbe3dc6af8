//! Primitive kinds and their boxed counterparts.

use std::fmt;

/// Primitive value kinds.
///
/// Every primitive has a boxed twin (`int` / `Integer`) which is a reference
/// type and may be null. The two are distinct [`DataType`](crate::DataType)s
/// for signature matching but compatible for field writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Name of the unboxed primitive.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int8 => "byte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Name of the boxed reference type.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Char => "Character",
            PrimitiveKind::Int8 => "Byte",
            PrimitiveKind::Int16 => "Short",
            PrimitiveKind::Int32 => "Integer",
            PrimitiveKind::Int64 => "Long",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }

    /// Look up a primitive by its unboxed name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Look up a primitive by its boxed name.
    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.boxed_name() == name)
    }

    /// All primitive kinds.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::Int8,
        PrimitiveKind::Int16,
        PrimitiveKind::Int32,
        PrimitiveKind::Int64,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
