//! DataType - the declared type of a field, parameter, return value or
//! exception.
//!
//! # Example
//!
//! ```
//! use skeleton_key_core::{DataType, PrimitiveKind};
//!
//! let flag = DataType::bool();
//! let boxed = DataType::Boxed(PrimitiveKind::Bool);
//! assert!(flag.is_boolean() && boxed.is_boolean());
//! assert_ne!(flag, boxed);
//!
//! let key = DataType::object("house::Key");
//! assert_eq!(key.simple_name(), "Key");
//! ```

use std::fmt::{self, Display, Formatter};

use crate::{PrimitiveKind, QualifiedName};

/// Name of the root sentinel class every class chain ends at.
pub const ROOT_TYPE: &str = "Object";

/// Name of the built-in string class.
pub const STRING_TYPE: &str = "String";

/// A declared type.
///
/// Equality is exact: `int` and `Integer` are different types, and two
/// classes are equal only when their qualified names are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// No value (return type only).
    Void,
    /// Unboxed primitive.
    Primitive(PrimitiveKind),
    /// Boxed primitive, nullable.
    Boxed(PrimitiveKind),
    /// A registered class or capability interface.
    Object(QualifiedName),
}

impl DataType {
    pub fn void() -> Self {
        DataType::Void
    }

    pub fn bool() -> Self {
        DataType::Primitive(PrimitiveKind::Bool)
    }

    pub fn char() -> Self {
        DataType::Primitive(PrimitiveKind::Char)
    }

    pub fn int() -> Self {
        DataType::Primitive(PrimitiveKind::Int32)
    }

    pub fn long() -> Self {
        DataType::Primitive(PrimitiveKind::Int64)
    }

    pub fn double() -> Self {
        DataType::Primitive(PrimitiveKind::Double)
    }

    /// The built-in `String` class.
    pub fn string() -> Self {
        DataType::Object(QualifiedName::global(STRING_TYPE))
    }

    /// The root `Object` class.
    pub fn root() -> Self {
        DataType::Object(QualifiedName::global(ROOT_TYPE))
    }

    /// A named class or interface.
    pub fn object(name: impl Into<QualifiedName>) -> Self {
        DataType::Object(name.into())
    }

    /// Check if this is `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, DataType::Void)
    }

    /// Check if this is an unboxed primitive.
    pub fn is_primitive(&self) -> bool {
        matches!(self, DataType::Primitive(_))
    }

    /// Check if this is a reference type (may hold null).
    pub fn is_reference(&self) -> bool {
        matches!(self, DataType::Boxed(_) | DataType::Object(_))
    }

    /// Check if this is `bool` or `Boolean`.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            DataType::Primitive(PrimitiveKind::Bool) | DataType::Boxed(PrimitiveKind::Bool)
        )
    }

    /// The primitive kind behind a primitive or boxed type.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            DataType::Primitive(kind) | DataType::Boxed(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The boxed form of a primitive; other types are returned unchanged.
    pub fn boxed(&self) -> DataType {
        match self {
            DataType::Primitive(kind) => DataType::Boxed(*kind),
            other => other.clone(),
        }
    }

    /// The unboxed form of a boxed primitive; other types are returned unchanged.
    pub fn unboxed(&self) -> DataType {
        match self {
            DataType::Boxed(kind) => DataType::Primitive(*kind),
            other => other.clone(),
        }
    }

    /// The class or interface name, if this is an object type.
    pub fn object_name(&self) -> Option<&QualifiedName> {
        match self {
            DataType::Object(name) => Some(name),
            _ => None,
        }
    }

    /// The simple name used in rendered signatures and conversion hints.
    pub fn simple_name(&self) -> &str {
        match self {
            DataType::Void => "void",
            DataType::Primitive(kind) => kind.name(),
            DataType::Boxed(kind) => kind.boxed_name(),
            DataType::Object(name) => name.simple_name(),
        }
    }

    /// Parse a type from its rendered name.
    ///
    /// Primitive and boxed names map to their kinds; anything else is taken
    /// as an object type name.
    pub fn parse(name: &str) -> DataType {
        if name == "void" {
            DataType::Void
        } else if let Some(kind) = PrimitiveKind::from_name(name) {
            DataType::Primitive(kind)
        } else if let Some(kind) = PrimitiveKind::from_boxed_name(name) {
            DataType::Boxed(kind)
        } else {
            DataType::Object(QualifiedName::from_qualified_string(name))
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

impl From<PrimitiveKind> for DataType {
    fn from(kind: PrimitiveKind) -> Self {
        DataType::Primitive(kind)
    }
}
