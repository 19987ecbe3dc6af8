//! Runtime values passed to and returned from bound operations.
//!
//! [`Value`] is what crosses a capability boundary: arguments, results and
//! field contents. Objects and proxies compare by identity, everything else
//! by value.

use std::fmt;
use std::sync::Arc;

use crate::{DataType, ObjectRef, PrimitiveKind, ProxyRef};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// Result of a void operation.
    Void,
    /// Null reference.
    Null,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Immutable string.
    Str(Arc<str>),
    /// Instance of a registered class.
    Object(ObjectRef),
    /// Capability object standing in for an instance or a class.
    Proxy(ProxyRef),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Get a human-readable name for this value's type.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            other => other
                .runtime_type()
                .map(|t| t.simple_name().to_string())
                .unwrap_or_default(),
        }
    }

    /// The runtime type of this value; `None` for null.
    ///
    /// Primitives report their unboxed type, proxies their capability
    /// interface.
    pub fn runtime_type(&self) -> Option<DataType> {
        let kind = match self {
            Value::Void => return Some(DataType::Void),
            Value::Null => return None,
            Value::Str(_) => return Some(DataType::string()),
            Value::Object(obj) => return Some(DataType::Object(obj.class().clone())),
            Value::Proxy(proxy) => return Some(DataType::Object(proxy.interface().clone())),
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Char(_) => PrimitiveKind::Char,
            Value::Byte(_) => PrimitiveKind::Int8,
            Value::Short(_) => PrimitiveKind::Int16,
            Value::Int(_) => PrimitiveKind::Int32,
            Value::Long(_) => PrimitiveKind::Int64,
            Value::Float(_) => PrimitiveKind::Float,
            Value::Double(_) => PrimitiveKind::Double,
        };
        Some(DataType::Primitive(kind))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            Value::Int(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_proxy(&self) -> Option<&ProxyRef> {
        match self {
            Value::Proxy(proxy) => Some(proxy),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Proxy(a), Value::Proxy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::Char(v) => write!(f, "Char({:?})", v),
            Value::Byte(v) => write!(f, "Byte({})", v),
            Value::Short(v) => write!(f, "Short({})", v),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Long(v) => write!(f, "Long({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Double(v) => write!(f, "Double({})", v),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Object(obj) => write!(f, "Object({})", obj.class()),
            Value::Proxy(proxy) => write!(f, "Proxy({})", proxy.interface()),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive!(
    bool => Bool,
    char => Char,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    ObjectRef => Object,
    ProxyRef => Proxy,
);

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Void
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Object, QualifiedName};

    #[test]
    fn runtime_types() {
        assert_eq!(Value::Int(1).runtime_type(), Some(DataType::int()));
        assert_eq!(Value::from("x").runtime_type(), Some(DataType::string()));
        assert_eq!(Value::Null.runtime_type(), None);
        assert_eq!(Value::Void.runtime_type(), Some(DataType::Void));
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Arc::new(Object::new(QualifiedName::global("Key")));
        let b = Arc::new(Object::new(QualifiedName::global("Key")));
        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        let key = Arc::new(Object::new(QualifiedName::from("house::Key")));
        assert_eq!(Value::from(key).type_name(), "Key");
    }
}
