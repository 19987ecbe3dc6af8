//! Typed extraction of Rust values from [`Value`]s.
//!
//! [`FromValue`] is what native member bodies use to read their arguments:
//!
//! ```
//! use skeleton_key_core::{FromValue, Value};
//!
//! let v = Value::Int(42);
//! assert_eq!(i32::from_value(&v).unwrap(), 42);
//! assert!(bool::from_value(&v).is_err());
//! ```

use std::sync::Arc;

use crate::{ConversionError, ObjectRef, ProxyRef, Value};

/// Extract a value of this type from a [`Value`].
pub trait FromValue: Sized {
    /// Returns a `ConversionError` if the value holds an incompatible type.
    fn from_value(value: &Value) -> Result<Self, ConversionError>;
}

fn mismatch(expected: &'static str, value: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected,
        actual: value.type_name(),
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident, $name:literal);* $(;)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => Err(mismatch($name, other)),
                    }
                }
            }
        )*
    };
}

impl_from_value!(
    bool => Bool, "bool";
    char => Char, "char";
    i8 => Byte, "byte";
    i16 => Short, "short";
    i32 => Int, "int";
    f32 => Float, "float";
    ObjectRef => Object, "object";
    ProxyRef => Proxy, "proxy";
);

// Widening integer and float reads
impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Long(v) => Ok(*v),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Byte(v) => Ok(i64::from(*v)),
            other => Err(mismatch("long", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(f64::from(*v)),
            other => Err(mismatch("double", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(mismatch("String", other)),
        }
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(Arc::clone(s)),
            other => Err(mismatch("String", other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
