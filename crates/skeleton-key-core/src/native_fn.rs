//! Native member bodies and their call context.
//!
//! Methods and constructors of registered classes are implemented as Rust
//! closures taking a [`CallContext`]. The context exposes the receiver, the
//! arguments, and the field storage of the class that declared the member.

use std::fmt;
use std::sync::Arc;

use crate::{ConversionError, FromValue, ObjectRef, QualifiedName, Slots, TargetError, TypeHash, Value};

/// Type-erased native member body.
///
/// The callable is shared behind an `Arc`, so cloning a `NativeFn` is cheap
/// and clones call the same body.
#[derive(Clone)]
pub struct NativeFn {
    inner: Arc<dyn NativeCallable + Send + Sync>,
}

impl NativeFn {
    /// Create a new NativeFn from a callable.
    pub fn new<F>(f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call this native function with the given context.
    pub fn call(&self, ctx: &mut CallContext<'_>) -> Result<Value, TargetError> {
        self.inner.call(ctx)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFn").finish_non_exhaustive()
    }
}

/// Trait for callable member bodies.
pub trait NativeCallable {
    /// Call this body with the given context.
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<Value, TargetError>;
}

impl<F> NativeCallable for F
where
    F: Fn(&mut CallContext<'_>) -> Result<Value, TargetError>,
{
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<Value, TargetError> {
        (self)(ctx)
    }
}

/// Context for a native member call.
pub struct CallContext<'a> {
    /// Receiver, absent for static members
    this: Option<&'a ObjectRef>,
    /// Call arguments
    args: &'a [Value],
    /// Class declaring the member being called
    owner: &'a QualifiedName,
    /// Static storage of the declaring class
    statics: &'a Slots,
}

impl<'a> CallContext<'a> {
    /// Create a new call context.
    pub fn new(
        this: Option<&'a ObjectRef>,
        args: &'a [Value],
        owner: &'a QualifiedName,
        statics: &'a Slots,
    ) -> Self {
        Self {
            this,
            args,
            owner,
            statics,
        }
    }

    /// The receiver.
    pub fn this(&self) -> Result<&'a ObjectRef, ConversionError> {
        self.this.ok_or(ConversionError::NoReceiver)
    }

    /// The class declaring the member being called.
    pub fn owner(&self) -> &QualifiedName {
        self.owner
    }

    /// Get the number of arguments.
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Get a raw argument.
    pub fn arg_value(&self, index: usize) -> Result<&'a Value, ConversionError> {
        self.args
            .get(index)
            .ok_or(ConversionError::ArgumentOutOfBounds {
                index,
                count: self.args.len(),
            })
    }

    /// Get a typed argument.
    pub fn arg<T: FromValue>(&self, index: usize) -> Result<T, ConversionError> {
        T::from_value(self.arg_value(index)?)
    }

    /// All arguments.
    pub fn args(&self) -> &'a [Value] {
        self.args
    }

    fn slot(&self, name: &str) -> TypeHash {
        TypeHash::from_member(self.owner.to_type_hash(), name, &[])
    }

    /// Read a field of the declaring class on the receiver.
    pub fn field(&self, name: &str) -> Result<Value, ConversionError> {
        Ok(self.this()?.get(self.slot(name)).unwrap_or(Value::Null))
    }

    /// Read a typed field of the declaring class on the receiver.
    pub fn field_as<T: FromValue>(&self, name: &str) -> Result<T, ConversionError> {
        T::from_value(&self.field(name)?)
    }

    /// Write a field of the declaring class on the receiver.
    pub fn set_field(&self, name: &str, value: impl Into<Value>) -> Result<(), ConversionError> {
        self.this()?.set(self.slot(name), value.into());
        Ok(())
    }

    /// Read a static field of the declaring class.
    pub fn static_field(&self, name: &str) -> Value {
        self.statics.get(self.slot(name)).unwrap_or(Value::Null)
    }

    /// Write a static field of the declaring class.
    pub fn set_static_field(&self, name: &str, value: impl Into<Value>) {
        self.statics.set(self.slot(name), value.into());
    }
}

impl fmt::Debug for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("owner", &self.owner)
            .field("has_this", &self.this.is_some())
            .field("args", &self.args)
            .finish()
    }
}
