//! Access handlers.
//!
//! Every resolved operation is served by an [`AccessHandler`]: a field
//! getter or setter, a method invoker, a constructor invoker, or the null
//! handler for optional operations that did not resolve. Handlers are built
//! once at bind time and never change afterwards.
//!
//! Failures raised by the underlying member surface unchanged as
//! [`InvokeError::Target`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use skeleton_key_core::{
    ClassEntry, ConstructorEntry, DataType, FieldEntry, InvokeError, MethodEntry, ObjectRef,
    OperationDescriptor, Slots, Value,
};

use crate::Binder;

/// Uniform `invoke(receiver, args)` contract of a bound operation.
///
/// `this` is the bound instance, or `None` for class capabilities.
pub trait AccessHandler: Send + Sync + fmt::Debug {
    fn invoke(&self, this: Option<&ObjectRef>, args: &[Value]) -> Result<Value, InvokeError>;
}

/// A bound operation.
pub type Binding = Arc<dyn AccessHandler>;

/// Capability-side types of a converting operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionTarget {
    pub params: Vec<DataType>,
    pub return_type: DataType,
}

impl ConversionTarget {
    /// The conversion target of `op`, if it carries any conversion marker.
    pub fn of(op: &OperationDescriptor) -> Option<Self> {
        op.is_converted().then(|| Self {
            params: op.param_types(),
            return_type: op.return_type.clone(),
        })
    }
}

fn null_receiver(member: &str, owner: &ClassEntry) -> InvokeError {
    InvokeError::NullReceiver {
        member: member.to_string(),
        class: owner.name.to_string(),
    }
}

// ============================================================================
// Fields
// ============================================================================

/// Reads a field.
#[derive(Debug)]
pub struct FieldGetter {
    owner: Arc<ClassEntry>,
    field: Arc<FieldEntry>,
    /// Capability-side type the value is presented as.
    convert_to: Option<DataType>,
    binder: Binder,
}

impl FieldGetter {
    pub fn new(
        owner: Arc<ClassEntry>,
        field: Arc<FieldEntry>,
        convert_to: Option<DataType>,
        binder: Binder,
    ) -> Self {
        Self {
            owner,
            field,
            convert_to,
            binder,
        }
    }

    pub fn field(&self) -> &Arc<FieldEntry> {
        &self.field
    }
}

impl AccessHandler for FieldGetter {
    fn invoke(&self, this: Option<&ObjectRef>, args: &[Value]) -> Result<Value, InvokeError> {
        if !args.is_empty() {
            return Err(InvokeError::Arity {
                accessor: "getters",
                expected: 0,
                found: args.len(),
            });
        }
        let storage = slots_of(&self.field, &self.owner, this)?;
        let value = storage
            .get(self.field.id)
            .unwrap_or_else(|| self.field.initial_value());

        match &self.convert_to {
            Some(target) => {
                self.binder
                    .converter()
                    .convert_result(target, &self.field.data_type, value)
            }
            None => Ok(value),
        }
    }
}

/// Writes a field.
///
/// The FINAL bit is handled at bind time: when the binder strips
/// immutability the write always proceeds, otherwise a FINAL field refuses
/// it. Member bodies that captured a CONSTANT field's literal keep returning
/// the literal after a write.
#[derive(Debug)]
pub struct FieldSetter {
    owner: Arc<ClassEntry>,
    field: Arc<FieldEntry>,
    /// Capability-side type the argument arrives as.
    convert_from: Option<DataType>,
    binder: Binder,
}

impl FieldSetter {
    pub fn new(
        owner: Arc<ClassEntry>,
        field: Arc<FieldEntry>,
        convert_from: Option<DataType>,
        binder: Binder,
    ) -> Self {
        Self {
            owner,
            field,
            convert_from,
            binder,
        }
    }

    pub fn field(&self) -> &Arc<FieldEntry> {
        &self.field
    }
}

impl AccessHandler for FieldSetter {
    fn invoke(&self, this: Option<&ObjectRef>, args: &[Value]) -> Result<Value, InvokeError> {
        let [arg] = args else {
            return Err(InvokeError::Arity {
                accessor: "setters",
                expected: 1,
                found: args.len(),
            });
        };

        let value = match &self.convert_from {
            Some(target) => {
                self.binder
                    .converter()
                    .convert_argument(target, &self.field.data_type, arg)?
            }
            None => arg.clone(),
        };

        if !self
            .binder
            .registry()
            .value_conforms(&self.field.data_type, &value)
        {
            return Err(InvokeError::TypeMismatch {
                field: self.field.name.clone(),
                declared: self.field.data_type.to_string(),
                assigned: value.type_name(),
            });
        }
        if self.field.is_final() {
            return Err(InvokeError::ImmutableField {
                field: self.field.name.clone(),
            });
        }

        let storage = slots_of(&self.field, &self.owner, this)?;
        storage.set(self.field.id, value);
        trace!(field = %self.field.name, owner = %self.owner.name, "field written");
        Ok(Value::Void)
    }
}

/// Static fields live in the owner's static storage, instance fields in the
/// receiver's slots.
fn slots_of<'a>(
    field: &FieldEntry,
    owner: &'a ClassEntry,
    this: Option<&'a ObjectRef>,
) -> Result<&'a Slots, InvokeError> {
    if field.is_static() {
        return Ok(&owner.statics);
    }
    this.map(|obj| obj.slots())
        .ok_or_else(|| null_receiver(&field.name, owner))
}

// ============================================================================
// Methods and constructors
// ============================================================================

/// Calls a method, static or instance.
#[derive(Debug)]
pub struct MethodInvoker {
    owner: Arc<ClassEntry>,
    method: Arc<MethodEntry>,
    conversion: Option<ConversionTarget>,
    binder: Binder,
}

impl MethodInvoker {
    pub fn new(
        owner: Arc<ClassEntry>,
        method: Arc<MethodEntry>,
        conversion: Option<ConversionTarget>,
        binder: Binder,
    ) -> Self {
        Self {
            owner,
            method,
            conversion,
            binder,
        }
    }

    pub fn method(&self) -> &Arc<MethodEntry> {
        &self.method
    }
}

impl AccessHandler for MethodInvoker {
    fn invoke(&self, this: Option<&ObjectRef>, args: &[Value]) -> Result<Value, InvokeError> {
        if !self.method.is_static() && this.is_none() {
            return Err(null_receiver(&self.method.name, &self.owner));
        }

        let converter = self.binder.converter();
        let args: Cow<'_, [Value]> = match &self.conversion {
            Some(target) => {
                Cow::Owned(converter.convert_arguments(&target.params, &self.method.params, args)?)
            }
            None => Cow::Borrowed(args),
        };

        let result = self.method.call(this, &args, &self.owner.statics)?;

        match &self.conversion {
            Some(target) => {
                converter.convert_result(&target.return_type, &self.method.return_type, result)
            }
            None => Ok(result),
        }
    }
}

/// Builds a new instance through a constructor.
#[derive(Debug)]
pub struct ConstructorInvoker {
    class: Arc<ClassEntry>,
    ctor: Arc<ConstructorEntry>,
    conversion: Option<ConversionTarget>,
    binder: Binder,
}

impl ConstructorInvoker {
    pub fn new(
        class: Arc<ClassEntry>,
        ctor: Arc<ConstructorEntry>,
        conversion: Option<ConversionTarget>,
        binder: Binder,
    ) -> Self {
        Self {
            class,
            ctor,
            conversion,
            binder,
        }
    }
}

impl AccessHandler for ConstructorInvoker {
    fn invoke(&self, _this: Option<&ObjectRef>, args: &[Value]) -> Result<Value, InvokeError> {
        let converter = self.binder.converter();
        let args: Cow<'_, [Value]> = match &self.conversion {
            Some(target) => {
                Cow::Owned(converter.convert_arguments(&target.params, &self.ctor.params, args)?)
            }
            None => Cow::Borrowed(args),
        };

        let obj = self.binder.registry().construct(&self.class, &self.ctor, &args)?;
        let result = Value::Object(obj);

        match &self.conversion {
            Some(target) => converter.convert_result(
                &target.return_type,
                &DataType::Object(self.class.name.clone()),
                result,
            ),
            None => Ok(result),
        }
    }
}

/// Serves optional operations that did not resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandler;

impl AccessHandler for NullHandler {
    fn invoke(&self, _this: Option<&ObjectRef>, _args: &[Value]) -> Result<Value, InvokeError> {
        Ok(Value::Void)
    }
}
