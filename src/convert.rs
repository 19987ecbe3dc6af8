//! Structural conversion between concrete types and capability types.
//!
//! A value typed as a capability interface on the caller's side is adapted
//! into an instance of the concrete type a target member declares: a fresh
//! concrete instance is built, bound behind the same interface, and every
//! round-trippable property is copied across. Results travel the other way
//! by binding the concrete result behind the requested interface.
//!
//! Values that are already capabilities bound to a suitable instance are
//! unwrapped instead of rebuilt, so adapting `a` into an interface and back
//! yields `a` itself.

use std::sync::Arc;

use tracing::trace;

use skeleton_key_core::{
    CapabilityInterface, ClassEntry, DataType, InvokeError, ObjectRef, OperationDescriptor,
    ProxyRef, Value,
};

use crate::binder::{Binder, Target, bound_object};
use crate::naming::{is_boolean_getter, is_getter, is_setter, property_name_of};

/// A property readable and writable through one capability interface.
#[derive(Debug, Clone)]
pub struct PropertyPair {
    pub name: String,
    pub getter: Arc<OperationDescriptor>,
    pub setter: Arc<OperationDescriptor>,
}

/// Properties of `iface` with both a getter (or boolean getter) and a
/// setter, in order of first appearance.
pub fn round_trip_properties(iface: &CapabilityInterface) -> Vec<PropertyPair> {
    type Slot = (String, Option<Arc<OperationDescriptor>>, Option<Arc<OperationDescriptor>>);
    let mut properties: Vec<Slot> = Vec::new();

    for op in iface.operations() {
        let is_set = is_setter(op);
        if !is_set && !is_getter(op) && !is_boolean_getter(op) {
            continue;
        }
        let name = property_name_of(op);
        let index = match properties.iter().position(|(n, _, _)| n == name) {
            Some(index) => index,
            None => {
                properties.push((name.to_string(), None, None));
                properties.len() - 1
            }
        };
        let slot = &mut properties[index];
        if is_set {
            slot.2 = Some(Arc::clone(op));
        } else {
            slot.1 = Some(Arc::clone(op));
        }
    }

    properties
        .into_iter()
        .filter_map(|(name, getter, setter)| {
            Some(PropertyPair {
                name,
                getter: getter?,
                setter: setter?,
            })
        })
        .collect()
}

fn conversion_error(from: &Value, to: &DataType, reason: impl Into<String>) -> InvokeError {
    InvokeError::Conversion {
        from: from.type_name(),
        to: to.simple_name().to_string(),
        reason: reason.into(),
    }
}

/// The conversion protocol, running against one binder's registry.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'b> {
    binder: &'b Binder,
}

impl<'b> Converter<'b> {
    pub fn new(binder: &'b Binder) -> Self {
        Self { binder }
    }

    /// Adapt each argument whose declared concrete type differs from the
    /// capability-side type; pass the rest through.
    pub fn convert_arguments(
        &self,
        target_types: &[DataType],
        concrete_types: &[DataType],
        args: &[Value],
    ) -> Result<Vec<Value>, InvokeError> {
        if args.len() != concrete_types.len() || target_types.len() != concrete_types.len() {
            return Err(InvokeError::Arity {
                accessor: "converted operations",
                expected: concrete_types.len(),
                found: args.len(),
            });
        }
        args.iter()
            .zip(target_types.iter().zip(concrete_types))
            .map(|(arg, (target, concrete))| self.convert_argument(target, concrete, arg))
            .collect()
    }

    /// Adapt one argument.
    ///
    /// Arguments whose capability-side type the concrete declaration already
    /// accepts pass through, unless they are bound capabilities.
    pub fn convert_argument(
        &self,
        target: &DataType,
        concrete: &DataType,
        arg: &Value,
    ) -> Result<Value, InvokeError> {
        let accepted = target == concrete
            || (bound_object(arg).is_none()
                && self.binder.registry().is_assignable(concrete, target));
        if accepted {
            Ok(arg.clone())
        } else {
            self.convert(arg, concrete, target)
        }
    }

    /// Adapt `value`, typed as `capability` by the caller, into an instance of
    /// `concrete`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn convert(
        &self,
        value: &Value,
        concrete: &DataType,
        capability: &DataType,
    ) -> Result<Value, InvokeError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        let registry = self.binder.registry();
        if let Some(obj) = bound_object(value)
            && registry.is_assignable(concrete, &DataType::Object(obj.class().clone()))
        {
            trace!(class = %obj.class(), "unwrapped bound instance");
            return Ok(Value::Object(Arc::clone(obj)));
        }

        let class = concrete
            .object_name()
            .and_then(|name| registry.get_class(name))
            .ok_or_else(|| conversion_error(value, concrete, "not a registered class"))?;
        let iface = capability
            .object_name()
            .and_then(|name| registry.get_interface(name))
            .ok_or_else(|| conversion_error(value, capability, "not a capability interface"))?;

        let converted = self.create_base_object(value, class, iface)?;
        let accessible = self
            .binder
            .bind(Target::Instance(Arc::clone(&converted)), iface.name().clone())?;
        let source = self.source_of(value, iface)?;

        for property in round_trip_properties(iface) {
            let current = source.invoke(&property.getter, &[])?;
            accessible.invoke(&property.setter, &[current])?;
            trace!(property = %property.name, "copied property");
        }

        trace!(class = %class.name, interface = %iface.name(), "converted value");
        Ok(Value::Object(converted))
    }

    /// Build a fresh instance of `class`, through the interface's construct
    /// strategy if it has one, else through the no-argument constructor.
    fn create_base_object(
        &self,
        value: &Value,
        class: &Arc<ClassEntry>,
        iface: &CapabilityInterface,
    ) -> Result<ObjectRef, InvokeError> {
        let target = DataType::Object(class.name.clone());
        let (ctor, args) = match iface.construct() {
            Some(strategy) => {
                let ctor = class
                    .constructors
                    .iter()
                    .find(|c| c.params == strategy.signature)
                    .ok_or_else(|| {
                        conversion_error(
                            value,
                            &target,
                            format!("no constructor for strategy {}", strategy.name),
                        )
                    })?;
                (ctor, strategy.arguments())
            }
            None => {
                let ctor = class
                    .default_constructor()
                    .ok_or_else(|| conversion_error(value, &target, "no default constructor"))?;
                (ctor, Vec::new())
            }
        };
        Ok(self.binder.registry().construct(class, ctor, &args)?)
    }

    /// The value to read properties from, as an implementation of `iface`.
    fn source_of(&self, value: &Value, iface: &CapabilityInterface) -> Result<ProxyRef, InvokeError> {
        match value {
            Value::Proxy(proxy) => Ok(Arc::clone(proxy)),
            Value::Object(obj) => {
                let bound: ProxyRef = self
                    .binder
                    .bind(Target::Instance(Arc::clone(obj)), iface.name().clone())?;
                Ok(bound)
            }
            other => Err(conversion_error(
                other,
                &iface.data_type(),
                "value has no properties",
            )),
        }
    }

    /// Present a concrete result as `target`.
    ///
    /// Results already of the requested type, null results, and results
    /// requested as a non-interface type pass through.
    pub fn convert_result(
        &self,
        target: &DataType,
        concrete: &DataType,
        result: Value,
    ) -> Result<Value, InvokeError> {
        if target == concrete || result.is_null() || result.is_void() {
            return Ok(result);
        }
        let registry = self.binder.registry();
        let Some(iface) = target
            .object_name()
            .filter(|name| registry.get_interface(name).is_some())
        else {
            return Ok(result);
        };

        let obj = match &result {
            Value::Object(obj) => Arc::clone(obj),
            other => match bound_object(other) {
                Some(obj) => Arc::clone(obj),
                None => return Err(conversion_error(other, target, "result is not an object")),
            },
        };
        let bound = self.binder.bind(Target::Instance(obj), iface.clone())?;
        Ok(Value::Proxy(bound))
    }
}
