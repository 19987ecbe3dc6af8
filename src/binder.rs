//! The capability binder.
//!
//! Binding runs in two phases. [`Binder::bind`] resolves every operation of
//! a capability interface against the target up front and fails on the first
//! operation that does not resolve. The resulting [`Capability`] only
//! dispatches: each call looks up its precomputed [`Binding`] and delegates.
//!
//! ```
//! use std::sync::Arc;
//! use skeleton_key::prelude::*;
//!
//! let mut registry = TypeRegistry::with_builtins();
//! registry
//!     .register_type("Vault")
//!     .field("private String secret")?
//!     .build()?;
//! registry.register_interface(
//!     CapabilityInterface::new("OpenVault")
//!         .with_operation(OperationDescriptor::new("setSecret").param(DataType::string()))
//!         .with_operation(OperationDescriptor::new("getSecret").returns(DataType::string())),
//! )?;
//!
//! let binder = Binder::new(Arc::new(registry));
//! let vault = binder.registry().instantiate(&"Vault".into())?;
//! let open = binder.bind(Target::Instance(vault), "OpenVault")?;
//! open.call("setSecret", &[Value::from("42")])?;
//! assert_eq!(open.call("getSecret", &[])?, Value::from("42"));
//! # Ok::<(), SkeletonKeyError>(())
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use skeleton_key_core::{
    BindingError, CapabilityInterface, InvokeError, ObjectRef, OperationDescriptor, Proxy,
    QualifiedName, ResolveError, TypeHash, Value,
};
use skeleton_key_registry::TypeRegistry;

use crate::BinderConfig;
use crate::convert::Converter;
use crate::handlers::{
    Binding, ConstructorInvoker, ConversionTarget, FieldGetter, FieldSetter, MethodInvoker,
    NullHandler,
};
use crate::naming::property_type_of;
use crate::resolver::{MemberResolver, ResolveMode, Resolved};
use crate::signature::operation_signature;

/// What a capability is bound to.
#[derive(Debug, Clone)]
pub enum Target {
    /// Object access: instance members of a live instance.
    Instance(ObjectRef),
    /// Class access: static members and constructors.
    Class(QualifiedName),
}

impl Target {
    /// The class members are resolved against.
    pub fn class_name(&self) -> &QualifiedName {
        match self {
            Target::Instance(obj) => obj.class(),
            Target::Class(name) => name,
        }
    }

    pub fn mode(&self) -> ResolveMode {
        match self {
            Target::Instance(_) => ResolveMode::Instance,
            Target::Class(_) => ResolveMode::Static,
        }
    }

    /// The receiver handed to every binding.
    pub fn receiver(&self) -> Option<&ObjectRef> {
        match self {
            Target::Instance(obj) => Some(obj),
            Target::Class(_) => None,
        }
    }
}

/// Binds capability interfaces to registered types.
///
/// Cloning is cheap: clones share the registry.
#[derive(Clone)]
pub struct Binder {
    registry: Arc<TypeRegistry>,
    config: BinderConfig,
}

impl Binder {
    /// Create a binder with the default configuration.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, BinderConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: BinderConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// The conversion protocol running against this binder.
    pub fn converter(&self) -> Converter<'_> {
        Converter::new(self)
    }

    /// Bind `iface` to `target`.
    ///
    /// Every operation is resolved before anything is returned. Optional
    /// operations that do not resolve are served by the [`NullHandler`];
    /// any other unresolved operation aborts the bind.
    ///
    /// # Errors
    ///
    /// A [`BindingError`] naming the first unresolved operation, or with an
    /// empty operation if the interface or target type is not registered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn bind(
        &self,
        target: Target,
        iface: impl Into<QualifiedName>,
    ) -> Result<Arc<Capability>, BindingError> {
        let iface_name = iface.into();
        let class_name = target.class_name().clone();
        let fail = |operation: String, source: ResolveError| BindingError {
            interface: iface_name.clone(),
            target: class_name.clone(),
            operation,
            source,
        };

        let interface = Arc::clone(
            self.registry
                .interface(&iface_name)
                .map_err(|e| fail(String::new(), e))?,
        );
        let class = self
            .registry
            .class(&class_name)
            .map_err(|e| fail(String::new(), e))?;
        let resolver = MemberResolver::new(&self.registry, class, target.mode(), &self.config);

        let mut bindings = FxHashMap::default();
        for op in interface.operations() {
            let binding = match resolver.resolve(op) {
                Ok(resolved) => self.handler_for(op, resolved),
                Err(err) if op.optional => {
                    debug!(operation = %op.name, error = %err, "optional operation bound to null handler");
                    Arc::new(NullHandler)
                }
                Err(err) => {
                    debug!(interface = %iface_name, target = %class_name, error = %err, "bind failed");
                    return Err(fail(operation_signature(op), err));
                }
            };
            bindings.insert(op.id(), binding);
        }

        debug!(
            interface = %iface_name,
            target = %class_name,
            operations = bindings.len(),
            "bound capability"
        );
        Ok(Arc::new(Capability {
            interface,
            target,
            table: CapabilityTable { bindings },
        }))
    }

    fn handler_for(&self, op: &OperationDescriptor, resolved: Resolved) -> Binding {
        let converted = op.is_converted();
        match resolved {
            Resolved::Method { owner, method } => Arc::new(MethodInvoker::new(
                owner,
                method,
                ConversionTarget::of(op),
                self.clone(),
            )),
            Resolved::Getter { owner, field } => {
                let convert_to = converted.then(|| op.return_type.clone());
                Arc::new(FieldGetter::new(owner, field, convert_to, self.clone()))
            }
            Resolved::Setter { owner, field } => {
                if self.config.strip_immutability() && field.strip_final() {
                    debug!(
                        field = %field.name,
                        owner = %owner.name,
                        constant = field.is_constant(),
                        "stripped immutability"
                    );
                }
                let convert_from = property_type_of(op).filter(|_| converted).cloned();
                Arc::new(FieldSetter::new(owner, field, convert_from, self.clone()))
            }
            Resolved::Constructor { class, ctor } => Arc::new(ConstructorInvoker::new(
                class,
                ctor,
                ConversionTarget::of(op),
                self.clone(),
            )),
        }
    }

    /// Operations of `iface` that would not resolve against instances of
    /// `class`. Optional operations are never reported.
    ///
    /// Empty exactly when [`bind`](Self::bind) on an instance would succeed.
    /// Unlike `bind`, nothing is modified.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check(
        &self,
        class: impl Into<QualifiedName>,
        iface: impl Into<QualifiedName>,
    ) -> Result<Vec<Arc<OperationDescriptor>>, ResolveError> {
        self.conflicts(&class.into(), &iface.into(), ResolveMode::Instance)
    }

    /// Like [`check`](Self::check), for class access.
    pub fn check_static(
        &self,
        class: impl Into<QualifiedName>,
        iface: impl Into<QualifiedName>,
    ) -> Result<Vec<Arc<OperationDescriptor>>, ResolveError> {
        self.conflicts(&class.into(), &iface.into(), ResolveMode::Static)
    }

    fn conflicts(
        &self,
        class: &QualifiedName,
        iface: &QualifiedName,
        mode: ResolveMode,
    ) -> Result<Vec<Arc<OperationDescriptor>>, ResolveError> {
        let interface = self.registry.interface(iface)?;
        let class = self.registry.class(class)?;
        let resolver = MemberResolver::new(&self.registry, class, mode, &self.config);

        let conflicts: Vec<_> = interface
            .operations()
            .iter()
            .filter(|op| !op.optional && resolver.resolve(op).is_err())
            .cloned()
            .collect();
        debug!(
            interface = %iface,
            target = %class.name,
            conflicts = conflicts.len(),
            "checked capability"
        );
        Ok(conflicts)
    }

    /// The instance behind a capability bound by a binder; anything else is
    /// returned unchanged.
    pub fn unwrap(&self, value: &Value) -> Value {
        match bound_object(value) {
            Some(obj) => Value::Object(Arc::clone(obj)),
            None => value.clone(),
        }
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("types", &self.registry.type_count())
            .field("config", &self.config)
            .finish()
    }
}

/// The instance a capability value is bound to.
pub(crate) fn bound_object(value: &Value) -> Option<&ObjectRef> {
    match value {
        Value::Proxy(proxy) => proxy
            .as_any()
            .downcast_ref::<Capability>()
            .and_then(Capability::object),
        _ => None,
    }
}

/// Operation id to binding.
#[derive(Debug, Default)]
pub struct CapabilityTable {
    bindings: FxHashMap<TypeHash, Binding>,
}

impl CapabilityTable {
    pub fn get(&self, id: TypeHash) -> Option<&Binding> {
        self.bindings.get(&id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A capability interface bound to a target.
///
/// Immutable once built; every call is a table lookup followed by the
/// binding's `invoke`.
pub struct Capability {
    interface: Arc<CapabilityInterface>,
    target: Target,
    table: CapabilityTable,
}

impl Capability {
    /// Dispatch `op` with `args`.
    ///
    /// Results and errors of the bound member are returned unchanged.
    pub fn invoke(&self, op: &OperationDescriptor, args: &[Value]) -> Result<Value, InvokeError> {
        let binding = self
            .table
            .get(op.id())
            .ok_or_else(|| InvokeError::NoSuchOperation {
                interface: self.interface.name().clone(),
                name: op.name.clone(),
                arity: op.arity(),
            })?;
        binding.invoke(self.target.receiver(), args)
    }

    /// Dispatch the operation named `name` taking `args.len()` arguments.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, InvokeError> {
        let mut matching = self
            .interface
            .operations()
            .iter()
            .filter(|op| op.name == name && op.arity() == args.len());

        let Some(op) = matching.next() else {
            return Err(InvokeError::NoSuchOperation {
                interface: self.interface.name().clone(),
                name: name.to_string(),
                arity: args.len(),
            });
        };
        if matching.next().is_some() {
            return Err(InvokeError::AmbiguousOperation {
                interface: self.interface.name().clone(),
                name: name.to_string(),
                arity: args.len(),
            });
        }
        self.invoke(op, args)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The bound instance; `None` for class access.
    pub fn object(&self) -> Option<&ObjectRef> {
        self.target.receiver()
    }

    pub fn operations(&self) -> &[Arc<OperationDescriptor>] {
        self.interface.operations()
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }
}

impl Proxy for Capability {
    fn interface(&self) -> &QualifiedName {
        self.interface.name()
    }

    fn invoke(&self, op: &OperationDescriptor, args: &[Value]) -> Result<Value, InvokeError> {
        Capability::invoke(self, op, args)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("interface", self.interface.name())
            .field("target", self.target.class_name())
            .field("bindings", &self.table.len())
            .finish()
    }
}
