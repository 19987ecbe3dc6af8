//! ClassBuilder for registering target types.
//!
//! ClassBuilder provides a fluent API for describing a class: its base class,
//! the capability interfaces it implements, and its fields, methods and
//! constructors, private ones included. Member bodies are native closures.
//!
//! # Example
//!
//! ```
//! use skeleton_key_registry::TypeRegistry;
//! use skeleton_key_core::{CallContext, Value};
//!
//! let mut registry = TypeRegistry::with_builtins();
//! registry
//!     .register_type("LockedObject")
//!     .field("private String myField")?
//!     .method("private int myMethod(String, bool)", |ctx: &mut CallContext<'_>| {
//!         let s: String = ctx.arg(0)?;
//!         Ok(Value::Int(s.len() as i32))
//!     })?
//!     .build()?;
//! # Ok::<(), skeleton_key_core::RegistrationError>(())
//! ```

use std::sync::Arc;

use skeleton_key_core::{
    CallContext, ClassEntry, ConstructorEntry, FieldEntry, MemberFlags, MethodEntry, NativeFn,
    QualifiedName, ROOT_TYPE, RegistrationError, TargetError, Value,
};

use crate::TypeRegistry;
use crate::declaration::{parse_callable, parse_field};

/// Builder for registering a class with the [`TypeRegistry`].
///
/// Created by calling [`TypeRegistry::register_type`]. Members keep the order
/// they are added in.
pub struct ClassBuilder<'r> {
    registry: &'r mut TypeRegistry,
    entry: ClassEntry,
}

impl<'r> ClassBuilder<'r> {
    pub(crate) fn new(registry: &'r mut TypeRegistry, name: QualifiedName) -> Self {
        Self {
            registry,
            entry: ClassEntry::new(name, Some(QualifiedName::global(ROOT_TYPE))),
        }
    }

    /// Set the base class (defaults to the root sentinel).
    pub fn extends(mut self, base: impl Into<QualifiedName>) -> Self {
        self.entry.base = Some(base.into());
        self
    }

    /// Declare an implemented capability interface.
    pub fn implements(mut self, iface: impl Into<QualifiedName>) -> Self {
        self.entry.interfaces.push(iface.into());
        self
    }

    /// Declare a field starting at its type default.
    ///
    /// ```ignore
    /// builder.field("private String myField")?
    /// ```
    pub fn field(self, decl: &str) -> Result<Self, RegistrationError> {
        self.add_field(decl, None)
    }

    /// Declare a field with an initial value.
    ///
    /// ```ignore
    /// builder.field_init("private final String field", "ABC")?
    /// ```
    pub fn field_init(self, decl: &str, value: impl Into<Value>) -> Result<Self, RegistrationError> {
        self.add_field(decl, Some(value.into()))
    }

    fn add_field(mut self, decl: &str, initial: Option<Value>) -> Result<Self, RegistrationError> {
        let parsed = parse_field(decl)?;
        if self.entry.find_field(&parsed.name).is_some() {
            return Err(self.duplicate(&parsed.name, "field"));
        }
        let mut field = FieldEntry::new(
            self.entry.name.clone(),
            parsed.name,
            parsed.data_type,
            parsed.flags,
        );
        field.initial = initial;
        self.entry.fields.push(Arc::new(field));
        Ok(self)
    }

    /// Declare a method.
    ///
    /// ```ignore
    /// builder.method("private int myMethod(String, bool)", |ctx| { ... })?
    /// builder.method("static void reset()", |ctx| { ... })?
    /// ```
    pub fn method<F>(mut self, decl: &str, body: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&mut CallContext<'_>) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        let parsed = parse_callable(decl)?;
        let Some(return_type) = parsed.return_type else {
            return Err(RegistrationError::InvalidDeclaration {
                decl: decl.to_string(),
                reason: "method needs a return type".to_string(),
            });
        };
        let method = MethodEntry::new(
            self.entry.name.clone(),
            parsed.name,
            parsed.params,
            return_type,
            NativeFn::new(body),
        )
        .with_throws(parsed.throws)
        .with_flags(parsed.flags);

        if self.entry.methods.iter().any(|m| m.id == method.id) {
            return Err(self.duplicate(&method.name, "method"));
        }
        self.entry.methods.push(Arc::new(method));
        Ok(self)
    }

    /// Declare a constructor. The name must be the class's simple name.
    ///
    /// ```ignore
    /// builder.constructor("private Key(String)", |ctx| {
    ///     ctx.set_field("name", ctx.arg_value(0)?.clone())?;
    ///     Ok(Value::Void)
    /// })?
    /// ```
    pub fn constructor<F>(mut self, decl: &str, body: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&mut CallContext<'_>) -> Result<Value, TargetError> + Send + Sync + 'static,
    {
        let parsed = parse_callable(decl)?;
        if parsed.return_type.is_some() || parsed.name != self.entry.simple_name() {
            return Err(RegistrationError::InvalidDeclaration {
                decl: decl.to_string(),
                reason: format!("expected constructor `{}(...)`", self.entry.simple_name()),
            });
        }
        let ctor = ConstructorEntry::new(self.entry.name.clone(), parsed.params, NativeFn::new(body))
            .with_throws(parsed.throws)
            .with_flags(parsed.flags & !MemberFlags::STATIC);

        if self.entry.constructors.iter().any(|c| c.id == ctor.id) {
            return Err(self.duplicate(&parsed.name, "constructor"));
        }
        self.entry.constructors.push(Arc::new(ctor));
        Ok(self)
    }

    fn duplicate(&self, member: &str, kind: &'static str) -> RegistrationError {
        RegistrationError::DuplicateMember {
            class: self.entry.name.to_string(),
            member: member.to_string(),
            kind,
        }
    }

    /// Register the class.
    ///
    /// A class without declared constructors gets the implicit no-argument
    /// constructor.
    pub fn build(mut self) -> Result<(), RegistrationError> {
        if self.entry.constructors.is_empty() {
            self.entry
                .constructors
                .push(Arc::new(ConstructorEntry::implicit(self.entry.name.clone())));
        }
        self.registry.register_class(self.entry)
    }
}
