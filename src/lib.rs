//! Bind caller-declared capability interfaces to the members of registered
//! types, private ones included.
//!
//! A capability interface lists the operations a caller wants, following the
//! `get`/`is`/`set`/`create` naming conventions. [`Binder::bind`] resolves
//! each operation against the target's ancestry, to a method, a field
//! accessor or a constructor, and returns a [`Capability`] dispatching every
//! call through the resulting table.
//!
//! Target types are described through a [`TypeRegistry`] by their owners.
//! The registry is the only way in: nothing here reaches into memory that was
//! not registered.
//!
//! # Crates
//!
//! - `skeleton-key-core` - data model, capability descriptors, errors
//! - `skeleton-key-registry` - the type registry and class builder
//! - this crate - resolution, conversion, dispatch and conflict reports

pub mod binder;
pub mod config;
pub mod convert;
pub mod handlers;
pub mod naming;
pub mod report;
pub mod resolver;
pub mod signature;

pub use binder::{Binder, Capability, CapabilityTable, Target};
pub use config::BinderConfig;
pub use convert::{Converter, PropertyPair, round_trip_properties};
pub use handlers::{AccessHandler, Binding, NullHandler};
pub use report::{ConflictReport, provides_features_of, provides_static_features_of};
pub use resolver::{MemberResolver, ResolveMode, Resolved};

pub use skeleton_key_core::{
    BindingError, CallContext, CapabilityInterface, ClassEntry, ConstructStrategy,
    ConstructorEntry, ConversionError, ConvertMarker, DataType, FieldEntry, FromValue,
    InvokeError, MemberFlags, MethodEntry, NativeFn, Object, ObjectRef, OperationDescriptor,
    Param, PrimitiveKind, Proxy, ProxyRef, QualifiedName, RegistrationError, ResolveError,
    SkeletonKeyError, TargetError, Value,
};
pub use skeleton_key_registry::{ClassBuilder, TypeEntry, TypeRegistry};

pub mod prelude {
    pub use crate::{
        Binder, BinderConfig, BindingError, CallContext, Capability, CapabilityInterface,
        ConflictReport, ConvertMarker, DataType, InvokeError, ObjectRef, OperationDescriptor,
        Proxy, QualifiedName, SkeletonKeyError, Target, TargetError, TypeRegistry, Value,
        provides_features_of, provides_static_features_of,
    };
}
