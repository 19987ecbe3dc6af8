//! Core types for skeleton-key.
//!
//! This crate holds the data model shared by the registry and the binding
//! engine:
//!
//! - [`TypeHash`], [`QualifiedName`], [`DataType`] - type identity
//! - [`Value`], [`Object`], [`Slots`] - runtime values and field storage
//! - [`ClassEntry`] and member entries - registered target metadata
//! - [`NativeFn`], [`CallContext`] - native member bodies
//! - [`CapabilityInterface`], [`OperationDescriptor`] - capability declarations
//! - [`Proxy`] - the dispatch seam for bound capabilities
//! - [`error`] - the error taxonomy

pub mod capability;
pub mod convert;
pub mod data_type;
pub mod entries;
pub mod error;
pub mod native_fn;
pub mod object;
pub mod primitive_kind;
pub mod proxy;
pub mod qualified_name;
pub mod type_hash;
pub mod value;

pub use capability::{CapabilityInterface, ConstructStrategy, ConvertMarker, OperationDescriptor, Param};
pub use convert::FromValue;
pub use data_type::{DataType, ROOT_TYPE, STRING_TYPE};
pub use entries::{ClassEntry, ConstructorEntry, FieldEntry, MemberFlags, MethodEntry};
pub use error::{
    BindingError, ConversionError, InvokeError, RegistrationError, ResolveError, SkeletonKeyError,
    TargetError,
};
pub use native_fn::{CallContext, NativeCallable, NativeFn};
pub use object::{Object, ObjectRef, Slots};
pub use primitive_kind::PrimitiveKind;
pub use proxy::{Proxy, ProxyRef};
pub use qualified_name::QualifiedName;
pub use type_hash::{TypeHash, hash_constants};
pub use value::Value;
