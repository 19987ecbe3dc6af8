//! Error types for skeleton-key.
//!
//! Errors are split by the phase that raises them:
//!
//! ```text
//! SkeletonKeyError (top-level wrapper)
//! ├── RegistrationError - building the type registry
//! ├── ResolveError      - resolving one operation against a type (bind time)
//! ├── BindingError      - a bind aborted on its first unresolved operation
//! ├── InvokeError       - dispatching a call through a bound capability
//! └── ConversionError   - extracting typed arguments from values
//! ```
//!
//! Failures raised by a target member itself travel as [`TargetError`] and
//! are re-raised unchanged through [`InvokeError::Target`].

use thiserror::Error;

use crate::QualifiedName;

// ============================================================================
// Target Errors
// ============================================================================

/// An error raised by a target member (method body, constructor body).
///
/// `kind` names the error type the member raised, e.g. `IOException`; it is
/// compared against declared exception lists by name only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TargetError {
    /// The raised error type.
    pub kind: QualifiedName,
    /// Human-readable detail.
    pub message: String,
}

impl TargetError {
    /// Create a new target error.
    pub fn new(kind: impl Into<QualifiedName>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Check the simple name of the raised error type.
    pub fn is(&self, simple_name: &str) -> bool {
        self.kind.simple_name() == simple_name
    }
}

impl From<ConversionError> for TargetError {
    fn from(err: ConversionError) -> Self {
        TargetError::new("IllegalArgumentException", err.to_string())
    }
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors extracting a typed Rust value from a [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value holds a different type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// An argument index past the end of the argument list.
    #[error("argument {index} out of bounds ({count} arguments)")]
    ArgumentOutOfBounds { index: usize, count: usize },

    /// A member that needs a receiver was called without one.
    #[error("no receiver for instance member")]
    NoReceiver,
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating the type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A class names a base class that is not registered.
    #[error("class '{class}' extends unknown type '{base}'")]
    UnknownBaseClass { class: String, base: String },

    /// A member with this name is declared twice on one class.
    #[error("duplicate {kind} '{member}' in '{class}'")]
    DuplicateMember {
        class: String,
        member: String,
        kind: &'static str,
    },

    /// A member declaration string could not be parsed.
    #[error("invalid declaration '{decl}': {reason}")]
    InvalidDeclaration { decl: String, reason: String },
}

// ============================================================================
// Resolve Errors
// ============================================================================

/// Errors resolving a single operation against a target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No compatible field, method or constructor at any ancestry level.
    #[error("no such member: {signature}")]
    NoSuchMember {
        /// Rendered signature of the requested operation.
        signature: String,
    },

    /// The target type is not registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The capability interface is not registered.
    #[error("unknown capability interface: {0}")]
    UnknownInterface(String),
}

impl ResolveError {
    /// Create a no-such-member error for a rendered signature.
    pub fn no_such_member(signature: impl Into<String>) -> Self {
        ResolveError::NoSuchMember {
            signature: signature.into(),
        }
    }
}

// ============================================================================
// Binding Errors
// ============================================================================

/// A bind aborted because one operation could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot bind {interface} to {target}: {source}")]
pub struct BindingError {
    /// The capability interface being bound.
    pub interface: QualifiedName,
    /// The target type.
    pub target: QualifiedName,
    /// Rendered signature of the first unresolved operation; empty when the
    /// interface or target type itself is unknown.
    pub operation: String,
    /// Why the operation did not resolve.
    #[source]
    pub source: ResolveError,
}

impl BindingError {
    /// Check if the bind failed because no member matched.
    pub fn is_no_such_member(&self) -> bool {
        matches!(self.source, ResolveError::NoSuchMember { .. })
    }
}

// ============================================================================
// Invoke Errors
// ============================================================================

/// Errors raised while dispatching through a bound capability.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    /// Wrong argument count for a field accessor.
    #[error("{accessor} can only be invoked with {expected} argument(s), was {found}")]
    Arity {
        accessor: &'static str,
        expected: usize,
        found: usize,
    },

    /// A field write's value does not fit the field's declared type.
    #[error("defined type of {field} is {declared}, but assigned type was {assigned}")]
    TypeMismatch {
        field: String,
        declared: String,
        assigned: String,
    },

    /// A write to a field that is still marked immutable.
    #[error("field {field} is immutable")]
    ImmutableField { field: String },

    /// An instance member was invoked without a receiver.
    #[error("{member} needs an instance of {class}")]
    NullReceiver { member: String, class: String },

    /// No operation of that name and arity on the bound interface.
    #[error("no operation {name} with {arity} argument(s) on {interface}")]
    NoSuchOperation {
        interface: QualifiedName,
        name: String,
        arity: usize,
    },

    /// More than one operation of that name and arity.
    #[error("operation {name} with {arity} argument(s) is ambiguous on {interface}")]
    AmbiguousOperation {
        interface: QualifiedName,
        name: String,
        arity: usize,
    },

    /// A value could not be adapted between a concrete and a capability type.
    #[error("cannot convert {from} to {to}: {reason}")]
    Conversion {
        from: String,
        to: String,
        reason: String,
    },

    /// A recursive bind performed during conversion failed.
    #[error(transparent)]
    Binding(#[from] Box<BindingError>),

    /// The target member's own failure, passed through verbatim.
    #[error(transparent)]
    Target(#[from] TargetError),
}

impl InvokeError {
    /// The target member's failure, if this error carries one.
    pub fn target_error(&self) -> Option<&TargetError> {
        match self {
            InvokeError::Target(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BindingError> for InvokeError {
    fn from(err: BindingError) -> Self {
        InvokeError::Binding(Box::new(err))
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Unified error for callers that do not care about the phase.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkeletonKeyError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
