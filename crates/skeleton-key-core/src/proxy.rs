//! The dispatch seam between callers and bound capabilities.
//!
//! A [`Proxy`] is an object implementing a capability interface: callers hand
//! it an operation and arguments, it relays the result or error unchanged.
//! Proxies travel inside [`Value::Proxy`](crate::Value::Proxy).

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{InvokeError, OperationDescriptor, QualifiedName, Value};

/// An object implementing a capability interface.
pub trait Proxy: Any + Send + Sync + fmt::Debug {
    /// The implemented capability interface.
    fn interface(&self) -> &QualifiedName;

    /// Dispatch one operation.
    fn invoke(&self, op: &OperationDescriptor, args: &[Value]) -> Result<Value, InvokeError>;

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a proxy.
pub type ProxyRef = Arc<dyn Proxy>;
