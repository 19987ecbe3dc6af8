//! Conflict reports.
//!
//! Renders the operations of a capability interface a type cannot serve,
//! one signature per line:
//!
//! ```text
//! cannot map following members in House:
//! bool getNotExisting()
//! void m(String)
//! ```

use std::sync::Arc;

use thiserror::Error;

use skeleton_key_core::{OperationDescriptor, QualifiedName, ResolveError};

use crate::Binder;
use crate::signature::operation_signature;

/// Operations of a capability interface a type does not provide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot map following members in {type_name}:{}", render(.conflicts))]
pub struct ConflictReport {
    pub type_name: String,
    /// Rendered signatures; for an unknown type or interface, the lookup
    /// failure.
    pub conflicts: Vec<String>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }
}

fn render(conflicts: &[String]) -> String {
    conflicts.iter().map(|c| format!("\n{c}")).collect()
}

/// Check that instances of `class` can be bound to `iface`.
pub fn provides_features_of(
    binder: &Binder,
    class: impl Into<QualifiedName>,
    iface: impl Into<QualifiedName>,
) -> Result<(), ConflictReport> {
    let class = class.into();
    report(&class, binder.check(class.clone(), iface))
}

/// Check that `class` itself can be bound to `iface`.
pub fn provides_static_features_of(
    binder: &Binder,
    class: impl Into<QualifiedName>,
    iface: impl Into<QualifiedName>,
) -> Result<(), ConflictReport> {
    let class = class.into();
    report(&class, binder.check_static(class.clone(), iface))
}

fn report(
    class: &QualifiedName,
    checked: Result<Vec<Arc<OperationDescriptor>>, ResolveError>,
) -> Result<(), ConflictReport> {
    let conflicts: Vec<String> = match checked {
        Ok(ops) => ops.iter().map(|op| operation_signature(op)).collect(),
        Err(err) => vec![err.to_string()],
    };
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(ConflictReport {
            type_name: class.simple_name().to_string(),
            conflicts,
        })
    }
}
