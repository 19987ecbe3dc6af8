//! Capability interface descriptors.
//!
//! A [`CapabilityInterface`] is the caller's declaration of the operations it
//! wants to perform on an encapsulated type. Each operation is an
//! [`OperationDescriptor`]; conversion requests are [`ConvertMarker`]s
//! attached to a parameter or to the return position, and a
//! [`ConstructStrategy`] tells the conversion protocol how to build
//! instances of a type without a no-argument constructor.
//!
//! # Example
//!
//! ```
//! use skeleton_key_core::{CapabilityInterface, DataType, OperationDescriptor};
//!
//! let iface = CapabilityInterface::new("UnlockedObject")
//!     .with_operation(OperationDescriptor::new("setMyField").param(DataType::string()))
//!     .with_operation(OperationDescriptor::new("getMyField").returns(DataType::string()))
//!     .with_operation(
//!         OperationDescriptor::new("myMethod")
//!             .param(DataType::string())
//!             .param(DataType::bool())
//!             .returns(DataType::int()),
//!     );
//! assert_eq!(iface.operations().len(), 3);
//! assert!(iface.find("getMyField", 0).is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{DataType, QualifiedName, TypeHash, Value};

/// Request to adapt the value at one position structurally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConvertMarker {
    /// Simple name of the concrete type on the target side. Defaults to the
    /// simple name of the declared type at the marked position.
    pub hint: Option<String>,
}

impl ConvertMarker {
    /// Marker without an explicit hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker naming the concrete target type.
    pub fn named(hint: impl Into<String>) -> Self {
        Self {
            hint: Some(hint.into()),
        }
    }

    /// The effective hint for a position declared as `declared`.
    pub fn target_name<'a>(&'a self, declared: &'a DataType) -> &'a str {
        match &self.hint {
            Some(hint) if !hint.is_empty() => hint,
            _ => declared.simple_name(),
        }
    }
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub data_type: DataType,
    pub convert: Option<ConvertMarker>,
}

/// One operation of a capability interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    /// Operation name.
    pub name: String,
    /// Parameters, in order.
    pub params: Vec<Param>,
    /// Return type.
    pub return_type: DataType,
    /// Declared exception types, in order.
    pub throws: Vec<DataType>,
    /// Conversion request for the return position.
    pub convert: Option<ConvertMarker>,
    /// Bind to the null handler instead of failing when unresolved.
    pub optional: bool,
}

impl OperationDescriptor {
    /// A `void` operation with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: DataType::Void,
            throws: Vec::new(),
            convert: None,
            optional: false,
        }
    }

    /// Append a parameter.
    pub fn param(mut self, data_type: DataType) -> Self {
        self.params.push(Param {
            data_type,
            convert: None,
        });
        self
    }

    /// Append a parameter marked for conversion.
    pub fn convert_param(mut self, data_type: DataType, marker: ConvertMarker) -> Self {
        self.params.push(Param {
            data_type,
            convert: Some(marker),
        });
        self
    }

    /// Set the return type.
    pub fn returns(mut self, data_type: DataType) -> Self {
        self.return_type = data_type;
        self
    }

    /// Set the return type and mark it for conversion.
    pub fn returns_converted(mut self, data_type: DataType, marker: ConvertMarker) -> Self {
        self.return_type = data_type;
        self.convert = Some(marker);
        self
    }

    /// Append a declared exception type.
    pub fn throws(mut self, data_type: DataType) -> Self {
        self.throws.push(data_type);
        self
    }

    /// Mark the operation optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Parameter types, in order.
    pub fn param_types(&self) -> Vec<DataType> {
        self.params.iter().map(|p| p.data_type.clone()).collect()
    }

    /// Check if any position carries a conversion marker.
    pub fn is_converted(&self) -> bool {
        self.convert.is_some() || self.params.iter().any(|p| p.convert.is_some())
    }

    /// Effective conversion hint per parameter; `None` where unmarked.
    pub fn conversion_vector(&self) -> Vec<Option<&str>> {
        self.params
            .iter()
            .map(|p| p.convert.as_ref().map(|m| m.target_name(&p.data_type)))
            .collect()
    }

    /// Effective conversion hint of the return position.
    pub fn result_hint(&self) -> Option<&str> {
        self.convert
            .as_ref()
            .map(|m| m.target_name(&self.return_type))
    }

    /// Identity of this operation within its interface (name + parameters).
    pub fn id(&self) -> TypeHash {
        let params: Vec<TypeHash> = self
            .params
            .iter()
            .map(|p| TypeHash::from_name(&p.data_type.to_string()))
            .collect();
        TypeHash::from_member(TypeHash::EMPTY, &self.name, &params)
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// How to build an instance of a type that has no no-argument constructor.
///
/// Supplies the constructor signature to select and a factory for the
/// arguments to pass.
#[derive(Clone)]
pub struct ConstructStrategy {
    /// Strategy name, for diagnostics.
    pub name: String,
    /// Parameter types of the constructor to call.
    pub signature: Vec<DataType>,
    arguments: Arc<dyn Fn() -> Vec<Value> + Send + Sync>,
}

impl ConstructStrategy {
    pub fn new<F>(name: impl Into<String>, signature: Vec<DataType>, arguments: F) -> Self
    where
        F: Fn() -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            arguments: Arc::new(arguments),
        }
    }

    /// Produce a fresh argument list.
    pub fn arguments(&self) -> Vec<Value> {
        (self.arguments)()
    }
}

impl fmt::Debug for ConstructStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructStrategy")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// A caller-declared interface of desired operations.
#[derive(Debug, Clone)]
pub struct CapabilityInterface {
    name: QualifiedName,
    operations: Vec<Arc<OperationDescriptor>>,
    construct: Option<ConstructStrategy>,
}

impl CapabilityInterface {
    /// Create an interface with no operations.
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
            construct: None,
        }
    }

    /// Add an operation.
    pub fn with_operation(mut self, op: OperationDescriptor) -> Self {
        self.operations.push(Arc::new(op));
        self
    }

    /// Attach a construction strategy.
    pub fn with_construct(mut self, strategy: ConstructStrategy) -> Self {
        self.construct = Some(strategy);
        self
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Operations in declaration order.
    pub fn operations(&self) -> &[Arc<OperationDescriptor>] {
        &self.operations
    }

    pub fn construct(&self) -> Option<&ConstructStrategy> {
        self.construct.as_ref()
    }

    /// Find an operation by name and arity.
    pub fn find(&self, name: &str, arity: usize) -> Option<&Arc<OperationDescriptor>> {
        self.operations
            .iter()
            .find(|op| op.name == name && op.arity() == arity)
    }

    /// The interface as a declared type.
    pub fn data_type(&self) -> DataType {
        DataType::Object(self.name.clone())
    }
}
