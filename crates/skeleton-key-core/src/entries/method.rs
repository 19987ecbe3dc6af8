//! Method entry.

use crate::{CallContext, DataType, NativeFn, ObjectRef, QualifiedName, Slots, TargetError, TypeHash, Value};

use super::MemberFlags;

/// A declared method.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    /// Member hash (owner + name + parameter types).
    pub id: TypeHash,
    /// Method name.
    pub name: String,
    /// Declaring class.
    pub owner: QualifiedName,
    /// Parameter types, in order.
    pub params: Vec<DataType>,
    /// Return type.
    pub return_type: DataType,
    /// Declared exception types, in order.
    pub throws: Vec<DataType>,
    /// Modifiers.
    pub flags: MemberFlags,
    /// Native body.
    pub body: NativeFn,
}

impl MethodEntry {
    /// Create a new method entry.
    pub fn new(
        owner: QualifiedName,
        name: impl Into<String>,
        params: Vec<DataType>,
        return_type: DataType,
        body: NativeFn,
    ) -> Self {
        let name = name.into();
        let param_hashes: Vec<TypeHash> = params
            .iter()
            .map(|p| TypeHash::from_name(&p.to_string()))
            .collect();
        Self {
            id: TypeHash::from_member(owner.to_type_hash(), &name, &param_hashes),
            name,
            owner,
            params,
            return_type,
            throws: Vec::new(),
            flags: MemberFlags::empty(),
            body,
        }
    }

    /// Set declared exception types.
    pub fn with_throws(mut self, throws: Vec<DataType>) -> Self {
        self.throws = throws;
        self
    }

    /// Set modifiers.
    pub fn with_flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn is_static(&self) -> bool {
        self.flags.is_static()
    }

    /// Run the body. Static methods ignore `this`.
    pub fn call(
        &self,
        this: Option<&ObjectRef>,
        args: &[Value],
        statics: &Slots,
    ) -> Result<Value, TargetError> {
        let this = if self.is_static() { None } else { this };
        let mut ctx = CallContext::new(this, args, &self.owner, statics);
        self.body.call(&mut ctx)
    }
}
