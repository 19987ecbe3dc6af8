//! Constructor entry.

use crate::{CallContext, DataType, NativeFn, ObjectRef, QualifiedName, Slots, TargetError, TypeHash, Value};

use super::MemberFlags;

/// A declared constructor.
///
/// The body runs against a freshly allocated instance whose slots already
/// hold their initial values. An implicit constructor has no body.
#[derive(Debug, Clone)]
pub struct ConstructorEntry {
    /// Member hash (owner + parameter types).
    pub id: TypeHash,
    /// Class being constructed.
    pub owner: QualifiedName,
    /// Parameter types, in order.
    pub params: Vec<DataType>,
    /// Declared exception types, in order.
    pub throws: Vec<DataType>,
    /// Modifiers.
    pub flags: MemberFlags,
    /// Initializer body, absent for the implicit no-argument constructor.
    pub body: Option<NativeFn>,
}

impl ConstructorEntry {
    /// Create a constructor with a body.
    pub fn new(owner: QualifiedName, params: Vec<DataType>, body: NativeFn) -> Self {
        let param_hashes: Vec<TypeHash> = params
            .iter()
            .map(|p| TypeHash::from_name(&p.to_string()))
            .collect();
        Self {
            id: TypeHash::from_member(owner.to_type_hash(), "<init>", &param_hashes),
            owner,
            params,
            throws: Vec::new(),
            flags: MemberFlags::empty(),
            body: Some(body),
        }
    }

    /// The implicit public no-argument constructor.
    pub fn implicit(owner: QualifiedName) -> Self {
        Self {
            id: TypeHash::from_member(owner.to_type_hash(), "<init>", &[]),
            owner,
            params: Vec::new(),
            throws: Vec::new(),
            flags: MemberFlags::empty(),
            body: None,
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

    /// Check if this is a no-argument constructor.
    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    /// Run the initializer against a fresh instance.
    pub fn initialize(
        &self,
        this: &ObjectRef,
        args: &[Value],
        statics: &Slots,
    ) -> Result<(), TargetError> {
        if let Some(body) = &self.body {
            let mut ctx = CallContext::new(Some(this), args, &self.owner, statics);
            body.call(&mut ctx)?;
        }
        Ok(())
    }
}
