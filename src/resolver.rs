//! Member resolution.
//!
//! [`MemberResolver`] finds the member of a target class that serves a
//! requested operation. Methods are searched first, level by level from the
//! most-derived class up to (but excluding) the root sentinel. If no method
//! fits, accessor-shaped operations fall back to field access and, for
//! class targets, `create` requests fall back to the class's constructors.
//!
//! Within one level an exact match wins over a convertible one; convertible
//! candidates are tried in declaration order.

use std::sync::Arc;

use tracing::trace;

use skeleton_key_core::{
    ClassEntry, ConstructorEntry, DataType, FieldEntry, MemberFlags, MethodEntry,
    OperationDescriptor, ResolveError,
};
use skeleton_key_registry::TypeRegistry;

use crate::BinderConfig;
use crate::naming::{
    field_name_candidates, is_boolean_getter, is_constructor_request, is_getter, is_setter,
    property_hint_of, property_name_of, property_type_of,
};
use crate::signature::{constructor_signature, field_signature, operation_signature};

/// Which members a resolution may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Object access: instance members, plus static ones if configured.
    Instance,
    /// Class access: static members and constructors.
    Static,
}

/// The member an operation resolved to, with the class that declares it.
#[derive(Debug, Clone)]
pub enum Resolved {
    Method {
        owner: Arc<ClassEntry>,
        method: Arc<MethodEntry>,
    },
    Getter {
        owner: Arc<ClassEntry>,
        field: Arc<FieldEntry>,
    },
    Setter {
        owner: Arc<ClassEntry>,
        field: Arc<FieldEntry>,
    },
    Constructor {
        class: Arc<ClassEntry>,
        ctor: Arc<ConstructorEntry>,
    },
}

/// Resolves operations against one target class.
pub struct MemberResolver<'a> {
    registry: &'a TypeRegistry,
    class: &'a Arc<ClassEntry>,
    mode: ResolveMode,
    config: &'a BinderConfig,
}

impl<'a> MemberResolver<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        class: &'a Arc<ClassEntry>,
        mode: ResolveMode,
        config: &'a BinderConfig,
    ) -> Self {
        Self {
            registry,
            class,
            mode,
            config,
        }
    }

    /// Resolve one operation.
    ///
    /// A failed field fallback reports the original method failure; a failed
    /// constructor lookup reports the constructor signature.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&self, op: &OperationDescriptor) -> Result<Resolved, ResolveError> {
        let method_err = match self.find_method(op) {
            Ok(resolved) => return Ok(resolved),
            Err(err) => err,
        };

        if self.mode == ResolveMode::Static && is_constructor_request(op) {
            self.find_constructor(op)
        } else if is_setter(op) {
            self.find_property(op)
                .map(|(owner, field)| Resolved::Setter { owner, field })
                .map_err(|_| method_err)
        } else if is_getter(op) || is_boolean_getter(op) {
            self.find_property(op)
                .map(|(owner, field)| Resolved::Getter { owner, field })
                .map_err(|_| method_err)
        } else {
            Err(method_err)
        }
    }

    fn visible(&self, flags: MemberFlags) -> bool {
        match self.mode {
            ResolveMode::Static => flags.is_static(),
            ResolveMode::Instance => self.config.static_members_on_instances() || !flags.is_static(),
        }
    }

    /// Find a method serving `op` at the nearest ancestry level.
    pub fn find_method(&self, op: &OperationDescriptor) -> Result<Resolved, ResolveError> {
        let params = op.param_types();
        let converted = op.is_converted();
        let hints = op.conversion_vector();
        let result_hint = op.result_hint();

        for level in self.registry.ancestry(&self.class.name) {
            trace!(operation = %op.name, level = %level.name, "searching methods");
            let candidates: Vec<&Arc<MethodEntry>> = level
                .methods_named(&op.name)
                .filter(|m| self.visible(m.flags))
                .collect();

            let exact = candidates.iter().find(|m| {
                m.params == params && m.return_type == op.return_type && m.throws == op.throws
            });
            let found = match exact {
                Some(m) => Some(m),
                None if converted => candidates
                    .iter()
                    .find(|m| self.matches_converted(op, m, &hints, result_hint)),
                None => None,
            };

            if let Some(method) = found {
                trace!(operation = %op.name, owner = %level.name, "resolved method");
                return Ok(Resolved::Method {
                    owner: Arc::clone(level),
                    method: Arc::clone(*method),
                });
            }
        }

        Err(ResolveError::no_such_member(operation_signature(op)))
    }

    fn matches_converted(
        &self,
        op: &OperationDescriptor,
        candidate: &MethodEntry,
        hints: &[Option<&str>],
        result_hint: Option<&str>,
    ) -> bool {
        candidate.params.len() == op.params.len()
            && op
                .params
                .iter()
                .zip(&candidate.params)
                .zip(hints)
                .all(|((req, decl), hint)| self.is_compliant(&req.data_type, decl, *hint))
            && self.is_compliant(&op.return_type, &candidate.return_type, result_hint)
            && candidate.throws == op.throws
    }

    /// Check if a declared type may serve a requested one under a hint.
    ///
    /// Types match when equal, when the hint names the requested type and the
    /// declared type is assignable to it, or when the hint names the declared
    /// type.
    pub fn is_compliant(&self, requested: &DataType, declared: &DataType, hint: Option<&str>) -> bool {
        declared == requested
            || hint.is_some_and(|hint| {
                (requested.simple_name() == hint && self.registry.is_assignable(requested, declared))
                    || declared.simple_name() == hint
            })
    }

    fn find_property(
        &self,
        op: &OperationDescriptor,
    ) -> Result<(Arc<ClassEntry>, Arc<FieldEntry>), ResolveError> {
        let Some(data_type) = property_type_of(op) else {
            return Err(ResolveError::no_such_member(operation_signature(op)));
        };
        let hint = if op.is_converted() {
            property_hint_of(op)
        } else {
            None
        };
        self.find_field(property_name_of(op), data_type, hint)
    }

    /// Find a field for a property pattern.
    ///
    /// At each level every candidate name is tried in order; a field matches
    /// if its type equals `data_type` or its type's simple name is `hint`.
    pub fn find_field(
        &self,
        pattern: &str,
        data_type: &DataType,
        hint: Option<&str>,
    ) -> Result<(Arc<ClassEntry>, Arc<FieldEntry>), ResolveError> {
        let names = field_name_candidates(pattern);

        for level in self.registry.ancestry(&self.class.name) {
            trace!(pattern, level = %level.name, "searching fields");
            for name in &names {
                let Some(field) = level.find_field(name) else {
                    continue;
                };
                if !self.visible(field.flags()) {
                    continue;
                }
                if &field.data_type == data_type
                    || hint.is_some_and(|h| field.data_type.simple_name() == h)
                {
                    trace!(field = %field.name, owner = %level.name, "resolved field");
                    return Ok((Arc::clone(level), Arc::clone(field)));
                }
            }
        }

        Err(ResolveError::no_such_member(field_signature(&names, data_type)))
    }

    /// Find a constructor of the target class itself for a `create` request.
    ///
    /// Each declared parameter type must accept the requested one; with a
    /// conversion marker, compliant parameters are accepted too. Exception
    /// lists must match exactly.
    pub fn find_constructor(&self, op: &OperationDescriptor) -> Result<Resolved, ResolveError> {
        let params = op.param_types();
        let converted = op.is_converted();
        let hints = op.conversion_vector();

        let found = self.class.constructors.iter().find(|ctor| {
            ctor.params.len() == params.len()
                && ctor.throws == op.throws
                && params
                    .iter()
                    .zip(&ctor.params)
                    .zip(&hints)
                    .all(|((req, decl), hint)| {
                        self.registry.is_assignable(decl, req)
                            || (converted && self.is_compliant(req, decl, *hint))
                    })
        });

        match found {
            Some(ctor) => {
                trace!(class = %self.class.name, "resolved constructor");
                Ok(Resolved::Constructor {
                    class: Arc::clone(self.class),
                    ctor: Arc::clone(ctor),
                })
            }
            None => Err(ResolveError::no_such_member(constructor_signature(
                self.class.simple_name(),
                &params,
            ))),
        }
    }
}
