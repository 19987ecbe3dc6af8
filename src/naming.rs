//! Naming conventions of capability operations.
//!
//! Classifies an [`OperationDescriptor`] as getter, boolean getter, setter,
//! constructor request or plain method, and derives the field names a
//! property may be stored under.
//!
//! ```
//! use skeleton_key::naming::{field_name_candidates, is_getter, property_name_of};
//! use skeleton_key::{DataType, OperationDescriptor};
//!
//! let op = OperationDescriptor::new("getMyField").returns(DataType::string());
//! assert!(is_getter(&op));
//! assert_eq!(property_name_of(&op), "MyField");
//! assert_eq!(field_name_candidates("MyField"), vec!["myField", "MyField"]);
//! ```

use skeleton_key_core::{DataType, OperationDescriptor};

/// Reserved name of constructor requests.
pub const CONSTRUCTOR: &str = "create";
pub const IS: &str = "is";
pub const GET: &str = "get";
pub const SET: &str = "set";

/// `getX()`: no parameters, no exceptions, non-void result.
pub fn is_getter(op: &OperationDescriptor) -> bool {
    op.name.len() > GET.len()
        && op.name.starts_with(GET)
        && op.params.is_empty()
        && op.throws.is_empty()
        && !op.return_type.is_void()
}

/// `isX()`: no parameters, no exceptions, `bool` or `Boolean` result.
pub fn is_boolean_getter(op: &OperationDescriptor) -> bool {
    op.name.len() > IS.len()
        && op.name.starts_with(IS)
        && op.params.is_empty()
        && op.throws.is_empty()
        && op.return_type.is_boolean()
}

/// `setX(v)`: one parameter, no exceptions, void result.
pub fn is_setter(op: &OperationDescriptor) -> bool {
    op.name.len() > SET.len()
        && op.name.starts_with(SET)
        && op.params.len() == 1
        && op.throws.is_empty()
        && op.return_type.is_void()
}

/// `create(...)` returning an object.
pub fn is_constructor_request(op: &OperationDescriptor) -> bool {
    op.name == CONSTRUCTOR && op.return_type.is_reference()
}

/// The property an accessor refers to; the full name for other operations.
pub fn property_name_of(op: &OperationDescriptor) -> &str {
    if is_setter(op) || is_getter(op) {
        &op.name[GET.len()..]
    } else if is_boolean_getter(op) {
        &op.name[IS.len()..]
    } else {
        &op.name
    }
}

/// The type an accessor reads or writes.
pub fn property_type_of(op: &OperationDescriptor) -> Option<&DataType> {
    if is_setter(op) {
        op.params.first().map(|p| &p.data_type)
    } else if is_getter(op) || is_boolean_getter(op) {
        Some(&op.return_type)
    } else {
        None
    }
}

/// The conversion hint attached to an accessor's property position.
pub fn property_hint_of(op: &OperationDescriptor) -> Option<&str> {
    if is_setter(op) {
        op.params
            .first()
            .and_then(|p| p.convert.as_ref().map(|m| m.target_name(&p.data_type)))
    } else if is_getter(op) || is_boolean_getter(op) {
        op.result_hint()
    } else {
        None
    }
}

/// Field names a property pattern may be stored under, in lookup order.
///
/// An all upper-case pattern is tried verbatim first (a constant), any other
/// pattern with its first letter lowered first.
pub fn field_name_candidates(pattern: &str) -> Vec<String> {
    let lowered = lower_first(pattern);
    if pattern.to_uppercase() == pattern {
        vec![pattern.to_string(), lowered]
    } else {
        vec![lowered, pattern.to_string()]
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
