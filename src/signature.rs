//! Rendered signatures for diagnostics.
//!
//! ```text
//! method:       ReturnType name(ParamType,ParamType) throws ExcType, ExcType
//! field:        Type name|otherName
//! constructor:  Type(ParamType,ParamType)
//! ```

use skeleton_key_core::{DataType, OperationDescriptor};

/// Render a method signature.
pub fn method_signature(
    name: &str,
    return_type: &DataType,
    params: &[DataType],
    throws: &[DataType],
) -> String {
    let mut out = format!("{} {}{}", return_type, name, parameters(params));
    if !throws.is_empty() {
        out.push_str(" throws ");
        out.push_str(&join(throws, ", "));
    }
    out
}

/// Render the signature of a requested operation.
pub fn operation_signature(op: &OperationDescriptor) -> String {
    method_signature(&op.name, &op.return_type, &op.param_types(), &op.throws)
}

/// Render a field lookup: the type and every candidate name tried.
pub fn field_signature(names: &[String], data_type: &DataType) -> String {
    format!("{} {}", data_type, names.join("|"))
}

/// Render a constructor lookup.
pub fn constructor_signature(class: &str, params: &[DataType]) -> String {
    format!("{}{}", class, parameters(params))
}

fn parameters(params: &[DataType]) -> String {
    format!("({})", join(params, ","))
}

fn join(types: &[DataType], sep: &str) -> String {
    types
        .iter()
        .map(DataType::simple_name)
        .collect::<Vec<_>>()
        .join(sep)
}
