//! Type registry for skeleton-key.
//!
//! [`TypeRegistry`] owns the metadata of registered target classes and
//! capability interfaces; [`ClassBuilder`] is the fluent way to describe a
//! class and its members.

mod class_builder;
mod declaration;
mod registry;

pub use class_builder::ClassBuilder;
pub use registry::{TypeEntry, TypeRegistry};
