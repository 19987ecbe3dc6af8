//! Registry entry types.
//!
//! - [`ClassEntry`] - a class with its declared members and static storage
//! - [`FieldEntry`] - a declared field
//! - [`MethodEntry`] - a declared method with its native body
//! - [`ConstructorEntry`] - a declared (or implicit) constructor
//! - [`MemberFlags`] - static/final/private/constant modifiers

mod class;
mod constructor;
mod field;
mod flags;
mod method;

pub use class::ClassEntry;
pub use constructor::ConstructorEntry;
pub use field::FieldEntry;
pub use flags::MemberFlags;
pub use method::MethodEntry;
