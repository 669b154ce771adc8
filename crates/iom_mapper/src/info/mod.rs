//! Per-type descriptors.
//!
//! ## Menu
//!
//! - [`TypeHint`] / [`ObjectType`]: declared types of members and parameters.
//! - [`MemberInfo`]: a property or field with its accessors and markers.
//! - [`WireGetter`] / [`WireSetter`]: accessors bound to a wire name.
//! - [`ConstructorInfo`]: the designated constructor and its parameter bindings.
//! - [`AnnotateType`] / [`DoNotAnnotateType`]: type annotation markers.
//! - [`ObjectInfo`]: everything the mapper knows about one type, built with
//!   [`ObjectInfo::builder`].

mod annotation;
mod constructor_info;
mod member_info;
mod object_info;
mod type_hint;

pub use annotation::{AnnotateType, DoNotAnnotateType};
pub use constructor_info::{ConstructorArgs, ConstructorInfo, ParamInfo};
pub use member_info::{Getter, MemberInfo, MemberKind, Setter, WireGetter, WireSetter};
pub use object_info::{ObjectBuilder, ObjectInfo};
pub use type_hint::{ObjectType, TypeHint};
