//! The cache of per-type mapping descriptors.
//!
//! ## Menu
//!
//! - [`GetObjectInfo`]: a trait describing how a type is mapped.
//! - [`TypeMeta`]: an [`ObjectInfo`](crate::info::ObjectInfo) with its
//!   precomputed identity strings.
//! - [`TypeRegistry`]: the container of `TypeMeta`s, keyed by `TypeId`.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`].
//!
//! We use the [`inventory`](https://docs.rs/inventory) crate for static
//! registration. Types are submitted with [`auto_register!`](crate::auto_register).

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto_register;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;
pub use type_meta::{GetObjectInfo, TypeMeta};

pub(crate) use type_meta::dotted;
pub use type_registry::{Ancestors, TypeRegistry};
