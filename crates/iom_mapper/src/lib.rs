//! Maps application objects to and from the Ion data model.
//!
//! ## Menu
//!
//! - [`Value`]: the closed union of every kind the mapper handles.
//! - [`Reflect`], [`ToValue`], [`FromValue`], [`Typed`]: how application types
//!   take part in mapping. Use [`impl_reflect!`] for structured types.
//! - [`info`]: per-type descriptors built with [`ObjectInfo::builder`](info::ObjectInfo::builder).
//! - [`registry`]: the [`TypeRegistry`] caching descriptors by type identity.
//! - [`naming`]: wire-name conventions.
//! - [`options`]: the immutable [`SerializationOptions`].
//! - [`annotate`] / [`factory`]: type annotation and instantiation strategies.
//! - [`serde`]: the [`TypeDispatcher`](serde::TypeDispatcher) and the
//!   [`ObjectMapper`](serde::ObjectMapper).
//! - [`IonMapper`]: a facade bundling options and registry.
//!
//! ## Example
//!
//! ```
//! use iom_mapper::{impl_reflect, IonMapper, TypeRegistry, info::ObjectInfo};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Car {
//!     brand: String,
//!     year: i32,
//! }
//!
//! impl_reflect!(Car);
//!
//! let mut registry = TypeRegistry::new();
//! registry.insert(
//!     ObjectInfo::builder::<Car>()
//!         .default_constructible()
//!         .property("Brand", |c| c.brand.clone(), |c, v| c.brand = v)
//!         .property("Year", |c| c.year, |c, v| c.year = v)
//!         .build(),
//! );
//!
//! let mapper = IonMapper::new(registry);
//! let car = Car { brand: "Toyota".into(), year: 1998 };
//!
//! let bytes = mapper.serialize(&car).unwrap();
//! let back: Car = mapper.deserialize(&bytes).unwrap();
//! assert_eq!(back, car);
//! ```

// -----------------------------------------------------------------------------
// Extern Self

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mapper;
mod reflection;
mod value;

pub mod annotate;
pub mod factory;
pub mod info;
pub mod naming;
pub mod options;
pub mod registry;
pub mod serde;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::MapError;
pub use mapper::IonMapper;
pub use options::{MapperFlags, SerializationOptions};
pub use reflection::{FromValue, Reflect, ToValue, Typed};
pub use registry::TypeRegistry;
pub use value::{Blob, Clob, Value};

pub use iom_element as element;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;

    pub use crate::reflection::object_from_value;

    #[cfg(feature = "auto_register")]
    pub use inventory;
}
