//! How application types take part in mapping.
//!
//! - [`Reflect`]: a type-erased application object.
//! - [`ToValue`] / [`FromValue`]: conversions to and from [`Value`](crate::Value).
//! - [`Typed`]: the static declared type of a Rust type as a [`TypeHint`](crate::info::TypeHint).
//!
//! Structured types implement all four with [`impl_reflect!`](crate::impl_reflect).

mod convert;
mod macros;
mod reflect;

pub use convert::{FromValue, ToValue, Typed};
pub use reflect::Reflect;

pub(crate) use convert::{big_to_decimal, decimal_to_big};

#[doc(hidden)]
pub use convert::object_from_value;
