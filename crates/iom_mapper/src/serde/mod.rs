//! Mapping between [`Value`](crate::Value)s and Ion cursors.
//!
//! # Overview
//!
//! - [`TypeDispatcher`]: picks the handler for a runtime value (serialize) or
//!   for the element under the cursor (deserialize). Scalars are handled
//!   inline, aggregates recurse, and application objects go to the
//!   [`ObjectMapper`].
//! - [`ObjectMapper`]: converts one application object to or from a struct
//!   using its [`ObjectInfo`](crate::info::ObjectInfo).
//! - [`CustomSerializer`]: replaces the object mapping of a type, selected by
//!   type or by type annotation.
//!
//! ## Annotations
//!
//! Numeric sub-kinds and GUIDs are told apart on the wire by annotations:
//!
//! | value | annotation |
//! |---|---|
//! | 64-bit int | [`WIDE_INT_ANNOTATION`] |
//! | 32-bit float | [`FLOAT32_ANNOTATION`] |
//! | fixed-point decimal | [`DECIMAL128_ANNOTATION`] |
//! | GUID blob | [`GUID_ANNOTATION`], if enabled |

// -----------------------------------------------------------------------------
// Modules

mod custom;
mod dispatcher;
mod info_stack;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use custom::CustomSerializer;
pub use dispatcher::TypeDispatcher;
pub use object::ObjectMapper;

pub(crate) use info_stack::{StackGuard, stack_message};

/// Marks a 64-bit integer. The literal tag is kept for compatibility with
/// existing producers.
pub const WIDE_INT_ANNOTATION: &str = "numeric.int32";

/// Marks a 32-bit float.
pub const FLOAT32_ANNOTATION: &str = "numeric.float32";

/// Marks a fixed-point decimal.
pub const DECIMAL128_ANNOTATION: &str = "numeric.decimal128";

/// Marks a blob holding the 16 bytes of a GUID.
pub const GUID_ANNOTATION: &str = "guid128";
