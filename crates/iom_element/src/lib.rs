//! The Ion data model and the cursor contract consumed by the mapper.
//!
//! ## Menu
//!
//! - [`IonType`]: the kind of a value reported by a cursor.
//! - [`Element`] / [`ElementValue`]: an owned, annotated Ion value tree.
//! - [`SymbolToken`]: a symbol with optional text and symbol id.
//! - [`IonReader`] / [`IonWriter`]: forward-only cursors over a value stream.
//! - [`ElementReader`] / [`ElementWriter`]: in-memory cursor implementations.
//! - [`Format`], [`encode`], [`decode`]: byte encodings of an element stream.
//!
//! Cursors are stateful and forward-only. A value that has been moved past
//! cannot be read again, so callers must consume every value they step over.

// -----------------------------------------------------------------------------
// Extern Self

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod cursor;
mod element;
mod error;
mod ion_type;
mod symbol;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use codec::{BINARY_VERSION_MARKER, Format, decode, encode};
pub use cursor::{ElementReader, ElementWriter, IonReader, IonWriter};
pub use element::{Element, ElementValue};
pub use error::ElementError;
pub use ion_type::IonType;
pub use symbol::SymbolToken;

// Scalar payload crates, re-exported so callers name the same versions.
pub use bigdecimal;
pub use chrono;
