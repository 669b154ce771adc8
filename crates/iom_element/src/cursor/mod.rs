//! Forward-only cursors over an Ion value stream.

mod reader;
mod writer;

pub use reader::ElementReader;
pub use writer::ElementWriter;

use alloc::string::String;
use alloc::vec::Vec;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::{ElementError, IonType, SymbolToken};

// -----------------------------------------------------------------------------
// IonReader

/// A pull cursor over a stream of Ion values.
///
/// The cursor is positioned on at most one value at a time. [`next`](Self::next)
/// moves to the following sibling and reports its kind, or `None` at the end
/// of the current container. Typed getters read the current value and fail
/// with [`ElementError::TypeMismatch`] for any other kind.
pub trait IonReader {
    /// Advances to the next sibling at the current depth.
    fn next(&mut self) -> Result<Option<IonType>, ElementError>;

    /// The kind of the current value, `None` before the first `next` or at the end.
    fn current_type(&self) -> Option<IonType>;

    /// Enters the current list or struct. The first child is read with `next`.
    fn step_in(&mut self) -> Result<(), ElementError>;

    /// Leaves the current container, skipping any unread children.
    fn step_out(&mut self) -> Result<(), ElementError>;

    /// The container depth, `0` at top level.
    fn depth(&self) -> usize;

    /// The field name of the current value when inside a struct.
    fn field_name(&self) -> Option<&str>;

    /// The annotations of the current value, in wire order.
    fn annotations(&self) -> &[String];

    fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations().iter().any(|a| a == annotation)
    }

    fn is_null(&self) -> bool {
        self.current_type() == Some(IonType::Null)
    }

    fn bool_value(&mut self) -> Result<bool, ElementError>;
    fn int_value(&mut self) -> Result<i64, ElementError>;
    fn double_value(&mut self) -> Result<f64, ElementError>;
    fn decimal_value(&mut self) -> Result<BigDecimal, ElementError>;
    fn timestamp_value(&mut self) -> Result<DateTime<Utc>, ElementError>;
    fn string_value(&mut self) -> Result<String, ElementError>;
    fn symbol_value(&mut self) -> Result<SymbolToken, ElementError>;

    /// Byte length of the current blob or clob.
    fn lob_len(&self) -> Result<usize, ElementError>;

    /// Bytes of the current blob or clob.
    fn lob_bytes(&mut self) -> Result<Vec<u8>, ElementError>;
}

// -----------------------------------------------------------------------------
// IonWriter

/// A push cursor producing a stream of Ion values.
///
/// Field names and annotations apply to the next written value only.
/// Inside a struct every value requires a field name.
pub trait IonWriter {
    fn set_field_name(&mut self, name: &str);

    /// Sets the annotations of the next value, replacing any pending ones.
    fn set_annotations(&mut self, annotations: Vec<String>);

    fn add_annotation(&mut self, annotation: &str);

    fn write_null(&mut self) -> Result<(), ElementError>;
    fn write_bool(&mut self, value: bool) -> Result<(), ElementError>;
    fn write_int(&mut self, value: i64) -> Result<(), ElementError>;
    fn write_float(&mut self, value: f64) -> Result<(), ElementError>;
    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), ElementError>;
    fn write_timestamp(&mut self, value: &DateTime<Utc>) -> Result<(), ElementError>;
    fn write_string(&mut self, value: &str) -> Result<(), ElementError>;
    fn write_symbol(&mut self, value: &SymbolToken) -> Result<(), ElementError>;
    fn write_blob(&mut self, value: &[u8]) -> Result<(), ElementError>;
    fn write_clob(&mut self, value: &[u8]) -> Result<(), ElementError>;

    /// Opens a `List` or `Struct`.
    fn step_in(&mut self, container: IonType) -> Result<(), ElementError>;

    fn step_out(&mut self) -> Result<(), ElementError>;

    fn depth(&self) -> usize;

    /// Completes the stream. Fails if a container is still open.
    fn finish(&mut self) -> Result<(), ElementError>;
}
