use iom_element::{IonReader, IonWriter};

use crate::info::TypeHint;
use crate::serde::TypeDispatcher;
use crate::{MapError, Reflect, Value};

/// Replaces the standard mapping of an object.
///
/// Registered per type with
/// [`ObjectBuilder::with_serializer`](crate::info::ObjectBuilder::with_serializer),
/// or per type annotation with
/// [`SerializationOptionsBuilder::annotated_serializer`](crate::options::SerializationOptionsBuilder::annotated_serializer).
///
/// Both methods default to the standard mapping, so an implementation may
/// override only one direction.
///
/// # Examples
///
/// ```
/// use iom_element::{IonReader, IonType, IonWriter};
/// use iom_mapper::serde::{CustomSerializer, TypeDispatcher};
/// use iom_mapper::{MapError, Reflect};
///
/// /// Writes every object as an empty struct tagged `redacted`.
/// struct Redacted;
///
/// impl CustomSerializer for Redacted {
///     fn serialize(
///         &self,
///         _dispatcher: &TypeDispatcher<'_>,
///         writer: &mut dyn IonWriter,
///         _value: &dyn Reflect,
///     ) -> Result<(), MapError> {
///         writer.add_annotation("redacted");
///         writer.step_in(IonType::Struct)?;
///         writer.step_out()?;
///         Ok(())
///     }
/// }
/// ```
pub trait CustomSerializer: Send + Sync {
    /// Writes `value` as one Ion value.
    fn serialize(
        &self,
        dispatcher: &TypeDispatcher<'_>,
        writer: &mut dyn IonWriter,
        value: &dyn Reflect,
    ) -> Result<(), MapError> {
        dispatcher.serialize_object(writer, value)
    }

    /// Reads the struct under the cursor.
    ///
    /// The reader is positioned on the struct, before stepping in.
    fn deserialize(
        &self,
        dispatcher: &TypeDispatcher<'_>,
        reader: &mut dyn IonReader,
        target: &TypeHint,
    ) -> Result<Value, MapError> {
        dispatcher.deserialize_struct(reader, target)
    }
}
