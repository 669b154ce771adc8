use alloc::sync::Arc;
use alloc::vec::Vec;

use iom_element::{Element, ElementReader, ElementWriter, IonReader, IonWriter, decode, encode};

use crate::info::TypeHint;
use crate::serde::TypeDispatcher;
use crate::{FromValue, MapError, SerializationOptions, ToValue, TypeRegistry, Typed, Value};

// -----------------------------------------------------------------------------
// IonMapper

/// Maps values to and from Ion with one set of options and one registry.
///
/// Cloning is cheap: options and registry are shared.
///
/// # Examples
///
/// ```
/// use iom_mapper::{IonMapper, MapperFlags, SerializationOptions, TypeRegistry};
/// use iom_mapper::element::Format;
///
/// let options = SerializationOptions::builder().format(Format::Text).build();
/// let mapper = IonMapper::with_options(options, TypeRegistry::new());
///
/// let bytes = mapper.serialize(&vec![1_i32, 1, 2, 3, 5, 8, 11]).unwrap();
/// let back: Vec<i32> = mapper.deserialize(&bytes).unwrap();
/// assert_eq!(back, [1, 1, 2, 3, 5, 8, 11]);
/// ```
#[derive(Debug, Clone)]
pub struct IonMapper {
    options: Arc<SerializationOptions>,
    registry: Arc<TypeRegistry>,
}

impl IonMapper {
    /// Creates a mapper with default options.
    #[inline]
    pub fn new(registry: TypeRegistry) -> Self {
        Self::with_options(SerializationOptions::default(), registry)
    }

    #[inline]
    pub fn with_options(options: SerializationOptions, registry: TypeRegistry) -> Self {
        Self::from_shared(Arc::new(options), Arc::new(registry))
    }

    #[inline]
    pub const fn from_shared(options: Arc<SerializationOptions>, registry: Arc<TypeRegistry>) -> Self {
        Self { options, registry }
    }

    #[inline]
    pub fn options(&self) -> &SerializationOptions {
        &self.options
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    fn dispatcher(&self) -> TypeDispatcher<'_> {
        TypeDispatcher::new(&self.options, &self.registry)
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Serializes `value` to bytes in the configured format.
    pub fn serialize<T: ToValue + ?Sized>(&self, value: &T) -> Result<Vec<u8>, MapError> {
        let mut writer = ElementWriter::new();
        self.serialize_to(&mut writer, value)?;
        Ok(encode(&writer.into_elements(), self.options.format())?)
    }

    /// Writes `value` to `writer` and finishes it.
    pub fn serialize_to<T: ToValue + ?Sized>(
        &self,
        writer: &mut dyn IonWriter,
        value: &T,
    ) -> Result<(), MapError> {
        self.dispatcher().serialize(writer, &value.to_value())?;
        writer.finish()?;
        Ok(())
    }

    /// Serializes `value` to an element stream.
    pub fn serialize_to_elements<T: ToValue + ?Sized>(&self, value: &T) -> Result<Vec<Element>, MapError> {
        let mut writer = ElementWriter::new();
        self.serialize_to(&mut writer, value)?;
        Ok(writer.into_elements())
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Deserializes the first value of `bytes`, binary or text.
    pub fn deserialize<T: FromValue + Typed>(&self, bytes: &[u8]) -> Result<T, MapError> {
        let target = T::type_hint();
        self.dispatcher().validate_target(&target)?;
        let mut reader = ElementReader::new(decode(bytes)?);
        T::from_value(self.deserialize_from(&mut reader, &target)?)
    }

    /// Reads the next value of `reader` as `target`.
    pub fn deserialize_from(&self, reader: &mut dyn IonReader, target: &TypeHint) -> Result<Value, MapError> {
        self.dispatcher().deserialize(reader, target)
    }

    /// Deserializes the first value of an element stream.
    pub fn deserialize_elements<T: FromValue + Typed>(&self, elements: Vec<Element>) -> Result<T, MapError> {
        let target = T::type_hint();
        let mut reader = ElementReader::new(elements);
        T::from_value(self.deserialize_from(&mut reader, &target)?)
    }
}
