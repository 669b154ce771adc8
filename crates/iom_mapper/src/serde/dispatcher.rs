use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::Cell;

use iom_element::{IonReader, IonType, IonWriter};
use log::warn;
use uuid::Uuid;

use crate::info::{ObjectInfo, ObjectType, TypeHint};
use crate::reflection::{big_to_decimal, decimal_to_big};
use crate::registry::TypeRegistry;
use crate::serde::{DECIMAL128_ANNOTATION, FLOAT32_ANNOTATION, GUID_ANNOTATION};
use crate::serde::{ObjectMapper, StackGuard, WIDE_INT_ANNOTATION};
use crate::{MapError, MapperFlags, Reflect, SerializationOptions, Value};

// -----------------------------------------------------------------------------
// TypeDispatcher

/// Dispatches values to their handlers in both directions.
///
/// # Serialization Rules
///
/// The runtime variant of the [`Value`] decides the written kind. Objects go
/// through, in order:
///
/// 1. the custom serializer of their type, if any;
/// 2. the custom serializer registered for their first type annotation, if any;
/// 3. the [`ObjectMapper`].
///
/// # Deserialization Rules
///
/// The element kind under the cursor decides the produced variant, refined by
/// its annotations and the requested [`TypeHint`]. Structs go through:
///
/// 1. the custom serializer registered for their first type annotation, if any;
/// 2. the custom serializer of the target type, if any;
/// 3. the [`ObjectMapper`] for object targets, or an untyped struct.
///
/// Aggregates deeper than [`max_depth`](SerializationOptions::max_depth)
/// fail with [`MapError::DepthExceeded`].
///
/// # Examples
///
/// ```
/// use iom_element::{ElementReader, ElementWriter, IonWriter};
/// use iom_mapper::{SerializationOptions, TypeRegistry, Value};
/// use iom_mapper::info::TypeHint;
/// use iom_mapper::serde::TypeDispatcher;
///
/// let options = SerializationOptions::default();
/// let registry = TypeRegistry::new();
/// let dispatcher = TypeDispatcher::new(&options, &registry);
///
/// let mut writer = ElementWriter::new();
/// dispatcher.serialize(&mut writer, &Value::Int64(7)).unwrap();
/// writer.finish().unwrap();
///
/// let mut reader = ElementReader::new(writer.into_elements());
/// let value = dispatcher.deserialize(&mut reader, &TypeHint::Any).unwrap();
/// assert_eq!(value, Value::Int64(7));
/// ```
pub struct TypeDispatcher<'a> {
    options: &'a SerializationOptions,
    registry: &'a TypeRegistry,
    depth: Cell<usize>,
}

/// Restores the nesting depth when dropped.
struct DepthGuard<'a>(&'a Cell<usize>);

impl Drop for DepthGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl<'a> TypeDispatcher<'a> {
    #[inline]
    pub const fn new(options: &'a SerializationOptions, registry: &'a TypeRegistry) -> Self {
        Self {
            options,
            registry,
            depth: Cell::new(0),
        }
    }

    #[inline]
    pub const fn options(&self) -> &'a SerializationOptions {
        self.options
    }

    #[inline]
    pub const fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// The number of aggregates currently open.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    fn enter(&self) -> Result<DepthGuard<'_>, MapError> {
        let depth = self.depth.get() + 1;
        if depth > self.options.max_depth() {
            return Err(MapError::DepthExceeded(self.options.max_depth()));
        }
        self.depth.set(depth);
        Ok(DepthGuard(&self.depth))
    }

    fn registered(&self, ty: &ObjectType) -> Result<&'a ObjectInfo, MapError> {
        self.registry
            .get_info(ty.id())
            .ok_or_else(|| MapError::configuration(alloc::format!("type `{ty}` is not registered")))
    }

    // -------------------------------------------------------------------------
    // Serialize

    /// Writes `value` as one Ion value.
    pub fn serialize(&self, writer: &mut dyn IonWriter, value: &Value) -> Result<(), MapError> {
        match value {
            Value::Null => writer.write_null()?,
            Value::Bool(v) => writer.write_bool(*v)?,
            Value::Int32(v) => writer.write_int(i64::from(*v))?,
            Value::Int64(v) => {
                writer.add_annotation(WIDE_INT_ANNOTATION);
                writer.write_int(*v)?;
            }
            Value::Float32(v) => {
                writer.add_annotation(FLOAT32_ANNOTATION);
                writer.write_float(f64::from(*v))?;
            }
            Value::Float64(v) => writer.write_float(*v)?,
            Value::Decimal(v) => {
                writer.add_annotation(DECIMAL128_ANNOTATION);
                writer.write_decimal(&decimal_to_big(v))?;
            }
            Value::BigDecimal(v) => writer.write_decimal(v)?,
            Value::Timestamp(v) => writer.write_timestamp(v)?,
            Value::String(v) => writer.write_string(v)?,
            Value::Symbol(v) => writer.write_symbol(v)?,
            Value::Blob(v) => writer.write_blob(v)?,
            Value::Clob(v) => writer.write_clob(v)?,
            Value::Guid(v) => {
                if self.options.has(MapperFlags::ANNOTATE_GUIDS) {
                    writer.add_annotation(GUID_ANNOTATION);
                }
                writer.write_blob(v.as_bytes())?;
            }
            Value::List(values) => {
                let _depth = self.enter()?;
                writer.step_in(IonType::List)?;
                for value in values {
                    self.serialize(writer, value)?;
                }
                writer.step_out()?;
            }
            Value::Struct(fields) => {
                let _depth = self.enter()?;
                writer.step_in(IonType::Struct)?;
                for (name, value) in fields {
                    writer.set_field_name(name);
                    self.serialize(writer, value)?;
                }
                writer.step_out()?;
            }
            Value::Object(obj) => self.serialize_reflect(writer, &**obj)?,
        }
        Ok(())
    }

    fn serialize_reflect(&self, writer: &mut dyn IonWriter, value: &dyn Reflect) -> Result<(), MapError> {
        let info = self
            .registry
            .get_info(value.reflect_type_id())
            .ok_or_else(|| MapError::unsupported_type(value.type_path()))?;
        let _stack = StackGuard::push(info.ty().path());

        if let Some(custom) = info.serializer() {
            return custom.serialize(self, writer, value);
        }

        let annotations = self
            .options
            .type_annotator()
            .annotations(self.options, self.registry, info);
        if let Some(custom) = annotations
            .first()
            .and_then(|tag| self.options.annotated_serializer(tag))
        {
            return custom.serialize(self, writer, value);
        }

        let _depth = self.enter()?;
        ObjectMapper::new(self, info).serialize(writer, value, annotations)
    }

    /// Writes an application object with the [`ObjectMapper`], ignoring
    /// custom serializers.
    pub fn serialize_object(&self, writer: &mut dyn IonWriter, value: &dyn Reflect) -> Result<(), MapError> {
        let info = self
            .registry
            .get_info(value.reflect_type_id())
            .ok_or_else(|| MapError::unsupported_type(value.type_path()))?;
        let _stack = StackGuard::push(info.ty().path());
        let _depth = self.enter()?;

        let annotations = self
            .options
            .type_annotator()
            .annotations(self.options, self.registry, info);
        ObjectMapper::new(self, info).serialize(writer, value, annotations)
    }

    // -------------------------------------------------------------------------
    // Deserialize

    /// Fails on targets whose descriptor cannot be deserialized.
    ///
    /// Runs before the reader is touched.
    pub fn validate_target(&self, target: &TypeHint) -> Result<(), MapError> {
        match target {
            TypeHint::Object(ty) => match self.registry.get_info(ty.id()) {
                Some(info) => ObjectMapper::check_constructors(info),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Advances the reader and reads the next value as `target`.
    ///
    /// Returns [`Value::Null`] at the end of the stream.
    pub fn deserialize(&self, reader: &mut dyn IonReader, target: &TypeHint) -> Result<Value, MapError> {
        self.validate_target(target)?;
        let ion_type = reader.next()?;
        self.deserialize_current(reader, target, ion_type)
    }

    /// Reads the value the reader is positioned on, of kind `ion_type`.
    pub fn deserialize_current(
        &self,
        reader: &mut dyn IonReader,
        target: &TypeHint,
        ion_type: Option<IonType>,
    ) -> Result<Value, MapError> {
        let Some(ion_type) = ion_type else {
            return Ok(Value::Null);
        };

        if let TypeHint::Object(ty) = target
            && !matches!(ion_type, IonType::Null | IonType::Struct)
        {
            return Err(MapError::unsupported_data(alloc::format!(
                "expected a struct for `{ty}`, found {ion_type}"
            )));
        }

        let value = match ion_type {
            IonType::Null => Value::Null,
            IonType::Bool => Value::Bool(reader.bool_value()?),
            IonType::Int => self.read_int(reader)?,
            IonType::Float => {
                let v = reader.double_value()?;
                if reader.has_annotation(FLOAT32_ANNOTATION) {
                    Value::Float32(v as f32)
                } else {
                    Value::Float64(v)
                }
            }
            IonType::Decimal => {
                let v = reader.decimal_value()?;
                if reader.has_annotation(DECIMAL128_ANNOTATION) {
                    let fixed = big_to_decimal(&v).ok_or_else(|| {
                        MapError::unsupported_data(alloc::format!(
                            "decimal {v} does not fit a 128-bit decimal"
                        ))
                    })?;
                    Value::Decimal(fixed)
                } else {
                    Value::BigDecimal(v)
                }
            }
            IonType::Timestamp => Value::Timestamp(reader.timestamp_value()?),
            IonType::String => Value::String(reader.string_value()?),
            IonType::Symbol => Value::Symbol(reader.symbol_value()?),
            IonType::Clob => Value::Clob(reader.lob_bytes()?),
            IonType::Blob => {
                if reader.has_annotation(GUID_ANNOTATION) || *target == TypeHint::Guid {
                    let bytes = reader.lob_bytes()?;
                    let guid = Uuid::from_slice(&bytes).map_err(|_| {
                        MapError::unsupported_data(alloc::format!(
                            "a GUID needs 16 bytes, found {}",
                            bytes.len()
                        ))
                    })?;
                    Value::Guid(guid)
                } else {
                    Value::Blob(reader.lob_bytes()?)
                }
            }
            IonType::List => self.read_list(reader, target)?,
            IonType::Struct => self.read_struct(reader, target)?,
        };
        Ok(value)
    }

    fn read_int(&self, reader: &mut dyn IonReader) -> Result<Value, MapError> {
        let v = reader.int_value()?;
        if reader.has_annotation(WIDE_INT_ANNOTATION) {
            return Ok(Value::Int64(v));
        }
        match i32::try_from(v) {
            Ok(narrow) => Ok(Value::Int32(narrow)),
            Err(_) if self.options.has(MapperFlags::PERMISSIVE) => {
                warn!("integer {v} without `{WIDE_INT_ANNOTATION}` read as 64-bit");
                Ok(Value::Int64(v))
            }
            Err(_) => Err(MapError::unsupported_data(alloc::format!(
                "integer {v} does not fit 32 bits and lacks `{WIDE_INT_ANNOTATION}`"
            ))),
        }
    }

    fn read_list(&self, reader: &mut dyn IonReader, target: &TypeHint) -> Result<Value, MapError> {
        let element = match target {
            TypeHint::List(element) => &**element,
            TypeHint::Any => &TypeHint::Any,
            other => {
                return Err(MapError::unsupported_data(alloc::format!(
                    "`{other}` is not list-like"
                )));
            }
        };

        let _depth = self.enter()?;
        reader.step_in()?;
        let mut values = Vec::new();
        while let Some(ion_type) = reader.next()? {
            values.push(self.deserialize_current(reader, element, Some(ion_type))?);
        }
        reader.step_out()?;
        Ok(Value::List(values))
    }

    fn read_struct(&self, reader: &mut dyn IonReader, target: &TypeHint) -> Result<Value, MapError> {
        let tag = reader.annotations().first().cloned();
        if let Some(custom) = tag
            .as_deref()
            .and_then(|tag| self.options.annotated_serializer(tag))
        {
            return custom.deserialize(self, reader, target);
        }

        // The tag selects a descendant of an object target, else the target itself.
        let concrete = match (target, tag.as_deref()) {
            (TypeHint::Object(ty), Some(tag)) => Some(
                self.registry
                    .resolve_annotation(self.options, tag, target)?
                    .map_or(*ty, |info| *info.ty()),
            ),
            (TypeHint::Object(ty), None) => Some(*ty),
            (TypeHint::Any, Some(tag)) => self
                .registry
                .resolve_annotation(self.options, tag, target)?
                .map(|info| *info.ty()),
            _ => None,
        };

        match concrete {
            Some(ty) => {
                let info = self.registered(&ty)?;
                match info.serializer() {
                    Some(custom) => custom.deserialize(self, reader, &TypeHint::Object(ty)),
                    None => self.deserialize_object(reader, info),
                }
            }
            None if *target == TypeHint::Any => self.read_untyped_struct(reader, target),
            None => self.deserialize_struct(reader, target),
        }
    }

    fn read_untyped_struct(&self, reader: &mut dyn IonReader, value_hint: &TypeHint) -> Result<Value, MapError> {
        let _depth = self.enter()?;
        reader.step_in()?;
        let mut fields = Vec::new();
        while let Some(ion_type) = reader.next()? {
            let name = reader
                .field_name()
                .map(ToString::to_string)
                .ok_or_else(|| MapError::unsupported_data("struct field without a name"))?;
            let value = self.deserialize_current(reader, value_hint, Some(ion_type))?;
            fields.push((name, value));
        }
        reader.step_out()?;
        Ok(Value::Struct(fields))
    }

    fn deserialize_object(&self, reader: &mut dyn IonReader, info: &ObjectInfo) -> Result<Value, MapError> {
        let _stack = StackGuard::push(info.ty().path());
        let _depth = self.enter()?;
        ObjectMapper::new(self, info).deserialize(reader).map(Value::Object)
    }

    /// Reads the struct under the cursor as `target`, ignoring custom
    /// serializers.
    ///
    /// Object targets go to the [`ObjectMapper`]. Map targets and `Any`
    /// targets without a resolvable type annotation produce an untyped
    /// [`Value::Struct`].
    pub fn deserialize_struct(&self, reader: &mut dyn IonReader, target: &TypeHint) -> Result<Value, MapError> {
        match target {
            TypeHint::Object(ty) => {
                let info = self.registered(ty)?;
                self.deserialize_object(reader, info)
            }
            TypeHint::Map(value_hint) => self.read_untyped_struct(reader, value_hint),
            TypeHint::Any => {
                let tag: Option<String> = reader.annotations().first().cloned();
                let resolved = match tag {
                    Some(tag) => self.registry.resolve_annotation(self.options, &tag, target)?,
                    None => None,
                };
                match resolved {
                    Some(info) => self.deserialize_object(reader, info),
                    None => self.read_untyped_struct(reader, target),
                }
            }
            scalar => Err(MapError::configuration(alloc::format!(
                "cannot read a struct as `{scalar}`"
            ))),
        }
    }
}
