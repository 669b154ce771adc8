use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use iom_element::{IonReader, IonType};
use log::{trace, warn};

use super::{Binding, ObjectMapper};
use crate::info::{ConstructorInfo, MemberInfo, MemberKind, ObjectInfo, TypeHint, WireSetter};
use crate::{MapError, MapperFlags, Reflect, Value};

/// A write target of a deserialized value.
#[derive(Clone, Copy)]
enum Slot<'a> {
    Setter(&'a WireSetter),
    Member(&'a MemberInfo),
}

impl Slot<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Setter(setter) => setter.wire_name(),
            Self::Member(member) => member.name(),
        }
    }

    fn type_hint(&self) -> &TypeHint {
        match self {
            Self::Setter(setter) => setter.type_hint(),
            Self::Member(member) => member.type_hint(),
        }
    }

    fn is_nullable(&self) -> bool {
        match self {
            Self::Setter(setter) => setter.is_nullable(),
            Self::Member(member) => member.is_nullable(),
        }
    }

    fn set(&self, target: &mut dyn Reflect, value: Value) -> Result<(), MapError> {
        match self {
            Self::Setter(setter) => setter.set(target, value),
            Self::Member(member) => member.set(target, value),
        }
    }
}

fn field_name(reader: &dyn IonReader) -> Result<String, MapError> {
    reader
        .field_name()
        .map(String::from)
        .ok_or_else(|| MapError::unsupported_data("struct field without a name"))
}

impl<'a> ObjectMapper<'a> {
    /// Returns `true` if a value read for `member` must not be assigned.
    fn skips_assignment(&self, member: &MemberInfo, value: &Value) -> bool {
        (member.kind() == MemberKind::Field
            && self.has(MapperFlags::IGNORE_READ_ONLY_FIELDS)
            && member.is_read_only())
            || !member.is_writable()
            || (self.has(MapperFlags::IGNORE_DEFAULTS) && value.is_default())
    }

    fn assign(&self, target: &mut dyn Reflect, slot: Slot<'_>, value: Value) -> Result<(), MapError> {
        if value.is_null() && !slot.is_nullable() {
            trace!("skipping null for non-nullable `{}`", slot.name());
            return Ok(());
        }
        match slot.set(target, value) {
            Err(err @ MapError::TypeMismatch { .. }) if self.has(MapperFlags::PERMISSIVE) => {
                warn!("skipping `{}`: {err}", slot.name());
                Ok(())
            }
            result => result,
        }
    }

    /// Reads the field under the cursor for `binding`.
    ///
    /// Returns `None` if the value must be discarded.
    fn read_slot(
        &self,
        reader: &mut dyn IonReader,
        wire_name: &str,
        binding: Option<Binding<'a>>,
        ion_type: IonType,
    ) -> Result<Option<(Slot<'a>, Value)>, MapError> {
        match binding {
            Some(Binding::Setter(setter)) => {
                let value =
                    self.dispatcher
                        .deserialize_current(reader, setter.type_hint(), Some(ion_type))?;
                Ok(Some((Slot::Setter(setter), value)))
            }
            Some(Binding::Member(member)) => {
                let value =
                    self.dispatcher
                        .deserialize_current(reader, member.type_hint(), Some(ion_type))?;
                if self.skips_assignment(member, &value) {
                    trace!("skipping field `{wire_name}` for `{}`", member.name());
                    return Ok(None);
                }
                Ok(Some((Slot::Member(member), value)))
            }
            Some(Binding::Skip) => {
                trace!("skipping read-only field `{wire_name}` of `{}`", self.info.ty());
                Ok(None)
            }
            None => {
                trace!("discarding unknown field `{wire_name}` of `{}`", self.info.ty());
                Ok(None)
            }
        }
    }

    /// Reads the struct under the cursor into a new instance.
    ///
    /// With a designated constructor every field is read first, then the
    /// constructor is invoked and the remaining values are assigned in the
    /// order setters, properties, fields. Otherwise a blank instance comes
    /// from the object factory and fields are assigned in wire order.
    ///
    /// Each wire field resolves to, in priority order: a setter for its wire
    /// name; a property by explicit wire name, by case-insensitive name (if
    /// enabled), or by naming convention; a field candidate by wire name.
    /// A read-only property resolves to the field backing it. Unresolved
    /// fields are discarded.
    pub fn deserialize(&self, reader: &mut dyn IonReader) -> Result<Box<dyn Reflect>, MapError> {
        Self::check_constructors(self.info)?;
        if let [constructor] = self.info.constructors() {
            return self.deserialize_with_constructor(reader, constructor);
        }

        let options = self.options();
        let registry = self.dispatcher.registry();
        let factory = match self.info.object_factory() {
            Some(factory) => &**factory,
            None => options.object_factory(),
        };
        let mut target = factory.create(options, registry, &*reader, self.info.ty())?;

        // The factory may create a descendant with its own members.
        let info: &ObjectInfo = registry
            .get_info(target.reflect_type_id())
            .unwrap_or(self.info);

        reader.step_in()?;
        while let Some(ion_type) = reader.next()? {
            let wire_name = field_name(reader)?;
            let binding = self.resolve(info, &wire_name);
            if let Some((slot, value)) = self.read_slot(reader, &wire_name, binding, ion_type)? {
                self.assign(&mut *target, slot, value)?;
            }
        }
        reader.step_out()?;

        Ok(target)
    }

    fn deserialize_with_constructor(
        &self,
        reader: &mut dyn IonReader,
        constructor: &ConstructorInfo,
    ) -> Result<Box<dyn Reflect>, MapError> {
        let params = constructor.params();
        let mut args = alloc::vec![Value::Null; params.len()];
        let mut setters = Vec::new();
        let mut properties = Vec::new();
        let mut fields = Vec::new();

        reader.step_in()?;
        while let Some(ion_type) = reader.next()? {
            let wire_name = field_name(reader)?;
            if let Some(position) = constructor.position(&wire_name) {
                args[position] = self.dispatcher.deserialize_current(
                    reader,
                    params[position].type_hint(),
                    Some(ion_type),
                )?;
                continue;
            }

            let binding = self.resolve(self.info, &wire_name);
            match self.read_slot(reader, &wire_name, binding, ion_type)? {
                Some((slot @ Slot::Setter(_), value)) => setters.push((slot, value)),
                Some((slot @ Slot::Member(member), value)) => match member.kind() {
                    MemberKind::Property => properties.push((slot, value)),
                    MemberKind::Field => fields.push((slot, value)),
                },
                None => {}
            }
        }
        reader.step_out()?;

        let mut target = constructor.invoke(args)?;
        for (slot, value) in setters.into_iter().chain(properties).chain(fields) {
            self.assign(&mut *target, slot, value)?;
        }
        Ok(target)
    }
}
