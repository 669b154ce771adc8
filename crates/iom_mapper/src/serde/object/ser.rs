use alloc::string::{String, ToString};
use alloc::vec::Vec;

use iom_element::{IonType, IonWriter};
use iom_utils::hash::HashSet;

use super::ObjectMapper;
use crate::info::MemberInfo;
use crate::{MapError, MapperFlags, Reflect, Value};

impl ObjectMapper<'_> {
    fn skips_value(&self, value: &Value) -> bool {
        (self.has(MapperFlags::IGNORE_NULLS) && value.is_null())
            || (self.has(MapperFlags::IGNORE_DEFAULTS) && value.is_default())
    }

    fn write_member(
        &self,
        writer: &mut dyn IonWriter,
        written: &mut HashSet<String>,
        member: &MemberInfo,
        wire_name: String,
        value: &dyn Reflect,
    ) -> Result<(), MapError> {
        if written.contains(&wire_name) {
            return Ok(());
        }
        let value = member.get(value)?;
        if self.skips_value(&value) {
            return Ok(());
        }
        writer.set_field_name(&wire_name);
        self.dispatcher.serialize(writer, &value)?;
        written.insert(wire_name);
        Ok(())
    }

    /// Writes `value` as a struct annotated with `annotations`.
    ///
    /// 1. Every getter is written under its wire name.
    /// 2. Every readable property not yet written, skipping properties
    ///    without write access when read-only properties are ignored.
    /// 3. Every readable field candidate not yet written, skipping immutable
    ///    fields when read-only fields are ignored.
    ///
    /// Properties and fields holding `null` or a default value are skipped
    /// when the options say so.
    pub fn serialize(
        &self,
        writer: &mut dyn IonWriter,
        value: &dyn Reflect,
        annotations: Vec<String>,
    ) -> Result<(), MapError> {
        let info = self.info;
        if !annotations.is_empty() {
            writer.set_annotations(annotations);
        }
        writer.step_in(IonType::Struct)?;

        let mut written = HashSet::default();

        for getter in info.getters() {
            let field = getter.get(value)?;
            writer.set_field_name(getter.wire_name());
            self.dispatcher.serialize(writer, &field)?;
            written.insert(getter.wire_name().to_string());
        }

        let ignore_read_only = self.has(MapperFlags::IGNORE_READ_ONLY_PROPERTIES);
        for property in info.properties() {
            if property.is_ignored()
                || !property.is_readable()
                || (ignore_read_only && property.is_read_only())
            {
                continue;
            }
            let wire_name = self.property_wire_name(property);
            self.write_member(writer, &mut written, property, wire_name, value)?;
        }

        let ignore_read_only = self.has(MapperFlags::IGNORE_READ_ONLY_FIELDS);
        for field in info.fields() {
            if !self.is_field_candidate(info, field)
                || !field.is_readable()
                || (ignore_read_only && field.is_read_only())
            {
                continue;
            }
            let wire_name = self.field_wire_name(info, field);
            self.write_member(writer, &mut written, field, wire_name, value)?;
        }

        writer.step_out()?;
        Ok(())
    }
}
