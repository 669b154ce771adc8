use alloc::string::String;
use alloc::vec::Vec;
use core::mem;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::{Element, ElementError, ElementValue, Format, IonType, IonWriter, SymbolToken, encode};

// -----------------------------------------------------------------------------
// OpenContainer

struct OpenContainer {
    kind: IonType,
    field_name: Option<String>,
    annotations: Vec<String>,
    children: Vec<(Option<String>, Element)>,
}

impl OpenContainer {
    fn close(self) -> (Option<String>, Element) {
        let value = match self.kind {
            IonType::Struct => ElementValue::Struct(
                self.children
                    .into_iter()
                    .map(|(k, e)| (k.unwrap_or_default(), e))
                    .collect(),
            ),
            _ => ElementValue::List(self.children.into_iter().map(|(_, e)| e).collect()),
        };
        (
            self.field_name,
            Element::new(value).with_annotations(self.annotations),
        )
    }
}

// -----------------------------------------------------------------------------
// ElementWriter

/// An [`IonWriter`] that builds an owned element stream.
///
/// # Examples
///
/// ```
/// use iom_element::{ElementWriter, IonType, IonWriter};
///
/// let mut writer = ElementWriter::new();
/// writer.add_annotation("shop.Item");
/// writer.step_in(IonType::Struct).unwrap();
/// writer.set_field_name("price");
/// writer.write_int(42).unwrap();
/// writer.step_out().unwrap();
/// writer.finish().unwrap();
///
/// let elements = writer.into_elements();
/// assert_eq!(elements.len(), 1);
/// assert!(elements[0].has_annotation("shop.Item"));
/// ```
#[derive(Default)]
pub struct ElementWriter {
    top_level: Vec<Element>,
    containers: Vec<OpenContainer>,
    field_name: Option<String>,
    annotations: Vec<String>,
}

impl ElementWriter {
    #[inline]
    pub const fn new() -> Self {
        Self {
            top_level: Vec::new(),
            containers: Vec::new(),
            field_name: None,
            annotations: Vec::new(),
        }
    }

    /// Returns the written top-level values.
    ///
    /// Values inside still-open containers are not included.
    #[inline]
    pub fn into_elements(self) -> Vec<Element> {
        self.top_level
    }

    /// Encodes the written top-level values, see [`encode`].
    pub fn into_bytes(self, format: Format) -> Result<Vec<u8>, ElementError> {
        if !self.containers.is_empty() {
            return Err(ElementError::InvalidState("container left open".into()));
        }
        encode(&self.top_level, format)
    }

    fn attach(&mut self, field_name: Option<String>, element: Element) -> Result<(), ElementError> {
        match self.containers.last_mut() {
            None => self.top_level.push(element),
            Some(open) if open.kind == IonType::Struct => {
                let Some(name) = field_name else {
                    return Err(ElementError::InvalidState(
                        "value written in a struct without a field name".into(),
                    ));
                };
                open.children.push((Some(name), element));
            }
            Some(open) => open.children.push((None, element)),
        }
        Ok(())
    }

    fn push(&mut self, value: ElementValue) -> Result<(), ElementError> {
        let annotations = mem::take(&mut self.annotations);
        let field_name = self.field_name.take();
        self.attach(field_name, Element::new(value).with_annotations(annotations))
    }
}

impl IonWriter for ElementWriter {
    #[inline]
    fn set_field_name(&mut self, name: &str) {
        self.field_name = Some(name.into());
    }

    #[inline]
    fn set_annotations(&mut self, annotations: Vec<String>) {
        self.annotations = annotations;
    }

    #[inline]
    fn add_annotation(&mut self, annotation: &str) {
        self.annotations.push(annotation.into());
    }

    fn write_null(&mut self) -> Result<(), ElementError> {
        self.push(ElementValue::Null)
    }

    fn write_bool(&mut self, value: bool) -> Result<(), ElementError> {
        self.push(ElementValue::Bool(value))
    }

    fn write_int(&mut self, value: i64) -> Result<(), ElementError> {
        self.push(ElementValue::Int(value))
    }

    fn write_float(&mut self, value: f64) -> Result<(), ElementError> {
        self.push(ElementValue::Float(value))
    }

    fn write_decimal(&mut self, value: &BigDecimal) -> Result<(), ElementError> {
        self.push(ElementValue::Decimal(value.clone()))
    }

    fn write_timestamp(&mut self, value: &DateTime<Utc>) -> Result<(), ElementError> {
        self.push(ElementValue::Timestamp(*value))
    }

    fn write_string(&mut self, value: &str) -> Result<(), ElementError> {
        self.push(ElementValue::String(value.into()))
    }

    fn write_symbol(&mut self, value: &SymbolToken) -> Result<(), ElementError> {
        self.push(ElementValue::Symbol(value.clone()))
    }

    fn write_blob(&mut self, value: &[u8]) -> Result<(), ElementError> {
        self.push(ElementValue::Blob(value.to_vec()))
    }

    fn write_clob(&mut self, value: &[u8]) -> Result<(), ElementError> {
        self.push(ElementValue::Clob(value.to_vec()))
    }

    fn step_in(&mut self, container: IonType) -> Result<(), ElementError> {
        if !container.is_container() {
            return Err(ElementError::mismatch("container", Some(container)));
        }
        self.containers.push(OpenContainer {
            kind: container,
            field_name: self.field_name.take(),
            annotations: mem::take(&mut self.annotations),
            children: Vec::new(),
        });
        Ok(())
    }

    fn step_out(&mut self) -> Result<(), ElementError> {
        let Some(open) = self.containers.pop() else {
            return Err(ElementError::InvalidState("step_out at top level".into()));
        };
        self.field_name = None;
        self.annotations.clear();
        let (field_name, element) = open.close();
        self.attach(field_name, element)
    }

    #[inline]
    fn depth(&self) -> usize {
        self.containers.len()
    }

    fn finish(&mut self) -> Result<(), ElementError> {
        if self.containers.is_empty() {
            Ok(())
        } else {
            Err(ElementError::InvalidState("container left open".into()))
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementReader, IonReader};
    use alloc::vec;

    #[test]
    fn nested_containers() {
        let mut writer = ElementWriter::new();
        writer.step_in(IonType::Struct).unwrap();
        writer.set_field_name("values");
        writer.set_annotations(vec!["tagged".into()]);
        writer.step_in(IonType::List).unwrap();
        writer.write_int(1).unwrap();
        writer.write_int(2).unwrap();
        assert_eq!(writer.depth(), 2);
        writer.step_out().unwrap();
        writer.step_out().unwrap();
        writer.finish().unwrap();

        let elements = writer.into_elements();
        let values = elements[0].field("values").unwrap();
        assert!(values.has_annotation("tagged"));
        assert_eq!(
            values.as_list().unwrap(),
            &[Element::from(1_i64), Element::from(2_i64)]
        );
    }

    #[test]
    fn struct_requires_field_names() {
        let mut writer = ElementWriter::new();
        writer.step_in(IonType::Struct).unwrap();
        assert!(writer.write_bool(true).is_err());
        assert!(writer.finish().is_err());
        assert!(writer.step_in(IonType::Int).is_err());
    }

    #[test]
    fn annotations_apply_to_next_value_only() {
        let mut writer = ElementWriter::new();
        writer.add_annotation("numeric.float32");
        writer.write_float(1.5).unwrap();
        writer.write_float(2.5).unwrap();

        let mut reader = ElementReader::new(writer.into_elements());
        reader.next().unwrap();
        assert!(reader.has_annotation("numeric.float32"));
        reader.next().unwrap();
        assert!(reader.annotations().is_empty());
    }
}
