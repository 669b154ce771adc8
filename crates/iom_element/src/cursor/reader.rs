use alloc::string::String;
use alloc::vec::{IntoIter, Vec};
use core::mem;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::{Element, ElementError, ElementValue, IonReader, IonType, SymbolToken, decode};

// -----------------------------------------------------------------------------
// Frame

struct Frame {
    items: IntoIter<(Option<String>, Element)>,
    current: Option<(Option<String>, Element)>,
}

impl Frame {
    fn new(items: Vec<(Option<String>, Element)>) -> Self {
        Self {
            items: items.into_iter(),
            current: None,
        }
    }
}

// -----------------------------------------------------------------------------
// ElementReader

/// An [`IonReader`] over an owned element stream.
///
/// Stepping into a container moves its children out of the current element,
/// so every value is visited at most once.
///
/// # Examples
///
/// ```
/// use iom_element::{Element, ElementReader, ElementValue, IonReader, IonType};
///
/// let list = Element::new(ElementValue::List(vec![Element::from(1_i64), Element::from(2_i64)]));
/// let mut reader = ElementReader::new(vec![list]);
///
/// assert_eq!(reader.next().unwrap(), Some(IonType::List));
/// reader.step_in().unwrap();
/// assert_eq!(reader.next().unwrap(), Some(IonType::Int));
/// assert_eq!(reader.int_value().unwrap(), 1);
/// reader.step_out().unwrap();
/// assert_eq!(reader.next().unwrap(), None);
/// ```
pub struct ElementReader {
    frames: Vec<Frame>,
}

impl ElementReader {
    /// Creates a reader over a top-level stream.
    pub fn new(elements: Vec<Element>) -> Self {
        let items = elements.into_iter().map(|e| (None, e)).collect();
        let mut frames = Vec::with_capacity(8);
        frames.push(Frame::new(items));
        Self { frames }
    }

    /// Creates a reader over an encoded stream, see [`decode`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ElementError> {
        Ok(Self::new(decode(bytes)?))
    }

    #[inline]
    fn top(&self) -> &Frame {
        // `frames` always holds the top-level frame.
        &self.frames[self.frames.len() - 1]
    }

    #[inline]
    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    #[inline]
    fn current(&self) -> Option<&Element> {
        self.top().current.as_ref().map(|(_, e)| e)
    }

    fn scalar<T>(
        &self,
        expected: &'static str,
        f: impl FnOnce(&ElementValue) -> Option<T>,
    ) -> Result<T, ElementError> {
        let current = self.current();
        current
            .and_then(|e| f(e.value()))
            .ok_or_else(|| ElementError::mismatch(expected, current.map(Element::ion_type)))
    }
}

impl IonReader for ElementReader {
    fn next(&mut self) -> Result<Option<IonType>, ElementError> {
        let frame = self.top_mut();
        frame.current = frame.items.next();
        Ok(frame.current.as_ref().map(|(_, e)| e.ion_type()))
    }

    fn current_type(&self) -> Option<IonType> {
        self.current().map(Element::ion_type)
    }

    fn step_in(&mut self) -> Result<(), ElementError> {
        let items: Vec<(Option<String>, Element)> = {
            let Some((_, element)) = self.top_mut().current.as_mut() else {
                return Err(ElementError::InvalidState("no current value to step into".into()));
            };
            let found = element.ion_type();
            match element.value_mut() {
                ElementValue::List(values) => {
                    mem::take(values).into_iter().map(|e| (None, e)).collect()
                }
                ElementValue::Struct(fields) => mem::take(fields)
                    .into_iter()
                    .map(|(k, e)| (Some(k), e))
                    .collect(),
                _ => return Err(ElementError::mismatch("container", Some(found))),
            }
        };
        self.frames.push(Frame::new(items));
        Ok(())
    }

    fn step_out(&mut self) -> Result<(), ElementError> {
        if self.frames.len() <= 1 {
            return Err(ElementError::InvalidState("step_out at top level".into()));
        }
        self.frames.pop();
        Ok(())
    }

    #[inline]
    fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    fn field_name(&self) -> Option<&str> {
        self.top().current.as_ref().and_then(|(k, _)| k.as_deref())
    }

    fn annotations(&self) -> &[String] {
        match self.current() {
            Some(e) => e.annotations(),
            None => &[],
        }
    }

    fn bool_value(&mut self) -> Result<bool, ElementError> {
        self.scalar("bool", |v| match v {
            ElementValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    fn int_value(&mut self) -> Result<i64, ElementError> {
        self.scalar("int", |v| match v {
            ElementValue::Int(i) => Some(*i),
            _ => None,
        })
    }

    fn double_value(&mut self) -> Result<f64, ElementError> {
        self.scalar("float", |v| match v {
            ElementValue::Float(f) => Some(*f),
            _ => None,
        })
    }

    fn decimal_value(&mut self) -> Result<BigDecimal, ElementError> {
        self.scalar("decimal", |v| match v {
            ElementValue::Decimal(d) => Some(d.clone()),
            _ => None,
        })
    }

    fn timestamp_value(&mut self) -> Result<DateTime<Utc>, ElementError> {
        self.scalar("timestamp", |v| match v {
            ElementValue::Timestamp(t) => Some(*t),
            _ => None,
        })
    }

    fn string_value(&mut self) -> Result<String, ElementError> {
        self.scalar("string", |v| match v {
            ElementValue::String(s) => Some(s.clone()),
            _ => None,
        })
    }

    fn symbol_value(&mut self) -> Result<SymbolToken, ElementError> {
        self.scalar("symbol", |v| match v {
            ElementValue::Symbol(s) => Some(s.clone()),
            _ => None,
        })
    }

    fn lob_len(&self) -> Result<usize, ElementError> {
        self.scalar("lob", |v| match v {
            ElementValue::Blob(b) | ElementValue::Clob(b) => Some(b.len()),
            _ => None,
        })
    }

    fn lob_bytes(&mut self) -> Result<Vec<u8>, ElementError> {
        self.scalar("lob", |v| match v {
            ElementValue::Blob(b) | ElementValue::Clob(b) => Some(b.clone()),
            _ => None,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample() -> Element {
        Element::new(ElementValue::Struct(vec![
            ("name".into(), Element::from("ion")),
            (
                "tags".into(),
                Element::new(ElementValue::List(vec![Element::from(true)])),
            ),
            ("size".into(), Element::from(3_i64).with_annotations(["numeric.int32"])),
        ]))
    }

    #[test]
    fn walks_struct_fields_in_order() {
        let mut reader = ElementReader::new(vec![sample()]);
        assert_eq!(reader.next().unwrap(), Some(IonType::Struct));
        reader.step_in().unwrap();
        assert_eq!(reader.depth(), 1);

        assert_eq!(reader.next().unwrap(), Some(IonType::String));
        assert_eq!(reader.field_name(), Some("name"));
        assert_eq!(reader.string_value().unwrap(), "ion");

        // skipped container
        assert_eq!(reader.next().unwrap(), Some(IonType::List));
        assert_eq!(reader.field_name(), Some("tags"));

        assert_eq!(reader.next().unwrap(), Some(IonType::Int));
        assert!(reader.has_annotation("numeric.int32"));
        assert_eq!(reader.int_value().unwrap(), 3);

        assert_eq!(reader.next().unwrap(), None);
        reader.step_out().unwrap();
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn step_out_skips_unread_children() {
        let mut reader = ElementReader::new(vec![sample(), Element::from(7_i64)]);
        reader.next().unwrap();
        reader.step_in().unwrap();
        reader.next().unwrap();
        reader.step_out().unwrap();
        assert_eq!(reader.next().unwrap(), Some(IonType::Int));
        assert_eq!(reader.int_value().unwrap(), 7);
    }

    #[test]
    fn typed_getter_mismatch() {
        let mut reader = ElementReader::new(vec![Element::from(1.5)]);
        assert!(reader.int_value().is_err());
        reader.next().unwrap();
        let err = reader.int_value().unwrap_err();
        assert!(matches!(err, ElementError::TypeMismatch { expected: "int", .. }));
        assert!(reader.step_in().is_err());
        assert!(reader.step_out().is_err());
    }

    #[test]
    fn lob_access() {
        let blob = Element::new(ElementValue::Blob(vec![1, 2, 3]));
        let mut reader = ElementReader::new(vec![blob]);
        reader.next().unwrap();
        assert_eq!(reader.lob_len().unwrap(), 3);
        assert_eq!(reader.lob_bytes().unwrap(), vec![1, 2, 3]);
    }
}
