use alloc::string::String;
use alloc::vec::Vec;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use crate::{IonType, SymbolToken};

// -----------------------------------------------------------------------------
// ElementValue

/// The payload of an [`Element`].
///
/// Struct fields keep their wire order; duplicate names are allowed, as in Ion.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    Timestamp(DateTime<Utc>),
    String(String),
    Symbol(SymbolToken),
    Blob(Vec<u8>),
    Clob(Vec<u8>),
    List(Vec<Element>),
    Struct(Vec<(String, Element)>),
}

impl ElementValue {
    /// The kind reported by a cursor positioned on this value.
    pub const fn ion_type(&self) -> IonType {
        match self {
            Self::Null => IonType::Null,
            Self::Bool(_) => IonType::Bool,
            Self::Int(_) => IonType::Int,
            Self::Float(_) => IonType::Float,
            Self::Decimal(_) => IonType::Decimal,
            Self::Timestamp(_) => IonType::Timestamp,
            Self::String(_) => IonType::String,
            Self::Symbol(_) => IonType::Symbol,
            Self::Blob(_) => IonType::Blob,
            Self::Clob(_) => IonType::Clob,
            Self::List(_) => IonType::List,
            Self::Struct(_) => IonType::Struct,
        }
    }
}

// -----------------------------------------------------------------------------
// Element

/// An owned Ion value with its annotations.
///
/// # Examples
///
/// ```
/// use iom_element::{Element, ElementValue, IonType};
///
/// let point = Element::new(ElementValue::Struct(vec![
///     ("x".to_string(), Element::new(ElementValue::Int(1))),
///     ("y".to_string(), Element::new(ElementValue::Int(2))),
/// ]))
/// .with_annotations(["geo.Point"]);
///
/// assert_eq!(point.ion_type(), IonType::Struct);
/// assert!(point.has_annotation("geo.Point"));
/// assert_eq!(point.field("y").map(Element::value), Some(&ElementValue::Int(2)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    annotations: Vec<String>,
    value: ElementValue,
}

impl Element {
    /// Creates an unannotated element.
    #[inline]
    pub const fn new(value: ElementValue) -> Self {
        Self {
            annotations: Vec::new(),
            value,
        }
    }

    /// Creates an unannotated `null`.
    #[inline]
    pub const fn null() -> Self {
        Self::new(ElementValue::Null)
    }

    /// Replaces the annotations of this element.
    pub fn with_annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations = annotations.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    #[inline]
    pub fn has_annotation(&self, annotation: &str) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }

    #[inline]
    pub const fn value(&self) -> &ElementValue {
        &self.value
    }

    #[inline]
    pub const fn value_mut(&mut self) -> &mut ElementValue {
        &mut self.value
    }

    #[inline]
    pub fn into_value(self) -> ElementValue {
        self.value
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<String>, ElementValue) {
        (self.annotations, self.value)
    }

    #[inline]
    pub const fn ion_type(&self) -> IonType {
        self.value.ion_type()
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self.value, ElementValue::Null)
    }

    /// Returns the first field with the given name if this is a struct.
    pub fn field(&self, name: &str) -> Option<&Element> {
        match &self.value {
            ElementValue::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the children if this is a list.
    pub fn as_list(&self) -> Option<&[Element]> {
        match &self.value {
            ElementValue::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<ElementValue> for Element {
    #[inline]
    fn from(value: ElementValue) -> Self {
        Self::new(value)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Element {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::new(ElementValue::$variant(value.into()))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i64 => Int,
    i32 => Int,
    f64 => Float,
    String => String,
    &str => String,
    BigDecimal => Decimal,
    DateTime<Utc> => Timestamp,
    SymbolToken => Symbol,
}

// -----------------------------------------------------------------------------
// Tests
