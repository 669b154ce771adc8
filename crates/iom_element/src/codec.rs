//! Byte encodings of an element stream.
//!
//! Binary output starts with the Ion binary version marker and carries a
//! `postcard` body. Text output is a `serde_json` rendering. Both go through
//! the same private mirror of the element tree, in which decimals keep their
//! exact digits and scale and timestamps are RFC 3339 strings. JSON has no
//! non-finite numbers, so `nan`, `+inf` and `-inf` are written by their Ion
//! text spelling.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Element, ElementError, ElementValue, SymbolToken};

/// The four bytes opening every binary Ion stream.
pub const BINARY_VERSION_MARKER: [u8; 4] = [0xE0, 0x01, 0x00, 0xEA];

// -----------------------------------------------------------------------------
// Format

/// The encoding selected for serialized output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Format {
    #[default]
    Binary,
    Text,
    PrettyText,
}

impl Format {
    /// Detects the encoding of `bytes`. Text is assumed without a version marker.
    #[inline]
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BINARY_VERSION_MARKER) {
            Self::Binary
        } else {
            Self::Text
        }
    }
}

// -----------------------------------------------------------------------------
// Mirror

#[derive(Serialize, Deserialize)]
struct Repr {
    annotations: Vec<String>,
    value: ReprValue,
}

#[derive(Serialize, Deserialize)]
enum ReprValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    NonFinite(String),
    Decimal { digits: String, scale: i64 },
    Timestamp(String),
    String(String),
    Symbol(SymbolToken),
    Blob(Vec<u8>),
    Clob(Vec<u8>),
    List(Vec<Repr>),
    Struct(Vec<(String, Repr)>),
}

fn non_finite_text(value: f64) -> &'static str {
    if value.is_nan() {
        "nan"
    } else if value.is_sign_positive() {
        "+inf"
    } else {
        "-inf"
    }
}

impl From<&Element> for Repr {
    fn from(element: &Element) -> Self {
        let value = match element.value() {
            ElementValue::Null => ReprValue::Null,
            ElementValue::Bool(b) => ReprValue::Bool(*b),
            ElementValue::Int(i) => ReprValue::Int(*i),
            ElementValue::Float(f) if f.is_finite() => ReprValue::Float(*f),
            ElementValue::Float(f) => ReprValue::NonFinite(String::from(non_finite_text(*f))),
            ElementValue::Decimal(d) => {
                let (digits, scale) = d.as_bigint_and_exponent();
                ReprValue::Decimal {
                    digits: digits.to_string(),
                    scale,
                }
            }
            ElementValue::Timestamp(t) => {
                ReprValue::Timestamp(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            ElementValue::String(s) => ReprValue::String(s.clone()),
            ElementValue::Symbol(s) => ReprValue::Symbol(s.clone()),
            ElementValue::Blob(b) => ReprValue::Blob(b.clone()),
            ElementValue::Clob(b) => ReprValue::Clob(b.clone()),
            ElementValue::List(values) => ReprValue::List(values.iter().map(Repr::from).collect()),
            ElementValue::Struct(fields) => ReprValue::Struct(
                fields.iter().map(|(k, v)| (k.clone(), Repr::from(v))).collect(),
            ),
        };
        Repr {
            annotations: element.annotations().to_vec(),
            value,
        }
    }
}

impl TryFrom<Repr> for Element {
    type Error = ElementError;

    fn try_from(repr: Repr) -> Result<Self, Self::Error> {
        let value = match repr.value {
            ReprValue::Null => ElementValue::Null,
            ReprValue::Bool(b) => ElementValue::Bool(b),
            ReprValue::Int(i) => ElementValue::Int(i),
            ReprValue::Float(f) => ElementValue::Float(f),
            ReprValue::NonFinite(text) => ElementValue::Float(match text.as_str() {
                "nan" => f64::NAN,
                "+inf" => f64::INFINITY,
                "-inf" => f64::NEG_INFINITY,
                _ => {
                    return Err(ElementError::Decode(alloc::format!(
                        "invalid float `{text}`"
                    )));
                }
            }),
            ReprValue::Decimal { digits, scale } => {
                let digits: BigInt = digits
                    .parse()
                    .map_err(|_| ElementError::Decode(alloc::format!("invalid decimal digits `{digits}`")))?;
                ElementValue::Decimal(BigDecimal::new(digits, scale))
            }
            ReprValue::Timestamp(text) => {
                let parsed = DateTime::parse_from_rfc3339(&text)
                    .map_err(|e| ElementError::Decode(alloc::format!("invalid timestamp `{text}`: {e}")))?;
                ElementValue::Timestamp(parsed.with_timezone(&Utc))
            }
            ReprValue::String(s) => ElementValue::String(s),
            ReprValue::Symbol(s) => ElementValue::Symbol(s),
            ReprValue::Blob(b) => ElementValue::Blob(b),
            ReprValue::Clob(b) => ElementValue::Clob(b),
            ReprValue::List(values) => ElementValue::List(
                values
                    .into_iter()
                    .map(Element::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            ReprValue::Struct(fields) => ElementValue::Struct(
                fields
                    .into_iter()
                    .map(|(k, v)| Element::try_from(v).map(|e| (k, e)))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(Element::new(value).with_annotations(repr.annotations))
    }
}

// -----------------------------------------------------------------------------
// encode / decode

/// Encodes a top-level element stream.
pub fn encode(elements: &[Element], format: Format) -> Result<Vec<u8>, ElementError> {
    let repr: Vec<Repr> = elements.iter().map(Repr::from).collect();
    match format {
        Format::Binary => {
            let body =
                postcard::to_allocvec(&repr).map_err(|e| ElementError::Encode(e.to_string()))?;
            let mut bytes = Vec::with_capacity(BINARY_VERSION_MARKER.len() + body.len());
            bytes.extend_from_slice(&BINARY_VERSION_MARKER);
            bytes.extend_from_slice(&body);
            Ok(bytes)
        }
        Format::Text => serde_json::to_vec(&repr).map_err(|e| ElementError::Encode(e.to_string())),
        Format::PrettyText => {
            serde_json::to_vec_pretty(&repr).map_err(|e| ElementError::Encode(e.to_string()))
        }
    }
}

/// Decodes a top-level element stream, detecting the format.
///
/// An empty input is an empty stream.
pub fn decode(bytes: &[u8]) -> Result<Vec<Element>, ElementError> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let repr: Vec<Repr> = match Format::detect(bytes) {
        Format::Binary => postcard::from_bytes(&bytes[BINARY_VERSION_MARKER.len()..])
            .map_err(|e| ElementError::Decode(e.to_string()))?,
        _ => serde_json::from_slice(bytes).map_err(|e| ElementError::Decode(e.to_string()))?,
    };
    repr.into_iter().map(Element::try_from).collect()
}

// -----------------------------------------------------------------------------
// Tests
