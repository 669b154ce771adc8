use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use iom_element::SymbolToken;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::Reflect;

// -----------------------------------------------------------------------------
// Value

/// A runtime value of any kind the mapper supports.
///
/// Serialization dispatches on the variant; deserialization produces the
/// variant selected by the wire kind and its annotations.
///
/// `Struct` is an untyped keyed aggregate in wire order, used for string-keyed
/// maps and for structs without a registered type. `Object` holds an
/// application object described by the [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    BigDecimal(BigDecimal),
    Timestamp(DateTime<Utc>),
    String(String),
    Symbol(SymbolToken),
    Blob(Vec<u8>),
    Clob(Vec<u8>),
    Guid(Uuid),
    List(Vec<Value>),
    Struct(Vec<(String, Value)>),
    Object(Box<dyn Reflect>),
}

impl Value {
    /// A short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Decimal(_) => "decimal",
            Self::BigDecimal(_) => "big decimal",
            Self::Timestamp(_) => "timestamp",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Blob(_) => "blob",
            Self::Clob(_) => "clob",
            Self::Guid(_) => "guid",
            Self::List(_) => "list",
            Self::Struct(_) => "struct",
            Self::Object(obj) => obj.type_path(),
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value equals the default of its type.
    ///
    /// Defaults are `null`, `false`, numeric zeros, the nil GUID and the Unix
    /// epoch. Strings, lists, lobs, symbols, structs and objects never are.
    ///
    /// # Examples
    ///
    /// ```
    /// use iom_mapper::Value;
    ///
    /// assert!(Value::Int32(0).is_default());
    /// assert!(Value::Float64(-0.0).is_default());
    /// assert!(!Value::String(String::new()).is_default());
    /// ```
    pub fn is_default(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !*b,
            Self::Int32(v) => *v == 0,
            Self::Int64(v) => *v == 0,
            Self::Float32(v) => *v == 0.0,
            Self::Float64(v) => *v == 0.0,
            Self::Decimal(v) => v.is_zero(),
            Self::BigDecimal(v) => v.is_zero(),
            Self::Timestamp(v) => *v == DateTime::<Utc>::default(),
            Self::Guid(v) => v.is_nil(),
            Self::String(_)
            | Self::Symbol(_)
            | Self::Blob(_)
            | Self::Clob(_)
            | Self::List(_)
            | Self::Struct(_)
            | Self::Object(_) => false,
        }
    }

    /// Returns the first entry with the given key if this is a `Struct`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the object if this is an `Object`.
    #[inline]
    pub fn as_reflect(&self) -> Option<&dyn Reflect> {
        match self {
            Self::Object(obj) => Some(&**obj),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Lob newtypes

/// Bytes mapped to an Ion `blob`.
///
/// `Blob` and `[u8]` are the byte-sequence carriers. A `Vec<u8>` maps to a
/// list of integers like any other `Vec<T>`; wrap it, or pass it as a slice,
/// to write a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

/// Bytes mapped to an Ion `clob`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Clob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Blob {
    #[inline]
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<u8>> for Clob {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&str> for Clob {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

// -----------------------------------------------------------------------------
// Tests
