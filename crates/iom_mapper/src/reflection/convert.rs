use alloc::boxed::Box;
use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::hash::BuildHasher;
use std::collections::HashMap;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use iom_element::SymbolToken;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::info::TypeHint;
use crate::{Blob, Clob, MapError, Reflect, Value};

// -----------------------------------------------------------------------------
// Traits

/// Converts a Rust value to its runtime [`Value`].
///
/// The produced variant decides how the value is written.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Extracts a Rust value from a [`Value`].
///
/// Numeric conversions between kinds succeed when the value fits.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, MapError>;
}

/// The static declared type of a Rust type.
pub trait Typed {
    fn type_hint() -> TypeHint;

    /// Returns `true` if the type can hold `null`.
    fn nullable() -> bool {
        false
    }
}

#[cold]
fn mismatch<T>(value: &Value) -> MapError {
    MapError::mismatch(core::any::type_name::<T>(), value.kind_name())
}

/// Extracts an application object of type `T`.
pub fn object_from_value<T: Reflect>(value: Value) -> Result<T, MapError> {
    match value {
        Value::Object(obj) => obj
            .take::<T>()
            .map_err(|obj| MapError::mismatch(core::any::type_name::<T>(), obj.type_path())),
        other => Err(mismatch::<T>(&other)),
    }
}

// -----------------------------------------------------------------------------
// Decimal conversions

pub(crate) fn decimal_to_big(value: &Decimal) -> BigDecimal {
    BigDecimal::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
}

/// Converts when the value fits a 96-bit mantissa with a scale of at most 28.
pub(crate) fn big_to_decimal(value: &BigDecimal) -> Option<Decimal> {
    let (mut digits, mut scale) = value.as_bigint_and_exponent();
    if scale < 0 {
        digits *= BigInt::from(10).pow(u32::try_from(-scale).ok()?);
        scale = 0;
    }
    let scale = u32::try_from(scale).ok()?;
    Decimal::try_from_i128_with_scale(digits.to_i128()?, scale).ok()
}

// -----------------------------------------------------------------------------
// Scalars

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for bool {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Bool
    }
}

fn integer_from_value<T: TryFrom<i128>>(value: Value) -> Result<T, MapError> {
    let wide = match &value {
        Value::Int32(v) => Some(i128::from(*v)),
        Value::Int64(v) => Some(i128::from(*v)),
        Value::BigDecimal(v) if v.is_integer() => v.to_i128(),
        Value::Decimal(v) if v.fract().is_zero() => v.to_i128(),
        _ => None,
    };
    wide.and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| mismatch::<T>(&value))
}

macro_rules! impl_narrow_int {
    ($($ty:ty),*) => {$(
        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::Int32(i32::from(*self))
            }
        }

        impl FromValue for $ty {
            #[inline]
            fn from_value(value: Value) -> Result<Self, MapError> {
                integer_from_value(value)
            }
        }

        impl Typed for $ty {
            #[inline]
            fn type_hint() -> TypeHint {
                TypeHint::Int32
            }
        }
    )*};
}

impl_narrow_int!(i8, i16, i32, u8, u16);

macro_rules! impl_wide_int {
    ($($ty:ty),*) => {$(
        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                match i64::try_from(*self) {
                    Ok(v) => Value::Int64(v),
                    Err(_) => Value::BigDecimal(BigDecimal::from(*self as i128)),
                }
            }
        }

        impl FromValue for $ty {
            #[inline]
            fn from_value(value: Value) -> Result<Self, MapError> {
                integer_from_value(value)
            }
        }

        impl Typed for $ty {
            #[inline]
            fn type_hint() -> TypeHint {
                TypeHint::Int64
            }
        }
    )*};
}

impl_wide_int!(i64, isize, u32, u64, usize);

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Float32(v) => Ok(v),
            Value::Float64(v) => Ok(v as f32),
            Value::Int32(v) => Ok(v as f32),
            Value::Int64(v) => Ok(v as f32),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for f32 {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Float32
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Float64(v) => Ok(v),
            Value::Float32(v) => Ok(f64::from(v)),
            Value::Int32(v) => Ok(f64::from(v)),
            Value::Int64(v) => Ok(v as f64),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for f64 {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Float64
    }
}

impl ToValue for Decimal {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int32(v) => Ok(Decimal::from(v)),
            Value::Int64(v) => Ok(Decimal::from(v)),
            Value::BigDecimal(ref v) => big_to_decimal(v).ok_or_else(|| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for Decimal {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Decimal
    }
}

impl ToValue for BigDecimal {
    #[inline]
    fn to_value(&self) -> Value {
        Value::BigDecimal(self.clone())
    }
}

impl FromValue for BigDecimal {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::BigDecimal(v) => Ok(v),
            Value::Decimal(v) => Ok(decimal_to_big(&v)),
            Value::Int32(v) => Ok(BigDecimal::from(v)),
            Value::Int64(v) => Ok(BigDecimal::from(v)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for BigDecimal {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::BigDecimal
    }
}

impl ToValue for DateTime<Utc> {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for DateTime<Utc> {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Timestamp
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for str {
    #[inline]
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::String(s) => Ok(s),
            Value::Symbol(ref s) => s
                .text()
                .map(ToString::to_string)
                .ok_or_else(|| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for String {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::String
    }
}

impl ToValue for SymbolToken {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Symbol(self.clone())
    }
}

impl FromValue for SymbolToken {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Symbol(s) => Ok(s),
            Value::String(s) => Ok(SymbolToken::new(s)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for SymbolToken {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Symbol
    }
}

impl ToValue for Uuid {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Guid(*self)
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Guid(v) => Ok(v),
            Value::Blob(ref bytes) => Uuid::from_slice(bytes).map_err(|_| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for Uuid {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Guid
    }
}

impl ToValue for Blob {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Blob(self.0.clone())
    }
}

impl FromValue for Blob {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Blob(v) => Ok(Blob(v)),
            Value::Guid(v) => Ok(Blob(v.as_bytes().to_vec())),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for Blob {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Blob
    }
}

impl ToValue for [u8] {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Blob(self.to_vec())
    }
}

impl ToValue for Clob {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Clob(self.0.clone())
    }
}

impl FromValue for Clob {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Clob(v) => Ok(Clob(v)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for Clob {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Clob
    }
}

// -----------------------------------------------------------------------------
// Untyped

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, MapError> {
        Ok(value)
    }
}

impl Typed for Value {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Any
    }

    #[inline]
    fn nullable() -> bool {
        true
    }
}

impl ToValue for Box<dyn Reflect> {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Object(self.clone_reflect())
    }
}

impl FromValue for Box<dyn Reflect> {
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl Typed for Box<dyn Reflect> {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Any
    }
}

// -----------------------------------------------------------------------------
// Option

impl<T: ToValue> ToValue for Option<T> {
    #[inline]
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, MapError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Typed> Typed for Option<T> {
    #[inline]
    fn type_hint() -> TypeHint {
        T::type_hint()
    }

    #[inline]
    fn nullable() -> bool {
        true
    }
}

// -----------------------------------------------------------------------------
// Sequences

fn list_from_value<T: FromValue, C: FromIterator<T>>(value: Value) -> Result<C, MapError> {
    match value {
        Value::List(values) => values.into_iter().map(T::from_value).collect(),
        other => Err(mismatch::<C>(&other)),
    }
}

macro_rules! impl_sequence {
    ($($ty:ident),*) => {$(
        impl<T: ToValue> ToValue for $ty<T> {
            fn to_value(&self) -> Value {
                Value::List(self.iter().map(ToValue::to_value).collect())
            }
        }

        impl<T: FromValue> FromValue for $ty<T> {
            #[inline]
            fn from_value(value: Value) -> Result<Self, MapError> {
                list_from_value(value)
            }
        }

        impl<T: Typed> Typed for $ty<T> {
            #[inline]
            fn type_hint() -> TypeHint {
                TypeHint::List(Box::new(T::type_hint()))
            }
        }
    )*};
}

impl_sequence!(Vec, VecDeque);

impl<T: ToValue> ToValue for Box<[T]> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, MapError> {
        list_from_value::<T, Vec<T>>(value).map(Vec::into_boxed_slice)
    }
}

impl<T: Typed> Typed for Box<[T]> {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::List(Box::new(T::type_hint()))
    }
}

// -----------------------------------------------------------------------------
// Maps

fn map_from_value<T: FromValue, C: FromIterator<(String, T)>>(value: Value) -> Result<C, MapError> {
    match value {
        Value::Struct(fields) => fields
            .into_iter()
            .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
            .collect(),
        other => Err(mismatch::<C>(&other)),
    }
}

impl<T: ToValue, S> ToValue for HashMap<String, T, S> {
    fn to_value(&self) -> Value {
        Value::Struct(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }
}

impl<T: FromValue, S: BuildHasher + Default> FromValue for HashMap<String, T, S> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, MapError> {
        map_from_value(value)
    }
}

impl<T: Typed, S> Typed for HashMap<String, T, S> {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Map(Box::new(T::type_hint()))
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Struct(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, MapError> {
        map_from_value(value)
    }
}

impl<T: Typed> Typed for BTreeMap<String, T> {
    #[inline]
    fn type_hint() -> TypeHint {
        TypeHint::Map(Box::new(T::type_hint()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn numeric_conversions_check_range() {
        assert_eq!(i64::from_value(Value::Int32(7)).unwrap(), 7);
        assert_eq!(i32::from_value(Value::Int64(7)).unwrap(), 7);
        assert!(i32::from_value(Value::Int64(i64::MAX)).is_err());
        assert!(u8::from_value(Value::Int32(-1)).is_err());
        assert_eq!(u64::MAX.to_value(), Value::BigDecimal(BigDecimal::from(u64::MAX)));
        assert_eq!(u64::from_value(u64::MAX.to_value()).unwrap(), u64::MAX);
        assert!(bool::from_value(Value::Int32(1)).is_err());
    }

    #[test]
    fn decimal_conversions() {
        let fixed = Decimal::new(5_679_876_543, 7);
        let big = decimal_to_big(&fixed);
        assert_eq!(big.to_string(), "567.9876543");
        assert_eq!(big_to_decimal(&big), Some(fixed));

        let huge: BigDecimal = "1e40".parse().unwrap();
        assert_eq!(big_to_decimal(&huge), None);
        let scaled: BigDecimal = "12e2".parse().unwrap();
        assert_eq!(big_to_decimal(&scaled), Some(Decimal::from(1200)));
    }

    #[test]
    fn options_and_collections() {
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert!(Option::<i32>::nullable());
        assert!(!i32::nullable());

        let list = vec![1_i32, 2, 3];
        assert_eq!(Vec::<i32>::from_value(list.to_value()).unwrap(), list);
        assert_eq!(
            Vec::<i32>::type_hint(),
            TypeHint::List(Box::new(TypeHint::Int32))
        );

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1.5_f64);
        assert_eq!(BTreeMap::<String, f64>::from_value(map.to_value()).unwrap(), map);
        assert!(Vec::<i32>::from_value(Value::Int32(1)).is_err());
    }

    #[test]
    fn guid_from_blob() {
        let id = Uuid::from_u128(0x1234);
        assert_eq!(Uuid::from_value(Value::Blob(id.as_bytes().to_vec())).unwrap(), id);
        assert!(Uuid::from_value(Value::Blob(vec![1, 2])).is_err());
    }
}
