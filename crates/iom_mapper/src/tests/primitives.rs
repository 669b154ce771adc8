use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeZone, Utc};
use iom_element::{BINARY_VERSION_MARKER, Element, ElementValue, Format, SymbolToken};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::info::TypeHint;
use crate::serde::{DECIMAL128_ANNOTATION, FLOAT32_ANNOTATION, GUID_ANNOTATION, WIDE_INT_ANNOTATION};
use crate::{Blob, Clob, FromValue, IonMapper, MapError, MapperFlags, SerializationOptions};
use crate::{ToValue, TypeRegistry, Typed, Value};

fn mapper_with(options: SerializationOptions) -> IonMapper {
    IonMapper::with_options(options, TypeRegistry::new())
}

fn round_trip<T>(mapper: &IonMapper, value: T)
where
    T: ToValue + FromValue + Typed + PartialEq + Debug,
{
    let bytes = mapper.serialize(&value).unwrap();
    let back: T = mapper.deserialize(&bytes).unwrap();
    assert_eq!(back, value);
}

fn read_any(mapper: &IonMapper, element: Element) -> Result<Value, MapError> {
    mapper.deserialize_elements::<Value>(vec![element])
}

#[test]
fn every_primitive_kind_round_trips() {
    for format in [Format::Binary, Format::Text, Format::PrettyText] {
        let mapper = mapper_with(SerializationOptions::builder().format(format).build());

        round_trip(&mapper, true);
        round_trip(&mapper, -17_i32);
        round_trip(&mapper, i64::MAX);
        round_trip(&mapper, u64::MAX);
        round_trip(&mapper, 1.5_f32);
        round_trip(&mapper, 0.1_f64);
        round_trip(&mapper, Decimal::new(5_679_876_543, 7));
        round_trip(&mapper, "3.14159265358979323846264338327950288".parse::<BigDecimal>().unwrap());
        round_trip(&mapper, Utc.with_ymd_and_hms(2009, 10, 10, 13, 15, 21).unwrap());
        round_trip(&mapper, "Hello, Ion".to_string());
        round_trip(&mapper, SymbolToken::new("brand"));
        round_trip(&mapper, Blob(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        round_trip(&mapper, Clob::from("plain text"));
        round_trip(&mapper, Uuid::from_u128(0x1234_5678_9abc_def0_0fed_cba9_8765_4321));
        round_trip(&mapper, Some(3_i32));
        round_trip(&mapper, None::<String>);
    }
}

#[test]
fn non_finite_floats_round_trip() {
    for format in [Format::Binary, Format::Text, Format::PrettyText] {
        let mapper = mapper_with(SerializationOptions::builder().format(format).build());

        round_trip(&mapper, f64::INFINITY);
        round_trip(&mapper, f64::NEG_INFINITY);
        round_trip(&mapper, f32::NEG_INFINITY);

        let bytes = mapper.serialize(&f64::NAN).unwrap();
        assert!(mapper.deserialize::<f64>(&bytes).unwrap().is_nan(), "{format:?}");
        let bytes = mapper.serialize(&vec![f32::NAN]).unwrap();
        assert!(mapper.deserialize::<Vec<f32>>(&bytes).unwrap()[0].is_nan(), "{format:?}");
    }
}

#[test]
fn byte_sequences() {
    let mapper = mapper_with(SerializationOptions::default());
    let bytes: &[u8] = &[1, 2, 3];

    let elements = mapper.serialize_to_elements(bytes).unwrap();
    assert_eq!(elements[0].value(), &ElementValue::Blob(vec![1, 2, 3]));
    assert_eq!(mapper.deserialize_elements::<Blob>(elements).unwrap(), Blob::from(bytes));

    // A `Vec<u8>` is a sequence like any other `Vec<T>`.
    let elements = mapper.serialize_to_elements(&bytes.to_vec()).unwrap();
    assert!(matches!(elements[0].value(), ElementValue::List(items) if items.len() == 3));
    assert_eq!(mapper.deserialize_elements::<Vec<u8>>(elements).unwrap(), bytes);
}

#[test]
fn wide_and_narrow_kinds_are_annotated() {
    let mapper = mapper_with(SerializationOptions::default());

    let cases: [(Value, Option<&str>); 6] = [
        (Value::Int32(7), None),
        (Value::Int64(7), Some(WIDE_INT_ANNOTATION)),
        (Value::Float64(2.5), None),
        (Value::Float32(2.5), Some(FLOAT32_ANNOTATION)),
        (Value::BigDecimal(BigDecimal::from(12)), None),
        (Value::Decimal(Decimal::new(12, 0)), Some(DECIMAL128_ANNOTATION)),
    ];

    for (value, annotation) in cases {
        let elements = mapper.serialize_to_elements(&value).unwrap();
        assert_eq!(elements[0].annotations().first().map(String::as_str), annotation);
        assert_eq!(read_any(&mapper, elements[0].clone()).unwrap(), value);
    }
}

#[test]
fn unannotated_int_outside_32_bits() {
    let big = Element::from(5_000_000_000_i64);

    let mapper = mapper_with(SerializationOptions::default());
    let err = read_any(&mapper, big.clone()).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedData(_)), "{err}");

    let mapper = mapper_with(
        SerializationOptions::builder()
            .enable(MapperFlags::PERMISSIVE)
            .build(),
    );
    assert_eq!(read_any(&mapper, big).unwrap(), Value::Int64(5_000_000_000));
}

#[test]
fn guid_annotation_option() {
    let id = Uuid::from_u128(42);

    let mapper = mapper_with(SerializationOptions::default());
    let elements = mapper.serialize_to_elements(&id).unwrap();
    assert!(elements[0].annotations().is_empty());
    assert_eq!(elements[0].value(), &ElementValue::Blob(id.as_bytes().to_vec()));
    // Untagged, so only a GUID target reads it back as a GUID.
    assert_eq!(read_any(&mapper, elements[0].clone()).unwrap(), Value::Blob(id.as_bytes().to_vec()));
    assert_eq!(mapper.deserialize_elements::<Uuid>(elements).unwrap(), id);

    let mapper = mapper_with(
        SerializationOptions::builder()
            .enable(MapperFlags::ANNOTATE_GUIDS)
            .build(),
    );
    let elements = mapper.serialize_to_elements(&id).unwrap();
    assert!(elements[0].has_annotation(GUID_ANNOTATION));
    assert_eq!(read_any(&mapper, elements[0].clone()).unwrap(), Value::Guid(id));
}

#[test]
fn guid_needs_sixteen_bytes() {
    let mapper = mapper_with(SerializationOptions::default());
    let short = Element::new(ElementValue::Blob(vec![1, 2, 3]));
    let err = mapper.deserialize_elements::<Uuid>(vec![short]).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedData(_)), "{err}");
}

#[test]
fn list_round_trip() {
    let mapper = mapper_with(SerializationOptions::default());
    let fibonacci: Vec<i32> = vec![1, 1, 2, 3, 5, 8, 11];
    round_trip(&mapper, fibonacci.clone());

    let elements = mapper.serialize_to_elements(&fibonacci).unwrap();
    assert_eq!(elements[0].as_list().map(<[Element]>::len), Some(7));

    let nested = vec![vec![String::from("a")], vec![], vec![String::from("b"), String::from("c")]];
    round_trip(&mapper, nested);
}

#[test]
fn list_into_scalar_target_fails() {
    let mapper = mapper_with(SerializationOptions::default());
    let elements = mapper.serialize_to_elements(&vec![1_i32]).unwrap();
    let err = mapper.deserialize_elements::<i32>(elements).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedData(_)), "{err}");
}

#[test]
fn map_round_trip_ignores_field_order() {
    let mapper = mapper_with(SerializationOptions::default());

    let mut map = BTreeMap::new();
    map.insert(String::from("doors"), 4_i32);
    map.insert(String::from("wheels"), 4);
    map.insert(String::from("seats"), 5);
    round_trip(&mapper, map.clone());

    let forward = Element::new(ElementValue::Struct(vec![
        (String::from("doors"), Element::from(4)),
        (String::from("seats"), Element::from(5)),
        (String::from("wheels"), Element::from(4)),
    ]));
    let backward = Element::new(ElementValue::Struct(vec![
        (String::from("wheels"), Element::from(4)),
        (String::from("seats"), Element::from(5)),
        (String::from("doors"), Element::from(4)),
    ]));
    let a: HashMap<String, i32> = mapper.deserialize_elements(vec![forward]).unwrap();
    let b: HashMap<String, i32> = mapper.deserialize_elements(vec![backward]).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.into_iter().collect::<BTreeMap<_, _>>(), map);
}

#[test]
fn struct_into_scalar_target_fails() {
    let mapper = mapper_with(SerializationOptions::default());
    let element = Element::new(ElementValue::Struct(vec![(String::from("a"), Element::from(1))]));
    let err = mapper.deserialize_elements::<String>(vec![element]).unwrap_err();
    assert!(err.is_configuration_error(), "{err}");
}

#[test]
fn untyped_struct_keeps_wire_order() {
    let mapper = mapper_with(SerializationOptions::default());
    let element = Element::new(ElementValue::Struct(vec![
        (String::from("b"), Element::from("x")),
        (String::from("a"), Element::from(true)),
    ]));
    let value = read_any(&mapper, element).unwrap();
    assert_eq!(
        value,
        Value::Struct(vec![
            (String::from("b"), Value::String(String::from("x"))),
            (String::from("a"), Value::Bool(true)),
        ])
    );
}

#[test]
fn empty_stream_reads_null() {
    let mapper = mapper_with(SerializationOptions::default());
    assert_eq!(mapper.deserialize::<Option<i32>>(&[]).unwrap(), None);
    assert_eq!(mapper.deserialize_from(&mut iom_element::ElementReader::new(vec![]), &TypeHint::Any).unwrap(), Value::Null);
}

#[test]
fn formats_are_detected() {
    let value = vec![Some(1.25_f64), None];
    for format in [Format::Binary, Format::Text, Format::PrettyText] {
        let mapper = mapper_with(SerializationOptions::builder().format(format).build());
        let bytes = mapper.serialize(&value).unwrap();
        assert_eq!(bytes.starts_with(&BINARY_VERSION_MARKER), format == Format::Binary);
        assert_eq!(Format::detect(&bytes) == Format::Binary, format == Format::Binary);

        // Any mapper reads any format.
        let other = mapper_with(SerializationOptions::default());
        let back: Vec<Option<f64>> = other.deserialize(&bytes).unwrap();
        assert_eq!(back, value);
    }
}

#[test]
fn timestamp_epoch_is_default() {
    assert!(Value::Timestamp(DateTime::<Utc>::UNIX_EPOCH).is_default());
}
