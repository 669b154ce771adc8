use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use iom_element::{Element, ElementReader, ElementValue};

use crate::info::{ConstructorInfo, ObjectInfo, TypeHint};
use crate::naming::SnakeCase;
use crate::{FromValue, IonMapper, MapError, MapperFlags, SerializationOptions, ToValue};
use crate::{TypeRegistry, Typed, Value, impl_reflect};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Debug, Clone, PartialEq, Default)]
struct Engine {
    cylinders: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Car {
    brand: String,
    model_year: i32,
    engine: Option<Engine>,
    owners: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Thermostat {
    celsius: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
    label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Node {
    child: Option<Box<Node>>,
}

impl_reflect!(Engine, Car, Thermostat, Point, Node);

// `Box<Node>` is mapped through `Node`.
impl ToValue for Box<Node> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl FromValue for Box<Node> {
    fn from_value(value: Value) -> Result<Self, MapError> {
        Node::from_value(value).map(Box::new)
    }
}

impl Typed for Box<Node> {
    fn type_hint() -> TypeHint {
        Node::type_hint()
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.insert(
        ObjectInfo::builder::<Engine>()
            .default_constructible()
            .property("Cylinders", |e| e.cylinders, |e, v| e.cylinders = v)
            .build(),
    );
    registry.insert(
        ObjectInfo::builder::<Car>()
            .default_constructible()
            .property("Brand", |c| c.brand.clone(), |c, v| c.brand = v)
            .wire_name("make")
            .property("ModelYear", |c| c.model_year, |c, v| c.model_year = v)
            .property("Engine", |c| c.engine.clone(), |c, v| c.engine = v)
            .property("Owners", |c| c.owners.clone(), |c, v| c.owners = v)
            .build(),
    );
    registry.insert(
        ObjectInfo::builder::<Thermostat>()
            .default_constructible()
            .property("Celsius", |t| t.celsius, |t, v| t.celsius = v)
            .ignored()
            .getter("fahrenheit", |t| t.celsius * 9.0 / 5.0 + 32.0)
            .setter("fahrenheit", |t, f: f64| t.celsius = (f - 32.0) * 5.0 / 9.0)
            .build(),
    );
    registry.insert(
        ObjectInfo::builder::<Point>()
            .constructor(
                ConstructorInfo::new(|args| {
                    Ok(Point {
                        x: args.take(0)?,
                        y: args.take_or_default(1)?,
                        label: String::new(),
                    })
                })
                .param::<i32>("x", "x")
                .param::<i32>("y", "y"),
            )
            .read_only_property("X", |p| p.x)
            .read_only_property("Y", |p| p.y)
            .property("Label", |p| p.label.clone(), |p, v| p.label = v)
            .setter("suffix", |p, s: String| p.label.push_str(&s))
            .build(),
    );
    registry.insert(
        ObjectInfo::builder::<Node>()
            .default_constructible()
            .property("Child", |n| n.child.clone(), |n, v| n.child = v)
            .build(),
    );
    registry
}

fn car() -> Car {
    Car {
        brand: "Toyota".to_string(),
        model_year: 1998,
        engine: Some(Engine { cylinders: 6 }),
        owners: vec!["Ann".to_string(), "Bo".to_string()],
    }
}

fn field<'a>(element: &'a Element, name: &str) -> Option<&'a ElementValue> {
    element.field(name).map(Element::value)
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn object_round_trip() {
    let mapper = IonMapper::new(registry());
    let bytes = mapper.serialize(&car()).unwrap();
    let back: Car = mapper.deserialize(&bytes).unwrap();
    assert_eq!(back, car());
}

#[test]
fn wire_names_follow_overrides_and_convention() {
    let mapper = IonMapper::new(registry());
    let elements = mapper.serialize_to_elements(&car()).unwrap();
    let element = &elements[0];

    assert_eq!(field(element, "make"), Some(&ElementValue::String("Toyota".into())));
    assert_eq!(field(element, "modelYear"), Some(&ElementValue::Int(1998)));
    assert!(element.field("Brand").is_none());
    assert!(element.field("engine").is_some());

    let options = SerializationOptions::builder().naming_convention(SnakeCase).build();
    let mapper = IonMapper::with_options(options, registry());
    let elements = mapper.serialize_to_elements(&car()).unwrap();
    assert!(elements[0].field("model_year").is_some());
    assert!(elements[0].field("make").is_some());

    let back: Car = mapper.deserialize_elements(elements).unwrap();
    assert_eq!(back, car());
}

#[test]
fn unknown_fields_are_discarded() {
    let mapper = IonMapper::new(registry());
    let element = Element::new(ElementValue::Struct(vec![
        ("color".into(), Element::from("red")),
        ("extras".into(), Element::new(ElementValue::List(vec![Element::from(1)]))),
        ("modelYear".into(), Element::from(2001)),
    ]));
    let back: Car = mapper.deserialize_elements(vec![element]).unwrap();
    assert_eq!(back.model_year, 2001);
    assert_eq!(back.brand, "");
}

#[test]
fn getter_and_setter_bind_wire_names() {
    let mapper = IonMapper::new(registry());
    let elements = mapper
        .serialize_to_elements(&Thermostat { celsius: 100.0 })
        .unwrap();
    assert_eq!(field(&elements[0], "fahrenheit"), Some(&ElementValue::Float(212.0)));
    assert!(elements[0].field("celsius").is_none());

    let back: Thermostat = mapper.deserialize_elements(elements).unwrap();
    assert_eq!(back, Thermostat { celsius: 100.0 });
}

#[test]
fn constructor_path_applies_values_after_construction() {
    let mapper = IonMapper::new(registry());
    let point = Point { x: 3, y: -4, label: "A".to_string() };
    let bytes = mapper.serialize(&point).unwrap();
    let back: Point = mapper.deserialize(&bytes).unwrap();
    assert_eq!(back, point);

    // Setters run before properties, whatever the wire order.
    let element = Element::new(ElementValue::Struct(vec![
        ("label".into(), Element::from("L")),
        ("suffix".into(), Element::from("!")),
        ("x".into(), Element::from(1)),
    ]));
    let back: Point = mapper.deserialize_elements(vec![element]).unwrap();
    assert_eq!(back, Point { x: 1, y: 0, label: "L".to_string() });
}

#[test]
fn duplicate_constructors_fail_before_reading() {
    #[derive(Debug, Clone, PartialEq)]
    struct Twice(i32);
    impl_reflect!(Twice);

    let mut registry = TypeRegistry::new();
    registry.insert(
        ObjectInfo::builder::<Twice>()
            .constructor(ConstructorInfo::new(|args| Ok(Twice(args.take(0)?))).param::<i32>("a", "a"))
            .constructor(ConstructorInfo::new(|args| Ok(Twice(args.take(0)?))).param::<i32>("b", "b"))
            .build(),
    );
    let mapper = IonMapper::new(registry);

    // Malformed input: nothing is read before the check.
    let err = mapper.deserialize::<Twice>(b"not ion at all").unwrap_err();
    assert!(err.is_configuration_error(), "{err}");

    let mut reader = ElementReader::new(vec![Element::from(1)]);
    let err = mapper
        .deserialize_from(&mut reader, &TypeHint::object::<Twice>())
        .unwrap_err();
    assert!(matches!(err, MapError::Configuration(_)), "{err}");
    // The value is still there.
    assert_eq!(
        mapper.deserialize_from(&mut reader, &TypeHint::Any).unwrap(),
        Value::Int32(1)
    );
}

#[test]
fn constructor_parameters_need_wire_names() {
    #[derive(Debug, Clone, PartialEq)]
    struct Unbound(i32);
    impl_reflect!(Unbound);

    let mut registry = TypeRegistry::new();
    registry.insert(
        ObjectInfo::builder::<Unbound>()
            .constructor(ConstructorInfo::new(|args| Ok(Unbound(args.take(0)?))).param_unbound::<i32>("value"))
            .build(),
    );
    let mapper = IonMapper::new(registry);
    let err = mapper.deserialize::<Unbound>(&[]).unwrap_err();
    assert!(err.to_string().contains("`value`"), "{err}");
}

#[test]
fn missing_parameterless_construction_is_a_configuration_error() {
    #[derive(Debug, Clone, PartialEq)]
    struct NoDefault(i32);
    impl_reflect!(NoDefault);

    let mut registry = TypeRegistry::new();
    registry.insert(ObjectInfo::builder::<NoDefault>().build());
    let mapper = IonMapper::new(registry);

    let element = Element::new(ElementValue::Struct(vec![]));
    let err = mapper.deserialize_elements::<NoDefault>(vec![element]).unwrap_err();
    assert!(matches!(err, MapError::Configuration(_)), "{err}");
}

#[test]
fn unregistered_object_is_unsupported() {
    #[derive(Debug, Clone, PartialEq)]
    struct Stranger;
    impl_reflect!(Stranger);

    let mapper = IonMapper::new(TypeRegistry::new());
    let err = mapper.serialize(&Stranger).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedType(_)), "{err}");
    assert!(err.to_string().contains("Stranger"));
}

#[test]
fn scalar_for_object_target_is_unsupported_data() {
    let mapper = IonMapper::new(registry());
    let err = mapper.deserialize_elements::<Car>(vec![Element::from(5)]).unwrap_err();
    assert!(matches!(err, MapError::UnsupportedData(_)), "{err}");
}

#[test]
fn depth_guard() {
    fn chain(depth: usize) -> Node {
        let mut node = Node::default();
        for _ in 1..depth {
            node = Node { child: Some(Box::new(node)) };
        }
        node
    }

    let options = SerializationOptions::builder().max_depth(4).build();
    let mapper = IonMapper::with_options(options, registry());

    let bytes = mapper.serialize(&chain(4)).unwrap();
    assert_eq!(mapper.deserialize::<Node>(&bytes).unwrap(), chain(4));

    let err = mapper.serialize(&chain(5)).unwrap_err();
    assert!(matches!(err, MapError::DepthExceeded(4)), "{err}");

    let deep = IonMapper::new(registry()).serialize(&chain(5)).unwrap();
    let err = mapper.deserialize::<Node>(&deep).unwrap_err();
    assert!(matches!(err, MapError::DepthExceeded(4)), "{err}");
}

#[test]
fn null_for_non_nullable_member_is_skipped() {
    let mapper = IonMapper::new(registry());
    let element = Element::new(ElementValue::Struct(vec![
        ("make".into(), Element::null()),
        ("engine".into(), Element::null()),
        ("modelYear".into(), Element::from(1990)),
    ]));
    let back: Car = mapper.deserialize_elements(vec![element]).unwrap();
    assert_eq!(back, Car { model_year: 1990, ..Car::default() });
}

#[test]
fn conversion_failures() {
    let element = Element::new(ElementValue::Struct(vec![
        ("modelYear".into(), Element::from("nineteen")),
        ("make".into(), Element::from("Kia")),
    ]));

    let mapper = IonMapper::new(registry());
    let err = mapper.deserialize_elements::<Car>(vec![element.clone()]).unwrap_err();
    assert!(matches!(err, MapError::TypeMismatch { .. }), "{err}");

    let options = SerializationOptions::builder()
        .enable(MapperFlags::PERMISSIVE)
        .build();
    let mapper = IonMapper::with_options(options, registry());
    let back: Car = mapper.deserialize_elements(vec![element]).unwrap();
    assert_eq!(back.brand, "Kia");
    assert_eq!(back.model_year, 0);
}

#[test]
fn objects_in_collections() {
    let mapper = IonMapper::new(registry());
    let cars: Vec<Car> = vec![car(), Car::default()];
    let bytes = mapper.serialize(&cars).unwrap();
    let back: Vec<Car> = mapper.deserialize(&bytes).unwrap();
    assert_eq!(back, cars);

    let elements = mapper.serialize_to_elements(&car()).unwrap();
    let value = mapper
        .deserialize_from(&mut ElementReader::new(elements), &TypeHint::Any)
        .unwrap();
    // Without a type annotation an untyped struct is produced.
    assert_eq!(value.field("make"), Some(&Value::String("Toyota".into())));
}

#[test]
fn case_insensitive_lookup_falls_back_to_naming_convention() {
    let options = SerializationOptions::builder()
        .naming_convention(SnakeCase)
        .enable(MapperFlags::PROPERTY_NAME_CASE_INSENSITIVE)
        .build();
    let mapper = IonMapper::with_options(options, registry());

    for wire_name in ["MODELYEAR", "model_year"] {
        let element = Element::new(ElementValue::Struct(vec![(
            wire_name.to_string(),
            Element::from(1977),
        )]));
        let back: Car = mapper.deserialize_elements(vec![element]).unwrap();
        assert_eq!(back.model_year, 1977, "{wire_name}");
    }
}
