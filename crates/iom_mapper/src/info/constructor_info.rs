use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use crate::info::TypeHint;
use crate::{FromValue, MapError, Reflect, Typed, Value};

// -----------------------------------------------------------------------------
// ParamInfo

/// A constructor parameter and the wire field bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    name: &'static str,
    wire_name: Option<&'static str>,
    type_hint: TypeHint,
}

impl ParamInfo {
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn wire_name(&self) -> Option<&'static str> {
        self.wire_name
    }

    #[inline]
    pub const fn type_hint(&self) -> &TypeHint {
        &self.type_hint
    }
}

// -----------------------------------------------------------------------------
// ConstructorArgs

/// Positional arguments collected for a constructor.
///
/// Arguments absent from the wire are `Null`.
#[derive(Debug)]
pub struct ConstructorArgs {
    values: Vec<Value>,
}

impl ConstructorArgs {
    #[inline]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Takes the argument at `index`, leaving `Null` in its place.
    pub fn take_value(&mut self, index: usize) -> Result<Value, MapError> {
        match self.values.get_mut(index) {
            Some(slot) => Ok(mem::replace(slot, Value::Null)),
            None => Err(MapError::configuration(alloc::format!(
                "constructor argument {index} is out of range ({} arguments)",
                self.values.len()
            ))),
        }
    }

    /// Takes and converts the argument at `index`.
    #[inline]
    pub fn take<V: FromValue>(&mut self, index: usize) -> Result<V, MapError> {
        V::from_value(self.take_value(index)?)
    }

    /// Takes and converts the argument at `index`, or `V::default()` if it is `Null`.
    pub fn take_or_default<V: FromValue + Default>(&mut self, index: usize) -> Result<V, MapError> {
        match self.take_value(index)? {
            Value::Null => Ok(V::default()),
            value => V::from_value(value),
        }
    }
}

// -----------------------------------------------------------------------------
// ConstructorInfo

type ConstructFn = Arc<dyn Fn(&mut ConstructorArgs) -> Result<Box<dyn Reflect>, MapError> + Send + Sync>;

/// A designated constructor.
///
/// Every parameter must be bound to a wire name for the constructor to be
/// usable; this is checked before any input is read.
///
/// # Examples
///
/// ```
/// use iom_mapper::info::ConstructorInfo;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// iom_mapper::impl_reflect!(Point);
///
/// let ctor = ConstructorInfo::new(|args| Ok(Point { x: args.take(0)?, y: args.take(1)? }))
///     .param::<i32>("x", "X")
///     .param::<i32>("y", "Y");
///
/// assert_eq!(ctor.position("Y"), Some(1));
/// assert_eq!(ctor.unbound_param(), None);
/// ```
#[derive(Clone)]
pub struct ConstructorInfo {
    params: Vec<ParamInfo>,
    construct: ConstructFn,
}

impl ConstructorInfo {
    pub fn new<T: Reflect>(
        construct: impl Fn(&mut ConstructorArgs) -> Result<T, MapError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            params: Vec::new(),
            construct: Arc::new(move |args: &mut ConstructorArgs| {
                construct(args).map(|value| Box::new(value) as Box<dyn Reflect>)
            }),
        }
    }

    /// Appends a parameter bound to `wire_name`.
    pub fn param<V: Typed>(mut self, name: &'static str, wire_name: &'static str) -> Self {
        self.params.push(ParamInfo {
            name,
            wire_name: Some(wire_name),
            type_hint: V::type_hint(),
        });
        self
    }

    /// Appends a parameter without a wire binding.
    ///
    /// Deserializing with such a constructor is a configuration error.
    pub fn param_unbound<V: Typed>(mut self, name: &'static str) -> Self {
        self.params.push(ParamInfo {
            name,
            wire_name: None,
            type_hint: V::type_hint(),
        });
        self
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    /// The index of the parameter bound to `wire_name`.
    pub fn position(&self, wire_name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.wire_name == Some(wire_name))
    }

    /// The first parameter without a wire binding.
    pub fn unbound_param(&self) -> Option<&ParamInfo> {
        self.params.iter().find(|p| p.wire_name.is_none())
    }

    /// Invokes the constructor with positional arguments.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Box<dyn Reflect>, MapError> {
        (self.construct)(&mut ConstructorArgs::new(args))
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    #[derive(Debug, Clone, PartialEq)]
    struct Named {
        name: String,
        size: i32,
    }

    crate::impl_reflect!(Named);

    #[test]
    fn invoke_with_missing_argument() {
        let ctor = ConstructorInfo::new(|args| {
            Ok(Named {
                name: args.take(0)?,
                size: args.take_or_default(1)?,
            })
        })
        .param::<String>("name", "name")
        .param::<i32>("size", "size");

        let obj = ctor
            .invoke(vec![Value::String("a".into()), Value::Null])
            .unwrap();
        assert_eq!(
            obj.take::<Named>().unwrap(),
            Named {
                name: "a".into(),
                size: 0
            }
        );

        assert!(ctor.invoke(vec![Value::Null, Value::Null]).is_err());
        assert!(ctor.invoke(vec![]).is_err());
    }

    #[test]
    fn unbound_parameters_are_reported() {
        let ctor = ConstructorInfo::new(|args| {
            Ok(Named {
                name: args.take(0)?,
                size: 0,
            })
        })
        .param_unbound::<String>("name");
        assert_eq!(ctor.unbound_param().map(ParamInfo::name), Some("name"));
        assert_eq!(ctor.position("name"), None);
    }
}
