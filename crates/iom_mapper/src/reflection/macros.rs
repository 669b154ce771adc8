/// Implements [`Reflect`](crate::Reflect), [`ToValue`](crate::ToValue),
/// [`FromValue`](crate::FromValue) and [`Typed`](crate::Typed) for
/// structured application types.
///
/// The types must implement `Clone`, `PartialEq` and `Debug`.
/// Their mapping is described separately by an
/// [`ObjectInfo`](crate::info::ObjectInfo) registered in the
/// [`TypeRegistry`](crate::TypeRegistry).
///
/// # Examples
///
/// ```
/// use iom_mapper::{impl_reflect, Typed, info::{ObjectType, TypeHint}};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Engine {
///     cylinders: i32,
/// }
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Wheel;
///
/// impl_reflect!(Engine, Wheel);
///
/// assert_eq!(Engine::type_hint(), TypeHint::Object(ObjectType::of::<Engine>()));
/// ```
#[macro_export]
macro_rules! impl_reflect {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Reflect for $ty {
            fn clone_reflect(&self) -> $crate::__macro_exports::Box<dyn $crate::Reflect> {
                $crate::__macro_exports::Box::new(::core::clone::Clone::clone(self))
            }

            fn reflect_partial_eq(&self, other: &dyn $crate::Reflect) -> ::core::option::Option<bool> {
                other
                    .downcast_ref::<Self>()
                    .map(|other| ::core::cmp::PartialEq::eq(self, other))
            }

            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }
        }

        impl $crate::ToValue for $ty {
            #[inline]
            fn to_value(&self) -> $crate::Value {
                $crate::Value::Object($crate::__macro_exports::Box::new(::core::clone::Clone::clone(self)))
            }
        }

        impl $crate::FromValue for $ty {
            #[inline]
            fn from_value(value: $crate::Value) -> ::core::result::Result<Self, $crate::MapError> {
                $crate::__macro_exports::object_from_value::<Self>(value)
            }
        }

        impl $crate::Typed for $ty {
            #[inline]
            fn type_hint() -> $crate::info::TypeHint {
                $crate::info::TypeHint::Object($crate::info::ObjectType::of::<Self>())
            }
        }
    )+};
}

/// Submits types implementing [`GetObjectInfo`](crate::registry::GetObjectInfo)
/// for [`TypeRegistry::auto_register`](crate::TypeRegistry::auto_register).
///
/// Use it at module level.
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {$(
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::AutoRegistration::of::<$ty>()
        }
    )+};
}
