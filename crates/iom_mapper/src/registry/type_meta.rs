use alloc::string::String;
use core::any::TypeId;

use crate::Reflect;
use crate::info::{ObjectInfo, ObjectType};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// GetObjectInfo

/// Describes how a type is mapped.
///
/// Implement it to register a type with [`TypeRegistry::register`] or
/// [`auto_register!`](crate::auto_register).
///
/// # Examples
///
/// ```
/// use iom_mapper::{impl_reflect, TypeRegistry};
/// use iom_mapper::info::ObjectInfo;
/// use iom_mapper::registry::GetObjectInfo;
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Engine {
///     cylinders: i32,
/// }
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Car {
///     engine: Engine,
/// }
///
/// impl_reflect!(Engine, Car);
///
/// impl GetObjectInfo for Engine {
///     fn object_info() -> ObjectInfo {
///         ObjectInfo::builder::<Self>()
///             .default_constructible()
///             .property("Cylinders", |e| e.cylinders, |e, v| e.cylinders = v)
///             .build()
///     }
/// }
///
/// impl GetObjectInfo for Car {
///     fn object_info() -> ObjectInfo {
///         ObjectInfo::builder::<Self>()
///             .default_constructible()
///             .property("Engine", |c| c.engine.clone(), |c, v| c.engine = v)
///             .build()
///     }
///
///     fn register_dependencies(registry: &mut TypeRegistry) {
///         registry.register::<Engine>();
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Car>();
/// assert_eq!(registry.len(), 2);
/// ```
pub trait GetObjectInfo: Reflect + Sized {
    fn object_info() -> ObjectInfo;

    /// Registers the types this type refers to.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

// -----------------------------------------------------------------------------
// TypeMeta

/// Registry storage of one type.
///
/// Holds the [`ObjectInfo`] and the dotted identity strings used to match
/// type annotations, e.g. `fleet.cars.Truck` and namespace `fleet.cars`.
#[derive(Debug, Clone)]
pub struct TypeMeta {
    info: ObjectInfo,
    dotted_path: String,
    namespace: String,
}

/// Renders a module path with `.` separators.
pub(crate) fn dotted(path: &str) -> String {
    path.replace("::", ".")
}

impl TypeMeta {
    pub fn new(info: ObjectInfo) -> Self {
        let ty = info.ty();
        let namespace = dotted(ty.module_path());
        let dotted_path = if namespace.is_empty() {
            String::from(ty.name())
        } else {
            alloc::format!("{namespace}.{}", ty.name())
        };
        Self {
            info,
            dotted_path,
            namespace,
        }
    }

    #[inline]
    pub const fn info(&self) -> &ObjectInfo {
        &self.info
    }

    #[inline]
    pub const fn ty(&self) -> &ObjectType {
        self.info.ty()
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.info.type_id()
    }

    /// The type path without generic arguments, with `.` separators.
    #[inline]
    pub fn dotted_path(&self) -> &str {
        &self.dotted_path
    }

    /// The module path with `.` separators. Empty for root-level types.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns `true` if the type lives in `namespace` or one of its children.
    ///
    /// `::` and `.` separators are equivalent.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        let namespace = dotted(namespace);
        match self.namespace.strip_prefix(namespace.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('.'),
            None => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    mod fleet {
        pub mod cars {
            #[derive(Debug, Clone, PartialEq, Default)]
            pub struct Truck;
        }
    }

    crate::impl_reflect!(fleet::cars::Truck);

    #[test]
    fn identity_strings() {
        let meta = TypeMeta::new(ObjectInfo::builder::<fleet::cars::Truck>().build());
        assert_eq!(
            meta.dotted_path(),
            "iom_mapper.registry.type_meta.tests.fleet.cars.Truck"
        );
        assert_eq!(meta.namespace(), "iom_mapper.registry.type_meta.tests.fleet.cars");
        assert!(meta.in_namespace("iom_mapper::registry"));
        assert!(meta.in_namespace("iom_mapper.registry.type_meta.tests.fleet.cars"));
        assert!(!meta.in_namespace("iom_mapper.reg"));
        assert!(!meta.in_namespace("fleet"));
    }
}
