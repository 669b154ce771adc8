//! Type annotation strategies.
//!
//! - [`TypeAnnotationPrefix`]: the prefix of a type annotation, e.g. the
//!   namespace in `fleet.cars.Truck`.
//! - [`TypeAnnotator`]: the annotations an object is written with.

use alloc::string::String;
use alloc::vec::Vec;

use crate::info::{AnnotateType, ObjectInfo, ObjectType};
use crate::registry::TypeRegistry;
use crate::registry::dotted;
use crate::{MapperFlags, SerializationOptions};

// -----------------------------------------------------------------------------
// Prefix

/// Computes the prefix of a type annotation.
pub trait TypeAnnotationPrefix: Send + Sync {
    fn prefix(&self, ty: &ObjectType) -> String;
}

/// The module path of the type, with `.` separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceTypeAnnotationPrefix;

impl TypeAnnotationPrefix for NamespaceTypeAnnotationPrefix {
    #[inline]
    fn prefix(&self, ty: &ObjectType) -> String {
        dotted(ty.module_path())
    }
}

/// The same prefix for every type.
#[derive(Debug, Clone, Default)]
pub struct FixedTypeAnnotationPrefix(pub String);

impl FixedTypeAnnotationPrefix {
    #[inline]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }
}

impl TypeAnnotationPrefix for FixedTypeAnnotationPrefix {
    #[inline]
    fn prefix(&self, _ty: &ObjectType) -> String {
        self.0.clone()
    }
}

// -----------------------------------------------------------------------------
// Annotator

/// Decides the annotations an object is written with.
///
/// The first annotation identifies the type when it is read back.
pub trait TypeAnnotator: Send + Sync {
    fn annotations(
        &self,
        options: &SerializationOptions,
        registry: &TypeRegistry,
        info: &ObjectInfo,
    ) -> Vec<String>;
}

/// Annotates types marked with [`AnnotateType`], directly or through a
/// registered supertype.
///
/// - A [`DoNotAnnotateType`](crate::info::DoNotAnnotateType) on the type
///   suppresses annotation. On a supertype it does so only when it excludes
///   descendants.
/// - The nearest [`AnnotateType`] applies, unless it sits on a supertype and
///   excludes descendants.
/// - With [`MapperFlags::INCLUDE_TYPE_INFORMATION`] types without an
///   applicable marker are annotated with their own identity.
///
/// # Examples
///
/// ```
/// use iom_mapper::{impl_reflect, SerializationOptions, TypeRegistry};
/// use iom_mapper::annotate::{DefaultTypeAnnotator, FixedTypeAnnotationPrefix, TypeAnnotator};
/// use iom_mapper::info::{AnnotateType, ObjectInfo};
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Vehicle;
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Truck;
/// impl_reflect!(Vehicle, Truck);
///
/// let mut registry = TypeRegistry::new();
/// registry.insert(ObjectInfo::builder::<Vehicle>().annotate(AnnotateType::new()).build());
/// registry.insert(ObjectInfo::builder::<Truck>().extends::<Vehicle>().build());
///
/// let options = SerializationOptions::builder()
///     .type_annotation_prefix(FixedTypeAnnotationPrefix::new("fleet"))
///     .build();
/// let truck = registry.get_info(std::any::TypeId::of::<Truck>()).unwrap();
///
/// assert_eq!(DefaultTypeAnnotator.annotations(&options, &registry, truck), ["fleet.Truck"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeAnnotator;

impl DefaultTypeAnnotator {
    fn marker<'a>(registry: &'a TypeRegistry, info: &'a ObjectInfo) -> Option<&'a AnnotateType> {
        if info.do_not_annotate_type().is_some() {
            return None;
        }
        if let Some(marker) = info.annotate_type() {
            return Some(marker);
        }

        for ancestor in registry.ancestors(info.type_id()) {
            if ancestor
                .do_not_annotate_type()
                .is_some_and(|m| m.exclude_descendants)
            {
                return None;
            }
            if let Some(marker) = ancestor.annotate_type() {
                return (!marker.exclude_descendants).then_some(marker);
            }
        }
        None
    }

    fn suppressed(registry: &TypeRegistry, info: &ObjectInfo) -> bool {
        info.do_not_annotate_type().is_some()
            || registry
                .ancestors(info.type_id())
                .any(|a| a.do_not_annotate_type().is_some_and(|m| m.exclude_descendants))
    }
}

fn join_tag(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        String::from(name)
    } else {
        alloc::format!("{prefix}.{name}")
    }
}

impl TypeAnnotator for DefaultTypeAnnotator {
    fn annotations(
        &self,
        options: &SerializationOptions,
        registry: &TypeRegistry,
        info: &ObjectInfo,
    ) -> Vec<String> {
        let ty = info.ty();
        match Self::marker(registry, info) {
            Some(marker) => {
                let prefix = match &marker.prefix {
                    Some(prefix) => prefix.clone(),
                    None => options.type_annotation_prefix().prefix(ty),
                };
                let name = marker.name.as_deref().unwrap_or(ty.name());
                alloc::vec![join_tag(&prefix, name)]
            }
            None if options.has(MapperFlags::INCLUDE_TYPE_INFORMATION)
                && !Self::suppressed(registry, info) =>
            {
                let prefix = options.type_annotation_prefix().prefix(ty);
                alloc::vec![join_tag(&prefix, ty.name())]
            }
            None => Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::DoNotAnnotateType;
    use core::any::TypeId;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Root;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Middle;
    #[derive(Debug, Clone, PartialEq, Default)]
    struct Leaf;

    crate::impl_reflect!(Root, Middle, Leaf);

    const NAMESPACE: &str = "iom_mapper.annotate.tests";

    fn annotate(registry: &TypeRegistry, options: &SerializationOptions) -> Vec<String> {
        let info = registry.get_info(TypeId::of::<Leaf>()).unwrap();
        DefaultTypeAnnotator.annotations(options, registry, info)
    }

    fn chain(root: ObjectInfo, middle: ObjectInfo, leaf: ObjectInfo) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.insert(root);
        registry.insert(middle);
        registry.insert(leaf);
        registry
    }

    #[test]
    fn inherited_marker_uses_concrete_name() {
        let registry = chain(
            ObjectInfo::builder::<Root>().annotate(AnnotateType::new()).build(),
            ObjectInfo::builder::<Middle>().extends::<Root>().build(),
            ObjectInfo::builder::<Leaf>().extends::<Middle>().build(),
        );
        let options = SerializationOptions::default();
        assert_eq!(annotate(&registry, &options), [alloc::format!("{NAMESPACE}.Leaf")]);
    }

    #[test]
    fn nearest_marker_wins() {
        let registry = chain(
            ObjectInfo::builder::<Root>().annotate(AnnotateType::new()).build(),
            ObjectInfo::builder::<Middle>()
                .extends::<Root>()
                .annotate(AnnotateType::new().with_prefix("OEM").with_name("Part"))
                .build(),
            ObjectInfo::builder::<Leaf>().extends::<Middle>().build(),
        );
        let options = SerializationOptions::default();
        assert_eq!(annotate(&registry, &options), ["OEM.Part"]);
    }

    #[test]
    fn excluded_descendants() {
        let registry = chain(
            ObjectInfo::builder::<Root>().build(),
            ObjectInfo::builder::<Middle>()
                .extends::<Root>()
                .annotate(AnnotateType::new().excluding_descendants())
                .build(),
            ObjectInfo::builder::<Leaf>().extends::<Middle>().build(),
        );
        let options = SerializationOptions::default();
        assert!(annotate(&registry, &options).is_empty());

        let middle = registry.get_info(TypeId::of::<Middle>()).unwrap();
        assert_eq!(
            DefaultTypeAnnotator.annotations(&options, &registry, middle),
            [alloc::format!("{NAMESPACE}.Middle")]
        );
    }

    #[test]
    fn suppression() {
        // On an ancestor without exclusion it is ignored.
        let registry = chain(
            ObjectInfo::builder::<Root>().annotate(AnnotateType::new()).build(),
            ObjectInfo::builder::<Middle>()
                .extends::<Root>()
                .do_not_annotate(DoNotAnnotateType::default())
                .build(),
            ObjectInfo::builder::<Leaf>().extends::<Middle>().build(),
        );
        let options = SerializationOptions::builder()
            .enable(MapperFlags::INCLUDE_TYPE_INFORMATION)
            .build();
        assert_eq!(annotate(&registry, &options).len(), 1);

        let registry = chain(
            ObjectInfo::builder::<Root>().annotate(AnnotateType::new()).build(),
            ObjectInfo::builder::<Middle>()
                .extends::<Root>()
                .do_not_annotate(DoNotAnnotateType { exclude_descendants: true })
                .build(),
            ObjectInfo::builder::<Leaf>().extends::<Middle>().build(),
        );
        assert!(annotate(&registry, &options).is_empty());
    }

    #[test]
    fn type_information_and_fixed_prefix() {
        let registry = chain(
            ObjectInfo::builder::<Root>().build(),
            ObjectInfo::builder::<Middle>().build(),
            ObjectInfo::builder::<Leaf>().build(),
        );
        assert!(annotate(&registry, &SerializationOptions::default()).is_empty());

        let options = SerializationOptions::builder()
            .enable(MapperFlags::INCLUDE_TYPE_INFORMATION)
            .type_annotation_prefix(FixedTypeAnnotationPrefix::new("shop"))
            .build();
        assert_eq!(annotate(&registry, &options), ["shop.Leaf"]);

        let options = SerializationOptions::builder()
            .enable(MapperFlags::INCLUDE_TYPE_INFORMATION)
            .type_annotation_prefix(FixedTypeAnnotationPrefix::new(""))
            .build();
        assert_eq!(annotate(&registry, &options), ["Leaf"]);
    }
}
