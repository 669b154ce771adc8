use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use iom_utils::TypeIdMap;
use iom_utils::hash::HashMap;
use log::debug;

use crate::info::{ObjectInfo, TypeHint};
use crate::registry::type_meta::dotted;
use crate::registry::{GetObjectInfo, TypeMeta};
use crate::{MapError, MapperFlags, SerializationOptions};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of mapped types.
///
/// This struct is the central store of [`ObjectInfo`]s. It is built before
/// mapping starts and shared read-only afterwards.
///
/// Type annotations resolve against two indices: the dotted type path
/// (e.g. `fleet.cars.Truck`) and the `prefix.name` of [`AnnotateType`]
/// markers declaring both parts. Other tags fall back to comparing the tag
/// each registered type would be written with.
///
/// [`AnnotateType`]: crate::info::AnnotateType
#[derive(Default)]
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    tag_to_ids: HashMap<String, Vec<TypeId>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn index_tags(meta: &TypeMeta) -> Vec<String> {
        let mut tags = Vec::with_capacity(2);
        tags.push(String::from(meta.dotted_path()));
        if let Some(marker) = meta.info().annotate_type()
            && let (Some(prefix), Some(name)) = (marker.prefix.as_deref(), marker.name.as_deref())
        {
            let tag = if prefix.is_empty() {
                String::from(name)
            } else {
                alloc::format!("{prefix}.{name}")
            };
            if tag != tags[0] {
                tags.push(tag);
            }
        }
        tags
    }

    fn add_indices(&mut self, meta: &TypeMeta) {
        let id = meta.type_id();
        self.type_path_to_id.insert(meta.ty().path(), id);
        for tag in Self::index_tags(meta) {
            self.tag_to_ids.entry(tag).or_default().push(id);
        }
    }

    fn remove_indices(&mut self, meta: &TypeMeta) {
        let id = meta.type_id();
        for tag in Self::index_tags(meta) {
            if let Some(ids) = self.tag_to_ids.get_mut(&tag) {
                ids.retain(|other| *other != id);
                if ids.is_empty() {
                    self.tag_to_ids.remove(&tag);
                }
            }
        }
    }

    /// Adds `info`, or does nothing if its type is already registered.
    ///
    /// Returns `true` if the info was inserted.
    /// This method does _not_ register type dependencies.
    pub fn try_insert(&mut self, info: ObjectInfo) -> bool {
        if self.contains(info.type_id()) {
            return false;
        }
        self.insert(info);
        true
    }

    /// Adds `info`, **overwriting** any registration of the same type.
    ///
    /// This method does _not_ register type dependencies.
    /// Use [`register`](Self::register) to register a type with its dependencies.
    pub fn insert(&mut self, info: ObjectInfo) {
        let meta = TypeMeta::new(info);
        if let Some(old) = self.type_meta_table.remove(&meta.type_id()) {
            self.remove_indices(&old);
        }
        self.add_indices(&meta);
        self.type_meta_table.insert(meta.type_id(), meta);
    }

    /// Registers `T` if it has not yet been registered.
    ///
    /// This also registers the dependencies named by
    /// [`GetObjectInfo::register_dependencies`], once.
    pub fn register<T: GetObjectInfo>(&mut self) {
        if !self.contains(TypeId::of::<T>()) {
            self.insert(T::object_info());
            T::register_dependencies(self);
        }
    }

    /// Registers every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls will not insert duplicates.
    ///
    /// Returns `false` without doing anything when the `auto_register`
    /// feature is disabled.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            super::auto_register::register_types(self);
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_info(&self, type_id: TypeId) -> Option<&ObjectInfo> {
        self.get(type_id).map(TypeMeta::info)
    }

    /// Returns the [`TypeMeta`] of the type with the given full path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.type_meta_table.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    /// The registered supertypes of a type, nearest first.
    ///
    /// The walk stops at the first supertype that is not registered.
    #[inline]
    pub fn ancestors(&self, type_id: TypeId) -> Ancestors<'_> {
        Ancestors {
            registry: self,
            next: self.get_info(type_id).and_then(|info| info.parent()).map(|p| p.id()),
            remaining: self.len(),
        }
    }

    /// Returns `true` if `type_id` is `ancestor` or extends it, directly or not.
    pub fn is_same_or_descendant(&self, type_id: TypeId, ancestor: TypeId) -> bool {
        let mut current = type_id;
        // Bounds the walk if supertypes form a cycle.
        for _ in 0..=self.len() {
            if current == ancestor {
                return true;
            }
            match self.get_info(current).and_then(ObjectInfo::parent) {
                Some(parent) => current = parent.id(),
                None => return false,
            }
        }
        false
    }

    fn accepts(&self, id: TypeId, requested: &TypeHint) -> bool {
        match requested {
            TypeHint::Any => true,
            TypeHint::Object(ty) => self.is_same_or_descendant(id, ty.id()),
            _ => false,
        }
    }

    fn candidates(&self, options: &SerializationOptions, tag: &str) -> Vec<&TypeMeta> {
        if let Some(ids) = self.tag_to_ids.get(tag) {
            return ids.iter().filter_map(|id| self.get(*id)).collect();
        }
        if let Some(meta) = self.get_with_type_path(tag) {
            return alloc::vec![meta];
        }

        let dotted_tag = dotted(tag);
        self.iter()
            .filter(|meta| {
                meta.dotted_path() == dotted_tag
                    || options
                        .type_annotator()
                        .annotations(options, self, meta.info())
                        .first()
                        .is_some_and(|computed| computed == tag)
            })
            .collect()
    }

    /// Resolves the type a type annotation names.
    ///
    /// Candidates are filtered by the namespace order of the options, and
    /// must be the requested type or a descendant of it, unless any type is
    /// requested. The requested type itself is preferred among equals.
    ///
    /// Returns `Ok(None)` for unresolved tags, or a
    /// [`TypeResolution`](MapError::TypeResolution) error under strict
    /// resolution.
    pub fn resolve_annotation(
        &self,
        options: &SerializationOptions,
        tag: &str,
        requested: &TypeHint,
    ) -> Result<Option<&ObjectInfo>, MapError> {
        let mut candidates = self.candidates(options, tag);
        candidates.retain(|meta| self.accepts(meta.type_id(), requested));
        if let Some(ty) = requested.as_object() {
            candidates.sort_by_key(|meta| meta.type_id() != ty.id());
        }

        let namespaces = options.annotated_type_namespaces();
        let resolved = if namespaces.is_empty() {
            candidates.first().copied()
        } else {
            namespaces.iter().find_map(|namespace| {
                candidates
                    .iter()
                    .find(|meta| meta.in_namespace(namespace))
                    .copied()
            })
        };

        match resolved {
            Some(meta) => Ok(Some(meta.info())),
            None if options.has(MapperFlags::STRICT_TYPE_RESOLUTION) => {
                Err(MapError::type_resolution(tag))
            }
            None => {
                debug!("type annotation `{tag}` did not resolve for `{requested}`, using the requested type");
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// Ancestors

/// Iterator over registered supertypes, see [`TypeRegistry::ancestors`].
pub struct Ancestors<'a> {
    registry: &'a TypeRegistry,
    next: Option<TypeId>,
    // Bounds the walk if supertypes form a cycle.
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ObjectInfo;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let info = self.registry.get_info(self.next?)?;
        self.next = info.parent().map(|p| p.id());
        Some(info)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::AnnotateType;

    mod fleet {
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct Vehicle;
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct Truck;
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct Dumper;
    }

    mod depot {
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct Truck;
    }

    crate::impl_reflect!(fleet::Vehicle, fleet::Truck, fleet::Dumper, depot::Truck);

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.insert(ObjectInfo::builder::<fleet::Vehicle>().build());
        registry.insert(
            ObjectInfo::builder::<fleet::Truck>()
                .extends::<fleet::Vehicle>()
                .annotate(AnnotateType::new().with_prefix("yard").with_name("Lorry"))
                .build(),
        );
        registry.insert(
            ObjectInfo::builder::<fleet::Dumper>()
                .extends::<fleet::Truck>()
                .build(),
        );
        registry.insert(
            ObjectInfo::builder::<depot::Truck>()
                .annotate(AnnotateType::new().with_prefix("yard").with_name("Lorry"))
                .build(),
        );
        registry
    }

    const FLEET: &str = "iom_mapper.registry.type_registry.tests.fleet";

    #[test]
    fn ancestry() {
        let registry = registry();
        let dumper = TypeId::of::<fleet::Dumper>();
        let names: Vec<_> = registry.ancestors(dumper).map(|i| i.ty().name()).collect();
        assert_eq!(names, ["Truck", "Vehicle"]);
        assert!(registry.is_same_or_descendant(dumper, TypeId::of::<fleet::Vehicle>()));
        assert!(!registry.is_same_or_descendant(TypeId::of::<fleet::Vehicle>(), dumper));
    }

    #[test]
    fn resolves_dotted_paths() {
        let registry = registry();
        let options = SerializationOptions::default();
        let tag = alloc::format!("{FLEET}.Dumper");

        let info = registry
            .resolve_annotation(&options, &tag, &TypeHint::object::<fleet::Vehicle>())
            .unwrap()
            .unwrap();
        assert_eq!(info.type_id(), TypeId::of::<fleet::Dumper>());

        // Not a descendant of the requested type.
        let info = registry
            .resolve_annotation(&options, &tag, &TypeHint::object::<depot::Truck>())
            .unwrap();
        assert!(info.is_none());
    }

    #[test]
    fn namespace_order_picks_candidate() {
        let registry = registry();
        let options = SerializationOptions::builder()
            .annotated_type_namespace("iom_mapper::registry::type_registry::tests::depot")
            .annotated_type_namespace(FLEET)
            .build();

        let info = registry
            .resolve_annotation(&options, "yard.Lorry", &TypeHint::Any)
            .unwrap()
            .unwrap();
        assert_eq!(info.type_id(), TypeId::of::<depot::Truck>());

        let options = SerializationOptions::builder()
            .annotated_type_namespace(FLEET)
            .build();
        let info = registry
            .resolve_annotation(&options, "yard.Lorry", &TypeHint::Any)
            .unwrap()
            .unwrap();
        assert_eq!(info.type_id(), TypeId::of::<fleet::Truck>());
    }

    #[test]
    fn strict_resolution() {
        let registry = registry();
        let lenient = SerializationOptions::default();
        assert!(
            registry
                .resolve_annotation(&lenient, "no.such.Type", &TypeHint::Any)
                .unwrap()
                .is_none()
        );

        let strict = SerializationOptions::builder()
            .enable(MapperFlags::STRICT_TYPE_RESOLUTION)
            .build();
        let err = registry
            .resolve_annotation(&strict, "no.such.Type", &TypeHint::Any)
            .unwrap_err();
        assert!(matches!(err, MapError::TypeResolution(_)));
    }

    #[test]
    fn insert_overwrites_indices() {
        let mut registry = registry();
        assert!(!registry.try_insert(ObjectInfo::builder::<depot::Truck>().build()));
        registry.insert(ObjectInfo::builder::<depot::Truck>().build());
        assert_eq!(registry.len(), 4);

        let options = SerializationOptions::default();
        let info = registry
            .resolve_annotation(&options, "yard.Lorry", &TypeHint::Any)
            .unwrap()
            .unwrap();
        assert_eq!(info.type_id(), TypeId::of::<fleet::Truck>());
    }
}
