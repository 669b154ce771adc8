//! Immutable serialization policy.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;
use iom_element::Format;
use iom_utils::hash::HashMap;

use crate::annotate::{DefaultTypeAnnotator, NamespaceTypeAnnotationPrefix};
use crate::annotate::{TypeAnnotationPrefix, TypeAnnotator};
use crate::factory::{DefaultObjectFactory, ObjectFactory};
use crate::naming::{CamelCase, NamingConvention};
use crate::serde::CustomSerializer;

/// Default limit of nested aggregates in both directions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// -----------------------------------------------------------------------------
// MapperFlags

bitflags! {
    /// Boolean mapping policies.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MapperFlags: u16 {
        /// Tag GUID blobs with `guid128`.
        const ANNOTATE_GUIDS                = 1 << 0;
        /// Map every field, not only included and backing ones.
        const INCLUDE_FIELDS                = 1 << 1;
        /// Do not write members holding `null`.
        const IGNORE_NULLS                  = 1 << 2;
        /// Do not map immutable fields.
        const IGNORE_READ_ONLY_FIELDS       = 1 << 3;
        /// Do not map properties without write access.
        const IGNORE_READ_ONLY_PROPERTIES   = 1 << 4;
        /// Match wire names to member names ignoring case.
        const PROPERTY_NAME_CASE_INSENSITIVE = 1 << 5;
        /// Do not map members holding the default of their type.
        const IGNORE_DEFAULTS               = 1 << 6;
        /// Annotate every object with its type identity.
        const INCLUDE_TYPE_INFORMATION      = 1 << 7;
        /// Coerce recoverable data problems instead of failing.
        const PERMISSIVE                    = 1 << 8;
        /// Fail on type annotations that do not resolve.
        const STRICT_TYPE_RESOLUTION        = 1 << 9;
    }
}

// -----------------------------------------------------------------------------
// SerializationOptions

/// The policy shared read-only by every mapping call.
///
/// Built once with [`SerializationOptions::builder`] and never mutated.
///
/// # Examples
///
/// ```
/// use iom_mapper::{MapperFlags, SerializationOptions};
/// use iom_mapper::naming::SnakeCase;
///
/// let options = SerializationOptions::builder()
///     .naming_convention(SnakeCase)
///     .enable(MapperFlags::IGNORE_NULLS | MapperFlags::ANNOTATE_GUIDS)
///     .annotated_type_namespace("fleet")
///     .build();
///
/// assert!(options.has(MapperFlags::IGNORE_NULLS));
/// assert!(!options.has(MapperFlags::INCLUDE_FIELDS));
/// assert_eq!(options.naming_convention().from_member_name("ModelYear"), "model_year");
/// ```
#[derive(Clone)]
pub struct SerializationOptions {
    naming_convention: Arc<dyn NamingConvention>,
    format: Format,
    max_depth: usize,
    flags: MapperFlags,
    type_annotation_prefix: Arc<dyn TypeAnnotationPrefix>,
    type_annotator: Arc<dyn TypeAnnotator>,
    object_factory: Arc<dyn ObjectFactory>,
    annotated_type_namespaces: Vec<String>,
    annotated_serializers: HashMap<String, Arc<dyn CustomSerializer>>,
}

impl Default for SerializationOptions {
    #[inline]
    fn default() -> Self {
        Self {
            naming_convention: Arc::new(CamelCase),
            format: Format::Binary,
            max_depth: DEFAULT_MAX_DEPTH,
            flags: MapperFlags::empty(),
            type_annotation_prefix: Arc::new(NamespaceTypeAnnotationPrefix),
            type_annotator: Arc::new(DefaultTypeAnnotator),
            object_factory: Arc::new(DefaultObjectFactory),
            annotated_type_namespaces: Vec::new(),
            annotated_serializers: HashMap::default(),
        }
    }
}

impl SerializationOptions {
    #[inline]
    pub fn builder() -> SerializationOptionsBuilder {
        SerializationOptionsBuilder {
            options: Self::default(),
        }
    }

    /// Returns `true` if all of `flags` are set.
    #[inline]
    pub const fn has(&self, flags: MapperFlags) -> bool {
        self.flags.contains(flags)
    }

    #[inline]
    pub const fn flags(&self) -> MapperFlags {
        self.flags
    }

    #[inline]
    pub fn naming_convention(&self) -> &dyn NamingConvention {
        &*self.naming_convention
    }

    #[inline]
    pub const fn format(&self) -> Format {
        self.format
    }

    #[inline]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    #[inline]
    pub fn type_annotation_prefix(&self) -> &dyn TypeAnnotationPrefix {
        &*self.type_annotation_prefix
    }

    #[inline]
    pub fn type_annotator(&self) -> &dyn TypeAnnotator {
        &*self.type_annotator
    }

    #[inline]
    pub fn object_factory(&self) -> &dyn ObjectFactory {
        &*self.object_factory
    }

    /// Namespaces searched in order when resolving type annotations.
    /// Empty means any namespace.
    #[inline]
    pub fn annotated_type_namespaces(&self) -> &[String] {
        &self.annotated_type_namespaces
    }

    /// The custom serializer registered for a type annotation.
    #[inline]
    pub fn annotated_serializer(&self, tag: &str) -> Option<&dyn CustomSerializer> {
        self.annotated_serializers.get(tag).map(|s| &**s)
    }
}

impl fmt::Debug for SerializationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationOptions")
            .field("format", &self.format)
            .field("max_depth", &self.max_depth)
            .field("flags", &self.flags)
            .field("annotated_type_namespaces", &self.annotated_type_namespaces)
            .field(
                "annotated_serializers",
                &self.annotated_serializers.keys().collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Builder

/// Builder of [`SerializationOptions`].
#[derive(Clone)]
pub struct SerializationOptionsBuilder {
    options: SerializationOptions,
}

impl SerializationOptionsBuilder {
    pub fn naming_convention(mut self, convention: impl NamingConvention + 'static) -> Self {
        self.options.naming_convention = Arc::new(convention);
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.options.format = format;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Replaces all flags.
    pub fn flags(mut self, flags: MapperFlags) -> Self {
        self.options.flags = flags;
        self
    }

    pub fn enable(mut self, flags: MapperFlags) -> Self {
        self.options.flags.insert(flags);
        self
    }

    pub fn disable(mut self, flags: MapperFlags) -> Self {
        self.options.flags.remove(flags);
        self
    }

    pub fn type_annotation_prefix(mut self, prefix: impl TypeAnnotationPrefix + 'static) -> Self {
        self.options.type_annotation_prefix = Arc::new(prefix);
        self
    }

    pub fn type_annotator(mut self, annotator: impl TypeAnnotator + 'static) -> Self {
        self.options.type_annotator = Arc::new(annotator);
        self
    }

    pub fn object_factory(mut self, factory: impl ObjectFactory + 'static) -> Self {
        self.options.object_factory = Arc::new(factory);
        self
    }

    /// Appends a namespace to the resolution order.
    pub fn annotated_type_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.options.annotated_type_namespaces.push(namespace.into());
        self
    }

    /// Reads and writes objects tagged `tag` with `serializer`.
    pub fn annotated_serializer(
        mut self,
        tag: impl Into<String>,
        serializer: impl CustomSerializer + 'static,
    ) -> Self {
        self.options
            .annotated_serializers
            .insert(tag.into(), Arc::new(serializer));
        self
    }

    #[inline]
    pub fn build(self) -> SerializationOptions {
        self.options
    }
}

// -----------------------------------------------------------------------------
// Tests
