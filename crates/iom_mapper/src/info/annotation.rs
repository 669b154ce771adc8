use alloc::string::String;

/// Marks a type to be written with a type annotation.
///
/// The annotation is `prefix.name`. An unset prefix comes from the configured
/// [`TypeAnnotationPrefix`](crate::annotate::TypeAnnotationPrefix) and an
/// unset name is the short name of the concrete type being written.
///
/// Descendants (see [`ObjectBuilder::extends`](crate::info::ObjectBuilder::extends))
/// inherit the marker unless `exclude_descendants` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateType {
    pub prefix: Option<String>,
    pub name: Option<String>,
    pub exclude_descendants: bool,
}

impl AnnotateType {
    #[inline]
    pub const fn new() -> Self {
        Self {
            prefix: None,
            name: None,
            exclude_descendants: false,
        }
    }

    #[inline]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn excluding_descendants(mut self) -> Self {
        self.exclude_descendants = true;
        self
    }
}

/// Marks a type to be written without a type annotation, even when an
/// ancestor is annotated.
///
/// With `exclude_descendants` the suppression also applies to descendants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoNotAnnotateType {
    pub exclude_descendants: bool,
}
