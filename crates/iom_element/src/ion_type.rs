use core::fmt;

/// The kind of a value reported by an [`IonReader`](crate::IonReader).
///
/// The end of a container (or of the top-level stream) is reported as `None`
/// by [`IonReader::next`](crate::IonReader::next) rather than as a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IonType {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Timestamp,
    Symbol,
    String,
    Clob,
    Blob,
    List,
    Struct,
}

impl IonType {
    /// Returns `true` for `List` and `Struct`.
    #[inline]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Struct)
    }

    /// Returns `true` for `Blob` and `Clob`.
    #[inline]
    pub const fn is_lob(self) -> bool {
        matches!(self, Self::Blob | Self::Clob)
    }

    /// The lower-case Ion name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Timestamp => "timestamp",
            Self::Symbol => "symbol",
            Self::String => "string",
            Self::Clob => "clob",
            Self::Blob => "blob",
            Self::List => "list",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for IonType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
