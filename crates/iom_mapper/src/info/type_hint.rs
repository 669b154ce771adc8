use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// ObjectType

/// The identity of an application type.
///
/// # Examples
///
/// ```
/// use iom_mapper::info::ObjectType;
///
/// mod vehicles {
///     pub struct Truck;
/// }
///
/// let ty = ObjectType::of::<vehicles::Truck>();
/// assert_eq!(ty.name(), "Truck");
/// assert!(ty.module_path().ends_with("vehicles"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectType {
    id: TypeId,
    path: &'static str,
}

impl ObjectType {
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full type path, e.g. `my_crate::cars::Car`.
    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    // The path without generic arguments.
    fn base_path(&self) -> &'static str {
        match self.path.find('<') {
            Some(index) => &self.path[..index],
            None => self.path,
        }
    }

    /// The last path segment without generic arguments, e.g. `Car`.
    pub fn name(&self) -> &'static str {
        let base = self.base_path();
        match base.rfind("::") {
            Some(index) => &base[index + 2..],
            None => base,
        }
    }

    /// The module path, e.g. `my_crate::cars`. Empty for root-level types.
    pub fn module_path(&self) -> &'static str {
        let base = self.base_path();
        match base.rfind("::") {
            Some(index) => &base[..index],
            None => "",
        }
    }

    /// The first path segment, e.g. `my_crate`.
    pub fn crate_name(&self) -> &'static str {
        let base = self.base_path();
        match base.find("::") {
            Some(index) => &base[..index],
            None => base,
        }
    }
}

impl fmt::Display for ObjectType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// TypeHint

/// The static declared type of a member, parameter or deserialization target.
///
/// The dispatcher consults it where the wire alone is ambiguous: the element
/// type of a list, GUIDs stored as untagged blobs, and the type to instantiate
/// for a struct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeHint {
    /// No static information; structs map to registered objects by
    /// annotation, or to untyped structs.
    Any,
    Null,
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    BigDecimal,
    Timestamp,
    String,
    Symbol,
    Blob,
    Clob,
    Guid,
    /// An ordered sequence with the given element type.
    List(Box<TypeHint>),
    /// A string-keyed map with the given value type.
    Map(Box<TypeHint>),
    /// A registered application type or one of its descendants.
    Object(ObjectType),
}

impl TypeHint {
    #[inline]
    pub fn list(element: TypeHint) -> Self {
        Self::List(Box::new(element))
    }

    #[inline]
    pub fn map(value: TypeHint) -> Self {
        Self::Map(Box::new(value))
    }

    #[inline]
    pub fn object<T: Any>() -> Self {
        Self::Object(ObjectType::of::<T>())
    }

    /// Returns `true` for hints that never describe an aggregate.
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Any | Self::List(_) | Self::Map(_) | Self::Object(_))
    }

    #[inline]
    pub const fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Self::Object(ty) => Some(ty),
            _ => None,
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Null => f.write_str("null"),
            Self::Bool => f.write_str("bool"),
            Self::Int32 => f.write_str("int32"),
            Self::Int64 => f.write_str("int64"),
            Self::Float32 => f.write_str("float32"),
            Self::Float64 => f.write_str("float64"),
            Self::Decimal => f.write_str("decimal"),
            Self::BigDecimal => f.write_str("big decimal"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::String => f.write_str("string"),
            Self::Symbol => f.write_str("symbol"),
            Self::Blob => f.write_str("blob"),
            Self::Clob => f.write_str("clob"),
            Self::Guid => f.write_str("guid"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Map(value) => write!(f, "map<{value}>"),
            Self::Object(ty) => write!(f, "`{ty}`"),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    struct Plain;
    struct Generic<T>(core::marker::PhantomData<T>);

    #[test]
    fn path_segments() {
        let ty = ObjectType::of::<Plain>();
        assert_eq!(ty.name(), "Plain");
        assert_eq!(ty.module_path(), "iom_mapper::info::type_hint::tests");
        assert_eq!(ty.crate_name(), "iom_mapper");

        let ty = ObjectType::of::<Generic<Plain>>();
        assert_eq!(ty.name(), "Generic");
        assert_eq!(ty.module_path(), "iom_mapper::info::type_hint::tests");
    }

    #[test]
    fn display() {
        assert_eq!(TypeHint::list(TypeHint::map(TypeHint::Int32)).to_string(), "list<map<int32>>");
        assert!(TypeHint::Guid.is_scalar());
        assert!(!TypeHint::object::<Plain>().is_scalar());
    }
}
