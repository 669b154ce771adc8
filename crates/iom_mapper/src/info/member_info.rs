use alloc::sync::Arc;
use core::fmt;

use crate::info::TypeHint;
use crate::{FromValue, MapError, Reflect, ToValue, Typed, Value};

// -----------------------------------------------------------------------------
// Accessors

/// A type-erased read accessor.
pub type Getter = Arc<dyn Fn(&dyn Reflect) -> Result<Value, MapError> + Send + Sync>;

/// A type-erased write accessor.
pub type Setter = Arc<dyn Fn(&mut dyn Reflect, Value) -> Result<(), MapError> + Send + Sync>;

fn make_getter<T, V>(get: impl Fn(&T) -> V + Send + Sync + 'static) -> Getter
where
    T: Reflect,
    V: ToValue,
{
    Arc::new(move |target: &dyn Reflect| {
        let target = target
            .downcast_ref::<T>()
            .ok_or_else(|| MapError::mismatch(core::any::type_name::<T>(), target.type_path()))?;
        Ok(get(target).to_value())
    })
}

fn make_setter<T, V>(set: impl Fn(&mut T, V) + Send + Sync + 'static) -> Setter
where
    T: Reflect,
    V: FromValue,
{
    Arc::new(move |target: &mut dyn Reflect, value: Value| {
        let found = target.type_path();
        let target = target
            .downcast_mut::<T>()
            .ok_or_else(|| MapError::mismatch(core::any::type_name::<T>(), found))?;
        set(target, V::from_value(value)?);
        Ok(())
    })
}

// -----------------------------------------------------------------------------
// MemberInfo

/// Whether a member is accessed as a property or as direct storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Field,
}

/// A named, typed slot of an application type.
///
/// Properties are mapped by default. Fields are mapped when fields are
/// included by the options, when explicitly [`included`](Self::included), or
/// when they back a read-only property and read-only properties are mapped.
///
/// # Examples
///
/// ```
/// use iom_mapper::info::{MemberInfo, MemberKind};
///
/// struct Car {
///     brand: String,
/// }
///
/// # use iom_mapper::Reflect;
/// # impl Reflect for Car {
/// #     fn clone_reflect(&self) -> Box<dyn Reflect> { Box::new(Car { brand: self.brand.clone() }) }
/// # }
/// let brand = MemberInfo::property("Brand", |c: &Car| c.brand.clone(), |c: &mut Car, v| c.brand = v)
///     .with_wire_name("make");
///
/// assert_eq!(brand.kind(), MemberKind::Property);
/// assert_eq!(brand.wire_name(), Some("make"));
/// assert!(!brand.is_read_only());
/// ```
#[derive(Clone)]
pub struct MemberInfo {
    name: &'static str,
    wire_name: Option<&'static str>,
    kind: MemberKind,
    type_hint: TypeHint,
    nullable: bool,
    getter: Option<Getter>,
    setter: Option<Setter>,
    immutable: bool,
    ignored: bool,
    included: bool,
    backs: Option<&'static str>,
}

impl MemberInfo {
    fn new<V: Typed>(name: &'static str, kind: MemberKind) -> Self {
        Self {
            name,
            wire_name: None,
            kind,
            type_hint: V::type_hint(),
            nullable: V::nullable(),
            getter: None,
            setter: None,
            immutable: false,
            ignored: false,
            included: false,
            backs: None,
        }
    }

    /// A readable and writable property.
    pub fn property<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: ToValue + FromValue + Typed,
    {
        let mut info = Self::new::<V>(name, MemberKind::Property);
        info.getter = Some(make_getter(get));
        info.setter = Some(make_setter(set));
        info
    }

    /// A property without write access.
    pub fn read_only_property<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: ToValue + Typed,
    {
        let mut info = Self::new::<V>(name, MemberKind::Property);
        info.getter = Some(make_getter(get));
        info
    }

    /// A property without read access.
    pub fn write_only_property<T, V>(
        name: &'static str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: FromValue + Typed,
    {
        let mut info = Self::new::<V>(name, MemberKind::Property);
        info.setter = Some(make_setter(set));
        info
    }

    /// Direct storage.
    pub fn field<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: ToValue + FromValue + Typed,
    {
        let mut info = Self::new::<V>(name, MemberKind::Field);
        info.getter = Some(make_getter(get));
        info.setter = Some(make_setter(set));
        info
    }

    /// Direct storage that is immutable after construction.
    ///
    /// It can still be written while mapping unless read-only fields are ignored.
    pub fn readonly_field<T, V>(
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        T: Reflect,
        V: ToValue + FromValue + Typed,
    {
        let mut info = Self::field(name, get, set);
        info.immutable = true;
        info
    }

    /// Overrides the wire name.
    #[inline]
    pub fn with_wire_name(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Overrides the declared type, e.g. to name the supertype of a
    /// `Box<dyn Reflect>` member.
    #[inline]
    pub fn with_type_hint(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = type_hint;
        self
    }

    /// Excludes the member from mapping in both directions.
    #[inline]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Maps a field even when fields are not included by the options.
    #[inline]
    pub fn included(mut self) -> Self {
        self.included = true;
        self
    }

    /// Marks a field as the backing storage of a read-only property.
    #[inline]
    pub fn backing(mut self, property: &'static str) -> Self {
        self.backs = Some(property);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn wire_name(&self) -> Option<&'static str> {
        self.wire_name
    }

    #[inline]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub const fn type_hint(&self) -> &TypeHint {
        &self.type_hint
    }

    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// A property without write access, or an immutable field.
    #[inline]
    pub const fn is_read_only(&self) -> bool {
        match self.kind {
            MemberKind::Property => self.setter.is_none(),
            MemberKind::Field => self.immutable,
        }
    }

    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }

    #[inline]
    pub const fn is_included(&self) -> bool {
        self.included
    }

    /// The read-only property this field backs.
    #[inline]
    pub const fn backs(&self) -> Option<&'static str> {
        self.backs
    }

    /// Reads the member from `target`.
    pub fn get(&self, target: &dyn Reflect) -> Result<Value, MapError> {
        match &self.getter {
            Some(getter) => getter(target),
            None => Err(MapError::configuration(alloc::format!(
                "member `{}` has no read access",
                self.name
            ))),
        }
    }

    /// Writes the member of `target`.
    pub fn set(&self, target: &mut dyn Reflect, value: Value) -> Result<(), MapError> {
        match &self.setter {
            Some(setter) => setter(target, value),
            None => Err(MapError::configuration(alloc::format!(
                "member `{}` has no write access",
                self.name
            ))),
        }
    }
}

impl fmt::Debug for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberInfo")
            .field("name", &self.name)
            .field("wire_name", &self.wire_name)
            .field("kind", &self.kind)
            .field("type_hint", &self.type_hint)
            .field("readable", &self.is_readable())
            .field("writable", &self.is_writable())
            .field("read_only", &self.is_read_only())
            .field("ignored", &self.ignored)
            .field("included", &self.included)
            .field("backs", &self.backs)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Wire accessors

/// A getter-like accessor emitting the value of a wire field.
#[derive(Clone)]
pub struct WireGetter {
    wire_name: &'static str,
    getter: Getter,
}

impl WireGetter {
    pub fn new<T, V>(wire_name: &'static str, get: impl Fn(&T) -> V + Send + Sync + 'static) -> Self
    where
        T: Reflect,
        V: ToValue,
    {
        Self {
            wire_name,
            getter: make_getter(get),
        }
    }

    #[inline]
    pub const fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    #[inline]
    pub fn get(&self, target: &dyn Reflect) -> Result<Value, MapError> {
        (self.getter)(target)
    }
}

/// A setter-like accessor receiving the value of a wire field.
#[derive(Clone)]
pub struct WireSetter {
    wire_name: &'static str,
    type_hint: TypeHint,
    nullable: bool,
    setter: Setter,
}

impl WireSetter {
    pub fn new<T, V>(wire_name: &'static str, set: impl Fn(&mut T, V) + Send + Sync + 'static) -> Self
    where
        T: Reflect,
        V: FromValue + Typed,
    {
        Self {
            wire_name,
            type_hint: V::type_hint(),
            nullable: V::nullable(),
            setter: make_setter(set),
        }
    }

    #[inline]
    pub const fn wire_name(&self) -> &'static str {
        self.wire_name
    }

    #[inline]
    pub const fn type_hint(&self) -> &TypeHint {
        &self.type_hint
    }

    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn set(&self, target: &mut dyn Reflect, value: Value) -> Result<(), MapError> {
        (self.setter)(target, value)
    }
}

impl fmt::Debug for WireGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireGetter").field("wire_name", &self.wire_name).finish()
    }
}

impl fmt::Debug for WireSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireSetter")
            .field("wire_name", &self.wire_name)
            .field("type_hint", &self.type_hint)
            .finish()
    }
}
