use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use crate::factory::ObjectFactory;
use crate::info::{
    AnnotateType, ConstructorInfo, DoNotAnnotateType, MemberInfo, MemberKind, ObjectType, TypeHint,
    WireGetter, WireSetter,
};
use crate::serde::CustomSerializer;
use crate::{FromValue, Reflect, ToValue, Typed};

type DefaultFn = Arc<dyn Fn() -> Box<dyn Reflect> + Send + Sync>;

// -----------------------------------------------------------------------------
// ObjectInfo

/// The mapping descriptor of one application type.
///
/// Built once with [`ObjectInfo::builder`] and cached in the
/// [`TypeRegistry`](crate::TypeRegistry).
///
/// Members keep their registration order, which is the order they are written in.
#[derive(Clone)]
pub struct ObjectInfo {
    ty: ObjectType,
    members: Vec<MemberInfo>,
    getters: Vec<WireGetter>,
    setters: Vec<WireSetter>,
    constructors: Vec<ConstructorInfo>,
    default_fn: Option<DefaultFn>,
    parent: Option<ObjectType>,
    annotate_type: Option<AnnotateType>,
    do_not_annotate_type: Option<DoNotAnnotateType>,
    serializer: Option<Arc<dyn CustomSerializer>>,
    object_factory: Option<Arc<dyn ObjectFactory>>,
}

impl ObjectInfo {
    /// Starts describing `T`.
    pub fn builder<T: Reflect>() -> ObjectBuilder<T> {
        ObjectBuilder {
            info: ObjectInfo {
                ty: ObjectType::of::<T>(),
                members: Vec::new(),
                getters: Vec::new(),
                setters: Vec::new(),
                constructors: Vec::new(),
                default_fn: None,
                parent: None,
                annotate_type: None,
                do_not_annotate_type: None,
                serializer: None,
                object_factory: None,
            },
            marker: PhantomData,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &ObjectType {
        &self.ty
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    pub fn properties(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|m| m.kind() == MemberKind::Property)
    }

    pub fn fields(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|m| m.kind() == MemberKind::Field)
    }

    /// Finds a member by its own name.
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.iter().find(|m| m.name() == name)
    }

    #[inline]
    pub fn getters(&self) -> &[WireGetter] {
        &self.getters
    }

    #[inline]
    pub fn setters(&self) -> &[WireSetter] {
        &self.setters
    }

    /// Finds the setter-like accessor bound to `wire_name`.
    pub fn setter(&self, wire_name: &str) -> Option<&WireSetter> {
        self.setters.iter().find(|s| s.wire_name() == wire_name)
    }

    /// Designated constructors. More than one makes deserialization fail.
    #[inline]
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    /// The supertype declared with [`ObjectBuilder::extends`].
    #[inline]
    pub const fn parent(&self) -> Option<&ObjectType> {
        self.parent.as_ref()
    }

    #[inline]
    pub const fn annotate_type(&self) -> Option<&AnnotateType> {
        self.annotate_type.as_ref()
    }

    #[inline]
    pub const fn do_not_annotate_type(&self) -> Option<&DoNotAnnotateType> {
        self.do_not_annotate_type.as_ref()
    }

    #[inline]
    pub fn serializer(&self) -> Option<&Arc<dyn CustomSerializer>> {
        self.serializer.as_ref()
    }

    #[inline]
    pub fn object_factory(&self) -> Option<&Arc<dyn ObjectFactory>> {
        self.object_factory.as_ref()
    }

    #[inline]
    pub fn is_default_constructible(&self) -> bool {
        self.default_fn.is_some()
    }

    /// Creates a blank instance through the parameterless construction path.
    pub fn construct_default(&self) -> Option<Box<dyn Reflect>> {
        self.default_fn.as_ref().map(|f| f())
    }
}

impl fmt::Debug for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectInfo")
            .field("ty", &self.ty)
            .field("members", &self.members)
            .field("getters", &self.getters)
            .field("setters", &self.setters)
            .field("constructors", &self.constructors)
            .field("default_constructible", &self.is_default_constructible())
            .field("parent", &self.parent)
            .field("annotate_type", &self.annotate_type)
            .field("do_not_annotate_type", &self.do_not_annotate_type)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ObjectBuilder

/// Typed builder of an [`ObjectInfo`].
///
/// The member modifiers ([`wire_name`](Self::wire_name), [`ignored`](Self::ignored),
/// [`included`](Self::included), [`backing`](Self::backing),
/// [`type_hint`](Self::type_hint)) apply to the most recently added member.
///
/// # Examples
///
/// ```
/// use iom_mapper::impl_reflect;
/// use iom_mapper::info::{AnnotateType, ObjectInfo};
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Vehicle;
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Truck {
///     capacity: i32,
///     vin: String,
/// }
///
/// impl_reflect!(Vehicle, Truck);
///
/// let info = ObjectInfo::builder::<Truck>()
///     .default_constructible()
///     .extends::<Vehicle>()
///     .annotate(AnnotateType::new().with_prefix("fleet"))
///     .property("Capacity", |t| t.capacity, |t, v| t.capacity = v)
///     .wire_name("load")
///     .read_only_property("Vin", |t| t.vin.clone())
///     .field("vin", |t| t.vin.clone(), |t, v| t.vin = v)
///     .backing("Vin")
///     .build();
///
/// assert_eq!(info.ty().name(), "Truck");
/// assert_eq!(info.properties().count(), 2);
/// assert_eq!(info.member("Capacity").and_then(|m| m.wire_name()), Some("load"));
/// assert_eq!(info.member("vin").and_then(|m| m.backs()), Some("Vin"));
/// ```
pub struct ObjectBuilder<T> {
    info: ObjectInfo,
    marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> ObjectBuilder<T> {
    /// Adds a member.
    pub fn member(mut self, member: MemberInfo) -> Self {
        self.info.members.push(member);
        self
    }

    /// Adds a readable and writable property.
    pub fn property<V>(
        self,
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: ToValue + FromValue + Typed,
    {
        self.member(MemberInfo::property(name, get, set))
    }

    /// Adds a property without write access.
    pub fn read_only_property<V>(
        self,
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self
    where
        V: ToValue + Typed,
    {
        self.member(MemberInfo::read_only_property(name, get))
    }

    /// Adds a property without read access.
    pub fn write_only_property<V>(
        self,
        name: &'static str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: FromValue + Typed,
    {
        self.member(MemberInfo::write_only_property(name, set))
    }

    /// Adds direct storage.
    pub fn field<V>(
        self,
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: ToValue + FromValue + Typed,
    {
        self.member(MemberInfo::field(name, get, set))
    }

    /// Adds direct storage that is immutable after construction.
    pub fn readonly_field<V>(
        self,
        name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self
    where
        V: ToValue + FromValue + Typed,
    {
        self.member(MemberInfo::readonly_field(name, get, set))
    }

    fn map_last(mut self, f: impl FnOnce(MemberInfo) -> MemberInfo) -> Self {
        if let Some(last) = self.info.members.pop() {
            self.info.members.push(f(last));
        }
        self
    }

    /// Overrides the wire name of the last member.
    #[inline]
    pub fn wire_name(self, wire_name: &'static str) -> Self {
        self.map_last(|m| m.with_wire_name(wire_name))
    }

    /// Excludes the last member from mapping.
    #[inline]
    pub fn ignored(self) -> Self {
        self.map_last(MemberInfo::ignored)
    }

    /// Maps the last member, a field, regardless of the options.
    #[inline]
    pub fn included(self) -> Self {
        self.map_last(MemberInfo::included)
    }

    /// Marks the last member, a field, as backing storage of `property`.
    #[inline]
    pub fn backing(self, property: &'static str) -> Self {
        self.map_last(|m| m.backing(property))
    }

    /// Overrides the declared type of the last member.
    #[inline]
    pub fn type_hint(self, type_hint: TypeHint) -> Self {
        self.map_last(|m| m.with_type_hint(type_hint))
    }

    /// Adds a getter-like accessor for `wire_name`.
    pub fn getter<V: ToValue>(
        mut self,
        wire_name: &'static str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self {
        self.info.getters.push(WireGetter::new(wire_name, get));
        self
    }

    /// Adds a setter-like accessor for `wire_name`.
    pub fn setter<V: FromValue + Typed>(
        mut self,
        wire_name: &'static str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        self.info.setters.push(WireSetter::new(wire_name, set));
        self
    }

    /// Adds a designated constructor.
    pub fn constructor(mut self, constructor: ConstructorInfo) -> Self {
        self.info.constructors.push(constructor);
        self
    }

    /// Uses `T::default()` as the parameterless construction path.
    pub fn default_constructible(self) -> Self
    where
        T: Default,
    {
        self.factory(T::default)
    }

    /// Sets the parameterless construction path.
    pub fn factory(mut self, create: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.info.default_fn = Some(Arc::new(move || Box::new(create()) as Box<dyn Reflect>));
        self
    }

    /// Declares `P` as the supertype, for annotation inheritance and
    /// polymorphic resolution.
    pub fn extends<P: Any>(mut self) -> Self {
        self.info.parent = Some(ObjectType::of::<P>());
        self
    }

    pub fn annotate(mut self, marker: AnnotateType) -> Self {
        self.info.annotate_type = Some(marker);
        self
    }

    pub fn do_not_annotate(mut self, marker: DoNotAnnotateType) -> Self {
        self.info.do_not_annotate_type = Some(marker);
        self
    }

    /// Maps the type with a custom serializer in both directions.
    pub fn with_serializer(mut self, serializer: impl CustomSerializer + 'static) -> Self {
        self.info.serializer = Some(Arc::new(serializer));
        self
    }

    /// Instantiates the type with a custom factory instead of the configured one.
    pub fn with_object_factory(mut self, factory: impl ObjectFactory + 'static) -> Self {
        self.info.object_factory = Some(Arc::new(factory));
        self
    }

    #[inline]
    pub fn build(self) -> ObjectInfo {
        self.info
    }
}
