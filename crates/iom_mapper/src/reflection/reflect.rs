use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

// -----------------------------------------------------------------------------
// Reflect

/// A type-erased application object.
///
/// Objects are stored as `Box<dyn Reflect>` inside [`Value::Object`](crate::Value::Object)
/// and described by an [`ObjectInfo`](crate::info::ObjectInfo) in the
/// [`TypeRegistry`](crate::TypeRegistry).
///
/// Implement it with [`impl_reflect!`](crate::impl_reflect) rather than by hand.
pub trait Reflect: Any + Send + Sync {
    /// The full type path, as given by [`core::any::type_name`].
    fn type_path(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Clones the object into a new box.
    fn clone_reflect(&self) -> Box<dyn Reflect>;

    /// Compares with another object.
    ///
    /// Returns `None` if the comparison is not supported.
    fn reflect_partial_eq(&self, _other: &dyn Reflect) -> Option<bool> {
        None
    }

    /// Formats the object for debugging.
    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_path())
    }
}

impl dyn Reflect {
    /// The [`TypeId`] of the underlying type.
    #[inline]
    pub fn reflect_type_id(&self) -> TypeId {
        <dyn Any>::type_id(self)
    }

    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.reflect_type_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            let any: Box<dyn Any> = self;
            match any.downcast::<T>() {
                Ok(value) => Ok(value),
                Err(_) => unreachable!("type is already checked"),
            }
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

impl PartialEq for dyn Reflect {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.reflect_partial_eq(other).unwrap_or(false)
    }
}

impl Clone for Box<dyn Reflect> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_reflect()
    }
}
