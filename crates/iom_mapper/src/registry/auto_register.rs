use crate::registry::{GetObjectInfo, TypeRegistry};

/// A type submitted for [`TypeRegistry::auto_register`].
///
/// Created by the [`auto_register!`](crate::auto_register) macro.
pub struct AutoRegistration {
    register: fn(&mut TypeRegistry),
}

impl AutoRegistration {
    #[inline]
    pub const fn of<T: GetObjectInfo>() -> Self {
        Self {
            register: TypeRegistry::register::<T>,
        }
    }
}

inventory::collect!(AutoRegistration);

pub(super) fn register_types(registry: &mut TypeRegistry) {
    for registration in inventory::iter::<AutoRegistration> {
        (registration.register)(registry);
    }
}
