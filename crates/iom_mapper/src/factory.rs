//! Instantiation of application objects during deserialization.

use alloc::boxed::Box;

use iom_element::IonReader;

use crate::info::{ObjectType, TypeHint};
use crate::registry::TypeRegistry;
use crate::{MapError, Reflect, SerializationOptions};

/// Creates the blank instance a struct is read into.
///
/// The reader is positioned on the struct, before stepping in, so its
/// annotations are available.
pub trait ObjectFactory: Send + Sync {
    fn create(
        &self,
        options: &SerializationOptions,
        registry: &TypeRegistry,
        reader: &dyn IonReader,
        target: &ObjectType,
    ) -> Result<Box<dyn Reflect>, MapError>;
}

/// Instantiates the type named by the first annotation, or else `target`,
/// through its parameterless construction path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultObjectFactory;

impl ObjectFactory for DefaultObjectFactory {
    fn create(
        &self,
        options: &SerializationOptions,
        registry: &TypeRegistry,
        reader: &dyn IonReader,
        target: &ObjectType,
    ) -> Result<Box<dyn Reflect>, MapError> {
        let resolved = match reader.annotations().first() {
            Some(tag) => registry.resolve_annotation(options, tag, &TypeHint::Object(*target))?,
            None => None,
        };

        let info = match resolved {
            Some(info) => info,
            None => registry.get_info(target.id()).ok_or_else(|| {
                MapError::configuration(alloc::format!("type `{target}` is not registered"))
            })?,
        };

        info.construct_default().ok_or_else(|| {
            MapError::configuration(alloc::format!(
                "type `{}` has no parameterless construction path",
                info.ty()
            ))
        })
    }
}
