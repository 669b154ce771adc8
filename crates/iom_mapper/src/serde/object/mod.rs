use alloc::string::String;

use crate::info::{MemberInfo, ObjectInfo, WireSetter};
use crate::serde::TypeDispatcher;
use crate::{MapError, MapperFlags, SerializationOptions};

mod de;
mod ser;

// -----------------------------------------------------------------------------
// ObjectMapper

/// Converts one application object to or from an Ion struct.
///
/// # Wire names
///
/// A property is written under its wire-name override, or else the name the
/// [`NamingConvention`](crate::naming::NamingConvention) derives from the
/// member name. A field uses its override, or else the wire name of the
/// property it backs, or else its own name.
///
/// # Field candidates
///
/// Fields are mapped when fields are included by the options, when they are
/// explicitly included, or when they back a read-only property while
/// read-only properties are mapped. Ignored members are never mapped.
///
/// See [`serialize`](Self::serialize) and [`deserialize`](Self::deserialize)
/// for the per-direction rules.
pub struct ObjectMapper<'a> {
    dispatcher: &'a TypeDispatcher<'a>,
    info: &'a ObjectInfo,
}

/// What a wire field is written to.
enum Binding<'a> {
    Setter(&'a WireSetter),
    Member(&'a MemberInfo),
    /// Known but not writable under the current options.
    Skip,
}

impl<'a> ObjectMapper<'a> {
    #[inline]
    pub fn new(dispatcher: &'a TypeDispatcher<'a>, info: &'a ObjectInfo) -> Self {
        Self { dispatcher, info }
    }

    #[inline]
    fn options(&self) -> &'a SerializationOptions {
        self.dispatcher.options()
    }

    #[inline]
    fn has(&self, flags: MapperFlags) -> bool {
        self.options().has(flags)
    }

    /// Fails if `info` declares more than one constructor, or a constructor
    /// parameter without a wire name.
    pub fn check_constructors(info: &ObjectInfo) -> Result<(), MapError> {
        match info.constructors() {
            [] => Ok(()),
            [constructor] => match constructor.unbound_param() {
                Some(param) => Err(MapError::configuration(alloc::format!(
                    "parameter `{}` of the constructor of `{}` has no wire name",
                    param.name(),
                    info.ty()
                ))),
                None => Ok(()),
            },
            _ => Err(MapError::configuration(alloc::format!(
                "type `{}` declares {} constructors, at most one is allowed",
                info.ty(),
                info.constructors().len()
            ))),
        }
    }

    fn property_wire_name(&self, property: &MemberInfo) -> String {
        match property.wire_name() {
            Some(name) => String::from(name),
            None => self.options().naming_convention().from_member_name(property.name()),
        }
    }

    fn field_wire_name(&self, info: &ObjectInfo, field: &MemberInfo) -> String {
        if let Some(name) = field.wire_name() {
            return String::from(name);
        }
        match field.backs().and_then(|p| info.member(p)) {
            Some(property) => self.property_wire_name(property),
            None => String::from(field.name()),
        }
    }

    fn backs_read_only_property(info: &ObjectInfo, field: &MemberInfo) -> bool {
        field
            .backs()
            .and_then(|p| info.member(p))
            .is_some_and(|p| !p.is_ignored() && p.is_read_only())
    }

    fn is_field_candidate(&self, info: &ObjectInfo, field: &MemberInfo) -> bool {
        !field.is_ignored()
            && (self.has(MapperFlags::INCLUDE_FIELDS)
                || field.is_included()
                || (!self.has(MapperFlags::IGNORE_READ_ONLY_PROPERTIES)
                    && Self::backs_read_only_property(info, field)))
    }

    fn find_property(&self, info: &'a ObjectInfo, wire_name: &str) -> Option<&'a MemberInfo> {
        let properties = || info.properties().filter(|p| !p.is_ignored());
        if let Some(p) = properties().find(|p| p.wire_name() == Some(wire_name)) {
            return Some(p);
        }

        let unnamed = || properties().filter(|p| p.wire_name().is_none());
        if self.has(MapperFlags::PROPERTY_NAME_CASE_INSENSITIVE) {
            let lower = wire_name.to_lowercase();
            if let Some(p) = unnamed().find(|p| p.name().to_lowercase() == lower) {
                return Some(p);
            }
        }

        let naming = self.options().naming_convention();
        let member_name = naming.to_member_name(wire_name);
        if let Some(p) = unnamed().find(|p| p.name() == member_name) {
            return Some(p);
        }
        unnamed().find(|p| naming.from_member_name(p.name()) == wire_name)
    }

    fn find_field(&self, info: &'a ObjectInfo, wire_name: &str) -> Option<&'a MemberInfo> {
        info.fields().find(|f| {
            self.is_field_candidate(info, f)
                && match f.wire_name() {
                    Some(name) => name == wire_name,
                    None => f.name() == wire_name,
                }
        })
    }

    /// Resolves a wire field: setter, then property, then field.
    fn resolve(&self, info: &'a ObjectInfo, wire_name: &str) -> Option<Binding<'a>> {
        if let Some(setter) = info.setter(wire_name) {
            return Some(Binding::Setter(setter));
        }

        if let Some(property) = self.find_property(info, wire_name) {
            if !property.is_read_only() {
                return Some(Binding::Member(property));
            }
            if self.has(MapperFlags::IGNORE_READ_ONLY_PROPERTIES) {
                return Some(Binding::Skip);
            }
            let backing = info
                .fields()
                .find(|f| f.backs() == Some(property.name()) && self.is_field_candidate(info, f));
            return Some(backing.map_or(Binding::Skip, Binding::Member));
        }

        self.find_field(info, wire_name).map(Binding::Member)
    }
}
