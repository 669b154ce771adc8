//! Wire-name conventions.
//!
//! A [`NamingConvention`] converts between the member names of application
//! types (title case, e.g. `ModelYear`) and the field names on the wire.
//!
//! - [`CamelCase`]: `ModelYear` <-> `modelYear`, the default.
//! - [`TitleCase`]: `ModelYear` <-> `ModelYear`.
//! - [`SnakeCase`]: `ModelYear` <-> `model_year`.

use alloc::string::String;

// -----------------------------------------------------------------------------
// NamingConvention

/// Converts between member names and wire names.
///
/// Implementations must be pure.
pub trait NamingConvention: Send + Sync {
    /// Maps a wire name to the member name it refers to.
    fn to_member_name(&self, wire_name: &str) -> String;

    /// Maps a member name to its wire name.
    fn from_member_name(&self, member_name: &str) -> String;
}

fn map_first_char(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    let mut out = String::with_capacity(s.len());
    if let Some(first) = chars.next() {
        if upper {
            out.extend(first.to_uppercase());
        } else {
            out.extend(first.to_lowercase());
        }
    }
    out.push_str(chars.as_str());
    out
}

// -----------------------------------------------------------------------------
// Conventions

/// `ModelYear` <-> `modelYear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CamelCase;

impl NamingConvention for CamelCase {
    #[inline]
    fn to_member_name(&self, wire_name: &str) -> String {
        map_first_char(wire_name, true)
    }

    #[inline]
    fn from_member_name(&self, member_name: &str) -> String {
        map_first_char(member_name, false)
    }
}

/// `ModelYear` <-> `ModelYear`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleCase;

impl NamingConvention for TitleCase {
    #[inline]
    fn to_member_name(&self, wire_name: &str) -> String {
        map_first_char(wire_name, true)
    }

    #[inline]
    fn from_member_name(&self, member_name: &str) -> String {
        map_first_char(member_name, true)
    }
}

/// `ModelYear` <-> `model_year`.
///
/// A leading underscore survives both directions once, so `_Secret`
/// maps to `__secret` and back. A lone `_` stays `_`.
///
/// # Examples
///
/// ```
/// use iom_mapper::naming::{NamingConvention, SnakeCase};
///
/// assert_eq!(SnakeCase.from_member_name("ModelYear"), "model_year");
/// assert_eq!(SnakeCase.to_member_name("model_year"), "ModelYear");
/// assert_eq!(SnakeCase.to_member_name("__foo_bar"), "_FooBar");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnakeCase;

impl NamingConvention for SnakeCase {
    fn to_member_name(&self, wire_name: &str) -> String {
        if wire_name == "_" {
            return String::from("_");
        }

        let mut out = String::with_capacity(wire_name.len());
        let rest = match wire_name.strip_prefix('_') {
            Some(rest) if !rest.is_empty() => {
                out.push('_');
                rest
            }
            _ => wire_name,
        };

        let mut upper = true;
        for c in rest.chars() {
            if c == '_' {
                upper = true;
            } else if upper {
                out.extend(c.to_uppercase());
                upper = false;
            } else {
                out.push(c);
            }
        }
        out
    }

    fn from_member_name(&self, member_name: &str) -> String {
        let mut out = String::with_capacity(member_name.len() + 4);
        for (index, c) in member_name.chars().enumerate() {
            if c.is_uppercase() {
                if index > 0 {
                    out.push('_');
                }
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case() {
        assert_eq!(CamelCase.from_member_name("ModelYear"), "modelYear");
        assert_eq!(CamelCase.to_member_name("modelYear"), "ModelYear");
        assert_eq!(CamelCase.from_member_name(""), "");
        assert_eq!(CamelCase.to_member_name("x"), "X");
    }

    #[test]
    fn title_case() {
        assert_eq!(TitleCase.from_member_name("modelYear"), "ModelYear");
        assert_eq!(TitleCase.to_member_name("modelYear"), "ModelYear");
    }

    #[test]
    fn snake_case() {
        let snake = SnakeCase;
        assert_eq!(snake.from_member_name("ModelYear"), "model_year");
        assert_eq!(snake.from_member_name("_Secret"), "__secret");
        assert_eq!(snake.to_member_name("model_year"), "ModelYear");
        assert_eq!(snake.to_member_name("__foo_bar"), "_FooBar");
        assert_eq!(snake.to_member_name("_"), "_");
        assert_eq!(snake.to_member_name(""), "");
        assert_eq!(snake.from_member_name(""), "");
    }

    #[test]
    fn title_names_survive_both_directions() {
        let conventions: [&dyn NamingConvention; 3] = [&CamelCase, &TitleCase, &SnakeCase];
        for convention in conventions {
            for name in ["Brand", "ModelYear", "A", "_Secret", "VinNumber"] {
                let wire = convention.from_member_name(name);
                assert_eq!(convention.to_member_name(&wire), name, "{wire}");
            }
        }
    }
}
