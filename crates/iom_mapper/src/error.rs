use alloc::string::{String, ToString};
use core::fmt::Display;

use iom_element::ElementError;
use thiserror::Error;

use crate::serde::stack_message;

// -----------------------------------------------------------------------------
// MapError

/// Errors raised while mapping values.
///
/// With the `debug` feature in debug builds, messages built by this crate end
/// with the stack of types being mapped when the error occurred.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapError {
    /// No dispatch case exists for a runtime type.
    #[error("do not know how to serialize type `{0}`")]
    UnsupportedType(String),

    /// The incoming data cannot be mapped to the requested shape.
    #[error("unsupported data: {0}")]
    UnsupportedData(String),

    /// A descriptor or option is unusable for the requested operation.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A mapped value cannot be converted to the declared member type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A type annotation did not resolve under strict resolution.
    #[error("cannot resolve type annotation `{0}`")]
    TypeResolution(String),

    /// Nesting went deeper than the configured maximum depth.
    #[error("maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    #[error(transparent)]
    Element(#[from] ElementError),
}

impl MapError {
    #[cold]
    pub fn unsupported_type(type_path: impl Display) -> Self {
        Self::UnsupportedType(stack_message(type_path))
    }

    #[cold]
    pub fn unsupported_data(msg: impl Display) -> Self {
        Self::UnsupportedData(stack_message(msg))
    }

    #[cold]
    pub fn configuration(msg: impl Display) -> Self {
        Self::Configuration(stack_message(msg))
    }

    #[cold]
    pub fn type_resolution(tag: impl Display) -> Self {
        Self::TypeResolution(stack_message(tag))
    }

    #[cold]
    pub fn mismatch(expected: impl Display, found: impl Display) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: stack_message(found),
        }
    }

    /// Returns `true` for errors caused by descriptors or options rather than data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::TypeMismatch { .. })
    }
}
