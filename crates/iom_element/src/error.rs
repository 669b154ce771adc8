use alloc::string::String;

use thiserror::Error;

use crate::IonType;

// -----------------------------------------------------------------------------
// Error

/// Errors raised by cursors and codecs.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ElementError {
    #[error("invalid cursor state: {0}")]
    InvalidState(String),

    #[error("expected {expected} but the current value is {found}")]
    TypeMismatch {
        expected: &'static str,
        found: IonTypeOrEnd,
    },

    #[error("failed to encode element stream: {0}")]
    Encode(String),

    #[error("failed to decode element stream: {0}")]
    Decode(String),
}

impl ElementError {
    #[cold]
    #[inline(never)]
    pub(crate) fn mismatch(expected: &'static str, found: Option<IonType>) -> Self {
        Self::TypeMismatch {
            expected,
            found: IonTypeOrEnd(found),
        }
    }
}

/// The kind found by a failed typed getter; `None` when no value is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IonTypeOrEnd(pub Option<IonType>);

impl core::fmt::Display for IonTypeOrEnd {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(ty) => write!(f, "{ty}"),
            None => f.write_str("<no current value>"),
        }
    }
}
