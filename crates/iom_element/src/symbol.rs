use alloc::string::String;
use core::fmt;

use serde::{Deserialize, Serialize};

/// An Ion symbol: interned text, a symbol id, or both.
///
/// A token without text has "unknown text" and is printed as `$<sid>`.
///
/// # Examples
///
/// ```
/// use iom_element::SymbolToken;
///
/// let token = SymbolToken::new("my symbol");
/// assert_eq!(token.text(), Some("my symbol"));
/// assert_eq!(token.to_string(), "my symbol");
///
/// assert_eq!(SymbolToken::with_sid(10).to_string(), "$10");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolToken {
    text: Option<String>,
    sid: Option<usize>,
}

impl SymbolToken {
    /// Creates a token with known text and no symbol id.
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            sid: None,
        }
    }

    /// Creates a token with unknown text.
    #[inline]
    pub const fn with_sid(sid: usize) -> Self {
        Self {
            text: None,
            sid: Some(sid),
        }
    }

    /// Creates a token from both parts.
    #[inline]
    pub const fn from_parts(text: Option<String>, sid: Option<usize>) -> Self {
        Self { text, sid }
    }

    /// Returns the text, if known.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the symbol id, if any.
    #[inline]
    pub const fn sid(&self) -> Option<usize> {
        self.sid
    }
}

impl fmt::Display for SymbolToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.text, self.sid) {
            (Some(text), _) => f.write_str(text),
            (None, Some(sid)) => write!(f, "${sid}"),
            (None, None) => f.write_str("$0"),
        }
    }
}

impl From<&str> for SymbolToken {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SymbolToken {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
