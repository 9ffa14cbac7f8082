//! Socket identifiers: a pattern named either by code or by symbol.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ZsockError};
use crate::pattern::Pattern;

/// A not-yet-resolved pattern identifier.
///
/// Typed callers build one with `From` (`0.into()`, `"PUB".into()`).
/// Untyped text goes through [`Identifier::from_token`], which is the
/// only place an identifier of the wrong shape is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Numeric pattern code
    Code(i64),
    /// Symbolic pattern name
    Name(String),
}

impl Identifier {
    /// Classify a raw token.
    ///
    /// - decimal integer text (optionally signed) becomes [`Identifier::Code`]
    /// - a word of ASCII letters, digits and `_` starting with a letter,
    ///   optionally written with a leading `:` (`:PUB`), becomes
    ///   [`Identifier::Name`]
    /// - anything else fails with [`ZsockError::InvalidIdentifierType`]
    ///
    /// Shape is checked here, membership is checked by [`Identifier::resolve`].
    pub fn from_token(token: &str) -> Result<Self> {
        let token = token.trim();
        if let Ok(code) = token.parse::<i64>() {
            return Ok(Self::Code(code));
        }

        let word = token.strip_prefix(':').unwrap_or(token);
        let mut chars = word.chars();
        let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if well_formed {
            Ok(Self::Name(word.to_string()))
        } else {
            Err(ZsockError::InvalidIdentifierType(token.to_string()))
        }
    }

    /// Resolve against the pattern table.
    pub fn resolve(&self) -> Result<Pattern> {
        match self {
            Self::Code(code) => Pattern::from_code(*code),
            Self::Name(name) => Pattern::from_name(name),
        }
    }
}

impl From<i64> for Identifier {
    fn from(code: i64) -> Self {
        Self::Code(code)
    }
}

impl From<i32> for Identifier {
    fn from(code: i32) -> Self {
        Self::Code(i64::from(code))
    }
}

impl From<u8> for Identifier {
    fn from(code: u8) -> Self {
        Self::Code(i64::from(code))
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Pattern> for Identifier {
    fn from(pattern: Pattern) -> Self {
        Self::Code(i64::from(pattern.code()))
    }
}

impl FromStr for Identifier {
    type Err = ZsockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => write!(f, ":{name}"),
        }
    }
}
