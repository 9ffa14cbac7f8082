//! Endpoint directive parsing.
//!
//! An endpoint string is a comma-separated list of tokens. The first
//! character of a token picks what to do with its address:
//!
//! ```text
//! endpoint := token (',' token)*
//! token    := ['@' | '>'] address
//! ```
//!
//! `@` binds, `>` connects, and a bare address uses the pattern's default
//! mode (see [`Pattern::default_mode`](crate::pattern::Pattern::default_mode)).
//! Addresses are opaque here; the transport engine decides what they mean.

use std::fmt;

use smallvec::SmallVec;

use crate::error::{Result, ZsockError};

/// Parsed directives, in the order they must be applied.
pub type Directives = SmallVec<[EndpointDirective; 2]>;

/// Whether a directive binds or connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveMode {
    /// Listen on the address
    Bind,
    /// Dial out to the address
    Connect,
}

impl DirectiveMode {
    /// Token prefix for this mode.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Bind => '@',
            Self::Connect => '>',
        }
    }
}

/// One bind-or-connect instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointDirective {
    /// Bind or connect
    pub mode: DirectiveMode,
    /// Transport-specific address, e.g. `tcp://*:5555` or `inproc://jobs`
    pub address: String,
}

impl EndpointDirective {
    /// Create a bind directive
    pub fn bind(address: impl Into<String>) -> Self {
        Self {
            mode: DirectiveMode::Bind,
            address: address.into(),
        }
    }

    /// Create a connect directive
    pub fn connect(address: impl Into<String>) -> Self {
        Self {
            mode: DirectiveMode::Connect,
            address: address.into(),
        }
    }

    /// Parse a single token, falling back to `default_mode` when unprefixed.
    pub fn parse_token(token: &str, default_mode: DirectiveMode) -> Result<Self> {
        let token = token.trim();
        let (mode, address) = if let Some(rest) = token.strip_prefix('@') {
            (DirectiveMode::Bind, rest)
        } else if let Some(rest) = token.strip_prefix('>') {
            (DirectiveMode::Connect, rest)
        } else {
            (default_mode, token)
        };

        if address.is_empty() {
            return Err(ZsockError::malformed_endpoint(token));
        }

        Ok(Self {
            mode,
            address: address.to_string(),
        })
    }
}

impl fmt::Display for EndpointDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mode.prefix(), self.address)
    }
}

/// Parse an endpoint string into ordered directives.
///
/// `None`, `""` and whitespace-only input produce no directives. Any empty
/// token (`"@"`, `">"`, `"a,,b"`, a trailing comma) fails the whole parse
/// with [`ZsockError::MalformedEndpoint`].
///
/// # Examples
///
/// ```
/// use zsock_core::directive::{parse_endpoints, DirectiveMode, EndpointDirective};
///
/// let directives =
///     parse_endpoints(Some("@tcp://*:5555,>tcp://10.0.0.1:5555"), DirectiveMode::Connect).unwrap();
/// assert_eq!(
///     directives.as_slice(),
///     [
///         EndpointDirective::bind("tcp://*:5555"),
///         EndpointDirective::connect("tcp://10.0.0.1:5555"),
///     ]
/// );
/// ```
pub fn parse_endpoints(endpoints: Option<&str>, default_mode: DirectiveMode) -> Result<Directives> {
    let Some(endpoints) = endpoints else {
        return Ok(Directives::new());
    };
    if endpoints.trim().is_empty() {
        return Ok(Directives::new());
    }

    endpoints
        .split(',')
        .map(|token| EndpointDirective::parse_token(token, default_mode))
        .collect()
}

/// Render directives back into endpoint-string form.
pub fn format_directives(directives: &[EndpointDirective]) -> String {
    directives
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_then_connect() {
        let directives = parse_endpoints(
            Some("@tcp://*:5555,>tcp://10.0.0.1:5555"),
            DirectiveMode::Bind,
        )
        .unwrap();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0], EndpointDirective::bind("tcp://*:5555"));
        assert_eq!(directives[1], EndpointDirective::connect("tcp://10.0.0.1:5555"));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_endpoints(None, DirectiveMode::Bind).unwrap().is_empty());
        assert!(parse_endpoints(Some(""), DirectiveMode::Bind).unwrap().is_empty());
        assert!(parse_endpoints(Some("   "), DirectiveMode::Connect).unwrap().is_empty());
    }

    #[test]
    fn test_unprefixed_tokens_use_default_mode() {
        let directives =
            parse_endpoints(Some("inproc://a,@inproc://b"), DirectiveMode::Connect).unwrap();
        assert_eq!(directives[0], EndpointDirective::connect("inproc://a"));
        assert_eq!(directives[1], EndpointDirective::bind("inproc://b"));

        let directives = parse_endpoints(Some("ipc:///tmp/x"), DirectiveMode::Bind).unwrap();
        assert_eq!(directives[0], EndpointDirective::bind("ipc:///tmp/x"));
    }

    #[test]
    fn test_malformed_tokens() {
        for input in ["@", ">", "@tcp://*:1,>", "a,,b", "inproc://a,", " @ "] {
            assert!(
                matches!(
                    parse_endpoints(Some(input), DirectiveMode::Bind),
                    Err(ZsockError::MalformedEndpoint(_))
                ),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_tokens_are_trimmed() {
        let directives =
            parse_endpoints(Some(" @inproc://a , >inproc://b "), DirectiveMode::Bind).unwrap();
        assert_eq!(directives[0].address, "inproc://a");
        assert_eq!(directives[1].address, "inproc://b");
    }

    #[test]
    fn test_format_directives() {
        let directives = [
            EndpointDirective::bind("tcp://*:5555"),
            EndpointDirective::connect("inproc://x"),
        ];
        let rendered = format_directives(&directives);
        assert_eq!(rendered, "@tcp://*:5555,>inproc://x");
        let reparsed = parse_endpoints(Some(&rendered), DirectiveMode::Bind).unwrap();
        assert_eq!(reparsed.as_slice(), directives);
    }
}
