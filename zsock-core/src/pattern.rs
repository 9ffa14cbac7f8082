//! Pattern identifier table.
//!
//! The fourteen ZeroMQ messaging patterns and the fixed bijection between
//! their numeric codes and symbolic names. The table is a compile-time
//! constant; lookups never lock and never allocate.
//!
//! Codes are a stable public surface: a new pattern gets the next unused
//! code, existing codes are never renumbered.

use std::fmt;
use std::str::FromStr;

use crate::directive::DirectiveMode;
use crate::error::{Result, ZsockError};

/// Numeric pattern code (0..=13).
pub type PatternCode = u8;

/// ZeroMQ socket patterns.
///
/// Corresponds to the `ZMQ_*` socket type constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Pattern {
    /// PAIR socket for exclusive one-to-one links
    Pair = 0,

    /// PUB socket for fan-out publishing
    Pub = 1,

    /// SUB socket for prefix-filtered subscribing
    Sub = 2,

    /// REQ socket for lockstep request-reply clients
    Req = 3,

    /// REP socket for lockstep request-reply servers
    Rep = 4,

    /// DEALER socket for asynchronous, multiplexed request-reply
    Dealer = 5,

    /// ROUTER socket that prefixes messages with a peer-routing frame
    Router = 6,

    /// PULL socket for the receiving end of a pipeline
    Pull = 7,

    /// PUSH socket for round-robin fan-out to pullers
    Push = 8,

    /// XPUB socket that sees subscriptions as ordinary messages
    XPub = 9,

    /// XSUB socket that sends subscriptions as ordinary messages
    XSub = 10,

    /// STREAM socket for raw, non-ZMTP peers
    Stream = 11,

    /// SERVER socket addressing peers by routing id
    Server = 12,

    /// CLIENT socket for the client-server pattern
    Client = 13,
}

/// The code/name table, indexed by code.
const TABLE: [(Pattern, &str); 14] = [
    (Pattern::Pair, "PAIR"),
    (Pattern::Pub, "PUB"),
    (Pattern::Sub, "SUB"),
    (Pattern::Req, "REQ"),
    (Pattern::Rep, "REP"),
    (Pattern::Dealer, "DEALER"),
    (Pattern::Router, "ROUTER"),
    (Pattern::Pull, "PULL"),
    (Pattern::Push, "PUSH"),
    (Pattern::XPub, "XPUB"),
    (Pattern::XSub, "XSUB"),
    (Pattern::Stream, "STREAM"),
    (Pattern::Server, "SERVER"),
    (Pattern::Client, "CLIENT"),
];

impl Pattern {
    /// Every pattern, in code order.
    pub const ALL: [Self; 14] = [
        Self::Pair,
        Self::Pub,
        Self::Sub,
        Self::Req,
        Self::Rep,
        Self::Dealer,
        Self::Router,
        Self::Pull,
        Self::Push,
        Self::XPub,
        Self::XSub,
        Self::Stream,
        Self::Server,
        Self::Client,
    ];

    /// Numeric code of this pattern.
    #[must_use]
    pub const fn code(self) -> PatternCode {
        self as PatternCode
    }

    /// Symbolic name of this pattern (e.g. `"DEALER"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        TABLE[self as usize].1
    }

    /// Look up a pattern by code.
    pub fn from_code(code: i64) -> Result<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| TABLE.get(idx))
            .map(|(pattern, _)| *pattern)
            .ok_or_else(|| ZsockError::unknown_pattern(code))
    }

    /// Look up a pattern by its exact symbolic name.
    pub fn from_name(name: &str) -> Result<Self> {
        TABLE
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(pattern, _)| *pattern)
            .ok_or_else(|| ZsockError::unknown_pattern(name))
    }

    /// Directive mode applied to endpoint tokens that carry no `@`/`>` prefix.
    ///
    /// Patterns that usually sit at a stable, well-known address bind;
    /// the rest connect.
    #[must_use]
    pub const fn default_mode(self) -> DirectiveMode {
        match self {
            Self::Pub | Self::Rep | Self::Router | Self::Pull | Self::XPub | Self::Server => {
                DirectiveMode::Bind
            }
            Self::Pair
            | Self::Sub
            | Self::Req
            | Self::Dealer
            | Self::Push
            | Self::XSub
            | Self::Stream
            | Self::Client => DirectiveMode::Connect,
        }
    }

    /// Check if this pattern can talk to the given peer pattern.
    ///
    /// STREAM has no pattern-aware peer and is never compatible.
    #[must_use]
    pub fn is_compatible(self, peer: Self) -> bool {
        matches!(
            (self, peer),
            (Self::Pair, Self::Pair)
                | (Self::Pub | Self::XPub, Self::Sub | Self::XSub)
                | (Self::Sub | Self::XSub, Self::Pub | Self::XPub)
                | (Self::Req, Self::Rep | Self::Router)
                | (Self::Rep, Self::Req | Self::Dealer)
                | (Self::Dealer, Self::Rep | Self::Router | Self::Dealer)
                | (Self::Router, Self::Req | Self::Dealer | Self::Router)
                | (Self::Push, Self::Pull)
                | (Self::Pull, Self::Push)
                | (Self::Server, Self::Client)
                | (Self::Client, Self::Server)
        )
    }
}

/// Code for a symbolic pattern name.
pub fn code_for_name(name: &str) -> Result<PatternCode> {
    Pattern::from_name(name).map(Pattern::code)
}

/// Symbolic name for a pattern code.
pub fn name_for_code(code: i64) -> Result<&'static str> {
    Pattern::from_code(code).map(Pattern::name)
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = ZsockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<i64> for Pattern {
    type Error = ZsockError;

    fn try_from(code: i64) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<Pattern> for PatternCode {
    fn from(pattern: Pattern) -> Self {
        pattern.code()
    }
}
