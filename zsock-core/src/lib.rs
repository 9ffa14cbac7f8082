//! zsock Core
//!
//! This crate contains the transport-agnostic building blocks:
//! - Pattern identifier table (`pattern`)
//! - Code/name identifiers and resolution (`identifier`)
//! - Endpoint directive parsing (`directive`)
//! - Transport address model (`endpoint`)
//! - Transport engine contract and native handles (`engine`)
//! - Handle lifecycle events (`monitor`)
//! - Error types (`error`)

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
pub mod directive;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod monitor;
pub mod pattern;

// Keep it minimal to avoid API lock-in.
pub mod prelude {
    pub use crate::directive::{parse_endpoints, DirectiveMode, Directives, EndpointDirective};
    pub use crate::endpoint::Endpoint;
    pub use crate::engine::{HandleId, HandleRelease, NativeHandle, TransportEngine, TransportError};
    pub use crate::error::{Result, ZsockError};
    pub use crate::identifier::Identifier;
    pub use crate::monitor::{SocketEvent, SocketMonitor};
    pub use crate::pattern::{code_for_name, name_for_code, Pattern, PatternCode};
}
