//! # zsock
//!
//! Typed ZeroMQ socket variants over a pluggable transport engine.
//!
//! ## Architecture
//!
//! - **`zsock-core`**: pattern table, identifiers, endpoint directives,
//!   and the transport-engine contract
//! - **`zsock-engine`**: in-process engine (opt-out via the
//!   `local-engine` feature)
//! - **`zsock`**: the fourteen socket variants and the factory (this crate)
//!
//! The transport engine does all real I/O. This crate resolves pattern
//! identifiers, creates handles, and makes sure each handle ends up in the
//! right variant type and is released exactly once.
//!
//! ## Quick Start
//!
//! ```rust
//! use zsock::prelude::*;
//!
//! # fn example() -> zsock::Result<()> {
//! // Resolve by code or by name, no endpoints applied
//! let socket = zsock::create_by_identifier("ROUTER")?;
//! assert_eq!(socket.pattern(), Pattern::Router);
//! socket.bind("inproc://quick-start")?;
//!
//! // Pattern-specific creation: bind and connect in one step
//! let _publisher = PubSocket::new(Some("@inproc://quick-start-pub"))?;
//! let subscriber = SubSocket::new(Some(">inproc://quick-start-pub"))?;
//! subscriber.subscribe(b"")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Ownership
//!
//! Each socket exclusively owns its [`NativeHandle`]. The handle is released
//! when the socket drops or [`Socket::close`] consumes it; there is no way to
//! release it twice.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod any;
mod factory;
mod socket;
mod sub;
mod variants;

pub use any::AnySocket;
pub use factory::SocketFactory;
pub use socket::{Socket, SocketCore, Variant};
pub use sub::SubSocket;
pub use variants::{
    ClientSocket, DealerSocket, PairSocket, PubSocket, PullSocket, PushSocket, RepSocket,
    ReqSocket, RouterSocket, ServerSocket, StreamSocket, XPubSocket, XSubSocket,
};

// Re-export core types
pub use zsock_core::directive::{parse_endpoints, DirectiveMode, EndpointDirective};
pub use zsock_core::engine::{HandleId, NativeHandle, TransportEngine, TransportError};
pub use zsock_core::error::{Result, ZsockError};
pub use zsock_core::identifier::Identifier;
pub use zsock_core::pattern::{code_for_name, name_for_code, Pattern, PatternCode};

#[cfg(feature = "local-engine")]
pub use zsock_engine::{EngineConfig, LocalEngine};

/// Create a bare socket on the process-wide local engine.
///
/// Shorthand for `SocketFactory::local().create_by_identifier(identifier)`.
#[cfg(feature = "local-engine")]
pub fn create_by_identifier(identifier: impl Into<Identifier>) -> Result<AnySocket> {
    SocketFactory::local().create_by_identifier(identifier)
}

/// Convenient imports.
///
/// ```rust
/// use zsock::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        AnySocket, ClientSocket, DealerSocket, PairSocket, Pattern, PubSocket, PullSocket,
        PushSocket, RepSocket, ReqSocket, RouterSocket, ServerSocket, Socket, SocketFactory,
        StreamSocket, SubSocket, Variant, XPubSocket, XSubSocket,
    };
}
