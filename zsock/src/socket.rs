//! Socket traits shared by every pattern variant.

use std::sync::Arc;

use tracing::debug;
use zsock_core::directive::{parse_endpoints, EndpointDirective};
use zsock_core::engine::{NativeHandle, TransportEngine};
use zsock_core::error::{Result, ZsockError};
use zsock_core::pattern::Pattern;

use crate::any::AnySocket;

/// State every variant owns: its handle and the engine that issued it.
///
/// Only this crate can build one, so a variant always carries a live,
/// correctly typed handle. The handle is released when the core drops.
#[derive(Debug)]
pub struct SocketCore {
    handle: NativeHandle,
    engine: Arc<dyn TransportEngine>,
}

impl SocketCore {
    pub(crate) fn new(handle: NativeHandle, engine: Arc<dyn TransportEngine>) -> Self {
        Self { handle, engine }
    }

    pub(crate) const fn handle(&self) -> &NativeHandle {
        &self.handle
    }

    pub(crate) const fn engine(&self) -> &Arc<dyn TransportEngine> {
        &self.engine
    }
}

/// Common capability of all socket variants.
///
/// Higher layers that perform real I/O reach the transport through
/// [`Socket::handle`]; this crate never sends or receives.
pub trait Socket {
    /// Pattern the socket was created for.
    fn pattern(&self) -> Pattern;

    /// The transport handle, exclusively owned by this socket.
    fn handle(&self) -> &NativeHandle;

    /// Engine that issued the handle.
    fn engine(&self) -> &Arc<dyn TransportEngine>;

    /// Apply an endpoint string to an already created socket.
    ///
    /// Unprefixed tokens use the pattern's default mode. Directives are
    /// applied in order; the first failure stops the rest.
    fn attach(&self, endpoints: &str) -> Result<()> {
        let directives = parse_endpoints(Some(endpoints), self.pattern().default_mode())?;
        debug!(
            "[{}] Attaching {} directives to handle #{}",
            self.pattern(),
            directives.len(),
            self.handle().id()
        );
        self.engine().attach(self.handle(), &directives)?;
        Ok(())
    }

    /// Bind to a single address.
    fn bind(&self, address: &str) -> Result<()> {
        apply_one(self, EndpointDirective::bind(address.trim()))
    }

    /// Connect to a single address.
    fn connect(&self, address: &str) -> Result<()> {
        apply_one(self, EndpointDirective::connect(address.trim()))
    }

    /// Tear the socket down, releasing its handle.
    fn close(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

fn apply_one<S: Socket + ?Sized>(socket: &S, directive: EndpointDirective) -> Result<()> {
    if directive.address.is_empty() {
        return Err(ZsockError::malformed_endpoint(directive.to_string()));
    }
    socket
        .engine()
        .attach(socket.handle(), std::slice::from_ref(&directive))?;
    Ok(())
}

/// A concrete pattern variant.
///
/// Implemented by the fourteen socket types; generic creation goes through
/// [`SocketFactory::create`](crate::SocketFactory::create).
pub trait Variant: Socket + Sized {
    /// Pattern this variant implements.
    const PATTERN: Pattern;

    /// Build the variant around a core whose handle was created for
    /// [`Variant::PATTERN`].
    fn from_core(core: SocketCore) -> Self;

    /// Erase into the closed socket enumeration.
    fn into_any(self) -> AnySocket;

    /// Recover the variant from the closed enumeration.
    fn from_any(socket: AnySocket) -> std::result::Result<Self, AnySocket>;
}

/// Declares a pattern variant with no pattern-specific state.
macro_rules! define_variant {
    ($(#[$meta:meta])* $name:ident, $pattern:ident) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            core: $crate::socket::SocketCore,
        }

        impl $name {
            /// Create the socket on the process-wide local engine.
            ///
            /// `endpoints` uses the `@bind,>connect` grammar; `None` leaves
            /// the socket unbound.
            #[cfg(feature = "local-engine")]
            pub fn new(endpoints: Option<&str>) -> zsock_core::error::Result<Self> {
                $crate::SocketFactory::local().create(endpoints)
            }

            /// Create the socket on a specific engine.
            pub fn with_engine(
                engine: std::sync::Arc<dyn zsock_core::engine::TransportEngine>,
                endpoints: Option<&str>,
            ) -> zsock_core::error::Result<Self> {
                $crate::SocketFactory::new(engine).create(endpoints)
            }
        }

        impl $crate::socket::Socket for $name {
            fn pattern(&self) -> zsock_core::pattern::Pattern {
                zsock_core::pattern::Pattern::$pattern
            }

            fn handle(&self) -> &zsock_core::engine::NativeHandle {
                self.core.handle()
            }

            fn engine(&self) -> &std::sync::Arc<dyn zsock_core::engine::TransportEngine> {
                self.core.engine()
            }
        }

        impl $crate::socket::Variant for $name {
            const PATTERN: zsock_core::pattern::Pattern = zsock_core::pattern::Pattern::$pattern;

            fn from_core(core: $crate::socket::SocketCore) -> Self {
                Self { core }
            }

            fn into_any(self) -> $crate::AnySocket {
                $crate::AnySocket::$pattern(self)
            }

            fn from_any(socket: $crate::AnySocket) -> std::result::Result<Self, $crate::AnySocket> {
                match socket {
                    $crate::AnySocket::$pattern(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

pub(crate) use define_variant;
