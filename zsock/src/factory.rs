//! Socket factory.
//!
//! Two ways in:
//! - [`SocketFactory::create_by_identifier`] resolves a code or name and
//!   returns a bare socket (no bind/connect) as an [`AnySocket`]
//! - [`SocketFactory::create`] builds a concrete variant and applies an
//!   endpoint string while the handle is created
//!
//! Every call allocates exactly one handle. Nothing is cached or retried;
//! on error no socket is returned and no handle stays allocated.

use std::sync::Arc;

use tracing::debug;
use zsock_core::directive::parse_endpoints;
use zsock_core::engine::{NativeHandle, TransportEngine};
use zsock_core::error::Result;
use zsock_core::identifier::Identifier;
use zsock_core::pattern::Pattern;

use crate::any::AnySocket;
use crate::socket::{SocketCore, Variant};
use crate::sub::SubSocket;
use crate::variants::{
    ClientSocket, DealerSocket, PairSocket, PubSocket, PullSocket, PushSocket, RepSocket,
    ReqSocket, RouterSocket, ServerSocket, StreamSocket, XPubSocket, XSubSocket,
};

/// Builds the variant for a handle already known to match its pattern.
type Constructor = fn(SocketCore) -> AnySocket;

fn construct<V: Variant>(core: SocketCore) -> AnySocket {
    V::from_core(core).into_any()
}

struct VariantDescriptor {
    pattern: Pattern,
    construct: Constructor,
}

/// Constructors, indexed by pattern code.
static VARIANTS: [VariantDescriptor; 14] = [
    VariantDescriptor { pattern: Pattern::Pair, construct: construct::<PairSocket> },
    VariantDescriptor { pattern: Pattern::Pub, construct: construct::<PubSocket> },
    VariantDescriptor { pattern: Pattern::Sub, construct: construct::<SubSocket> },
    VariantDescriptor { pattern: Pattern::Req, construct: construct::<ReqSocket> },
    VariantDescriptor { pattern: Pattern::Rep, construct: construct::<RepSocket> },
    VariantDescriptor { pattern: Pattern::Dealer, construct: construct::<DealerSocket> },
    VariantDescriptor { pattern: Pattern::Router, construct: construct::<RouterSocket> },
    VariantDescriptor { pattern: Pattern::Pull, construct: construct::<PullSocket> },
    VariantDescriptor { pattern: Pattern::Push, construct: construct::<PushSocket> },
    VariantDescriptor { pattern: Pattern::XPub, construct: construct::<XPubSocket> },
    VariantDescriptor { pattern: Pattern::XSub, construct: construct::<XSubSocket> },
    VariantDescriptor { pattern: Pattern::Stream, construct: construct::<StreamSocket> },
    VariantDescriptor { pattern: Pattern::Server, construct: construct::<ServerSocket> },
    VariantDescriptor { pattern: Pattern::Client, construct: construct::<ClientSocket> },
];

fn descriptor(pattern: Pattern) -> &'static VariantDescriptor {
    &VARIANTS[usize::from(pattern.code())]
}

/// Creates sockets on one transport engine.
///
/// # Example
///
/// ```rust
/// use zsock::{DealerSocket, Pattern, Socket, SocketFactory};
///
/// # fn example() -> zsock::Result<()> {
/// let factory = SocketFactory::local();
///
/// // Bare socket from a code or a name
/// let pair = factory.create_by_identifier(0)?;
/// assert_eq!(pair.pattern(), Pattern::Pair);
///
/// // Typed socket, bound and connected at creation
/// let _dealer: DealerSocket =
///     factory.create(Some("@inproc://factory-doc,>inproc://upstream"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SocketFactory {
    engine: Arc<dyn TransportEngine>,
}

impl SocketFactory {
    /// Create a factory over the given engine.
    pub fn new(engine: Arc<dyn TransportEngine>) -> Self {
        Self { engine }
    }

    /// Factory over the process-wide local engine.
    #[cfg(feature = "local-engine")]
    pub fn local() -> Self {
        Self::new(zsock_engine::LocalEngine::global())
    }

    /// Engine this factory allocates handles from.
    pub fn engine(&self) -> &Arc<dyn TransportEngine> {
        &self.engine
    }

    /// Create a bare socket for a pattern code or name.
    ///
    /// Fails with `UnknownPattern` if the identifier is not in the table,
    /// or `TransportFailure` if the engine cannot allocate a handle.
    pub fn create_by_identifier(&self, identifier: impl Into<Identifier>) -> Result<AnySocket> {
        let identifier = identifier.into();
        let pattern = identifier.resolve()?;
        debug!("[FACTORY] Resolved {} to {}", identifier, pattern);

        let handle = self.engine.create_bare_handle(pattern)?;
        Ok(self.attach(handle))
    }

    /// Create a bare socket from an untyped token such as `"3"` or `":REQ"`.
    ///
    /// Tokens that are neither integers nor names fail with
    /// `InvalidIdentifierType`.
    pub fn create_by_token(&self, token: &str) -> Result<AnySocket> {
        self.create_by_identifier(Identifier::from_token(token)?)
    }

    /// Create a concrete variant, applying `endpoints` during handle creation.
    ///
    /// Unprefixed tokens use the variant's default mode. `None` or `""`
    /// creates an unbound socket.
    pub fn create<V: Variant>(&self, endpoints: Option<&str>) -> Result<V> {
        let directives = parse_endpoints(endpoints, V::PATTERN.default_mode())?;
        debug!(
            "[FACTORY] Creating {} socket with {} directives",
            V::PATTERN,
            directives.len()
        );

        let handle = self.engine.create_bound_handle(V::PATTERN, &directives)?;
        Ok(V::from_core(SocketCore::new(handle, Arc::clone(&self.engine))))
    }

    /// Create a SUB socket, remembering (not applying) a subscription filter.
    pub fn create_sub(
        &self,
        endpoints: Option<&str>,
        subscription: Option<&[u8]>,
    ) -> Result<SubSocket> {
        let mut sub: SubSocket = self.create(endpoints)?;
        sub.remember_subscription(subscription);
        Ok(sub)
    }

    /// Wrap a handle obtained elsewhere in the variant matching its pattern.
    ///
    /// Later `bind`/`connect` calls go to this factory's engine, so the
    /// handle should come from the same engine.
    pub fn wrap(&self, handle: NativeHandle) -> AnySocket {
        self.attach(handle)
    }

    fn attach(&self, handle: NativeHandle) -> AnySocket {
        let entry = descriptor(handle.pattern());
        debug_assert_eq!(entry.pattern, handle.pattern());
        (entry.construct)(SocketCore::new(handle, Arc::clone(&self.engine)))
    }
}
