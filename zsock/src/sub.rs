//! SUB socket implementation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, trace};
use zsock_core::engine::{NativeHandle, TransportEngine};
use zsock_core::error::Result;
use zsock_core::pattern::Pattern;

use crate::any::AnySocket;
use crate::socket::{Socket, SocketCore, Variant};
use crate::SocketFactory;

/// A SUB socket for receiving prefix-filtered messages from PUB/XPUB peers.
///
/// Construction never subscribes. A filter passed to [`SubSocket::with_subscription`]
/// is only remembered; call [`SubSocket::subscribe`] to apply it. Without
/// any subscription, what the socket receives is up to the engine.
///
/// ## Example
///
/// ```rust
/// use zsock::{Socket, SubSocket};
///
/// # fn example() -> zsock::Result<()> {
/// let socket = SubSocket::with_subscription(Some(">inproc://doc-sub-example"), b"weather")?;
/// assert_eq!(socket.requested_subscription(), Some(&b"weather"[..]));
///
/// socket.subscribe(b"weather")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SubSocket {
    core: SocketCore,
    requested: Option<Bytes>,
}

impl SubSocket {
    /// Create an unsubscribed SUB socket on the process-wide local engine.
    #[cfg(feature = "local-engine")]
    pub fn new(endpoints: Option<&str>) -> Result<Self> {
        SocketFactory::local().create(endpoints)
    }

    /// Create a SUB socket on the local engine, remembering a filter to
    /// apply later.
    #[cfg(feature = "local-engine")]
    pub fn with_subscription(endpoints: Option<&str>, subscription: &[u8]) -> Result<Self> {
        SocketFactory::local().create_sub(endpoints, Some(subscription))
    }

    /// Create the socket on a specific engine.
    pub fn with_engine(engine: Arc<dyn TransportEngine>, endpoints: Option<&str>) -> Result<Self> {
        SocketFactory::new(engine).create(endpoints)
    }

    pub(crate) fn remember_subscription(&mut self, subscription: Option<&[u8]>) {
        if let Some(prefix) = subscription {
            debug!(
                "[SUB] Handle #{} keeps requested subscription ({} bytes) unapplied",
                self.core.handle().id(),
                prefix.len()
            );
            self.requested = Some(Bytes::copy_from_slice(prefix));
        }
    }

    /// Filter passed at construction, if any. Not applied automatically.
    pub fn requested_subscription(&self) -> Option<&[u8]> {
        self.requested.as_deref()
    }

    /// Start receiving messages that begin with `prefix`.
    ///
    /// An empty prefix matches everything. Subscriptions are counted; each
    /// call needs a matching [`SubSocket::unsubscribe`].
    pub fn subscribe(&self, prefix: &[u8]) -> Result<()> {
        trace!("[SUB] Subscribe on handle #{}", self.core.handle().id());
        self.core
            .engine()
            .set_subscription(self.core.handle(), prefix, true)?;
        Ok(())
    }

    /// Drop one subscription to `prefix`.
    pub fn unsubscribe(&self, prefix: &[u8]) -> Result<()> {
        trace!("[SUB] Unsubscribe on handle #{}", self.core.handle().id());
        self.core
            .engine()
            .set_subscription(self.core.handle(), prefix, false)?;
        Ok(())
    }
}

impl Socket for SubSocket {
    fn pattern(&self) -> Pattern {
        Pattern::Sub
    }

    fn handle(&self) -> &NativeHandle {
        self.core.handle()
    }

    fn engine(&self) -> &Arc<dyn TransportEngine> {
        self.core.engine()
    }
}

impl Variant for SubSocket {
    const PATTERN: Pattern = Pattern::Sub;

    fn from_core(core: SocketCore) -> Self {
        Self {
            core,
            requested: None,
        }
    }

    fn into_any(self) -> AnySocket {
        AnySocket::Sub(self)
    }

    fn from_any(socket: AnySocket) -> std::result::Result<Self, AnySocket> {
        match socket {
            AnySocket::Sub(inner) => Ok(inner),
            other => Err(other),
        }
    }
}

#[cfg(all(test, feature = "local-engine"))]
mod tests {
    use super::*;
    use zsock_engine::LocalEngine;

    fn local() -> (Arc<LocalEngine>, SocketFactory) {
        let engine = Arc::new(LocalEngine::default());
        let factory = SocketFactory::new(engine.clone());
        (engine, factory)
    }

    #[test]
    fn test_constructor_filter_is_not_applied() {
        let (engine, factory) = local();
        let sub = factory
            .create_sub(Some("inproc://feed"), Some(&b"topic"[..]))
            .unwrap();

        assert_eq!(sub.requested_subscription(), Some(&b"topic"[..]));
        assert!(engine.subscriptions(sub.handle().id()).unwrap().is_empty());
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let (engine, factory) = local();
        let sub: SubSocket = factory.create(None).unwrap();
        assert_eq!(sub.requested_subscription(), None);

        sub.subscribe(b"").unwrap();
        sub.subscribe(b"news").unwrap();
        sub.unsubscribe(b"").unwrap();
        assert_eq!(
            engine.subscriptions(sub.handle().id()).unwrap(),
            vec![Bytes::from_static(b"news")]
        );
    }

    #[test]
    fn test_unprefixed_endpoint_connects() {
        let (engine, factory) = local();
        let sub: SubSocket = factory.create(Some("inproc://feed")).unwrap();
        let directives = engine.directives(sub.handle().id()).unwrap();
        assert_eq!(
            directives,
            vec![zsock_core::directive::EndpointDirective::connect("inproc://feed")]
        );
        assert!(!engine.is_bound("inproc://feed"));
    }
}
