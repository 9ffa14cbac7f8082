//! In-process transport engine.
//!
//! `LocalEngine` implements the full handle contract (allocation, ordered
//! bind/connect, subscriptions, release) without touching the network. It
//! backs the default socket factory and the test suites.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use tracing::{debug, error, trace, warn};
use zsock_core::directive::{DirectiveMode, EndpointDirective};
use zsock_core::endpoint::{Endpoint, EndpointError};
use zsock_core::engine::{HandleId, HandleRelease, NativeHandle, TransportEngine, TransportError};
use zsock_core::monitor::{create_monitor, SocketEvent, SocketEventSender, SocketMonitor};
use zsock_core::pattern::Pattern;

use crate::config::EngineConfig;
use crate::registry::BindRegistry;

/// Process-wide engine shared by the default factory
static GLOBAL_ENGINE: Lazy<Arc<LocalEngine>> = Lazy::new(|| Arc::new(LocalEngine::default()));

/// Bookkeeping for one live handle.
#[derive(Debug)]
struct HandleEntry {
    pattern: Pattern,
    /// Directives applied so far, in order
    directives: Vec<EndpointDirective>,
    /// Registry keys this handle owns
    bound: Vec<String>,
    subscriptions: Vec<Bytes>,
}

#[derive(Debug)]
struct EngineState {
    config: EngineConfig,
    next_id: AtomicU64,
    live: AtomicUsize,
    handles: DashMap<HandleId, HandleEntry>,
    registry: BindRegistry,
    monitor: Option<SocketEventSender>,
}

impl EngineState {
    fn emit(&self, event: SocketEvent) {
        if let Some(monitor) = &self.monitor {
            // A dropped monitor just stops receiving events
            let _ = monitor.send(event);
        }
    }

    /// Reserve a live-handle slot, honouring `max_handles`.
    fn reserve_slot(&self) -> Result<(), TransportError> {
        let max = self.config.max_handles;
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                max.map_or(true, |max| live < max).then_some(live + 1)
            })
            .map(|_| ())
            .map_err(TransportError::HandleLimit)
    }

    /// Registry key for an address.
    fn normalize(&self, address: &str) -> Result<String, TransportError> {
        if !self.config.validate_addresses {
            return Ok(address.to_string());
        }
        match Endpoint::parse(address) {
            Ok(endpoint) => Ok(endpoint.to_string()),
            Err(EndpointError::InvalidScheme(_)) => {
                Err(TransportError::UnsupportedTransport(address.to_string()))
            }
            Err(e) => Err(TransportError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn apply(&self, id: HandleId, directive: &EndpointDirective) -> Result<(), TransportError> {
        let key = self.normalize(&directive.address)?;

        match directive.mode {
            DirectiveMode::Bind => {
                if let Err(owner) = self.registry.claim(&key, id) {
                    warn!("[ENGINE] Handle #{} cannot bind {}: owned by #{}", id, key, owner);
                    self.emit(SocketEvent::BindFailed {
                        handle: id,
                        address: key.clone(),
                        reason: "address in use".to_string(),
                    });
                    return Err(TransportError::AddressInUse(key));
                }
                debug!("[ENGINE] Handle #{} bound to {}", id, key);
            }
            DirectiveMode::Connect => {
                debug!("[ENGINE] Handle #{} connected to {}", id, key);
            }
        }

        let Some(mut entry) = self.handles.get_mut(&id) else {
            // Handle vanished between lookup and apply; undo the claim
            self.registry.release(&key, id);
            return Err(TransportError::UnknownHandle(id));
        };
        entry.directives.push(directive.clone());
        if directive.mode == DirectiveMode::Bind {
            entry.bound.push(key.clone());
        }
        drop(entry);

        self.emit(match directive.mode {
            DirectiveMode::Bind => SocketEvent::Bound {
                handle: id,
                address: key,
            },
            DirectiveMode::Connect => SocketEvent::Connected {
                handle: id,
                address: key,
            },
        });
        Ok(())
    }
}

impl HandleRelease for EngineState {
    fn release(&self, id: HandleId, pattern: Pattern) {
        let Some((_, entry)) = self.handles.remove(&id) else {
            error!("[ENGINE] Release of unknown {} handle #{}", pattern, id);
            debug_assert!(false, "release of unknown handle #{id}");
            return;
        };

        for key in &entry.bound {
            self.registry.release(key, id);
        }
        self.live.fetch_sub(1, Ordering::AcqRel);
        trace!(
            "[ENGINE] Released {} handle #{} ({} directives)",
            entry.pattern,
            id,
            entry.directives.len()
        );
        self.emit(SocketEvent::Released {
            handle: id,
            pattern: entry.pattern,
        });
    }
}

/// In-process transport engine.
///
/// Cheap to share behind an `Arc`; all state is internally synchronized.
///
/// # Example
///
/// ```
/// use zsock_core::directive::EndpointDirective;
/// use zsock_core::engine::TransportEngine;
/// use zsock_core::pattern::Pattern;
/// use zsock_engine::LocalEngine;
///
/// let engine = LocalEngine::default();
/// let handle = engine
///     .create_bound_handle(Pattern::Pub, &[EndpointDirective::bind("inproc://news")])
///     .unwrap();
/// assert!(engine.is_bound("inproc://news"));
///
/// handle.release();
/// assert!(!engine.is_bound("inproc://news"));
/// ```
#[derive(Debug, Clone)]
pub struct LocalEngine {
    state: Arc<EngineState>,
}

impl Default for LocalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LocalEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self::build(config, None)
    }

    /// Create an engine that reports handle lifecycle events.
    pub fn with_monitor(config: EngineConfig) -> (Self, SocketMonitor) {
        let (sender, monitor) = create_monitor();
        (Self::build(config, Some(sender)), monitor)
    }

    /// The shared process-wide engine.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_ENGINE)
    }

    fn build(config: EngineConfig, monitor: Option<SocketEventSender>) -> Self {
        Self {
            state: Arc::new(EngineState {
                config,
                next_id: AtomicU64::new(1),
                live: AtomicUsize::new(0),
                handles: DashMap::new(),
                registry: BindRegistry::default(),
                monitor,
            }),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.state.config
    }

    /// Number of handles currently allocated.
    pub fn live_handles(&self) -> usize {
        self.state.live.load(Ordering::Acquire)
    }

    /// Directives applied to a live handle, in order.
    pub fn directives(&self, id: HandleId) -> Option<Vec<EndpointDirective>> {
        self.state
            .handles
            .get(&id)
            .map(|entry| entry.directives.clone())
    }

    /// Subscription prefixes of a live SUB handle.
    pub fn subscriptions(&self, id: HandleId) -> Option<Vec<Bytes>> {
        self.state
            .handles
            .get(&id)
            .map(|entry| entry.subscriptions.clone())
    }

    /// Check whether an address is currently bound by any handle.
    pub fn is_bound(&self, address: &str) -> bool {
        let key = self
            .state
            .normalize(address)
            .unwrap_or_else(|_| address.to_string());
        self.state.registry.is_bound(&key)
    }

    /// All bound addresses (normalized), primarily for debugging.
    pub fn bound_addresses(&self) -> Vec<String> {
        self.state.registry.addresses()
    }

    /// Check that `handle` was issued by this engine and is still live.
    fn owned_id(&self, handle: &NativeHandle) -> Result<HandleId, TransportError> {
        let owned = handle.is_owned_by(&*self.state) && self.state.handles.contains_key(&handle.id());
        if owned {
            Ok(handle.id())
        } else {
            Err(TransportError::UnknownHandle(handle.id()))
        }
    }
}

impl TransportEngine for LocalEngine {
    fn create_bare_handle(&self, pattern: Pattern) -> Result<NativeHandle, TransportError> {
        self.state.reserve_slot()?;

        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed);
        self.state.handles.insert(
            id,
            HandleEntry {
                pattern,
                directives: Vec::new(),
                bound: Vec::new(),
                subscriptions: Vec::new(),
            },
        );
        debug!("[ENGINE] Created {} handle #{}", pattern, id);
        self.state.emit(SocketEvent::HandleCreated { handle: id, pattern });

        let owner: Arc<dyn HandleRelease> = self.state.clone();
        Ok(NativeHandle::new(id, pattern, owner))
    }

    fn create_bound_handle(
        &self,
        pattern: Pattern,
        directives: &[EndpointDirective],
    ) -> Result<NativeHandle, TransportError> {
        let handle = self.create_bare_handle(pattern)?;
        // On failure `handle` drops here, which unbinds anything already applied
        self.attach(&handle, directives)?;
        Ok(handle)
    }

    fn attach(
        &self,
        handle: &NativeHandle,
        directives: &[EndpointDirective],
    ) -> Result<(), TransportError> {
        let id = self.owned_id(handle)?;
        for directive in directives {
            trace!("[ENGINE] Applying {} to handle #{}", directive, id);
            self.state.apply(id, directive)?;
        }
        Ok(())
    }

    fn set_subscription(
        &self,
        handle: &NativeHandle,
        prefix: &[u8],
        subscribe: bool,
    ) -> Result<(), TransportError> {
        let id = self.owned_id(handle)?;
        if handle.pattern() != Pattern::Sub {
            return Err(TransportError::UnsupportedOption {
                option: if subscribe { "SUBSCRIBE" } else { "UNSUBSCRIBE" },
                pattern: handle.pattern(),
            });
        }

        let mut entry = self
            .state
            .handles
            .get_mut(&id)
            .ok_or(TransportError::UnknownHandle(id))?;
        if subscribe {
            entry.subscriptions.push(Bytes::copy_from_slice(prefix));
        } else if let Some(pos) = entry.subscriptions.iter().position(|s| s.as_ref() == prefix) {
            // Subscriptions are counted; remove a single occurrence
            entry.subscriptions.remove(pos);
        }
        trace!(
            "[ENGINE] Handle #{} now has {} subscriptions",
            id,
            entry.subscriptions.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_and_released() {
        let engine = LocalEngine::default();
        let a = engine.create_bare_handle(Pattern::Pair).unwrap();
        let b = engine.create_bare_handle(Pattern::Pair).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(engine.live_handles(), 2);

        a.release();
        assert_eq!(engine.live_handles(), 1);
        drop(b);
        assert_eq!(engine.live_handles(), 0);
    }

    #[test]
    fn test_bound_handle_applies_directives_in_order() {
        let engine = LocalEngine::default();
        let directives = [
            EndpointDirective::bind("tcp://*:5555"),
            EndpointDirective::connect("tcp://10.0.0.1:5555"),
        ];
        let handle = engine.create_bound_handle(Pattern::Dealer, &directives).unwrap();
        assert_eq!(engine.directives(handle.id()).unwrap(), directives);
        assert!(engine.is_bound("tcp://*:5555"));
        assert!(!engine.is_bound("tcp://10.0.0.1:5555"));
    }

    #[test]
    fn test_bind_conflict_releases_new_handle() {
        let engine = LocalEngine::default();
        let _owner = engine
            .create_bound_handle(Pattern::Rep, &[EndpointDirective::bind("inproc://svc")])
            .unwrap();

        let result = engine.create_bound_handle(
            Pattern::Rep,
            &[
                EndpointDirective::bind("inproc://other"),
                EndpointDirective::bind("inproc://svc"),
            ],
        );
        assert!(matches!(result, Err(TransportError::AddressInUse(addr)) if addr == "inproc://svc"));
        assert_eq!(engine.live_handles(), 1);
        assert!(!engine.is_bound("inproc://other"));
        assert!(engine.is_bound("inproc://svc"));
    }

    #[test]
    fn test_release_frees_address() {
        let engine = LocalEngine::default();
        let first = engine
            .create_bound_handle(Pattern::Pull, &[EndpointDirective::bind("ipc:///tmp/zsock.sock")])
            .unwrap();
        first.release();

        let second =
            engine.create_bound_handle(Pattern::Pull, &[EndpointDirective::bind("ipc:///tmp/zsock.sock")]);
        assert!(second.is_ok());
    }

    #[test]
    fn test_address_validation() {
        let engine = LocalEngine::default();
        let err = engine
            .create_bound_handle(Pattern::Push, &[EndpointDirective::connect("udp://1.2.3.4:9")])
            .unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedTransport(_)));

        let err = engine
            .create_bound_handle(Pattern::Push, &[EndpointDirective::connect("tcp://nohost")])
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress { .. }));
        assert_eq!(engine.live_handles(), 0);

        let opaque = LocalEngine::new(EngineConfig::new().with_address_validation(false));
        assert!(!opaque.config().validate_addresses);
        assert!(opaque
            .create_bound_handle(Pattern::Push, &[EndpointDirective::bind("anything goes")])
            .is_ok());
    }

    #[test]
    fn test_handle_limit() {
        let engine = LocalEngine::new(EngineConfig::new().with_max_handles(1));
        let first = engine.create_bare_handle(Pattern::Req).unwrap();
        assert!(matches!(
            engine.create_bare_handle(Pattern::Req),
            Err(TransportError::HandleLimit(1))
        ));
        drop(first);
        assert!(engine.create_bare_handle(Pattern::Req).is_ok());
    }

    #[test]
    fn test_subscriptions_only_on_sub() {
        let engine = LocalEngine::default();
        let sub = engine.create_bare_handle(Pattern::Sub).unwrap();
        engine.set_subscription(&sub, b"weather", true).unwrap();
        engine.set_subscription(&sub, b"weather", true).unwrap();
        engine.set_subscription(&sub, b"weather", false).unwrap();
        assert_eq!(
            engine.subscriptions(sub.id()).unwrap(),
            vec![Bytes::from_static(b"weather")]
        );

        let publisher = engine.create_bare_handle(Pattern::Pub).unwrap();
        assert!(matches!(
            engine.set_subscription(&publisher, b"x", true),
            Err(TransportError::UnsupportedOption { pattern: Pattern::Pub, .. })
        ));
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let a = LocalEngine::default();
        let b = LocalEngine::default();
        let handle = a.create_bare_handle(Pattern::Dealer).unwrap();
        assert!(matches!(
            b.attach(&handle, &[EndpointDirective::connect("inproc://x")]),
            Err(TransportError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_monitor_events() {
        let (engine, monitor) = LocalEngine::with_monitor(EngineConfig::default());
        let handle = engine
            .create_bound_handle(
                Pattern::Router,
                &[
                    EndpointDirective::bind("inproc://events"),
                    EndpointDirective::connect("inproc://upstream"),
                ],
            )
            .unwrap();
        let id = handle.id();

        // ids are sequential per engine
        let rival = id + 1;
        assert!(engine
            .create_bound_handle(Pattern::Router, &[EndpointDirective::bind("inproc://events")])
            .is_err());
        handle.release();

        let events: Vec<_> = monitor.try_iter().collect();
        assert_eq!(
            events,
            vec![
                SocketEvent::HandleCreated {
                    handle: id,
                    pattern: Pattern::Router
                },
                SocketEvent::Bound {
                    handle: id,
                    address: "inproc://events".into()
                },
                SocketEvent::Connected {
                    handle: id,
                    address: "inproc://upstream".into()
                },
                SocketEvent::HandleCreated {
                    handle: rival,
                    pattern: Pattern::Router
                },
                SocketEvent::BindFailed {
                    handle: rival,
                    address: "inproc://events".into(),
                    reason: "address in use".into()
                },
                SocketEvent::Released {
                    handle: rival,
                    pattern: Pattern::Router
                },
                SocketEvent::Released {
                    handle: id,
                    pattern: Pattern::Router
                },
            ]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "release of unknown handle")]
    fn test_unknown_release_trips_assertion() {
        let engine = LocalEngine::default();
        let owner: Arc<dyn HandleRelease> = engine.state.clone();
        drop(NativeHandle::new(999, Pattern::Pair, owner));
    }
}
