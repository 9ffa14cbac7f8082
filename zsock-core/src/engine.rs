//! Transport engine contract.
//!
//! The engine owns everything below the socket abstraction: framing,
//! send/receive, security, and network I/O. zsock only asks it for three
//! things, create a handle (bare or with directives applied), apply more
//! directives later, and release a handle.
//!
//! # Handle ownership
//!
//! A [`NativeHandle`] is a move-only token. Dropping it releases the
//! underlying engine resource exactly once, so a second release or a use
//! after release is rejected by the compiler rather than checked at run time.

use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::directive::EndpointDirective;
use crate::pattern::Pattern;

/// Engine-assigned handle identity.
pub type HandleId = u64;

/// Release side of an engine, invoked by [`NativeHandle`] on drop.
pub trait HandleRelease: Send + Sync {
    /// Free the resource behind `id`.
    ///
    /// Called exactly once per handle. An id the engine does not know is a
    /// programming error in the engine or a forged handle.
    fn release(&self, id: HandleId, pattern: Pattern);
}

/// Opaque resource obtained from a transport engine.
pub struct NativeHandle {
    id: HandleId,
    pattern: Pattern,
    owner: Arc<dyn HandleRelease>,
}

impl NativeHandle {
    /// Wrap an engine resource.
    ///
    /// Only engines should call this; the returned handle calls
    /// `owner.release(id, pattern)` when dropped.
    pub fn new(id: HandleId, pattern: Pattern, owner: Arc<dyn HandleRelease>) -> Self {
        Self { id, pattern, owner }
    }

    /// Engine-assigned identity.
    #[must_use]
    pub const fn id(&self) -> HandleId {
        self.id
    }

    /// Pattern the handle was created for.
    #[must_use]
    pub const fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Check whether `owner` is the engine this handle releases into.
    #[must_use]
    pub fn is_owned_by(&self, owner: &dyn HandleRelease) -> bool {
        let ours = Arc::as_ptr(&self.owner).cast::<()>();
        let theirs = owner as *const _ as *const ();
        ours == theirs
    }

    /// Release the handle now.
    ///
    /// Consumes the handle, so releasing twice does not compile:
    ///
    /// ```compile_fail
    /// use zsock_core::engine::NativeHandle;
    ///
    /// fn teardown(handle: NativeHandle) {
    ///     handle.release();
    ///     handle.release();
    /// }
    /// ```
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        trace!("[HANDLE] Releasing {} handle #{}", self.pattern, self.id);
        self.owner.release(self.id, self.pattern);
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("id", &self.id)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Errors surfaced by a transport engine.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Bind target already taken
    #[error("Address in use: {0}")]
    AddressInUse(String),

    /// Address scheme the engine does not speak
    #[error("Unsupported transport: {0}")]
    UnsupportedTransport(String),

    /// Address could not be parsed
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Engine refused to allocate another handle
    #[error("Handle limit reached ({0} live handles)")]
    HandleLimit(usize),

    /// Handle is not (or no longer) known to the engine
    #[error("Unknown handle #{0}")]
    UnknownHandle(HandleId),

    /// Operation does not apply to the handle's pattern
    #[error("Option {option} not supported on {pattern} sockets")]
    UnsupportedOption {
        option: &'static str,
        pattern: Pattern,
    },

    /// OS-level failure
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Anything else the engine wants to report
    #[error("{0}")]
    Other(String),
}

/// Handle creation and configuration, as consumed by the socket factory.
pub trait TransportEngine: Send + Sync + fmt::Debug {
    /// Create a handle for `pattern` without binding or connecting it.
    fn create_bare_handle(&self, pattern: Pattern) -> Result<NativeHandle, TransportError>;

    /// Create a handle for `pattern` with every directive applied in order.
    ///
    /// Atomic: if any directive fails, the handle is released before the
    /// error is returned.
    fn create_bound_handle(
        &self,
        pattern: Pattern,
        directives: &[EndpointDirective],
    ) -> Result<NativeHandle, TransportError>;

    /// Apply directives to an existing handle, in order, stopping at the
    /// first failure.
    fn attach(
        &self,
        handle: &NativeHandle,
        directives: &[EndpointDirective],
    ) -> Result<(), TransportError>;

    /// Add (`subscribe == true`) or remove a subscription prefix.
    fn set_subscription(
        &self,
        handle: &NativeHandle,
        prefix: &[u8],
        subscribe: bool,
    ) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(HandleId, Pattern)>>);

    impl HandleRelease for Recorder {
        fn release(&self, id: HandleId, pattern: Pattern) {
            self.0.lock().unwrap().push((id, pattern));
        }
    }

    #[test]
    fn test_drop_releases_once() {
        let recorder = Arc::new(Recorder::default());
        let handle = NativeHandle::new(7, Pattern::Pub, recorder.clone());
        assert_eq!(handle.id(), 7);
        assert_eq!(handle.pattern(), Pattern::Pub);

        handle.release();
        assert_eq!(*recorder.0.lock().unwrap(), vec![(7, Pattern::Pub)]);
    }

    #[test]
    fn test_scope_exit_releases() {
        let recorder = Arc::new(Recorder::default());
        {
            let _a = NativeHandle::new(1, Pattern::Req, recorder.clone());
            let _b = NativeHandle::new(2, Pattern::Rep, recorder.clone());
        }
        let mut released = recorder.0.lock().unwrap().clone();
        released.sort_unstable();
        assert_eq!(released, vec![(1, Pattern::Req), (2, Pattern::Rep)]);
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::UnsupportedOption {
            option: "SUBSCRIBE",
            pattern: Pattern::Pub,
        };
        assert_eq!(err.to_string(), "Option SUBSCRIBE not supported on PUB sockets");
        assert_eq!(
            TransportError::HandleLimit(4).to_string(),
            "Handle limit reached (4 live handles)"
        );
    }
}
