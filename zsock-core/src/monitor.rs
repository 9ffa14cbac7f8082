//! Handle lifecycle monitoring.
//!
//! Engines that support monitoring emit a [`SocketEvent`] for every handle
//! allocation, directive, and release.

use std::fmt;

use crate::engine::HandleId;
use crate::pattern::Pattern;

/// Handle lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// A handle was allocated.
    HandleCreated { handle: HandleId, pattern: Pattern },

    /// Handle bound to an address.
    Bound { handle: HandleId, address: String },

    /// Handle connected to an address.
    Connected { handle: HandleId, address: String },

    /// Bind directive rejected.
    BindFailed {
        handle: HandleId,
        address: String,
        reason: String,
    },

    /// Handle released.
    Released { handle: HandleId, pattern: Pattern },
}

impl SocketEvent {
    /// Handle the event refers to.
    #[must_use]
    pub const fn handle(&self) -> HandleId {
        match self {
            Self::HandleCreated { handle, .. }
            | Self::Bound { handle, .. }
            | Self::Connected { handle, .. }
            | Self::BindFailed { handle, .. }
            | Self::Released { handle, .. } => *handle,
        }
    }
}

impl fmt::Display for SocketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandleCreated { handle, pattern } => {
                write!(f, "Created {pattern} handle #{handle}")
            }
            Self::Bound { handle, address } => write!(f, "Handle #{handle} bound to {address}"),
            Self::Connected { handle, address } => {
                write!(f, "Handle #{handle} connected to {address}")
            }
            Self::BindFailed {
                handle,
                address,
                reason,
            } => write!(f, "Handle #{handle} bind failed for {address}: {reason}"),
            Self::Released { handle, pattern } => {
                write!(f, "Released {pattern} handle #{handle}")
            }
        }
    }
}

/// Handle for receiving socket events.
pub type SocketMonitor = flume::Receiver<SocketEvent>;

/// Sending half, held by the engine.
pub type SocketEventSender = flume::Sender<SocketEvent>;

/// Creates a new monitoring channel pair.
#[must_use]
pub fn create_monitor() -> (SocketEventSender, SocketMonitor) {
    flume::unbounded()
}
