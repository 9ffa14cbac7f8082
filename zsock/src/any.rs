//! Closed enumeration over every pattern variant.

use std::sync::Arc;

use zsock_core::engine::{NativeHandle, TransportEngine};
use zsock_core::pattern::Pattern;

use crate::socket::{Socket, Variant};
use crate::sub::SubSocket;
use crate::variants::{
    ClientSocket, DealerSocket, PairSocket, PubSocket, PullSocket, PushSocket, RepSocket,
    ReqSocket, RouterSocket, ServerSocket, StreamSocket, XPubSocket, XSubSocket,
};

/// A socket of any pattern, as returned by identifier-based creation.
///
/// Case names match [`Pattern`], so `AnySocket::Dealer` always holds a
/// [`DealerSocket`].
#[derive(Debug)]
pub enum AnySocket {
    /// PAIR socket
    Pair(PairSocket),
    /// PUB socket
    Pub(PubSocket),
    /// SUB socket
    Sub(SubSocket),
    /// REQ socket
    Req(ReqSocket),
    /// REP socket
    Rep(RepSocket),
    /// DEALER socket
    Dealer(DealerSocket),
    /// ROUTER socket
    Router(RouterSocket),
    /// PULL socket
    Pull(PullSocket),
    /// PUSH socket
    Push(PushSocket),
    /// XPUB socket
    XPub(XPubSocket),
    /// XSUB socket
    XSub(XSubSocket),
    /// STREAM socket
    Stream(StreamSocket),
    /// SERVER socket
    Server(ServerSocket),
    /// CLIENT socket
    Client(ClientSocket),
}

macro_rules! dispatch {
    ($self:expr, $socket:ident => $body:expr) => {
        match $self {
            AnySocket::Pair($socket) => $body,
            AnySocket::Pub($socket) => $body,
            AnySocket::Sub($socket) => $body,
            AnySocket::Req($socket) => $body,
            AnySocket::Rep($socket) => $body,
            AnySocket::Dealer($socket) => $body,
            AnySocket::Router($socket) => $body,
            AnySocket::Pull($socket) => $body,
            AnySocket::Push($socket) => $body,
            AnySocket::XPub($socket) => $body,
            AnySocket::XSub($socket) => $body,
            AnySocket::Stream($socket) => $body,
            AnySocket::Server($socket) => $body,
            AnySocket::Client($socket) => $body,
        }
    };
}

impl AnySocket {
    /// Take out the concrete variant, or get the socket back if it is a
    /// different pattern.
    ///
    /// ```rust
    /// use zsock::{AnySocket, PairSocket, PubSocket, SocketFactory};
    ///
    /// let socket = SocketFactory::local().create_by_identifier("PAIR").unwrap();
    /// let socket = socket.into_variant::<PubSocket>().unwrap_err();
    /// let _pair: PairSocket = socket.into_variant().unwrap();
    /// ```
    pub fn into_variant<V: Variant>(self) -> Result<V, Self> {
        V::from_any(self)
    }

    /// Borrow the SUB variant, if this is one.
    pub fn as_sub(&self) -> Option<&SubSocket> {
        match self {
            Self::Sub(sub) => Some(sub),
            _ => None,
        }
    }
}

impl Socket for AnySocket {
    fn pattern(&self) -> Pattern {
        dispatch!(self, s => s.pattern())
    }

    fn handle(&self) -> &NativeHandle {
        dispatch!(self, s => s.handle())
    }

    fn engine(&self) -> &Arc<dyn TransportEngine> {
        dispatch!(self, s => s.engine())
    }
}
