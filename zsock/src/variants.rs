//! Pattern variants without pattern-specific state.
//!
//! Messaging semantics (lockstep, fan-out, routing frames) are enforced by
//! the transport engine; these types only guarantee that the handle they
//! hold was created for the right pattern. SUB has its own module.

use crate::socket::define_variant;

define_variant!(
    /// PAIR socket: exclusive one-to-one link to another PAIR, no fan-out.
    PairSocket,
    Pair
);

define_variant!(
    /// PUB socket: fans every message out to matching SUB/XSUB peers.
    PubSocket,
    Pub
);

define_variant!(
    /// REQ socket: strict send/receive lockstep against REP or ROUTER.
    ReqSocket,
    Req
);

define_variant!(
    /// REP socket: strict receive/send lockstep against REQ or DEALER.
    RepSocket,
    Rep
);

define_variant!(
    /// DEALER socket: asynchronous, multiplexed request-reply.
    DealerSocket,
    Dealer
);

define_variant!(
    /// ROUTER socket: prefixes inbound and outbound messages with a
    /// peer-routing frame.
    RouterSocket,
    Router
);

define_variant!(
    /// PULL socket: receiving end of a load-balanced pipeline.
    PullSocket,
    Pull
);

define_variant!(
    /// PUSH socket: round-robins messages across connected PULL peers.
    PushSocket,
    Push
);

define_variant!(
    /// XPUB socket: like PUB, but subscriptions arrive as ordinary messages.
    XPubSocket,
    XPub
);

define_variant!(
    /// XSUB socket: like SUB, but subscriptions are sent as ordinary messages.
    XSubSocket,
    XSub
);

define_variant!(
    /// STREAM socket: raw transport peer for non-ZMTP counterparties;
    /// messages carry explicit peer-identity framing.
    StreamSocket,
    Stream
);

define_variant!(
    /// SERVER socket: replies are addressed by an opaque routing id.
    ServerSocket,
    Server
);

define_variant!(
    /// CLIENT socket: talks to a SERVER in the client-server pattern.
    ClientSocket,
    Client
);
