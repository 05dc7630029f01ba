//! # Network Error Types
//!
//! Everything that can go wrong while encoding or decoding packets. None of
//! these are fatal to the process; callers decide whether to log, drop the
//! packet or disconnect.

use revenant_shared::PacketType;
use thiserror::Error;

/// Errors raised by the wire layer, the entity table and the sessions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// Fewer bytes left than the next field needs.
    #[error("packet truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Size of the field being read.
        needed: usize,
        /// Bytes left in the packet.
        remaining: usize,
    },

    /// Packet type tag outside the closed enumeration.
    #[error("unknown packet type: {0}")]
    UnknownPacketType(i32),

    /// Entity kind tag with no registered variant.
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(i32),

    /// Login status code outside the closed enumeration.
    #[error("unknown login status: {0}")]
    UnknownLoginStatus(i32),

    /// Chat kind outside the closed enumeration.
    #[error("unknown chat kind: {0}")]
    UnknownChatKind(i32),

    /// Input kind outside the closed enumeration.
    #[error("unknown input kind: {0}")]
    UnknownInputKind(i32),

    /// String field is not UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidString,

    /// Item code text is not `<kind> <amount>`.
    #[error("invalid item code: {0:?}")]
    InvalidItemCode(String),

    /// Peer speaks a different protocol version.
    #[error("protocol mismatch: expected version {expected}, received {received}")]
    ProtocolMismatch {
        /// Version this side speaks.
        expected: i32,
        /// Version the peer sent.
        received: i32,
    },

    /// Map dimensions exceed the configured limit.
    #[error("map too large: {width}x{height} tiles")]
    MapTooLarge {
        /// Width in tiles.
        width: u32,
        /// Height in tiles.
        height: u32,
    },

    /// A multi-packet contained another multi-packet.
    #[error("multi-packet nested inside multi-packet")]
    NestedMultiPacket,

    /// A packet type arrived on the side that never receives it.
    #[error("unexpected packet type {0:?}")]
    UnexpectedPacket(PacketType),
}

/// Result type for network operations.
pub type NetResult<T> = Result<T, NetError>;
