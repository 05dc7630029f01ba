//! # Revenant Shared
//!
//! Common types used by both client and server.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on rendering, windowing or socket crates.
//! It holds the vocabulary both sides agree on, nothing more.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod math;
pub mod protocol;

pub use config::{ConfigError, ConfigResult, SyncConfig};
pub use constants::{MAX_PACKET_SIZE, TILE_SIZE};
pub use math::{MapBounds, Vec2};
pub use protocol::{
    ChatKind, EntityKind, InputKind, LoginStatus, PacketType, CLIENT_BOUND_LIMIT,
    PROTOCOL_VERSION,
};
