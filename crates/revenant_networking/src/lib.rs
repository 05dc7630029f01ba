//! # Revenant Networking
//!
//! Entity synchronization between an authoritative server and its clients.
//!
//! ## Architecture
//!
//! - **Protocol**: typed packet cursor and the message shapes of every
//!   packet type
//! - **Entities**: the entity variants and the table that owns them,
//!   backed by a [`PackedStore`](revenant_core::PackedStore)
//! - **Client**: a session that drains server packets into its table
//! - **Server**: login gate, authoritative world and update broadcaster
//!
//! ## Data Flow
//!
//! ```text
//! SERVER                                   CLIENT
//!   ServerWorld::tick                        |
//!     └─ UpdateBroadcaster ── EntityUpdate ─►| ClientSession::handle_packet
//!                                            |   └─ EntityTable::drain_update_packet
//!                                            |        └─ Entity::deserialize
//! ```
//!
//! Nothing here opens a socket. Both sides take and produce byte buffers,
//! and every failure is returned to the caller as a [`NetError`] or a
//! [`DrainReport`].
//!
//! ## Example
//!
//! ```rust
//! use revenant_networking::{ClientSession, ServerWorld};
//! use revenant_shared::{EntityKind, SyncConfig, Vec2};
//!
//! let config = SyncConfig::default();
//! let mut world = ServerWorld::new(&config);
//! let id = world.spawn(EntityKind::HostileNpc, Vec2::new(10.0, 20.0));
//!
//! let mut session = ClientSession::new(config);
//! for packet in world.snapshot() {
//!     session.handle_packet(&packet).unwrap();
//! }
//! assert_eq!(session.table().find(id).unwrap().pos(), Vec2::new(10.0, 20.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod client;
pub mod entity;
pub mod error;
pub mod protocol;
pub mod server;

pub use client::{ClientSession, Handled};
pub use entity::{
    Applied, DrainReport, Entity, EntityData, EntityId, EntityTable, ItemCode, Motion,
};
pub use error::{NetError, NetResult};
pub use protocol::{
    ChatMessage, InputCommand, LoginRequest, LoginResponse, MapData, PacketReader, PacketWriter,
};
pub use server::{check_login, LoginCheck, ServerWorld, SharedWorld, UpdateBroadcaster};
