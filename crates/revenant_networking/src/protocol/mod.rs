//! # Wire Protocol
//!
//! Byte-level layout of every packet exchanged between client and server.
//!
//! ## Packet Structure
//!
//! ```text
//! ┌──────────────────┬────────────────────────────────────────────┐
//! │ PacketType (i32) │ Body (layout depends on the type)          │
//! └──────────────────┴────────────────────────────────────────────┘
//!
//! EntityUpdate body, repeated until the packet is exhausted:
//! ┌───────────────┬───────────────┬──────────────────────────────┐
//! │ EntityId (u32)│ Kind (i32)    │ Kind-specific fields         │
//! └───────────────┴───────────────┴──────────────────────────────┘
//! ```
//!
//! There is no segment count and no length prefix per segment; a receiver
//! drains until the reader is exhausted.

mod cursor;
mod messages;

pub use cursor::{PacketReader, PacketWriter};
pub use messages::{
    angle_from_axes, decode_multi_body, empty_packet, encode_multi, ChatMessage, InputCommand,
    LoginRequest, LoginResponse, MapData,
};
