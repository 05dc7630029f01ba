//! Network protocol enumerations shared between client and server.
//!
//! Every value here goes over the wire as an `i32` and must stay stable
//! across client and server builds. Changing any of them means bumping
//! [`PROTOCOL_VERSION`].

use serde::{Deserialize, Serialize};

/// Sent first in every login request; checked before anything else is read.
pub const PROTOCOL_VERSION: i32 = 2;

/// Packet type tags below this value are sent by the server; the rest by clients.
pub const CLIENT_BOUND_LIMIT: i32 = 6;

/// Packet type identifier, the leading `i32` of every packet.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    /// Server -> client: outcome of a login attempt
    LoginStatus = 1,
    /// Public, private and server chat lines
    ChatMessage = 2,
    /// Server -> client: entity segments until the packet is exhausted
    EntityUpdate = 3,
    /// Server -> client: logical tiles, sent once after login
    MapData = 4,
    /// Several packets bundled into one
    MultiPacket = 5,
    /// Client -> server: movement and aim
    Input = 7,
    /// Client -> server: log in to an account
    LogIn = 8,
    /// Client -> server: log out
    LogOut = 9,
    /// Client -> server: register a new account
    CreateAccount = 10,
    /// Client -> server: request the online player list
    GetPlayerList = 11,
    /// Client -> server: request server information
    GetServerInfo = 12,
}

impl PacketType {
    /// Every packet type, in tag order.
    pub const ALL: [Self; 11] = [
        Self::LoginStatus,
        Self::ChatMessage,
        Self::EntityUpdate,
        Self::MapData,
        Self::MultiPacket,
        Self::Input,
        Self::LogIn,
        Self::LogOut,
        Self::CreateAccount,
        Self::GetPlayerList,
        Self::GetServerInfo,
    ];

    /// Converts from the wire tag.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::LoginStatus),
            2 => Some(Self::ChatMessage),
            3 => Some(Self::EntityUpdate),
            4 => Some(Self::MapData),
            5 => Some(Self::MultiPacket),
            7 => Some(Self::Input),
            8 => Some(Self::LogIn),
            9 => Some(Self::LogOut),
            10 => Some(Self::CreateAccount),
            11 => Some(Self::GetPlayerList),
            12 => Some(Self::GetServerInfo),
            _ => None,
        }
    }

    /// True for packets a client is expected to receive.
    #[must_use]
    pub const fn is_client_bound(self) -> bool {
        (self as i32) < CLIENT_BOUND_LIMIT
    }
}

/// Login sub-status, carried by a [`PacketType::LoginStatus`] packet.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoginStatus {
    /// Logged in
    Successful = 1,
    /// No account with that name
    InvalidUsername = 2,
    /// Wrong password
    InvalidPassword = 3,
    /// Account is banned
    AccountBanned = 4,
    /// Account already has a live session
    AlreadyLoggedIn = 5,
    /// Client and server speak different protocol versions
    ProtocolVersionMismatch = 6,
    /// No answer in time
    Timeout = 7,
    /// Could not reach the server
    ErrorConnecting = 8,
    /// Anything else
    UnknownFailure = 9,
}

impl LoginStatus {
    /// Converts from the wire code.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Successful),
            2 => Some(Self::InvalidUsername),
            3 => Some(Self::InvalidPassword),
            4 => Some(Self::AccountBanned),
            5 => Some(Self::AlreadyLoggedIn),
            6 => Some(Self::ProtocolVersionMismatch),
            7 => Some(Self::Timeout),
            8 => Some(Self::ErrorConnecting),
            9 => Some(Self::UnknownFailure),
            _ => None,
        }
    }

    /// True only for [`LoginStatus::Successful`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Successful)
    }
}

impl std::fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Successful => "logged in successfully",
            Self::InvalidUsername => "invalid username",
            Self::InvalidPassword => "invalid password",
            Self::AccountBanned => "account is banned",
            Self::AlreadyLoggedIn => "already logged in",
            Self::ProtocolVersionMismatch => "protocol version mismatch",
            Self::Timeout => "timed out",
            Self::ErrorConnecting => "error connecting",
            Self::UnknownFailure => "unknown failure",
        };
        f.write_str(text)
    }
}

/// Chat message sub-type.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatKind {
    /// Everyone sees it
    Public = 1,
    /// Server announcement
    Server = 2,
    /// Whisper to one player
    Private = 3,
}

impl ChatKind {
    /// Converts from the wire code.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Public),
            2 => Some(Self::Server),
            3 => Some(Self::Private),
            _ => None,
        }
    }
}

/// Entity kind tag, selects the field layout of an entity segment.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A logged-in player
    Player = 0,
    /// Hostile NPC (zombie)
    HostileNpc = 1,
    /// Item lying on the ground
    Item = 2,
}

impl EntityKind {
    /// Converts from the wire tag.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Player),
            1 => Some(Self::HostileNpc),
            2 => Some(Self::Item),
            _ => None,
        }
    }

    /// Whether entities of this kind move on their own.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        matches!(self, Self::Player | Self::HostileNpc)
    }
}

/// Sub-type of an [`PacketType::Input`] packet.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    /// Start moving along an angle
    StartMoving = 0,
    /// Stop moving
    StopMoving = 1,
    /// Aim direction changed
    ChangeVisualAngle = 2,
}

impl InputKind {
    /// Converts from the wire code.
    #[must_use]
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::StartMoving),
            1 => Some(Self::StopMoving),
            2 => Some(Self::ChangeVisualAngle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_type_tags_roundtrip() {
        for packet_type in PacketType::ALL {
            assert_eq!(PacketType::from_i32(packet_type as i32), Some(packet_type));
        }
        assert_eq!(PacketType::from_i32(CLIENT_BOUND_LIMIT), None);
        assert_eq!(PacketType::from_i32(0), None);
    }

    #[test]
    fn test_client_bound_split() {
        assert!(PacketType::EntityUpdate.is_client_bound());
        assert!(PacketType::MultiPacket.is_client_bound());
        assert!(!PacketType::Input.is_client_bound());
        assert!(!PacketType::LogIn.is_client_bound());
    }

    #[test]
    fn test_login_status_codes() {
        assert_eq!(LoginStatus::from_i32(1), Some(LoginStatus::Successful));
        assert_eq!(LoginStatus::from_i32(9), Some(LoginStatus::UnknownFailure));
        assert_eq!(LoginStatus::from_i32(10), None);
        assert!(LoginStatus::Successful.is_success());
        assert!(!LoginStatus::Timeout.is_success());
    }

    #[test]
    fn test_entity_kind_tags() {
        assert_eq!(EntityKind::Player as i32, 0);
        assert_eq!(EntityKind::HostileNpc as i32, 1);
        assert_eq!(EntityKind::Item as i32, 2);
        assert_eq!(EntityKind::from_i32(3), None);
        assert!(EntityKind::Player.is_movable());
        assert!(!EntityKind::Item.is_movable());
    }
}
