//! # Message Shapes
//!
//! Bodies of every packet type except `EntityUpdate`, whose segments are
//! owned by the entity layer.
//!
//! Each `encode` produces a complete packet (type tag first). Each
//! `decode_body` expects the reader to sit just after the tag.

use revenant_shared::{ChatKind, InputKind, LoginStatus, MapBounds, PacketType};

use super::cursor::{PacketReader, PacketWriter};
use crate::entity::EntityId;
use crate::error::{NetError, NetResult};

/// Builds a packet that has no body (`LogOut`, `GetPlayerList`, ...).
#[must_use]
pub fn empty_packet(packet_type: PacketType) -> Vec<u8> {
    PacketWriter::packet(packet_type).into_bytes()
}

/// Credentials sent with `LogIn` and `CreateAccount`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginRequest {
    /// Protocol version of the client, always the first field.
    pub protocol_version: i32,
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl LoginRequest {
    /// Encodes as a packet of the given type (`LogIn` or `CreateAccount`).
    #[must_use]
    pub fn encode(&self, packet_type: PacketType) -> Vec<u8> {
        debug_assert!(matches!(
            packet_type,
            PacketType::LogIn | PacketType::CreateAccount
        ));
        let mut writer = PacketWriter::packet(packet_type);
        writer.write_i32(self.protocol_version);
        writer.write_string(&self.username);
        writer.write_string(&self.password);
        writer.into_bytes()
    }

    /// Decodes the body, checking the version before reading anything else.
    ///
    /// # Errors
    ///
    /// [`NetError::ProtocolMismatch`] if the version differs from
    /// `expected_version`; the credentials are then left unread.
    pub fn decode_body(reader: &mut PacketReader<'_>, expected_version: i32) -> NetResult<Self> {
        let protocol_version = reader.read_i32()?;
        if protocol_version != expected_version {
            return Err(NetError::ProtocolMismatch {
                expected: expected_version,
                received: protocol_version,
            });
        }
        Ok(Self {
            protocol_version,
            username: reader.read_string()?,
            password: reader.read_string()?,
        })
    }
}

/// Server answer to a login attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    /// Outcome.
    pub status: LoginStatus,
    /// Entity id of the player's avatar, present only on success.
    pub player_id: Option<EntityId>,
}

impl LoginResponse {
    /// A successful login controlling `player_id`.
    #[must_use]
    pub const fn success(player_id: EntityId) -> Self {
        Self {
            status: LoginStatus::Successful,
            player_id: Some(player_id),
        }
    }

    /// A failed login.
    #[must_use]
    pub const fn failure(status: LoginStatus) -> Self {
        Self {
            status,
            player_id: None,
        }
    }

    /// Encodes as a `LoginStatus` packet.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = PacketWriter::packet(PacketType::LoginStatus);
        writer.write_i32(self.status as i32);
        if let (true, Some(id)) = (self.status.is_success(), self.player_id) {
            writer.write_u32(id);
        }
        writer.into_bytes()
    }

    /// Decodes the body. A successful status without a trailing id is
    /// accepted with `player_id: None`.
    ///
    /// # Errors
    ///
    /// [`NetError::UnknownLoginStatus`] or [`NetError::Truncated`].
    pub fn decode_body(reader: &mut PacketReader<'_>) -> NetResult<Self> {
        let code = reader.read_i32()?;
        let status = LoginStatus::from_i32(code).ok_or(NetError::UnknownLoginStatus(code))?;
        let player_id = if status.is_success() && !reader.is_exhausted() {
            Some(reader.read_u32()?)
        } else {
            None
        };
        Ok(Self { status, player_id })
    }
}

/// Logical tile map, sent once per session after login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapData {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Row-major tile ids, `width * height` of them.
    pub tiles: Vec<u8>,
}

impl MapData {
    /// Creates a map filled with one tile id.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile: u8) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width as usize * height as usize],
        }
    }

    /// Tile id at `(x, y)`.
    #[must_use]
    pub fn tile(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Extent in position units.
    #[must_use]
    pub fn bounds(&self, tile_size: u32) -> MapBounds {
        let tile = tile_size as f32;
        MapBounds::new(self.width as f32 * tile, self.height as f32 * tile)
    }

    /// Encodes as a `MapData` packet.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        debug_assert_eq!(self.tiles.len(), self.width as usize * self.height as usize);
        let mut writer = PacketWriter::with_capacity(12 + self.tiles.len());
        writer.write_packet_type(PacketType::MapData);
        writer.write_u32(self.width);
        writer.write_u32(self.height);
        writer.write_bytes(&self.tiles);
        writer.into_bytes()
    }

    /// Decodes the body.
    ///
    /// # Errors
    ///
    /// [`NetError::MapTooLarge`] if `width * height` exceeds `max_tiles`,
    /// [`NetError::Truncated`] if the tiles are cut short.
    pub fn decode_body(reader: &mut PacketReader<'_>, max_tiles: u32) -> NetResult<Self> {
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let count = u64::from(width) * u64::from(height);
        if count > u64::from(max_tiles) {
            return Err(NetError::MapTooLarge { width, height });
        }
        let tiles = reader.read_bytes(count as usize)?.to_vec();
        Ok(Self {
            width,
            height,
            tiles,
        })
    }
}

/// One chat line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Public, server or private.
    pub kind: ChatKind,
    /// Who said it (empty for server messages).
    pub sender: String,
    /// What was said.
    pub text: String,
}

impl ChatMessage {
    /// Encodes as a `ChatMessage` packet.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = PacketWriter::packet(PacketType::ChatMessage);
        writer.write_i32(self.kind as i32);
        writer.write_string(&self.sender);
        writer.write_string(&self.text);
        writer.into_bytes()
    }

    /// Decodes the body.
    ///
    /// # Errors
    ///
    /// [`NetError::UnknownChatKind`], [`NetError::Truncated`] or
    /// [`NetError::InvalidString`].
    pub fn decode_body(reader: &mut PacketReader<'_>) -> NetResult<Self> {
        let code = reader.read_i32()?;
        let kind = ChatKind::from_i32(code).ok_or(NetError::UnknownChatKind(code))?;
        Ok(Self {
            kind,
            sender: reader.read_string()?,
            text: reader.read_string()?,
        })
    }
}

/// Player input carried by an `Input` packet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputCommand {
    /// Start moving along `angle` degrees.
    StartMoving {
        /// Heading in degrees.
        angle: f32,
    },
    /// Stop moving.
    StopMoving,
    /// Aim changed.
    ChangeVisualAngle {
        /// Aim in degrees.
        angle: f32,
    },
}

impl InputCommand {
    /// Wire sub-type.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        match self {
            Self::StartMoving { .. } => InputKind::StartMoving,
            Self::StopMoving => InputKind::StopMoving,
            Self::ChangeVisualAngle { .. } => InputKind::ChangeVisualAngle,
        }
    }

    /// Encodes as an `Input` packet.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = PacketWriter::packet(PacketType::Input);
        writer.write_i32(self.kind() as i32);
        match *self {
            Self::StartMoving { angle } | Self::ChangeVisualAngle { angle } => {
                writer.write_f32(angle);
            }
            Self::StopMoving => {}
        }
        writer.into_bytes()
    }

    /// Decodes the body.
    ///
    /// # Errors
    ///
    /// [`NetError::UnknownInputKind`] or [`NetError::Truncated`].
    pub fn decode_body(reader: &mut PacketReader<'_>) -> NetResult<Self> {
        let code = reader.read_i32()?;
        match InputKind::from_i32(code) {
            Some(InputKind::StartMoving) => Ok(Self::StartMoving {
                angle: reader.read_f32()?,
            }),
            Some(InputKind::StopMoving) => Ok(Self::StopMoving),
            Some(InputKind::ChangeVisualAngle) => Ok(Self::ChangeVisualAngle {
                angle: reader.read_f32()?,
            }),
            None => Err(NetError::UnknownInputKind(code)),
        }
    }
}

/// Heading for a pressed direction pad, `x` and `y` each in `-1..=1`.
///
/// `y` grows downwards. Returns `None` when nothing is pressed.
#[must_use]
pub fn angle_from_axes(x: i32, y: i32) -> Option<f32> {
    let (x, y) = (x.signum(), y.signum());
    if x == 0 && y == 0 {
        return None;
    }
    let degrees = if y == 0 {
        90 - 90 * x
    } else {
        y * 90 - y * x * 45
    };
    Some(degrees as f32)
}

/// Bundles complete packets into one `MultiPacket`.
#[must_use]
pub fn encode_multi<P: AsRef<[u8]>>(packets: &[P]) -> Vec<u8> {
    let mut writer = PacketWriter::packet(PacketType::MultiPacket);
    for packet in packets {
        let bytes = packet.as_ref();
        debug_assert!(u32::try_from(bytes.len()).is_ok());
        writer.write_u32(bytes.len() as u32);
        writer.write_bytes(bytes);
    }
    writer.into_bytes()
}

/// Splits a `MultiPacket` body into its packets, in wire order.
///
/// # Errors
///
/// [`NetError::Truncated`] if a length prefix overruns the packet.
pub fn decode_multi_body<'a>(reader: &mut PacketReader<'a>) -> NetResult<Vec<&'a [u8]>> {
    let mut packets = Vec::new();
    while !reader.is_exhausted() {
        let len = reader.read_u32()? as usize;
        packets.push(reader.read_bytes(len)?);
    }
    Ok(packets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use revenant_shared::PROTOCOL_VERSION;

    fn body(packet: &[u8], expected: PacketType) -> PacketReader<'_> {
        let mut reader = PacketReader::new(packet);
        assert_eq!(reader.read_packet_type().unwrap(), expected);
        reader
    }

    #[test]
    fn test_login_request_version_checked_first() {
        let request = LoginRequest {
            protocol_version: PROTOCOL_VERSION + 1,
            username: "ash".into(),
            password: "hunter2".into(),
        };
        let packet = request.encode(PacketType::LogIn);
        let mut reader = body(&packet, PacketType::LogIn);

        let err = LoginRequest::decode_body(&mut reader, PROTOCOL_VERSION).unwrap_err();
        assert_eq!(
            err,
            NetError::ProtocolMismatch {
                expected: PROTOCOL_VERSION,
                received: PROTOCOL_VERSION + 1,
            }
        );
        // Only the tag and the version were consumed.
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_login_request_accepted() {
        let request = LoginRequest {
            protocol_version: PROTOCOL_VERSION,
            username: "ash".into(),
            password: "hunter2".into(),
        };
        let packet = request.encode(PacketType::CreateAccount);
        let mut reader = body(&packet, PacketType::CreateAccount);
        assert_eq!(LoginRequest::decode_body(&mut reader, PROTOCOL_VERSION).unwrap(), request);
    }

    #[test]
    fn test_login_response_id_only_on_success() {
        let ok = LoginResponse::success(42).encode();
        let mut reader = body(&ok, PacketType::LoginStatus);
        assert_eq!(LoginResponse::decode_body(&mut reader).unwrap(), LoginResponse::success(42));

        let banned = LoginResponse::failure(LoginStatus::AccountBanned).encode();
        assert_eq!(banned.len(), 8);
        let mut reader = body(&banned, PacketType::LoginStatus);
        let decoded = LoginResponse::decode_body(&mut reader).unwrap();
        assert_eq!(decoded.status, LoginStatus::AccountBanned);
        assert_eq!(decoded.player_id, None);
    }

    #[test]
    fn test_login_response_unknown_status() {
        let mut writer = PacketWriter::packet(PacketType::LoginStatus);
        writer.write_i32(77);
        let packet = writer.into_bytes();
        let mut reader = body(&packet, PacketType::LoginStatus);
        assert_eq!(LoginResponse::decode_body(&mut reader), Err(NetError::UnknownLoginStatus(77)));
    }

    #[test]
    fn test_map_data_limits() {
        let map = MapData::filled(4, 3, 7);
        let packet = map.encode();

        let mut reader = body(&packet, PacketType::MapData);
        assert_eq!(MapData::decode_body(&mut reader, 12).unwrap(), map);

        let mut reader = body(&packet, PacketType::MapData);
        assert_eq!(
            MapData::decode_body(&mut reader, 11),
            Err(NetError::MapTooLarge { width: 4, height: 3 })
        );

        assert_eq!(map.tile(3, 2), Some(7));
        assert_eq!(map.tile(4, 0), None);
        assert_eq!(map.bounds(32), MapBounds::new(128.0, 96.0));
    }

    #[test]
    fn test_chat_message() {
        let chat = ChatMessage {
            kind: ChatKind::Private,
            sender: "ash".into(),
            text: "behind you".into(),
        };
        let packet = chat.encode();
        let mut reader = body(&packet, PacketType::ChatMessage);
        assert_eq!(ChatMessage::decode_body(&mut reader).unwrap(), chat);
    }

    #[test]
    fn test_input_commands() {
        for command in [
            InputCommand::StartMoving { angle: 45.0 },
            InputCommand::StopMoving,
            InputCommand::ChangeVisualAngle { angle: -30.0 },
        ] {
            let packet = command.encode();
            let mut reader = body(&packet, PacketType::Input);
            assert_eq!(InputCommand::decode_body(&mut reader).unwrap(), command);
            assert!(reader.is_exhausted());
        }
    }

    #[test]
    fn test_angle_from_axes() {
        assert_eq!(angle_from_axes(0, 0), None);
        assert_eq!(angle_from_axes(1, 0), Some(0.0));
        assert_eq!(angle_from_axes(-1, 0), Some(180.0));
        assert_eq!(angle_from_axes(0, 1), Some(90.0));
        assert_eq!(angle_from_axes(0, -1), Some(-90.0));
        assert_eq!(angle_from_axes(1, 1), Some(45.0));
        assert_eq!(angle_from_axes(1, -1), Some(-45.0));
        assert_eq!(angle_from_axes(-1, 1), Some(135.0));
    }

    #[test]
    fn test_multi_packet_split() {
        let first = empty_packet(PacketType::LogOut);
        let second = ChatMessage {
            kind: ChatKind::Server,
            sender: String::new(),
            text: "restart in 5".into(),
        }
        .encode();
        let bundle = encode_multi(&[first.clone(), second.clone()]);

        let mut reader = body(&bundle, PacketType::MultiPacket);
        let parts = decode_multi_body(&mut reader).unwrap();
        assert_eq!(parts, vec![first.as_slice(), second.as_slice()]);
    }

    #[test]
    fn test_multi_packet_overrun() {
        let mut writer = PacketWriter::packet(PacketType::MultiPacket);
        writer.write_u32(100);
        writer.write_bytes(&[1, 2, 3]);
        let packet = writer.into_bytes();
        let mut reader = body(&packet, PacketType::MultiPacket);
        assert!(matches!(decode_multi_body(&mut reader), Err(NetError::Truncated { .. })));
    }
}
