//! # Client Session
//!
//! Everything a client knows about the world, fed by packets from the
//! server.
//!
//! ```text
//!  bytes ──► handle_packet ──┬─ LoginStatus  ──► status, player id
//!                            ├─ EntityUpdate ──► EntityTable (drain)
//!                            ├─ MapData      ──► map + bounds (once)
//!                            ├─ ChatMessage  ──► inbox
//!                            └─ MultiPacket  ──► handle_packet (each)
//! ```
//!
//! Socket I/O is not done here: the caller reads frames from its transport
//! and hands the bytes over, on the thread that owns the session.

use std::collections::VecDeque;

use revenant_core::Handle;
use revenant_shared::{LoginStatus, PacketType, SyncConfig};

use crate::entity::{DrainReport, Entity, EntityId, EntityTable};
use crate::error::{NetError, NetResult};
use crate::protocol::{
    decode_multi_body, ChatMessage, LoginRequest, LoginResponse, MapData, PacketReader,
};

/// What [`ClientSession::handle_packet`] did with a packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handled {
    /// A login answer arrived.
    Login(LoginStatus),
    /// An entity update was drained.
    Entities(DrainReport),
    /// The map was loaded.
    MapLoaded,
    /// A map arrived while one was already loaded and was dropped.
    MapIgnored,
    /// A chat line was queued.
    Chat,
    /// A multi-packet was unpacked; holds the number of packets inside.
    Multi(usize),
}

/// Client-side session state.
#[derive(Debug)]
pub struct ClientSession {
    config: SyncConfig,
    table: EntityTable,
    status: Option<LoginStatus>,
    player_id: Option<EntityId>,
    local_player: Option<Handle>,
    map: Option<MapData>,
    chat: VecDeque<ChatMessage>,
}

impl ClientSession {
    /// Creates a disconnected session.
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            table: EntityTable::with_capacity(config.initial_capacity),
            config,
            status: None,
            player_id: None,
            local_player: None,
            map: None,
            chat: VecDeque::new(),
        }
    }

    /// Configuration the session was built with.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Entities known to this client.
    #[must_use]
    pub const fn table(&self) -> &EntityTable {
        &self.table
    }

    /// Builds a `LogIn` packet carrying this side's protocol version.
    #[must_use]
    pub fn login_packet(&self, username: &str, password: &str) -> Vec<u8> {
        self.credentials(username, password).encode(PacketType::LogIn)
    }

    /// Builds a `CreateAccount` packet carrying this side's protocol version.
    #[must_use]
    pub fn create_account_packet(&self, username: &str, password: &str) -> Vec<u8> {
        self.credentials(username, password)
            .encode(PacketType::CreateAccount)
    }

    fn credentials(&self, username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            protocol_version: self.config.protocol_version,
            username: username.to_owned(),
            password: password.to_owned(),
        }
    }

    /// Last login status received, if any.
    #[must_use]
    pub const fn login_status(&self) -> Option<LoginStatus> {
        self.status
    }

    /// True once the server accepted the login.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.status.is_some_and(LoginStatus::is_success)
    }

    /// Entity id the server assigned to this client's avatar.
    #[must_use]
    pub const fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    /// The avatar, once an update naming it has arrived.
    #[must_use]
    pub fn local_player(&self) -> Option<&Entity> {
        self.local_player.and_then(|handle| self.table.get(handle))
    }

    /// The map, once loaded.
    #[must_use]
    pub const fn map(&self) -> Option<&MapData> {
        self.map.as_ref()
    }

    /// Takes every queued chat line, oldest first.
    pub fn drain_chat(&mut self) -> impl Iterator<Item = ChatMessage> + '_ {
        self.chat.drain(..)
    }

    /// Decodes and applies one packet from the server.
    ///
    /// A failing entity segment is not an error here; it is reported in the
    /// returned [`DrainReport`].
    ///
    /// # Errors
    ///
    /// Returns an error for unknown or server-bound packet types, nested
    /// multi-packets, and malformed login, map or chat bodies. Packets
    /// bundled before a failing one stay applied.
    pub fn handle_packet(&mut self, bytes: &[u8]) -> NetResult<Handled> {
        self.dispatch(bytes, false)
    }

    fn dispatch(&mut self, bytes: &[u8], nested: bool) -> NetResult<Handled> {
        let mut reader = PacketReader::new(bytes);
        let packet_type = reader.read_packet_type()?;
        match packet_type {
            PacketType::LoginStatus => {
                let response = LoginResponse::decode_body(&mut reader)?;
                Ok(self.on_login(response))
            }
            PacketType::EntityUpdate => Ok(Handled::Entities(self.on_entity_update(&mut reader))),
            PacketType::MapData => self.on_map(&mut reader),
            PacketType::ChatMessage => {
                self.chat.push_back(ChatMessage::decode_body(&mut reader)?);
                Ok(Handled::Chat)
            }
            PacketType::MultiPacket if nested => Err(NetError::NestedMultiPacket),
            PacketType::MultiPacket => {
                let packets = decode_multi_body(&mut reader)?;
                for packet in &packets {
                    self.dispatch(packet, true)?;
                }
                Ok(Handled::Multi(packets.len()))
            }
            other => Err(NetError::UnexpectedPacket(other)),
        }
    }

    fn on_login(&mut self, response: LoginResponse) -> Handled {
        match response.status {
            LoginStatus::Successful => {
                tracing::info!("Logged in, player entity {:?}", response.player_id);
                self.player_id = response.player_id;
                self.local_player = None;
                self.resolve_local_player();
            }
            LoginStatus::ProtocolVersionMismatch => {
                tracing::warn!(
                    "Server rejected protocol version {}",
                    self.config.protocol_version
                );
            }
            status => tracing::info!("Login failed: {}", status),
        }
        self.status = Some(response.status);
        Handled::Login(response.status)
    }

    fn on_entity_update(&mut self, reader: &mut PacketReader<'_>) -> DrainReport {
        let report = self.table.drain_update_packet(reader);
        if report.applied >= self.config.log_drain_threshold {
            tracing::info!("Updated {} entities", report.applied);
        } else {
            tracing::debug!(
                "Updated {} entities ({} created)",
                report.applied,
                report.created
            );
        }
        self.resolve_local_player();
        report
    }

    fn on_map(&mut self, reader: &mut PacketReader<'_>) -> NetResult<Handled> {
        if self.map.is_some() {
            tracing::warn!("Map data received again, ignoring");
            return Ok(Handled::MapIgnored);
        }
        let map = MapData::decode_body(reader, self.config.max_map_tiles)?;
        let bounds = map.bounds(self.config.tile_size);
        tracing::info!(
            "Map loaded: {}x{} tiles ({}x{} units)",
            map.width,
            map.height,
            bounds.width,
            bounds.height
        );
        self.table.set_bounds(bounds);
        self.map = Some(map);
        Ok(Handled::MapLoaded)
    }

    /// Binds the avatar handle once the player's entity exists.
    fn resolve_local_player(&mut self) {
        let stale = self
            .local_player
            .map_or(true, |handle| self.table.get(handle).is_none());
        if stale {
            self.local_player = self.player_id.and_then(|id| self.table.handle_of(id));
        }
    }

    /// Advances every entity by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.table.update_all(dt);
    }

    /// Forgets everything learned from the server.
    pub fn disconnect(&mut self) {
        tracing::info!("Session closed, dropping {} entities", self.table.len());
        self.table.clear();
        self.status = None;
        self.player_id = None;
        self.local_player = None;
        self.map = None;
        self.chat.clear();
    }
}

impl Default for ClientSession {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}
