//! # Entity Variant
//!
//! The object stored in the entity table. One closed set of kinds, each
//! owning its field layout and its per-tick behaviour.
//!
//! ## Field Layouts
//!
//! ```text
//! Player     : pos | angle | speed | moving | visual_angle | name (string)
//! HostileNpc : pos | angle | speed | moving | visual_angle | health (i32)
//! Item       : pos | item kind (i32) | item amount (i32)
//! ```

use revenant_shared::constants::DEFAULT_MOVE_SPEED;
use revenant_shared::{EntityKind, MapBounds, Vec2};

use super::item::ItemCode;
use super::EntityId;
use crate::error::NetResult;
use crate::protocol::{PacketReader, PacketWriter};

/// Health of a freshly created hostile NPC.
pub const DEFAULT_NPC_HEALTH: i32 = 100;

/// Movement state shared by every movable kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Heading in degrees.
    pub angle: f32,
    /// Units per second.
    pub speed: f32,
    /// Position only integrates while this is set.
    pub moving: bool,
    /// Aim in degrees, independent of the heading.
    pub visual_angle: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            angle: 0.0,
            speed: DEFAULT_MOVE_SPEED,
            moving: false,
            visual_angle: 0.0,
        }
    }
}

impl Motion {
    fn write(&self, writer: &mut PacketWriter) {
        writer.write_f32(self.angle);
        writer.write_f32(self.speed);
        writer.write_bool(self.moving);
        writer.write_f32(self.visual_angle);
    }

    fn read(reader: &mut PacketReader<'_>) -> NetResult<Self> {
        Ok(Self {
            angle: reader.read_f32()?,
            speed: reader.read_f32()?,
            moving: reader.read_bool()?,
            visual_angle: reader.read_f32()?,
        })
    }

    /// Integrates `pos` over `dt` seconds and reflects it off the map edge.
    fn advance(&mut self, pos: &mut Vec2, dt: f32, bounds: Option<MapBounds>) {
        *pos += Vec2::from_angle(self.angle) * (self.speed * dt);
        if let Some(bounds) = bounds.filter(|b| !b.contains(*pos)) {
            self.reflect(pos, bounds);
        }
    }

    /// Clamps each axis to `[0, extent]`, turning 90 degrees per clamp.
    fn reflect(&mut self, pos: &mut Vec2, bounds: MapBounds) {
        if pos.x < 0.0 {
            pos.x = 0.0;
            self.turn();
        }
        if pos.y < 0.0 {
            pos.y = 0.0;
            self.turn();
        }
        if pos.x >= bounds.width {
            pos.x = bounds.width;
            self.turn();
        }
        if pos.y >= bounds.height {
            pos.y = bounds.height;
            self.turn();
        }
    }

    fn turn(&mut self) {
        self.angle += 90.0;
        if self.angle > 360.0 {
            self.angle -= 360.0;
        }
    }
}

/// Kind-specific part of an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum EntityData {
    /// A logged-in player.
    Player {
        /// Movement state.
        motion: Motion,
        /// Display name.
        name: String,
    },
    /// A hostile NPC.
    HostileNpc {
        /// Movement state.
        motion: Motion,
        /// Remaining health.
        health: i32,
    },
    /// An item lying on the ground.
    Item {
        /// What it is.
        item: ItemCode,
    },
}

impl EntityData {
    /// Default fields for `kind`.
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        let data = match kind {
            EntityKind::Player => Self::Player {
                motion: Motion::default(),
                name: String::new(),
            },
            EntityKind::HostileNpc => Self::HostileNpc {
                motion: Motion::default(),
                health: DEFAULT_NPC_HEALTH,
            },
            EntityKind::Item => Self::Item {
                item: ItemCode::EMPTY,
            },
        };
        debug_assert_eq!(data.motion().is_some(), kind.is_movable());
        data
    }

    /// Wire tag of this kind.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Player { .. } => EntityKind::Player,
            Self::HostileNpc { .. } => EntityKind::HostileNpc,
            Self::Item { .. } => EntityKind::Item,
        }
    }

    /// Reads the position and the fields of a `kind` entity.
    ///
    /// Nothing is committed anywhere; on error the caller still holds its
    /// previous state.
    ///
    /// # Errors
    ///
    /// Propagates cursor errors ([`NetError::Truncated`](crate::NetError::Truncated),
    /// [`NetError::InvalidString`](crate::NetError::InvalidString)).
    pub fn decode(kind: EntityKind, reader: &mut PacketReader<'_>) -> NetResult<(Vec2, Self)> {
        let pos = reader.read_vec2()?;
        let data = match kind {
            EntityKind::Player => Self::Player {
                motion: Motion::read(reader)?,
                name: reader.read_string()?,
            },
            EntityKind::HostileNpc => Self::HostileNpc {
                motion: Motion::read(reader)?,
                health: reader.read_i32()?,
            },
            EntityKind::Item => Self::Item {
                item: ItemCode::new(reader.read_i32()?, reader.read_i32()?),
            },
        };
        Ok((pos, data))
    }

    fn write(&self, writer: &mut PacketWriter) {
        match self {
            Self::Player { motion, name } => {
                motion.write(writer);
                writer.write_string(name);
            }
            Self::HostileNpc { motion, health } => {
                motion.write(writer);
                writer.write_i32(*health);
            }
            Self::Item { item } => {
                writer.write_i32(item.kind);
                writer.write_i32(item.amount);
            }
        }
    }

    const fn motion(&self) -> Option<&Motion> {
        match self {
            Self::Player { motion, .. } | Self::HostileNpc { motion, .. } => Some(motion),
            Self::Item { .. } => None,
        }
    }

    fn motion_mut(&mut self) -> Option<&mut Motion> {
        match self {
            Self::Player { motion, .. } | Self::HostileNpc { motion, .. } => Some(motion),
            Self::Item { .. } => None,
        }
    }
}

/// A synchronized game object.
///
/// The kind never changes for the lifetime of an `Entity` value; the table
/// replaces the whole value when the server reuses an id for another kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    pos: Vec2,
    changed: bool,
    data: EntityData,
}

impl Entity {
    /// Creates an entity of `kind` with default fields at the origin.
    ///
    /// New entities start out changed so the next broadcast includes them.
    #[must_use]
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self::with_data(id, Vec2::ZERO, EntityData::new(kind))
    }

    /// Creates an entity from already decoded fields.
    #[must_use]
    pub const fn with_data(id: EntityId, pos: Vec2, data: EntityData) -> Self {
        Self {
            id,
            pos,
            changed: true,
            data,
        }
    }

    /// Network id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind tag.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.data.kind()
    }

    /// Position in map units.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Moves the entity without integrating.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
        self.changed = true;
    }

    /// Kind-specific fields.
    #[must_use]
    pub const fn data(&self) -> &EntityData {
        &self.data
    }

    /// Kind-specific fields, mutably. Marks the entity changed.
    pub fn data_mut(&mut self) -> &mut EntityData {
        self.changed = true;
        &mut self.data
    }

    /// Movement state, `None` for static kinds.
    #[must_use]
    pub const fn motion(&self) -> Option<&Motion> {
        self.data.motion()
    }

    /// Movement state, mutably. Marks the entity changed if movable.
    pub fn motion_mut(&mut self) -> Option<&mut Motion> {
        let motion = self.data.motion_mut()?;
        self.changed = true;
        Some(motion)
    }

    /// True if the entity is movable and currently moving.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.motion().is_some_and(|m| m.moving)
    }

    /// True if modified since the last broadcast.
    #[inline]
    #[must_use]
    pub const fn has_changed(&self) -> bool {
        self.changed
    }

    /// Sets or clears the changed flag.
    #[inline]
    pub fn set_changed(&mut self, changed: bool) {
        self.changed = changed;
    }

    /// Writes a full update segment: id, kind tag, then the fields.
    pub fn serialize(&self, writer: &mut PacketWriter) {
        writer.write_u32(self.id);
        writer.write_i32(self.kind() as i32);
        writer.write_vec2(self.pos);
        self.data.write(writer);
    }

    /// Reads this entity's fields (everything after the kind tag).
    ///
    /// Either every field is applied or none is.
    ///
    /// # Errors
    ///
    /// Propagates cursor errors; the entity is left untouched.
    pub fn deserialize(&mut self, reader: &mut PacketReader<'_>) -> NetResult<()> {
        let (pos, data) = EntityData::decode(self.kind(), reader)?;
        self.assign(pos, data);
        Ok(())
    }

    /// Replaces position and fields with values received from the wire.
    pub(crate) fn assign(&mut self, pos: Vec2, data: EntityData) {
        debug_assert_eq!(data.kind(), self.kind());
        self.pos = pos;
        self.data = data;
    }

    /// Per-tick hook. Static kinds do nothing; movable kinds integrate
    /// while moving and reflect off `bounds` when known.
    pub fn update(&mut self, dt: f32, bounds: Option<MapBounds>) {
        let Self { pos, data, changed, .. } = self;
        if let Some(motion) = data.motion_mut().filter(|m| m.moving) {
            motion.advance(pos, dt, bounds);
            *changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_npc(pos: Vec2, angle: f32) -> Entity {
        let mut npc = Entity::new(1, EntityKind::HostileNpc);
        npc.set_pos(pos);
        let motion = npc.motion_mut().unwrap();
        motion.angle = angle;
        motion.moving = true;
        npc
    }

    #[test]
    fn test_defaults_per_kind() {
        let player = Entity::new(3, EntityKind::Player);
        assert_eq!(player.kind(), EntityKind::Player);
        assert_eq!(player.motion().unwrap().speed, DEFAULT_MOVE_SPEED);
        assert!(!player.is_moving());
        assert!(player.has_changed());

        let item = Entity::new(4, EntityKind::Item);
        assert!(item.motion().is_none());
        assert_eq!(item.data(), &EntityData::Item { item: ItemCode::EMPTY });
    }

    #[test]
    fn test_segment_layout() {
        let mut item = Entity::new(9, EntityKind::Item);
        item.set_pos(Vec2::new(1.0, 2.0));
        *item.data_mut() = EntityData::Item {
            item: ItemCode::new(5, 3),
        };

        let mut writer = PacketWriter::new();
        item.serialize(&mut writer);
        // id + kind + pos + kind + amount
        assert_eq!(writer.len(), 4 + 4 + 8 + 4 + 4);

        let bytes = writer.into_bytes();
        let mut reader = PacketReader::new(&bytes);
        assert_eq!(reader.read_u32().unwrap(), 9);
        assert_eq!(reader.read_i32().unwrap(), EntityKind::Item as i32);

        let mut copy = Entity::new(9, EntityKind::Item);
        copy.deserialize(&mut reader).unwrap();
        assert!(reader.is_exhausted());
        assert_eq!(copy.pos(), Vec2::new(1.0, 2.0));
        assert_eq!(copy.data(), item.data());
    }

    #[test]
    fn test_truncated_fields_leave_entity_untouched() {
        let mut player = Entity::new(1, EntityKind::Player);
        *player.data_mut() = EntityData::Player {
            motion: Motion::default(),
            name: "ash".into(),
        };
        let mut writer = PacketWriter::new();
        player.serialize(&mut writer);
        let mut bytes = writer.into_bytes();
        bytes.truncate(bytes.len() - 1);

        let mut target = Entity::new(1, EntityKind::Player);
        let mut reader = PacketReader::new(&bytes[8..]);
        assert!(target.deserialize(&mut reader).is_err());
        assert_eq!(target, Entity::new(1, EntityKind::Player));
    }

    #[test]
    fn test_static_kinds_do_not_move() {
        let mut item = Entity::new(2, EntityKind::Item);
        item.set_pos(Vec2::new(5.0, 5.0));
        item.set_changed(false);
        item.update(1.0, None);
        assert_eq!(item.pos(), Vec2::new(5.0, 5.0));
        assert!(!item.has_changed());
    }

    #[test]
    fn test_stopped_entity_does_not_move() {
        let mut npc = moving_npc(Vec2::new(10.0, 10.0), 0.0);
        npc.motion_mut().unwrap().moving = false;
        npc.update(1.0, None);
        assert_eq!(npc.pos(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_integration_along_heading() {
        let mut npc = moving_npc(Vec2::new(10.0, 10.0), 90.0);
        npc.update(0.5, None);
        assert!((npc.pos().x - 10.0).abs() < 1e-3);
        assert!((npc.pos().y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_reflection_at_left_edge() {
        let mut npc = moving_npc(Vec2::new(-5.0, 20.0), 0.0);
        npc.update(0.01, Some(MapBounds::new(100.0, 100.0)));
        assert_eq!(npc.pos().x, 0.0);
        assert_eq!(npc.motion().unwrap().angle, 90.0);
    }

    #[test]
    fn test_reflection_at_far_corner_wraps_heading() {
        let mut npc = moving_npc(Vec2::new(99.0, 99.0), 315.0);
        npc.motion_mut().unwrap().speed = 1000.0;
        npc.update(1.0, Some(MapBounds::new(100.0, 100.0)));
        // y clamps first (315 -> 45), then x (45 -> 135).
        assert_eq!(npc.motion().unwrap().angle, 135.0);
    }

    #[test]
    fn test_far_edge_is_outside() {
        let bounds = Some(MapBounds::new(100.0, 100.0));
        let mut npc = moving_npc(Vec2::new(90.0, 10.0), 0.0);
        npc.motion_mut().unwrap().speed = 10.0;
        npc.update(0.5, bounds);
        assert_eq!(npc.pos().x, 95.0);
        assert_eq!(npc.motion().unwrap().angle, 0.0);

        npc.update(0.5, bounds);
        assert_eq!(npc.pos().x, 100.0);
        assert_eq!(npc.motion().unwrap().angle, 90.0);
    }

    #[test]
    fn test_no_bounds_no_reflection() {
        let mut npc = moving_npc(Vec2::new(-5.0, 20.0), 180.0);
        npc.update(0.1, None);
        assert!(npc.pos().x < -5.0);
        assert_eq!(npc.motion().unwrap().angle, 180.0);
    }
}
