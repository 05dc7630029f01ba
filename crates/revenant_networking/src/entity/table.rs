//! # Entity Table
//!
//! Network entities keyed by server-assigned id, stored densely in a
//! [`PackedStore`].
//!
//! ```text
//! ids   : {42 -> 0v0, 7 -> 1v0, 900 -> 2v0}   (entity id -> handle)
//! store : [e42] [e7] [e900]                    (dense, iterate this)
//! ```
//!
//! Entity ids and handles are different namespaces: ids come from the
//! server and are sparse, handles are issued locally by the store.

use std::collections::HashMap;

use revenant_core::{Handle, PackedStore};
use revenant_shared::{EntityKind, MapBounds};

use super::variant::{Entity, EntityData};
use super::EntityId;
use crate::error::{NetError, NetResult};
use crate::protocol::PacketReader;

/// What a single update segment did to the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The id was unknown and a new entity was created.
    Created,
    /// An existing entity of the same kind was updated.
    Updated,
    /// The id was known under another kind; the entity was rebuilt.
    Replaced,
}

/// Outcome of draining one `EntityUpdate` packet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Segments applied to the table.
    pub applied: usize,
    /// Segments started, including the one that failed.
    pub attempted: usize,
    /// Entities created by this packet.
    pub created: usize,
    /// Why the rest of the packet was abandoned, if it was.
    pub failure: Option<NetError>,
}

impl DrainReport {
    /// True if every segment in the packet was applied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Entities owned by one session.
///
/// Lookups by id always validate the handle, so a stale or unknown id is a
/// `None`, never a panic.
#[derive(Clone, Debug, Default)]
pub struct EntityTable {
    store: PackedStore<Entity>,
    ids: HashMap<EntityId, Handle>,
    bounds: Option<MapBounds>,
}

impl EntityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: PackedStore::with_capacity(capacity),
            ids: HashMap::with_capacity(capacity),
            bounds: None,
        }
    }

    /// Map extent used to reflect movable entities, if a map is loaded.
    #[must_use]
    pub const fn bounds(&self) -> Option<MapBounds> {
        self.bounds
    }

    /// Sets the map extent.
    pub fn set_bounds(&mut self, bounds: MapBounds) {
        self.bounds = Some(bounds);
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True if no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// True if `id` designates a live entity.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.handle_of(id).is_some()
    }

    /// Local handle of an entity id.
    ///
    /// The handle stays valid until the entity is removed or the table is
    /// cleared, however the store reorders itself in between.
    #[must_use]
    pub fn handle_of(&self, id: EntityId) -> Option<Handle> {
        self.ids
            .get(&id)
            .copied()
            .filter(|&handle| self.store.is_valid(handle))
    }

    /// Entity behind a handle obtained from [`handle_of`](Self::handle_of).
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Entity> {
        self.store.get(handle)
    }

    /// Looks up an entity without creating it.
    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.ids.get(&id).and_then(|&handle| self.store.get(handle))
    }

    /// Looks up an entity mutably without creating it.
    pub fn find_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let handle = *self.ids.get(&id)?;
        self.store.get_mut(handle)
    }

    /// Returns the entity for `id`, creating a default one of `kind` first
    /// if the id is unknown.
    ///
    /// Calling this twice with the same id yields the same entity. If the id
    /// is known under another kind the entity is rebuilt as `kind`.
    pub fn find_or_create(&mut self, id: EntityId, kind: EntityKind) -> &mut Entity {
        let (handle, _) = self.resolve(id, kind);
        &mut self.store[handle]
    }

    /// Inserts a fully built entity, replacing any entity with the same id.
    pub fn insert(&mut self, entity: Entity) -> Handle {
        let id = entity.id();
        if let Some(handle) = self.handle_of(id) {
            self.store[handle] = entity;
            return handle;
        }
        let handle = self.store.allocate(entity);
        self.ids.insert(id, handle);
        tracing::debug!("Entity {} created (handle {})", id, handle);
        handle
    }

    /// Applies one update segment whose entity id has already been read.
    ///
    /// The reader must sit on the kind tag. Fields are decoded before the
    /// table is touched, so a failed segment never leaves a half-built
    /// entity behind.
    ///
    /// # Errors
    ///
    /// [`NetError::UnknownEntityKind`] for an unregistered kind tag, or any
    /// cursor error while reading the fields.
    pub fn apply_update(
        &mut self,
        id: EntityId,
        reader: &mut PacketReader<'_>,
    ) -> NetResult<Applied> {
        let code = reader.read_i32()?;
        let kind = EntityKind::from_i32(code).ok_or(NetError::UnknownEntityKind(code))?;

        if let Some(entity) = self.find_mut(id).filter(|e| e.kind() == kind) {
            entity.deserialize(reader)?;
            return Ok(Applied::Updated);
        }

        let (pos, data) = EntityData::decode(kind, reader)?;
        let (handle, created) = self.resolve(id, kind);
        self.store[handle].assign(pos, data);
        Ok(if created { Applied::Created } else { Applied::Replaced })
    }

    /// Drains an `EntityUpdate` body: `{id, kind, fields}` segments until
    /// the reader is exhausted, applied in wire order.
    ///
    /// The first failing segment abandons the rest of the packet, since the
    /// position of the next segment can no longer be trusted.
    pub fn drain_update_packet(&mut self, reader: &mut PacketReader<'_>) -> DrainReport {
        let mut report = DrainReport::default();
        while !reader.is_exhausted() {
            report.attempted += 1;
            let result = match reader.read_u32() {
                Ok(id) => self.apply_update(id, reader),
                Err(err) => Err(err),
            };
            match result {
                Ok(applied) => {
                    report.applied += 1;
                    if applied == Applied::Created {
                        report.created += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "Entity update abandoned after {} of {} segments: {}",
                        report.applied,
                        report.attempted,
                        err
                    );
                    report.failure = Some(err);
                    break;
                }
            }
        }
        report
    }

    /// Removes an entity. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let handle = self.ids.remove(&id)?;
        let entity = self.store.erase(handle)?;
        tracing::debug!("Entity {} removed", id);
        Some(entity)
    }

    /// Runs every entity's per-tick hook, in dense order.
    pub fn update_all(&mut self, dt: f32) {
        let bounds = self.bounds;
        for entity in &mut self.store {
            entity.update(dt, bounds);
        }
    }

    /// Drops every entity and forgets the map extent.
    ///
    /// Every id becomes unknown and every handle handed out becomes invalid.
    pub fn clear(&mut self) {
        self.store.clear();
        self.ids.clear();
        self.bounds = None;
    }

    /// Iterates live entities in dense order, for drawing.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.store.iter()
    }

    /// Iterates live entities mutably in dense order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.store.iter_mut()
    }

    /// Resolves `id` to a live handle holding a `kind` entity, creating or
    /// rebuilding as needed. The flag is true when a new entity was made.
    fn resolve(&mut self, id: EntityId, kind: EntityKind) -> (Handle, bool) {
        if let Some(handle) = self.handle_of(id) {
            let entity = &mut self.store[handle];
            if entity.kind() != kind {
                tracing::warn!(
                    "Entity {} changed kind from {:?} to {:?}, rebuilding",
                    id,
                    entity.kind(),
                    kind
                );
                *entity = Entity::new(id, kind);
            }
            return (handle, false);
        }
        let handle = self.store.allocate(Entity::new(id, kind));
        self.ids.insert(id, handle);
        tracing::debug!("Entity {} created as {:?} (handle {})", id, kind, handle);
        (handle, true)
    }
}

impl<'a> IntoIterator for &'a EntityTable {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DEFAULT_NPC_HEALTH;
    use crate::protocol::PacketWriter;
    use revenant_shared::Vec2;

    fn npc_segment(writer: &mut PacketWriter, id: EntityId, x: f32) {
        let mut npc = Entity::new(id, EntityKind::HostileNpc);
        npc.set_pos(Vec2::new(x, 0.0));
        npc.serialize(writer);
    }

    #[test]
    fn test_find_or_create_is_identity_preserving() {
        let mut table = EntityTable::new();
        table.find_or_create(5, EntityKind::Player).set_pos(Vec2::new(3.0, 4.0));
        let again = table.find_or_create(5, EntityKind::Player);
        assert_eq!(again.pos(), Vec2::new(3.0, 4.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_find_or_create_rebuilds_on_kind_change() {
        let mut table = EntityTable::new();
        table.find_or_create(5, EntityKind::Player);
        let handle = table.handle_of(5).unwrap();
        assert_eq!(table.find_or_create(5, EntityKind::Item).kind(), EntityKind::Item);
        assert_eq!(table.handle_of(5), Some(handle));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_keeps_other_ids_resolving() {
        let mut table = EntityTable::new();
        for id in [10, 20, 30] {
            table.find_or_create(id, EntityKind::Item).set_pos(Vec2::new(id as f32, 0.0));
        }
        let handle_30 = table.handle_of(30).unwrap();

        assert!(table.remove(10).is_some());
        assert!(table.remove(10).is_none());
        assert!(table.find(10).is_none());
        assert_eq!(table.find(20).unwrap().pos().x, 20.0);
        assert_eq!(table.get(handle_30).unwrap().pos().x, 30.0);
    }

    #[test]
    fn test_drain_counts_segments() {
        let mut writer = PacketWriter::new();
        for id in 0..5 {
            npc_segment(&mut writer, id, id as f32);
        }
        let bytes = writer.into_bytes();

        let mut table = EntityTable::new();
        let report = table.drain_update_packet(&mut PacketReader::new(&bytes));
        assert_eq!(report.applied, 5);
        assert_eq!(report.attempted, 5);
        assert_eq!(report.created, 5);
        assert!(report.is_complete());

        let report = table.drain_update_packet(&mut PacketReader::new(&bytes));
        assert_eq!(report.applied, 5);
        assert_eq!(report.created, 0);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_unknown_kind_abandons_packet() {
        let mut writer = PacketWriter::new();
        npc_segment(&mut writer, 1, 0.0);
        writer.write_u32(2);
        writer.write_i32(99);
        npc_segment(&mut writer, 3, 0.0);
        let bytes = writer.into_bytes();

        let mut table = EntityTable::new();
        let report = table.drain_update_packet(&mut PacketReader::new(&bytes));
        assert_eq!(report.applied, 1);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.failure, Some(NetError::UnknownEntityKind(99)));
        assert!(table.contains(1));
        assert!(!table.contains(2));
        assert!(!table.contains(3));
    }

    #[test]
    fn test_kind_change_over_wire_replaces_in_place() {
        let mut table = EntityTable::new();
        table.find_or_create(5, EntityKind::Player).set_pos(Vec2::new(1.0, 2.0));
        let handle = table.handle_of(5).unwrap();

        let mut item = Entity::new(5, EntityKind::Item);
        item.set_pos(Vec2::new(7.0, 8.0));
        let mut writer = PacketWriter::new();
        item.serialize(&mut writer);
        let bytes = writer.into_bytes();

        let mut reader = PacketReader::new(&bytes);
        let id = reader.read_u32().unwrap();
        assert_eq!(table.apply_update(id, &mut reader), Ok(Applied::Replaced));

        let report = table.drain_update_packet(&mut PacketReader::new(&bytes));
        assert!(report.is_complete());
        assert_eq!((report.applied, report.created), (1, 0));

        let entity = table.find(5).unwrap();
        assert_eq!(entity.kind(), EntityKind::Item);
        assert_eq!(entity.pos(), Vec2::new(7.0, 8.0));
        assert!(entity.motion().is_none());
        assert_eq!(table.handle_of(5), Some(handle));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_truncated_segment_leaves_known_entity_untouched() {
        let mut table = EntityTable::new();
        table.find_or_create(7, EntityKind::HostileNpc).set_pos(Vec2::new(1.0, 2.0));
        let handle = table.handle_of(7).unwrap();

        let mut update = Entity::new(7, EntityKind::HostileNpc);
        update.set_pos(Vec2::new(50.0, 0.0));
        if let EntityData::HostileNpc { motion, health } = update.data_mut() {
            motion.moving = true;
            *health = 5;
        }
        let mut writer = PacketWriter::new();
        update.serialize(&mut writer);
        let bytes = writer.into_bytes();
        let cut = &bytes[..bytes.len() - 2];

        let report = table.drain_update_packet(&mut PacketReader::new(cut));
        assert!(matches!(report.failure, Some(NetError::Truncated { .. })));
        assert_eq!((report.applied, report.attempted), (0, 1));

        let npc = table.find(7).unwrap();
        assert_eq!(npc.pos(), Vec2::new(1.0, 2.0));
        assert!(!npc.is_moving());
        assert!(matches!(
            npc.data(),
            EntityData::HostileNpc { health, .. } if *health == DEFAULT_NPC_HEALTH
        ));
        assert_eq!(table.handle_of(7), Some(handle));
    }

    #[test]
    fn test_truncated_kind_change_keeps_old_kind() {
        let mut table = EntityTable::new();
        table.find_or_create(3, EntityKind::Player).set_pos(Vec2::new(4.0, 4.0));
        let handle = table.handle_of(3).unwrap();

        let mut writer = PacketWriter::new();
        npc_segment(&mut writer, 3, 9.0);
        let bytes = writer.into_bytes();

        let cut = &bytes[..bytes.len() - 1];
        let report = table.drain_update_packet(&mut PacketReader::new(cut));
        assert!(matches!(report.failure, Some(NetError::Truncated { .. })));

        let player = table.find(3).unwrap();
        assert_eq!(player.kind(), EntityKind::Player);
        assert_eq!(player.pos(), Vec2::new(4.0, 4.0));
        assert_eq!(table.handle_of(3), Some(handle));
    }

    #[test]
    fn test_update_all_uses_bounds() {
        let mut table = EntityTable::new();
        table.set_bounds(MapBounds::new(50.0, 50.0));
        let npc = table.find_or_create(1, EntityKind::HostileNpc);
        npc.set_pos(Vec2::new(49.0, 25.0));
        npc.motion_mut().unwrap().moving = true;

        table.update_all(1.0);
        let npc = table.find(1).unwrap();
        assert_eq!(npc.pos().x, 50.0);
        assert_eq!(npc.motion().unwrap().angle, 90.0);
    }

    #[test]
    fn test_clear_twice() {
        let mut table = EntityTable::with_capacity(4);
        table.set_bounds(MapBounds::new(10.0, 10.0));
        table.find_or_create(1, EntityKind::Player);
        let handle = table.handle_of(1).unwrap();

        table.clear();
        table.clear();
        assert!(table.is_empty());
        assert!(table.find(1).is_none());
        assert!(table.get(handle).is_none());
        assert!(table.bounds().is_none());
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut table = EntityTable::new();
        let first = table.insert(Entity::new(8, EntityKind::Player));
        let second = table.insert(Entity::new(8, EntityKind::Item));
        assert_eq!(first, second);
        assert_eq!(table.find(8).unwrap().kind(), EntityKind::Item);
        assert_eq!(table.len(), 1);
    }
}
