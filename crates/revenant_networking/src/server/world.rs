//! # Server World
//!
//! The authoritative entity table, plus id allocation and input handling.
//!
//! Connection workers share one world through [`SharedWorld`]; every access
//! goes through the mutex, the table itself does no locking.

use std::sync::Arc;

use parking_lot::Mutex;
use revenant_shared::{EntityKind, SyncConfig, Vec2};

use super::broadcast::UpdateBroadcaster;
use crate::entity::{EntityId, EntityTable};
use crate::protocol::{InputCommand, MapData};

/// A world shared between connection workers.
pub type SharedWorld = Arc<Mutex<ServerWorld>>;

/// Server-side entity state.
#[derive(Debug)]
pub struct ServerWorld {
    table: EntityTable,
    broadcaster: UpdateBroadcaster,
    next_id: EntityId,
    tile_size: u32,
}

impl ServerWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            table: EntityTable::with_capacity(config.initial_capacity),
            broadcaster: UpdateBroadcaster::new(),
            next_id: 0,
            tile_size: config.tile_size,
        }
    }

    /// Wraps the world for sharing across threads.
    #[must_use]
    pub fn into_shared(self) -> SharedWorld {
        Arc::new(Mutex::new(self))
    }

    /// The entity table.
    #[must_use]
    pub const fn table(&self) -> &EntityTable {
        &self.table
    }

    /// The entity table, mutably.
    pub fn table_mut(&mut self) -> &mut EntityTable {
        &mut self.table
    }

    /// Uses `map` for boundary reflection.
    pub fn set_map(&mut self, map: &MapData) {
        self.table.set_bounds(map.bounds(self.tile_size));
    }

    /// Creates an entity with a fresh id.
    ///
    /// Ids wrap around at `u32::MAX`; ids still in use are skipped.
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> EntityId {
        let mut id = self.next_id;
        while self.table.contains(id) {
            id = id.wrapping_add(1);
        }
        self.next_id = id.wrapping_add(1);
        self.table.find_or_create(id, kind).set_pos(pos);
        id
    }

    /// Removes an entity. Returns false if it did not exist.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.table.remove(id).is_some()
    }

    /// Applies a client's input to the entity it controls.
    ///
    /// Returns false if the entity is unknown or cannot move.
    pub fn apply_input(&mut self, player: EntityId, command: InputCommand) -> bool {
        let Some(motion) = self.table.find_mut(player).and_then(|e| e.motion_mut()) else {
            tracing::debug!("Input {:?} for unknown or static entity {}", command, player);
            return false;
        };
        match command {
            InputCommand::StartMoving { angle } => {
                motion.angle = angle;
                motion.moving = true;
            }
            InputCommand::StopMoving => motion.moving = false,
            InputCommand::ChangeVisualAngle { angle } => motion.visual_angle = angle,
        }
        true
    }

    /// Advances the simulation and returns the update packets to send.
    pub fn tick(&mut self, dt: f32) -> Vec<Vec<u8>> {
        self.table.update_all(dt);
        self.broadcaster.encode_updates(&mut self.table, true)
    }

    /// Full state for a client that just joined.
    pub fn snapshot(&mut self) -> Vec<Vec<u8>> {
        self.broadcaster.encode_updates(&mut self.table, false)
    }
}
