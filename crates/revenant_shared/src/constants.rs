//! # Network & World Constants
//!
//! Defaults baked into both client and server. Anything tunable per
//! deployment lives in [`SyncConfig`](crate::config::SyncConfig) instead.

// =============================================================================
// NETWORK CONFIGURATION
// =============================================================================

/// Maximum packet size (MTU-safe)
pub const MAX_PACKET_SIZE: usize = 1200;

// =============================================================================
// WORLD CONFIGURATION
// =============================================================================

/// Edge length of one map tile in position units
pub const TILE_SIZE: u32 = 32;

/// Largest map accepted from the network, in tiles
pub const MAX_MAP_TILES: u32 = 1 << 20;

/// Movement speed of a freshly created movable entity, in units per second
pub const DEFAULT_MOVE_SPEED: f32 = 100.0;

/// Initial reserve of the entity store
pub const DEFAULT_ENTITY_CAPACITY: usize = 256;

/// Drains touching at least this many entities are logged at info level
pub const DRAIN_LOG_THRESHOLD: usize = 10;
