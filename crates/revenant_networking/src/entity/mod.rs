//! # Entities
//!
//! Synchronized game objects and the table that owns them.

mod item;
mod table;
mod variant;

pub use item::ItemCode;
pub use table::{Applied, DrainReport, EntityTable};
pub use variant::{Entity, EntityData, Motion, DEFAULT_NPC_HEALTH};

/// Server-assigned entity identifier.
///
/// Distinct from the local [`Handle`](revenant_core::Handle) the table maps it onto.
pub type EntityId = u32;
