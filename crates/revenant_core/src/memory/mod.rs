//! # Memory Management
//!
//! Handle-addressed dense storage.
//!
//! ## Design Philosophy
//!
//! - Objects live in one contiguous array, never in holes
//! - The outside world holds handles, never references
//! - Handles survive internal relocation

mod handle;
mod index;
mod packed;

pub use handle::Handle;
pub use index::HandleIndex;
pub use packed::PackedStore;
