//! # Revenant Core
//!
//! Stable-handle object storage for the entity layer.
//!
//! - O(1) amortized insert, erase and lookup
//! - Dense, hole-free backing array for per-frame iteration
//! - Handles that never change while the storage relocates objects
//!
//! ## Architecture Rules
//!
//! 1. **No internal locking** - one owner per store, callers serialize access
//! 2. **No I/O** - nothing in this crate touches the network or disk
//! 3. **Never panics on bad handles** - except through `Index`, which is the
//!    unchecked fast path
//!
//! ## Example
//!
//! ```rust
//! use revenant_core::PackedStore;
//!
//! let mut store = PackedStore::new();
//! let id = store.allocate("zombie");
//! assert!(store.is_valid(id));
//! store.erase(id);
//! assert!(!store.is_valid(id));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;

pub use memory::{Handle, HandleIndex, PackedStore};
