//! # Server Side
//!
//! Authoritative world, login gate and update broadcasting.
//!
//! ```text
//!  LogIn ──► check_login ──► LoginResponse
//!  Input ──► ServerWorld::apply_input
//!  tick  ──► ServerWorld::tick ──► UpdateBroadcaster ──► EntityUpdate packets
//! ```
//!
//! Accounts, sockets and connection lifecycles belong to the embedding
//! server; this module only turns bytes into state and back.

mod broadcast;
mod login;
mod world;

pub use broadcast::UpdateBroadcaster;
pub use login::{check_login, LoginCheck};
pub use world::{ServerWorld, SharedWorld};
