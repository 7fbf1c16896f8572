//! Provider traits for the external collaborators.
//!
//! The booking features depend on exactly two outside systems: an identity
//! provider (who is signed in) and a path-addressable remote real-time
//! store (where reservations live). Both are abstracted behind traits so
//! business logic runs at memory speed in tests.
//!
//! - [`IdentityProvider`]: current owner id + auth-state change stream
//! - [`RealtimeStore`]: point reads/writes/deletes and subtree subscriptions

pub mod identity;
pub mod store;

pub use identity::IdentityProvider;
pub use store::{RealtimeStore, SubtreeSnapshot, SubtreeWatch, WatchHandle};
