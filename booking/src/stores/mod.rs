//! Production store implementations.

pub mod firebase;

pub use firebase::{FirebaseStore, RemoteDbConfig};
