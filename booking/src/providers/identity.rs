//! Identity provider trait.

use crate::model::UserId;
use tokio::sync::watch;

/// Identity provider boundary.
///
/// Supplies the stable id of the authenticated principal and a stream of
/// auth-state changes. The booking features never manage login or logout
/// themselves; they only react to what this provider reports.
pub trait IdentityProvider: Send + Sync {
    /// Current owner id, `None` while signed out.
    fn current_user(&self) -> Option<UserId>;

    /// Subscribe to auth-state changes.
    ///
    /// The receiver's current value is the present auth state; every
    /// subsequent sign-in or sign-out is observable via `changed`.
    /// Dropping the receiver detaches the listener.
    fn subscribe(&self) -> watch::Receiver<Option<UserId>>;
}
