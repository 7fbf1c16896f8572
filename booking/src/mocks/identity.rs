//! Mock identity provider.

use crate::model::UserId;
use crate::providers::IdentityProvider;
use std::sync::Arc;
use tokio::sync::watch;

/// Mock identity provider.
///
/// Holds the auth state in a watch channel; tests drive sign-in and
/// sign-out directly.
#[derive(Debug, Clone)]
pub struct MockIdentity {
    sender: Arc<watch::Sender<Option<UserId>>>,
}

impl MockIdentity {
    /// Create a signed-out mock.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Create a mock that starts signed in as `user`.
    #[must_use]
    pub fn with_user(user: UserId) -> Self {
        let (sender, _) = watch::channel(Some(user));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sign in as `user`, notifying subscribers.
    pub fn sign_in(&self, user: UserId) {
        let _ = self.sender.send(Some(user));
    }

    /// Sign out, notifying subscribers.
    pub fn sign_out(&self) {
        let _ = self.sender.send(None);
    }
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.sender.subscribe()
    }
}
