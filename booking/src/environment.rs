//! Booking environment.
//!
//! All external collaborators reach the reducers through this struct;
//! nothing in the crate touches a process-wide singleton. Tests inject
//! mocks, production wires the real store client and identity provider.

use crate::config::BookingConfig;
use crate::providers::{IdentityProvider, RealtimeStore};
use quadra_core::environment::Clock;
use std::sync::Arc;

/// Injected dependencies for the booking reducers.
///
/// # Type Parameters
///
/// - `I`: identity provider (current owner + auth-state stream)
/// - `S`: remote real-time store
#[derive(Clone)]
pub struct BookingEnvironment<I, S>
where
    I: IdentityProvider + Clone,
    S: RealtimeStore + Clone,
{
    /// Identity provider boundary.
    pub identity: I,

    /// Remote store boundary.
    pub store: S,

    /// Clock used to stamp registration dates.
    pub clock: Arc<dyn Clock>,

    /// Store layout configuration.
    pub config: BookingConfig,
}

impl<I, S> BookingEnvironment<I, S>
where
    I: IdentityProvider + Clone,
    S: RealtimeStore + Clone,
{
    /// Create a new booking environment.
    #[must_use]
    pub fn new(identity: I, store: S, clock: Arc<dyn Clock>, config: BookingConfig) -> Self {
        Self {
            identity,
            store,
            clock,
            config,
        }
    }
}
