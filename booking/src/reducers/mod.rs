//! Booking reducers.
//!
//! Pure functions: `(State, Action, Environment) → (State, Effects)`.
//! One sub-reducer per feature, combined by [`BookingReducer`], which
//! routes each action to the reducer that owns it.

pub mod profile;
pub mod reservations;
pub mod session;
pub mod sponsors;

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::providers::{IdentityProvider, RealtimeStore};
use crate::state::BookingState;
use quadra_core::SmallVec;
use quadra_core::effect::Effect;
use quadra_core::reducer::Reducer;

// Re-export
pub use profile::ProfileReducer;
pub use reservations::ReservationsReducer;
pub use session::SessionReducer;
pub use sponsors::SponsorsReducer;

/// Unified booking reducer.
///
/// Combines the session, reservation, profile, and sponsor flows into a
/// single reducer, routing actions by variant.
#[derive(Debug, Clone)]
pub struct BookingReducer<I, S> {
    session: SessionReducer<I, S>,
    reservations: ReservationsReducer<I, S>,
    profile: ProfileReducer<I, S>,
    sponsors: SponsorsReducer<I, S>,
}

impl<I, S> BookingReducer<I, S> {
    /// Create a new unified booking reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: SessionReducer::new(),
            reservations: ReservationsReducer::new(),
            profile: ProfileReducer::new(),
            sponsors: SponsorsReducer::new(),
        }
    }
}

impl<I, S> Default for BookingReducer<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S> Reducer for BookingReducer<I, S>
where
    I: IdentityProvider + Clone + 'static,
    S: RealtimeStore + Clone + 'static,
{
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment<I, S>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Session
            BookingAction::ObserveAuthState | BookingAction::AuthStateChanged { .. } => {
                self.session.reduce(state, action, env)
            },

            // Reservations
            BookingAction::SubscribeReservations
            | BookingAction::UnsubscribeReservations
            | BookingAction::ReservationsSnapshot { .. }
            | BookingAction::SubscriptionFailed { .. }
            | BookingAction::DraftEdited { .. }
            | BookingAction::BeginEdit { .. }
            | BookingAction::CancelEdit
            | BookingAction::SaveReservation
            | BookingAction::ReservationSaved { .. }
            | BookingAction::SaveFailed { .. }
            | BookingAction::DeleteReservation { .. }
            | BookingAction::ReservationDeleted { .. }
            | BookingAction::DeleteFailed { .. }
            | BookingAction::SearchChanged { .. } => self.reservations.reduce(state, action, env),

            // Profile
            BookingAction::RegisterProfile { .. }
            | BookingAction::ProfileSaved { .. }
            | BookingAction::ProfileSaveFailed { .. }
            | BookingAction::FetchProfile
            | BookingAction::ProfileLoaded { .. }
            | BookingAction::ProfileLoadFailed { .. } => self.profile.reduce(state, action, env),

            // Sponsors
            BookingAction::FetchSponsors
            | BookingAction::SponsorsLoaded { .. }
            | BookingAction::SponsorsLoadFailed { .. } => {
                self.sponsors.reduce(state, action, env)
            },
        }
    }
}
