//! Auth-session observation reducer.
//!
//! Bridges the identity provider boundary into the store: a cancellable
//! stream effect watches auth-state changes, and each change drives the
//! reservation subscription and profile fetch for the new owner. The
//! provider's internals (credentials, tokens) are none of our business —
//! only the owner id and its change stream are consumed.

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::providers::{IdentityProvider, RealtimeStore};
use crate::reducers::reservations::RESERVATIONS_WATCH;
use crate::state::{BookingState, ProfileState, ReservationsState};
use async_stream::stream;
use quadra_core::effect::{Effect, EffectId};
use quadra_core::reducer::Reducer;
use quadra_core::{SmallVec, smallvec};
use std::marker::PhantomData;

/// Cancellation key of the auth-state watch.
pub const AUTH_WATCH: &str = "auth-watch";

/// Auth-session observation reducer.
#[derive(Debug, Clone)]
pub struct SessionReducer<I, S> {
    _phantom: PhantomData<(I, S)>,
}

impl<I, S> SessionReducer<I, S> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<I, S> Default for SessionReducer<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S> Reducer for SessionReducer<I, S>
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
            BookingAction::ObserveAuthState => {
                let mut receiver = env.identity.subscribe();
                let changes = stream! {
                    let current = receiver.borrow().clone();
                    yield BookingAction::AuthStateChanged { user: current };
                    while receiver.changed().await.is_ok() {
                        let user = receiver.borrow_and_update().clone();
                        yield BookingAction::AuthStateChanged { user };
                    }
                };
                smallvec![Effect::Stream(Box::pin(changes)).cancellable(AUTH_WATCH)]
            },

            BookingAction::AuthStateChanged { user } => {
                state.session.resolved = true;
                if state.session.current_user == user {
                    return SmallVec::new();
                }
                state.session.current_user = user;

                if let Some(owner) = &state.session.current_user {
                    tracing::info!(%owner, "Owner signed in");
                    smallvec![
                        Effect::Future(Box::pin(async {
                            Some(BookingAction::SubscribeReservations)
                        })),
                        Effect::Future(Box::pin(async { Some(BookingAction::FetchProfile) })),
                    ]
                } else {
                    // Signed out: drop the private working set and detach
                    tracing::info!("Owner signed out");
                    state.reservations = ReservationsState {
                        loading: false,
                        ..ReservationsState::new()
                    };
                    state.profile = ProfileState::default();
                    smallvec![Effect::Cancel(EffectId::new(RESERVATIONS_WATCH))]
                }
            },

            _ => SmallVec::new(),
        }
    }
}
