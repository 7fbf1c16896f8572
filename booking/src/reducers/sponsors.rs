//! Sponsor list reducer.
//!
//! A one-shot read of the sponsor subtree, fetched once per screen mount;
//! no subscription. Failures only touch the sponsor state.

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::model::sponsors_from_snapshot;
use crate::providers::{IdentityProvider, RealtimeStore};
use crate::state::BookingState;
use quadra_core::effect::Effect;
use quadra_core::reducer::Reducer;
use quadra_core::{SmallVec, smallvec};
use std::marker::PhantomData;

/// Sponsor list reducer.
#[derive(Debug, Clone)]
pub struct SponsorsReducer<I, S> {
    _phantom: PhantomData<(I, S)>,
}

impl<I, S> SponsorsReducer<I, S> {
    /// Create a new sponsors reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<I, S> Default for SponsorsReducer<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S> Reducer for SponsorsReducer<I, S>
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
            BookingAction::FetchSponsors => {
                state.sponsors.loading = true;
                state.sponsors.last_error = None;

                let store = env.store.clone();
                let path = env.config.sponsors_path.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    Some(match store.get(&path).await {
                        Ok(snapshot) => BookingAction::SponsorsLoaded {
                            sponsors: sponsors_from_snapshot(snapshot.as_ref()),
                        },
                        Err(error) => BookingAction::SponsorsLoadFailed { error },
                    })
                }))]
            },

            BookingAction::SponsorsLoaded { sponsors } => {
                state.sponsors.loading = false;
                state.sponsors.sponsors = sponsors;
                SmallVec::new()
            },

            BookingAction::SponsorsLoadFailed { error } => {
                tracing::warn!(%error, "Sponsor fetch failed");
                state.sponsors.loading = false;
                state.sponsors.last_error = Some(error);
                SmallVec::new()
            },

            _ => SmallVec::new(),
        }
    }
}
