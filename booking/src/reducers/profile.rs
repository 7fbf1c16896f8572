//! User profile reducer.
//!
//! Registration writes the full profile record to the owner's entry;
//! fetching resolves to `None` when no record exists (the login flow
//! treats that as "user not found"). Instagram input is normalised to a
//! bare handle before storage.

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::error::BookingError;
use crate::format::{format_phone, normalize_instagram_handle};
use crate::model::UserProfile;
use crate::providers::{IdentityProvider, RealtimeStore};
use crate::state::BookingState;
use quadra_core::effect::Effect;
use quadra_core::reducer::Reducer;
use quadra_core::{SmallVec, smallvec};
use std::marker::PhantomData;

/// User profile reducer.
#[derive(Debug, Clone)]
pub struct ProfileReducer<I, S> {
    _phantom: PhantomData<(I, S)>,
}

impl<I, S> ProfileReducer<I, S> {
    /// Create a new profile reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<I, S> Default for ProfileReducer<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S> Reducer for ProfileReducer<I, S>
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
            BookingAction::RegisterProfile { draft } => {
                let required = [("nome", &draft.name), ("email", &draft.email)];
                for (field, value) in required {
                    if value.trim().is_empty() {
                        state.profile.last_error =
                            Some(BookingError::MissingRequiredField { field });
                        return SmallVec::new();
                    }
                }

                let Some(owner) = state.session.current_user.clone() else {
                    tracing::warn!("Profile registration without an authenticated owner");
                    return SmallVec::new();
                };

                let phone = draft.phone.trim();
                let profile = UserProfile {
                    name: draft.name,
                    email: draft.email,
                    phone: (!phone.is_empty()).then(|| format_phone(phone)),
                    instagram: normalize_instagram_handle(&draft.instagram),
                    image_url: draft.image_url,
                };

                let value = match serde_json::to_value(&profile) {
                    Ok(value) => value,
                    Err(error) => {
                        state.profile.last_error = Some(BookingError::store(error.to_string()));
                        return SmallVec::new();
                    },
                };

                state.profile.saving = true;
                state.profile.last_error = None;

                let store = env.store.clone();
                let path = env.config.profile_entry(&owner);

                smallvec![Effect::Future(Box::pin(async move {
                    Some(match store.set(&path, &value).await {
                        Ok(()) => BookingAction::ProfileSaved { profile },
                        Err(error) => BookingAction::ProfileSaveFailed { error },
                    })
                }))]
            },

            BookingAction::ProfileSaved { profile } => {
                state.profile.saving = false;
                state.profile.profile = Some(profile);
                SmallVec::new()
            },

            BookingAction::ProfileSaveFailed { error } => {
                tracing::warn!(%error, "Profile write failed");
                state.profile.saving = false;
                state.profile.last_error = Some(error);
                SmallVec::new()
            },

            BookingAction::FetchProfile => {
                let Some(owner) = state.session.current_user.clone() else {
                    return SmallVec::new();
                };

                let store = env.store.clone();
                let path = env.config.profile_entry(&owner);

                smallvec![Effect::Future(Box::pin(async move {
                    Some(match store.get(&path).await {
                        Ok(Some(value)) => match serde_json::from_value::<UserProfile>(value) {
                            Ok(profile) => BookingAction::ProfileLoaded {
                                profile: Some(profile),
                            },
                            Err(error) => BookingAction::ProfileLoadFailed {
                                error: BookingError::MalformedRecord {
                                    path,
                                    reason: error.to_string(),
                                },
                            },
                        },
                        Ok(None) => BookingAction::ProfileLoaded { profile: None },
                        Err(error) => BookingAction::ProfileLoadFailed { error },
                    })
                }))]
            },

            BookingAction::ProfileLoaded { profile } => {
                state.profile.profile = profile;
                state.profile.loaded = true;
                SmallVec::new()
            },

            BookingAction::ProfileLoadFailed { error } => {
                tracing::warn!(%error, "Profile fetch failed");
                state.profile.last_error = Some(error);
                SmallVec::new()
            },

            _ => SmallVec::new(),
        }
    }
}
