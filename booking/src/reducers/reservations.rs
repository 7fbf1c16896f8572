//! Reservation manager reducer.
//!
//! Mediates all reservation CRUD against the remote store for the current
//! owner, enforces the one-reservation-per-date rule, and keeps the live
//! list in sync with the store's subtree notifications.
//!
//! # Flow
//!
//! 1. `SubscribeReservations` opens a standing, cancellable subscription to
//!    the owner's subtree; every notification re-derives the full list
//! 2. The draft is edited through `DraftEdited` (input masks applied here)
//! 3. `SaveReservation` validates, then appends or overwrites-by-id
//! 4. `DeleteReservation` removes a single record
//!
//! Saves and deletes resolve on the write acknowledgement; the list view
//! updates independently when the next notification arrives, so callers
//! must not assume immediate list consistency.

use crate::actions::{BookingAction, DraftField};
use crate::environment::BookingEnvironment;
use crate::error::BookingError;
use crate::format::{
    format_currency, format_phone, format_registration_date, format_reservation_date,
};
use crate::model::{ReservationId, reservations_from_snapshot};
use crate::providers::{IdentityProvider, RealtimeStore};
use crate::state::{BookingState, FormPhase, ReservationDraft, ReservationsState};
use async_stream::stream;
use quadra_core::effect::{Effect, EffectId};
use quadra_core::reducer::Reducer;
use quadra_core::{SmallVec, smallvec};
use std::marker::PhantomData;

/// Cancellation key of the reservations subscription.
pub const RESERVATIONS_WATCH: &str = "reservations-watch";

/// Reservation manager reducer.
#[derive(Debug, Clone)]
pub struct ReservationsReducer<I, S> {
    _phantom: PhantomData<(I, S)>,
}

impl<I, S> ReservationsReducer<I, S> {
    /// Create a new reservations reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }

    /// Validate the draft before a write is attempted.
    ///
    /// Checks run in order and the first failure wins: required fields,
    /// then the duplicate-date rule. The date check scans the in-memory
    /// list only — it is best-effort, and two concurrent sessions can both
    /// pass it; the store applies no constraint of its own.
    fn validate(reservations: &ReservationsState) -> Result<(), BookingError> {
        let draft = &reservations.draft;
        let required = [
            ("customer_name", draft.customer_name.as_str()),
            ("date_of_reservation", draft.date_of_reservation.as_str()),
            ("customer_phone", draft.customer_phone.as_str()),
            ("responsible_staff", draft.responsible_staff.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BookingError::MissingRequiredField { field });
            }
        }

        if reservations.date_taken(&draft.date_of_reservation, reservations.editing.as_ref()) {
            return Err(BookingError::DuplicateDate {
                date: draft.date_of_reservation.clone(),
            });
        }

        Ok(())
    }
}

impl<I, S> Default for ReservationsReducer<I, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, S> Reducer for ReservationsReducer<I, S>
where
    I: IdentityProvider + Clone + 'static,
    S: RealtimeStore + Clone + 'static,
{
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment<I, S>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Live list
            // ═══════════════════════════════════════════════════════════
            BookingAction::SubscribeReservations => {
                let Some(owner) = state.session.current_user.clone() else {
                    // No owner, no subscription: resolve to an empty list
                    state.reservations.reservations.clear();
                    state.reservations.loading = false;
                    return SmallVec::new();
                };

                let store = env.store.clone();
                let path = env.config.reservations_subtree(&owner);
                let snapshots = stream! {
                    match store.watch(&path).await {
                        Ok(mut watch) => {
                            while let Some(snapshot) = watch.next().await {
                                yield BookingAction::ReservationsSnapshot {
                                    reservations: reservations_from_snapshot(snapshot.as_ref()),
                                };
                            }
                        },
                        Err(error) => {
                            yield BookingAction::SubscriptionFailed { error };
                        },
                    }
                };

                smallvec![Effect::Stream(Box::pin(snapshots)).cancellable(RESERVATIONS_WATCH)]
            },

            BookingAction::UnsubscribeReservations => {
                smallvec![Effect::Cancel(EffectId::new(RESERVATIONS_WATCH))]
            },

            BookingAction::ReservationsSnapshot { reservations } => {
                state.reservations.reservations = reservations;
                state.reservations.loading = false;
                SmallVec::new()
            },

            BookingAction::SubscriptionFailed { error } => {
                // Not reattached; the screen keeps whatever list it had
                tracing::warn!(%error, "Reservations subscription failed");
                state.reservations.loading = false;
                state.reservations.last_error = Some(error);
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════
            // Draft editing
            // ═══════════════════════════════════════════════════════════
            BookingAction::DraftEdited { field, value } => {
                let draft = &mut state.reservations.draft;
                match field {
                    DraftField::ReservationDate => {
                        draft.date_of_reservation = format_reservation_date(&value);
                    },
                    DraftField::CustomerName => draft.customer_name = value,
                    DraftField::CustomerPhone => draft.customer_phone = format_phone(&value),
                    DraftField::ReservationValue => {
                        draft.reservation_value = format_currency(&value);
                    },
                    DraftField::StaffName => draft.responsible_staff = value,
                }
                if state.reservations.form == FormPhase::Idle {
                    state.reservations.form = FormPhase::Editing;
                }
                SmallVec::new()
            },

            BookingAction::BeginEdit { id } => {
                let Some(reservation) = state.reservations.find(&id) else {
                    tracing::warn!(%id, "Begin-edit for a record not in the list");
                    return SmallVec::new();
                };
                state.reservations.draft = ReservationDraft::from_record(&reservation.record);
                state.reservations.editing = Some(id);
                state.reservations.form = FormPhase::Editing;
                state.reservations.last_error = None;
                SmallVec::new()
            },

            BookingAction::CancelEdit => {
                state.reservations.draft.clear();
                state.reservations.editing = None;
                state.reservations.form = FormPhase::Idle;
                state.reservations.last_error = None;
                SmallVec::new()
            },

            BookingAction::SearchChanged { term } => {
                state.reservations.search_term = term;
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════
            // Save
            // ═══════════════════════════════════════════════════════════
            BookingAction::SaveReservation => {
                if let Err(error) = Self::validate(&state.reservations) {
                    tracing::debug!(%error, "Rejected reservation save");
                    state.reservations.last_error = Some(error);
                    return SmallVec::new();
                }

                let Some(owner) = state.session.current_user.clone() else {
                    // The navigation layer never lets a signed-out user
                    // reach this screen; drop silently if it happens
                    tracing::warn!("Save requested without an authenticated owner");
                    return SmallVec::new();
                };

                let record = state
                    .reservations
                    .draft
                    .to_record(format_registration_date(env.clock.now()));
                let value = match serde_json::to_value(&record) {
                    Ok(value) => value,
                    Err(error) => {
                        state.reservations.last_error =
                            Some(BookingError::store(error.to_string()));
                        return SmallVec::new();
                    },
                };

                state.reservations.last_error = None;
                state.reservations.form = FormPhase::Submitting;

                let editing = state.reservations.editing.clone();
                let store = env.store.clone();
                let config = env.config.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    let result = match &editing {
                        Some(id) => store
                            .set(&config.reservation_entry(&owner, id), &value)
                            .await
                            .map(|()| id.clone()),
                        None => store
                            .push(&config.reservations_subtree(&owner), &value)
                            .await
                            .map(ReservationId::new),
                    };
                    Some(match result {
                        Ok(id) => BookingAction::ReservationSaved { id },
                        Err(error) => BookingAction::SaveFailed { error },
                    })
                }))]
            },

            BookingAction::ReservationSaved { id } => {
                tracing::debug!(%id, "Reservation write acknowledged");
                state.reservations.draft.clear();
                state.reservations.editing = None;
                state.reservations.form = FormPhase::Idle;
                state.reservations.last_error = None;
                SmallVec::new()
            },

            BookingAction::SaveFailed { error } => {
                // Draft stays intact so the user can resubmit
                tracing::warn!(%error, "Reservation write failed");
                state.reservations.form = FormPhase::Editing;
                state.reservations.last_error = Some(error);
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════
            // Delete
            // ═══════════════════════════════════════════════════════════
            BookingAction::DeleteReservation { id } => {
                let Some(owner) = state.session.current_user.clone() else {
                    tracing::warn!("Delete requested without an authenticated owner");
                    return SmallVec::new();
                };

                let store = env.store.clone();
                let path = env.config.reservation_entry(&owner, &id);

                smallvec![Effect::Future(Box::pin(async move {
                    Some(match store.remove(&path).await {
                        Ok(()) => BookingAction::ReservationDeleted { id },
                        Err(error) => BookingAction::DeleteFailed { error },
                    })
                }))]
            },

            BookingAction::ReservationDeleted { id } => {
                // The list itself updates with the next notification
                tracing::debug!(%id, "Reservation delete acknowledged");
                state.reservations.last_error = None;
                SmallVec::new()
            },

            BookingAction::DeleteFailed { error } => {
                tracing::warn!(%error, "Reservation delete failed");
                state.reservations.last_error = Some(error);
                SmallVec::new()
            },

            _ => SmallVec::new(),
        }
    }
}
