//! Booking actions.
//!
//! A single flat action enum covers every feature; the root reducer routes
//! each variant to its sub-reducer. Commands express user intent; the
//! remaining variants are produced by effects (store acknowledgements,
//! subtree notifications, auth-state changes).

use crate::error::BookingError;
use crate::model::{ProfileDraft, Reservation, ReservationId, Sponsor, UserId, UserProfile};

/// Which draft field a form edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    /// Reserved date; input is run through the date mask.
    ReservationDate,
    /// Customer's name; stored as typed.
    CustomerName,
    /// Customer's phone; input is run through the phone mask.
    CustomerPhone,
    /// Reservation value; input is run through the currency mask.
    ReservationValue,
    /// Responsible staff member; stored as typed.
    StaffName,
}

/// All inputs to the booking reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    // ═══════════════════════════════════════════════════════════════
    // Session
    // ═══════════════════════════════════════════════════════════════
    /// Command: start observing the identity provider's auth state.
    ObserveAuthState,

    /// The identity provider reported a (possibly unchanged) auth state.
    AuthStateChanged {
        /// Current owner, `None` when signed out.
        user: Option<UserId>,
    },

    // ═══════════════════════════════════════════════════════════════
    // Reservations: live list
    // ═══════════════════════════════════════════════════════════════
    /// Command: open the live subscription to the owner's reservations.
    ///
    /// Without an authenticated owner this resolves to an empty list and
    /// opens nothing.
    SubscribeReservations,

    /// Command: detach the reservations subscription.
    UnsubscribeReservations,

    /// A subtree notification delivered the full current list.
    ReservationsSnapshot {
        /// Derived list, newest first.
        reservations: Vec<Reservation>,
    },

    /// Opening the subscription failed; it is not reattached.
    SubscriptionFailed {
        /// The reported failure.
        error: BookingError,
    },

    // ═══════════════════════════════════════════════════════════════
    // Reservations: form
    // ═══════════════════════════════════════════════════════════════
    /// Command: the user edited a draft field.
    DraftEdited {
        /// The targeted field.
        field: DraftField,
        /// Raw input; masks are applied by the reducer.
        value: String,
    },

    /// Command: load an existing record into the draft for editing.
    BeginEdit {
        /// Id of the record to edit.
        id: ReservationId,
    },

    /// Command: discard the draft and the edit marker without a store call.
    CancelEdit,

    /// Command: validate the draft and write it to the store.
    SaveReservation,

    /// The store acknowledged the write.
    ReservationSaved {
        /// Store-assigned id (newly generated on create).
        id: ReservationId,
    },

    /// The store rejected the write; draft preserved for retry.
    SaveFailed {
        /// The reported failure.
        error: BookingError,
    },

    /// Command: delete a reservation. Confirmation happens before this
    /// action is sent.
    DeleteReservation {
        /// Id of the record to delete.
        id: ReservationId,
    },

    /// The store acknowledged the delete.
    ReservationDeleted {
        /// Id of the removed record.
        id: ReservationId,
    },

    /// The store rejected the delete.
    DeleteFailed {
        /// The reported failure.
        error: BookingError,
    },

    /// Command: the search input changed.
    SearchChanged {
        /// New search term, applied by [`crate::state::ReservationsState::filtered`].
        term: String,
    },

    // ═══════════════════════════════════════════════════════════════
    // Profile
    // ═══════════════════════════════════════════════════════════════
    /// Command: validate, normalise, and store the profile registration.
    RegisterProfile {
        /// Raw registration input.
        draft: ProfileDraft,
    },

    /// The store acknowledged the profile write.
    ProfileSaved {
        /// The profile as written.
        profile: UserProfile,
    },

    /// The store rejected the profile write.
    ProfileSaveFailed {
        /// The reported failure.
        error: BookingError,
    },

    /// Command: fetch the owner's profile record.
    FetchProfile,

    /// The profile fetch resolved (`None`: no record for this owner).
    ProfileLoaded {
        /// The decoded profile, if present.
        profile: Option<UserProfile>,
    },

    /// The profile fetch failed.
    ProfileLoadFailed {
        /// The reported failure.
        error: BookingError,
    },

    // ═══════════════════════════════════════════════════════════════
    // Sponsors
    // ═══════════════════════════════════════════════════════════════
    /// Command: fetch the sponsor list (one-shot, no subscription).
    FetchSponsors,

    /// The sponsor fetch resolved.
    SponsorsLoaded {
        /// Decoded entries, in id order.
        sponsors: Vec<Sponsor>,
    },

    /// The sponsor fetch failed.
    SponsorsLoadFailed {
        /// The reported failure.
        error: BookingError,
    },
}
