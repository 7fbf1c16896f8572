//! Booking state types.
//!
//! All types are `Clone` so state can be snapshotted freely; the working
//! set is transient and lives only as long as the session. Durable state
//! belongs entirely to the remote store — the reservation list here is
//! whatever the last subtree notification delivered.

use crate::error::BookingError;
use crate::model::{
    Reservation, ReservationId, ReservationRecord, Sponsor, UserId, UserProfile,
};

/// Search terms shorter than this return the unfiltered list.
pub const SEARCH_MIN_CHARS: usize = 3;

/// Root state for the booking features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingState {
    /// Auth-session observation state.
    pub session: SessionState,
    /// Reservation manager state.
    pub reservations: ReservationsState,
    /// User profile state.
    pub profile: ProfileState,
    /// Sponsor carousel data state.
    pub sponsors: SponsorsState,
}

impl BookingState {
    /// Create an empty booking state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Observed auth-session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current owner id; `None` while signed out.
    pub current_user: Option<UserId>,
    /// Whether at least one auth-state notification has arrived.
    pub resolved: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// Reservations
// ═══════════════════════════════════════════════════════════════════════

/// Form phase of the reservation draft.
///
/// `Submitting` returns to `Editing` on a store failure (draft preserved
/// for retry) and to `Idle` on success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    /// No draft in progress.
    #[default]
    Idle,
    /// Draft populated; `ReservationsState::editing` tells a new record
    /// apart from an update.
    Editing,
    /// A write is in flight.
    Submitting,
}

/// The in-progress, not-yet-persisted reservation form fields.
///
/// Values are kept exactly as displayed; the input formatters run before
/// the field reaches the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    /// Reserved date, `DD/MM/YYYY`.
    pub date_of_reservation: String,
    /// Customer's name.
    pub customer_name: String,
    /// Customer's phone, `(DD) DDDDD-DDDD`.
    pub customer_phone: String,
    /// Reservation value, `R$ D,DD` (optional).
    pub reservation_value: String,
    /// Responsible staff member.
    pub responsible_staff: String,
}

impl ReservationDraft {
    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `true` when no field holds any input.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    /// Populate the draft from an existing record (begin-edit).
    #[must_use]
    pub fn from_record(record: &ReservationRecord) -> Self {
        Self {
            date_of_reservation: record.date_of_reservation.clone(),
            customer_name: record.customer_name.clone(),
            customer_phone: record.customer_phone.clone(),
            reservation_value: record.reservation_value.clone(),
            responsible_staff: record.responsible_staff.clone(),
        }
    }

    /// Build the wire record for this draft, stamping `date_registered`.
    #[must_use]
    pub fn to_record(&self, date_registered: String) -> ReservationRecord {
        ReservationRecord {
            date_of_reservation: self.date_of_reservation.clone(),
            date_registered,
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            reservation_value: self.reservation_value.clone(),
            responsible_staff: self.responsible_staff.clone(),
        }
    }
}

/// Reservation manager state: the derived list plus the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationsState {
    /// The live list, newest first, exactly as the last snapshot derived it.
    pub reservations: Vec<Reservation>,
    /// The in-progress form fields.
    pub draft: ReservationDraft,
    /// Id of the record being edited, if any.
    pub editing: Option<ReservationId>,
    /// Current form phase.
    pub form: FormPhase,
    /// Current search input.
    pub search_term: String,
    /// `true` until the first snapshot (or an absent owner) resolves the list.
    pub loading: bool,
    /// Most recent rejection or store failure, for display.
    pub last_error: Option<BookingError>,
}

impl ReservationsState {
    /// Create an empty state, waiting for the first snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reservations: Vec::new(),
            draft: ReservationDraft::default(),
            editing: None,
            form: FormPhase::Idle,
            search_term: String::new(),
            loading: true,
            last_error: None,
        }
    }

    /// Number of reservations in the live list.
    #[must_use]
    pub fn count(&self) -> usize {
        self.reservations.len()
    }

    /// Look up a reservation by id.
    #[must_use]
    pub fn find(&self, id: &ReservationId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id == *id)
    }

    /// `true` when another record (excluding `exclude`) holds `date`.
    ///
    /// String equality on the formatted date; this is the best-effort
    /// client-side uniqueness check — concurrent sessions can still both
    /// pass it and write the same date.
    #[must_use]
    pub fn date_taken(&self, date: &str, exclude: Option<&ReservationId>) -> bool {
        self.reservations
            .iter()
            .any(|r| r.record.date_of_reservation == date && Some(&r.id) != exclude)
    }

    /// The list filtered by the current search term.
    ///
    /// Terms shorter than [`SEARCH_MIN_CHARS`] return the full list;
    /// otherwise a record matches when customer name, date, phone, or
    /// staff name contains the term case-insensitively.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Reservation> {
        if self.search_term.chars().count() < SEARCH_MIN_CHARS {
            return self.reservations.iter().collect();
        }
        let term = self.search_term.to_lowercase();
        self.reservations
            .iter()
            .filter(|r| r.record.matches(&term))
            .collect()
    }
}

impl Default for ReservationsState {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Profile
// ═══════════════════════════════════════════════════════════════════════

/// User profile state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    /// Loaded or just-saved profile, if any.
    pub profile: Option<UserProfile>,
    /// Whether a fetch has completed (a missing record still resolves this).
    pub loaded: bool,
    /// A profile write is in flight.
    pub saving: bool,
    /// Most recent profile error, for display.
    pub last_error: Option<BookingError>,
}

// ═══════════════════════════════════════════════════════════════════════
// Sponsors
// ═══════════════════════════════════════════════════════════════════════

/// Sponsor carousel data state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SponsorsState {
    /// Fetched sponsor entries, in id order.
    pub sponsors: Vec<Sponsor>,
    /// A fetch is in flight.
    pub loading: bool,
    /// Most recent fetch error, for display.
    pub last_error: Option<BookingError>,
}
