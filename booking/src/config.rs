//! Booking configuration.
//!
//! Store path segments are configurable but default to the layout the
//! production database already uses; the segment names are part of the
//! wire contract with existing data.

use crate::model::{ReservationId, UserId};

/// Store layout configuration for the booking features.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Root segment of the per-owner reservation subtrees.
    ///
    /// Default: `reservas`
    pub reservations_path: String,

    /// Root segment of the user profile records.
    ///
    /// Default: `usuarios`
    pub profiles_path: String,

    /// Path of the sponsor list.
    ///
    /// Default: `patrocinadores`
    pub sponsors_path: String,
}

impl BookingConfig {
    /// Create a configuration with the production path layout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reservations_path: "reservas".to_string(),
            profiles_path: "usuarios".to_string(),
            sponsors_path: "patrocinadores".to_string(),
        }
    }

    /// Set the reservations root segment.
    #[must_use]
    pub fn with_reservations_path(mut self, path: impl Into<String>) -> Self {
        self.reservations_path = path.into();
        self
    }

    /// Set the profiles root segment.
    #[must_use]
    pub fn with_profiles_path(mut self, path: impl Into<String>) -> Self {
        self.profiles_path = path.into();
        self
    }

    /// Set the sponsors path.
    #[must_use]
    pub fn with_sponsors_path(mut self, path: impl Into<String>) -> Self {
        self.sponsors_path = path.into();
        self
    }

    /// Path of one owner's reservation subtree.
    #[must_use]
    pub fn reservations_subtree(&self, owner: &UserId) -> String {
        format!("{}/{}", self.reservations_path, owner.as_str())
    }

    /// Path of a single reservation record.
    #[must_use]
    pub fn reservation_entry(&self, owner: &UserId, id: &ReservationId) -> String {
        format!("{}/{}/{}", self.reservations_path, owner.as_str(), id.as_str())
    }

    /// Path of one owner's profile record.
    #[must_use]
    pub fn profile_entry(&self, owner: &UserId) -> String {
        format!("{}/{}", self.profiles_path, owner.as_str())
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self::new()
    }
}
