//! Error types for booking operations.

use thiserror::Error;

/// Result type alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Error taxonomy for the booking features.
///
/// Validation errors are detected locally before any network call and leave
/// the draft intact for correction. Store errors originate from the remote
/// collaborator; no automatic retry is performed and the user may resubmit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════
    /// A required form field is empty.
    #[error("required field `{field}` is empty")]
    MissingRequiredField {
        /// Name of the empty field.
        field: &'static str,
    },

    /// Another reservation already occupies the requested date.
    #[error("a reservation already exists for {date}")]
    DuplicateDate {
        /// The contested date, as displayed.
        date: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Store Errors
    // ═══════════════════════════════════════════════════════════
    /// A remote store operation failed (network, permission, server).
    #[error("store operation failed: {message}")]
    Store {
        /// Description reported by the store client.
        message: String,
    },

    /// Opening or maintaining a subtree subscription failed.
    ///
    /// A failed subscription is not automatically reattached.
    #[error("subscription failed: {message}")]
    Subscription {
        /// Description reported by the store client.
        message: String,
    },

    /// A store record could not be decoded into its typed shape.
    ///
    /// Records with missing required fields are rejected rather than
    /// propagated with holes.
    #[error("malformed record at {path}: {reason}")]
    MalformedRecord {
        /// Store path of the offending record.
        path: String,
        /// Decoder diagnostic.
        reason: String,
    },
}

impl BookingError {
    /// Shorthand for a [`BookingError::Store`] with the given message.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Returns `true` if this error was produced by local validation.
    ///
    /// Validation errors are reported synchronously, before any store
    /// call, and never warrant a retry.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredField { .. } | Self::DuplicateDate { .. }
        )
    }
}
