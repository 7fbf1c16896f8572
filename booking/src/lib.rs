//! # Quadra Booking
//!
//! Reservation management core: a signed-in owner manages date-scoped
//! reservation records held in a remote real-time store, with a live
//! subscription view, client-side validation (one reservation per date),
//! substring search, and display formatting. User profile records and the
//! sponsor list ride along as smaller features.
//!
//! ## Architecture
//!
//! The features are pure reducers over [`BookingState`]; all I/O is
//! expressed as effect values executed by the runtime store:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! The two external collaborators — the identity provider and the remote
//! store — are injected through [`BookingEnvironment`] behind the traits
//! in [`providers`]; [`mocks`] hold in-memory implementations, and
//! [`stores`] the production store client.
//!
//! ## Example: driving a session
//!
//! ```rust,ignore
//! use quadra_booking::*;
//! use quadra_runtime::Store;
//!
//! let env = BookingEnvironment::new(identity, store_client, clock, BookingConfig::default());
//! let store = Store::new(BookingState::new(), BookingReducer::new(), env);
//!
//! store.send(BookingAction::ObserveAuthState).await?;
//! // sign-in flows in through the identity provider; the reservations
//! // subscription and profile fetch follow automatically
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod format;
pub mod mocks;
pub mod model;
pub mod providers;
pub mod reducers;
pub mod state;
pub mod stores;

// Re-export main types for convenience
pub use actions::{BookingAction, DraftField};
pub use config::BookingConfig;
pub use environment::BookingEnvironment;
pub use error::{BookingError, Result};
pub use model::{
    ProfileDraft, Reservation, ReservationId, ReservationRecord, Sponsor, UserId, UserProfile,
};
pub use reducers::BookingReducer;
pub use state::{BookingState, FormPhase, ReservationDraft, ReservationsState};
