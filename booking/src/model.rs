//! Domain model and wire records.
//!
//! The remote store keeps loosely-typed JSON; this module is the typed
//! boundary. Wire field names are a compatibility contract with the
//! existing database contents and are mapped with `#[serde(rename)]` —
//! they must not be changed.
//!
//! Decoding fails closed: a child record with a missing required field is
//! rejected (and logged) instead of entering the list with holes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Stable identifier of the authenticated owner of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a `UserId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identifier of a reservation record.
///
/// Never chosen by the caller: assigned by the store on append and
/// immutable for the record's life.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub String);

impl ReservationId {
    /// Create a `ReservationId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Reservations
// ═══════════════════════════════════════════════════════════════════════

/// A reservation record as stored on the wire.
///
/// All values are the formatted display strings; dates in particular are
/// compared by string equality, never parsed into calendar types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// Reserved date, `DD/MM/YYYY`.
    #[serde(rename = "DataDaReserva")]
    pub date_of_reservation: String,

    /// Date the record was created or last updated, `DD/MM/YYYY`.
    #[serde(rename = "DataRegistro")]
    pub date_registered: String,

    /// Customer's name.
    #[serde(rename = "NomeDoCliente")]
    pub customer_name: String,

    /// Customer's phone, `(DD) DDDDD-DDDD`.
    #[serde(rename = "TelefoneDoCliente")]
    pub customer_phone: String,

    /// Reservation value, `R$ D,DD`. Optional on the wire.
    #[serde(rename = "ValorDaReserva", default)]
    pub reservation_value: String,

    /// Name of the staff member responsible for the booking.
    #[serde(rename = "FuncionarioResponsavel")]
    pub responsible_staff: String,
}

impl ReservationRecord {
    /// Case-insensitive substring match against the display fields.
    ///
    /// `term` must already be lower-cased by the caller.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        self.customer_name.to_lowercase().contains(term)
            || self.date_of_reservation.to_lowercase().contains(term)
            || self.customer_phone.to_lowercase().contains(term)
            || self.responsible_staff.to_lowercase().contains(term)
    }
}

/// A reservation: a store-assigned id plus the wire record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Store-assigned identifier.
    pub id: ReservationId,
    /// The record fields.
    pub record: ReservationRecord,
}

/// Convert a watched subtree snapshot into the derived reservation list.
///
/// Children are taken in id order (store-generated push ids sort
/// chronologically) and the list is reversed so the most recently created
/// record comes first. Malformed children are rejected and logged.
#[must_use]
pub fn reservations_from_snapshot(snapshot: Option<&Value>) -> Vec<Reservation> {
    let Some(Value::Object(children)) = snapshot else {
        return Vec::new();
    };

    let mut reservations: Vec<Reservation> = children
        .iter()
        .filter_map(|(id, child)| {
            match serde_json::from_value::<ReservationRecord>(child.clone()) {
                Ok(record) => Some(Reservation {
                    id: ReservationId::new(id),
                    record,
                }),
                Err(error) => {
                    tracing::warn!(%id, %error, "Rejecting malformed reservation record");
                    None
                },
            }
        })
        .collect();
    reservations.reverse();
    reservations
}

// ═══════════════════════════════════════════════════════════════════════
// User Profiles
// ═══════════════════════════════════════════════════════════════════════

/// A user profile record as stored at `usuarios/{ownerId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    #[serde(rename = "nome")]
    pub name: String,

    /// Contact email.
    #[serde(rename = "email")]
    pub email: String,

    /// Contact phone, formatted. Nullable on the wire.
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,

    /// Bare Instagram handle. Nullable on the wire.
    #[serde(rename = "instagram", default)]
    pub instagram: Option<String>,

    /// Uploaded profile-image URL. Nullable on the wire.
    #[serde(rename = "imagem", default)]
    pub image_url: Option<String>,
}

/// Raw, not-yet-normalised profile registration input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Display name (required).
    pub name: String,
    /// Contact email (required).
    pub email: String,
    /// Phone as typed; formatted before storage.
    pub phone: String,
    /// Instagram handle, `@`-handle or profile URL; normalised before storage.
    pub instagram: String,
    /// Profile-image URL, when an upload already happened.
    pub image_url: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Sponsors
// ═══════════════════════════════════════════════════════════════════════

/// One sponsor entry of the marketing carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sponsor {
    /// Store-assigned identifier.
    pub id: String,
    /// Logo image URL; entries without one are kept and left to the
    /// presentation layer.
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SponsorRecord {
    #[serde(rename = "logoUrl", default)]
    logo_url: Option<String>,
}

/// Convert the sponsors subtree into a list, in id order.
#[must_use]
pub fn sponsors_from_snapshot(snapshot: Option<&Value>) -> Vec<Sponsor> {
    let Some(Value::Object(children)) = snapshot else {
        return Vec::new();
    };

    children
        .iter()
        .filter_map(|(id, child)| {
            match serde_json::from_value::<SponsorRecord>(child.clone()) {
                Ok(record) => Some(Sponsor {
                    id: id.clone(),
                    logo_url: record.logo_url,
                }),
                Err(error) => {
                    tracing::warn!(%id, %error, "Rejecting malformed sponsor record");
                    None
                },
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> ReservationRecord {
        ReservationRecord {
            date_of_reservation: "01/01/2025".to_string(),
            date_registered: "28/12/2024".to_string(),
            customer_name: "Ana".to_string(),
            customer_phone: "(11) 91234-5678".to_string(),
            reservation_value: "R$ 150,00".to_string(),
            responsible_staff: "Joao".to_string(),
        }
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["DataDaReserva"], "01/01/2025");
        assert_eq!(value["DataRegistro"], "28/12/2024");
        assert_eq!(value["NomeDoCliente"], "Ana");
        assert_eq!(value["TelefoneDoCliente"], "(11) 91234-5678");
        assert_eq!(value["ValorDaReserva"], "R$ 150,00");
        assert_eq!(value["FuncionarioResponsavel"], "Joao");
    }

    #[test]
    fn record_value_defaults_to_empty() {
        let value = json!({
            "DataDaReserva": "01/01/2025",
            "DataRegistro": "28/12/2024",
            "NomeDoCliente": "Ana",
            "TelefoneDoCliente": "(11) 91234-5678",
            "FuncionarioResponsavel": "Joao",
        });
        let decoded: ReservationRecord = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.reservation_value, "");
    }

    #[test]
    fn record_missing_required_field_is_rejected() {
        let value = json!({
            "DataDaReserva": "01/01/2025",
            "NomeDoCliente": "Ana",
        });
        assert!(serde_json::from_value::<ReservationRecord>(value).is_err());
    }

    #[test]
    fn snapshot_is_reversed_into_newest_first() {
        let snapshot = json!({
            "-M000001": {
                "DataDaReserva": "01/01/2025",
                "DataRegistro": "28/12/2024",
                "NomeDoCliente": "Ana",
                "TelefoneDoCliente": "(11) 91234-5678",
                "FuncionarioResponsavel": "Joao",
            },
            "-M000002": {
                "DataDaReserva": "02/01/2025",
                "DataRegistro": "29/12/2024",
                "NomeDoCliente": "Bruno",
                "TelefoneDoCliente": "(11) 95555-0000",
                "FuncionarioResponsavel": "Joao",
            },
        });
        let list = reservations_from_snapshot(Some(&snapshot));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, ReservationId::new("-M000002"));
        assert_eq!(list[1].id, ReservationId::new("-M000001"));
    }

    #[test]
    fn snapshot_rejects_malformed_children() {
        let snapshot = json!({
            "-M000001": { "NomeDoCliente": "missing the rest" },
            "-M000002": {
                "DataDaReserva": "02/01/2025",
                "DataRegistro": "29/12/2024",
                "NomeDoCliente": "Bruno",
                "TelefoneDoCliente": "(11) 95555-0000",
                "FuncionarioResponsavel": "Joao",
            },
        });
        let list = reservations_from_snapshot(Some(&snapshot));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].record.customer_name, "Bruno");
    }

    #[test]
    fn absent_snapshot_is_an_empty_list() {
        assert!(reservations_from_snapshot(None).is_empty());
        assert!(reservations_from_snapshot(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn record_matching_is_case_insensitive() {
        let record = record();
        assert!(record.matches("ana"));
        assert!(record.matches("01/01"));
        assert!(record.matches("joao"));
        assert!(record.matches("91234"));
        assert!(!record.matches("lucas"));
    }

    #[test]
    fn profile_round_trips_wire_names() {
        let profile = UserProfile {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: Some("(11) 91234-5678".to_string()),
            instagram: Some("ana_luiza".to_string()),
            image_url: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["nome"], "Ana");
        assert_eq!(value["telefone"], "(11) 91234-5678");
        let decoded: UserProfile = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn sponsors_keep_entries_without_logo() {
        let snapshot = json!({
            "s1": { "logoUrl": "https://cdn.example.com/s1.png" },
            "s2": {},
        });
        let sponsors = sponsors_from_snapshot(Some(&snapshot));
        assert_eq!(sponsors.len(), 2);
        assert_eq!(
            sponsors[0].logo_url.as_deref(),
            Some("https://cdn.example.com/s1.png")
        );
        assert_eq!(sponsors[1].logo_url, None);
    }
}
