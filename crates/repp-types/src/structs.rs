//! Core entity structs: events, participants, and wallet sessions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ReviewStatus;
use crate::ids::{Address, EventId};

/// A participant entry on an event.
///
/// Appended by the external registration effect. There is no removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Participant {
    /// Display name of the participant.
    pub name: String,
    /// Reputation score shown to organizers.
    #[ts(type = "number")]
    pub score: i64,
    /// Organizer review state.
    #[serde(default)]
    pub review: ReviewStatus,
}

impl Participant {
    /// Create a pending participant.
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
            review: ReviewStatus::Pending,
        }
    }
}

/// An event in the catalog.
///
/// Created by event authoring and never edited or deleted afterwards,
/// except for participants being appended and reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Catalog identifier.
    pub id: EventId,
    /// Event title.
    pub name: String,
    /// Calendar date the event ends on.
    pub date: NaiveDate,
    /// Where the event takes place.
    pub location: String,
    /// Points a user must stake to register.
    pub stake_points: u32,
    /// Free-form description.
    pub description: String,
    /// Participants in registration order.
    pub participants: Vec<Participant>,
}

/// Organizer input for creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewEvent {
    /// Event title. Must not be blank.
    pub name: String,
    /// Calendar date the event ends on.
    pub date: NaiveDate,
    /// Where the event takes place.
    #[serde(default)]
    pub location: String,
    /// Stake requirement; the configured default is used when absent.
    #[serde(default)]
    #[ts(optional)]
    pub stake_points: Option<u32>,
    /// Free-form description. Must not be blank.
    pub description: String,
}

/// A connection between the application and a user-controlled account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WalletSession {
    /// The connected account.
    #[ts(type = "string")]
    pub address: Address,
    /// Whether the session is live.
    pub connected: bool,
}

impl WalletSession {
    /// A live session for `address`.
    pub const fn connected(address: Address) -> Self {
        Self {
            address,
            connected: true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn participant_review_defaults_to_pending_when_missing() {
        let p: Participant =
            serde_json::from_str(r#"{"name":"John Doe","score":670}"#).unwrap();
        assert_eq!(p, Participant::new("John Doe", 670));
    }

    #[test]
    fn new_event_accepts_missing_stake_and_location() {
        let input: NewEvent = serde_json::from_str(
            r#"{"name":"New Event","date":"2024-12-31","description":"A new event description"}"#,
        )
        .unwrap();
        assert_eq!(input.stake_points, None);
        assert!(input.location.is_empty());
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn wallet_session_serializes_address_as_hex() {
        let session = WalletSession::connected(Address::from_bytes([0xab; 20]));
        let json = serde_json::to_value(session).unwrap();
        assert_eq!(json["connected"], true);
        assert_eq!(
            json["address"],
            "0xabababababababababababababababababababab"
        );
    }
}
