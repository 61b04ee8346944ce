//! Enumeration types for registration and participant review state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether the current wallet has registered for an event.
///
/// `Unregistered` is the initial state and `Registered` is terminal: there is
/// no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum RegistrationStatus {
    /// No successful registration has been submitted for this pair.
    #[default]
    Unregistered,
    /// A registration transaction was accepted by the wallet provider.
    Registered,
}

impl RegistrationStatus {
    /// Whether the status is [`RegistrationStatus::Registered`].
    pub const fn is_registered(self) -> bool {
        matches!(self, Self::Registered)
    }
}

/// An organizer's local review decision on a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ReviewStatus {
    /// Not yet reviewed.
    #[default]
    Pending,
    /// Accepted by the organizer.
    Approved,
    /// Rejected by the organizer.
    Declined,
}

/// A review action an organizer can take on a pending participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ReviewDecision {
    /// Approve the participant.
    Approve,
    /// Decline the participant.
    Decline,
}

impl ReviewDecision {
    /// The review status this decision leads to.
    pub const fn outcome(self) -> ReviewStatus {
        match self {
            Self::Approve => ReviewStatus::Approved,
            Self::Decline => ReviewStatus::Declined,
        }
    }
}
