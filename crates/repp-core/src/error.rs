//! Error types for the Repp application components.
//!
//! [`ReppError`] is the closed taxonomy for wallet and registration failures.
//! [`CatalogError`] covers event lookup, authoring validation, and participant
//! review. Neither is fatal: callers log, surface a notice, and carry on.

use repp_types::{EventId, ReviewStatus};

/// Failures of the wallet-connect and registration flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReppError {
    /// The wallet provider was unreachable or rejected the connection.
    #[error("wallet connection failed: {0}")]
    Connection(String),

    /// Registration was attempted without a connected wallet.
    #[error("no connected wallet session")]
    NoSession,

    /// The registration transaction could not be encoded or sent.
    #[error("transaction submission failed: {0}")]
    Submission(String),
}

/// Failures of catalog lookups and event authoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No event with this id exists in the catalog.
    #[error("unknown event {0}")]
    UnknownEvent(EventId),

    /// The event has no participant at this position.
    #[error("event {event_id} has no participant at index {index}")]
    UnknownParticipant {
        /// The event looked up.
        event_id: EventId,
        /// The requested participant position.
        index: usize,
    },

    /// Authoring input failed validation.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// The participant already carries a different review decision.
    #[error("participant {index} of event {event_id} is already {status:?}")]
    AlreadyReviewed {
        /// The event the participant belongs to.
        event_id: EventId,
        /// The participant position.
        index: usize,
        /// The decision already recorded.
        status: ReviewStatus,
    },

    /// The catalog cannot assign another id.
    #[error("event id space exhausted")]
    IdOverflow,
}

/// Any failure surfaced by the [`Platform`](crate::platform::Platform) facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Wallet or registration failure.
    #[error(transparent)]
    Repp(#[from] ReppError),

    /// Catalog or authoring failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
