//! REST API endpoint handlers for the Repp server.
//!
//! Handlers are thin: they parse the request, call the [`Platform`], and
//! render JSON. All state and validation live in `repp-core`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/status` | Chain identity and wallet session |
//! | `GET` | `/api/events` | List events |
//! | `POST` | `/api/events` | Create an event |
//! | `GET` | `/api/events/{id}` | Single event |
//! | `GET` | `/api/events/{id}/participants` | List participants |
//! | `POST` | `/api/events/{id}/participants` | Record a participant |
//! | `POST` | `/api/events/{id}/participants/{index}/approve` | Approve |
//! | `POST` | `/api/events/{id}/participants/{index}/decline` | Decline |
//! | `POST` | `/api/events/{id}/register` | Register the connected wallet |
//! | `GET` | `/api/events/{id}/registration` | Registration status |
//! | `POST` | `/api/wallet/connect` | Connect the wallet |
//! | `GET` | `/api/wallet` | Current wallet session |
//!
//! [`Platform`]: repp_core::Platform

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use repp_chain::WalletProvider;
use repp_core::RegistrationOutcome;
use repp_types::{EventId, NewEvent, Participant, ReviewDecision, WalletSession};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/events/{id}/participants`.
#[derive(Debug, Deserialize)]
pub struct ParticipantRequest {
    /// Display name of the participant.
    pub name: String,
    /// Reputation score.
    #[serde(default)]
    pub score: i64,
}

/// Response body for `POST /api/events/{id}/register`.
#[derive(Debug, Serialize)]
struct RegistrationResponse {
    event_id: EventId,
    #[serde(flatten)]
    outcome: RegistrationOutcome,
    /// Explorer link for a submitted transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    explorer_url: Option<String>,
}

fn session_json(session: Option<WalletSession>) -> serde_json::Value {
    session.map_or_else(
        || json!({ "connected": false, "address": null }),
        |s| {
            json!({
                "connected": s.connected,
                "address": s.address,
                "display": s.address.short(),
            })
        },
    )
}

// ---------------------------------------------------------------------------
// GET /api/status
// ---------------------------------------------------------------------------

/// Chain identity, registry address, event count, and wallet session.
pub async fn status<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
) -> impl IntoResponse {
    let platform = &state.platform;
    let chain = platform.chain();
    Json(json!({
        "chain": {
            "id": chain.id,
            "name": chain.name,
            "explorer_url": chain.explorer_url,
        },
        "registry": platform.registry(),
        "events": platform.event_count().await,
        "wallet": session_json(platform.session().await),
    }))
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// List all events in creation order.
pub async fn list_events<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
) -> impl IntoResponse {
    let events = state.platform.events().await;
    Json(json!({
        "count": events.len(),
        "events": events,
    }))
}

/// Return a single event.
pub async fn get_event<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_event_id(&id_str)?;
    Ok(Json(state.platform.event(id).await?))
}

/// Create an event from a [`NewEvent`] body.
pub async fn create_event<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let event = state.platform.create_event(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// List the participants of an event.
pub async fn list_participants<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_event_id(&id_str)?;
    let participants = state.platform.participants(id).await?;
    Ok(Json(json!({
        "event_id": id,
        "count": participants.len(),
        "participants": participants,
    })))
}

/// Append a participant to an event.
pub async fn record_participant<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    Path(id_str): Path<String>,
    payload: Result<Json<ParticipantRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_event_id(&id_str)?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("participant name is required".to_owned()));
    }
    let participant = Participant::new(name, request.score);
    let index = state
        .platform
        .record_participant(id, participant.clone())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "index": index,
            "participant": participant,
        })),
    ))
}

/// Approve a participant.
pub async fn approve_participant<W: WalletProvider>(
    state: State<Arc<AppState<W>>>,
    path: Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    review(state, path, ReviewDecision::Approve).await
}

/// Decline a participant.
pub async fn decline_participant<W: WalletProvider>(
    state: State<Arc<AppState<W>>>,
    path: Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    review(state, path, ReviewDecision::Decline).await
}

async fn review<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    Path((id_str, index_str)): Path<(String, String)>,
    decision: ReviewDecision,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_event_id(&id_str)?;
    let index: usize = index_str
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid participant index {index_str}: {e}")))?;
    let participant = state.platform.review(id, index, decision).await?;
    Ok(Json(json!({
        "event_id": id,
        "index": index,
        "participant": participant,
    })))
}

// ---------------------------------------------------------------------------
// Wallet and registration
// ---------------------------------------------------------------------------

/// Connect the user's wallet through the provider.
pub async fn connect_wallet<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.platform.connect().await?;
    Ok(Json(session_json(Some(session))))
}

/// The current wallet session.
pub async fn get_wallet<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
) -> impl IntoResponse {
    Json(session_json(state.platform.session().await))
}

/// Register the connected wallet for an event.
pub async fn register<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_event_id(&id_str)?;
    let outcome = state.platform.register(id).await?;
    let explorer_url = match &outcome {
        RegistrationOutcome::Submitted(hash) => Some(state.platform.chain().tx_url(&hash.0)),
        RegistrationOutcome::AlreadyRegistered | RegistrationOutcome::InFlight => None,
    };
    Ok(Json(RegistrationResponse {
        event_id: id,
        outcome,
        explorer_url,
    }))
}

/// Registration status of the connected wallet for an event.
pub async fn registration_status<W: WalletProvider>(
    State(state): State<Arc<AppState<W>>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_event_id(&id_str)?;
    let status = state.platform.registration_status(id).await?;
    Ok(Json(json!({
        "event_id": id,
        "status": status,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an event id from a path segment.
fn parse_event_id(s: &str) -> Result<EventId, ApiError> {
    s.parse::<u64>()
        .map(EventId)
        .map_err(|e| ApiError::BadRequest(format!("invalid event id {s}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_parse_from_path() {
        assert_eq!(parse_event_id("2").unwrap(), EventId(2));
        assert!(matches!(parse_event_id("two"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_event_id("-1"), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn missing_session_renders_disconnected() {
        let value = session_json(None);
        assert_eq!(value["connected"], false);
        assert!(value["address"].is_null());
    }

    #[test]
    fn registration_response_flattens_outcome() {
        let response = RegistrationResponse {
            event_id: EventId(2),
            outcome: RegistrationOutcome::AlreadyRegistered,
            explorer_url: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["event_id"], 2);
        assert_eq!(value["outcome"], "already_registered");
        assert!(value.get("explorer_url").is_none());
    }
}
