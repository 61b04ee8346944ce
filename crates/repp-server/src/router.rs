//! Axum router construction for the Repp API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin front-end access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use repp_chain::WalletProvider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the Repp server.
///
/// See [`handlers`] for the endpoint table. CORS allows any origin so a
/// locally served front end can reach the API.
pub fn build_router<W: WalletProvider + 'static>(state: Arc<AppState<W>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/status", get(handlers::status::<W>))
        // Events
        .route(
            "/api/events",
            get(handlers::list_events::<W>).post(handlers::create_event::<W>),
        )
        .route("/api/events/{id}", get(handlers::get_event::<W>))
        // Participants
        .route(
            "/api/events/{id}/participants",
            get(handlers::list_participants::<W>).post(handlers::record_participant::<W>),
        )
        .route(
            "/api/events/{id}/participants/{index}/approve",
            post(handlers::approve_participant::<W>),
        )
        .route(
            "/api/events/{id}/participants/{index}/decline",
            post(handlers::decline_participant::<W>),
        )
        // Registration
        .route("/api/events/{id}/register", post(handlers::register::<W>))
        .route(
            "/api/events/{id}/registration",
            get(handlers::registration_status::<W>),
        )
        // Wallet
        .route("/api/wallet", get(handlers::get_wallet::<W>))
        .route("/api/wallet/connect", post(handlers::connect_wallet::<W>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
