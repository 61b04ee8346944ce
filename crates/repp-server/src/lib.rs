//! HTTP API server for the Repp events platform.
//!
//! This crate exposes the [`Platform`](repp_core::Platform) operations as
//! JSON endpoints: browsing and authoring events, reviewing participants,
//! connecting the wallet, and registering for events. It renders nothing;
//! a browser front end consumes the API and the `ts-rs` bindings from
//! `repp-types`.
//!
//! # Architecture
//!
//! ```text
//! HTTP --> Router (CORS + Trace) --> handlers --> Platform<W> --> WalletProvider
//! ```
//!
//! The router is generic over the wallet provider so tests can drive it
//! with an in-memory fake.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
