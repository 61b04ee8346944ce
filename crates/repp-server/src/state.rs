//! Shared application state for the Repp API server.

use std::sync::Arc;

use repp_core::Platform;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// platform owns its own locks, so handlers never lock here.
#[derive(Debug)]
pub struct AppState<W> {
    /// Wallet session, registration flow, and event catalog.
    pub platform: Platform<W>,
}

impl<W> AppState<W> {
    /// Wrap a platform for serving.
    pub const fn new(platform: Platform<W>) -> Self {
        Self { platform }
    }

    /// Wrap a platform in the `Arc` the router expects.
    pub fn shared(platform: Platform<W>) -> Arc<Self> {
        Arc::new(Self::new(platform))
    }
}
