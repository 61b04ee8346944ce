//! Repp server entry point.
//!
//! Loads `repp-config.yaml` (or the file named by `REPP_CONFIG`),
//! initializes structured logging, checks the RPC endpoint's chain identity,
//! seeds the event catalog, and serves the HTTP API.
//!
//! # Startup
//!
//! ```text
//! config --> logging --> PublicClient::verify_chain --> JsonRpcWallet
//!        --> EventCatalog --> Platform --> axum
//! ```
//!
//! A chain identity mismatch or an unreachable RPC endpoint is logged and
//! startup continues; wallet calls will surface their own errors.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use repp_chain::{JsonRpcWallet, PublicClient};
use repp_core::{EventCatalog, Platform, ReppConfig};
use repp_server::{AppState, ServerConfig, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "repp-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, wallet setup, catalog seeding, or the
/// server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("REPP_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = ReppConfig::from_file(&config_path)?;

    // Initialize structured logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(
        config = %config_path.display(),
        chain_id = config.chain.id,
        rpc = config.chain.rpc_http,
        relay = config.wallet.relay_url,
        "repp-server starting"
    );

    let client = PublicClient::new(config.chain.clone());
    if let Err(e) = client.verify_chain().await {
        warn!(error = %e, rpc = config.chain.rpc_http, "chain identity check failed");
    }

    let wallet = JsonRpcWallet::new(
        &config.wallet.relay_url,
        config.wallet.app_key.as_deref(),
        config.chain.id,
    )?;

    let catalog = EventCatalog::from_config(
        &config.catalog,
        Utc::now().date_naive(),
        &mut rand::rng(),
    )?;
    info!(events = catalog.len(), "event catalog ready");

    let registry = config.registry_address()?;
    let platform = Platform::new(Arc::new(wallet), registry, config.chain.clone(), catalog)?;

    start_server(
        &ServerConfig::from(&config.server),
        AppState::shared(platform),
    )
    .await?;

    Ok(())
}
