//! Application core for the Repp events platform.
//!
//! Everything the HTTP server exposes lives here, independent of transport:
//!
//! ```text
//!   Platform<W: WalletProvider>
//!     |-- SessionManager     connect / current session
//!     |-- RegistrationFlow   registerForEvent submission + status
//!     `-- EventCatalog       list / get / create / participants / review
//! ```
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`catalog`] -- The in-memory event list and demo seeding
//! - [`authoring`] -- Event creation and participant review
//! - [`session`] -- Wallet session management
//! - [`registration`] -- Event registration through the wallet provider
//! - [`platform`] -- The facade composing the above
//! - [`error`] -- Error taxonomy

pub mod authoring;
pub mod catalog;
pub mod config;
pub mod error;
pub mod platform;
pub mod registration;
pub mod session;

#[cfg(test)]
mod testing;

pub use catalog::{EventCatalog, WORKSHOP_NAME};
pub use config::{
    ApiConfig, CatalogConfig, ConfigError, ContractsConfig, LoggingConfig, ReppConfig,
    WalletConfig,
};
pub use error::{CatalogError, PlatformError, ReppError};
pub use platform::Platform;
pub use registration::{RegistrationFlow, RegistrationOutcome};
pub use session::SessionManager;
