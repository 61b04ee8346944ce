//! Shared type definitions for the Repp events platform.
//!
//! This crate is the single source of truth for the data model shared by the
//! chain, core, and server crates. Types flow downstream to `TypeScript` via
//! `ts-rs` for the browser front end.
//!
//! # Modules
//!
//! - [`ids`] -- Event ids, account addresses, transaction hashes
//! - [`enums`] -- Registration and review state
//! - [`structs`] -- Events, participants, wallet sessions

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{RegistrationStatus, ReviewDecision, ReviewStatus};
pub use ids::{ADDRESS_LEN, Address, AddressParseError, EventId, TxHash};
pub use structs::{Event, NewEvent, Participant, WalletSession};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Bindings are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::EventId::export_all();
        let _ = crate::ids::TxHash::export_all();
        let _ = crate::enums::RegistrationStatus::export_all();
        let _ = crate::enums::ReviewStatus::export_all();
        let _ = crate::enums::ReviewDecision::export_all();
        let _ = crate::structs::Participant::export_all();
        let _ = crate::structs::Event::export_all();
        let _ = crate::structs::NewEvent::export_all();
        let _ = crate::structs::WalletSession::export_all();
    }
}
