//! Chain plumbing for the Repp events platform.
//!
//! Everything that touches a wallet or a chain endpoint lives here, behind
//! explicitly constructed values that callers inject:
//!
//! - [`chain`] -- Network identity ([`ChainConfig`], Kinto chain id 7887)
//! - [`abi`] -- Contract interfaces and call-data encoding
//! - [`transaction`] -- [`TransactionRequest`] and JSON-RPC value helpers
//! - [`rpc`] -- JSON-RPC 2.0 transport over HTTP
//! - [`wallet`] -- The [`WalletProvider`] capability and [`JsonRpcWallet`]
//! - [`client`] -- Read-only [`PublicClient`]
//!
//! # Architecture
//!
//! ```text
//! RegistrationFlow --> ContractInterface::encode_function_data
//!                  --> WalletProvider::send_transaction --> JSON-RPC relay
//! ```

pub mod abi;
pub mod chain;
pub mod client;
pub mod error;
pub mod rpc;
pub mod transaction;
pub mod wallet;

// Re-export primary types at crate root.
pub use abi::{ContractInterface, REGISTER_FOR_EVENT, REGISTRY_ABI, Token, function_selector};
pub use chain::{ChainConfig, KINTO_CHAIN_ID, NativeCurrency};
pub use client::PublicClient;
pub use error::{AbiError, ChainError};
pub use rpc::JsonRpcTransport;
pub use transaction::{TransactionRequest, WalletAccount};
pub use wallet::{JsonRpcWallet, WalletProvider};
