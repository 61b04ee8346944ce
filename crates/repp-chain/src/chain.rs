//! Network identity for the chain Repp registers against.
//!
//! Defaults describe the Kinto mainnet: chain id 7887, one HTTP RPC endpoint,
//! and an optional `WebSocket` endpoint.

use serde::Deserialize;

/// Kinto mainnet chain id.
pub const KINTO_CHAIN_ID: u64 = 7887;

/// Native currency of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NativeCurrency {
    /// Display name.
    #[serde(default = "default_currency_name")]
    pub name: String,
    /// Ticker symbol.
    #[serde(default = "default_currency_name")]
    pub symbol: String,
    /// Decimal places of the smallest unit.
    #[serde(default = "default_currency_decimals")]
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: default_currency_name(),
            symbol: default_currency_name(),
            decimals: default_currency_decimals(),
        }
    }
}

/// Chain definition: id, endpoints, explorer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChainConfig {
    /// Numeric chain id (EIP-155).
    #[serde(default = "default_chain_id")]
    pub id: u64,

    /// Human-readable network name.
    #[serde(default = "default_chain_name")]
    pub name: String,

    /// HTTP JSON-RPC endpoint.
    #[serde(default = "default_rpc_http")]
    pub rpc_http: String,

    /// Optional `WebSocket` JSON-RPC endpoint.
    #[serde(default = "default_rpc_ws")]
    pub rpc_ws: Option<String>,

    /// Block explorer base URL.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    /// Native currency.
    #[serde(default)]
    pub native_currency: NativeCurrency,
}

impl ChainConfig {
    /// Chain id as a JSON-RPC hex quantity, e.g. `0x1ecf`.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.id)
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{tx_hash}", self.explorer_url.trim_end_matches('/'))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            id: default_chain_id(),
            name: default_chain_name(),
            rpc_http: default_rpc_http(),
            rpc_ws: default_rpc_ws(),
            explorer_url: default_explorer_url(),
            native_currency: NativeCurrency::default(),
        }
    }
}

const fn default_chain_id() -> u64 {
    KINTO_CHAIN_ID
}

fn default_chain_name() -> String {
    String::from("Kinto")
}

fn default_rpc_http() -> String {
    String::from("https://rpc.kinto-rpc.com/")
}

#[allow(clippy::unnecessary_wraps)]
fn default_rpc_ws() -> Option<String> {
    Some(String::from("wss://rpc.kinto.xyz/ws"))
}

fn default_explorer_url() -> String {
    String::from("https://kintoscan.io")
}

fn default_currency_name() -> String {
    String::from("ETH")
}

const fn default_currency_decimals() -> u8 {
    18
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_kinto() {
        let chain = ChainConfig::default();
        assert_eq!(chain.id, 7887);
        assert_eq!(chain.chain_id_hex(), "0x1ecf");
        assert_eq!(chain.rpc_ws.as_deref(), Some("wss://rpc.kinto.xyz/ws"));
        assert_eq!(chain.native_currency.decimals, 18);
    }

    #[test]
    fn tx_url_joins_without_double_slash() {
        let chain = ChainConfig {
            explorer_url: String::from("https://kintoscan.io/"),
            ..ChainConfig::default()
        };
        assert_eq!(chain.tx_url("0xabc"), "https://kintoscan.io/tx/0xabc");
    }
}
