//! Wallet provider capability and its JSON-RPC implementation.
//!
//! The application never signs anything itself. It asks a wallet provider to
//! connect (yielding an account address) and to send a batch of calls on the
//! user's behalf. Any provider exposing this contract can be substituted,
//! which is how tests inject fakes.

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use repp_types::{Address, TxHash};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::error::ChainError;
use crate::rpc::JsonRpcTransport;
use crate::transaction::{TransactionRequest, WalletAccount};

/// Header carrying the application key to the wallet relay.
pub const APP_KEY_HEADER: &str = "x-app-key";

/// An external wallet that can connect an account and submit transactions.
///
/// Methods return `Send` futures so providers can be driven from any tokio
/// task, including axum handlers.
pub trait WalletProvider: Send + Sync {
    /// Ask the user to connect an account.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the provider is unreachable or the user
    /// rejects the request.
    fn connect(&self) -> impl Future<Output = Result<WalletAccount, ChainError>> + Send;

    /// Submit a batch of calls from the connected account.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the batch is rejected or cannot be sent.
    fn send_transaction(
        &self,
        calls: &[TransactionRequest],
    ) -> impl Future<Output = Result<TxHash, ChainError>> + Send;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// A wallet provider reached over JSON-RPC (a wallet relay or a node with
/// unlocked accounts).
///
/// `connect` calls `eth_requestAccounts`. A single call is sent with
/// `eth_sendTransaction`; larger batches use `wallet_sendCalls`.
#[derive(Debug)]
pub struct JsonRpcWallet {
    transport: JsonRpcTransport,
    chain_id: u64,
    account: RwLock<Option<Address>>,
}

impl JsonRpcWallet {
    /// Create a wallet provider for `relay_url`.
    ///
    /// When `app_key` is set it is sent with every request in the
    /// [`APP_KEY_HEADER`] header.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Http`] if the app key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn new(relay_url: &str, app_key: Option<&str>, chain_id: u64) -> Result<Self, ChainError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = app_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ChainError::Http(format!("invalid app key header: {e}")))?;
            headers.insert(HeaderName::from_static(APP_KEY_HEADER), value);
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ChainError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            transport: JsonRpcTransport::with_client(relay_url, client),
            chain_id,
            account: RwLock::new(None),
        })
    }

    /// The account remembered from the last successful connect.
    pub fn account(&self) -> Option<Address> {
        *self.account.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember(&self, address: Address) {
        *self.account.write().unwrap_or_else(PoisonError::into_inner) = Some(address);
    }

    async fn send_single(
        &self,
        from: Address,
        call: &TransactionRequest,
    ) -> Result<TxHash, ChainError> {
        let mut tx = call.to_rpc_json();
        if let Some(obj) = tx.as_object_mut() {
            obj.insert("from".to_owned(), Value::String(from.to_string()));
        }
        let result = self
            .transport
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        extract_tx_hash(&result)
    }

    async fn send_batch(
        &self,
        from: Address,
        calls: &[TransactionRequest],
    ) -> Result<TxHash, ChainError> {
        let calls: Vec<Value> = calls.iter().map(TransactionRequest::to_rpc_json).collect();
        let params = json!([{
            "version": "2.0.0",
            "chainId": format!("{:#x}", self.chain_id),
            "from": from.to_string(),
            "atomicRequired": true,
            "calls": calls,
        }]);
        let result = self.transport.request("wallet_sendCalls", params).await?;
        extract_tx_hash(&result)
    }
}

impl WalletProvider for JsonRpcWallet {
    async fn connect(&self) -> Result<WalletAccount, ChainError> {
        let result = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await?;
        let address = extract_first_account(&result)?;
        self.remember(address);
        info!(address = %address, relay = self.transport.url(), "wallet account connected");
        Ok(WalletAccount { address })
    }

    async fn send_transaction(&self, calls: &[TransactionRequest]) -> Result<TxHash, ChainError> {
        let from = self
            .account()
            .ok_or_else(|| ChainError::Provider("wallet is not connected".to_owned()))?;
        debug!(from = %from, calls = calls.len(), "submitting transaction batch");

        match calls {
            [] => Err(ChainError::Provider("empty call batch".to_owned())),
            [single] => self.send_single(from, single).await,
            many => self.send_batch(from, many).await,
        }
    }

    fn name(&self) -> &str {
        "json-rpc"
    }
}

/// Take the first address from an `eth_requestAccounts` result.
fn extract_first_account(result: &Value) -> Result<Address, ChainError> {
    let first = result
        .as_array()
        .and_then(|accounts| accounts.first())
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::Provider("wallet returned no accounts".to_owned()))?;
    first
        .parse()
        .map_err(|e| ChainError::Decode(format!("invalid account address {first}: {e}")))
}

/// Accept either a bare hash string or a `wallet_sendCalls` `{ "id": ... }`
/// object.
fn extract_tx_hash(result: &Value) -> Result<TxHash, ChainError> {
    result
        .as_str()
        .or_else(|| result.get("id").and_then(Value::as_str))
        .map(|hash| TxHash(hash.to_owned()))
        .ok_or_else(|| ChainError::Decode(format!("unexpected send result: {result}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::abi::{ContractInterface, REGISTER_FOR_EVENT, Token};

    const ACCOUNT: &str = "0x00000000000000000000000000000000000000ab";

    fn rpc_ok(result: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
    }

    fn register_call(event_id: u128) -> TransactionRequest {
        let iface = ContractInterface::registry().unwrap();
        TransactionRequest::contract_call(
            Address::from_bytes([0x22; 20]),
            &iface,
            REGISTER_FOR_EVENT,
            &[Token::Uint(event_id)],
        )
        .unwrap()
    }

    async fn connected_wallet(server: &MockServer) -> JsonRpcWallet {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "eth_requestAccounts"})))
            .respond_with(rpc_ok(json!([ACCOUNT])))
            .mount(server)
            .await;
        let wallet = JsonRpcWallet::new(&server.uri(), None, 7887).unwrap();
        wallet.connect().await.unwrap();
        wallet
    }

    #[test]
    fn extract_first_account_empty() {
        assert!(matches!(
            extract_first_account(&json!([])),
            Err(ChainError::Provider(_))
        ));
    }

    #[test]
    fn extract_tx_hash_accepts_both_shapes() {
        assert_eq!(extract_tx_hash(&json!("0xdead")).unwrap(), TxHash("0xdead".to_owned()));
        assert_eq!(
            extract_tx_hash(&json!({"id": "0xbeef"})).unwrap(),
            TxHash("0xbeef".to_owned())
        );
        assert!(extract_tx_hash(&json!(42)).is_err());
    }

    #[tokio::test]
    async fn connect_sends_app_key_and_remembers_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header(APP_KEY_HEADER, "app-key-1"))
            .and(body_partial_json(json!({"method": "eth_requestAccounts"})))
            .respond_with(rpc_ok(json!([ACCOUNT])))
            .expect(1)
            .mount(&server)
            .await;

        let wallet = JsonRpcWallet::new(&server.uri(), Some("app-key-1"), 7887).unwrap();
        let account = wallet.connect().await.unwrap();
        assert_eq!(account.address.to_string(), ACCOUNT);
        assert_eq!(wallet.account(), Some(account.address));
    }

    #[tokio::test]
    async fn connect_rejection_leaves_no_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": 4001, "message": "User rejected the request."}
            })))
            .mount(&server)
            .await;

        let wallet = JsonRpcWallet::new(&server.uri(), None, 7887).unwrap();
        assert!(matches!(
            wallet.connect().await,
            Err(ChainError::Rpc { code: 4001, .. })
        ));
        assert_eq!(wallet.account(), None);
    }

    #[tokio::test]
    async fn send_requires_connected_account() {
        let server = MockServer::start().await;
        let wallet = JsonRpcWallet::new(&server.uri(), None, 7887).unwrap();
        let result = wallet.send_transaction(&[register_call(1)]).await;
        assert!(matches!(result, Err(ChainError::Provider(_))));
    }

    #[tokio::test]
    async fn single_call_uses_eth_send_transaction() {
        let server = MockServer::start().await;
        let wallet = connected_wallet(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "eth_sendTransaction",
                "params": [{"from": ACCOUNT, "value": "0x0"}]
            })))
            .respond_with(rpc_ok(json!("0xfeed")))
            .expect(1)
            .mount(&server)
            .await;

        let hash = wallet.send_transaction(&[register_call(2)]).await.unwrap();
        assert_eq!(hash, TxHash("0xfeed".to_owned()));
    }

    #[tokio::test]
    async fn batches_use_wallet_send_calls() {
        let server = MockServer::start().await;
        let wallet = connected_wallet(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "wallet_sendCalls",
                "params": [{"chainId": "0x1ecf", "from": ACCOUNT}]
            })))
            .respond_with(rpc_ok(json!({"id": "0xbundle"})))
            .expect(1)
            .mount(&server)
            .await;

        let hash = wallet
            .send_transaction(&[register_call(1), register_call(2)])
            .await
            .unwrap();
        assert_eq!(hash, TxHash("0xbundle".to_owned()));
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let server = MockServer::start().await;
        let wallet = connected_wallet(&server).await;
        assert!(matches!(
            wallet.send_transaction(&[]).await,
            Err(ChainError::Provider(_))
        ));
    }
}
