//! Read-only chain client bound to the configured RPC endpoint.

use repp_types::Address;
use serde_json::json;
use tracing::info;

use crate::chain::ChainConfig;
use crate::error::ChainError;
use crate::rpc::JsonRpcTransport;
use crate::transaction::{parse_data, parse_quantity};

/// A read-only client for one chain.
#[derive(Debug)]
pub struct PublicClient {
    chain: ChainConfig,
    transport: JsonRpcTransport,
}

impl PublicClient {
    /// Create a client for `chain`'s HTTP RPC endpoint.
    pub fn new(chain: ChainConfig) -> Self {
        let transport = JsonRpcTransport::new(chain.rpc_http.clone());
        Self { chain, transport }
    }

    /// The chain this client was configured for.
    pub const fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Chain id reported by the endpoint (`eth_chainId`).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the call fails or the result is malformed.
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let result = self.transport.request("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    /// Latest block number (`eth_blockNumber`).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the call fails or the result is malformed.
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let result = self.transport.request("eth_blockNumber", json!([])).await?;
        parse_quantity(&result)
    }

    /// Execute a read-only call against the latest block (`eth_call`).
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the call reverts or the result is malformed.
    pub async fn call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let params = json!([
            {"to": to.to_string(), "data": format!("0x{}", hex::encode(data))},
            "latest"
        ]);
        let result = self.transport.request("eth_call", params).await?;
        parse_data(&result)
    }

    /// Check that the endpoint serves the configured chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::ChainMismatch`] if the ids differ, or the
    /// underlying error if the endpoint cannot be reached.
    pub async fn verify_chain(&self) -> Result<u64, ChainError> {
        let actual = self.chain_id().await?;
        if actual != self.chain.id {
            return Err(ChainError::ChainMismatch {
                expected: self.chain.id,
                actual,
            });
        }
        info!(chain_id = actual, chain = self.chain.name, "chain identity verified");
        Ok(actual)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::Value;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn mock_rpc(server: &MockServer, rpc_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result})),
            )
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> PublicClient {
        PublicClient::new(ChainConfig {
            rpc_http: server.uri(),
            ..ChainConfig::default()
        })
    }

    #[tokio::test]
    async fn verify_chain_accepts_matching_id() {
        let server = MockServer::start().await;
        mock_rpc(&server, "eth_chainId", json!("0x1ecf")).await;

        let client = client_for(&server);
        assert_eq!(client.verify_chain().await.unwrap(), 7887);
    }

    #[tokio::test]
    async fn verify_chain_rejects_other_network() {
        let server = MockServer::start().await;
        mock_rpc(&server, "eth_chainId", json!("0x1")).await;

        let client = client_for(&server);
        assert!(matches!(
            client.verify_chain().await,
            Err(ChainError::ChainMismatch {
                expected: 7887,
                actual: 1
            })
        ));
    }

    #[tokio::test]
    async fn block_number_and_call() {
        let server = MockServer::start().await;
        mock_rpc(&server, "eth_blockNumber", json!("0x10")).await;
        mock_rpc(&server, "eth_call", json!("0x0001")).await;

        let client = client_for(&server);
        assert_eq!(client.block_number().await.unwrap(), 16);
        assert_eq!(
            client.call(Address::ZERO, &[0xab]).await.unwrap(),
            vec![0, 1]
        );
    }
}
