//! Transaction requests handed to a wallet provider.

use repp_types::Address;
use serde_json::{Value, json};

use crate::abi::{ContractInterface, Token};
use crate::error::ChainError;

/// One call in a transaction batch: target, call data, and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Contract being called.
    pub to: Address,
    /// Encoded call data.
    pub data: Vec<u8>,
    /// Native value transferred, in the smallest unit.
    pub value: u128,
}

impl TransactionRequest {
    /// Build a zero-value contract call.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Encode`] if the call cannot be encoded against
    /// the interface.
    pub fn contract_call(
        to: Address,
        interface: &ContractInterface,
        function: &str,
        args: &[Token],
    ) -> Result<Self, ChainError> {
        let data = interface.encode_function_data(function, args)?;
        Ok(Self { to, data, value: 0 })
    }

    /// Call data as a `0x`-prefixed hex string.
    pub fn data_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.data))
    }

    /// JSON-RPC call object (`to`, `data`, `value` as hex quantities).
    pub fn to_rpc_json(&self) -> Value {
        json!({
            "to": self.to.to_string(),
            "data": self.data_hex(),
            "value": format!("{:#x}", self.value),
        })
    }
}

/// Account information returned by a successful wallet connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletAccount {
    /// The connected account address.
    pub address: Address,
}

/// Parse a JSON-RPC hex quantity such as `0x1ecf`.
///
/// # Errors
///
/// Returns [`ChainError::Decode`] if the value is not a hex quantity string
/// or does not fit in a `u64`.
pub fn parse_quantity(value: &Value) -> Result<u64, ChainError> {
    let text = value
        .as_str()
        .ok_or_else(|| ChainError::Decode(format!("expected hex quantity, got {value}")))?;
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::Decode(format!("quantity missing 0x prefix: {text}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::Decode(format!("invalid quantity {text}: {e}")))
}

/// Parse `0x`-prefixed hex data.
///
/// # Errors
///
/// Returns [`ChainError::Decode`] if the value is not valid hex data.
pub fn parse_data(value: &Value) -> Result<Vec<u8>, ChainError> {
    let text = value
        .as_str()
        .ok_or_else(|| ChainError::Decode(format!("expected hex data, got {value}")))?;
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| ChainError::Decode(format!("invalid hex data: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::abi::REGISTER_FOR_EVENT;

    #[test]
    fn contract_call_has_zero_value() {
        let iface = ContractInterface::registry().unwrap();
        let to = Address::from_bytes([0x22; 20]);
        let tx =
            TransactionRequest::contract_call(to, &iface, REGISTER_FOR_EVENT, &[Token::Uint(2)])
                .unwrap();
        assert_eq!(tx.value, 0);
        assert_eq!(tx.to, to);

        let json = tx.to_rpc_json();
        assert_eq!(json["value"], "0x0");
        assert_eq!(json["to"], "0x2222222222222222222222222222222222222222");
        assert!(json["data"].as_str().unwrap().ends_with("02"));
    }

    #[test]
    fn unknown_function_surfaces_as_encode_error() {
        let iface = ContractInterface::registry().unwrap();
        let result = TransactionRequest::contract_call(Address::ZERO, &iface, "missing", &[]);
        assert!(matches!(result, Err(ChainError::Encode(_))));
    }

    #[test]
    fn quantities_parse_from_hex() {
        assert_eq!(parse_quantity(&json!("0x1ecf")).unwrap(), 7887);
        assert!(parse_quantity(&json!("1ecf")).is_err());
        assert!(parse_quantity(&json!(7887)).is_err());
    }

    #[test]
    fn data_parses_with_or_without_prefix() {
        assert_eq!(parse_data(&json!("0x0102")).unwrap(), vec![1, 2]);
        assert_eq!(parse_data(&json!("0102")).unwrap(), vec![1, 2]);
        assert!(parse_data(&json!("0xzz")).is_err());
    }
}
