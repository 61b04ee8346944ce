//! Contract interface descriptions and call-data encoding.
//!
//! A [`ContractInterface`] is parsed from a JSON ABI. Encoding a call looks up
//! the function by name and arity, hashes its canonical signature with
//! Keccak-256 to get the 4-byte selector, and appends one 32-byte word per
//! static argument.
//!
//! Only static argument types are supported: `uint<N>`, `address`, `bool`.

use repp_types::Address;
use serde::Deserialize;
use sha3::{Digest, Keccak256};

use crate::error::AbiError;

/// Size of one ABI word in bytes.
pub const WORD_LEN: usize = 32;

/// Interface of the event registry contract.
pub const REGISTRY_ABI: &str = r#"[
    {
        "type": "function",
        "name": "registerForEvent",
        "inputs": [{ "name": "eventId", "type": "uint256" }],
        "outputs": [],
        "stateMutability": "nonpayable"
    }
]"#;

/// Name of the registry function called when a user registers.
pub const REGISTER_FOR_EVENT: &str = "registerForEvent";

/// A single declared function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    /// Parameter name (informational).
    #[serde(default)]
    pub name: String,
    /// Solidity type string, e.g. `uint256`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A function entry from a JSON ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAbi {
    /// Function name.
    pub name: String,
    /// Declared inputs in order.
    pub inputs: Vec<Param>,
}

impl FunctionAbi {
    /// Canonical signature used for the selector, e.g. `registerForEvent(uint256)`.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .inputs
            .iter()
            .map(|p| canonical_type(&p.kind))
            .collect();
        format!("{}({})", self.name, params.join(","))
    }

    /// The 4-byte function selector.
    pub fn selector(&self) -> [u8; 4] {
        function_selector(&self.signature())
    }
}

/// Raw ABI entry; non-function entries are dropped after parsing.
#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<Param>,
}

fn default_entry_type() -> String {
    String::from("function")
}

/// The callable surface of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContractInterface {
    functions: Vec<FunctionAbi>,
}

impl ContractInterface {
    /// Parse a JSON ABI array.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::InvalidInterface`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let entries: Vec<AbiEntry> =
            serde_json::from_str(json).map_err(|e| AbiError::InvalidInterface(e.to_string()))?;
        let functions = entries
            .into_iter()
            .filter(|e| e.kind == "function")
            .map(|e| FunctionAbi {
                name: e.name,
                inputs: e.inputs,
            })
            .collect();
        Ok(Self { functions })
    }

    /// The registry contract interface.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::InvalidInterface`] if the embedded ABI is malformed.
    pub fn registry() -> Result<Self, AbiError> {
        Self::from_json(REGISTRY_ABI)
    }

    /// Declared functions.
    pub fn functions(&self) -> &[FunctionAbi] {
        &self.functions
    }

    /// Resolve a function by name and number of arguments.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::UnknownFunction`] when nothing matches and
    /// [`AbiError::AmbiguousFunction`] when several overloads do.
    pub fn function(&self, name: &str, arity: usize) -> Result<&FunctionAbi, AbiError> {
        let mut matches = self
            .functions
            .iter()
            .filter(|f| f.name == name && f.inputs.len() == arity);
        let first = matches.next().ok_or_else(|| AbiError::UnknownFunction {
            name: name.to_owned(),
            arity,
        })?;
        if matches.next().is_some() {
            return Err(AbiError::AmbiguousFunction(name.to_owned()));
        }
        Ok(first)
    }

    /// Produce call data for `name(args...)`.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError`] if the function cannot be resolved or an
    /// argument does not fit its declared type.
    pub fn encode_function_data(&self, name: &str, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        let function = self.function(name, args.len())?;
        let mut data = Vec::with_capacity(
            WORD_LEN
                .saturating_mul(args.len())
                .saturating_add(4),
        );
        data.extend_from_slice(&function.selector());
        for (index, (param, token)) in function.inputs.iter().zip(args).enumerate() {
            let kind = ParamType::parse(&param.kind)?;
            let word = kind.encode(token).ok_or_else(|| AbiError::ArgumentMismatch {
                index,
                expected: canonical_type(&param.kind),
            })?;
            data.extend_from_slice(&word);
        }
        Ok(data)
    }
}

/// A call argument value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Unsigned integer.
    Uint(u128),
    /// Account address.
    Address(Address),
    /// Boolean.
    Bool(bool),
}

/// Static parameter types understood by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamType {
    Uint(u16),
    Address,
    Bool,
}

impl ParamType {
    fn parse(kind: &str) -> Result<Self, AbiError> {
        let unsupported = || AbiError::UnsupportedType(kind.to_owned());
        match kind {
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            "uint" => Ok(Self::Uint(256)),
            other => {
                let bits: u16 = other
                    .strip_prefix("uint")
                    .and_then(|b| b.parse().ok())
                    .ok_or_else(unsupported)?;
                if bits == 0 || bits > 256 || bits % 8 != 0 {
                    return Err(unsupported());
                }
                Ok(Self::Uint(bits))
            }
        }
    }

    fn encode(self, token: &Token) -> Option<[u8; WORD_LEN]> {
        match (self, token) {
            (Self::Uint(bits), Token::Uint(value)) => {
                if bits < 128 && *value >> bits != 0 {
                    return None;
                }
                Some(right_aligned(&value.to_be_bytes()))
            }
            (Self::Address, Token::Address(addr)) => Some(right_aligned(addr.as_bytes())),
            (Self::Bool, Token::Bool(flag)) => Some(right_aligned(&[u8::from(*flag)])),
            _ => None,
        }
    }
}

/// Left-pad `bytes` with zeros into a single word.
fn right_aligned(bytes: &[u8]) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    for (dst, src) in word.iter_mut().rev().zip(bytes.iter().rev()) {
        *dst = *src;
    }
    word
}

/// Expand aliases so selectors hash the canonical form.
fn canonical_type(kind: &str) -> String {
    match kind {
        "uint" => String::from("uint256"),
        other => other.to_owned(),
    }
}

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    for (dst, src) in selector.iter_mut().zip(hash.iter()) {
        *dst = *src;
    }
    selector
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    const ERC20_ABI: &str = r#"[
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}]},
        {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}]},
        {"type":"event","name":"Transfer","inputs":[]}
    ]"#;

    #[test]
    fn well_known_selectors() {
        assert_eq!(
            hex::encode(function_selector("transfer(address,uint256)")),
            "a9059cbb"
        );
        assert_eq!(hex::encode(function_selector("balanceOf(address)")), "70a08231");
    }

    #[test]
    fn events_are_not_functions() {
        let iface = ContractInterface::from_json(ERC20_ABI).unwrap();
        assert_eq!(iface.functions().len(), 2);
        assert!(iface.function("Transfer", 0).is_err());
    }

    #[test]
    fn encodes_transfer_call() {
        let iface = ContractInterface::from_json(ERC20_ABI).unwrap();
        let to = Address::from_bytes([0x11; 20]);
        let data = iface
            .encode_function_data("transfer", &[Token::Address(to), Token::Uint(1000)])
            .unwrap();

        assert_eq!(data.len(), 4 + 64);
        let encoded = hex::encode(&data);
        assert!(encoded.starts_with("a9059cbb"));
        assert_eq!(
            &encoded[8..72],
            "0000000000000000000000001111111111111111111111111111111111111111"
        );
        assert!(encoded.ends_with("03e8"));
    }

    #[test]
    fn registry_encodes_event_id() {
        let iface = ContractInterface::registry().unwrap();
        let function = iface.function(REGISTER_FOR_EVENT, 1).unwrap();
        assert_eq!(function.signature(), "registerForEvent(uint256)");

        let data = iface
            .encode_function_data(REGISTER_FOR_EVENT, &[Token::Uint(2)])
            .unwrap();
        assert_eq!(&data[..4], &function_selector("registerForEvent(uint256)"));
        assert_eq!(data.len(), 36);
        assert_eq!(data[35], 2);
        assert!(data[4..35].iter().all(|b| *b == 0));
    }

    #[test]
    fn wrong_arity_is_unknown_function() {
        let iface = ContractInterface::registry().unwrap();
        let err = iface
            .encode_function_data(REGISTER_FOR_EVENT, &[])
            .unwrap_err();
        assert_eq!(
            err,
            AbiError::UnknownFunction {
                name: String::from(REGISTER_FOR_EVENT),
                arity: 0
            }
        );
    }

    #[test]
    fn mismatched_token_is_rejected() {
        let iface = ContractInterface::registry().unwrap();
        let err = iface
            .encode_function_data(REGISTER_FOR_EVENT, &[Token::Bool(true)])
            .unwrap_err();
        assert!(matches!(err, AbiError::ArgumentMismatch { index: 0, .. }));
    }

    #[test]
    fn narrow_uint_overflow_is_rejected() {
        let iface = ContractInterface::from_json(
            r#"[{"type":"function","name":"f","inputs":[{"type":"uint8"}]}]"#,
        )
        .unwrap();
        assert!(iface.encode_function_data("f", &[Token::Uint(255)]).is_ok());
        assert!(iface.encode_function_data("f", &[Token::Uint(256)]).is_err());
    }

    #[test]
    fn dynamic_types_are_unsupported() {
        let iface = ContractInterface::from_json(
            r#"[{"type":"function","name":"f","inputs":[{"type":"string"}]}]"#,
        )
        .unwrap();
        let err = iface.encode_function_data("f", &[Token::Uint(1)]).unwrap_err();
        assert_eq!(err, AbiError::UnsupportedType(String::from("string")));
    }

    #[test]
    fn overloads_with_same_arity_are_ambiguous() {
        let iface = ContractInterface::from_json(
            r#"[
                {"type":"function","name":"f","inputs":[{"type":"uint256"}]},
                {"type":"function","name":"f","inputs":[{"type":"address"}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            iface.function("f", 1).unwrap_err(),
            AbiError::AmbiguousFunction(String::from("f"))
        );
    }
}
