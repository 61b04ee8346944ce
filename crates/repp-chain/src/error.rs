//! Error types for chain plumbing.
//!
//! Uses `thiserror` for typed errors that surface from call encoding,
//! the JSON-RPC transport, and wallet providers.

/// Errors raised while resolving a function in a contract interface or
/// encoding its arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// The interface description could not be parsed.
    #[error("invalid interface description: {0}")]
    InvalidInterface(String),

    /// No function with this name and arity exists in the interface.
    #[error("unknown function {name} with {arity} argument(s)")]
    UnknownFunction {
        /// Requested function name.
        name: String,
        /// Number of arguments supplied.
        arity: usize,
    },

    /// More than one overload matches the name and arity.
    #[error("ambiguous function {0}: several overloads match")]
    AmbiguousFunction(String),

    /// The interface declares a parameter type this encoder does not handle.
    #[error("unsupported parameter type: {0}")]
    UnsupportedType(String),

    /// An argument does not match the declared parameter type.
    #[error("argument {index} does not fit {expected}")]
    ArgumentMismatch {
        /// Zero-based argument position.
        index: usize,
        /// The declared parameter type.
        expected: String,
    },
}

/// Errors that can occur talking to a wallet provider or chain endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The endpoint answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// JSON-RPC error message.
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The call payload could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] AbiError),

    /// The wallet provider refused or could not complete the request.
    #[error("wallet provider error: {0}")]
    Provider(String),

    /// The endpoint reports a different network than configured.
    #[error("chain id mismatch: expected {expected}, endpoint reports {actual}")]
    ChainMismatch {
        /// Configured chain id.
        expected: u64,
        /// Chain id reported by the endpoint.
        actual: u64,
    },

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
