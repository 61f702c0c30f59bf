//! Client error types

use kadena_crypto::CryptoError;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by command building and submission
///
/// Nothing is retried internally; every failure reaches the caller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Hashing or signing failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The request never produced an HTTP response
    #[error("Network unreachable at {url}: {message}")]
    NetworkUnreachable {
        /// Target URL
        url: String,
        /// Transport error message
        message: String,
    },

    /// The node answered with a non-2xx status
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        /// Target URL
        url: String,
        /// Response status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// A field the protocol requires was missing from a response
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// What was missing or unparseable
        message: String,
    },

    /// A local execution finished with a non-success status
    #[error("Pact execution failed: {error}")]
    PactExecution {
        /// The `result` object returned by the node
        error: Value,
    },

    /// Request or response JSON could not be (de)serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration was rejected
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },
}

impl ClientError {
    /// Create a malformed response error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        ClientError::MalformedResponse {
            message: msg.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        ClientError::InvalidConfig {
            message: msg.into(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
