//! Cryptographic primitives for Kadena Pact commands
//!
//! Everything the network checks about a submitted command lives here:
//!
//! - **Hashing**: Blake2b-256 over the canonical command bytes, rendered as
//!   unpadded base64url (`hash` module)
//! - **Signing**: Ed25519 over the raw hash bytes, rendered as lowercase hex
//!   (`signature` module)
//! - **Encoding**: base64url and hex helpers shared by both (`encoding` module)
//!
//! The chainweb node re-derives the hash from the `cmd` string it receives, so
//! the functions here must be bit-for-bit reproducible.

use thiserror::Error;

pub mod encoding;
pub mod hash;
pub mod signature;

pub use encoding::*;
pub use hash::*;
pub use signature::*;

/// Errors raised while hashing or signing
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Hash input was neither a string nor a JSON object/array
    #[error("Invalid input type for hashing: {found}")]
    InvalidInputType {
        /// JSON type that was rejected
        found: &'static str,
    },

    /// Key material did not decode to the expected byte length
    #[error("Invalid key format: {message}")]
    InvalidKeyFormat {
        /// Error message describing the invalid format
        message: String,
    },

    /// Hash id did not decode to a 32-byte digest
    #[error("Invalid hash: {message}")]
    InvalidHash {
        /// Error message describing the invalid hash
        message: String,
    },

    /// Value could not be serialized to canonical JSON
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CryptoError {
    /// Create an invalid key format error
    pub fn invalid_key_format<S: Into<String>>(msg: S) -> Self {
        CryptoError::InvalidKeyFormat {
            message: msg.into(),
        }
    }

    /// Create an invalid hash error
    pub fn invalid_hash<S: Into<String>>(msg: S) -> Self {
        CryptoError::InvalidHash {
            message: msg.into(),
        }
    }
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
