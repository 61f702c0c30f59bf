//! Blake2b-256 content hashing for Pact commands
//!
//! A command hash is the Blake2b-256 digest of the exact bytes of the `cmd`
//! string, rendered as unpadded base64url (43 characters). Structured values
//! are first rendered as minimal JSON: no whitespace between tokens and keys
//! in the order the caller inserted them. Keys are never sorted here.

use crate::encoding::{base64url_decode, base64url_encode};
use crate::{CryptoError, CryptoResult};
use blake2::{Blake2b, Digest};
use digest::consts::U32;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

type Blake2b256 = Blake2b<U32>;

/// Fixed hash length (32 bytes / 256 bits)
pub const HASH_LENGTH: usize = 32;

/// Length of a hash id rendered as unpadded base64url
pub const HASH_ID_LENGTH: usize = 43;

/// Blake2b-256 digest of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PactHash {
    bytes: [u8; HASH_LENGTH],
}

impl PactHash {
    /// Create a new hash from bytes
    pub fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        PactHash { bytes }
    }

    /// Create from slice (validates length)
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; HASH_LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::invalid_hash(format!(
                "Hash must be {HASH_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(PactHash::new(bytes))
    }

    /// Get the raw bytes
    pub fn bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.bytes
    }

    /// Render as the hash id the network expects
    pub fn to_base64url(&self) -> String {
        base64url_encode(&self.bytes)
    }

    /// Parse a hash id; trailing `=` padding is accepted
    pub fn from_base64url(s: &str) -> CryptoResult<Self> {
        Self::from_slice(&base64url_decode(s)?)
    }
}

impl fmt::Display for PactHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64url())
    }
}

impl FromStr for PactHash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64url(s)
    }
}

impl AsRef<[u8]> for PactHash {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Serialize for PactHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64url())
    }
}

impl<'de> Deserialize<'de> for PactHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PactHash::from_base64url(&s).map_err(serde::de::Error::custom)
    }
}

/// Blake2b-256 over raw bytes
pub fn pact_hash(data: &[u8]) -> PactHash {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash_bytes = [0u8; HASH_LENGTH];
    hash_bytes.copy_from_slice(&result);
    PactHash::new(hash_bytes)
}

/// Hash the UTF-8 bytes of a string as-is
pub fn hash_str(value: &str) -> PactHash {
    pact_hash(value.as_bytes())
}

/// Hash a JSON value
///
/// A top-level string is hashed as raw text. Objects and arrays are rendered
/// as minimal JSON in insertion order. Anything else is rejected.
pub fn hash_json(value: &Value) -> CryptoResult<PactHash> {
    match value {
        Value::String(s) => Ok(hash_str(s)),
        Value::Object(_) | Value::Array(_) => Ok(hash_str(&serde_json::to_string(value)?)),
        Value::Number(_) => Err(CryptoError::InvalidInputType { found: "number" }),
        Value::Bool(_) => Err(CryptoError::InvalidInputType { found: "bool" }),
        Value::Null => Err(CryptoError::InvalidInputType { found: "null" }),
    }
}

/// Hash a serializable value through its minimal JSON rendering
///
/// Field order follows the `Serialize` impl, so for derived structs it is the
/// declaration order.
pub fn hash_serialize<T: Serialize + ?Sized>(value: &T) -> CryptoResult<PactHash> {
    hash_json(&serde_json::to_value(value)?)
}

/// Check that `data` hashes to `expected`
pub fn verify_hash(expected: &PactHash, data: &[u8]) -> bool {
    pact_hash(data) == *expected
}
