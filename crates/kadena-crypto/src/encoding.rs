//! Encoding utilities for crypto operations
//!
//! Hash ids travel as unpadded base64url, keys and signatures as hex.

use crate::{CryptoError, CryptoResult};
use base64ct::{Base64UrlUnpadded, Encoding};

/// Base64 URL-safe encoding without padding
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64 URL-safe decoding; trailing `=` padding is accepted and ignored
pub fn base64url_decode(data: &str) -> CryptoResult<Vec<u8>> {
    Base64UrlUnpadded::decode_vec(data.trim_end_matches('='))
        .map_err(|e| CryptoError::invalid_hash(format!("Base64 decode error: {e}")))
}

/// Decode a hex string into exactly 32 bytes
///
/// `what` names the value in the error message ("Secret key", "Public key").
pub fn decode_hex_32(data: &str, what: &str) -> CryptoResult<[u8; 32]> {
    if data.len() != 64 {
        return Err(CryptoError::invalid_key_format(format!(
            "{what} must be 64 hex characters, got {}",
            data.len()
        )));
    }

    let bytes = hex::decode(data)
        .map_err(|e| CryptoError::invalid_key_format(format!("{what} is not valid hex: {e}")))?;

    bytes.try_into().map_err(|_| {
        CryptoError::invalid_key_format(format!("{what} must decode to 32 bytes"))
    })
}
