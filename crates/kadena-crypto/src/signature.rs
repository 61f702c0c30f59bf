//! Ed25519 signing of command hashes
//!
//! The signature covers the 32 raw digest bytes, not the base64url hash id.
//! Ed25519 is deterministic, so the same (hash, key) pair always produces
//! the same signature.

use crate::encoding::decode_hex_32;
use crate::hash::{hash_str, PactHash};
use crate::{CryptoError, CryptoResult};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

/// Ed25519 key material for a single account
///
/// The secret key is optional: a public-only pair still fills in signer and
/// sender fields of a command but produces no signature.
#[derive(Clone)]
pub struct KeyPair {
    public: VerifyingKey,
    secret: Option<SigningKey>,
}

impl KeyPair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        use rand::rngs::OsRng;
        let mut csprng = OsRng;
        let secret_bytes: [u8; 32] = rand::Rng::gen(&mut csprng);
        Self::from_signing_key(SigningKey::from_bytes(&secret_bytes))
    }

    /// Build from a secret key, deriving the public key
    pub fn from_signing_key(secret: SigningKey) -> Self {
        KeyPair {
            public: secret.verifying_key(),
            secret: Some(secret),
        }
    }

    /// Parse a 64-character hex secret key and derive the public key
    pub fn from_secret_hex(secret_hex: &str) -> CryptoResult<Self> {
        Ok(Self::from_signing_key(parse_secret_key_hex(secret_hex)?))
    }

    /// Parse both halves; the public key must match the secret key
    pub fn from_hex(secret_hex: &str, public_hex: &str) -> CryptoResult<Self> {
        let pair = Self::from_secret_hex(secret_hex)?;
        let public = parse_public_key_hex(public_hex)?;
        if public != pair.public {
            return Err(CryptoError::invalid_key_format(
                "Public key does not match secret key",
            ));
        }
        Ok(pair)
    }

    /// Public-only key pair, able to populate signers but not to sign
    pub fn from_public_hex(public_hex: &str) -> CryptoResult<Self> {
        Ok(KeyPair {
            public: parse_public_key_hex(public_hex)?,
            secret: None,
        })
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public.as_bytes())
    }

    /// Secret key as lowercase hex, if present
    pub fn secret_key_hex(&self) -> Option<String> {
        self.secret.as_ref().map(|s| hex::encode(s.to_bytes()))
    }

    /// The verifying key
    pub fn public_key(&self) -> &VerifyingKey {
        &self.public
    }

    /// Whether this pair can produce signatures
    pub fn can_sign(&self) -> bool {
        self.secret.is_some()
    }

    /// `k:` account name for this public key
    pub fn k_account(&self) -> String {
        format!("k:{}", self.public_key_hex())
    }

    /// Sign a hash; `None` for a public-only pair
    pub fn sign_hash(&self, hash: &PactHash) -> Option<Signature> {
        self.secret.as_ref().map(|secret| secret.sign(hash.as_ref()))
    }

    /// Sign a hash and render the signature as lowercase hex
    pub fn sign_hash_hex(&self, hash: &PactHash) -> Option<String> {
        self.sign_hash(hash).map(|sig| hex::encode(sig.to_bytes()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_key_hex())
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
            && self.secret.as_ref().map(SigningKey::to_bytes)
                == other.secret.as_ref().map(SigningKey::to_bytes)
    }
}

impl Eq for KeyPair {}

/// Parse Ed25519 secret key from hex string
pub fn parse_secret_key_hex(hex_key: &str) -> CryptoResult<SigningKey> {
    let bytes = decode_hex_32(hex_key, "Secret key")?;
    Ok(SigningKey::from_bytes(&bytes))
}

/// Parse Ed25519 public key from hex string
pub fn parse_public_key_hex(hex_key: &str) -> CryptoResult<VerifyingKey> {
    let bytes = decode_hex_32(hex_key, "Public key")?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| CryptoError::invalid_key_format(e.to_string()))
}

/// Parse Ed25519 signature from hex string
pub fn parse_signature_hex(hex_sig: &str) -> CryptoResult<Signature> {
    let bytes = hex::decode(hex_sig)
        .map_err(|e| CryptoError::invalid_key_format(format!("Signature is not valid hex: {e}")))?;
    let array: [u8; 64] = bytes
        .try_into()
        .map_err(|_| CryptoError::invalid_key_format("Signature must be 64 bytes"))?;
    Ok(Signature::from_bytes(&array))
}

/// Sign a base64url hash id with a hex secret key, returning a hex signature
pub fn sign(hash_id: &str, secret_hex: &str) -> CryptoResult<String> {
    let hash = PactHash::from_base64url(hash_id)?;
    let secret = parse_secret_key_hex(secret_hex)?;
    Ok(hex::encode(secret.sign(hash.as_ref()).to_bytes()))
}

/// Hash a canonical string and sign the result in one step
///
/// Returns `(hash_id, signature_hex)`.
pub fn hash_and_sign(canonical: &str, secret_hex: &str) -> CryptoResult<(String, String)> {
    let secret = parse_secret_key_hex(secret_hex)?;
    let hash = hash_str(canonical);
    let signature = secret.sign(hash.as_ref());
    Ok((hash.to_base64url(), hex::encode(signature.to_bytes())))
}

/// Verify a hex signature over a hash id with a hex public key
pub fn verify(hash_id: &str, signature_hex: &str, public_hex: &str) -> CryptoResult<bool> {
    let hash = PactHash::from_base64url(hash_id)?;
    let public = parse_public_key_hex(public_hex)?;
    let signature = parse_signature_hex(signature_hex)?;
    Ok(public.verify(hash.as_ref(), &signature).is_ok())
}
