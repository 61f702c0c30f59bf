//! Client configuration
//!
//! Plain serde structs with default functions. Loading them from a file or
//! the environment is left to the embedding application.

use crate::command::Signer;
use crate::error::{ClientError, ClientResult};
use kadena_crypto::KeyPair;
use serde::{Deserialize, Serialize};

/// Testnet gateway used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://api.testnet.chainweb.com";

/// Default gas price in KDA per unit
pub const DEFAULT_GAS_PRICE: f64 = 1.0e-5;

/// Default gas limit
pub const DEFAULT_GAS_LIMIT: u64 = 2500;

/// Default time-to-live in seconds
pub const DEFAULT_TTL: u64 = 28000;

/// Connection settings for [`crate::KadenaClient`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Node or gateway URL, without the `/chainweb/...` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Signing account, as hex strings
    #[serde(default)]
    pub key_pair: Option<KeyPairConfig>,

    /// Defaults applied to every command built by the client
    #[serde(default)]
    pub defaults: CommandOptions,
}

/// Raw hex key material
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyPairConfig {
    /// Secret key (64 hex characters); absent for a public-only account
    #[serde(default)]
    pub secret: Option<String>,

    /// Public key (64 hex characters); derived from `secret` when absent
    #[serde(default)]
    pub public: Option<String>,
}

impl std::fmt::Debug for KeyPairConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("public", &self.public)
            .finish()
    }
}

/// Per-command options for the command builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOptions {
    /// Explicit signer list; defaults to the configured key pair
    #[serde(default)]
    pub signers: Option<Vec<Signer>>,

    /// Explicit sender account; defaults to `k:<public key>`
    #[serde(default)]
    pub sender: Option<String>,

    /// Gas price
    #[serde(default = "default_gas_price")]
    pub gas_price: f64,

    /// Gas limit
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    /// Time to live (in seconds)
    #[serde(default = "default_ttl")]
    pub ttl: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key_pair: None,
            defaults: CommandOptions::default(),
        }
    }
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            signers: None,
            sender: None,
            gas_price: default_gas_price(),
            gas_limit: default_gas_limit(),
            ttl: default_ttl(),
        }
    }
}

impl ClientConfig {
    /// Config for a base URL with everything else defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Attach a key pair given as hex strings
    #[must_use]
    pub fn with_key_pair(mut self, secret: Option<String>, public: Option<String>) -> Self {
        self.key_pair = Some(KeyPairConfig { secret, public });
        self
    }

    /// Decode the configured key material
    pub fn load_key_pair(&self) -> ClientResult<Option<KeyPair>> {
        self.key_pair.as_ref().map(KeyPairConfig::load).transpose()
    }
}

impl KeyPairConfig {
    /// Decode into a [`KeyPair`]
    pub fn load(&self) -> ClientResult<KeyPair> {
        let pair = match (self.secret.as_deref(), self.public.as_deref()) {
            (Some(secret), Some(public)) => KeyPair::from_hex(secret, public)?,
            (Some(secret), None) => KeyPair::from_secret_hex(secret)?,
            (None, Some(public)) => KeyPair::from_public_hex(public)?,
            (None, None) => {
                return Err(ClientError::invalid_config(
                    "key_pair needs a secret or a public key",
                ))
            }
        };
        Ok(pair)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_gas_price() -> f64 {
    DEFAULT_GAS_PRICE
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_ttl() -> u64 {
    DEFAULT_TTL
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "1de84cf16631a778317e1c33a6b729875734c129b0094e809713b7225fd3dfb7";

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.key_pair.is_none());
        assert_eq!(config.defaults.gas_limit, 2500);
        assert!((config.defaults.gas_price - 1.0e-5).abs() < f64::EPSILON);
        assert_eq!(config.defaults.ttl, 28000);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig = serde_json::from_str(
            r#"{ "base_url": "http://localhost:1848", "defaults": { "gas_limit": 10000 } }"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:1848");
        assert_eq!(config.defaults.gas_limit, 10000);
        assert_eq!(config.defaults.ttl, DEFAULT_TTL);
        assert!(config.defaults.sender.is_none());
    }

    #[test]
    fn test_load_key_pair() {
        let config = ClientConfig::default().with_key_pair(Some(SECRET.to_string()), None);
        let pair = config.load_key_pair().unwrap().unwrap();
        assert!(pair.can_sign());

        let public_only = ClientConfig::default()
            .with_key_pair(None, Some(pair.public_key_hex()))
            .load_key_pair()
            .unwrap()
            .unwrap();
        assert!(!public_only.can_sign());

        let empty = ClientConfig::default().with_key_pair(None, None);
        assert!(matches!(
            empty.load_key_pair(),
            Err(ClientError::InvalidConfig { .. })
        ));

        let bad = ClientConfig::default().with_key_pair(Some("abc".to_string()), None);
        assert!(matches!(bad.load_key_pair(), Err(ClientError::Crypto(_))));
    }
}
