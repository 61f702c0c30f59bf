//! Command types and the per-chain command builder
//!
//! Field declaration order here is the wire key order of the canonical
//! `cmd` string, so reordering fields changes every command hash.

use crate::config::CommandOptions;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use kadena_crypto::KeyPair;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Seconds subtracted from the current time for `creationTime`, so a node
/// with a slightly slower clock does not reject the command as from the future
pub const CLOCK_SKEW_SECS: i64 = 15;

/// Environment data attached to a payload
pub type EnvData = Map<String, Value>;

/// Commands keyed by chain id, in the order the chain ids were given
pub type ChainCommands = IndexMap<String, Command>;

/// What a command asks the chain to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    /// Run Pact code
    Exec(ExecMessage),
    /// Resume a multi-step pact
    Cont(ContMessage),
}

/// Execution payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecMessage {
    /// Code to execute
    pub code: String,

    /// Environment data
    #[serde(default)]
    pub data: EnvData,
}

/// Continuation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContMessage {
    /// Pact ID
    #[serde(rename = "pactId")]
    pub pact_id: String,

    /// Step number
    pub step: u64,

    /// Whether this is a rollback
    pub rollback: bool,

    /// Environment data
    #[serde(default)]
    pub data: EnvData,

    /// SPV proof for cross-chain continuations
    pub proof: Option<String>,
}

impl Payload {
    /// Exec payload
    pub fn exec(code: impl Into<String>, data: EnvData) -> Self {
        Payload::Exec(ExecMessage {
            code: code.into(),
            data,
        })
    }

    /// Continuation payload
    pub fn cont(
        pact_id: impl Into<String>,
        step: u64,
        rollback: bool,
        proof: Option<String>,
        data: EnvData,
    ) -> Self {
        Payload::Cont(ContMessage {
            pact_id: pact_id.into(),
            step,
            rollback,
            data,
            proof,
        })
    }

    /// Environment data of either variant
    pub fn data(&self) -> &EnvData {
        match self {
            Payload::Exec(exec) => &exec.data,
            Payload::Cont(cont) => &cont.data,
        }
    }
}

/// Capability a signer scopes its signature to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Qualified capability name, e.g. `coin.GAS`
    pub name: String,

    /// Capability arguments
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Signer entry; order in a command matches signature order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signer {
    /// Public key (hex)
    #[serde(rename = "pubKey")]
    pub pub_key: String,

    /// Capabilities this signer is signing for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clist: Vec<Capability>,
}

impl Signer {
    /// Unscoped signer for a public key
    pub fn new(pub_key: impl Into<String>) -> Self {
        Signer {
            pub_key: pub_key.into(),
            clist: Vec::new(),
        }
    }

    /// Add a capability to the signer's list
    #[must_use]
    pub fn with_capability(mut self, name: impl Into<String>, args: Vec<Value>) -> Self {
        self.clist.push(Capability {
            name: name.into(),
            args,
        });
        self
    }
}

/// Public metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Gas limit
    #[serde(rename = "gasLimit")]
    pub gas_limit: u64,

    /// Chain ID
    #[serde(rename = "chainId")]
    pub chain_id: String,

    /// Gas price
    #[serde(rename = "gasPrice")]
    pub gas_price: f64,

    /// Sender account
    pub sender: String,

    /// Time to live (in seconds)
    pub ttl: u64,

    /// Creation time (POSIX seconds)
    #[serde(rename = "creationTime")]
    pub creation_time: i64,
}

/// A chain-specific transaction before hashing and signing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Network ID, e.g. `testnet04`
    #[serde(rename = "networkId")]
    pub network_id: String,

    /// What to run
    pub payload: Payload,

    /// Signers, in signature order
    pub signers: Vec<Signer>,

    /// Metadata
    pub meta: Meta,

    /// Replay-protection nonce
    pub nonce: String,
}

impl Command {
    /// Target chain
    pub fn chain_id(&self) -> &str {
        &self.meta.chain_id
    }

    /// The exact string that is hashed and sent as `cmd`
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

static NONCE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Sortable nonce: UTC timestamp with microseconds plus a process-wide sequence
///
/// The sequence is zero-padded so nonces sharing a timestamp still sort in
/// creation order.
pub fn next_nonce(now: DateTime<Utc>) -> String {
    let seq = NONCE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{seq:020}", now.format("%Y%m%d%H%M%S%.6f"))
}

/// Fans one payload out into one command per chain
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    network_id: String,
    payload: Payload,
    options: CommandOptions,
    public_key: Option<String>,
}

impl CommandBuilder {
    /// Builder with default options and no key pair
    pub fn new(network_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            network_id: network_id.into(),
            payload,
            options: CommandOptions::default(),
            public_key: None,
        }
    }

    /// Replace all options
    #[must_use]
    pub fn options(mut self, options: CommandOptions) -> Self {
        self.options = options;
        self
    }

    /// Use this key pair's account for default signers and sender
    #[must_use]
    pub fn key_pair(mut self, key_pair: &KeyPair) -> Self {
        self.public_key = Some(key_pair.public_key_hex());
        self
    }

    /// Set signers
    #[must_use]
    pub fn signers(mut self, signers: Vec<Signer>) -> Self {
        self.options.signers = Some(signers);
        self
    }

    /// Set sender
    #[must_use]
    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.options.sender = Some(sender.into());
        self
    }

    /// Set gas price
    #[must_use]
    pub fn gas_price(mut self, gas_price: f64) -> Self {
        self.options.gas_price = gas_price;
        self
    }

    /// Set gas limit
    #[must_use]
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.options.gas_limit = gas_limit;
        self
    }

    /// Set TTL
    #[must_use]
    pub fn ttl(mut self, ttl: u64) -> Self {
        self.options.ttl = ttl;
        self
    }

    fn resolved_signers(&self) -> Vec<Signer> {
        match (&self.options.signers, &self.public_key) {
            (Some(signers), _) => signers.clone(),
            (None, Some(public)) => vec![Signer::new(public.clone())],
            (None, None) => Vec::new(),
        }
    }

    fn resolved_sender(&self) -> String {
        match (&self.options.sender, &self.public_key) {
            (Some(sender), _) => sender.clone(),
            (None, Some(public)) => format!("k:{public}"),
            (None, None) => String::new(),
        }
    }

    /// Build a single command for one chain
    pub fn build_one(&self, chain_id: impl Into<String>) -> Command {
        self.build_at(chain_id.into(), Utc::now(), self.resolved_signers(), self.resolved_sender())
    }

    /// Build one command per chain id
    ///
    /// A repeated chain id overwrites the earlier command; an empty list
    /// yields an empty map.
    pub fn build<I, S>(&self, chain_ids: I) -> ChainCommands
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let signers = self.resolved_signers();
        let sender = self.resolved_sender();

        let mut commands = ChainCommands::new();
        for chain_id in chain_ids {
            let command = self.build_at(chain_id.into(), Utc::now(), signers.clone(), sender.clone());
            let _ = commands.insert(command.meta.chain_id.clone(), command);
        }
        commands
    }

    fn build_at(
        &self,
        chain_id: String,
        now: DateTime<Utc>,
        signers: Vec<Signer>,
        sender: String,
    ) -> Command {
        Command {
            network_id: self.network_id.clone(),
            payload: self.payload.clone(),
            signers,
            meta: Meta {
                gas_limit: self.options.gas_limit,
                chain_id,
                gas_price: self.options.gas_price,
                sender,
                ttl: self.options.ttl,
                creation_time: now.timestamp() - CLOCK_SKEW_SECS,
            },
            nonce: next_nonce(now),
        }
    }
}
