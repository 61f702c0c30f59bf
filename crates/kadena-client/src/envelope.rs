//! Signed wire envelopes
//!
//! An envelope is derived from a [`Command`] at submission time and never
//! stored. `cmd` is the exact string that was hashed; the node re-hashes it
//! and rejects the envelope if the result differs from `hash`.

use crate::command::Command;
use crate::error::ClientResult;
use kadena_crypto::{hash_str, KeyPair, PactHash};
use serde::{Deserialize, Serialize};

/// One signature, in signer order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigEntry {
    /// Signature hex string
    pub sig: String,
}

/// `{hash, sigs, cmd}` as posted to `/send` and `/local`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Command hash (unpadded base64url)
    pub hash: String,

    /// Signatures; empty when no secret key is configured
    pub sigs: Vec<SigEntry>,

    /// Canonical command JSON
    pub cmd: String,
}

impl SignedEnvelope {
    /// Serialize, hash and (if a secret key is available) sign a command
    pub fn seal(command: &Command, key_pair: Option<&KeyPair>) -> ClientResult<Self> {
        let cmd = command.to_canonical_json()?;
        Ok(Self::seal_canonical(cmd, key_pair))
    }

    /// Hash and sign an already-serialized command string
    pub fn seal_canonical(cmd: String, key_pair: Option<&KeyPair>) -> Self {
        let hash = hash_str(&cmd);
        let sigs = key_pair
            .and_then(|pair| pair.sign_hash_hex(&hash))
            .map(|sig| SigEntry { sig })
            .into_iter()
            .collect();

        SignedEnvelope {
            hash: hash.to_base64url(),
            sigs,
            cmd,
        }
    }

    /// Whether `hash` is the hash of `cmd`
    pub fn verify_hash(&self) -> bool {
        PactHash::from_base64url(&self.hash).is_ok_and(|hash| hash == hash_str(&self.cmd))
    }

    /// Parse `cmd` back into a command
    pub fn command(&self) -> ClientResult<Command> {
        Ok(serde_json::from_str(&self.cmd)?)
    }
}
