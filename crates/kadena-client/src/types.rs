//! Pact API request and response bodies

use crate::envelope::SignedEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Pact API endpoint under `/chainweb/0.0/{network}/chain/{chain}/pact/api/v1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Submit to the mempool
    Send,
    /// Non-consensus dry run
    Local,
    /// Block until a request key has a result
    Listen,
}

impl Endpoint {
    /// Path suffix, including the leading slash
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Send => "/send",
            Endpoint::Local => "/local",
            Endpoint::Listen => "/listen",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Send endpoint request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    /// Envelopes to submit
    pub cmds: Vec<SignedEnvelope>,
}

/// Send endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    /// Request keys for submitted commands
    #[serde(rename = "requestKeys")]
    pub request_keys: Vec<String>,
}

/// Listen endpoint request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenRequest {
    /// Request key to wait for
    pub listen: String,
}

/// Outcome inside a `result` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PactResult {
    /// Execution succeeded
    Success {
        /// Value the code evaluated to
        data: Value,
    },
    /// Execution failed
    Failure {
        /// Error object reported by the node
        error: Value,
    },
}

/// Relevant part of the node's `/config` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Network id used in every Pact API URL
    #[serde(rename = "chainwebVersion")]
    pub chainweb_version: String,
}
