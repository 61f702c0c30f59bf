//! Submission client
//!
//! Every batch operation handles each chain independently: one chain failing
//! never aborts the others, and results come back keyed by chain id in the
//! order the commands were given.

use crate::command::{ChainCommands, Command, CommandBuilder, EnvData, Payload};
use crate::config::{ClientConfig, CommandOptions};
use crate::envelope::SignedEnvelope;
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Endpoint, ListenRequest, NodeConfig, PactResult, SendRequest};
use futures::future::join_all;
use indexmap::IndexMap;
use kadena_crypto::KeyPair;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Chain used by [`KadenaClient::run_pact`] callers that do not care
pub const DEFAULT_CHAIN_ID: &str = "0";

/// Per-chain outcome of a batch submission
pub type ChainResults = IndexMap<String, ClientResult<Value>>;

/// Client for one chainweb network
#[derive(Debug)]
pub struct KadenaClient<T = HttpTransport> {
    base_url: String,
    network_id: String,
    key_pair: Option<KeyPair>,
    defaults: CommandOptions,
    transport: T,
}

impl KadenaClient<HttpTransport> {
    /// Connect over HTTP, discovering the network id from `/config`
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        Self::connect_with(config, HttpTransport::new()).await
    }
}

impl<T: Transport> KadenaClient<T> {
    /// Connect over `transport`, discovering the network id from `/config`
    ///
    /// An unreachable node or a response without `chainwebVersion` fails
    /// construction.
    pub async fn connect_with(config: ClientConfig, transport: T) -> ClientResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let url = format!("{base_url}/config");
        let body = transport.get(&url).await?;
        let node: NodeConfig = serde_json::from_value(body).map_err(|e| {
            ClientError::malformed(format!("{url} has no usable chainwebVersion: {e}"))
        })?;
        info!(%base_url, network_id = %node.chainweb_version, "discovered chainweb network");

        Self::assemble(config, base_url, node.chainweb_version, transport)
    }

    /// Build a client for a known network id without contacting the node
    pub fn with_network_id(
        config: ClientConfig,
        network_id: impl Into<String>,
        transport: T,
    ) -> ClientResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        Self::assemble(config, base_url, network_id.into(), transport)
    }

    fn assemble(
        config: ClientConfig,
        base_url: String,
        network_id: String,
        transport: T,
    ) -> ClientResult<Self> {
        Ok(Self {
            key_pair: config.load_key_pair()?,
            defaults: config.defaults,
            base_url,
            network_id,
            transport,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Network id, e.g. `testnet04`
    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// Configured key pair
    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    /// Replace the signing key pair
    pub fn set_key_pair(&mut self, key_pair: KeyPair) {
        self.key_pair = Some(key_pair);
    }

    /// Drop the signing key pair; later submissions go out unsigned
    pub fn clear_key_pair(&mut self) {
        self.key_pair = None;
    }

    /// Options applied by [`Self::command_builder`]
    pub fn defaults(&self) -> &CommandOptions {
        &self.defaults
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pact API URL for an endpoint on a chain
    pub fn url(&self, endpoint: Endpoint, chain_id: &str) -> String {
        format!(
            "{}/chainweb/0.0/{}/chain/{}/pact/api/v1{}",
            self.base_url,
            self.network_id,
            chain_id,
            endpoint.path()
        )
    }

    /// Command builder preloaded with this client's network, defaults and account
    pub fn command_builder(&self, payload: Payload) -> CommandBuilder {
        self.builder_with(payload, self.defaults.clone())
    }

    /// One command per chain id
    pub fn build_command<I, S>(
        &self,
        payload: Payload,
        chain_ids: I,
        options: CommandOptions,
    ) -> ChainCommands
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builder_with(payload, options).build(chain_ids)
    }

    fn builder_with(&self, payload: Payload, options: CommandOptions) -> CommandBuilder {
        let builder = CommandBuilder::new(self.network_id.clone(), payload).options(options);
        match &self.key_pair {
            Some(key_pair) => builder.key_pair(key_pair),
            None => builder,
        }
    }

    /// Serialize, hash and sign a command with the configured key pair
    pub fn seal(&self, command: &Command) -> ClientResult<SignedEnvelope> {
        SignedEnvelope::seal(command, self.key_pair.as_ref())
    }

    /// Submit each command to its chain's `/send` endpoint
    pub async fn send(&self, commands: &ChainCommands) -> ChainResults {
        self.submit_all(Submission::Send, commands).await
    }

    /// Dry-run each command on its chain's `/local` endpoint
    pub async fn local(&self, commands: &ChainCommands) -> ChainResults {
        self.submit_all(Submission::Local, commands).await
    }

    /// Evaluate `code` with `/local` on one chain and return `result.data`
    pub async fn run_pact(
        &self,
        code: &str,
        env_data: EnvData,
        chain_id: &str,
    ) -> ClientResult<Value> {
        let command = self
            .command_builder(Payload::exec(code, env_data))
            .build_one(chain_id);
        let response = self.submit(Submission::Local, &command).await?;
        local_result_data(&response)
    }

    /// Wait for the result of a request key on a chain
    ///
    /// The node holds the connection open until the transaction resolves or
    /// its own timeout fires; no client-side timeout is applied.
    pub async fn listen(&self, request_key: &str, chain_id: &str) -> ClientResult<Value> {
        let body = serde_json::to_value(ListenRequest {
            listen: request_key.to_string(),
        })?;
        let url = self.url(Endpoint::Listen, chain_id);
        debug!(%request_key, %chain_id, "listening");
        self.transport.post(&url, &body).await
    }

    /// Send one command, then listen for its first request key
    pub async fn send_and_listen(&self, command: &Command) -> ClientResult<Value> {
        let response = self.submit(Submission::Send, command).await?;
        let request_key = first_request_key(&response)?;
        self.listen(&request_key, command.chain_id()).await
    }

    async fn submit_all(&self, submission: Submission, commands: &ChainCommands) -> ChainResults {
        let submissions = commands.values().map(|command| async move {
            let chain_id = command.chain_id().to_string();
            let result = self.submit(submission, command).await;
            if let Err(err) = &result {
                let endpoint = submission.endpoint();
                warn!(%endpoint, %chain_id, error = %err, "chain submission failed");
            }
            (chain_id, result)
        });

        join_all(submissions).await.into_iter().collect()
    }

    async fn submit(&self, submission: Submission, command: &Command) -> ClientResult<Value> {
        let envelope = self.seal(command)?;
        let endpoint = submission.endpoint();
        debug!(%endpoint, chain_id = %command.chain_id(), hash = %envelope.hash, "submitting");

        let body = match submission {
            Submission::Send => serde_json::to_value(SendRequest {
                cmds: vec![envelope],
            })?,
            Submission::Local => serde_json::to_value(&envelope)?,
        };
        let url = self.url(endpoint, command.chain_id());
        self.transport.post(&url, &body).await
    }
}

/// Endpoints that take a signed envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submission {
    /// `{"cmds": [envelope]}` to `/send`
    Send,
    /// Bare envelope to `/local`
    Local,
}

impl Submission {
    fn endpoint(self) -> Endpoint {
        match self {
            Submission::Send => Endpoint::Send,
            Submission::Local => Endpoint::Local,
        }
    }
}

fn normalize_base_url(base_url: &str) -> ClientResult<String> {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::invalid_config("base_url is empty"));
    }
    Ok(trimmed.to_string())
}

/// First entry of `requestKeys` in a `/send` response
pub fn first_request_key(response: &Value) -> ClientResult<String> {
    response
        .get("requestKeys")
        .and_then(Value::as_array)
        .and_then(|keys| keys.first())
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::malformed("send response has no requestKeys[0]"))
}

/// `result.data` of a successful `/local` response
pub fn local_result_data(response: &Value) -> ClientResult<Value> {
    let result = response
        .get("result")
        .ok_or_else(|| ClientError::malformed("local response has no result"))?;

    match serde_json::from_value::<PactResult>(result.clone()) {
        Ok(PactResult::Success { data }) => Ok(data),
        Ok(PactResult::Failure { .. }) => Err(ClientError::PactExecution {
            error: result.clone(),
        }),
        Err(e) => Err(ClientError::malformed(format!(
            "local result has unexpected shape: {e}"
        ))),
    }
}
