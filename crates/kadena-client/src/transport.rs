//! HTTP transport seam
//!
//! The client only needs "GET a JSON document" and "POST a JSON body, get a
//! JSON document back". [`HttpTransport`] does that over `reqwest`; tests
//! substitute an in-memory implementation.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// JSON request/response transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and parse the body as JSON
    async fn get(&self, url: &str) -> ClientResult<Value>;

    /// POST `body` as JSON to `url` and parse the response body as JSON
    async fn post(&self, url: &str, body: &Value) -> ClientResult<Value>;
}

/// `reqwest`-backed transport
///
/// No request timeout is set: `/listen` is held open by the node until the
/// transaction resolves. Wrap calls in `tokio::time::timeout` if needed.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with a default `reqwest` client
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport over a preconfigured client (proxies, TLS roots, timeouts)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> ClientResult<Value> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_unreachable(url, &e))?;
        read_json(url, response).await
    }

    async fn post(&self, url: &str, body: &Value) -> ClientResult<Value> {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| network_unreachable(url, &e))?;
        read_json(url, response).await
    }
}

fn network_unreachable(url: &str, err: &reqwest::Error) -> ClientError {
    ClientError::NetworkUnreachable {
        url: url.to_string(),
        message: err.to_string(),
    }
}

async fn read_json(url: &str, response: reqwest::Response) -> ClientResult<Value> {
    let status = response.status();
    let text = response.text().await.map_err(|e| network_unreachable(url, &e))?;

    if !status.is_success() {
        return Err(ClientError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| ClientError::malformed(format!("{url} returned invalid JSON: {e}")))
}
