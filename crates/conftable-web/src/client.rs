//! HTTP client for a running conference table service.
//!
//! [`RemoteConference`] implements [`ConferenceTable`] by calling the
//! endpoints registered in [`WebServer`](crate::WebServer), so an agent can
//! switch between the file store and the HTTP service without other code
//! changes. No retries are attempted; request timeouts are whatever the
//! supplied `reqwest::Client` is configured with.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use conftable_store::{
    ConferenceStatus, ConferenceTable, JoinReceipt, MessageBatch, PostReceipt, StoreError,
    StoreResult,
};

/// A conference table reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteConference {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteConference {
    /// Talk to the service at `base_url` (e.g. `http://127.0.0.1:5001`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Like [`new`](Self::new) but with a caller-configured client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Health check. Returns the service's greeting.
    pub async fn ping(&self) -> StoreResult<String> {
        let body: Value = self.send(self.client.get(self.url("/ping")), "ping").await?;
        Ok(body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned())
    }

    /// Send a request and parse the JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        op: &str,
    ) -> StoreResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Remote(format!("{op} request failed: {e}")))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| StoreError::Remote(format!("failed to read {op} response: {e}")))?;

        if !status.is_success() {
            return Err(StoreError::Remote(format!(
                "{op} returned {}: {body_text}",
                status.as_u16()
            )));
        }

        debug!(op, status = status.as_u16(), "remote table responded");
        serde_json::from_str(&body_text)
            .map_err(|e| StoreError::Remote(format!("failed to parse {op} response: {e}")))
    }
}

#[async_trait]
impl ConferenceTable for RemoteConference {
    async fn join(&self, agent_id: &str, role: &str) -> StoreResult<JoinReceipt> {
        let request = self
            .client
            .post(self.url("/join"))
            .json(&json!({ "agent_id": agent_id, "role": role }));
        self.send(request, "join").await
    }

    async fn post(&self, agent_id: &str, message: &str, kind: &str) -> StoreResult<PostReceipt> {
        let request = self.client.post(self.url("/post")).json(&json!({
            "agent_id": agent_id,
            "message": message,
            "type": kind,
        }));
        self.send(request, "post").await
    }

    async fn messages_since(&self, since_id: u64) -> StoreResult<MessageBatch> {
        let request = self
            .client
            .get(self.url("/messages"))
            .query(&[("since_id", since_id)]);
        self.send(request, "messages").await
    }

    async fn conclude(&self, agent_id: &str, conclusion: &str) -> StoreResult<()> {
        let request = self
            .client
            .post(self.url("/conclude"))
            .json(&json!({ "agent_id": agent_id, "conclusion": conclusion }));
        let _: Value = self.send(request, "conclude").await?;
        Ok(())
    }

    async fn status(&self) -> StoreResult<ConferenceStatus> {
        self.send(self.client.get(self.url("/status")), "status").await
    }

    async fn clear(&self) -> StoreResult<()> {
        Err(StoreError::Unsupported("clear over HTTP"))
    }
}
