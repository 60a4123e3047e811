//! HTTP access to the records API.
//!
//! Screens talk to the server only through [`RecordsApi`], which moves untyped JSON. Typed
//! decoding happens in the helpers below so that test doubles stay trivial.

use crate::config::ClientConfig;
use crate::{AdminError, AdminResult};
use async_trait::async_trait;
use bolnica_types::RecordId;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Remote collection operations.
///
/// `path` is a collection path such as `bolnice`. Implementations resolve with the decoded JSON
/// body on a 2xx response and with [`AdminError::Status`] otherwise.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    async fn list(&self, path: &str) -> AdminResult<Value>;
    async fn create(&self, path: &str, body: Value) -> AdminResult<Value>;
    async fn update(&self, path: &str, id: RecordId, body: Value) -> AdminResult<Value>;
    async fn delete(&self, path: &str, id: RecordId) -> AdminResult<()>;
}

/// [`RecordsApi`] over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    cfg: Arc<ClientConfig>,
}

impl HttpApi {
    pub fn new(cfg: Arc<ClientConfig>) -> AdminResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(AdminError::ClientBuild)?;
        Ok(Self { client, cfg })
    }

    /// Send one request and return the raw body of a successful response.
    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> AdminResult<String> {
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport = |source| AdminError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "request rejected");
            return Err(AdminError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    async fn send_json(&self, method: Method, url: Url, body: Option<&Value>) -> AdminResult<Value> {
        let text = self.send(method, url.clone(), body).await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| AdminError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RecordsApi for HttpApi {
    async fn list(&self, path: &str) -> AdminResult<Value> {
        let url = self.cfg.collection_url(path)?;
        self.send_json(Method::GET, url, None).await
    }

    async fn create(&self, path: &str, body: Value) -> AdminResult<Value> {
        let url = self.cfg.collection_url(path)?;
        self.send_json(Method::POST, url, Some(&body)).await
    }

    async fn update(&self, path: &str, id: RecordId, body: Value) -> AdminResult<Value> {
        let url = self.cfg.record_url(path, id)?;
        self.send_json(Method::PUT, url, Some(&body)).await
    }

    async fn delete(&self, path: &str, id: RecordId) -> AdminResult<()> {
        // Success bodies are empty or plain text; only the status matters.
        let url = self.cfg.record_url(path, id)?;
        self.send(Method::DELETE, url, None).await.map(|_| ())
    }
}

/// Fetch and decode a whole collection.
pub async fn fetch_all<E: DeserializeOwned>(
    api: &dyn RecordsApi,
    path: &'static str,
) -> AdminResult<Vec<E>> {
    let value = api.list(path).await?;
    serde_json::from_value(value).map_err(|source| AdminError::Decode {
        url: path.to_string(),
        source,
    })
}
