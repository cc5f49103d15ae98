//! HTTP client bootstrap and error mapping.
//!
//! One [`ApiClient`] per configured server. All request helpers funnel
//! through the same status mapping: 401/403 become the distinct
//! authentication error, any other non-success status carries the response
//! body as the message, and transport timeouts are told apart from other
//! transport failures.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use postea_core::{PosteaError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

const USER_AGENT: &str = concat!("Postea/", env!("CARGO_PKG_VERSION"));

/// REST client for the backing read-it-later server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    timeout: u64,
}

impl ApiClient {
    /// Creates a client for a server base URL with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit timeout in seconds.
    pub fn with_timeout(base_url: &str, timeout: u64) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| PosteaError::InvalidUrl(e.to_string()))?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(PosteaError::InvalidUrl(format!("unsupported scheme: {}", base_url.scheme())));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PosteaError::Http(e.to_string()))?;

        Ok(Self { base_url, http, timeout })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        // Joining with a relative path keeps any base-path prefix the server
        // is mounted under.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| PosteaError::InvalidUrl(e.to_string()))
    }

    fn map_transport(&self, err: reqwest::Error) -> PosteaError {
        if err.is_timeout() {
            PosteaError::Timeout { timeout: self.timeout }
        } else {
            PosteaError::Http(err.to_string())
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() { status.to_string() } else { truncate(&body, 300) };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%status, "authentication rejected by server");
            return Err(PosteaError::Auth(message));
        }
        Err(PosteaError::Api { status: status.as_u16(), message })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).send().await.map_err(|e| self.map_transport(e))?;
        let response = self.check(response).await?;
        response.json().await.map_err(|e| PosteaError::Http(e.to_string()))
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self, path: &str, query: &Q,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET with query");
        let response = self.http.get(url).query(query).send().await.map_err(|e| self.map_transport(e))?;
        let response = self.check(response).await?;
        response.json().await.map_err(|e| PosteaError::Http(e.to_string()))
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self, path: &str, body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await.map_err(|e| self.map_transport(e))?;
        let response = self.check(response).await?;
        response.json().await.map_err(|e| PosteaError::Http(e.to_string()))
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.post_json(path, &serde_json::json!({})).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "DELETE");
        let response = self.http.delete(url).send().await.map_err(|e| self.map_transport(e))?;
        self.check(response).await?;
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
