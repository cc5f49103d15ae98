//! Stream sources: where a dispatched shortcut's bytes come from.
//!
//! The relay is transport-agnostic behind [`StreamSource`]. The HTTP
//! implementation covers both execution paths: the backing server's
//! shortcut-processing endpoint (for the built-in server model) and a
//! configured provider's streaming endpoint. Tests substitute scripted
//! sources.

use std::collections::BTreeMap;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::Serialize;

use postea_core::{ModelRef, PosteaError, Result, SERVER_PROVIDER, TaskId};
use postea_core::model::ProviderSettings;

/// A dispatched shortcut execution request.
#[derive(Debug, Clone)]
pub struct ShortcutRequest {
    /// Unique among in-flight tasks of the dispatching relay.
    pub task_id: TaskId,
    pub shortcut_name: String,
    /// Rendered instruction text (the `{lang}` placeholder already
    /// substituted).
    pub instructions: String,
    /// Already-normalized document text in markup-light form.
    pub content: String,
    pub model: ModelRef,
    /// Server-side execution needs the saved page and shortcut ids.
    pub page_id: Option<i64>,
    pub shortcut_id: Option<i64>,
}

impl ShortcutRequest {
    /// Builds a request with a fresh task id.
    pub fn new(shortcut_name: &str, instructions: &str, content: &str, model: ModelRef) -> Self {
        Self {
            task_id: TaskId::new(),
            shortcut_name: shortcut_name.to_string(),
            instructions: instructions.to_string(),
            content: content.to_string(),
            model,
            page_id: None,
            shortcut_id: None,
        }
    }

    /// Targets the server's shortcut-processing endpoint for a saved page.
    pub fn for_server_page(mut self, page_id: i64, shortcut_id: i64) -> Self {
        self.page_id = Some(page_id);
        self.shortcut_id = Some(shortcut_id);
        self
    }
}

/// The raw byte stream of one provider connection.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Opens the upstream connection for a dispatched request.
#[async_trait]
pub trait StreamSource: Send + Sync {
    async fn open(&self, request: &ShortcutRequest) -> Result<ByteStream>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProviderStreamBody<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    stream: bool,
}

/// HTTP implementation of [`StreamSource`].
///
/// Built from a settings snapshot: the server URL for `server:*` models and
/// the provider table for everything else. Connect timeout only: the
/// overall deadline belongs to the relay, and a streaming body must be able
/// to outlive any per-request timeout.
pub struct HttpStreamSource {
    http: Client,
    server_url: Option<String>,
    providers: BTreeMap<String, ProviderSettings>,
}

impl HttpStreamSource {
    pub fn new(server_url: Option<String>, providers: BTreeMap<String, ProviderSettings>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(20))
            .user_agent(concat!("Postea/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PosteaError::Http(e.to_string()))?;
        Ok(Self { http, server_url, providers })
    }

    fn server_stream_url(&self, request: &ShortcutRequest) -> Result<String> {
        let server = self.server_url.as_deref().ok_or(PosteaError::ServerNotConfigured)?;
        let (Some(page_id), Some(shortcut_id)) = (request.page_id, request.shortcut_id) else {
            return Err(PosteaError::Processing(
                "the server model can only run shortcuts against a saved page".to_string(),
            ));
        };
        Ok(format!(
            "{}/api/page/processWithShortcut/{page_id}?shortcutId={shortcut_id}&mode=fast",
            server.trim_end_matches('/')
        ))
    }

    async fn open_server(&self, request: &ShortcutRequest) -> Result<ByteStream> {
        let url = self.server_stream_url(request)?;
        tracing::debug!(task_id = %request.task_id, %url, "opening server stream");

        let response = self
            .http
            .get(url)
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| PosteaError::Http(e.to_string()))?;
        Self::into_stream(response).await
    }

    async fn open_provider(&self, request: &ShortcutRequest) -> Result<ByteStream> {
        let provider = self
            .providers
            .get(&request.model.provider)
            .filter(|p| p.enabled)
            .ok_or_else(|| PosteaError::NoModel(format!("provider {} is not configured", request.model.provider)))?;

        let url = format!("{}/shortcuts/stream", provider.base_url.trim_end_matches('/'));
        tracing::debug!(task_id = %request.task_id, %url, model = %request.model.id, "opening provider stream");

        let body = ProviderStreamBody {
            model: request.model.model_id(),
            instructions: &request.instructions,
            input: &request.content,
            stream: true,
        };

        let mut builder = self.http.post(url).header("Accept", "text/event-stream").json(&body);
        if let Some(api_key) = &provider.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| PosteaError::Http(e.to_string()))?;
        Self::into_stream(response).await
    }

    async fn into_stream(response: reqwest::Response) -> Result<ByteStream> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(PosteaError::Auth(body));
            }
            return Err(PosteaError::Api { status: status.as_u16(), message: body });
        }

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| PosteaError::Http(e.to_string()))),
        ))
    }
}

#[async_trait]
impl StreamSource for HttpStreamSource {
    async fn open(&self, request: &ShortcutRequest) -> Result<ByteStream> {
        if request.model.provider == SERVER_PROVIDER {
            self.open_server(request).await
        } else {
            self.open_provider(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postea_core::model::server_model;

    #[test]
    fn test_server_stream_url() {
        let source = HttpStreamSource::new(Some("https://postea.example.com/".to_string()), BTreeMap::new()).unwrap();
        let request = ShortcutRequest::new("Summarize", "instr", "content", server_model()).for_server_page(42, 7);
        let url = source.server_stream_url(&request).unwrap();
        assert_eq!(
            url,
            "https://postea.example.com/api/page/processWithShortcut/42?shortcutId=7&mode=fast"
        );
    }

    #[test]
    fn test_server_model_requires_page() {
        let source = HttpStreamSource::new(Some("https://postea.example.com".to_string()), BTreeMap::new()).unwrap();
        let request = ShortcutRequest::new("Summarize", "instr", "content", server_model());
        assert!(matches!(source.server_stream_url(&request), Err(PosteaError::Processing(_))));
    }

    #[test]
    fn test_server_model_without_server_url() {
        let source = HttpStreamSource::new(None, BTreeMap::new()).unwrap();
        let request = ShortcutRequest::new("Summarize", "instr", "content", server_model()).for_server_page(1, 1);
        assert!(matches!(source.server_stream_url(&request), Err(PosteaError::ServerNotConfigured)));
    }
}
