//! Raw page fetching for local capture.
//!
//! Used by the CLI's `run` command when the input is a live URL rather than
//! a saved page: the HTML is fetched here, then parsed and normalized before
//! dispatch.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use postea_core::{PosteaError, Result};

/// Fetch configuration for raw page capture.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header; some sites serve stripped pages to unknown agents.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: concat!("Mozilla/5.0 (compatible; Postea/", env!("CARGO_PKG_VERSION"), ")").to_string(),
        }
    }
}

/// Fetches a page's HTML over HTTP(S).
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| PosteaError::InvalidUrl(e.to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(PosteaError::InvalidUrl(
            "URL must include a scheme (http:// or https://)".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(|e| PosteaError::Http(e.to_string()))?;

    let response = client
        .get(parsed)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                PosteaError::Timeout { timeout: config.timeout }
            } else {
                PosteaError::Http(e.to_string())
            }
        })?;

    response.text().await.map_err(|e| PosteaError::Http(e.to_string()))
}
