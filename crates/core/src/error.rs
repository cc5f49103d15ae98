//! Error types for Postea operations.
//!
//! This module defines the main error type [`PosteaError`] which covers
//! content extraction, settings persistence, API calls, and the streaming
//! shortcut protocol.

use thiserror::Error;

/// Main error type for Postea operations.
///
/// One enum is shared across the workspace: the core library produces the
/// extraction/settings variants, the client library produces the HTTP,
/// authentication, and streaming variants.
#[derive(Error, Debug)]
pub enum PosteaError {
    /// HTML parsing errors.
    ///
    /// Returned when HTML cannot be parsed, often due to malformed markup
    /// or invalid CSS selectors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Content is not readable (score below threshold).
    ///
    /// The extraction heuristics found no element meeting the minimum
    /// readability score. Typical on navigation pages, search results, or
    /// pages with very little text content.
    #[error("Content is not readable (score {score} below threshold {threshold})")]
    NotReadable { score: f64, threshold: f64 },

    /// No content could be extracted from the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No server URL configured.
    ///
    /// Returned by operations that need the backing server before any
    /// server URL has been saved in settings.
    #[error("No server URL configured (run `postea settings set server-url <URL>`)")]
    ServerNotConfigured,

    /// Settings file errors.
    #[error("Settings error: {0}")]
    Settings(String),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Authentication required or rejected (HTTP 401/403).
    ///
    /// Kept distinct from [`PosteaError::Api`] so callers can surface a
    /// "please sign in" state instead of a generic failure.
    #[error("Authentication required: {0}")]
    Auth(String),

    /// Non-success API response.
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level HTTP failure (connection refused, DNS, stream abort).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Provider/processing failure reported by the streaming endpoint.
    #[error("Shortcut processing failed: {0}")]
    Processing(String),

    /// No model is selectable for a shortcut dispatch.
    #[error("No AI model available: {0}")]
    NoModel(String),
}

/// Result type alias for PosteaError.
pub type Result<T> = std::result::Result<T, PosteaError>;
