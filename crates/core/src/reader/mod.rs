//! Content parser adapter.
//!
//! Wraps two interchangeable article-extraction algorithms behind one
//! interface: the score-based [`readability`] heuristic and the
//! [`density`]-based alternative. Both run the same pre-clean, metadata, and
//! post-clean pipeline; callers pick via [`ParserKind`]. The adapter is a
//! pure function of its input, with no state and no I/O.

pub mod clean;
pub mod density;
pub mod document;
pub mod readability;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PosteaError, Result};
pub use clean::CleanConfig;
pub use density::DensityConfig;
pub use document::{Document, Element};
pub use readability::ReadabilityConfig;

/// Which extraction algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    #[default]
    Readability,
    Density,
}

impl ParserKind {
    /// Parses a stored or user-supplied name; unknown values fall back to
    /// Readability, matching how stale settings values are handled.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "density" => ParserKind::Density,
            _ => ParserKind::Readability,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKind::Readability => "readability",
            ParserKind::Density => "density",
        }
    }
}

/// Options shared by both algorithms.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub readability: ReadabilityConfig,
    pub density: DensityConfig,
    pub clean: CleanConfig,
}

/// The result of parsing a captured page.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedArticle {
    pub title: Option<String>,
    /// Extracted readable content as cleaned HTML.
    pub content: String,
    /// Short plain-text excerpt, from metadata or the content itself.
    pub excerpt: String,
    pub byline: Option<String>,
    pub site_name: Option<String>,
    /// Plain text of the content.
    pub text: String,
    pub word_count: usize,
    /// Estimated reading time in minutes at 200 words per minute.
    pub reading_time: f64,
    pub source_url: Option<String>,
}

/// Parses a document with the selected algorithm and default options.
pub fn parse_document(html: &str, kind: ParserKind, url: Option<&str>) -> Result<ParsedArticle> {
    parse_document_with_options(html, kind, url, &ParseOptions::default())
}

/// Parses a document with explicit options.
pub fn parse_document_with_options(
    html: &str, kind: ParserKind, url: Option<&str>, options: &ParseOptions,
) -> Result<ParsedArticle> {
    let cleaned = clean::preclean_html(html);
    let doc = match url {
        Some(url) => Document::parse_with_url(&cleaned, url)?,
        None => Document::parse(&cleaned)?,
    };

    let raw_content = match kind {
        ParserKind::Readability => readability::extract(&doc, &options.readability)?.content,
        ParserKind::Density => density::extract(&doc, &options.density)?.content,
    };
    let content = clean::postclean_html(&raw_content, &options.clean);
    if content.is_empty() {
        return Err(PosteaError::NoContent);
    }

    let text = html_to_text(&content);
    let word_count = count_words(&text);
    let excerpt = match doc.extract_description() {
        Some(description) => description,
        None => excerpt_from_text(&text, 200),
    };

    Ok(ParsedArticle {
        title: doc.extract_title(),
        content,
        excerpt,
        byline: doc.extract_byline(),
        site_name: doc.extract_site_name(),
        text,
        word_count,
        reading_time: word_count as f64 / 200.0,
        source_url: url.map(str::to_string),
    })
}

/// Converts content HTML to the markup-light Markdown form dispatched to AI
/// shortcuts. Pure and stateless.
pub fn normalize_for_dispatch(html: &str) -> Result<String> {
    htmd::convert(html).map_err(|e| PosteaError::HtmlParseError(e.to_string()))
}

/// Strips tags from an HTML fragment.
pub fn html_to_text(html: &str) -> String {
    match Document::parse(html) {
        Ok(doc) => doc.text_content(),
        Err(_) => String::new(),
    }
}

/// Counts words, treating hyphenated and apostrophized forms as one word.
pub fn count_words(text: &str) -> usize {
    let word = Regex::new(r"\b[\w'-]+\b").unwrap();
    word.find_iter(text).count()
}

fn excerpt_from_text(text: &str, max_chars: usize) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}
