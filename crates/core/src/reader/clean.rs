//! HTML cleanup passes around extraction.
//!
//! The pre-clean runs on the raw document before candidate scoring and drops
//! markup that never contributes content (scripts, styles, embedded frames,
//! comments, hidden elements). The post-clean runs on the extracted fragment
//! and normalizes it for display: empty nodes removed, class attributes
//! stripped, images optionally dropped.

use regex::Regex;

/// Configuration for the post-extraction cleanup.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Remove `<img>`/`<picture>`/`<figure>` from the output.
    pub strip_images: bool,
    /// Preserve `class` attributes in the output HTML.
    pub keep_classes: bool,
    /// Passes of empty-node removal; each pass can expose new empties.
    pub max_passes: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { strip_images: false, keep_classes: false, max_passes: 3 }
    }
}

const NONCONTENT_BLOCKS: &[&str] = &["script", "style", "noscript", "template", "iframe", "svg", "object", "embed"];

/// Strips markup that cannot contribute readable content.
pub fn preclean_html(html: &str) -> String {
    let mut cleaned = html.to_string();

    for tag in NONCONTENT_BLOCKS {
        let pattern = format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>");
        cleaned = Regex::new(&pattern).unwrap().replace_all(&cleaned, "").into_owned();
    }

    // Comments, including conditional ones.
    cleaned = Regex::new(r"(?s)<!--.*?-->").unwrap().replace_all(&cleaned, "").into_owned();

    // Inline-hidden elements. Only the common literal forms; computed styles
    // are out of reach without a layout engine.
    for tag in ["div", "span", "section", "aside", "p", "ul", "li", "figure"] {
        let pattern = format!(
            r#"(?is)<{tag}\b[^>]*style\s*=\s*"[^"]*(?:display\s*:\s*none|visibility\s*:\s*hidden)[^"]*"[^>]*>.*?</{tag}\s*>"#
        );
        cleaned = Regex::new(&pattern).unwrap().replace_all(&cleaned, "").into_owned();
    }

    cleaned
}

/// Normalizes an extracted fragment for display.
pub fn postclean_html(html: &str, config: &CleanConfig) -> String {
    let mut cleaned = html.to_string();

    if config.strip_images {
        for pattern in [
            r"(?is)<figure\b[^>]*>.*?</figure\s*>",
            r"(?is)<picture\b[^>]*>.*?</picture\s*>",
            r"(?i)<img\b[^>]*/?>",
        ] {
            cleaned = Regex::new(pattern).unwrap().replace_all(&cleaned, "").into_owned();
        }
    }

    if !config.keep_classes {
        cleaned = Regex::new(r#"\s+class\s*=\s*"[^"]*""#).unwrap().replace_all(&cleaned, "").into_owned();
    }

    let empty_node = Regex::new(r"(?i)<(p|div|span|section|li)\b[^>]*>\s*</(p|div|span|section|li)\s*>").unwrap();
    for _ in 0..config.max_passes {
        let next = empty_node.replace_all(&cleaned, "").into_owned();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    // Collapse runs of blank lines left behind by the removals.
    let cleaned = Regex::new(r"\n{3,}").unwrap().replace_all(&cleaned, "\n\n").into_owned();
    cleaned.trim().to_string()
}
