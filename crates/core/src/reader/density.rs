//! Text-density content extraction.
//!
//! The interchangeable alternative to the score-based heuristic: instead of
//! tag and naming priors, it selects the container whose subtree packs the
//! most text per byte of markup, weighted by how much prose it actually
//! holds. Works better on pages with unhelpful markup (no semantic tags, no
//! meaningful class names); worse on pages where boilerplate is textually
//! dense.

use crate::error::{PosteaError, Result};
use crate::reader::document::{Document, Element};
use crate::reader::readability::link_density;

/// Tuning knobs for the density heuristic.
#[derive(Debug, Clone)]
pub struct DensityConfig {
    /// Minimum text length for a container to be considered.
    pub min_text_length: usize,
    /// Cap on the text-length factor, so one enormous page section does not
    /// dwarf everything else.
    pub text_length_cap: usize,
    /// Containers above this link density are skipped outright.
    pub max_link_density: f64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self { min_text_length: 140, text_length_cap: 4000, max_link_density: 0.5 }
    }
}

const CONTAINER_TAGS: &[&str] = &["article", "main", "section", "div", "td"];

/// Density score of one container: text-to-markup ratio times capped text
/// volume, discounted by link density and rewarded per paragraph.
pub fn density_score(element: &Element<'_>, config: &DensityConfig) -> f64 {
    let text_len = element.text().chars().count();
    if text_len < config.min_text_length {
        return 0.0;
    }

    let markup_len = element.inner_html().chars().count().max(1);
    let density = text_len as f64 / markup_len as f64;

    let paragraphs = element.select("p").map(|p| p.len()).unwrap_or(0);
    let paragraph_factor = 1.0 + (paragraphs as f64).sqrt();

    let volume = text_len.min(config.text_length_cap) as f64;

    density * volume * paragraph_factor * (1.0 - link_density(element))
}

/// The winning fragment with its diagnostics.
#[derive(Debug)]
pub struct DensityExtraction {
    pub content: String,
    pub score: f64,
}

/// Runs the density extraction over a document.
pub fn extract(doc: &Document, config: &DensityConfig) -> Result<DensityExtraction> {
    let candidates = doc.select(&CONTAINER_TAGS.join(", "))?;

    let mut best: Option<(Element<'_>, f64)> = None;
    for candidate in candidates {
        if link_density(&candidate) > config.max_link_density {
            continue;
        }
        let score = density_score(&candidate, config);
        if score <= 0.0 {
            continue;
        }
        match &best {
            Some((_, best_score)) if score < best_score * 0.98 => {}
            // Later candidates replace on near-ties as well: document order
            // visits parents first, and a parent wrapping the article plus
            // chrome scores close to the article itself.
            _ => best = Some((candidate, score)),
        }
    }

    match best {
        Some((element, score)) => Ok(DensityExtraction { content: element.outer_html(), score }),
        None => Err(PosteaError::NoContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_HTML: &str = r#"
        <html>
        <body>
            <div id="wrap">
                <div id="nav"><a href="/a">Home</a> <a href="/b">About</a> <a href="/c">More</a></div>
                <div id="text">
                    <p>The first long paragraph of unstyled prose, without any helpful class names or
                    semantic elements, which the density heuristic should still find on its own merits.</p>
                    <p>A second long paragraph that keeps the text volume and paragraph count up, so the
                    chosen container is clearly the prose one rather than the navigation block above.</p>
                    <p>And a third paragraph for good measure, because more prose means more density.</p>
                </div>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_finds_prose_without_semantics() {
        let doc = Document::parse(PLAIN_HTML).unwrap();
        let extraction = extract(&doc, &DensityConfig::default()).unwrap();
        assert!(extraction.content.contains("first long paragraph"));
        assert!(!extraction.content.contains("About"));
        assert!(extraction.score > 0.0);
    }

    #[test]
    fn test_short_pages_yield_no_content() {
        let doc = Document::parse("<html><body><div>too short</div></body></html>").unwrap();
        assert!(matches!(extract(&doc, &DensityConfig::default()), Err(PosteaError::NoContent)));
    }

    #[test]
    fn test_link_heavy_containers_skipped() {
        let html = r#"
            <html><body>
            <div><a href="/1">A very long link list entry number one for the menu</a>
            <a href="/2">A very long link list entry number two for the menu</a>
            <a href="/3">A very long link list entry number three for the menu</a></div>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert!(matches!(extract(&doc, &DensityConfig::default()), Err(PosteaError::NoContent)));
    }

    #[test]
    fn test_density_score_zero_below_min_length() {
        let doc = Document::parse("<div>short</div>").unwrap();
        let div = &doc.select("div").unwrap()[0];
        assert_eq!(density_score(div, &DensityConfig::default()), 0.0);
    }
}
