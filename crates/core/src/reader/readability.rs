//! Score-based content extraction.
//!
//! The classic heuristic: every candidate container gets a score from its
//! tag, its class/id naming, its text density, and a link-density penalty;
//! the best-scoring candidate wins and qualifying siblings are carried along
//! with it. Pages whose best candidate stays under the minimum score are
//! reported as not readable.

use regex::Regex;

use crate::error::{PosteaError, Result};
use crate::reader::document::{Document, Element};

/// Tuning knobs for the scoring heuristic.
#[derive(Debug, Clone)]
pub struct ReadabilityConfig {
    /// Minimum score the winning candidate must reach.
    pub min_score: f64,
    /// Minimum text length for an element to be considered at all.
    pub char_threshold: usize,
    /// Weight applied for positive/negative class and id naming.
    pub class_weight: f64,
    /// Characters of text per density point.
    pub chars_per_point: usize,
    /// Cap on the character-density contribution.
    pub max_char_score: f64,
    /// Cap on the comma-count contribution.
    pub max_comma_score: f64,
    /// Sibling qualifies when its score reaches this fraction of the top
    /// score.
    pub sibling_threshold: f64,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            min_score: 20.0,
            char_threshold: 25,
            class_weight: 25.0,
            chars_per_point: 100,
            max_char_score: 3.0,
            max_comma_score: 10.0,
            sibling_threshold: 0.2,
        }
    }
}

const CANDIDATE_TAGS: &[&str] = &["article", "main", "section", "div", "td", "blockquote", "pre"];

const POSITIVE_PATTERNS: &str =
    r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)";
const NEGATIVE_PATTERNS: &str = r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|promo|share|social)";

fn base_tag_score(tag: &str) -> f64 {
    match tag {
        "article" | "main" => 10.0,
        "section" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "pre" => 0.0,
        "form" => -3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

fn class_id_weight(element: &Element<'_>, weight: f64) -> f64 {
    let positive = Regex::new(POSITIVE_PATTERNS).unwrap();
    let negative = Regex::new(NEGATIVE_PATTERNS).unwrap();

    for value in [element.attr("id"), element.attr("class")].into_iter().flatten() {
        if positive.is_match(value) {
            return weight;
        }
        if negative.is_match(value) {
            return -weight;
        }
    }
    0.0
}

/// Ratio of link text to all text, 0.0 (no links) to 1.0 (all links).
pub fn link_density(element: &Element<'_>) -> f64 {
    let text_length = element.text().chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    link_length as f64 / text_length as f64
}

/// Scores one candidate element.
pub fn score_element(element: &Element<'_>, config: &ReadabilityConfig) -> f64 {
    let text = element.text();
    let char_count = text.chars().count();
    if char_count < config.char_threshold {
        return 0.0;
    }

    let char_score = ((char_count / config.chars_per_point) as f64).min(config.max_char_score);
    let comma_score = (text.matches(',').count() as f64).min(config.max_comma_score);
    let class_weight = class_id_weight(element, config.class_weight);
    let raw = base_tag_score(&element.tag_name()) + class_weight + char_score + comma_score;

    // Content-positive naming and long prose soften the link penalty; bare
    // containers take it in full.
    let density = link_density(element);
    let penalty = if class_weight > 0.0 || char_count > 500 { 1.0 - density * 0.5 } else { 1.0 - density };

    raw * penalty
}

/// The winning fragment with its diagnostics.
#[derive(Debug)]
pub struct Extraction {
    /// Concatenated HTML of the top candidate and qualifying siblings.
    pub content: String,
    /// Score of the top candidate.
    pub top_score: f64,
    /// How many candidates were scored.
    pub candidate_count: usize,
}

/// Runs the scoring extraction over a document.
pub fn extract(doc: &Document, config: &ReadabilityConfig) -> Result<Extraction> {
    let selector = CANDIDATE_TAGS.join(", ");
    let candidates = doc.select(&selector)?;
    if candidates.is_empty() {
        return Err(PosteaError::NoContent);
    }

    let mut scored: Vec<(Element<'_>, f64)> =
        candidates.into_iter().map(|el| { let s = score_element(&el, config); (el, s) }).collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let candidate_count = scored.len();
    let (top, top_score) = scored.swap_remove(0);
    if top_score < config.min_score {
        return Err(PosteaError::NotReadable { score: top_score, threshold: config.min_score });
    }

    Ok(Extraction { content: join_with_siblings(&top, top_score, config), top_score, candidate_count })
}

/// Concatenates the top candidate with parent-level siblings whose score
/// reaches the sibling threshold. Keeps document order.
fn join_with_siblings(top: &Element<'_>, top_score: f64, config: &ReadabilityConfig) -> String {
    let Some(parent) = top.parent() else {
        return top.outer_html();
    };

    let cutoff = top_score * config.sibling_threshold;
    let mut parts = Vec::new();
    for sibling in parent.children() {
        if sibling.same_node(top) {
            parts.push(top.outer_html());
            continue;
        }
        let tag = sibling.tag_name();
        let qualifies = match tag.as_str() {
            "p" | "blockquote" | "pre" => {
                // Always keep substantial prose siblings.
                sibling.text().chars().count() >= config.char_threshold && link_density(&sibling) < 0.25
            }
            "div" | "section" | "article" => score_element(&sibling, config) >= cutoff,
            _ => false,
        };
        if qualifies {
            parts.push(sibling.outer_html());
        }
    }

    if parts.is_empty() { top.outer_html() } else { parts.join("\n") }
}

/// Quick check whether a page likely contains readable content, without a
/// full extraction.
pub fn is_probably_readable(html: &str, threshold: f64) -> bool {
    let Ok(doc) = Document::parse(html) else {
        return false;
    };
    let config = ReadabilityConfig::default();
    let Ok(candidates) = doc.select(&CANDIDATE_TAGS.join(", ")) else {
        return false;
    };

    candidates.iter().any(|el| score_element(el, &config) >= threshold)
}
