//! HTML document wrapper: CSS-selector queries and metadata extraction.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{PosteaError, Result};

/// A parsed HTML document.
///
/// Wraps `scraper::Html` and adds the metadata fallback chains the parser
/// adapter needs (title, byline, site name, description).
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Result<Self> {
        Ok(Self { html: Html::parse_document(html), base_url: None })
    }

    /// Parses HTML with a known base URL for relative-link context.
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let base_url = Url::parse(url).map_err(|e| PosteaError::InvalidUrl(e.to_string()))?;
        Ok(Self { html: Html::parse_document(html), base_url: Some(base_url) })
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects elements using a CSS selector.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = Selector::parse(selector)
            .map_err(|e| PosteaError::HtmlParseError(format!("Invalid selector: {}", e)))?;
        Ok(self.html.select(&sel).map(|element| Element { element }).collect())
    }

    /// Content of the `<title>` element, if present and non-empty.
    pub fn title_element(&self) -> Option<String> {
        let sel = Selector::parse("title").ok()?;
        let text: String = self.html.select(&sel).next()?.text().collect();
        let text = text.trim();
        if text.is_empty() { None } else { Some(text.to_string()) }
    }

    /// All text content of the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Value of a `<meta>` element matched by `name` or `property`.
    pub fn meta_content(&self, key: &str) -> Option<String> {
        for attr in ["name", "property"] {
            let sel = Selector::parse(&format!(r#"meta[{attr}="{key}"]"#)).ok()?;
            if let Some(element) = self.html.select(&sel).next()
                && let Some(content) = element.value().attr("content")
            {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
        None
    }

    /// Document title: og:title → twitter:title → `<title>` → first `<h1>`.
    pub fn extract_title(&self) -> Option<String> {
        if let Some(title) = self.meta_content("og:title") {
            return Some(title);
        }
        if let Some(title) = self.meta_content("twitter:title") {
            return Some(title);
        }
        if let Some(title) = self.title_element() {
            return Some(title);
        }
        if let Ok(headings) = self.select("h1")
            && let Some(first) = headings.first()
        {
            let text = first.text();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
        None
    }

    /// Author attribution: meta author → article:author → `[rel="author"]`.
    pub fn extract_byline(&self) -> Option<String> {
        if let Some(author) = self.meta_content("author") {
            return Some(author);
        }
        if let Some(author) = self.meta_content("article:author") {
            return Some(author);
        }
        if let Ok(links) = self.select(r#"[rel="author"]"#)
            && let Some(first) = links.first()
        {
            let text = first.text();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
        None
    }

    /// Site name: og:site_name, falling back to the base URL's host.
    pub fn extract_site_name(&self) -> Option<String> {
        if let Some(name) = self.meta_content("og:site_name") {
            return Some(name);
        }
        self.base_url.as_ref().and_then(|url| url.host_str()).map(str::to_string)
    }

    /// Page description: og:description → twitter:description → meta
    /// description.
    pub fn extract_description(&self) -> Option<String> {
        self.meta_content("og:description")
            .or_else(|| self.meta_content("twitter:description"))
            .or_else(|| self.meta_content("description"))
    }
}

/// A single element in the document tree.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// HTML content inside this element, excluding its own tags.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// HTML content including this element's own tags.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Concatenated text of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = Selector::parse(selector)
            .map_err(|e| PosteaError::HtmlParseError(format!("Invalid selector: {}", e)))?;
        Ok(self.element.select(&sel).map(|element| Element { element }).collect())
    }

    /// Parent element, if this element has one.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element
            .parent()
            .and_then(scraper::ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Direct child elements, in document order.
    pub fn children(&self) -> Vec<Element<'a>> {
        self.element
            .children()
            .filter_map(scraper::ElementRef::wrap)
            .map(|element| Element { element })
            .collect()
    }

    /// Whether two handles refer to the same node.
    pub fn same_node(&self, other: &Element<'_>) -> bool {
        self.element.id() == other.element.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <title>Plain Title</title>
            <meta property="og:title" content="OG Title">
            <meta name="author" content="Ada Writer">
            <meta property="og:site_name" content="Example Journal">
            <meta name="description" content="A short description.">
        </head>
        <body>
            <article>
                <h1>Heading</h1>
                <p class="lede">First paragraph</p>
                <p>Second paragraph</p>
                <a href="https://example.com">Link</a>
            </article>
        </body>
        </html>
    "#;

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let paragraphs = doc.select("p").unwrap();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text(), "First paragraph");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert!(matches!(doc.select("[[nope"), Err(PosteaError::HtmlParseError(_))));
    }

    #[test]
    fn test_title_prefers_og() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.extract_title(), Some("OG Title".to_string()));
    }

    #[test]
    fn test_title_falls_back_to_title_element() {
        let html = "<html><head><title>Only Title</title></head><body></body></html>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.extract_title(), Some("Only Title".to_string()));
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let html = "<html><body><h1> From Heading </h1></body></html>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.extract_title(), Some("From Heading".to_string()));
    }

    #[test]
    fn test_metadata_extraction() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.extract_byline(), Some("Ada Writer".to_string()));
        assert_eq!(doc.extract_site_name(), Some("Example Journal".to_string()));
        assert_eq!(doc.extract_description(), Some("A short description.".to_string()));
    }

    #[test]
    fn test_site_name_from_host() {
        let html = "<html><body><p>x</p></body></html>";
        let doc = Document::parse_with_url(html, "https://blog.example.org/post/1").unwrap();
        assert_eq!(doc.extract_site_name(), Some("blog.example.org".to_string()));
    }

    #[test]
    fn test_parse_with_invalid_url() {
        let result = Document::parse_with_url("<html></html>", "not a url");
        assert!(matches!(result, Err(PosteaError::InvalidUrl(_))));
    }

    #[test]
    fn test_element_navigation() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let lede = &doc.select("p.lede").unwrap()[0];
        let parent = lede.parent().unwrap();
        assert_eq!(parent.tag_name(), "article");
        assert_eq!(parent.children().len(), 4);
        assert!(lede.same_node(&parent.children()[1]));
    }
}
