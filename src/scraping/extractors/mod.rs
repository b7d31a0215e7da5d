//! Per-platform extractors.
//!
//! Each extractor is a pure function from fetched markup (plus a bounded
//! item limit) to a [`CanonicalRecord`](crate::scraping::types::CanonicalRecord).
//! Extraction is best-effort and partial-tolerant: missing fields are
//! omitted, and only a missing structural anchor downgrades the record to
//! `Partial`. No extractor touches the network or the evidence store.

pub mod github;
pub mod hackernews;
pub mod linkedin;
pub mod medium;
pub mod reddit;
pub mod twitter;
pub mod youtube;

use scraper::{ElementRef, Html, Selector};

use crate::scraping::error::ScrapeError;

/// Parse a CSS selector, mapping failures into a `ScrapeError`.
pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::HtmlParse(format!("invalid selector: {e:?}")))
}

/// Collected, trimmed text of an element.
pub(crate) fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First matching element's text at document level, skipping empties.
pub(crate) fn doc_first_text(document: &Html, sel: &Selector) -> Option<String> {
    document
        .select(sel)
        .map(collect_text)
        .find(|t| !t.is_empty())
}

/// First matching element's text below a parent element.
pub(crate) fn el_first_text(parent: ElementRef<'_>, sel: &Selector) -> Option<String> {
    parent.select(sel).map(collect_text).find(|t| !t.is_empty())
}

/// First matching element's attribute below a parent element.
pub(crate) fn el_first_attr(parent: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    parent
        .select(sel)
        .find_map(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Meta tag content by `name` or `property` (OpenGraph) attribute.
pub(crate) fn meta_content(document: &Html, name: &str) -> Option<String> {
    for attr in ["name", "property"] {
        let css = format!("meta[{attr}='{name}']");
        if let Ok(sel) = Selector::parse(&css) {
            if let Some(content) = document
                .select(&sel)
                .find_map(|e| e.value().attr("content"))
                .map(str::trim)
                .filter(|c| !c.is_empty())
            {
                return Some(content.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_content_name_and_property() {
        let html = r#"<html><head>
            <meta name="description" content="a page">
            <meta property="og:title" content="A Title">
        </head><body></body></html>"#;
        let doc = Html::parse_document(html);

        assert_eq!(meta_content(&doc, "description"), Some("a page".to_string()));
        assert_eq!(meta_content(&doc, "og:title"), Some("A Title".to_string()));
        assert_eq!(meta_content(&doc, "og:image"), None);
    }

    #[test]
    fn test_doc_first_text_skips_empty() {
        let html = "<div><p class='x'>  </p><p class='x'>hello</p></div>";
        let doc = Html::parse_document(html);
        let sel = selector("p.x").unwrap();
        assert_eq!(doc_first_text(&doc, &sel), Some("hello".to_string()));
    }
}
