//! External search surface.
//!
//! The engine treats web search as an opaque provider behind the
//! [`SearchProvider`] trait. This module owns what is engine knowledge
//! rather than provider knowledge: the per-platform site filters, the
//! profile query builder, and the markdown rendering of hit lists with
//! platform tags from the link classifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

use crate::scraping::links::classify;
use crate::scraping::render::md_link;

/// One search result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Snippet text from the provider.
    pub snippet: String,
    /// Publication date label, for news results.
    pub published: Option<String>,
}

/// A provider response: hits plus an optional one-line answer summary.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Provider-generated answer summary, when requested and available.
    pub answer: Option<String>,
    /// Ranked hits.
    pub hits: Vec<SearchHit>,
}

/// Search provider failures.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider rejected the request or was unreachable.
    #[error("search provider error: {0}")]
    Provider(String),
}

/// Opaque external search.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// General web search.
    ///
    /// # Errors
    /// Returns an error when the provider call fails.
    async fn web_search(
        &self,
        query: &str,
        max_results: usize,
        include_answer: bool,
    ) -> Result<SearchResponse, SearchError>;

    /// Recent-news search bounded to a trailing day window.
    ///
    /// # Errors
    /// Returns an error when the provider call fails.
    async fn news_search(
        &self,
        query: &str,
        max_results: usize,
        days: usize,
    ) -> Result<SearchResponse, SearchError>;
}

/// Per-platform site filters for profile discovery queries.
const SITE_FILTERS: &[(&str, &str)] = &[
    ("linkedin", "site:linkedin.com/in"),
    ("twitter", "site:twitter.com OR site:x.com"),
    ("github", "site:github.com"),
    ("facebook", "site:facebook.com"),
    ("instagram", "site:instagram.com"),
    ("youtube", "site:youtube.com"),
    ("tiktok", "site:tiktok.com/@"),
    ("medium", "site:medium.com/@"),
    ("substack", "site:substack.com"),
    ("reddit", "site:reddit.com/user"),
];

/// Site filter for a platform tag, if the platform is supported.
#[must_use]
pub fn site_filter(platform: &str) -> Option<&'static str> {
    let wanted = platform.trim().to_lowercase();
    SITE_FILTERS
        .iter()
        .find(|(tag, _)| *tag == wanted)
        .map(|(_, filter)| *filter)
}

/// Comma-joined list of supported platform tags, for error messages.
#[must_use]
pub fn supported_platforms() -> String {
    SITE_FILTERS
        .iter()
        .map(|(tag, _)| *tag)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a profile discovery query: quoted name, site filter, free-text
/// disambiguation context.
#[must_use]
pub fn profile_query(name: &str, filter: &str, context: &str) -> String {
    let mut query = format!("\"{}\" {filter}", name.trim());
    let context = context.trim();
    if !context.is_empty() {
        query.push(' ');
        query.push_str(context);
    }
    query
}

/// Render a hit list as numbered markdown, each hit tagged with the
/// platform its URL classifies to ("web" when none matched).
#[must_use]
pub fn render_results(heading: &str, response: &SearchResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "**{heading}**\n");

    if let Some(answer) = &response.answer {
        let _ = writeln!(out, "**Summary:** {answer}\n");
    }

    if response.hits.is_empty() {
        let _ = writeln!(out, "No results found.");
        return out;
    }

    for (i, hit) in response.hits.iter().enumerate() {
        let (platform, _) = classify(&hit.url);
        let tag = platform.unwrap_or("web");
        let _ = writeln!(
            out,
            "**{}.** [{tag}] {}",
            i + 1,
            md_link(&hit.title, &hit.url)
        );
        if !hit.snippet.is_empty() {
            let _ = writeln!(out, "   {}", hit.snippet);
        }
        if let Some(published) = &hit.published {
            let _ = writeln!(out, "   {published}");
        }
        out.push('\n');
    }

    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_filter_lookup() {
        assert_eq!(site_filter("linkedin"), Some("site:linkedin.com/in"));
        assert_eq!(site_filter("  GitHub "), Some("site:github.com"));
        assert_eq!(site_filter("myspace"), None);
    }

    #[test]
    fn test_supported_platforms_listing() {
        let listing = supported_platforms();
        assert!(listing.contains("linkedin"));
        assert!(listing.contains("reddit"));
    }

    #[test]
    fn test_profile_query_with_context() {
        let query = profile_query("Alice Doe", "site:github.com", "radio firmware");
        assert_eq!(query, "\"Alice Doe\" site:github.com radio firmware");
    }

    #[test]
    fn test_profile_query_without_context() {
        let query = profile_query("Alice Doe", "site:github.com", "  ");
        assert_eq!(query, "\"Alice Doe\" site:github.com");
    }

    #[test]
    fn test_render_results_tags_platforms() {
        let response = SearchResponse {
            answer: Some("Alice Doe is a firmware engineer.".to_string()),
            hits: vec![
                SearchHit {
                    title: "alicedoe".to_string(),
                    url: "https://github.com/alicedoe".to_string(),
                    snippet: "Repositories".to_string(),
                    published: None,
                },
                SearchHit {
                    title: "Interview".to_string(),
                    url: "https://example.com/interview".to_string(),
                    snippet: String::new(),
                    published: Some("2024-03-01".to_string()),
                },
            ],
        };

        let out = render_results("Web Search: 'Alice Doe'", &response);
        assert!(out.contains("**Summary:** Alice Doe is a firmware engineer."));
        assert!(out.contains("**1.** [github] [alicedoe](https://github.com/alicedoe)"));
        assert!(out.contains("**2.** [web] [Interview](https://example.com/interview)"));
        assert!(out.contains("   2024-03-01"));
    }

    #[test]
    fn test_render_empty_results() {
        let out = render_results("Web Search: 'nobody'", &SearchResponse::default());
        assert!(out.contains("No results found."));
    }
}
