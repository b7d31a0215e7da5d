//! Generic page reader.
//!
//! Fetches an arbitrary web page, strips chrome (scripts, navigation,
//! footers) and returns a bounded text excerpt plus classified outbound
//! links. Used for pages no platform extractor covers.

use scraper::{Html, Selector};
use url::Url;

use crate::scraping::config::ScrapeConfig;
use crate::scraping::error::ScrapeError;
use crate::scraping::fetch::HttpFetch;
use crate::scraping::links::{classify_link, LinkCategory, LinkRecord};
use crate::scraping::types::truncate_chars;

/// Maximum social links reported per page.
const SOCIAL_LINK_CAP: usize = 15;
/// Maximum profile links reported per page.
const PROFILE_LINK_CAP: usize = 10;
/// Maximum content links reported per page.
const CONTENT_LINK_CAP: usize = 10;
/// Character budget for anchor labels.
const LINK_LABEL_CHARS: usize = 60;

/// Elements whose descendant text never counts as page content.
const SKIPPED_ANCESTORS: &[&str] = &[
    "script", "style", "nav", "footer", "aside", "noscript", "head",
];

/// Extracted view of an arbitrary web page.
#[derive(Clone, Debug)]
pub struct PageExtract {
    /// The requested URL.
    pub url: String,
    /// Page `<title>`, when present.
    pub title: Option<String>,
    /// Meta description, when present.
    pub description: Option<String>,
    /// Bounded visible-text excerpt.
    pub excerpt: String,
    /// Social platform links found on the page.
    pub social: Vec<LinkRecord>,
    /// Profile/about/team links found on the page.
    pub profile: Vec<LinkRecord>,
    /// Blog/article/press links found on the page.
    pub content: Vec<LinkRecord>,
}

/// Fetch a page and extract its visible text and links.
///
/// # Errors
/// Returns `InvalidInput` for a malformed or non-http URL before any
/// network I/O, `HttpStatus` for a non-success response, and the
/// underlying fetch error for transport failures.
pub async fn read_page(
    fetch: &dyn HttpFetch,
    config: &ScrapeConfig,
    url: &str,
    extract_links: bool,
) -> Result<PageExtract, ScrapeError> {
    let parsed = Url::parse(url)
        .map_err(|e| ScrapeError::InvalidInput(format!("invalid URL '{url}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidInput(format!(
            "unsupported URL scheme '{}'",
            parsed.scheme()
        )));
    }

    let page = fetch.get(url).await?;
    if !(200..300).contains(&page.status) {
        return Err(ScrapeError::HttpStatus {
            status: page.status,
            url: url.to_string(),
        });
    }

    let document = Html::parse_document(&page.body);

    let title = first_text(&document, "title");
    let description = meta_description(&document);
    let excerpt = visible_excerpt(&document, config);

    let mut extract = PageExtract {
        url: url.to_string(),
        title,
        description,
        excerpt,
        social: Vec::new(),
        profile: Vec::new(),
        content: Vec::new(),
    };

    if extract_links {
        bucket_links(&document, config, &mut extract);
    }

    Ok(extract)
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    document
        .select(&sel)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

fn meta_description(document: &Html) -> Option<String> {
    let sel = Selector::parse("meta[name='description']").ok()?;
    document
        .select(&sel)
        .find_map(|e| e.value().attr("content"))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

/// Visible text of the page, bounded by the config's line and character
/// budgets. Text under chrome elements is skipped.
fn visible_excerpt(document: &Html, config: &ScrapeConfig) -> String {
    let mut lines = Vec::new();

    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let under_chrome = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| SKIPPED_ANCESTORS.contains(&el.name()))
        });
        if under_chrome {
            continue;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        lines.push(trimmed.to_string());
        if lines.len() >= config.page_excerpt_lines {
            break;
        }
    }

    truncate_chars(&lines.join("\n"), config.page_excerpt_chars)
}

/// Classify the first `max_page_links` absolute http(s) anchors into the
/// extract's social/profile/content buckets, each bucket capped.
fn bucket_links(document: &Html, config: &ScrapeConfig, extract: &mut PageExtract) {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return;
    };

    let mut seen = 0usize;
    for anchor in document.select(&anchor_sel) {
        if seen >= config.max_page_links {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.starts_with("http") {
            continue;
        }
        seen += 1;

        let label = anchor.text().collect::<String>();
        let record = classify_link(href, &truncate_chars(label.trim(), LINK_LABEL_CHARS));

        match record.category {
            LinkCategory::Social if extract.social.len() < SOCIAL_LINK_CAP => {
                extract.social.push(record);
            }
            LinkCategory::Profile if extract.profile.len() < PROFILE_LINK_CAP => {
                extract.profile.push(record);
            }
            LinkCategory::Content if extract.content.len() < CONTENT_LINK_CAP => {
                extract.content.push(record);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::fetch::testing::ScriptedFetch;

    const PAGE_HTML: &str = r#"<html>
      <head>
        <title>Alice Doe, maker of things</title>
        <meta name="description" content="Personal site of Alice Doe">
        <script>var tracking = true;</script>
      </head>
      <body>
        <nav>Home About Contact</nav>
        <main>
          <h1>Hi, I am Alice</h1>
          <p>I build radios and write about parsers.</p>
          <a href="https://github.com/alicedoe">my code</a>
          <a href="https://example.com/about">about me</a>
          <a href="https://example.com/blog/2024">latest post</a>
          <a href="/relative/link">internal</a>
        </main>
        <footer>Copyright Alice</footer>
      </body>
    </html>"#;

    #[tokio::test]
    async fn test_read_page_extracts_text_and_links() {
        let fetch = ScriptedFetch::new(vec![ScriptedFetch::page(200, PAGE_HTML)]);
        let config = ScrapeConfig::default();

        let extract = read_page(&fetch, &config, "https://example.com", true)
            .await
            .unwrap();

        assert_eq!(extract.title.as_deref(), Some("Alice Doe, maker of things"));
        assert_eq!(
            extract.description.as_deref(),
            Some("Personal site of Alice Doe")
        );
        assert!(extract.excerpt.contains("I build radios"));
        assert!(!extract.excerpt.contains("tracking"));
        assert!(!extract.excerpt.contains("Copyright"));

        assert_eq!(extract.social.len(), 1);
        assert_eq!(extract.social[0].platform, Some("github"));
        assert_eq!(extract.profile.len(), 1);
        assert_eq!(extract.content.len(), 1);
    }

    #[tokio::test]
    async fn test_read_page_skips_links_when_disabled() {
        let fetch = ScriptedFetch::new(vec![ScriptedFetch::page(200, PAGE_HTML)]);
        let config = ScrapeConfig::default();

        let extract = read_page(&fetch, &config, "https://example.com", false)
            .await
            .unwrap();
        assert!(extract.social.is_empty());
        assert!(extract.profile.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_io() {
        let fetch = ScriptedFetch::new(vec![]);
        let config = ScrapeConfig::default();

        let err = read_page(&fetch, &config, "not a url", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidInput(_)));
        assert!(fetch.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_http_scheme_rejected() {
        let fetch = ScriptedFetch::new(vec![]);
        let config = ScrapeConfig::default();

        let err = read_page(&fetch, &config, "ftp://example.com/file", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_error_status_surfaces() {
        let fetch = ScriptedFetch::new(vec![ScriptedFetch::page(403, "denied")]);
        let config = ScrapeConfig::default();

        let err = read_page(&fetch, &config, "https://example.com", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::HttpStatus { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_excerpt_line_budget() {
        let mut body = String::from("<html><body>");
        for i in 0..200 {
            body.push_str(&format!("<p>line {i}</p>"));
        }
        body.push_str("</body></html>");

        let fetch = ScriptedFetch::new(vec![ScriptedFetch::page(200, &body)]);
        let config = ScrapeConfig::default();

        let extract = read_page(&fetch, &config, "https://example.com", false)
            .await
            .unwrap();
        assert_eq!(extract.excerpt.lines().count(), config.page_excerpt_lines);
    }
}
