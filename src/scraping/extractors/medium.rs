//! Medium author-profile extraction.

use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::{el_first_text, meta_content, selector};
use crate::scraping::types::{CanonicalRecord, RecordItem, truncate_chars};

/// Character budget for the author bio.
const BIO_CHARS: usize = 200;

/// Parse a Medium author page.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_profile(
    html: &str,
    username: &str,
    max_articles: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new(
        "medium",
        format!("Medium Profile: @{username}"),
        "Recent Articles",
    );
    record.profile_url = Some(format!("https://medium.com/@{username}"));

    record.header.display_name = meta_content(&document, "og:title")
        .map(|t| t.replace(" \u{2013} Medium", "").trim().to_string());
    record.header.bio =
        meta_content(&document, "og:description").map(|d| truncate_chars(&d, BIO_CHARS));

    let article_sel = selector("article")?;
    let title_sel = selector("h2, h3")?;
    let link_sel = selector("a[href*='/@'], a[href*='/p/']")?;

    for article in document.select(&article_sel).take(max_articles) {
        let title = el_first_text(article, &title_sel)
            .unwrap_or_else(|| "Untitled".to_string());

        let mut item = RecordItem {
            title: Some(title),
            ..RecordItem::default()
        };

        if let Some(href) = article
            .select(&link_sel)
            .find_map(|a| a.value().attr("href"))
        {
            let url = if href.starts_with('/') {
                format!("https://medium.com{href}")
            } else {
                href.to_string()
            };
            item.url = Some(url);
        }

        record.items.push(item);
    }

    if record.items.is_empty() {
        record = record.partial("could not extract articles; Medium uses heavy JavaScript");
    }

    Ok(record)
}
