//! Hacker News user and submission extraction.

use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::{collect_text, el_first_text, selector};
use crate::scraping::types::{CanonicalRecord, RecordItem, Stat};

/// Parse a Hacker News user page. The profile is a bare key/value table;
/// submissions come from a separate page via [`parse_submissions`].
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_user(html: &str, username: &str) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new(
        "hackernews",
        format!("Hacker News Profile: {username}"),
        "Recent Submissions",
    );
    record.profile_url = Some(format!("https://news.ycombinator.com/user?id={username}"));

    let row_sel = selector("table table tr")?;
    let key_sel = selector("td:first-child")?;
    let value_sel = selector("td:last-child")?;

    let mut found_rows = false;
    for row in document.select(&row_sel) {
        let Some(key) = el_first_text(row, &key_sel) else {
            continue;
        };
        let Some(value) = el_first_text(row, &value_sel) else {
            continue;
        };
        if value == key {
            continue;
        }
        found_rows = true;
        let label = key.trim_end_matches(':').to_string();
        if label.eq_ignore_ascii_case("about") {
            record.header.bio = Some(value);
        } else {
            record.header.stats.push(Stat::new(label, value));
        }
    }

    if !found_rows {
        record = record.partial("profile table not found; the user may not exist");
    }

    Ok(record)
}

/// Parse a Hacker News submissions listing.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_submissions(html: &str, max_items: usize) -> Result<Vec<RecordItem>, ScrapeError> {
    let document = Html::parse_document(html);

    let thing_sel = selector(".athing")?;
    let title_sel = selector(".titleline a")?;

    let mut items = Vec::new();
    for thing in document.select(&thing_sel).take(max_items) {
        let Some(link) = thing.select(&title_sel).next() else {
            continue;
        };

        let mut item = RecordItem {
            title: Some(collect_text(link)),
            ..RecordItem::default()
        };

        if let Some(href) = link.value().attr("href") {
            let url = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("https://news.ycombinator.com/{href}")
            };
            item.url = Some(url);
        }

        if let Some(id) = thing.value().attr("id") {
            item.context = Some(format!("https://news.ycombinator.com/item?id={id}"));
        }

        items.push(item);
    }

    Ok(items)
}
