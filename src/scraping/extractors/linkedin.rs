//! LinkedIn public-profile extraction.
//!
//! LinkedIn aggressively blocks anonymous scraping, so this is meta-tag
//! salvage: OpenGraph name/headline plus whatever top-card text survives
//! without JavaScript.

use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::{collect_text, meta_content, selector};
use crate::scraping::types::{CanonicalRecord, RecordItem, truncate_chars};

/// Character budget for the salvaged profile text.
const PROFILE_TEXT_CHARS: usize = 500;

/// Parse a LinkedIn public profile page.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_profile(html: &str, profile_url: &str) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new("linkedin", "LinkedIn Profile", "Profile Content");
    record.profile_url = Some(profile_url.to_string());

    record.header.display_name = meta_content(&document, "og:title");
    record.header.bio = meta_content(&document, "og:description");

    let main_sel = selector(".core-section-container, .pv-top-card")?;
    if let Some(main) = document.select(&main_sel).next() {
        let text = truncate_chars(&collect_text(main), PROFILE_TEXT_CHARS);
        if !text.is_empty() {
            record.items.push(RecordItem {
                text: Some(text),
                ..RecordItem::default()
            });
        }
    }

    if record.header.is_empty() && record.items.is_empty() {
        record = record.partial("LinkedIn exposed no public metadata; a login wall is likely");
    }

    Ok(record)
}
