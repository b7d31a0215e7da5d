//! YouTube channel extraction.
//!
//! Channel pages render through JavaScript, so structured data comes from
//! meta tags and the `videoId` tokens present in the raw page source.

use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::meta_content;
use crate::scraping::types::{CanonicalRecord, RecordItem, Stat, truncate_chars};

/// Character budget for the channel description.
const DESCRIPTION_CHARS: usize = 300;

fn video_id_re() -> Result<&'static Regex, ScrapeError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_re(&RE, r#""videoId":"([a-zA-Z0-9_-]{11})""#)
}

fn subscribers_re() -> Result<&'static Regex, ScrapeError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached_re(&RE, r"(?i)\d[\d.,]*\s*[KMB]?\s*subscribers")
}

fn cached_re(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex, ScrapeError> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern).map_err(|e| ScrapeError::HtmlParse(e.to_string()))?;
    Ok(cell.get_or_init(|| re))
}

/// Parse a YouTube channel page.
///
/// # Errors
/// Returns `HtmlParse` when a regex fails to compile.
pub fn parse_channel(
    html: &str,
    channel_url: &str,
    max_videos: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new("youtube", "YouTube Channel", "Recent Videos");
    record.profile_url = Some(channel_url.to_string());

    record.header.display_name = meta_content(&document, "og:title");
    record.header.bio =
        meta_content(&document, "og:description").map(|d| truncate_chars(&d, DESCRIPTION_CHARS));

    if let Some(m) = subscribers_re()?.find(html) {
        record
            .header
            .stats
            .push(Stat::new("Subscribers", m.as_str().trim()));
    }

    // Video ids are regex-mined from the raw source; dedup keeps first
    // occurrence order.
    let mut seen = Vec::new();
    for cap in video_id_re()?.captures_iter(html) {
        if seen.len() >= max_videos {
            break;
        }
        if let Some(id) = cap.get(1) {
            let id = id.as_str().to_string();
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
    }

    for id in &seen {
        record.items.push(RecordItem {
            url: Some(format!("https://youtube.com/watch?v={id}")),
            text: Some(format!("https://youtube.com/watch?v={id}")),
            ..RecordItem::default()
        });
    }

    if record.items.is_empty() {
        record = record
            .partial("could not extract video list; YouTube requires JavaScript for full rendering");
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::types::ExtractionStatus;

    #[test]
    fn test_parse_channel_meta_and_videos() {
        let html = r#"<html><head>
            <meta property="og:title" content="Alice's Lab">
            <meta property="og:description" content="Hardware videos">
        </head><body>
            <span>1.2M subscribers</span>
            <script>var a = {"videoId":"abcdefghijk"};
                    var b = {"videoId":"abcdefghijk"};
                    var c = {"videoId":"lmnopqrstuv"};</script>
        </body></html>"#;

        let record = parse_channel(html, "https://youtube.com/@alice/videos", 10).unwrap();

        assert_eq!(record.header.display_name.as_deref(), Some("Alice's Lab"));
        assert_eq!(record.header.stats[0].label, "Subscribers");
        assert!(record.header.stats[0].value.contains("1.2M"));
        // duplicate id collapsed
        assert_eq!(record.items.len(), 2);
        assert_eq!(
            record.items[0].url.as_deref(),
            Some("https://youtube.com/watch?v=abcdefghijk")
        );
        assert!(record.status.is_complete());
    }

    #[test]
    fn test_video_limit() {
        let mut html = String::new();
        for i in 0..9 {
            html.push_str(&format!(r#"{{"videoId":"aaaaaaaaaa{i}"}}"#));
        }
        let record = parse_channel(&html, "https://youtube.com/@a/videos", 3).unwrap();
        assert_eq!(record.items.len(), 3);
    }

    #[test]
    fn test_no_videos_is_partial() {
        let html = r#"<html><head><meta property="og:title" content="C"></head></html>"#;
        let record = parse_channel(html, "https://youtube.com/@a/videos", 5).unwrap();
        assert!(matches!(record.status, ExtractionStatus::Partial { .. }));
    }
}
