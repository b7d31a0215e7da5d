//! Canonical record types produced by the platform extractors.
//!
//! Every extractor returns the same shape: an optional-field profile
//! header plus a bounded item list. Platforms disagree on which fields
//! exist, so everything in the header is optional and stats are free-form
//! label/value pairs.

use serde::{Deserialize, Serialize};

use crate::scraping::links::LinkRecord;

/// Outcome of a parse that still produced a record.
///
/// Definitive not-found and hard errors travel as `ScrapeError`; this
/// enum only distinguishes a fully parsed record from one where the
/// structural anchor was missing and header fields came from meta-tag
/// fallback.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ExtractionStatus {
    /// The structural anchor was present and parsed.
    Complete,
    /// The anchor was absent; the record holds whatever fallback fields
    /// were found. The note explains what could not be extracted.
    Partial {
        /// Human-readable note about what was missing.
        note: String,
    },
}

impl ExtractionStatus {
    /// Check for a complete extraction.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A label/value stat pair (followers, karma, stars, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stat {
    /// Stat label as the platform names it.
    pub label: String,
    /// Stat value, free text; platforms report these inconsistently.
    pub value: String,
}

impl Stat {
    /// Build a stat pair.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Profile header fields. Everything is optional; absent fields are
/// omitted from output rather than rendered empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProfileHeader {
    /// Display name.
    pub display_name: Option<String>,
    /// Bio or description.
    pub bio: Option<String>,
    /// Location.
    pub location: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Company or employer.
    pub company: Option<String>,
    /// Social links listed on the profile itself.
    pub social_links: Vec<LinkRecord>,
    /// Follower/stat fields.
    pub stats: Vec<Stat>,
}

impl ProfileHeader {
    /// Check whether any field was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.bio.is_none()
            && self.location.is_none()
            && self.website.is_none()
            && self.company.is_none()
            && self.social_links.is_empty()
            && self.stats.is_empty()
    }
}

/// One post/tweet/submission/article in a canonical record.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordItem {
    /// Item kind marker (e.g. "POST" vs "COMMENT").
    pub kind: Option<String>,
    /// Item title.
    pub title: Option<String>,
    /// Item text, truncated to the platform's character budget.
    pub text: Option<String>,
    /// Canonical link to the item.
    pub url: Option<String>,
    /// Context line (subreddit, author, language).
    pub context: Option<String>,
    /// Engagement stats (score, replies, stars, ...).
    pub stats: Vec<Stat>,
    /// Date label as shown by the platform.
    pub date: Option<String>,
    /// Outbound links embedded in the item, classified.
    pub links: Vec<LinkRecord>,
}

/// Canonical structured output of a platform extractor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Lowercase platform tag.
    pub platform: String,
    /// Record title, e.g. "Twitter Profile: @alice".
    pub title: String,
    /// Canonical profile URL for the target.
    pub profile_url: Option<String>,
    /// Profile header fields.
    pub header: ProfileHeader,
    /// Heading used for the item list, e.g. "Recent Tweets".
    pub items_heading: String,
    /// Ordered, length-bounded item list.
    pub items: Vec<RecordItem>,
    /// Parse status.
    pub status: ExtractionStatus,
}

impl CanonicalRecord {
    /// Start an empty record for a platform.
    #[must_use]
    pub fn new(
        platform: impl Into<String>,
        title: impl Into<String>,
        items_heading: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            title: title.into(),
            profile_url: None,
            header: ProfileHeader::default(),
            items_heading: items_heading.into(),
            items: Vec::new(),
            status: ExtractionStatus::Complete,
        }
    }

    /// Mark the record partial with a note.
    #[must_use]
    pub fn partial(mut self, note: impl Into<String>) -> Self {
        self.status = ExtractionStatus::Partial { note: note.into() };
        self
    }
}

/// Truncate a string to a character budget, appending an ellipsis marker
/// when anything was cut. Char-based, so multi-byte text never panics.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
