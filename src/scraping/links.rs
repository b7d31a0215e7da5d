//! Link classification.
//!
//! Maps an arbitrary URL to a platform tag and a link category. Platform
//! signatures take priority over the generic path heuristics, so a
//! LinkedIn URL is always social even when its path says "people".

use serde::{Deserialize, Serialize};
use url::Url;

/// Category of a discovered link.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LinkCategory {
    /// A social platform link.
    Social,
    /// A profile/bio/about page.
    Profile,
    /// Blog posts, articles, press.
    Content,
    /// Anything else.
    Other,
}

impl LinkCategory {
    /// Lowercase tag for output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Social => "social",
            Self::Profile => "profile",
            Self::Content => "content",
            Self::Other => "other",
        }
    }
}

/// A classified link discovered during extraction. Transient; never
/// persisted by the engine itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The link URL.
    pub url: String,
    /// Display label (anchor text or the URL itself).
    pub label: String,
    /// Link category.
    pub category: LinkCategory,
    /// Platform tag, when a signature matched.
    #[serde(skip_deserializing)]
    pub platform: Option<&'static str>,
}

impl LinkRecord {
    /// Platform tag, or "web" when no signature matched.
    #[must_use]
    pub fn platform_or_web(&self) -> &'static str {
        self.platform.unwrap_or("web")
    }
}

/// Ordered platform signature table. First match wins; order is fixed so
/// classification is reproducible across runs.
const PLATFORM_SIGNATURES: &[(&str, &[&str])] = &[
    ("linkedin", &["linkedin.com/in", "linkedin.com"]),
    ("twitter", &["x.com", "twitter.com", "nitter"]),
    ("github", &["github.com"]),
    ("facebook", &["facebook.com"]),
    ("instagram", &["instagram.com"]),
    ("youtube", &["youtube.com", "youtu.be"]),
    ("tiktok", &["tiktok.com"]),
    ("medium", &["medium.com"]),
    ("substack", &["substack.com"]),
    ("reddit", &["reddit.com"]),
    ("hackernews", &["news.ycombinator.com"]),
];

/// Path/query keywords that mark a profile or bio page.
const PROFILE_KEYWORDS: &[&str] = &[
    "profile", "about", "team", "author", "user", "people", "staff", "bio",
];

/// Path/query keywords that mark published content.
const CONTENT_KEYWORDS: &[&str] = &["blog", "post", "article", "news", "press", "media"];

/// Classify a URL into (platform, category).
#[must_use]
pub fn classify(url: &str) -> (Option<&'static str>, LinkCategory) {
    let lower = url.to_lowercase();

    if let Some(platform) = match_platform(&lower) {
        return (Some(platform), LinkCategory::Social);
    }

    // Heuristics look at the path and query only, so a domain name like
    // "aboutus.example" does not count as a profile keyword hit.
    let haystack = path_and_query(&lower);

    if PROFILE_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        return (None, LinkCategory::Profile);
    }
    if CONTENT_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        return (None, LinkCategory::Content);
    }

    (None, LinkCategory::Other)
}

/// Build a [`LinkRecord`] for a URL with a display label.
#[must_use]
pub fn classify_link(url: &str, label: &str) -> LinkRecord {
    let (platform, category) = classify(url);
    let label = if label.trim().is_empty() {
        url.to_string()
    } else {
        label.trim().to_string()
    };
    LinkRecord {
        url: url.to_string(),
        label,
        category,
        platform,
    }
}

/// Find the first platform signature matching the lowercased URL.
fn match_platform(lower: &str) -> Option<&'static str> {
    for (platform, patterns) in PLATFORM_SIGNATURES {
        for pattern in *patterns {
            if signature_matches(lower, pattern) {
                return Some(platform);
            }
        }
    }
    None
}

/// Substring match anchored at a host boundary, so "x.com" does not match
/// "redux.com".
fn signature_matches(lower: &str, pattern: &str) -> bool {
    let mut search_from = 0;
    while let Some(pos) = lower[search_from..].find(pattern) {
        let abs = search_from + pos;
        let boundary = abs == 0
            || matches!(lower.as_bytes()[abs - 1], b'/' | b'.' | b'@');
        if boundary {
            return true;
        }
        search_from = abs + 1;
    }
    false
}

/// Path plus query of a URL, or the whole string when it does not parse.
fn path_and_query(lower: &str) -> String {
    Url::parse(lower).map_or_else(
        |_| lower.to_string(),
        |u| {
            let mut s = u.path().to_string();
            if let Some(q) = u.query() {
                s.push('?');
                s.push_str(q);
            }
            s
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_com_is_twitter_social() {
        let (platform, category) = classify("https://x.com/alice");
        assert_eq!(platform, Some("twitter"));
        assert_eq!(category, LinkCategory::Social);
    }

    #[test]
    fn test_about_team_path_is_profile() {
        let (platform, category) = classify("https://example.com/about-team");
        assert_eq!(platform, None);
        assert_eq!(category, LinkCategory::Profile);
    }

    #[test]
    fn test_unmatched_is_other() {
        let (platform, category) = classify("https://example.com/random");
        assert_eq!(platform, None);
        assert_eq!(category, LinkCategory::Other);
    }

    #[test]
    fn test_platform_beats_keyword_heuristics() {
        // "people" is a profile keyword, but the LinkedIn signature wins.
        let (platform, category) = classify("https://www.linkedin.com/in/people-person");
        assert_eq!(platform, Some("linkedin"));
        assert_eq!(category, LinkCategory::Social);
    }

    #[test]
    fn test_signature_needs_host_boundary() {
        let (platform, _) = classify("https://redux.com/docs");
        assert_eq!(platform, None);

        let (platform, _) = classify("https://www.x.com/bob");
        assert_eq!(platform, Some("twitter"));
    }

    #[test]
    fn test_content_keywords() {
        let (_, category) = classify("https://example.com/blog/2024/launch");
        assert_eq!(category, LinkCategory::Content);
    }

    #[test]
    fn test_nitter_counts_as_twitter() {
        let (platform, _) = classify("https://nitter.poast.org/alice");
        assert_eq!(platform, Some("twitter"));
    }

    #[test]
    fn test_classify_link_falls_back_to_url_label() {
        let record = classify_link("https://github.com/alice", "  ");
        assert_eq!(record.label, "https://github.com/alice");
        assert_eq!(record.platform_or_web(), "github");
    }

    #[test]
    fn test_hackernews_signature() {
        let (platform, category) = classify("https://news.ycombinator.com/user?id=pg");
        assert_eq!(platform, Some("hackernews"));
        assert_eq!(category, LinkCategory::Social);
    }
}
