//! Configuration for the scraping module.
//!
//! Mirror lists, user agents, and item-count bounds live here as plain
//! data so adding a mirror or adjusting a clamp is an additive change.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Allowed range for tweets fetched from a profile.
pub const TWEET_BOUNDS: (usize, usize) = (1, 50);
/// Allowed range for tweets returned by a search.
pub const TWEET_SEARCH_BOUNDS: (usize, usize) = (1, 30);
/// Allowed range for Reddit posts/comments on a user page.
pub const REDDIT_ITEM_BOUNDS: (usize, usize) = (1, 50);
/// Allowed range for Reddit search results.
pub const REDDIT_SEARCH_BOUNDS: (usize, usize) = (1, 30);
/// Allowed range for GitHub repositories.
pub const REPO_BOUNDS: (usize, usize) = (1, 30);
/// Allowed range for YouTube videos.
pub const VIDEO_BOUNDS: (usize, usize) = (1, 20);
/// Allowed range for Medium articles.
pub const ARTICLE_BOUNDS: (usize, usize) = (1, 20);
/// Allowed range for Hacker News submissions.
pub const HN_ITEM_BOUNDS: (usize, usize) = (1, 30);
/// Allowed range for general web search results.
pub const WEB_RESULT_BOUNDS: (usize, usize) = (1, 20);
/// Allowed range for the news search day window.
pub const NEWS_DAY_BOUNDS: (usize, usize) = (1, 365);

/// Clamp a caller-supplied count into a safe range.
///
/// Caller values are advisory; the server-side bounds cap latency and
/// output size regardless of what the caller asked for.
#[must_use]
pub fn clamp_count(requested: usize, bounds: (usize, usize)) -> usize {
    requested.clamp(bounds.0, bounds.1)
}

/// Configuration for the scrape client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// User agents to rotate.
    pub user_agents: Vec<String>,
    /// Ordered Nitter mirrors for Twitter/X profile scraping.
    pub nitter_mirrors: Vec<String>,
    /// How many of the Nitter mirrors to use for search requests.
    pub nitter_search_mirrors: usize,
    /// Maximum anchors inspected by the page reader.
    pub max_page_links: usize,
    /// Maximum non-empty lines kept in a page excerpt.
    pub page_excerpt_lines: usize,
    /// Maximum characters kept in a page excerpt.
    pub page_excerpt_chars: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agents: default_user_agents(),
            nitter_mirrors: default_nitter_mirrors(),
            nitter_search_mirrors: 3,
            max_page_links: 50,
            page_excerpt_lines: 150,
            page_excerpt_chars: 5000,
        }
    }
}

impl ScrapeConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replace the Nitter mirror list.
    #[must_use]
    pub fn with_nitter_mirrors(mut self, mirrors: Vec<String>) -> Self {
        self.nitter_mirrors = mirrors;
        self
    }

    /// Mirrors used for Twitter search (a prefix of the profile list).
    #[must_use]
    pub fn search_mirrors(&self) -> &[String] {
        let n = self.nitter_search_mirrors.min(self.nitter_mirrors.len());
        &self.nitter_mirrors[..n]
    }

    /// Get a random user agent from the rotation list.
    #[must_use]
    pub fn random_user_agent(&self) -> String {
        if self.user_agents.is_empty() {
            return default_user_agents()[0].clone();
        }
        let mut rng = rand::thread_rng();
        let idx = rng.gen_range(0..self.user_agents.len());
        self.user_agents[idx].clone()
    }
}

/// Default Nitter instances, in trial order.
fn default_nitter_mirrors() -> Vec<String> {
    vec![
        "https://nitter.poast.org".to_string(),
        "https://nitter.privacydev.net".to_string(),
        "https://nitter.woodland.cafe".to_string(),
        "https://nitter.esmailelbob.xyz".to_string(),
    ]
}

/// Default user agents for rotation.
fn default_user_agents() -> Vec<String> {
    vec![
        // Chrome on Windows
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        // Chrome on macOS
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        // Firefox on Windows
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
        // Safari on macOS
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15".to_string(),
        // Chrome on Linux
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
    ]
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScrapeConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.nitter_mirrors.len(), 4);
        assert_eq!(config.search_mirrors().len(), 3);
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(0, TWEET_BOUNDS), 1);
        assert_eq!(clamp_count(20, TWEET_BOUNDS), 20);
        assert_eq!(clamp_count(500, TWEET_BOUNDS), 50);
        assert_eq!(clamp_count(400, NEWS_DAY_BOUNDS), 365);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ScrapeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ScrapeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.request_timeout, config.request_timeout);
        assert_eq!(restored.nitter_mirrors, config.nitter_mirrors);
    }

    #[test]
    fn test_random_user_agent() {
        let config = ScrapeConfig::default();
        let ua = config.random_user_agent();
        assert!(ua.contains("Mozilla"));
    }

    #[test]
    fn test_search_mirrors_prefix() {
        let config = ScrapeConfig::default().with_nitter_mirrors(vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
        ]);
        assert_eq!(config.search_mirrors().len(), 2);
    }
}
