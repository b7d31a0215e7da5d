//! Research tool surface.
//!
//! [`ResearchToolbox`] bundles the scrape client, the evidence store, and
//! a search provider behind string-in/string-out async methods. This is
//! the only layer that turns engine errors into prose: scrape and search
//! failures become descriptive messages with a fallback suggestion, store
//! precondition violations become refusals, and malformed input is
//! rejected before any I/O.

use std::fmt::Write as _;

use crate::scraping::config::{
    clamp_count, ARTICLE_BOUNDS, HN_ITEM_BOUNDS, NEWS_DAY_BOUNDS, REDDIT_ITEM_BOUNDS,
    REDDIT_SEARCH_BOUNDS, REPO_BOUNDS, TWEET_BOUNDS, TWEET_SEARCH_BOUNDS, VIDEO_BOUNDS,
    WEB_RESULT_BOUNDS,
};
use crate::scraping::extractors::{github, hackernews, linkedin, medium, reddit, twitter, youtube};
use crate::scraping::mirrors::fetch_from_mirrors;
use crate::scraping::page::{read_page, PageExtract};
use crate::scraping::render::{md_link, render_record};
use crate::scraping::{ScrapeClient, ScrapeError};
use crate::search::{
    profile_query, render_results, site_filter, supported_platforms, SearchProvider,
};
use crate::store::dossier::{self, DossierOutcome};
use crate::store::{
    AccountListing, AccountSaved, Confidence, EvidenceStore, FactCategory, NewAccount, NewFact,
    PurgeOutcome, StoreError,
};

/// The full research tool surface.
pub struct ResearchToolbox<S: SearchProvider> {
    scraper: ScrapeClient,
    store: EvidenceStore,
    search: S,
}

impl<S: SearchProvider> ResearchToolbox<S> {
    /// Bundle a scrape client, an evidence store, and a search provider.
    #[must_use]
    pub fn new(scraper: ScrapeClient, store: EvidenceStore, search: S) -> Self {
        Self {
            scraper,
            store,
            search,
        }
    }

    // ---- search tools ----

    /// General web search for a person, optionally with disambiguation
    /// context.
    pub async fn search_person(&self, name: &str, context: &str, max_results: usize) -> String {
        let max_results = clamp_count(max_results, WEB_RESULT_BOUNDS);
        let mut query = format!("\"{}\"", name.trim());
        if !context.trim().is_empty() {
            query.push(' ');
            query.push_str(context.trim());
        }

        match self.search.web_search(&query, max_results, true).await {
            Ok(response) => render_results(&format!("Web Search: '{}'", name.trim()), &response),
            Err(e) => format!("Search failed: {e}"),
        }
    }

    /// Search one platform for a person's profile using the platform's
    /// site filter.
    pub async fn search_social_profile(&self, name: &str, platform: &str, context: &str) -> String {
        let Some(filter) = site_filter(platform) else {
            return format!(
                "Unsupported platform '{}'. Supported platforms: {}",
                platform.trim(),
                supported_platforms()
            );
        };

        let query = profile_query(name, filter, context);
        match self.search.web_search(&query, 10, false).await {
            Ok(response) => render_results(
                &format!(
                    "Profile Search: '{}' on {}",
                    name.trim(),
                    platform.trim().to_lowercase()
                ),
                &response,
            ),
            Err(e) => format!("Search failed: {e}"),
        }
    }

    /// News search for mentions of a name inside a trailing day window.
    pub async fn search_news_mentions(
        &self,
        name: &str,
        context: &str,
        days: usize,
        max_results: usize,
    ) -> String {
        let days = clamp_count(days, NEWS_DAY_BOUNDS);
        let max_results = clamp_count(max_results, WEB_RESULT_BOUNDS);
        let mut query = format!("\"{}\"", name.trim());
        if !context.trim().is_empty() {
            query.push(' ');
            query.push_str(context.trim());
        }

        match self.search.news_search(&query, max_results, days).await {
            Ok(response) => render_results(
                &format!("News Search: '{}' (last {days} days)", name.trim()),
                &response,
            ),
            Err(e) => format!("Search failed: {e}"),
        }
    }

    /// Read an arbitrary web page: bounded text excerpt plus classified
    /// outbound links.
    pub async fn read_profile_page(&self, url: &str, extract_links: bool) -> String {
        match read_page(self.scraper.fetcher(), &self.scraper.config, url, extract_links).await {
            Ok(extract) => render_page(&extract),
            Err(e) => scrape_failure(&e),
        }
    }

    // ---- scrape tools ----

    /// Scrape a Twitter/X profile through the Nitter mirror rotation.
    pub async fn scrape_twitter_profile(&self, username: &str, max_tweets: usize) -> String {
        let username = username.trim().trim_start_matches('@').to_string();
        if username.is_empty() {
            return "A username is required.".to_string();
        }
        let max_tweets = clamp_count(max_tweets, TWEET_BOUNDS);

        let page = fetch_from_mirrors(
            self.scraper.fetcher(),
            "twitter",
            &format!("Twitter user @{username}"),
            &self.scraper.config.nitter_mirrors,
            &format!("/{username}"),
        )
        .await;

        match page.and_then(|p| twitter::parse_profile(&p.body, &username, max_tweets)) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Search recent tweets through the Nitter mirror rotation.
    pub async fn scrape_twitter_search(&self, query: &str, max_tweets: usize) -> String {
        let query = query.trim();
        if query.is_empty() {
            return "A search query is required.".to_string();
        }
        let max_tweets = clamp_count(max_tweets, TWEET_SEARCH_BOUNDS);
        let path = format!("/search?f=tweets&q={}", urlencoding::encode(query));

        let page = fetch_from_mirrors(
            self.scraper.fetcher(),
            "twitter",
            &format!("tweets matching '{query}'"),
            self.scraper.config.search_mirrors(),
            &path,
        )
        .await;

        match page.and_then(|p| twitter::parse_search(&p.body, query, max_tweets)) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Scrape a Reddit user's recent posts and comments via old.reddit.com.
    pub async fn scrape_reddit_user(&self, username: &str, max_items: usize) -> String {
        let username = normalize_reddit_name(username, "u/");
        if username.is_empty() {
            return "A username is required.".to_string();
        }
        let max_items = clamp_count(max_items, REDDIT_ITEM_BOUNDS);
        let url = format!("https://old.reddit.com/user/{username}");

        let body = self
            .fetch_direct(&url, &format!("Reddit user u/{username}"))
            .await;
        match body.and_then(|b| reddit::parse_user(&b, &username, max_items)) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Search Reddit posts, optionally restricted to one subreddit.
    pub async fn scrape_reddit_search(
        &self,
        query: &str,
        subreddit: Option<&str>,
        max_posts: usize,
    ) -> String {
        let query = query.trim();
        if query.is_empty() {
            return "A search query is required.".to_string();
        }
        let max_posts = clamp_count(max_posts, REDDIT_SEARCH_BOUNDS);
        let encoded = urlencoding::encode(query);

        let subreddit = subreddit
            .map(|s| normalize_reddit_name(s, "r/"))
            .filter(|s| !s.is_empty());
        let url = subreddit.as_ref().map_or_else(
            || format!("https://old.reddit.com/search?q={encoded}&sort=new"),
            |sub| {
                format!("https://old.reddit.com/r/{sub}/search?q={encoded}&restrict_sr=on&sort=new")
            },
        );

        let body = self
            .fetch_direct(&url, &format!("Reddit results for '{query}'"))
            .await;
        match body.and_then(|b| reddit::parse_search(&b, query, subreddit.as_deref(), max_posts)) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Scrape a GitHub profile. When nothing is pinned, falls back to the
    /// repositories tab for the item list.
    pub async fn scrape_github_profile(&self, username: &str, max_repos: usize) -> String {
        let username = username.trim().trim_start_matches('@').to_string();
        if username.is_empty() {
            return "A username is required.".to_string();
        }
        let max_repos = clamp_count(max_repos, REPO_BOUNDS);
        let url = format!("https://github.com/{username}");

        let body = match self
            .fetch_direct(&url, &format!("GitHub user {username}"))
            .await
        {
            Ok(body) => body,
            Err(e) => return scrape_failure(&e),
        };

        let mut record = match github::parse_profile(&body, &username, max_repos) {
            Ok(record) => record,
            Err(e) => return scrape_failure(&e),
        };

        if record.items.is_empty() {
            let repos_url = format!("{url}?tab=repositories");
            if let Ok(body) = self
                .fetch_direct(&repos_url, &format!("repositories of {username}"))
                .await
            {
                if let Ok(items) = github::parse_repo_list(&body, max_repos) {
                    if !items.is_empty() {
                        record.items = items;
                        record.items_heading = "Repositories".to_string();
                    }
                }
            }
        }

        render_record(&record)
    }

    /// Best-effort scrape of a LinkedIn public profile.
    pub async fn scrape_linkedin_profile(&self, profile_url: &str) -> String {
        let profile_url = profile_url.trim();
        if !profile_url.contains("linkedin.com/in/") {
            return "Invalid input: expected a LinkedIn profile URL of the form \
                    https://linkedin.com/in/<handle>"
                .to_string();
        }

        let body = match self.fetch_direct(profile_url, "LinkedIn profile").await {
            Ok(body) => body,
            Err(ScrapeError::HttpStatus { status: 999, .. }) => {
                return "LinkedIn blocked the request (HTTP 999). Try search_social_profile \
                        to find public traces instead."
                    .to_string();
            }
            Err(e) => return scrape_failure(&e),
        };

        match linkedin::parse_profile(&body, profile_url) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Scrape a YouTube channel page, normalized to its /videos tab.
    pub async fn scrape_youtube_channel(&self, channel_url: &str, max_videos: usize) -> String {
        let mut url = channel_url.trim().trim_end_matches('/').to_string();
        if !url.contains("youtube.com") {
            return "Invalid input: expected a youtube.com channel URL.".to_string();
        }
        if !url.ends_with("/videos") {
            url.push_str("/videos");
        }
        let max_videos = clamp_count(max_videos, VIDEO_BOUNDS);

        let body = self.fetch_direct(&url, "YouTube channel").await;
        match body.and_then(|b| youtube::parse_channel(&b, &url, max_videos)) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Scrape a Medium author profile and recent articles.
    pub async fn scrape_medium_profile(&self, username: &str, max_articles: usize) -> String {
        let username = username.trim().trim_start_matches('@').to_string();
        if username.is_empty() {
            return "A username is required.".to_string();
        }
        let max_articles = clamp_count(max_articles, ARTICLE_BOUNDS);
        let url = format!("https://medium.com/@{username}");

        let body = self
            .fetch_direct(&url, &format!("Medium user @{username}"))
            .await;
        match body.and_then(|b| medium::parse_profile(&b, &username, max_articles)) {
            Ok(record) => render_record(&record),
            Err(e) => scrape_failure(&e),
        }
    }

    /// Scrape a Hacker News user: profile table plus recent submissions
    /// from a second fetch.
    pub async fn scrape_hackernews_user(&self, username: &str, max_items: usize) -> String {
        let username = username.trim().to_string();
        if username.is_empty() {
            return "A username is required.".to_string();
        }
        let max_items = clamp_count(max_items, HN_ITEM_BOUNDS);
        let user_url = format!("https://news.ycombinator.com/user?id={username}");

        let body = match self
            .fetch_direct(&user_url, &format!("Hacker News user {username}"))
            .await
        {
            Ok(body) => body,
            Err(e) => return scrape_failure(&e),
        };
        if body.contains("No such user") {
            return format!("Hacker News user {username} was not found.");
        }

        let mut record = match hackernews::parse_user(&body, &username) {
            Ok(record) => record,
            Err(e) => return scrape_failure(&e),
        };

        let submitted_url = format!("https://news.ycombinator.com/submitted?id={username}");
        if let Ok(body) = self
            .fetch_direct(&submitted_url, &format!("submissions of {username}"))
            .await
        {
            if let Ok(items) = hackernews::parse_submissions(&body, max_items) {
                record.items = items;
            }
        }

        render_record(&record)
    }

    // ---- evidence store tools ----

    /// Save a discovered account under a subject.
    pub async fn save_account(
        &self,
        subject: &str,
        platform: &str,
        username: &str,
        profile_url: Option<&str>,
        display_name: Option<&str>,
        bio: Option<&str>,
        followers: Option<&str>,
        verified: bool,
        notes: Option<&str>,
    ) -> String {
        if subject.trim().is_empty() || platform.trim().is_empty() || username.trim().is_empty() {
            return "Invalid input: subject, platform, and username are all required.".to_string();
        }

        let account = NewAccount {
            platform: platform.trim().to_lowercase(),
            username: username.trim().to_string(),
            profile_url: nonempty(profile_url),
            display_name: nonempty(display_name),
            bio: nonempty(bio),
            followers: nonempty(followers),
            verified,
            notes: nonempty(notes),
        };

        match self.store.save_account(subject, account).await {
            Ok(AccountSaved::Saved {
                subject,
                total_accounts,
            }) => format!(
                "Saved {} account '{}' for {subject}. {total_accounts} account(s) on record.",
                platform.trim().to_lowercase(),
                username.trim()
            ),
            Ok(AccountSaved::AlreadySaved { subject }) => {
                format!("This account is already saved for {subject}.")
            }
            Err(e) => store_failure(&e),
        }
    }

    /// Record a fact about a subject. Category and confidence are
    /// validated before any storage I/O.
    pub async fn save_fact(
        &self,
        subject: &str,
        category: &str,
        content: &str,
        source_url: Option<&str>,
        confidence: &str,
    ) -> String {
        if subject.trim().is_empty() || content.trim().is_empty() {
            return "Invalid input: subject and content are required.".to_string();
        }
        let Some(category) = FactCategory::parse(category) else {
            return format!(
                "Unknown category '{}'. Supported categories: {}",
                category.trim(),
                FactCategory::supported()
            );
        };
        let confidence = if confidence.trim().is_empty() {
            Confidence::default()
        } else {
            match Confidence::parse(confidence) {
                Some(c) => c,
                None => {
                    return format!(
                        "Unknown confidence '{}'. Use low, medium, or high.",
                        confidence.trim()
                    );
                }
            }
        };

        let fact = NewFact {
            category,
            content: content.trim().to_string(),
            source_url: nonempty(source_url),
            confidence,
        };

        match self.store.save_fact(subject, fact).await {
            Ok(saved) => format!(
                "Recorded {} fact for {}. {} fact(s) on record.",
                category.as_str(),
                saved.subject,
                saved.total_facts
            ),
            Err(e) => store_failure(&e),
        }
    }

    /// List everything the store knows about a subject's accounts.
    pub async fn list_accounts(&self, subject: &str) -> String {
        match self.store.list_accounts(subject).await {
            Ok(AccountListing::NoSubject) => {
                format!("No subject matching '{}' on record.", subject.trim())
            }
            Ok(AccountListing::NoAccounts { subject }) => {
                format!("No accounts on record for {subject}.")
            }
            Ok(AccountListing::Accounts { subject, accounts }) => {
                let mut out = String::new();
                let _ = writeln!(out, "**Accounts for {subject} ({}):**\n", accounts.len());
                for account in &accounts {
                    let _ = write!(out, "- **{}**: {}", account.platform, account.username);
                    if account.verified {
                        let _ = write!(out, " (verified)");
                    }
                    if let Some(url) = &account.profile_url {
                        let _ = write!(out, " ({})", md_link(url, url));
                    }
                    if let Some(followers) = &account.followers {
                        let _ = write!(out, " [{followers} followers]");
                    }
                    out.push('\n');
                }
                out
            }
            Err(e) => store_failure(&e),
        }
    }

    /// Assemble the dossier for a subject.
    pub async fn generate_dossier(&self, subject: &str) -> String {
        match dossier::assemble(&self.store, subject).await {
            Ok(DossierOutcome::NoSubject) => {
                format!("No subject matching '{}' on record.", subject.trim())
            }
            Ok(DossierOutcome::NoData { subject }) => {
                format!("Nothing recorded for {subject} yet. Save accounts or facts first.")
            }
            Ok(DossierOutcome::Report(report)) => report,
            Err(e) => store_failure(&e),
        }
    }

    /// Delete a subject and everything recorded about it. Refuses without
    /// explicit confirmation.
    pub async fn purge_subject(&self, subject: &str, confirm: bool) -> String {
        match self.store.purge_subject(subject, confirm).await {
            Ok(PurgeOutcome::NotConfirmed) => {
                "Purge not confirmed. Pass confirm=true to delete this subject's data."
                    .to_string()
            }
            Ok(PurgeOutcome::NoSubject) => {
                format!("No subject matching '{}' on record.", subject.trim())
            }
            Ok(PurgeOutcome::Purged {
                subject,
                accounts_deleted,
                facts_deleted,
            }) => format!(
                "Purged {subject}: {accounts_deleted} account(s) and {facts_deleted} fact(s) deleted."
            ),
            Err(e) => store_failure(&e),
        }
    }

    /// Single fetch with status classification: 200 is a body, 404 is a
    /// definitive not-found for `target`, anything else is a status error.
    async fn fetch_direct(&self, url: &str, target: &str) -> Result<String, ScrapeError> {
        let page = self.scraper.fetcher().get(url).await?;
        match page.status {
            200 => Ok(page.body),
            404 => Err(ScrapeError::NotFound(target.to_string())),
            status => Err(ScrapeError::HttpStatus {
                status,
                url: url.to_string(),
            }),
        }
    }
}

/// Render a page extract as markdown.
fn render_page(extract: &PageExtract) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "**Web Page:** {}\n", md_link(&extract.url, &extract.url));

    if let Some(title) = &extract.title {
        let _ = writeln!(out, "**Title:** {title}");
    }
    if let Some(description) = &extract.description {
        let _ = writeln!(out, "**Description:** {description}");
    }

    for (heading, links) in [
        ("Social links", &extract.social),
        ("Profile links", &extract.profile),
        ("Content links", &extract.content),
    ] {
        if links.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n**{heading}:**");
        for link in links {
            let _ = writeln!(
                out,
                "- [{}] {}",
                link.platform_or_web(),
                md_link(&link.label, &link.url)
            );
        }
    }

    if !extract.excerpt.is_empty() {
        let _ = writeln!(out, "\n**Content:**\n{}", extract.excerpt);
    }

    out
}

/// Map a scrape error to the user-facing message for tool output.
fn scrape_failure(err: &ScrapeError) -> String {
    match err {
        ScrapeError::NotFound(target) => format!("{target} was not found."),
        ScrapeError::MirrorsExhausted { .. } => {
            "All Nitter instances are currently unavailable. Try search_social_profile instead."
                .to_string()
        }
        ScrapeError::InvalidInput(msg) => format!("Invalid input: {msg}"),
        other => format!("Scrape failed: {other}"),
    }
}

fn store_failure(err: &StoreError) -> String {
    format!("Storage error: {err}")
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn normalize_reddit_name(name: &str, prefix: &str) -> String {
    name.trim()
        .trim_start_matches('/')
        .trim_start_matches(prefix)
        .trim_start_matches('@')
        .to_string()
}
