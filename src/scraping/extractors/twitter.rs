//! Twitter/X extraction from Nitter markup.

use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::{collect_text, el_first_attr, el_first_text, selector};
use crate::scraping::links::classify_link;
use crate::scraping::types::{CanonicalRecord, RecordItem, Stat, truncate_chars};

/// Character budget for profile tweets.
const TWEET_CHARS: usize = 300;
/// Character budget for search tweets.
const SEARCH_TWEET_CHARS: usize = 250;
/// Max outbound links surfaced per tweet.
const LINKS_PER_TWEET: usize = 3;

/// Parse a Nitter profile page.
///
/// # Errors
/// Returns `NotFound` when the page carries Nitter's error panel (user
/// missing or suspended), or `HtmlParse` when a selector fails.
pub fn parse_profile(
    html: &str,
    username: &str,
    max_tweets: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let error_panel = selector(".error-panel")?;
    if document.select(&error_panel).next().is_some() {
        return Err(ScrapeError::NotFound(format!("Twitter user @{username}")));
    }

    let mut record = CanonicalRecord::new(
        "twitter",
        format!("Twitter Profile: @{username}"),
        "Recent Tweets",
    );
    record.profile_url = Some(format!("https://x.com/{username}"));

    let card_sel = selector(".profile-card")?;
    if let Some(card) = document.select(&card_sel).next() {
        record.header.display_name = el_first_text(card, &selector(".profile-card-fullname")?);
        record.header.bio = el_first_text(card, &selector(".profile-bio")?);
        record.header.location = el_first_text(card, &selector(".profile-location")?);
        record.header.website = el_first_attr(card, &selector(".profile-website a")?, "href");

        let nums: Vec<String> = card
            .select(&selector(".profile-stat-num")?)
            .map(collect_text)
            .collect();
        let labels: Vec<String> = card
            .select(&selector(".profile-stat-header")?)
            .map(collect_text)
            .collect();
        for (label, num) in labels.iter().zip(nums.iter()) {
            record.header.stats.push(Stat::new(label, num));
        }
    } else {
        record = record.partial("profile card not found");
    }

    record.items = parse_tweets(&document, max_tweets, TWEET_CHARS, false)?;
    Ok(record)
}

/// Parse a Nitter search-results page.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_search(
    html: &str,
    query: &str,
    max_tweets: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new(
        "twitter",
        format!("Twitter Search: '{query}'"),
        "Tweets",
    );
    record.items = parse_tweets(&document, max_tweets, SEARCH_TWEET_CHARS, true)?;
    Ok(record)
}

/// Shared timeline-item walk for profile and search pages.
fn parse_tweets(
    document: &Html,
    max_tweets: usize,
    char_budget: usize,
    with_author: bool,
) -> Result<Vec<RecordItem>, ScrapeError> {
    let item_sel = selector(".timeline-item")?;
    let content_sel = selector(".tweet-content")?;
    let link_sel = selector(".tweet-link")?;
    let date_sel = selector(".tweet-date a")?;
    let username_sel = selector(".username")?;
    let anchor_sel = selector("a[href]")?;
    let comment_sel = selector(".tweet-stats .icon-comment + span")?;
    let retweet_sel = selector(".tweet-stats .icon-retweet + span")?;
    let like_sel = selector(".tweet-stats .icon-heart + span")?;

    let mut items = Vec::new();

    for tweet in document.select(&item_sel).take(max_tweets) {
        let Some(content_el) = tweet.select(&content_sel).next() else {
            continue;
        };
        let text = truncate_chars(&collect_text(content_el), char_budget);

        let mut item = RecordItem {
            text: Some(text),
            ..RecordItem::default()
        };

        if with_author {
            item.kind = tweet.select(&username_sel).next().map(collect_text);
        }

        if let Some(path) = el_first_attr(tweet, &link_sel, "href") {
            item.url = Some(format!("https://x.com{path}"));
        }

        if let Some(replies) = tweet.select(&comment_sel).next().map(collect_text) {
            item.stats.push(Stat::new("replies", replies));
        }
        if let Some(retweets) = tweet.select(&retweet_sel).next().map(collect_text) {
            item.stats.push(Stat::new("retweets", retweets));
        }
        if let Some(likes) = tweet.select(&like_sel).next().map(collect_text) {
            item.stats.push(Stat::new("likes", likes));
        }

        item.date = tweet.select(&date_sel).next().map(collect_text);

        // Outbound links only; nitter-internal hops are noise.
        for anchor in content_el.select(&anchor_sel) {
            if item.links.len() >= LINKS_PER_TWEET {
                break;
            }
            if let Some(href) = anchor.value().attr("href") {
                if href.starts_with("http") && !href.contains("nitter") {
                    item.links.push(classify_link(href, &collect_text(anchor)));
                }
            }
        }

        items.push(item);
    }

    Ok(items)
}
