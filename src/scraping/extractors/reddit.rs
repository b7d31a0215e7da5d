//! Reddit extraction from old.reddit.com markup.

use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::{collect_text, el_first_text, selector};
use crate::scraping::types::{CanonicalRecord, RecordItem, Stat, truncate_chars};

/// Character budget for post titles and comment bodies.
const ITEM_CHARS: usize = 200;

/// Parse an old-Reddit user page.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_user(
    html: &str,
    username: &str,
    max_items: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new(
        "reddit",
        format!("Reddit Profile: u/{username}"),
        "Recent Activity",
    );
    record.profile_url = Some(format!("https://reddit.com/user/{username}"));

    let karma_sel = selector(".karma")?;
    if let Some(karma) = document.select(&karma_sel).next().map(collect_text) {
        record.header.stats.push(Stat::new("Karma", karma));
    }

    let thing_sel = selector(".thing")?;
    let md_sel = selector(".md")?;
    let title_sel = selector("a.title")?;
    let subreddit_sel = selector(".subreddit")?;
    let score_sel = selector(".score.unvoted")?;
    let time_sel = selector("time")?;

    for thing in document.select(&thing_sel).take(max_items) {
        let is_comment = thing
            .value()
            .attr("class")
            .is_some_and(|c| c.split_whitespace().any(|cls| cls == "comment"));

        let mut item = RecordItem::default();

        if is_comment {
            item.kind = Some("COMMENT".to_string());
            item.text = el_first_text(thing, &md_sel).map(|t| truncate_chars(&t, ITEM_CHARS));
        } else {
            item.kind = Some("POST".to_string());
            item.text = Some(
                el_first_text(thing, &title_sel)
                    .map_or_else(|| "No title".to_string(), |t| truncate_chars(&t, ITEM_CHARS)),
            );
        }

        if let Some(sub) = el_first_text(thing, &subreddit_sel) {
            item.context = Some(sub);
        }

        if let Some(permalink) = thing.value().attr("data-permalink") {
            if !permalink.is_empty() {
                item.url = Some(format!("https://reddit.com{permalink}"));
            }
        }

        if let Some(score_el) = thing.select(&score_sel).next() {
            let score = score_el
                .value()
                .attr("title")
                .map_or_else(|| collect_text(score_el), ToString::to_string);
            item.stats.push(Stat::new("score", score));
        }

        if let Some(time_el) = thing.select(&time_sel).next() {
            let when = time_el
                .value()
                .attr("title")
                .map_or_else(|| collect_text(time_el), ToString::to_string);
            item.date = Some(when);
        }

        items_push_nonempty(&mut record.items, item);
    }

    Ok(record)
}

/// Parse an old-Reddit search page.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_search(
    html: &str,
    query: &str,
    subreddit: Option<&str>,
    max_posts: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let title = subreddit.map_or_else(
        || format!("Reddit Search: '{query}'"),
        |sub| format!("Reddit Search: '{query}' in r/{sub}"),
    );
    let mut record = CanonicalRecord::new("reddit", title, "Posts");

    let post_sel = selector(".search-result, .thing")?;
    let title_sel = selector("a.search-title, a.title")?;
    let sub_sel = selector(".search-subreddit-link, .subreddit")?;
    let score_sel = selector(".search-score, .score")?;
    let comments_sel = selector(".search-comments, .comments")?;
    let author_sel = selector(".search-author a, .author")?;

    for post in document.select(&post_sel).take(max_posts) {
        let mut item = RecordItem::default();

        if let Some(title_el) = post.select(&title_sel).next() {
            item.text = Some(truncate_chars(&collect_text(title_el), ITEM_CHARS));
            if let Some(href) = title_el.value().attr("href") {
                let url = if href.starts_with('/') {
                    format!("https://reddit.com{href}")
                } else {
                    href.to_string()
                };
                item.url = Some(url);
            }
        } else {
            item.text = Some("No title".to_string());
        }

        item.context = el_first_text(post, &sub_sel);

        if let Some(score) = el_first_text(post, &score_sel) {
            item.stats.push(Stat::new("score", score));
        }
        if let Some(comments) = el_first_text(post, &comments_sel) {
            item.stats.push(Stat::new("comments", comments));
        }
        if let Some(author) = el_first_text(post, &author_sel) {
            item.stats.push(Stat::new("by", format!("u/{author}")));
        }

        record.items.push(item);
    }

    Ok(record)
}

/// Keep items that extracted at least a text or a link.
fn items_push_nonempty(items: &mut Vec<RecordItem>, item: RecordItem) {
    if item.text.as_deref().is_some_and(|t| !t.is_empty()) || item.url.is_some() {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_HTML: &str = r#"<html><body>
      <span class="karma">12,345</span>
      <div class="thing link" data-permalink="/r/rust/comments/1/my_post/">
        <a class="title">A post about parsers</a>
        <a class="subreddit">r/rust</a>
        <span class="score unvoted" title="99">99 points</span>
        <time title="2024-01-05T10:00:00+00:00">5 Jan</time>
      </div>
      <div class="thing comment" data-permalink="/r/rust/comments/2/c/x1">
        <div class="md">I agree with the borrow checker on this one.</div>
        <a class="subreddit">r/rust</a>
      </div>
    </body></html>"#;

    #[test]
    fn test_parse_user_posts_and_comments() {
        let record = parse_user(USER_HTML, "alice", 20).unwrap();

        assert_eq!(record.header.stats[0].label, "Karma");
        assert_eq!(record.items.len(), 2);

        let post = &record.items[0];
        assert_eq!(post.kind.as_deref(), Some("POST"));
        assert_eq!(post.text.as_deref(), Some("A post about parsers"));
        assert_eq!(
            post.url.as_deref(),
            Some("https://reddit.com/r/rust/comments/1/my_post/")
        );
        assert_eq!(post.stats[0].value, "99");
        assert_eq!(post.date.as_deref(), Some("2024-01-05T10:00:00+00:00"));

        let comment = &record.items[1];
        assert_eq!(comment.kind.as_deref(), Some("COMMENT"));
        assert!(comment.text.as_deref().unwrap().contains("borrow checker"));
    }

    #[test]
    fn test_parse_user_no_activity() {
        let html = r#"<html><body><span class="karma">10</span></body></html>"#;
        let record = parse_user(html, "alice", 20).unwrap();
        assert!(record.items.is_empty());
        assert!(record.status.is_complete());
    }

    #[test]
    fn test_parse_search_relative_links() {
        let html = r#"<div class="search-result">
            <a class="search-title" href="/r/osint/comments/9/found/">Found something</a>
            <a class="search-subreddit-link">r/osint</a>
            <span class="search-score">42 points</span>
            <span class="search-comments">7 comments</span>
            <span class="search-author"><a>investigator</a></span>
        </div>"#;

        let record = parse_search(html, "alice", None, 10).unwrap();
        assert_eq!(record.title, "Reddit Search: 'alice'");
        let item = &record.items[0];
        assert_eq!(
            item.url.as_deref(),
            Some("https://reddit.com/r/osint/comments/9/found/")
        );
        assert_eq!(item.stats.len(), 3);
        assert_eq!(item.stats[2].value, "u/investigator");
    }

    #[test]
    fn test_parse_search_subreddit_in_title() {
        let record = parse_search("<html></html>", "alice", Some("rust"), 10).unwrap();
        assert_eq!(record.title, "Reddit Search: 'alice' in r/rust");
    }

    #[test]
    fn test_item_limit() {
        let mut html = String::new();
        for i in 0..8 {
            html.push_str(&format!(
                r#"<div class="thing link"><a class="title">post {i}</a></div>"#
            ));
        }
        let record = parse_user(&html, "alice", 3).unwrap();
        assert_eq!(record.items.len(), 3);
    }
}
