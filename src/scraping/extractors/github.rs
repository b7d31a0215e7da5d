//! GitHub profile extraction.

use scraper::Html;

use crate::scraping::error::ScrapeError;
use crate::scraping::extractors::{collect_text, doc_first_text, el_first_text, selector};
use crate::scraping::links::classify_link;
use crate::scraping::types::{CanonicalRecord, RecordItem, Stat, truncate_chars};

/// Character budget for repository descriptions.
const REPO_DESC_CHARS: usize = 150;

/// Parse a GitHub profile page. Items come from the pinned-repositories
/// block; when it is empty the caller fetches the repositories tab and
/// runs [`parse_repo_list`] instead.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_profile(
    html: &str,
    username: &str,
    max_repos: usize,
) -> Result<CanonicalRecord, ScrapeError> {
    let document = Html::parse_document(html);

    let mut record = CanonicalRecord::new(
        "github",
        format!("GitHub Profile: {username}"),
        "Pinned Repositories",
    );
    record.profile_url = Some(format!("https://github.com/{username}"));

    record.header.display_name = doc_first_text(&document, &selector(".p-name, .vcard-fullname")?);
    record.header.bio = doc_first_text(&document, &selector(".p-note, .user-profile-bio")?);
    record.header.location = doc_first_text(&document, &selector("[itemprop='homeLocation']")?);
    record.header.company = doc_first_text(&document, &selector("[itemprop='worksFor']")?);

    let website_sel = selector("[itemprop='url'] a, .Link--primary[href^='http']")?;
    record.header.website = document
        .select(&website_sel)
        .find_map(|e| e.value().attr("href"))
        .filter(|href| !href.contains("github.com"))
        .map(ToString::to_string);

    let social_sel =
        selector(".vcard-details a[href*='twitter'], .vcard-details a[href*='linkedin']")?;
    for link in document.select(&social_sel) {
        if let Some(href) = link.value().attr("href") {
            record
                .header
                .social_links
                .push(classify_link(href, &collect_text(link)));
        }
    }

    let stat_sel = selector(".js-profile-editable-area a span.text-bold, .flex-order-1 span")?;
    let stat_labels = ["Followers", "Following", "Repos"];
    for (label, el) in stat_labels.iter().zip(document.select(&stat_sel)) {
        record.header.stats.push(Stat::new(*label, collect_text(el)));
    }

    let pinned_sel = selector(".pinned-item-list-item")?;
    let repo_name_sel = selector(".repo")?;
    let desc_sel = selector(".pinned-item-desc")?;
    let lang_sel = selector("[itemprop='programmingLanguage']")?;
    let stars_sel = selector("a[href*='stargazers']")?;

    for pinned in document.select(&pinned_sel).take(max_repos) {
        let Some(repo_name) = el_first_text(pinned, &repo_name_sel) else {
            continue;
        };
        let mut item = RecordItem {
            title: Some(repo_name.clone()),
            url: Some(format!("https://github.com/{username}/{repo_name}")),
            ..RecordItem::default()
        };
        item.text = el_first_text(pinned, &desc_sel).map(|d| truncate_chars(&d, REPO_DESC_CHARS));
        item.context = el_first_text(pinned, &lang_sel);
        if let Some(stars) = el_first_text(pinned, &stars_sel) {
            item.stats.push(Stat::new("stars", stars));
        }
        record.items.push(item);
    }

    if record.header.is_empty() && record.items.is_empty() {
        record = record.partial("profile fields not found");
    }

    Ok(record)
}

/// Parse the repositories tab, used as fallback when nothing is pinned.
///
/// # Errors
/// Returns `HtmlParse` when a selector fails.
pub fn parse_repo_list(html: &str, max_repos: usize) -> Result<Vec<RecordItem>, ScrapeError> {
    let document = Html::parse_document(html);

    let li_sel = selector("#user-repositories-list li")?;
    let name_sel = selector("a[itemprop='name codeRepository']")?;
    let desc_sel = selector("[itemprop='description']")?;

    let mut items = Vec::new();
    for li in document.select(&li_sel).take(max_repos) {
        let Some(name_el) = li.select(&name_sel).next() else {
            continue;
        };
        let mut item = RecordItem {
            title: Some(collect_text(name_el)),
            ..RecordItem::default()
        };
        if let Some(href) = name_el.value().attr("href") {
            item.url = Some(format!("https://github.com{href}"));
        }
        item.text = el_first_text(li, &desc_sel).map(|d| truncate_chars(&d, REPO_DESC_CHARS));
        items.push(item);
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::types::ExtractionStatus;

    const PROFILE_HTML: &str = r#"<html><body>
      <h1 class="vcard-names"><span class="p-name">Alice Doe</span></h1>
      <div class="p-note">Systems programmer.</div>
      <span itemprop="homeLocation">Lisbon</span>
      <span itemprop="worksFor">Acme</span>
      <div class="vcard-details">
        <a href="https://twitter.com/alicedoe">@alicedoe</a>
      </div>
      <div class="js-profile-editable-area">
        <a href="?tab=followers"><span class="text-bold">120</span></a>
        <a href="?tab=following"><span class="text-bold">80</span></a>
      </div>
      <div class="pinned-item-list-item">
        <span class="repo">radio-toolkit</span>
        <p class="pinned-item-desc">SDR utilities in Rust</p>
        <span itemprop="programmingLanguage">Rust</span>
        <a href="/alice/radio-toolkit/stargazers">342</a>
      </div>
    </body></html>"#;

    #[test]
    fn test_parse_profile_fields() {
        let record = parse_profile(PROFILE_HTML, "alice", 10).unwrap();

        assert_eq!(record.header.display_name.as_deref(), Some("Alice Doe"));
        assert_eq!(record.header.bio.as_deref(), Some("Systems programmer."));
        assert_eq!(record.header.location.as_deref(), Some("Lisbon"));
        assert_eq!(record.header.company.as_deref(), Some("Acme"));
        assert_eq!(record.header.social_links.len(), 1);
        assert_eq!(record.header.social_links[0].platform, Some("twitter"));
        assert_eq!(record.header.stats[0].value, "120");
    }

    #[test]
    fn test_parse_profile_pinned_repos() {
        let record = parse_profile(PROFILE_HTML, "alice", 10).unwrap();

        assert_eq!(record.items.len(), 1);
        let repo = &record.items[0];
        assert_eq!(repo.title.as_deref(), Some("radio-toolkit"));
        assert_eq!(
            repo.url.as_deref(),
            Some("https://github.com/alice/radio-toolkit")
        );
        assert_eq!(repo.text.as_deref(), Some("SDR utilities in Rust"));
        assert_eq!(repo.context.as_deref(), Some("Rust"));
        assert_eq!(repo.stats[0].value, "342");
    }

    #[test]
    fn test_empty_page_is_partial() {
        let record = parse_profile("<html><body></body></html>", "alice", 10).unwrap();
        assert!(matches!(record.status, ExtractionStatus::Partial { .. }));
    }

    #[test]
    fn test_parse_repo_list() {
        let html = r#"<ul id="user-repositories-list">
          <li>
            <a itemprop="name codeRepository" href="/alice/parser">parser</a>
            <p itemprop="description">A tolerant HTML parser</p>
          </li>
          <li>
            <a itemprop="name codeRepository" href="/alice/cli">cli</a>
          </li>
        </ul>"#;

        let items = parse_repo_list(html, 10).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url.as_deref(), Some("https://github.com/alice/parser"));
        assert_eq!(items[0].text.as_deref(), Some("A tolerant HTML parser"));
        assert_eq!(items[1].text, None);
    }

    #[test]
    fn test_repo_limit() {
        let mut html = String::from(r#"<ul id="user-repositories-list">"#);
        for i in 0..6 {
            html.push_str(&format!(
                r#"<li><a itemprop="name codeRepository" href="/a/r{i}">r{i}</a></li>"#
            ));
        }
        html.push_str("</ul>");

        let items = parse_repo_list(&html, 2).unwrap();
        assert_eq!(items.len(), 2);
    }
}
