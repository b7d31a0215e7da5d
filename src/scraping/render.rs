//! Markdown rendering of canonical records.
//!
//! Extraction stays pure; this module turns a [`CanonicalRecord`] into the
//! link-heavy markdown block handed back to the agent loop. Every URL is
//! emitted as a clickable markdown link.

use std::fmt::Write as _;

use crate::scraping::types::{CanonicalRecord, ExtractionStatus};

/// Render a markdown link.
#[must_use]
pub fn md_link(label: &str, url: &str) -> String {
    format!("[{label}]({url})")
}

/// Render a canonical record as a markdown block.
#[must_use]
pub fn render_record(record: &CanonicalRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "**{}**", record.title);
    if let Some(url) = &record.profile_url {
        let display = url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let _ = writeln!(out, "Profile: {}", md_link(display, url));
    }
    out.push('\n');

    let header = &record.header;
    if let Some(name) = &header.display_name {
        let _ = writeln!(out, "**Name:** {name}");
    }
    if let Some(bio) = &header.bio {
        let _ = writeln!(out, "**Bio:** {bio}");
    }
    if let Some(location) = &header.location {
        let _ = writeln!(out, "**Location:** {location}");
    }
    if let Some(company) = &header.company {
        let _ = writeln!(out, "**Company:** {company}");
    }
    if let Some(website) = &header.website {
        let _ = writeln!(out, "**Website:** {}", md_link(website, website));
    }
    for link in &header.social_links {
        let _ = writeln!(out, "**Social:** {}", md_link(&link.label, &link.url));
    }
    if !header.stats.is_empty() {
        let _ = writeln!(out, "\n**Stats:**");
        for stat in &header.stats {
            let _ = writeln!(out, "  - {}: {}", stat.label, stat.value);
        }
    }

    if let ExtractionStatus::Partial { note } = &record.status {
        let _ = writeln!(out, "\n**Note:** {note}");
    }

    out.push('\n');

    if record.items.is_empty() {
        if record.status.is_complete() {
            let _ = writeln!(out, "No recent activity found.");
        }
        return out;
    }

    let _ = writeln!(
        out,
        "**{} ({} found):**\n",
        record.items_heading,
        record.items.len()
    );

    for (i, item) in record.items.iter().enumerate() {
        let n = i + 1;
        let kind = item
            .kind
            .as_ref()
            .map(|k| format!("[{k}] "))
            .unwrap_or_default();

        match (&item.title, &item.url) {
            (Some(title), Some(url)) => {
                let _ = writeln!(out, "**{n}.** {kind}**{}**", md_link(title, url));
            }
            (Some(title), None) => {
                let _ = writeln!(out, "**{n}.** {kind}**{title}**");
            }
            (None, _) => {
                let text = item.text.as_deref().unwrap_or("");
                let _ = writeln!(out, "**{n}.** {kind}{text}");
            }
        }

        if item.title.is_some() {
            if let Some(text) = &item.text {
                let _ = writeln!(out, "   {text}");
            }
        } else if let Some(url) = &item.url {
            let _ = writeln!(out, "   {}", md_link(url, url));
        }

        if let Some(context) = &item.context {
            let _ = writeln!(out, "   {context}");
        }
        if !item.stats.is_empty() {
            let parts: Vec<String> = item
                .stats
                .iter()
                .map(|s| format!("{} {}", s.label, s.value))
                .collect();
            let _ = writeln!(out, "   {}", parts.join(" | "));
        }
        if let Some(date) = &item.date {
            let _ = writeln!(out, "   {date}");
        }
        for link in &item.links {
            let _ = writeln!(out, "   link: {}", md_link(&link.url, &link.url));
        }
        out.push('\n');
    }

    out
}
