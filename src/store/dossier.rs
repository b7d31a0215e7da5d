//! Dossier assembly.
//!
//! Collates everything recorded about a subject into a single markdown
//! report: accounts ordered by platform, then facts grouped by category
//! with the most confident facts first. Pure collation; any narrative
//! synthesis happens outside the engine.

use std::fmt::Write as _;

use crate::store::error::StoreResult;
use crate::store::types::{Account, Fact, FactCategory};
use crate::store::EvidenceStore;

/// Outcome of assembling a dossier.
#[derive(Clone, Debug)]
pub enum DossierOutcome {
    /// No subject matched the name.
    NoSubject,
    /// The subject exists but nothing is recorded yet.
    NoData {
        /// Resolved subject name.
        subject: String,
    },
    /// The assembled report.
    Report(String),
}

/// Assemble a dossier for a subject by approximate name. Does not create
/// the subject.
///
/// # Errors
/// Returns an error if storage access fails.
pub async fn assemble(store: &EvidenceStore, name: &str) -> StoreResult<DossierOutcome> {
    let Some(subject) = store.find_subject(name).await? else {
        return Ok(DossierOutcome::NoSubject);
    };

    let accounts = store.accounts_for(subject.id).await?;
    let facts = store.facts_for(subject.id).await?;

    if accounts.is_empty() && facts.is_empty() {
        return Ok(DossierOutcome::NoData {
            subject: subject.name,
        });
    }

    let mut out = String::new();
    let _ = writeln!(out, "# Dossier: {}\n", subject.name);
    let _ = writeln!(out, "First recorded: {}", subject.created_at);
    let _ = writeln!(out, "Last updated: {}\n", subject.updated_at);

    render_accounts(&mut out, &accounts);
    render_facts(&mut out, &facts);

    Ok(DossierOutcome::Report(out))
}

fn render_accounts(out: &mut String, accounts: &[Account]) {
    let _ = writeln!(out, "## Accounts ({})\n", accounts.len());
    if accounts.is_empty() {
        let _ = writeln!(out, "No accounts on record.\n");
        return;
    }

    for account in accounts {
        let _ = write!(out, "- **{}**: {}", account.platform, account.username);
        if account.verified {
            let _ = write!(out, " (verified)");
        }
        if let Some(url) = &account.profile_url {
            let _ = write!(out, " ([{url}]({url}))");
        }
        out.push('\n');
        if let Some(display_name) = &account.display_name {
            let _ = writeln!(out, "  - Name: {display_name}");
        }
        if let Some(bio) = &account.bio {
            let _ = writeln!(out, "  - Bio: {bio}");
        }
        if let Some(followers) = &account.followers {
            let _ = writeln!(out, "  - Followers: {followers}");
        }
        if let Some(notes) = &account.notes {
            let _ = writeln!(out, "  - Notes: {notes}");
        }
    }
    out.push('\n');
}

fn render_facts(out: &mut String, facts: &[Fact]) {
    let _ = writeln!(out, "## Facts ({})\n", facts.len());
    if facts.is_empty() {
        let _ = writeln!(out, "No facts on record.\n");
        return;
    }

    for category in FactCategory::ALL {
        let mut section: Vec<&Fact> = facts.iter().filter(|f| f.category == category).collect();
        if section.is_empty() {
            continue;
        }
        // Most confident first; insertion order breaks ties.
        section.sort_by_key(|f| f.confidence.rank());

        let _ = writeln!(out, "### {}\n", category.heading());
        for fact in section {
            let source = fact.source_url.as_ref().map_or_else(
                || "(unsourced)".to_string(),
                |url| format!("(source: {url})"),
            );
            let _ = writeln!(
                out,
                "- {} {source} [{}]",
                fact.content,
                fact.confidence.as_str()
            );
        }
        out.push('\n');
    }
}
