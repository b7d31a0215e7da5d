//! Evidence store.
//!
//! SQLite-backed persistence for subjects, their discovered accounts, and
//! recorded facts. All access goes through `tokio_rusqlite` `conn.call`
//! closures; timestamps are RFC 3339 text. Subject resolution is
//! match-or-create so tools can refer to subjects by approximate name.

pub mod dossier;
pub mod error;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use types::{Account, Confidence, Fact, FactCategory, Subject};

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

/// Input for saving a discovered account.
#[derive(Clone, Debug, Default)]
pub struct NewAccount {
    /// Lowercase platform tag.
    pub platform: String,
    /// Username on the platform.
    pub username: String,
    /// Canonical profile URL; the per-subject dedup key when present.
    pub profile_url: Option<String>,
    /// Display name, when known.
    pub display_name: Option<String>,
    /// Bio text, when known.
    pub bio: Option<String>,
    /// Follower count as the platform reports it, free text.
    pub followers: Option<String>,
    /// Whether the platform marks the account verified.
    pub verified: bool,
    /// Free-form researcher notes.
    pub notes: Option<String>,
}

/// Input for recording a fact.
#[derive(Clone, Debug)]
pub struct NewFact {
    /// Fact category.
    pub category: FactCategory,
    /// The fact itself.
    pub content: String,
    /// Where the fact came from.
    pub source_url: Option<String>,
    /// Researcher's confidence.
    pub confidence: Confidence,
}

/// Outcome of saving an account.
#[derive(Clone, Debug)]
pub enum AccountSaved {
    /// Inserted; carries the subject's new account total.
    Saved {
        /// Resolved subject name.
        subject: String,
        /// Accounts now on record for the subject.
        total_accounts: usize,
    },
    /// The subject already had an account with this profile URL.
    AlreadySaved {
        /// Resolved subject name.
        subject: String,
    },
}

/// Outcome of recording a fact.
#[derive(Clone, Debug)]
pub struct FactSaved {
    /// Resolved subject name.
    pub subject: String,
    /// Facts now on record for the subject.
    pub total_facts: usize,
}

/// Outcome of listing a subject's accounts.
#[derive(Clone, Debug)]
pub enum AccountListing {
    /// No subject matched the name.
    NoSubject,
    /// The subject exists but has no accounts yet.
    NoAccounts {
        /// Resolved subject name.
        subject: String,
    },
    /// Accounts on record, ordered by platform.
    Accounts {
        /// Resolved subject name.
        subject: String,
        /// The accounts.
        accounts: Vec<Account>,
    },
}

/// Outcome of a purge request.
#[derive(Clone, Debug)]
pub enum PurgeOutcome {
    /// The caller did not confirm; nothing was touched.
    NotConfirmed,
    /// No subject matched the name.
    NoSubject,
    /// Everything about the subject was deleted.
    Purged {
        /// Name of the deleted subject.
        subject: String,
        /// Accounts removed.
        accounts_deleted: usize,
        /// Facts removed.
        facts_deleted: usize,
    },
}

/// SQLite evidence store.
pub struct EvidenceStore {
    conn: Connection,
}

impl EvidenceStore {
    /// Open a store at a filesystem path, creating the schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref()).await?;
        Self::init(conn).await
    }

    /// Open an in-memory store. Used in tests.
    ///
    /// # Errors
    /// Returns an error if the database cannot be created.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> StoreResult<Self> {
        conn.call(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS subjects (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    aliases TEXT,
                    notes TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS accounts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    subject_id INTEGER NOT NULL REFERENCES subjects(id),
                    platform TEXT NOT NULL,
                    username TEXT NOT NULL,
                    profile_url TEXT,
                    display_name TEXT,
                    bio TEXT,
                    followers TEXT,
                    verified INTEGER NOT NULL DEFAULT 0,
                    notes TEXT,
                    discovered_at TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS facts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    subject_id INTEGER NOT NULL REFERENCES subjects(id),
                    category TEXT NOT NULL,
                    content TEXT NOT NULL,
                    source_url TEXT,
                    confidence TEXT NOT NULL,
                    recorded_at TEXT NOT NULL
                );",
            )?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Resolve a subject by approximate name, creating it when no match
    /// exists. Matching is a case-insensitive substring check; the oldest
    /// matching subject wins. Matched subjects get `updated_at` touched.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn resolve_subject(&self, name: &str) -> StoreResult<Subject> {
        let name = name.trim().to_string();
        let now = Utc::now().to_rfc3339();

        let subject = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let existing = tx
                    .query_row(
                        "SELECT id, name, aliases, notes, created_at, updated_at FROM subjects
                         WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%'
                         ORDER BY id LIMIT 1",
                        rusqlite::params![name],
                        |row| {
                            Ok(Subject {
                                id: row.get(0)?,
                                name: row.get(1)?,
                                aliases: row.get(2)?,
                                notes: row.get(3)?,
                                created_at: row.get(4)?,
                                updated_at: row.get(5)?,
                            })
                        },
                    )
                    .optional()?;

                let subject = if let Some(mut subject) = existing {
                    tx.execute(
                        "UPDATE subjects SET updated_at = ?1 WHERE id = ?2",
                        rusqlite::params![now, subject.id],
                    )?;
                    subject.updated_at = now;
                    subject
                } else {
                    tx.execute(
                        "INSERT INTO subjects (name, created_at, updated_at)
                         VALUES (?1, ?2, ?2)",
                        rusqlite::params![name, now],
                    )?;
                    let id = tx.last_insert_rowid();
                    Subject {
                        id,
                        name,
                        aliases: None,
                        notes: None,
                        created_at: now.clone(),
                        updated_at: now,
                    }
                };

                tx.commit()?;
                Ok(subject)
            })
            .await?;

        tracing::debug!(subject = %subject.name, id = subject.id, "resolved subject");
        Ok(subject)
    }

    /// Find a subject by approximate name without creating one.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn find_subject(&self, name: &str) -> StoreResult<Option<Subject>> {
        let name = name.trim().to_string();

        let subject = self
            .conn
            .call(move |conn| {
                let found = conn
                    .query_row(
                        "SELECT id, name, aliases, notes, created_at, updated_at FROM subjects
                         WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%'
                         ORDER BY id LIMIT 1",
                        rusqlite::params![name],
                        |row| {
                            Ok(Subject {
                                id: row.get(0)?,
                                name: row.get(1)?,
                                aliases: row.get(2)?,
                                notes: row.get(3)?,
                                created_at: row.get(4)?,
                                updated_at: row.get(5)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(found)
            })
            .await?;

        Ok(subject)
    }

    /// Save a discovered account under a subject, resolving (or creating)
    /// the subject first. Saving the same profile URL twice for one
    /// subject is a no-op; the same URL under a different subject is a
    /// separate row.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn save_account(
        &self,
        subject_name: &str,
        account: NewAccount,
    ) -> StoreResult<AccountSaved> {
        let subject = self.resolve_subject(subject_name).await?;
        let subject_id = subject.id;
        let subject_name = subject.name.clone();
        let now = Utc::now().to_rfc3339();

        let outcome = self
            .conn
            .call(move |conn| {
                if let Some(url) = &account.profile_url {
                    let duplicate: i64 = conn.query_row(
                        "SELECT COUNT(*) FROM accounts
                         WHERE subject_id = ?1 AND profile_url = ?2",
                        rusqlite::params![subject_id, url],
                        |row| row.get(0),
                    )?;
                    if duplicate > 0 {
                        return Ok(AccountSaved::AlreadySaved {
                            subject: subject_name,
                        });
                    }
                }

                conn.execute(
                    "INSERT INTO accounts
                     (subject_id, platform, username, profile_url, display_name, bio,
                      followers, verified, notes, discovered_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    rusqlite::params![
                        subject_id,
                        account.platform,
                        account.username,
                        account.profile_url,
                        account.display_name,
                        account.bio,
                        account.followers,
                        account.verified,
                        account.notes,
                        now
                    ],
                )?;

                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM accounts WHERE subject_id = ?1",
                    rusqlite::params![subject_id],
                    |row| row.get(0),
                )?;

                Ok(AccountSaved::Saved {
                    subject: subject_name,
                    total_accounts: usize::try_from(total).unwrap_or(0),
                })
            })
            .await?;

        Ok(outcome)
    }

    /// Record a fact about a subject, resolving (or creating) the subject
    /// first. Facts always accumulate; duplicates are allowed.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn save_fact(&self, subject_name: &str, fact: NewFact) -> StoreResult<FactSaved> {
        let subject = self.resolve_subject(subject_name).await?;
        let subject_id = subject.id;
        let subject_name = subject.name.clone();
        let now = Utc::now().to_rfc3339();

        let total = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO facts
                     (subject_id, category, content, source_url, confidence, recorded_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![
                        subject_id,
                        fact.category.as_str(),
                        fact.content,
                        fact.source_url,
                        fact.confidence.as_str(),
                        now
                    ],
                )?;

                let total: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM facts WHERE subject_id = ?1",
                    rusqlite::params![subject_id],
                    |row| row.get(0),
                )?;
                Ok(usize::try_from(total).unwrap_or(0))
            })
            .await?;

        Ok(FactSaved {
            subject: subject_name,
            total_facts: total,
        })
    }

    /// List a subject's accounts, ordered by platform. Does not create
    /// the subject.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn list_accounts(&self, name: &str) -> StoreResult<AccountListing> {
        let Some(subject) = self.find_subject(name).await? else {
            return Ok(AccountListing::NoSubject);
        };

        let accounts = self.accounts_for(subject.id).await?;
        if accounts.is_empty() {
            return Ok(AccountListing::NoAccounts {
                subject: subject.name,
            });
        }

        Ok(AccountListing::Accounts {
            subject: subject.name,
            accounts,
        })
    }

    /// All accounts for a subject id, ordered by platform.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn accounts_for(&self, subject_id: i64) -> StoreResult<Vec<Account>> {
        let accounts = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, subject_id, platform, username, profile_url,
                            display_name, bio, followers, verified, notes, discovered_at
                     FROM accounts WHERE subject_id = ?1
                     ORDER BY platform, id",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![subject_id], |row| {
                        Ok(Account {
                            id: row.get(0)?,
                            subject_id: row.get(1)?,
                            platform: row.get(2)?,
                            username: row.get(3)?,
                            profile_url: row.get(4)?,
                            display_name: row.get(5)?,
                            bio: row.get(6)?,
                            followers: row.get(7)?,
                            verified: row.get(8)?,
                            notes: row.get(9)?,
                            discovered_at: row.get(10)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(accounts)
    }

    /// All facts for a subject id, in insertion order. Grouping and
    /// ordering for presentation happen in the dossier assembler.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn facts_for(&self, subject_id: i64) -> StoreResult<Vec<Fact>> {
        let facts = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, subject_id, category, content, source_url, confidence, recorded_at
                     FROM facts WHERE subject_id = ?1 ORDER BY id",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![subject_id], |row| {
                        let category: String = row.get(2)?;
                        let confidence: String = row.get(5)?;
                        Ok(Fact {
                            id: row.get(0)?,
                            subject_id: row.get(1)?,
                            category: FactCategory::parse(&category)
                                .unwrap_or(FactCategory::Other),
                            content: row.get(3)?,
                            source_url: row.get(4)?,
                            confidence: Confidence::parse(&confidence).unwrap_or_default(),
                            recorded_at: row.get(6)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        Ok(facts)
    }

    /// Delete a subject and everything recorded about it. Requires an
    /// explicit confirmation flag; without it nothing is touched.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    pub async fn purge_subject(&self, name: &str, confirm: bool) -> StoreResult<PurgeOutcome> {
        if !confirm {
            return Ok(PurgeOutcome::NotConfirmed);
        }

        let Some(subject) = self.find_subject(name).await? else {
            return Ok(PurgeOutcome::NoSubject);
        };
        let subject_id = subject.id;
        let subject_name = subject.name.clone();

        let (accounts_deleted, facts_deleted) = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let accounts = tx.execute(
                    "DELETE FROM accounts WHERE subject_id = ?1",
                    rusqlite::params![subject_id],
                )?;
                let facts = tx.execute(
                    "DELETE FROM facts WHERE subject_id = ?1",
                    rusqlite::params![subject_id],
                )?;
                tx.execute(
                    "DELETE FROM subjects WHERE id = ?1",
                    rusqlite::params![subject_id],
                )?;
                tx.commit()?;
                Ok((accounts, facts))
            })
            .await?;

        tracing::warn!(subject = %subject_name, accounts_deleted, facts_deleted, "subject purged");

        Ok(PurgeOutcome::Purged {
            subject: subject_name,
            accounts_deleted,
            facts_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github_account(username: &str) -> NewAccount {
        NewAccount {
            platform: "github".to_string(),
            username: username.to_string(),
            profile_url: Some(format!("https://github.com/{username}")),
            ..NewAccount::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_creates_then_matches_substring() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        let created = store.resolve_subject("John Smith").await.unwrap();
        let matched = store.resolve_subject("john").await.unwrap();

        assert_eq!(created.id, matched.id);
        assert_eq!(matched.name, "John Smith");
    }

    #[tokio::test]
    async fn test_resolve_distinct_names_distinct_subjects() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        let a = store.resolve_subject("Alice Doe").await.unwrap();
        let b = store.resolve_subject("Bob Ray").await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_save_account_dedups_per_subject() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        let first = store
            .save_account("Alice Doe", github_account("alicedoe"))
            .await
            .unwrap();
        assert!(matches!(
            first,
            AccountSaved::Saved {
                total_accounts: 1,
                ..
            }
        ));

        let second = store
            .save_account("Alice Doe", github_account("alicedoe"))
            .await
            .unwrap();
        assert!(matches!(second, AccountSaved::AlreadySaved { .. }));

        // Same URL under a different subject is a fresh row.
        let other = store
            .save_account("Bob Ray", github_account("alicedoe"))
            .await
            .unwrap();
        assert!(matches!(
            other,
            AccountSaved::Saved {
                total_accounts: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_account_followers_and_verified_roundtrip() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        store
            .save_account(
                "Alice Doe",
                NewAccount {
                    platform: "twitter".to_string(),
                    username: "alicedoe".to_string(),
                    profile_url: Some("https://x.com/alicedoe".to_string()),
                    followers: Some("12.4K".to_string()),
                    verified: true,
                    ..NewAccount::default()
                },
            )
            .await
            .unwrap();

        let subject = store.find_subject("alice").await.unwrap().unwrap();
        let accounts = store.accounts_for(subject.id).await.unwrap();
        assert_eq!(accounts[0].followers.as_deref(), Some("12.4K"));
        assert!(accounts[0].verified);
    }

    #[tokio::test]
    async fn test_subject_aliases_and_notes_columns() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        // Tools never populate these yet; they must still round-trip.
        let created = store.resolve_subject("Alice Doe").await.unwrap();
        assert_eq!(created.aliases, None);
        assert_eq!(created.notes, None);

        store
            .conn
            .call(|conn| {
                conn.execute(
                    "UPDATE subjects SET aliases = ?1, notes = ?2 WHERE id = 1",
                    rusqlite::params!["A. Doe", "met at conference"],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let found = store.find_subject("alice").await.unwrap().unwrap();
        assert_eq!(found.aliases.as_deref(), Some("A. Doe"));
        assert_eq!(found.notes.as_deref(), Some("met at conference"));
    }

    #[tokio::test]
    async fn test_facts_accumulate_including_duplicates() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        let fact = NewFact {
            category: FactCategory::Professional,
            content: "Works at Acme".to_string(),
            source_url: Some("https://example.com/team".to_string()),
            confidence: Confidence::High,
        };

        let first = store.save_fact("Alice", fact.clone()).await.unwrap();
        let second = store.save_fact("Alice", fact).await.unwrap();

        assert_eq!(first.total_facts, 1);
        assert_eq!(second.total_facts, 2);
    }

    #[tokio::test]
    async fn test_list_accounts_outcomes() {
        let store = EvidenceStore::open_in_memory().await.unwrap();

        assert!(matches!(
            store.list_accounts("ghost").await.unwrap(),
            AccountListing::NoSubject
        ));

        store.resolve_subject("Alice Doe").await.unwrap();
        assert!(matches!(
            store.list_accounts("alice").await.unwrap(),
            AccountListing::NoAccounts { .. }
        ));

        store
            .save_account(
                "Alice Doe",
                NewAccount {
                    platform: "twitter".to_string(),
                    username: "alicedoe".to_string(),
                    profile_url: Some("https://x.com/alicedoe".to_string()),
                    ..NewAccount::default()
                },
            )
            .await
            .unwrap();
        store
            .save_account("Alice Doe", github_account("alicedoe"))
            .await
            .unwrap();

        match store.list_accounts("alice").await.unwrap() {
            AccountListing::Accounts { accounts, .. } => {
                // ordered by platform
                assert_eq!(accounts[0].platform, "github");
                assert_eq!(accounts[1].platform, "twitter");
            }
            other => panic!("expected accounts, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_purge_requires_confirmation() {
        let store = EvidenceStore::open_in_memory().await.unwrap();
        store.resolve_subject("Alice Doe").await.unwrap();

        assert!(matches!(
            store.purge_subject("alice", false).await.unwrap(),
            PurgeOutcome::NotConfirmed
        ));
        assert!(store.find_subject("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_removes_everything() {
        let store = EvidenceStore::open_in_memory().await.unwrap();
        store
            .save_account("Alice Doe", github_account("alicedoe"))
            .await
            .unwrap();
        store
            .save_fact(
                "Alice Doe",
                NewFact {
                    category: FactCategory::Location,
                    content: "Lisbon".to_string(),
                    source_url: None,
                    confidence: Confidence::Medium,
                },
            )
            .await
            .unwrap();

        match store.purge_subject("alice", true).await.unwrap() {
            PurgeOutcome::Purged {
                accounts_deleted,
                facts_deleted,
                ..
            } => {
                assert_eq!(accounts_deleted, 1);
                assert_eq!(facts_deleted, 1);
            }
            other => panic!("expected purge, got {other:?}"),
        }

        assert!(store.find_subject("alice").await.unwrap().is_none());
        assert!(matches!(
            store.purge_subject("alice", true).await.unwrap(),
            PurgeOutcome::NoSubject
        ));
    }
}
