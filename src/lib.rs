//! Evidence collection engine for open-source person research.
//!
//! The crate gathers publicly visible traces of a named person from
//! social platforms, search, and arbitrary web pages, normalizes them
//! into canonical records, and accumulates reviewed findings in a SQLite
//! evidence store that can be assembled into a dossier. Synthesis and
//! any conversational loop live outside this crate; every tool is a
//! plain async request/response method.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![allow(clippy::module_name_repetitions)]

pub mod scraping;
pub mod search;
pub mod store;
pub mod tools;

pub use scraping::{ScrapeClient, ScrapeConfig, ScrapeError};
pub use search::{SearchError, SearchProvider};
pub use store::{EvidenceStore, StoreError};
pub use tools::ResearchToolbox;

/// Initialize tracing from `RUST_LOG`, defaulting to `info`. Safe to call
/// more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
