//! Web scraping subsystem.
//!
//! Layered as fetch -> mirrors -> extractors -> render. The fetch layer
//! owns HTTP; the mirror loop owns fallback across privacy frontends;
//! extractors are pure functions over markup; rendering turns canonical
//! records into markdown. [`ScrapeClient`] bundles a config with a
//! fetcher so the tool layer holds a single handle.

pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod links;
pub mod mirrors;
pub mod page;
pub mod render;
pub mod types;

pub use config::ScrapeConfig;
pub use error::ScrapeError;
pub use fetch::{FetchedPage, HttpFetch, PageFetcher};
pub use links::{classify, classify_link, LinkCategory, LinkRecord};
pub use mirrors::{fetch_from_mirrors, MirrorPage};
pub use page::{read_page, PageExtract};
pub use render::render_record;
pub use types::{CanonicalRecord, ExtractionStatus, ProfileHeader, RecordItem, Stat};

/// A configured scraping client: config plus the HTTP fetcher behind it.
pub struct ScrapeClient {
    /// Scraping configuration.
    pub config: ScrapeConfig,
    fetcher: Box<dyn HttpFetch>,
}

impl ScrapeClient {
    /// Build a client from a config, constructing the default fetcher.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self {
            config,
            fetcher: Box::new(fetcher),
        })
    }

    /// Build a client with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, ScrapeError> {
        Self::new(ScrapeConfig::default())
    }

    /// Build a client around an existing fetcher. Used in tests to
    /// substitute a scripted fake.
    #[must_use]
    pub fn with_fetcher(config: ScrapeConfig, fetcher: Box<dyn HttpFetch>) -> Self {
        Self { config, fetcher }
    }

    /// The fetcher as a trait object.
    #[must_use]
    pub fn fetcher(&self) -> &dyn HttpFetch {
        self.fetcher.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_defaults() {
        let client = ScrapeClient::with_defaults();
        assert!(client.is_ok());
    }
}
