//! HTTP fetch layer.
//!
//! Network access goes through the [`HttpFetch`] trait so the mirror loop
//! and the tool layer can be exercised with scripted fakes.

use async_trait::async_trait;

use crate::scraping::config::ScrapeConfig;
use crate::scraping::error::ScrapeError;

/// A fetched page, status included.
///
/// Non-success statuses are data, not errors; classification happens in
/// the mirror loop or at the call site.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    /// URL that was requested.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl FetchedPage {
    /// Check for an HTTP 200.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Abstraction over HTTP GET.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Fetch a URL, returning the page for any HTTP status.
    ///
    /// # Errors
    /// Returns an error only for transport failures (timeout, connection
    /// refused, body decode), never for a non-200 status.
    async fn get(&self, url: &str) -> Result<FetchedPage, ScrapeError>;
}

/// Reqwest-backed fetcher with browser-like headers.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher from config.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

        let mut headers = HeaderMap::new();

        let ua = config.random_user_agent();
        if let Ok(ua_value) = HeaderValue::from_str(&ua) {
            headers.insert(USER_AGENT, ua_value);
        }

        if let Ok(accept) = HeaderValue::from_str(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ) {
            headers.insert(ACCEPT, accept);
        }

        if let Ok(lang) = HeaderValue::from_str("en-US,en;q=0.9") {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ScrapeError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for PageFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response.text().await?;

        tracing::debug!(url, status, bytes = body.len(), "fetched page");

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetched_page_status() {
        let page = FetchedPage {
            url: "https://a.example".into(),
            final_url: "https://a.example".into(),
            status: 200,
            body: String::new(),
        };
        assert!(page.is_ok());
    }

    #[test]
    fn test_build_fetcher() {
        let fetcher = PageFetcher::new(&ScrapeConfig::default());
        assert!(fetcher.is_ok());
    }
}
