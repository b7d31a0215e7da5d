//! Error types for the scraping module.

use thiserror::Error;

/// Errors that can occur during fetch and extraction operations.
///
/// The taxonomy distinguishes definitive outcomes (`NotFound`) from
/// transient ones (`Transient`, `MirrorsExhausted`) so callers can decide
/// whether a retry or a fallback tool makes sense.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Definitive platform response that the target does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A single attempt failed in a way that another endpoint might not.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Every mirror for a platform failed with a transient error.
    #[error("all {attempts} {platform} mirrors unavailable")]
    MirrorsExhausted {
        /// Platform whose mirror list was exhausted.
        platform: String,
        /// Number of mirrors attempted.
        attempts: usize,
    },

    /// Malformed input rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
        /// URL that produced the status.
        url: String,
    },

    /// HTTP request failed at the transport level.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTML parsing error.
    #[error("HTML parsing error: {0}")]
    HtmlParse(String),
}

impl ScrapeError {
    /// Check if this error should advance a mirror loop rather than stop it.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transient(_) | Self::HttpRequest(_) | Self::HttpStatus { .. }
        )
    }

    /// Check if this error is a definitive not-found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ScrapeError::Transient("timeout".into()).is_transient());
        assert!(
            ScrapeError::HttpStatus {
                status: 503,
                url: "https://a.example".into(),
            }
            .is_transient()
        );
        assert!(!ScrapeError::NotFound("user x".into()).is_transient());
        assert!(!ScrapeError::InvalidInput("bad url".into()).is_transient());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(ScrapeError::NotFound("user x".into()).is_not_found());
        assert!(
            !ScrapeError::MirrorsExhausted {
                platform: "twitter".into(),
                attempts: 3,
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_display_mirrors_exhausted() {
        let err = ScrapeError::MirrorsExhausted {
            platform: "twitter".into(),
            attempts: 4,
        };
        assert_eq!(err.to_string(), "all 4 twitter mirrors unavailable");
    }
}
