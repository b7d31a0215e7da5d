//! Sequential mirror fallback.
//!
//! Privacy-frontend mirrors are independently and frequently unavailable;
//! trying them in order bounds worst-case latency at mirrors x timeout
//! while hiding the mirror list from callers entirely.

use crate::scraping::error::ScrapeError;
use crate::scraping::fetch::HttpFetch;

/// A usable page obtained from one of a platform's mirrors.
#[derive(Clone, Debug)]
pub struct MirrorPage {
    /// Response body from the winning mirror.
    pub body: String,
    /// Base URL of the mirror that answered.
    pub mirror: String,
    /// Number of mirrors that failed transiently before this one.
    pub transient_attempts: usize,
}

/// Try each mirror in order until one yields a definitive outcome.
///
/// HTTP 200 is usable and stops the loop. HTTP 404 is a definitive
/// not-found and also stops the loop. Everything else (timeout, transport
/// failure, any other status) advances to the next mirror.
///
/// # Errors
/// Returns `NotFound` on a 404, or `MirrorsExhausted` when every mirror
/// failed transiently.
pub async fn fetch_from_mirrors(
    fetch: &dyn HttpFetch,
    platform: &str,
    target: &str,
    mirrors: &[String],
    path: &str,
) -> Result<MirrorPage, ScrapeError> {
    let mut transient_attempts = 0;

    for mirror in mirrors {
        let url = format!("{mirror}{path}");

        match fetch.get(&url).await {
            Ok(page) if page.status == 200 => {
                tracing::debug!(platform, mirror, transient_attempts, "mirror answered");
                return Ok(MirrorPage {
                    body: page.body,
                    mirror: mirror.clone(),
                    transient_attempts,
                });
            }
            Ok(page) if page.status == 404 => {
                return Err(ScrapeError::NotFound(target.to_string()));
            }
            Ok(page) => {
                tracing::debug!(platform, mirror, status = page.status, "mirror unusable");
                transient_attempts += 1;
            }
            Err(e) => {
                tracing::debug!(platform, mirror, error = %e, "mirror failed");
                transient_attempts += 1;
            }
        }
    }

    Err(ScrapeError::MirrorsExhausted {
        platform: platform.to_string(),
        attempts: transient_attempts,
    })
}
