//! Source retrieval.
//!
//! The pipeline only needs "text or nothing" from a URL; the [`Fetch`]
//! trait is the seam that keeps the pipeline testable without a network.
//! Failures are logged and reported as absence so a dead source never
//! aborts the batch.

use std::time::Duration;

/// Some upstream hosts refuse default library user agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:68.0) Gecko/20100101 Firefox/68.0";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieval seam for the pipeline.
pub trait Fetch {
    /// Fetch raw text from `url`. `None` means the source contributes
    /// nothing this run (unreachable, non-2xx, undecodable, or empty).
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Blocking HTTP fetcher; sources are retrieved sequentially.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        if url.is_empty() {
            return None;
        }

        log::info!("fetching {url}");

        let response = match self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("fetch failed for {url}: {e}");
                return None;
            }
        };

        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                log::warn!("failed to decode body from {url}: {e}");
                return None;
            }
        };

        let cleaned = clean_body(&body);
        if cleaned.trim().is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }
}

/// Normalize line endings and trim each line before the body enters the
/// normalizer.
pub fn clean_body(body: &str) -> String {
    body.replace("\r\n", "\n")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_body_normalizes_endings_and_trims() {
        let raw = "  a.com \r\n\tb.com\t\r\nc.com";
        assert_eq!(clean_body(raw), "a.com\nb.com\nc.com");
    }

    #[test]
    fn test_clean_body_preserves_blank_lines() {
        // Blank lines are the normalizer's concern, not the fetcher's.
        assert_eq!(clean_body("a.com\r\n\r\nb.com"), "a.com\n\nb.com");
    }
}
