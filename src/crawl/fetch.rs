// src/crawl/fetch.rs
// =============================================================================
// This module downloads pages for the crawler.
//
// The crawler never talks to reqwest directly. It only knows the `Fetch`
// trait: "give me the body of this URL and tell me where I ended up after
// redirects". That keeps the crawl logic testable with an in-memory site.
//
// Rust concepts:
// - Traits: Fetch is the seam between crawling and networking
// - async-trait: lets a trait have async methods
// - thiserror: derive Display/Error for our error enum
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client, StatusCode};
use thiserror::Error;
use url::Url;

/// A successfully downloaded page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw response body
    pub body: Vec<u8>,
    /// URL of the response after following redirects
    pub final_url: String,
}

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("response body is larger than {limit} bytes")]
    TooLarge { limit: usize },
}

#[async_trait]
pub trait Fetch: Send + Sync {
    /// Downloads `url`, following redirects.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

// Fetches pages over HTTP(S) with reqwest
//
// One client is reused for every request (connection pooling). Timeouts and
// the redirect limit are configured on the client, so a server that never
// answers can't stall the crawl forever. Bodies above `max_body_bytes` are
// rejected instead of being buffered.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(
        timeout: Duration,
        max_redirects: usize,
        max_body_bytes: usize,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(max_redirects))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }
}

// Appends `chunk` to `body` unless that would take it past `limit` bytes
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], limit: usize) -> Result<(), FetchError> {
    if body.len() + chunk.len() > limit {
        return Err(FetchError::TooLarge { limit });
    }
    body.extend_from_slice(chunk);
    Ok(())
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let mut response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        // Read the URL before consuming the response for its body
        let final_url = response.url().to_string();

        // Content-Length can be missing or wrong, so the chunk loop checks too
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(FetchError::TooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            append_capped(&mut body, &chunk, limit)?;
        }

        Ok(FetchedPage { body, final_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_fetcher() {
        assert!(HttpFetcher::new(Duration::from_secs(10), 10, 1024).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_any_request() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1), 0, 1024).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }

    #[test]
    fn test_status_error_message() {
        let error = FetchError::Status(StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "HTTP 404 Not Found");
    }

    #[test]
    fn test_body_up_to_the_limit_is_kept() {
        let mut body = Vec::new();
        append_capped(&mut body, b"hello ", 11).unwrap();
        append_capped(&mut body, b"world", 11).unwrap();
        assert_eq!(body, b"hello world");
    }

    #[test]
    fn test_body_over_the_limit_is_rejected() {
        let mut body = Vec::new();
        append_capped(&mut body, b"hello ", 8).unwrap();

        let result = append_capped(&mut body, b"world", 8);
        assert!(matches!(result, Err(FetchError::TooLarge { limit: 8 })));
        assert_eq!(body, b"hello ");
    }
}
