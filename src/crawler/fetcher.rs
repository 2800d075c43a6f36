//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the shared HTTP client with a proper user agent string
//! - Plain document fetches for robots.txt and sitemaps
//! - Page fetches with timeout, retry and content-type screening
//! - Failure classification

use crate::config::UserAgentConfig;
use crate::crawler::extractor::is_binary_content_type;
use crate::HarvestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::fmt;
use std::time::Duration;
use url::Url;

/// A successfully fetched response body
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// Final URL after redirects
    pub final_url: Url,
    /// Content-Type header value (lowercased, empty if absent)
    pub content_type: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl FetchedBody {
    /// Returns the body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Why a page fetch produced no usable body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Every attempt hit the per-fetch timeout
    Timeout,
    /// Connection, TLS, redirect or other transport error
    Transport(String),
    /// Server answered with a non-success status
    HttpStatus(u16),
    /// Headers arrived but the body could not be read
    Body(String),
}

impl FetchFailure {
    /// Transport-level failures are retried; HTTP answers are not
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchFailure::Timeout | FetchFailure::Transport(_) | FetchFailure::Body(_)
        )
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::Transport(e) => write!(f, "transport error: {}", e),
            FetchFailure::HttpStatus(code) => write!(f, "HTTP {}", code),
            FetchFailure::Body(e) => write!(f, "body read error: {}", e),
        }
    }
}

/// Result of fetching one page
#[derive(Debug)]
pub enum PageOutcome {
    /// Text response to be parsed as HTML
    Html {
        /// Final URL after redirects
        final_url: Url,
        /// Decoded page body
        body: String,
    },

    /// Binary response (image, PDF, archive, octet-stream); never parsed
    Binary {
        /// Final URL after redirects
        final_url: Url,
        /// The Content-Type that caused the skip
        content_type: String,
    },

    /// No usable response after all attempts
    Failed(FetchFailure),
}

/// Builds the HTTP client shared by discovery and scraping
///
/// The client keeps no cookie store and sends no credentials. Compressed
/// responses are decoded transparently; redirects follow the default policy
/// so the final URL can be checked against the target host. `request_timeout`
/// bounds discovery requests; page fetches set their own per-attempt timeout.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::UserAgentConfig;
/// use site_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a document with a single GET (robots.txt, sitemaps, homepage)
///
/// Non-success statuses are reported as [`HarvestError::HttpStatus`].
pub async fn fetch_document(client: &Client, url: &str) -> Result<FetchedBody, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HarvestError::from_request(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let content_type = content_type_of(&response);
    let body = response
        .bytes()
        .await
        .map_err(|e| HarvestError::from_request(url, e))?
        .to_vec();

    Ok(FetchedBody {
        final_url,
        content_type,
        body,
    })
}

/// Fetches a page with timeout and retry
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Timeout | Retry until `max_attempts` is spent |
/// | Connection / transport error | Retry until `max_attempts` is spent |
/// | Body read error | Retry until `max_attempts` is spent |
/// | Non-2xx status | Immediate → Failed |
/// | Binary Content-Type | Immediate → Binary, body never read |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Per-attempt timeout, covering connect through body
/// * `max_attempts` - Total attempts, first try included
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
    max_attempts: u32,
) -> PageOutcome {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match fetch_page_once(client, url, timeout).await {
            PageOutcome::Failed(failure) if failure.is_retryable() && attempt < max_attempts => {
                tracing::debug!(
                    "Attempt {}/{} for {} failed ({}), retrying",
                    attempt,
                    max_attempts,
                    url,
                    failure
                );
            }
            outcome => return outcome,
        }
    }
}

async fn fetch_page_once(client: &Client, url: &str, timeout: Duration) -> PageOutcome {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => return PageOutcome::Failed(classify_error(&e)),
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} answered HTTP {}, body not parsed", url, status.as_u16());
        return PageOutcome::Failed(FetchFailure::HttpStatus(status.as_u16()));
    }

    let final_url = response.url().clone();
    let content_type = content_type_of(&response);
    if is_binary_content_type(&content_type) {
        return PageOutcome::Binary {
            final_url,
            content_type,
        };
    }

    match response.text().await {
        Ok(body) => PageOutcome::Html { final_url, body },
        Err(e) if e.is_timeout() => PageOutcome::Failed(FetchFailure::Timeout),
        Err(e) => PageOutcome::Failed(FetchFailure::Body(e.to_string())),
    }
}

fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Transport(error.to_string())
    }
}

fn content_type_of(response: &Response) -> String {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}
