//! Robots.txt handling module
//!
//! robots.txt is read once per discovery call, for its `Sitemap:` directives
//! and (optionally) its Disallow rules. A missing or unreadable file is never
//! an error: it simply contributes nothing.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::fetch_document;
use reqwest::Client;

/// Fetches robots.txt for an origin
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - The origin, e.g. `https://example.com` (no trailing slash)
///
/// # Returns
///
/// The parsed robots.txt, or [`ParsedRobots::allow_all`] on any fetch failure
pub async fn fetch_robots(client: &Client, origin: &str) -> ParsedRobots {
    let robots_url = format!("{}/robots.txt", origin);
    tracing::debug!("Fetching robots.txt: {}", robots_url);

    match fetch_document(client, &robots_url).await {
        Ok(fetched) => ParsedRobots::from_content(&fetched.text()),
        Err(e) => {
            tracing::debug!("robots.txt unavailable for {}: {}", origin, e);
            ParsedRobots::allow_all()
        }
    }
}
