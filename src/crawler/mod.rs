//! Crawler module for site discovery and page scraping
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with per-attempt timeout and retry
//! - Crawl-target discovery from robots.txt, sitemaps and the homepage
//! - Readable-content extraction from HTML
//! - Bounded-concurrency scrape orchestration

mod discovery;
mod extractor;
mod fetcher;
mod orchestrator;

pub use discovery::{collect_homepage_links, same_host_unique, Discoverer};
pub use extractor::{aggregate_text, extract, is_binary_content_type, normalize_text, ScrapedDocument};
pub use fetcher::{build_http_client, fetch_document, fetch_page, FetchFailure, FetchedBody, PageOutcome};
pub use orchestrator::{scrape_worker_count, ScrapeEvent, ScrapeOrchestrator, ScrapeOutcome, ScrapeReport};

use crate::config::{validate, HarvestConfig};
use crate::url::{extract_domain, parse_seed};
use crate::{HarvestError, Result, UrlError};
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;

/// Discover-then-scrape pipeline for one seed URL
///
/// Both phases share one HTTP client, so connection pooling and the
/// configured user agent apply to every request.
#[derive(Debug, Clone)]
pub struct Harvester {
    discoverer: Discoverer,
    orchestrator: ScrapeOrchestrator,
}

impl Harvester {
    /// Creates a harvester, building its HTTP client from the configuration
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the client cannot be built.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        validate(&config)?;
        let client = build_http_client(&config.user_agent, config.scrape.fetch_timeout())?;
        Ok(Self::with_client(client, &config))
    }

    /// Creates a harvester around an existing client
    pub fn with_client(client: Client, config: &HarvestConfig) -> Self {
        Self {
            discoverer: Discoverer::new(client.clone(), config),
            orchestrator: ScrapeOrchestrator::new(client, config.scrape.clone()),
        }
    }

    /// Runs discovery only
    pub async fn discover(&self, seed: &str) -> Result<Vec<String>> {
        self.discoverer.discover(seed).await
    }

    /// Scrapes the given URLs, keeping pages served from `hostname`
    pub async fn scrape(
        &self,
        urls: Vec<String>,
        hostname: &str,
        events: Option<UnboundedSender<ScrapeEvent>>,
    ) -> ScrapeReport {
        self.orchestrator
            .scrape_all_with_report(urls, hostname, events)
            .await
    }

    /// Discovers the seed's pages and scrapes them
    ///
    /// # Arguments
    ///
    /// * `seed` - Any page URL on the target site
    /// * `events` - Optional observer for progress and documents
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - Documents in completion order plus outcome counts
    /// * `Err(HarvestError::NothingDiscovered)` - Discovery found no pages
    /// * `Err(HarvestError)` - The seed is not a valid HTTP(S) URL
    pub async fn harvest(
        &self,
        seed: &str,
        events: Option<UnboundedSender<ScrapeEvent>>,
    ) -> Result<ScrapeReport> {
        let seed_url = parse_seed(seed)?;
        let hostname =
            extract_domain(&seed_url).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

        let urls = self.discover(seed).await?;
        if urls.is_empty() {
            return Err(HarvestError::NothingDiscovered {
                seed: seed.to_string(),
            });
        }

        Ok(self.scrape(urls, &hostname, events).await)
    }
}
