//! Site-Harvest: sitemap-driven site discovery and readable-content scraping
//!
//! This crate discovers the crawlable pages of a web origin (robots.txt,
//! sitemaps, homepage links) and extracts normalized title, description and
//! main-content text from each page under a bounded worker pool.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No crawlable URLs discovered for {seed}")]
    NothingDiscovered { seed: String },

    #[error("Ingestion failed: {0}")]
    Ingest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    /// Classifies a reqwest error for the given URL
    pub fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            HarvestError::Timeout {
                url: url.to_string(),
            }
        } else {
            HarvestError::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Site-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::HarvestConfig;
pub use crawler::{
    extract, scrape_worker_count, Discoverer, Harvester, ScrapeEvent, ScrapeOrchestrator,
    ScrapedDocument,
};
pub use sitemap::{SitemapDocument, SitemapResolver};
