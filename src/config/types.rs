use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Harvest
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub discovery: DiscoveryConfig,
    pub scrape: ScrapeConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawl-target discovery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Conventional sitemap paths probed on every origin
    #[serde(rename = "default-sitemap-paths")]
    pub default_sitemap_paths: Vec<String>,

    /// Maximum sitemap-index nesting followed (the root sitemap is depth 0)
    #[serde(rename = "max-sitemap-depth")]
    pub max_sitemap_depth: u32,

    /// Maximum number of sitemap documents fetched per resolution
    #[serde(rename = "max-sitemaps")]
    pub max_sitemaps: usize,

    /// Maximum number of URLs taken from the homepage fallback
    #[serde(rename = "fallback-link-cap")]
    pub fallback_link_cap: usize,

    /// Drop discovered URLs disallowed by robots.txt for our agent
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_sitemap_paths: vec!["/sitemap.xml".to_string(), "/sitemap_index.xml".to_string()],
            max_sitemap_depth: 5,
            max_sitemaps: 1000,
            fallback_link_cap: 500,
            respect_robots: false,
        }
    }
}

/// Page scraping configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Per-attempt fetch timeout (milliseconds)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// Total fetch attempts per page, first try included
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Lower bound on concurrent workers
    #[serde(rename = "min-workers")]
    pub min_workers: usize,

    /// Hard cap on concurrent workers
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// One extra worker is added per this many URLs, between the bounds
    #[serde(rename = "urls-per-worker")]
    pub urls_per_worker: usize,
}

impl ScrapeConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 15_000,
            max_attempts: 2,
            min_workers: 4,
            max_workers: 8,
            urls_per_worker: 50,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub name: String,

    /// Version of the crawler
    pub version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "SiteHarvest".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}
