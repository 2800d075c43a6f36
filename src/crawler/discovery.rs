//! Crawl-target discovery
//!
//! Turns a seed URL into the list of same-host pages to scrape:
//! 1. Read robots.txt for `Sitemap:` directives
//! 2. Add the conventional sitemap paths
//! 3. Resolve every candidate sitemap concurrently
//! 4. Keep same-host URLs, first occurrence wins
//! 5. Fall back to the homepage's links when sitemaps yield nothing

use crate::config::{DiscoveryConfig, HarvestConfig};
use crate::crawler::fetcher::fetch_document;
use crate::robots::{fetch_robots, ParsedRobots};
use crate::sitemap::SitemapResolver;
use crate::url::{extract_domain, is_probably_html_path, is_same_host, origin_of, parse_seed, resolve_link};
use crate::{HarvestError, UrlError};
use futures::future::join_all;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Discovers the crawlable pages of a seed's origin
#[derive(Debug, Clone)]
pub struct Discoverer {
    client: Client,
    resolver: SitemapResolver,
    config: DiscoveryConfig,
    agent: String,
}

impl Discoverer {
    /// Creates a discoverer sharing the given HTTP client
    pub fn new(client: Client, config: &HarvestConfig) -> Self {
        Self {
            resolver: SitemapResolver::new(client.clone(), &config.discovery),
            client,
            config: config.discovery.clone(),
            agent: config.user_agent.name.clone(),
        }
    }

    /// Discovers same-host page URLs for the seed's origin
    ///
    /// Network problems never fail discovery: an unreachable robots.txt,
    /// sitemap or homepage only shrinks the result, possibly to empty.
    ///
    /// # Errors
    ///
    /// Returns an error only when the seed is not an absolute HTTP(S) URL.
    pub async fn discover(&self, seed: &str) -> Result<Vec<String>, HarvestError> {
        let seed_url = parse_seed(seed)?;
        let hostname =
            extract_domain(&seed_url).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;
        let origin = origin_of(&seed_url);

        let robots = fetch_robots(&self.client, &origin).await;
        let candidates = self.sitemap_candidates(&origin, &robots);
        tracing::info!("Probing {} sitemap candidate(s) for {}", candidates.len(), origin);

        let resolved = join_all(candidates.iter().map(|c| self.resolver.resolve(c))).await;

        let mut found = Vec::new();
        for (candidate, result) in candidates.iter().zip(resolved) {
            match result {
                Ok(urls) => {
                    tracing::debug!("Sitemap {} listed {} URL(s)", candidate, urls.len());
                    found.extend(urls);
                }
                Err(e) => tracing::debug!("Sitemap candidate {} unavailable: {}", candidate, e),
            }
        }

        let mut urls = same_host_unique(found, &hostname);

        if urls.is_empty() {
            tracing::info!("No sitemap URLs for {}, falling back to homepage links", hostname);
            match self.homepage_links(&origin, &hostname).await {
                Ok(links) => urls = links,
                Err(e) => tracing::warn!("Homepage fallback failed for {}: {}", origin, e),
            }
        }

        if self.config.respect_robots {
            let before = urls.len();
            urls.retain(|url| robots.is_allowed(url, &self.agent));
            if urls.len() < before {
                tracing::info!("robots.txt disallows {} discovered URL(s)", before - urls.len());
            }
        }

        tracing::info!("Discovered {} URL(s) for {}", urls.len(), hostname);
        Ok(urls)
    }

    /// Builds the ordered, duplicate-free sitemap candidate list
    fn sitemap_candidates(&self, origin: &str, robots: &ParsedRobots) -> Vec<String> {
        let base = Url::parse(origin).ok();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for declared in robots.sitemaps() {
            // Relative Sitemap: values resolve against the origin
            let absolute = match base.as_ref().map(|b| b.join(&declared)) {
                Some(Ok(url)) => url.to_string(),
                _ => declared,
            };
            if seen.insert(absolute.clone()) {
                candidates.push(absolute);
            }
        }

        for path in &self.config.default_sitemap_paths {
            let candidate = format!("{}{}", origin, path);
            if seen.insert(candidate.clone()) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    /// Collects same-host page links from the origin's homepage
    async fn homepage_links(&self, origin: &str, hostname: &str) -> Result<Vec<String>, HarvestError> {
        let homepage = fetch_document(&self.client, &format!("{}/", origin)).await?;
        Ok(collect_homepage_links(
            &homepage.text(),
            &homepage.final_url,
            hostname,
            self.config.fallback_link_cap,
        ))
    }
}

/// Keeps URLs on exactly `hostname`, dropping repeats
///
/// The first occurrence of each URL keeps its position.
pub fn same_host_unique(urls: impl IntoIterator<Item = String>, hostname: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| is_same_host(url, hostname))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Extracts crawlable links from homepage HTML
///
/// Links are resolved against `base`, must land on `hostname` and must not
/// point at an obvious static asset. At most `cap` links are returned, in
/// document order.
pub fn collect_homepage_links(html: &str, base: &Url, hostname: &str, cap: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, base))
        .filter(|url| extract_domain(url).as_deref() == Some(hostname))
        .filter(|url| is_probably_html_path(url.path()))
        .map(|url| url.to_string())
        .filter(|url| seen.insert(url.clone()))
        .take(cap)
        .collect()
}
