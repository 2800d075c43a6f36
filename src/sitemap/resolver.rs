//! Sitemap resolver
//!
//! Resolves a sitemap URL to a flat list of page URLs, following nested
//! sitemap indices level by level. Each level is fetched concurrently; a
//! visited set, a depth bound and a document budget stop cyclic or
//! pathological index graphs.

use crate::config::DiscoveryConfig;
use crate::crawler::fetch_document;
use crate::sitemap::parser::{decode_sitemap_body, parse_sitemap, SitemapDocument};
use crate::url::normalize_url;
use crate::Result;
use futures::future::join_all;
use reqwest::Client;
use std::collections::HashSet;

/// Recursive sitemap resolver
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
    max_depth: u32,
    max_sitemaps: usize,
}

impl SitemapResolver {
    /// Creates a resolver using the discovery limits from configuration
    pub fn new(client: Client, config: &DiscoveryConfig) -> Self {
        Self {
            client,
            max_depth: config.max_sitemap_depth,
            max_sitemaps: config.max_sitemaps,
        }
    }

    /// Resolves a sitemap URL to the page URLs it (transitively) lists
    ///
    /// # Errors
    ///
    /// Fails only when the given sitemap itself cannot be fetched (transport
    /// error or non-success status) or its URL is invalid. A body that is not
    /// well-formed XML yields an empty list. Failures of nested sitemaps are
    /// logged and contribute nothing.
    ///
    /// Result order follows resolution order and carries no meaning.
    pub async fn resolve(&self, sitemap_url: &str) -> Result<Vec<String>> {
        let root_key = normalize_url(sitemap_url)?;
        let mut visited = HashSet::from([root_key.to_string()]);
        let mut pages = Vec::new();

        let root = self.load(sitemap_url).await?;
        let mut level = self.expand(root, 0, &mut visited, &mut pages);
        let mut depth = 1;

        while !level.is_empty() {
            tracing::debug!("Resolving {} nested sitemap(s) at depth {}", level.len(), depth);

            let loaded = join_all(level.iter().map(|child| self.load(child))).await;

            let mut next = Vec::new();
            for (child, result) in level.iter().zip(loaded) {
                match result {
                    Ok(document) => {
                        next.extend(self.expand(document, depth, &mut visited, &mut pages))
                    }
                    Err(e) => tracing::warn!("Skipping nested sitemap {}: {}", child, e),
                }
            }

            level = next;
            depth += 1;
        }

        Ok(pages)
    }

    /// Fetches and parses one sitemap document
    async fn load(&self, url: &str) -> Result<SitemapDocument> {
        let fetched = fetch_document(&self.client, url).await?;

        let document = decode_sitemap_body(&fetched.body)
            .and_then(|text| parse_sitemap(&text))
            .unwrap_or_else(|| {
                tracing::debug!("Sitemap {} is not parseable XML, treating as empty", url);
                SitemapDocument::UrlSet(Vec::new())
            });

        tracing::debug!(
            "Loaded {} {} with {} location(s)",
            if document.is_index() { "sitemap index" } else { "URL set" },
            url,
            document.locations().len()
        );
        Ok(document)
    }

    /// Records the pages of a URL set, or returns the unvisited children of an
    /// index that may still be followed from `depth`
    fn expand(
        &self,
        document: SitemapDocument,
        depth: u32,
        visited: &mut HashSet<String>,
        pages: &mut Vec<String>,
    ) -> Vec<String> {
        let children = match document {
            SitemapDocument::UrlSet(locations) => {
                pages.extend(locations);
                return Vec::new();
            }
            SitemapDocument::Index(children) => children,
        };

        if depth >= self.max_depth {
            tracing::warn!(
                "Sitemap index depth limit ({}) reached, ignoring {} child sitemap(s)",
                self.max_depth,
                children.len()
            );
            return Vec::new();
        }

        let mut unvisited = Vec::new();
        for child in children {
            let key = match normalize_url(&child) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    tracing::debug!("Ignoring invalid child sitemap {}: {}", child, e);
                    continue;
                }
            };

            if visited.len() >= self.max_sitemaps {
                tracing::warn!(
                    "Sitemap budget ({}) exhausted, ignoring remaining child sitemaps",
                    self.max_sitemaps
                );
                break;
            }

            if visited.insert(key) {
                unvisited.push(child);
            } else {
                tracing::debug!("Sitemap {} already visited, skipping", child);
            }
        }

        unvisited
    }
}
