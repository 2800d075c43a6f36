//! Robots.txt parser implementation
//!
//! This module wraps the robotstxt crate: the Google-compatible parser is used
//! both for `Sitemap:` directive discovery and for allow/deny checks.

use robotstxt::{parse_robotstxt, DefaultMatcher, RobotsParseHandler};

/// Parsed robots.txt data
///
/// Holds the raw content; directives are evaluated on demand.
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all, no sitemaps)
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Creates an empty ParsedRobots that allows everything
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns true if no robots.txt content is held
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Returns every URL declared by a `Sitemap:` directive, in file order
    ///
    /// Directive names match case-insensitively and may appear anywhere in the
    /// file, independent of user-agent groups. Duplicates are kept; callers
    /// collect them into a set.
    pub fn sitemaps(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }

        let mut collector = SitemapCollector::default();
        parse_robotstxt(&self.content, &mut collector);
        collector.sitemaps
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent product token (e.g. "SiteHarvest")
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

/// Parse callback that only records sitemap directives
#[derive(Default)]
struct SitemapCollector {
    sitemaps: Vec<String>,
}

impl RobotsParseHandler for SitemapCollector {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, _user_agent: &str) {}

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_sitemap(&mut self, line_num: u32, value: &str) {
        // First whitespace-delimited token only
        match value.split_whitespace().next() {
            Some(url) => self.sitemaps.push(url.to_string()),
            None => tracing::trace!("Empty sitemap directive on robots.txt line {}", line_num),
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}
