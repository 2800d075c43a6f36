//! Sitemap handling module
//!
//! Parsing of sitemap XML (index or URL set) and recursive resolution of a
//! sitemap URL into page URLs.

mod parser;
mod resolver;

pub use parser::{decode_sitemap_body, parse_sitemap, SitemapDocument};
pub use resolver::SitemapResolver;
