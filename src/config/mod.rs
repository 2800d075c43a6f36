//! Configuration module for Site-Harvest
//!
//! The library is driven by a [`HarvestConfig`] value; `HarvestConfig::default()`
//! carries the stock crawl constants. The binary can also load overrides from a
//! TOML file.
//!
//! # Example
//!
//! ```no_run
//! use site_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Fetch timeout: {}ms", config.scrape.fetch_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{DiscoveryConfig, HarvestConfig, ScrapeConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
