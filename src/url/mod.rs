//! URL handling module for Site-Harvest
//!
//! This module provides seed parsing, hostname/origin helpers, link
//! resolution, and the normalization used for de-duplication keys.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, is_same_host, origin_of, parse_seed};
pub use normalize::{is_probably_html_path, normalize_url, resolve_link};
