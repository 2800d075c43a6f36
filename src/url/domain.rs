use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a seed page URL
///
/// Only absolute `http`/`https` URLs with a host are accepted. This is the one
/// input check whose failure is reported to the caller.
///
/// # Examples
///
/// ```
/// use site_harvest::url::parse_seed;
///
/// let seed = parse_seed("https://example.com/docs/intro").unwrap();
/// assert_eq!(seed.host_str(), Some("example.com"));
/// assert!(parse_seed("ftp://example.com/").is_err());
/// assert!(parse_seed("not a url").is_err());
/// ```
pub fn parse_seed(seed: &str) -> UrlResult<Url> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(seed.to_string()));
    }

    Ok(url)
}

/// Extracts the lowercase hostname from a URL
///
/// The port is not part of the hostname.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the origin (`scheme://host[:port]`) of a URL, without a trailing slash
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Checks whether a URL string parses and has exactly the given hostname
///
/// Subdomains do not match: `blog.example.com` is not `example.com`.
pub fn is_same_host(url: &str, hostname: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| extract_domain(&u))
        .is_some_and(|host| host.eq_ignore_ascii_case(hostname))
}
