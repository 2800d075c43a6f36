use crate::{UrlError, UrlResult};
use url::Url;

/// Path extensions that never hold an HTML page
const STATIC_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "webp", "avif", "bmp", "svg", "ico",
    // styles and scripts
    "css", "js", "mjs", "map", "wasm",
    // documents and archives
    "pdf", "zip", "gz", "tgz", "tar", "rar", "7z", "exe", "dmg",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // media
    "mp4", "webm", "mov", "avi", "mp3", "wav", "ogg", "flac",
];

/// Normalizes a URL for use as a de-duplication key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP or HTTPS scheme and a host
/// 3. Lowercase the host (done by the parser for HTTP schemes)
/// 4. Remove the fragment
///
/// Query strings and trailing slashes are kept: sitemaps routinely list
/// `/page` and `/page/` as distinct documents.
///
/// # Examples
///
/// ```
/// use site_harvest::url::normalize_url;
///
/// let url = normalize_url("https://Example.COM/sitemap.xml#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/sitemap.xml");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(url_str.to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}

/// Resolves an anchor href against a base URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs and fragment-only (`#...`) links
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that do not resolve, or resolve to a non-HTTP(S) URL
///
/// The fragment of the resolved URL is dropped.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

/// Checks that a URL path does not end in a known binary/static extension
///
/// The comparison is case-insensitive and ignores any query string.
///
/// # Examples
///
/// ```
/// use site_harvest::url::is_probably_html_path;
///
/// assert!(is_probably_html_path("/blog/post-1"));
/// assert!(is_probably_html_path("/index.html"));
/// assert!(!is_probably_html_path("/assets/logo.PNG"));
/// assert!(!is_probably_html_path("/bundle.js?v=3"));
/// ```
pub fn is_probably_html_path(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default();
    let last_segment = path.rsplit('/').next().unwrap_or_default();

    match last_segment.rsplit_once('.') {
        Some((_, extension)) => !STATIC_EXTENSIONS
            .iter()
            .any(|ext| extension.eq_ignore_ascii_case(ext)),
        None => true,
    }
}
