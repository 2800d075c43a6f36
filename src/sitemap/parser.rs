//! Sitemap XML parser
//!
//! Classifies a sitemap body as an index of child sitemaps or a URL set and
//! collects its `<loc>` values. Element names are matched by local name, so
//! namespace-prefixed documents parse the same way.

use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: locations of child sitemaps
    Index(Vec<String>),
    /// `<urlset>` (or anything else): page locations
    UrlSet(Vec<String>),
}

impl SitemapDocument {
    /// Returns the `<loc>` values in document order
    pub fn locations(&self) -> &[String] {
        match self {
            SitemapDocument::Index(locs) | SitemapDocument::UrlSet(locs) => locs,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, SitemapDocument::Index(_))
    }
}

/// Parses sitemap XML text
///
/// Returns `None` if the XML is malformed. A document containing a
/// `sitemapindex` element anywhere is an index; everything else is a URL set.
/// Blank `<loc>` entries are dropped; no host filtering happens here.
///
/// # Examples
///
/// ```
/// use site_harvest::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml),
///     Some(SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()]))
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Option<SitemapDocument> {
    let mut reader = Reader::from_str(xml.trim_start_matches('\u{feff}'));
    reader.config_mut().trim_text(true);

    let mut is_index = false;
    let mut in_loc = false;
    let mut current = String::new();
    let mut locations = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sitemapindex" => is_index = true,
                b"loc" => {
                    in_loc = true;
                    current.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sitemapindex" {
                    is_index = true;
                }
            }
            Ok(Event::Text(text)) if in_loc => match text.unescape() {
                Ok(value) => current.push_str(&value),
                Err(e) => {
                    tracing::debug!("Bad escape in sitemap <loc>: {}", e);
                    return None;
                }
            },
            Ok(Event::CData(data)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&data.into_inner()));
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"loc" {
                    in_loc = false;
                    let value = current.trim();
                    if !value.is_empty() {
                        locations.push(value.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    "Sitemap XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                return None;
            }
            Ok(_) => {}
        }
    }

    Some(if is_index {
        SitemapDocument::Index(locations)
    } else {
        SitemapDocument::UrlSet(locations)
    })
}

/// Decodes a fetched sitemap body to text
///
/// Bodies that still carry the gzip magic bytes (a `.xml.gz` file served
/// without `Content-Encoding`) are inflated first. Returns `None` if the
/// gzip stream is corrupt.
pub fn decode_sitemap_body(body: &[u8]) -> Option<String> {
    if body.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(body);
        let mut inflated = Vec::new();
        if let Err(e) = decoder.read_to_end(&mut inflated) {
            tracing::debug!("Failed to inflate gzip sitemap: {}", e);
            return None;
        }
        return Some(String::from_utf8_lossy(&inflated).into_owned());
    }

    Some(String::from_utf8_lossy(body).into_owned())
}
