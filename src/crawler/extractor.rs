//! HTML content extraction
//!
//! Turns a fetched HTML page into a [`ScrapedDocument`]:
//! - Title from a readability pass, else the `<title>` element
//! - Description from the description / Open Graph / Twitter meta tags
//! - Main-content text from the readability pass, else a manual
//!   boilerplate-stripping aggregation over the main region
//!
//! Extraction never fails; missing data degrades to empty strings.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use url::Url;

/// Elements removed before manual text aggregation
const BOILERPLATE_SELECTOR: &str = "script, style, noscript, svg, canvas, iframe, header, footer, \
     nav, form, aside, [aria-hidden=\"true\"], [hidden], [role=\"navigation\"], \
     [role=\"banner\"], [role=\"contentinfo\"]";

/// Elements whose text counts as a content block
const BLOCK_SELECTOR: &str = "p, li, blockquote, h1, h2, h3, h4";

/// Meta tags consulted for the description, in priority order
const DESCRIPTION_SELECTORS: &[&str] = &[
    "meta[name=\"description\"]",
    "meta[property=\"og:description\"]",
    "meta[name=\"twitter:description\"]",
];

/// Minimum normalized length (characters) of a content block
const MIN_BLOCK_CHARS: usize = 30;

/// Below this many qualifying blocks the whole region's text is used
const MIN_BLOCKS: usize = 3;

/// Number of leading characters compared when de-duplicating blocks
const DEDUP_PREFIX_CHARS: usize = 120;

/// A normalized page record
///
/// `content` may legitimately be empty (script-rendered pages, binaries,
/// failed fetches).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedDocument {
    pub url: String,
    pub title: String,
    pub description: String,
    pub content: String,
}

impl ScrapedDocument {
    /// Creates an all-empty document for a URL
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Returns true if title, description and content are all empty
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.content.is_empty()
    }

    /// The most useful text of the record: content, else description, else title
    pub fn best_text(&self) -> &str {
        [&self.content, &self.description, &self.title]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or("", |s| s.as_str())
    }
}

/// Checks whether a Content-Type marks a response that must not be parsed
///
/// Images, PDFs, archives and generic binary streams are skipped.
///
/// # Examples
///
/// ```
/// use site_harvest::crawler::is_binary_content_type;
///
/// assert!(is_binary_content_type("image/png"));
/// assert!(is_binary_content_type("application/PDF"));
/// assert!(!is_binary_content_type("text/html; charset=utf-8"));
/// assert!(!is_binary_content_type(""));
/// ```
pub fn is_binary_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.starts_with("image/")
        || ["pdf", "zip", "octet-stream", "x-tar", "rar", "x-7z"]
            .iter()
            .any(|marker| ct.contains(marker))
}

/// Collapses every whitespace run to a single space and trims the ends
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts a normalized document from HTML
///
/// # Arguments
///
/// * `html` - The raw page HTML
/// * `source_url` - The URL the page was fetched from; becomes `url` and the
///   document base
///
/// # Example
///
/// ```
/// use site_harvest::crawler::extract;
///
/// let html = r#"<html><head><title>Docs</title>
///     <meta name="description" content="  All   the docs "></head>
///     <body></body></html>"#;
/// let doc = extract(html, "https://example.com/docs");
/// assert_eq!(doc.title, "Docs");
/// assert_eq!(doc.description, "All the docs");
/// ```
pub fn extract(html: &str, source_url: &str) -> ScrapedDocument {
    let html = inject_base(html, source_url);
    let readable = readability_pass(&html, source_url);
    let mut document = Html::parse_document(&html);

    let title = readable
        .as_ref()
        .map(|r| normalize_text(&r.title))
        .filter(|t| !t.is_empty())
        .or_else(|| document_title(&document))
        .unwrap_or_default();

    let description = meta_description(&document);

    let mut content = readable
        .map(|r| normalize_text(&r.text))
        .unwrap_or_default();

    if content.is_empty() {
        strip_boilerplate(&mut document);
        content = main_region(&document)
            .map(|region| normalize_text(&aggregate_text(region)))
            .unwrap_or_default();
    }

    ScrapedDocument {
        url: source_url.to_string(),
        title,
        description,
        content,
    }
}

/// Title and text reported by the readability pass
struct ReadableArticle {
    title: String,
    text: String,
}

/// Runs readability main-content extraction on its own parse of the HTML
///
/// The extractor mutates the tree it works on, so it never sees the document
/// used for metadata lookups. Any extractor error means "no result".
fn readability_pass(html: &str, source_url: &str) -> Option<ReadableArticle> {
    let url = Url::parse(source_url).ok()?;
    match readability::extractor::extract(&mut html.as_bytes(), &url) {
        Ok(product) => Some(ReadableArticle {
            title: product.title,
            text: article_text(&product.content),
        }),
        Err(_) => {
            tracing::debug!("Readability found no article in {}", source_url);
            None
        }
    }
}

/// Text of the article HTML chosen by readability
///
/// Text nodes are joined with a space so adjacent blocks never run together;
/// callers collapse the extra whitespace.
fn article_text(article_html: &str) -> String {
    Html::parse_fragment(article_html)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inserts `<base href=source_url>` as the first head child unless a base exists
fn inject_base<'a>(html: &'a str, source_url: &str) -> Cow<'a, str> {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lowered = html.to_ascii_lowercase();
    if lowered.contains("<base") {
        return Cow::Borrowed(html);
    }

    let base_tag = format!(
        "<base href=\"{}\">",
        source_url.replace('&', "&amp;").replace('"', "&quot;")
    );

    match head_content_start(&lowered) {
        Some(at) => {
            let mut injected = String::with_capacity(html.len() + base_tag.len());
            injected.push_str(&html[..at]);
            injected.push_str(&base_tag);
            injected.push_str(&html[at..]);
            Cow::Owned(injected)
        }
        // The HTML parser hoists a leading <base> into the implied <head>
        None => Cow::Owned(format!("{}{}", base_tag, html)),
    }
}

/// Byte offset just past the opening `<head ...>` tag, if any
fn head_content_start(lowered: &str) -> Option<usize> {
    lowered.match_indices("<head").find_map(|(at, _)| {
        let rest = &lowered[at + "<head".len()..];
        let next = rest.chars().next()?;
        if next == '>' || next == '/' || next.is_ascii_whitespace() {
            rest.find('>').map(|end| at + "<head".len() + end + 1)
        } else {
            // <header> and friends
            None
        }
    })
}

/// Extracts the document's own `<title>` text
fn document_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| normalize_text(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// First non-empty description meta tag content, normalized
fn meta_description(document: &Html) -> String {
    DESCRIPTION_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .filter_map(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|element| element.value().attr("content"))
                .map(normalize_text)
        })
        .find(|description| !description.is_empty())
        .unwrap_or_default()
}

/// Detaches navigational and non-content elements from the tree
fn strip_boilerplate(document: &mut Html) {
    let Ok(selector) = Selector::parse(BOILERPLATE_SELECTOR) else {
        return;
    };

    let doomed: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// The first `<main>` or `<article>` element, else `<body>`
fn main_region(document: &Html) -> Option<ElementRef<'_>> {
    ["main, article", "body"]
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| document.select(&selector).next())
}

/// Aggregates readable text blocks from a content region
///
/// Collects paragraph, list item, blockquote and h1-h4 text of at least
/// 30 characters. With fewer than 3 such blocks the region's whole text is
/// used instead. Blocks sharing their first 120 characters are kept once, in
/// order, and joined with a blank line.
pub fn aggregate_text(region: ElementRef<'_>) -> String {
    let mut blocks: Vec<String> = match Selector::parse(BLOCK_SELECTOR) {
        Ok(selector) => region
            .select(&selector)
            .map(|element| normalize_text(&element.text().collect::<String>()))
            .filter(|text| text.chars().count() >= MIN_BLOCK_CHARS)
            .collect(),
        Err(_) => Vec::new(),
    };

    // Too few blocks: the whole region replaces them rather than being appended
    if blocks.len() < MIN_BLOCKS {
        let whole = normalize_text(&region.text().collect::<String>());
        blocks = if whole.is_empty() { Vec::new() } else { vec![whole] };
    }

    let mut seen = HashSet::new();
    blocks
        .into_iter()
        .filter(|block| seen.insert(block.chars().take(DEDUP_PREFIX_CHARS).collect::<String>()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
