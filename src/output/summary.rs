//! Harvest summary
//!
//! Aggregates a document list into the figures shown after a run.

use crate::crawler::ScrapedDocument;

/// Maximum number of snippets kept in a summary
pub const MAX_SNIPPETS: usize = 50;

/// Maximum length of one snippet, in characters
pub const SNIPPET_CHARS: usize = 300;

/// Aggregate view of a harvest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Number of documents retained
    pub documents: usize,

    /// Documents with non-empty main content
    pub with_content: usize,

    /// Characters across all documents (content, else description, else title)
    pub total_characters: usize,

    /// Leading text of the first non-empty documents
    pub snippets: Vec<String>,
}

/// Builds the summary of a document list
///
/// # Examples
///
/// ```
/// use site_harvest::crawler::ScrapedDocument;
/// use site_harvest::output::summarize;
///
/// let docs = vec![
///     ScrapedDocument { title: "Home".into(), ..ScrapedDocument::empty("https://example.com/") },
///     ScrapedDocument::empty("https://example.com/broken"),
/// ];
/// let summary = summarize(&docs);
/// assert_eq!(summary.documents, 2);
/// assert_eq!(summary.total_characters, 4);
/// assert_eq!(summary.snippets, vec!["Home"]);
/// ```
pub fn summarize(documents: &[ScrapedDocument]) -> HarvestSummary {
    let total_characters: usize = documents
        .iter()
        .map(|doc| doc.best_text().chars().count())
        .sum();

    let snippets: Vec<String> = documents
        .iter()
        .map(|doc| doc.best_text().trim())
        .filter(|text| !text.is_empty())
        .take(MAX_SNIPPETS)
        .map(|text| text.chars().take(SNIPPET_CHARS).collect())
        .collect();

    HarvestSummary {
        documents: documents.len(),
        with_content: documents.iter().filter(|d| !d.content.is_empty()).count(),
        total_characters,
        snippets,
    }
}

/// Prints a summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Overview:");
    println!("  Documents: {}", summary.documents);
    println!("  With main content: {}", summary.with_content);
    println!("  Total characters: {}", summary.total_characters);
    println!();

    if !summary.snippets.is_empty() {
        println!("Snippets ({}):", summary.snippets.len());
        for snippet in &summary.snippets {
            println!("  \"{}\"", snippet);
        }
        println!();
    }

    let coverage = if summary.documents > 0 {
        (summary.with_content as f64 / summary.documents as f64) * 100.0
    } else {
        0.0
    };
    println!("Content coverage: {:.1}%", coverage);
}
