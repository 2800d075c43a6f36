//! Output module for harvested documents
//!
//! This module turns scraped documents into:
//! - A console summary (counts, character totals, text snippets)
//! - A JSON file of the full record list
//! - A POST to an ingestion endpoint

mod ingest;
mod json;
mod summary;

pub use ingest::{collection_name_for, send_to_ingest, IngestPayload};
pub use json::write_json;
pub use summary::{print_summary, summarize, HarvestSummary, MAX_SNIPPETS, SNIPPET_CHARS};
