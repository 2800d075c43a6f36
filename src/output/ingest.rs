//! Ingestion client
//!
//! Sends harvested documents to an embedding/ingestion service as one JSON
//! payload. The service may answer with the URL of the collection it serves.

use crate::crawler::ScrapedDocument;
use crate::url::extract_domain;
use crate::HarvestError;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// Body of an ingestion request
#[derive(Debug, Clone, Serialize)]
pub struct IngestPayload<'a> {
    pub data: &'a [ScrapedDocument],
    pub collection_name: String,
}

impl<'a> IngestPayload<'a> {
    /// Builds a payload named after the host of the first document
    ///
    /// Returns `None` for an empty list or an unparseable first URL.
    pub fn new(documents: &'a [ScrapedDocument]) -> Option<Self> {
        let first = Url::parse(&documents.first()?.url).ok()?;
        let host = extract_domain(&first)?;

        Some(Self {
            data: documents,
            collection_name: collection_name_for(&host),
        })
    }
}

/// Derives the collection name for a host
///
/// # Examples
///
/// ```
/// use site_harvest::output::collection_name_for;
///
/// assert_eq!(collection_name_for("docs.example.com"), "site_docs_example_com");
/// assert_eq!(collection_name_for("127.0.0.1:8080"), "site_127_0_0_1_8080");
/// ```
pub fn collection_name_for(host: &str) -> String {
    format!("site_{}", host.replace([':', '.'], "_"))
}

/// POSTs documents to an ingestion endpoint
///
/// # Returns
///
/// * `Ok(Some(url))` - The service reported a serving URL (`mcp.http_url`)
/// * `Ok(None)` - Nothing to send, or the response carried no URL
/// * `Err(HarvestError)` - Transport failure or non-success status
pub async fn send_to_ingest(
    client: &Client,
    endpoint: &str,
    documents: &[ScrapedDocument],
) -> Result<Option<String>, HarvestError> {
    let Some(payload) = IngestPayload::new(documents) else {
        tracing::debug!("No documents to ingest");
        return Ok(None);
    };

    tracing::info!(
        "Sending {} document(s) to {} as {}",
        documents.len(),
        endpoint,
        payload.collection_name
    );

    let response = client
        .post(endpoint)
        .json(&payload)
        .send()
        .await
        .map_err(|e| HarvestError::from_request(endpoint, e))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| HarvestError::from_request(endpoint, e))?;

    if !status.is_success() {
        return Err(HarvestError::Ingest(format!(
            "HTTP {} from {}: {}",
            status.as_u16(),
            endpoint,
            body.chars().take(200).collect::<String>()
        )));
    }

    let reply: Value = serde_json::from_str(&body).unwrap_or_default();
    let served_at = reply
        .pointer("/mcp/http_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string);

    Ok(served_at)
}
