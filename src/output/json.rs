use crate::crawler::ScrapedDocument;
use crate::HarvestError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes documents to `path` as a pretty-printed JSON array
///
/// Each record has `url`, `title`, `description` and `content` keys.
pub fn write_json(path: &Path, documents: &[ScrapedDocument]) -> Result<(), HarvestError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, documents)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Wrote {} document(s) to {}", documents.len(), path.display());
    Ok(())
}
