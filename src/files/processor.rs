//! Suffix-based dispatch to the format extractors

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::ExtractionError;
use super::types::{extension_of, ExtractedContent, ExtractionResult, FileType};
use super::{images, pdf, word};

/// Stateless entry point for turning uploaded bytes into an `ExtractionResult`
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProcessor;

impl FileProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn is_supported(&self, filename: &str) -> bool {
        FileType::from_filename(filename) != FileType::Unknown
    }

    /// Extract content from one file. Never panics and never returns a
    /// partially filled result.
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    pub fn process(&self, data: &[u8], filename: &str) -> ExtractionResult {
        let file_type = FileType::from_filename(filename);

        let outcome = match file_type {
            FileType::Pdf => pdf::extract(data).map(ExtractedContent::Pdf),
            FileType::Docx | FileType::Doc => word::extract(data).map(ExtractedContent::Word),
            t if t.is_image() => images::extract(data).map(ExtractedContent::Image),
            _ => Err(ExtractionError::Unsupported(suffix_label(filename))),
        };

        match outcome {
            Ok(content) => {
                tracing::debug!(%file_type, "file extracted");
                ExtractionResult::succeeded(filename, file_type, content)
            }
            Err(e) => {
                tracing::warn!(%file_type, error = %e, "file extraction failed");
                ExtractionResult::failed(filename, file_type, e)
            }
        }
    }

    /// Decode a base64 attachment and process it
    ///
    /// A missing name becomes "unknown"; missing or undecodable data yields a
    /// failed result for this file only.
    pub fn process_encoded(&self, name: Option<&str>, data: Option<&str>) -> ExtractionResult {
        let filename = name.unwrap_or("unknown");

        let decoded = data
            .ok_or_else(|| ExtractionError::Decode("missing file data".to_string()))
            .and_then(decode_base64);

        match decoded {
            Ok(bytes) => self.process(&bytes, filename),
            Err(e) => {
                tracing::warn!(filename, error = %e, "attachment could not be decoded");
                ExtractionResult::failed(filename, FileType::from_filename(filename), e)
            }
        }
    }
}

/// Standard base64, tolerant of line breaks and a leading data-URL header
fn decode_base64(encoded: &str) -> Result<Vec<u8>, ExtractionError> {
    let payload = match encoded.split_once(";base64,") {
        Some((header, rest)) if header.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ExtractionError::Decode(format!("invalid base64 data: {}", e)))
}

fn suffix_label(filename: &str) -> String {
    extension_of(filename)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
