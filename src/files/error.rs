use thiserror::Error;

/// Why a single file could not be turned into content
///
/// The `Display` text is what ends up in `ExtractionResult::error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("PDF processing error: {0}")]
    Pdf(String),

    #[error("Word document processing error: {0}")]
    Word(String),

    #[error("Image processing error: {0}")]
    Image(String),

    /// The attachment never reached a parser (bad base64, missing payload)
    #[error("Error processing file: {0}")]
    Decode(String),
}
