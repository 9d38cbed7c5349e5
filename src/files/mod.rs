//! File content extraction
//!
//! PDFs and Word documents are reduced to text, images are validated and
//! passed through as base64 for the multimodal prompt.

pub mod error;
pub mod images;
pub mod pdf;
pub mod processor;
pub mod types;
pub mod word;

pub use error::ExtractionError;
pub use processor::FileProcessor;
pub use types::{
    ExtractedContent, ExtractionResult, FileType, ImageContent, ImageInfo, PdfContent,
    WordContent,
};
