//! Extraction result model

use serde::Serialize;

use super::error::ExtractionError;

/// File kind, derived from the filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Doc,
    Jpg,
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Unknown,
}

impl FileType {
    pub const SUPPORTED: [FileType; 9] = [
        FileType::Pdf,
        FileType::Docx,
        FileType::Doc,
        FileType::Jpg,
        FileType::Jpeg,
        FileType::Png,
        FileType::Gif,
        FileType::Bmp,
        FileType::Webp,
    ];

    /// Classify a filename by its (case-insensitive) suffix
    pub fn from_filename(filename: &str) -> Self {
        match extension_of(filename).as_deref() {
            Some("pdf") => FileType::Pdf,
            Some("docx") => FileType::Docx,
            Some("doc") => FileType::Doc,
            Some("jpg") => FileType::Jpg,
            Some("jpeg") => FileType::Jpeg,
            Some("png") => FileType::Png,
            Some("gif") => FileType::Gif,
            Some("bmp") => FileType::Bmp,
            Some("webp") => FileType::Webp,
            _ => FileType::Unknown,
        }
    }

    /// Suffix without the dot; "unknown" for unsupported files
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Doc => "doc",
            FileType::Jpg => "jpg",
            FileType::Jpeg => "jpeg",
            FileType::Png => "png",
            FileType::Gif => "gif",
            FileType::Bmp => "bmp",
            FileType::Webp => "webp",
            FileType::Unknown => "unknown",
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, FileType::Pdf | FileType::Docx | FileType::Doc)
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            FileType::Jpg
                | FileType::Jpeg
                | FileType::Png
                | FileType::Gif
                | FileType::Bmp
                | FileType::Webp
        )
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased suffix after the last dot of the final path component.
///
/// Dotfiles such as ".env" have no suffix.
pub fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.trim_start_matches('.').is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Text pulled out of a PDF
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfContent {
    pub text: String,
    pub page_count: usize,
}

/// Text pulled out of a Word document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordContent {
    pub text: String,
    /// Top-level paragraphs, empty ones included
    pub paragraphs: usize,
    /// Top-level tables
    pub tables: usize,
}

/// Decoded image header details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    /// "JPEG", "PNG", ...; None when the container was not recognised
    pub format: Option<String>,
    /// Pixel layout, e.g. "RGB" or "RGBA"
    pub mode: String,
    pub size: (u32, u32),
    pub width: u32,
    pub height: u32,
}

/// Original image bytes, ready to be sent as a data URI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageContent {
    pub base64: String,
    pub mime_type: String,
    pub info: ImageInfo,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedContent {
    Pdf(PdfContent),
    Word(WordContent),
    Image(ImageContent),
}

impl ExtractedContent {
    /// Extracted text of a document; None for images
    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractedContent::Pdf(pdf) => Some(&pdf.text),
            ExtractedContent::Word(word) => Some(&word.text),
            ExtractedContent::Image(_) => None,
        }
    }

    pub fn image(&self) -> Option<&ImageContent> {
        match self {
            ExtractedContent::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// Outcome of processing one uploaded file
///
/// Either `content` is set and `error` is not (success), or the reverse.
/// The fields are private so that no other combination can be built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    success: bool,
    file_type: FileType,
    content: Option<ExtractedContent>,
    error: Option<String>,
    filename: String,
}

impl ExtractionResult {
    pub fn succeeded(
        filename: impl Into<String>,
        file_type: FileType,
        content: ExtractedContent,
    ) -> Self {
        Self {
            success: true,
            file_type,
            content: Some(content),
            error: None,
            filename: filename.into(),
        }
    }

    pub fn failed(filename: impl Into<String>, file_type: FileType, error: ExtractionError) -> Self {
        Self {
            success: false,
            file_type,
            content: None,
            error: Some(error.to_string()),
            filename: filename.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn content(&self) -> Option<&ExtractedContent> {
        self.content.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Image payload of a successful image result
    pub fn image(&self) -> Option<&ImageContent> {
        self.content.as_ref().and_then(ExtractedContent::image)
    }
}
