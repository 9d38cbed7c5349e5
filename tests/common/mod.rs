#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docchat::chat::ChatRelay;
use docchat::files::FileProcessor;
use docchat::llm::mock::ScriptedProvider;
use docchat::llm::GenerationConfig;
use docchat::routes::AppState;
use docx_rust::document::{
    BodyContent, Paragraph, Table, TableCell, TableCellContent, TableRow, TableRowContent,
};
use docx_rust::Docx;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Boundary used by `multipart_body`
pub const BOUNDARY: &str = "docchat-test-boundary";

/// Default body limit for route tests
pub const TEST_UPLOAD_LIMIT: u64 = 5 * 1024 * 1024;

pub fn relay_with(provider: Arc<ScriptedProvider>) -> ChatRelay {
    ChatRelay::new(provider, FileProcessor::new(), GenerationConfig::default())
}

pub fn state_with(provider: Arc<ScriptedProvider>) -> AppState {
    AppState::new(relay_with(provider), true, TEST_UPLOAD_LIMIT)
}

/// A solid-colour image encoded in `format`
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 30, 90]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .expect("Failed to encode test image");
    buf.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

/// A .docx with one paragraph per entry
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fixture.docx");

    let mut docx = Docx::default();
    for text in paragraphs {
        docx.document.push(Paragraph::default().push_text(*text));
    }
    docx.write_file(&path).expect("Failed to write docx fixture");

    std::fs::read(&path).expect("Failed to read docx fixture")
}

/// A .docx with a leading paragraph followed by one table per entry
///
/// Empty strings become empty cells.
pub fn docx_with_tables(intro: &str, tables: &[&[&[&str]]]) -> Vec<u8> {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tables.docx");

    let mut docx = Docx::default();
    docx.document.push(Paragraph::default().push_text(intro));
    for rows in tables {
        docx.document
            .body
            .content
            .push(BodyContent::Table(table(rows)));
    }
    docx.write_file(&path).expect("Failed to write docx fixture");

    std::fs::read(&path).expect("Failed to read docx fixture")
}

fn table<'a>(rows: &[&[&'a str]]) -> Table<'a> {
    Table {
        rows: rows
            .iter()
            .map(|cells| TableRow {
                cells: cells
                    .iter()
                    .map(|text| {
                        TableRowContent::TableCell(TableCell {
                            content: vec![TableCellContent::Paragraph(
                                Paragraph::default().push_text(*text),
                            )],
                            ..Default::default()
                        })
                    })
                    .collect(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// A minimal PDF with one Helvetica text line per page
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            (0..pages.len())
                .map(|i| format!("{} 0 R", 4 + 2 * i))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    for (i, text) in pages.iter().enumerate() {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", escaped);

        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
    }

    let xref = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref
        )
        .as_bytes(),
    );
    out
}

pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// `multipart/form-data` body with a single part
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, name
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// JSON payloads of every `data: ` line in an SSE body
pub fn parse_sse_events(body: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(body)
        .split("\n\n")
        .flat_map(|frame| frame.lines())
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).expect("SSE data is not JSON"))
        .collect()
}
