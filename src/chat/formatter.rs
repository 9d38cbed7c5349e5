//! Renders extraction results as prompt text

use crate::files::ExtractionResult;

/// Turn successful results into labelled blocks separated by blank lines.
///
/// Failed results are skipped. Images contribute only their dimensions,
/// the pixels travel separately as image parts.
pub fn format_results(results: &[ExtractionResult]) -> String {
    results
        .iter()
        .filter(|result| result.is_success())
        .filter_map(format_result)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_result(result: &ExtractionResult) -> Option<String> {
    let filename = result.filename();
    let file_type = result.file_type();
    let label = file_type.as_str().to_uppercase();
    let content = result.content()?;

    if file_type.is_document() {
        let text = content.text().unwrap_or_default();
        if text.is_empty() {
            Some(format!(
                "📄 **{}** ({}): No text content found\n",
                filename, label
            ))
        } else {
            Some(format!("📄 **{}** ({}):\n{}\n", filename, label, text))
        }
    } else if file_type.is_image() {
        let (width, height) = content.image().map(|img| img.info.size).unwrap_or((0, 0));
        Some(format!(
            "🖼️ **{}** ({}): Image {}x{} pixels\n",
            filename, label, width, height
        ))
    } else {
        None
    }
}
