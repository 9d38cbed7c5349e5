//! Builds the message list sent to the model

use crate::files::ExtractionResult;
use crate::llm::{ContentPart, Message};

use super::formatter::format_results;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that can analyze documents and images. \
When users share files, provide detailed analysis and insights based on the content.";

/// System message, then one user message holding the user's text and the
/// formatted file content. The user message becomes multimodal when at
/// least one image was extracted successfully.
pub fn assemble_messages(user_text: &str, results: &[ExtractionResult]) -> Vec<Message> {
    let combined = combine_text(user_text, &format_results(results));

    let images: Vec<ContentPart> = results
        .iter()
        .filter(|result| result.is_success() && result.file_type().is_image())
        .filter_map(|result| result.image())
        .map(|image| ContentPart::image_data(&image.mime_type, &image.base64))
        .collect();

    let user = if images.is_empty() {
        Message::user(combined)
    } else {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(ContentPart::Text { text: combined });
        parts.extend(images);
        Message::user_parts(parts)
    };

    vec![Message::system(SYSTEM_PROMPT), user]
}

fn combine_text(user_text: &str, file_content: &str) -> String {
    match (user_text.is_empty(), file_content.is_empty()) {
        (_, true) => user_text.to_string(),
        (true, false) => file_content.to_string(),
        (false, false) => format!("{}\n\n{}", user_text, file_content),
    }
}
