//! Image validation and base64 packaging

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ColorType, ImageFormat};

use super::error::ExtractionError;
use super::types::{ImageContent, ImageInfo};

/// Used when the container format is recognised but has no dedicated MIME mapping
pub const FALLBACK_MIME: &str = "image/jpeg";

/// Decode the image to validate it, then return the original bytes as base64
pub fn extract(data: &[u8]) -> Result<ImageContent, ExtractionError> {
    let format = image::guess_format(data).map_err(|e| ExtractionError::Image(e.to_string()))?;
    let decoded = image::load_from_memory_with_format(data, format)
        .map_err(|e| ExtractionError::Image(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());

    Ok(ImageContent {
        base64: STANDARD.encode(data),
        mime_type: mime_type(format).to_string(),
        info: ImageInfo {
            format: format_name(format).map(str::to_string),
            mode: mode_name(decoded.color()),
            size: (width, height),
            width,
            height,
        },
        size_bytes: data.len(),
    })
}

pub fn mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::WebP => "image/webp",
        _ => FALLBACK_MIME,
    }
}

fn format_name(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("JPEG"),
        ImageFormat::Png => Some("PNG"),
        ImageFormat::Gif => Some("GIF"),
        ImageFormat::Bmp => Some("BMP"),
        ImageFormat::WebP => Some("WEBP"),
        _ => None,
    }
}

fn mode_name(color: ColorType) -> String {
    match color {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 => "LA".to_string(),
        ColorType::Rgb8 => "RGB".to_string(),
        ColorType::Rgba8 => "RGBA".to_string(),
        ColorType::L16 => "I;16".to_string(),
        ColorType::La16 => "LA;16".to_string(),
        ColorType::Rgb16 => "RGB;16".to_string(),
        ColorType::Rgba16 => "RGBA;16".to_string(),
        ColorType::Rgb32F => "RGB;32F".to_string(),
        ColorType::Rgba32F => "RGBA;32F".to_string(),
        other => format!("{:?}", other),
    }
}
