//! Pure conversion engine for fragment payloads.
//!
//! Maps `(bytes, source MIME type, target format)` to transformed bytes:
//! - Markdown rendering and flattening, HTML stripping
//! - CSV → JSON, JSON → YAML, JSON pretty-printing
//! - raster image transcoding between png/jpeg/gif/webp/avif
//!
//! The engine performs no I/O and holds no state. Every `(source, target)`
//! pair is checked against the conversion table before any work happens;
//! pairs outside the table fail with [`ConvertError::Unsupported`], never
//! an identity passthrough.

mod image_ops;
mod text;

use fragments_types::{FragmentType, TargetFormat};
use thiserror::Error;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting a payload.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The target format is not in the source type's allowed set.
    #[error("unsupported conversion: {from} -> {to}")]
    Unsupported {
        from: &'static str,
        to: &'static str,
    },

    /// The payload could not be parsed as its declared type.
    #[error("conversion parse error: {0}")]
    Parse(String),

    /// The image codec rejected the payload.
    #[error("conversion codec error: {0}")]
    Codec(String),
}

/// Converts `data` from its declared `source` type into `target`.
///
/// Identity conversions (target MIME equal to the source's own) return the
/// bytes unchanged. The caller maps a requested extension to a
/// [`TargetFormat`] via [`TargetFormat::from_extension`] beforehand.
pub fn convert(
    data: &[u8],
    source: FragmentType,
    target: TargetFormat,
) -> ConvertResult<Vec<u8>> {
    if !source.formats().contains(&target.mime()) {
        return Err(ConvertError::Unsupported {
            from: source.mime(),
            to: target.mime(),
        });
    }
    if target.mime() == source.mime() {
        return Ok(data.to_vec());
    }

    match (source, target) {
        (FragmentType::Markdown, TargetFormat::Html) => text::markdown_to_html(data),
        (FragmentType::Markdown, TargetFormat::Txt) => text::markdown_to_text(data),
        (FragmentType::Html, TargetFormat::Txt) => text::html_to_text(data),
        // CSV is already plain text.
        (FragmentType::Csv, TargetFormat::Txt) => Ok(data.to_vec()),
        (FragmentType::Csv, TargetFormat::Json) => text::csv_to_json(data),
        (FragmentType::Json, TargetFormat::Txt) => text::json_pretty(data),
        (FragmentType::Json, TargetFormat::Yaml) => text::json_to_yaml(data),
        // YAML is already plain text; validate the encoding only.
        (FragmentType::Yaml, TargetFormat::Txt) => text::yaml_to_text(data),
        (source, target) if source.is_image() => image_ops::transcode(data, source, target),
        (source, target) => Err(ConvertError::Unsupported {
            from: source.mime(),
            to: target.mime(),
        }),
    }
}
