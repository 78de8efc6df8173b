//! Raster image transcoding between the supported formats.

use crate::{ConvertError, ConvertResult};
use fragments_types::{FragmentType, TargetFormat};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

fn encode_format(target: TargetFormat) -> Option<ImageFormat> {
    match target {
        TargetFormat::Png => Some(ImageFormat::Png),
        TargetFormat::Jpg => Some(ImageFormat::Jpeg),
        TargetFormat::Gif => Some(ImageFormat::Gif),
        TargetFormat::Webp => Some(ImageFormat::WebP),
        TargetFormat::Avif => Some(ImageFormat::Avif),
        _ => None,
    }
}

/// Decodes `data` and re-encodes it in `target`'s format.
///
/// Decoding sniffs the actual byte format rather than trusting the
/// declared type, so a mislabeled payload still transcodes correctly or
/// fails with a codec error.
pub fn transcode(
    data: &[u8],
    source: FragmentType,
    target: TargetFormat,
) -> ConvertResult<Vec<u8>> {
    let format = encode_format(target).ok_or(ConvertError::Unsupported {
        from: source.mime(),
        to: target.mime(),
    })?;

    let decoded =
        image::load_from_memory(data).map_err(|err| ConvertError::Codec(err.to_string()))?;

    // The JPEG encoder rejects alpha channels.
    let decoded = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => decoded,
    };

    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, format)
        .map_err(|err| ConvertError::Codec(err.to_string()))?;
    Ok(out.into_inner())
}
