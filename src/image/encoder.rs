use super::{detect_image_mime, ImageAsset};
use crate::Result;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Decodes `bytes` as any supported image format and re-encodes it as PNG.
///
/// Fails with [`crate::Error::Encoding`] when the input is not a decodable
/// image. Feeding the output back in yields byte-identical PNG.
pub fn encode(bytes: &[u8]) -> Result<ImageAsset> {
    let source_mime = detect_image_mime(bytes);
    let img = image::load_from_memory(bytes)?;
    let (width, height) = (img.width(), img.height());

    let encoded = encode_png(into_png_compatible(img))?;

    tracing::debug!(
        "Encoded {} image ({}x{}, {} bytes) to PNG ({} bytes)",
        source_mime.unwrap_or("unknown"),
        width,
        height,
        bytes.len(),
        encoded.len()
    );

    Ok(ImageAsset::new(
        bytes.to_vec(),
        source_mime,
        encoded,
        width,
        height,
    ))
}

// PNG has no floating point sample formats.
fn into_png_compatible(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(img.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(img.to_rgba16()),
        other => other,
    }
}

fn encode_png(img: DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
