//! Image encoding: `DynamicImage` → JPEG file.
//!
//! JPEG has no alpha channel and the `image` JPEG encoder rejects RGBA
//! buffers, so every page is flattened to 8-bit RGB before encoding.

use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::debug;

/// Encode a rasterised page as JPEG and write it to `path`, replacing any
/// existing file.
pub fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<(), image::ImageError> {
    let rgb = match img {
        DynamicImage::ImageRgb8(_) => None,
        other => Some(DynamicImage::ImageRgb8(other.to_rgb8())),
    };
    rgb.as_ref()
        .unwrap_or(img)
        .save_with_format(path, ImageFormat::Jpeg)?;
    debug!(
        "Wrote {}x{} JPEG → {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
