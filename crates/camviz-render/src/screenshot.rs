//! Frame export.
//!
//! Renderers read pixels back bottom row first, so every export flips the
//! rows before encoding.

use std::path::Path;

use camviz_core::CamvizError;
use image::{ImageBuffer, Rgba, RgbaImage};

/// Builds a top-down RGBA image from bottom-up RGBA pixel data.
pub fn flip_rows(data: &[u8], width: u32, height: u32) -> Result<RgbaImage, ScreenshotError> {
    let img: RgbaImage = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, data.to_vec())
        .ok_or(ScreenshotError::InvalidImageData)?;
    Ok(image::imageops::flip_vertical(&img))
}

/// Saves bottom-up RGBA pixel data to an image file.
///
/// The format follows the extension: `.png`, or `.jpg`/`.jpeg` (alpha dropped).
pub fn save_image(
    path: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), ScreenshotError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let img = flip_rows(data, width, height)?;

    match extension.as_str() {
        "png" => {
            img.save_with_format(path, image::ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            let rgb_img = image::DynamicImage::ImageRgba8(img).to_rgb8();
            rgb_img.save_with_format(path, image::ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(ScreenshotError::UnsupportedFormat(extension));
        }
    }

    log::info!("saved {width}x{height} frame to {}", path.display());
    Ok(())
}

/// Encodes bottom-up RGBA pixel data as PNG in memory.
pub fn encode_png(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScreenshotError> {
    let img = flip_rows(data, width, height)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Error type for frame export.
#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("Failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid image data")]
    InvalidImageData,
}

impl From<ScreenshotError> for CamvizError {
    fn from(err: ScreenshotError) -> Self {
        match err {
            ScreenshotError::IoError(io) => CamvizError::IoError(io),
            other => CamvizError::RenderError(other.to_string()),
        }
    }
}
