//! RGB bitmap utilities for the digit pipeline.
//!
//! Thin wrapper around the `image` crate: JPEG encode/decode, quarter-turn
//! rotation and resampling, all on [`Bitmap`] (HWC `[height, width, 3]`).

extern crate image as crates_image;

pub mod bitmap;
pub mod error;

pub use bitmap::Bitmap;
pub use error::ImageError;

use crates_image::imageops::{self, FilterType};
use crates_image::ImageEncoder;

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Parse a clockwise angle; only multiples of 90 are accepted.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees % 360 {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Whether the rotation swaps width and height.
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Decodes an encoded image (format auto-detected) into an RGB bitmap.
///
/// Grayscale and alpha images are converted to RGB8.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub fn decode_image(data: &[u8]) -> Result<Bitmap, ImageError> {
    let img = crates_image::load_from_memory(data)?;
    Bitmap::from_rgb_image(img.to_rgb8())
}

/// Encodes a bitmap as JPEG bytes.
///
/// The `quality` parameter controls JPEG compression (1–100, higher = better quality).
///
/// # Errors
///
/// Returns `ImageError::Encode` if encoding fails.
pub fn encode_jpeg(bitmap: &Bitmap, quality: u8) -> Result<Vec<u8>, ImageError> {
    encode_rgb_jpeg(bitmap.data(), bitmap.width(), bitmap.height(), quality)
}

/// Encodes packed RGB8 bytes as JPEG.
pub fn encode_rgb_jpeg(
    rgb: &[u8],
    width: usize,
    height: usize,
    quality: u8,
) -> Result<Vec<u8>, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Dimensions { width, height });
    }

    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            rgb,
            width as u32,
            height as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;

    Ok(buffer)
}

/// Rotates a bitmap clockwise.
pub fn rotate(bitmap: &Bitmap, rotation: Rotation) -> Result<Bitmap, ImageError> {
    if rotation == Rotation::None {
        return Ok(bitmap.clone());
    }
    let image = bitmap.to_rgb_image()?;
    let rotated = match rotation {
        Rotation::Deg90 => imageops::rotate90(&image),
        Rotation::Deg180 => imageops::rotate180(&image),
        Rotation::Deg270 => imageops::rotate270(&image),
        Rotation::None => image,
    };
    Bitmap::from_rgb_image(rotated)
}

/// Resamples a bitmap to exactly `width` x `height` with a triangle (bilinear) filter.
pub fn resize(bitmap: &Bitmap, width: usize, height: usize) -> Result<Bitmap, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Dimensions { width, height });
    }
    if bitmap.width() == width && bitmap.height() == height {
        return Ok(bitmap.clone());
    }
    let image = bitmap.to_rgb_image()?;
    let resized = imageops::resize(&image, width as u32, height as u32, FilterType::Triangle);
    Bitmap::from_rgb_image(resized)
}
