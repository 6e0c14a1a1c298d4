//! Planar frame to RGB bitmap conversion.
//!
//! The frame is interleaved into NV21, turned into RGB, pushed through a
//! JPEG encode/decode round trip and rotated. The JPEG step reuses the
//! general-purpose codec instead of a dedicated planar converter, at the
//! cost of one lossy pass per frame.

use crate::{FormatError, PlanarFrame};
use digit_image::{Bitmap, Rotation};

pub const DEFAULT_JPEG_QUALITY: u8 = 75;
pub const DEFAULT_ROTATION: Rotation = Rotation::Deg90;

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

/// Size in bytes of an NV21 image: full luma plus interleaved VU pairs.
pub fn nv21_len(width: usize, height: usize) -> usize {
    width * height + 2 * width.div_ceil(2) * height.div_ceil(2)
}

/// Interleave a planar frame into NV21: compacted luma rows, then one
/// `V, U` byte pair per chroma sample.
pub fn interleave_nv21(frame: &PlanarFrame) -> Result<Vec<u8>, FormatError> {
    frame.validate()?;

    let (width, height) = (frame.width(), frame.height());
    let mut nv21 = Vec::with_capacity(nv21_len(width, height));

    for row in 0..height {
        for col in 0..width {
            nv21.push(frame.y().sample(row, col));
        }
    }

    // U and V are swapped
    for row in 0..frame.chroma_height() {
        for col in 0..frame.chroma_width() {
            nv21.push(frame.v().sample(row, col));
            nv21.push(frame.u().sample(row, col));
        }
    }

    Ok(nv21)
}

/// Convert NV21 bytes to packed RGB8 (`[R, G, B, R, G, B, ...]`).
pub fn nv21_to_rgb(nv21: &[u8], width: usize, height: usize) -> Result<Vec<u8>, FormatError> {
    if width == 0 || height == 0 {
        return Err(FormatError::Dimensions { width, height });
    }
    let expected = nv21_len(width, height);
    if nv21.len() < expected {
        return Err(FormatError::PlaneSize {
            plane: crate::PlaneKind::V,
            expected,
            got: nv21.len(),
        });
    }

    let (luma, chroma) = nv21.split_at(width * height);
    let chroma_width = width.div_ceil(2);
    let mut rgb = Vec::with_capacity(width * height * 3);

    for row in 0..height {
        for col in 0..width {
            let y = luma[row * width + col];
            let pair = ((row / 2) * chroma_width + col / 2) * 2;
            let (r, g, b) = yuv_to_rgb(y, chroma[pair + 1], chroma[pair]);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    Ok(rgb)
}

/// Frame Converter: planar camera frame to a display-ready, rotated bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConverter {
    quality: u8,
    rotation: Rotation,
}

impl Default for FrameConverter {
    fn default() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
            rotation: DEFAULT_ROTATION,
        }
    }
}

impl FrameConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JPEG quality used for the intermediate encode (clamped to 1–100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Set the clockwise rotation applied to the decoded bitmap.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Convert one frame.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` for zero dimensions, bad strides, short planes,
    /// or when the JPEG encode/decode round trip fails. Callers processing a
    /// stream should skip the frame and carry on.
    pub fn convert(&self, frame: &PlanarFrame) -> Result<Bitmap, FormatError> {
        let (width, height) = (frame.width(), frame.height());
        let nv21 = interleave_nv21(frame)?;
        let rgb = nv21_to_rgb(&nv21, width, height)?;

        let jpeg = digit_image::encode_rgb_jpeg(&rgb, width, height, self.quality)?;
        let decoded = digit_image::decode_image(&jpeg)?;
        log::trace!(
            "converted {}x{} frame via {} byte jpeg",
            width,
            height,
            jpeg.len()
        );

        Ok(digit_image::rotate(&decoded, self.rotation)?)
    }
}
