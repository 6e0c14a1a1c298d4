use digit_image::Bitmap;

/// Background shown before the first preview arrives.
pub const BACKGROUND: u32 = 0x0020_2020;

/// Pack an HWC RGB buffer into the 0RGB words minifb expects.
pub fn rgb_to_argb(buf: &[u8], width: usize, height: usize) -> Vec<u32> {
    buf.chunks_exact(3)
        .take(width * height)
        .map(|px| (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]))
        .collect()
}

pub fn bitmap_to_argb(bitmap: &Bitmap) -> Vec<u32> {
    rgb_to_argb(bitmap.data(), bitmap.width(), bitmap.height())
}

pub fn blank(width: usize, height: usize) -> Vec<u32> {
    vec![BACKGROUND; width * height]
}
