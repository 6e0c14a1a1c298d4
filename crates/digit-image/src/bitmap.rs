use crate::ImageError;
use digit_base::Tensor;

/// An RGB8 pixel grid in HWC layout `[height, width, 3]`.
///
/// Width and height are always non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    tensor: Tensor<u8>,
}

impl Bitmap {
    pub const CHANNELS: usize = 3;

    /// Wrap packed RGB bytes (`width * height * 3`, row-major).
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::Dimensions { width, height });
        }
        let tensor = Tensor::new(vec![height, width, Self::CHANNELS], data)?;
        Ok(Self { tensor })
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> [u8; 3],
    ) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(width * height * Self::CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// A bitmap filled with a single color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self, ImageError> {
        Self::from_fn(width, height, |_, _| rgb)
    }

    pub fn width(&self) -> usize {
        self.tensor.shape[1]
    }

    pub fn height(&self) -> usize {
        self.tensor.shape[0]
    }

    /// RGB value at column `x`, row `y`. Panics when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width() + x) * Self::CHANNELS;
        let p = &self.tensor.data[idx..idx + Self::CHANNELS];
        [p[0], p[1], p[2]]
    }

    /// Iterate pixels in row-major scan order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.tensor
            .data
            .chunks_exact(Self::CHANNELS)
            .map(|p| [p[0], p[1], p[2]])
    }

    pub fn data(&self) -> &[u8] {
        &self.tensor.data
    }

    pub fn as_tensor(&self) -> &Tensor<u8> {
        &self.tensor
    }

    pub fn into_tensor(self) -> Tensor<u8> {
        self.tensor
    }

    pub(crate) fn to_rgb_image(&self) -> Result<crates_image::RgbImage, ImageError> {
        crates_image::RgbImage::from_raw(
            self.width() as u32,
            self.height() as u32,
            self.tensor.data.clone(),
        )
        .ok_or(ImageError::Dimensions {
            width: self.width(),
            height: self.height(),
        })
    }

    pub(crate) fn from_rgb_image(image: crates_image::RgbImage) -> Result<Self, ImageError> {
        let (w, h) = image.dimensions();
        Self::new(w as usize, h as usize, image.into_raw())
    }
}
