use super::INPUT_SIZE;
use crate::InferError;
use digit_base::Tensor;
use digit_image::Bitmap;

/// Model input: `[1, 28, 28]` blue-channel intensities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    tensor: Tensor<f32>,
}

impl InputTensor {
    pub fn shape(&self) -> &[usize] {
        &self.tensor.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.tensor.data
    }

    pub fn as_tensor(&self) -> &Tensor<f32> {
        &self.tensor
    }

    pub fn into_tensor(self) -> Tensor<f32> {
        self.tensor
    }

    /// Values as native-endian `f32` bytes, four per element.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.tensor
            .data
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect()
    }
}

/// Build the model input from a bitmap that is already 28x28.
///
/// Pixels are read in row-major order and only the blue channel is used.
pub fn normalize(bitmap: &Bitmap) -> Result<InputTensor, InferError> {
    if bitmap.width() != INPUT_SIZE || bitmap.height() != INPUT_SIZE {
        return Err(InferError::Shape(format!(
            "expected {INPUT_SIZE}x{INPUT_SIZE} bitmap, got {}x{}",
            bitmap.width(),
            bitmap.height()
        )));
    }

    let data: Vec<f32> = bitmap.pixels().map(|[_, _, b]| b as f32 / 255.0).collect();
    let tensor = Tensor::new(vec![1, INPUT_SIZE, INPUT_SIZE], data)?;
    Ok(InputTensor { tensor })
}

/// Downscale to 28x28 with a triangle filter, then normalize.
pub fn preprocess(bitmap: &Bitmap) -> Result<InputTensor, InferError> {
    let small = digit_image::resize(bitmap, INPUT_SIZE, INPUT_SIZE)?;
    normalize(&small)
}
