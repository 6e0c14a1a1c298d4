use crate::Device;
use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Shape(String),
    Preprocess(String),
    Io(String),
    ModelLoad(String),
    Backend(String),
    InvalidInput {
        name: String,
        expected_names: Vec<String>,
    },
    UnsupportedDevice(Device),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Preprocess(msg) => write!(f, "preprocess error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Backend(msg) => write!(f, "backend error: {msg}"),
            InferError::InvalidInput {
                name,
                expected_names,
            } => write!(f, "unknown input '{name}', model expects {expected_names:?}"),
            InferError::UnsupportedDevice(device) => write!(f, "unsupported device: {device}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<digit_base::TensorError> for InferError {
    fn from(err: digit_base::TensorError) -> Self {
        InferError::Shape(err.to_string())
    }
}

impl From<digit_image::ImageError> for InferError {
    fn from(err: digit_image::ImageError) -> Self {
        InferError::Preprocess(err.to_string())
    }
}
