//! Inference for the digit pipeline.
//!
//! [`Backend`] loads a [`ModelSource`] into a [`Session`]; the [`digit`]
//! module builds the 28x28 input, runs the session and picks the digit.

pub mod backend;
pub mod backendregistry;
pub mod backends;
pub mod device;
pub mod digit;
pub mod error;
pub mod modelsource;
pub mod session;

pub use backend::Backend;
pub use backendregistry::{create_registry, BackendRegistry};
pub use device::Device;
pub use digit::{
    decide, normalize, preprocess, result_label, DigitClassifier, InputTensor, ModelHandle,
    Prediction, Scores, SessionPolicy,
};
pub use error::InferError;
pub use modelsource::ModelSource;
pub use session::Session;
