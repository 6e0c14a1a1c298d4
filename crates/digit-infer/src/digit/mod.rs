//! Handwritten digit classification: 28x28 preprocessing, model scores and
//! the arg-max decision.

mod classifier;
mod decision;
mod preprocess;
mod types;

pub use classifier::{DigitClassifier, ModelHandle, SessionPolicy};
pub use decision::decide;
pub use preprocess::{normalize, preprocess, InputTensor};
pub use types::{result_label, Prediction, Scores, DIGIT_CLASSES, INPUT_SIZE, RESULT_LABEL_PREFIX};
