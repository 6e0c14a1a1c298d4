use crate::InferError;

/// Model input is `INPUT_SIZE` x `INPUT_SIZE` single channel.
pub const INPUT_SIZE: usize = 28;

/// One score per digit 0–9.
pub const DIGIT_CLASSES: usize = 10;

pub const RESULT_LABEL_PREFIX: &str = "辨識結果：";

/// Text shown for a predicted digit.
pub fn result_label(digit: u8) -> String {
    format!("{RESULT_LABEL_PREFIX}{digit}")
}

/// Per-class confidence scores from the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores([f32; DIGIT_CLASSES]);

impl Scores {
    pub fn new(values: [f32; DIGIT_CLASSES]) -> Self {
        Self(values)
    }

    /// Copy scores out of a model output.
    ///
    /// # Errors
    ///
    /// Returns `InferError::Shape` unless `values` holds exactly ten scores.
    pub fn from_slice(values: &[f32]) -> Result<Self, InferError> {
        let array: [f32; DIGIT_CLASSES] = values.try_into().map_err(|_| {
            InferError::Shape(format!(
                "expected {DIGIT_CLASSES} scores, got {}",
                values.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn get(&self, digit: u8) -> Option<f32> {
        self.0.get(digit as usize).copied()
    }
}

/// Result of classifying one bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub digit: u8,
    pub scores: Scores,
}

impl Prediction {
    pub fn from_scores(scores: Scores) -> Self {
        Self {
            digit: super::decide(&scores),
            scores,
        }
    }

    /// Score of the predicted digit.
    pub fn confidence(&self) -> f32 {
        self.scores.0[self.digit as usize]
    }

    pub fn label(&self) -> String {
        result_label(self.digit)
    }
}
