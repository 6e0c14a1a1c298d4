use super::{preprocess, InputTensor, Prediction, Scores};
use crate::{Backend, InferError, ModelSource, Session};
use digit_image::Bitmap;
use std::fmt;
use std::str::FromStr;

/// How long a loaded model lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Load before every classification and release right after.
    #[default]
    PerFrame,
    /// Load on first use and keep the session for later frames.
    Persistent,
}

impl fmt::Display for SessionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPolicy::PerFrame => write!(f, "per-frame"),
            SessionPolicy::Persistent => write!(f, "persistent"),
        }
    }
}

impl FromStr for SessionPolicy {
    type Err = InferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-frame" | "perframe" => Ok(SessionPolicy::PerFrame),
            "persistent" => Ok(SessionPolicy::Persistent),
            other => Err(InferError::Backend(format!("unknown session policy: {other}"))),
        }
    }
}

/// A loaded model. The underlying session is released when the handle drops.
pub struct ModelHandle {
    session: Box<dyn Session>,
    source: String,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("source", &self.source)
            .field("inputs", &self.session.input_names())
            .finish()
    }
}

impl ModelHandle {
    pub fn acquire(backend: &dyn Backend, source: &ModelSource) -> Result<Self, InferError> {
        let session = backend.load_model(source)?;
        log::debug!("[{}] acquired model {}", backend.name(), source);
        Ok(Self {
            session,
            source: source.to_string(),
        })
    }

    /// Run the model on one input and read its ten scores.
    ///
    /// The input goes to the model's first input; scores come from its first
    /// output.
    pub fn infer(&mut self, input: &InputTensor) -> Result<Scores, InferError> {
        let input_name = self
            .session
            .input_names()
            .first()
            .ok_or_else(|| InferError::Backend("model has no inputs".to_string()))?
            .clone();
        let output_name = self.session.output_names().first().cloned();

        let mut outputs = self
            .session
            .run(&[(input_name.as_str(), input.as_tensor().clone())])?;

        let output = output_name
            .and_then(|name| outputs.remove(&name))
            .or_else(|| outputs.into_values().next())
            .ok_or_else(|| InferError::Backend("model produced no outputs".to_string()))?;

        Scores::from_slice(&output.data)
    }
}

impl Drop for ModelHandle {
    fn drop(&mut self) {
        log::debug!("released model {}", self.source);
    }
}

/// Digit Classifier: bitmap in, predicted digit out.
pub struct DigitClassifier {
    backend: Box<dyn Backend>,
    source: ModelSource,
    policy: SessionPolicy,
    resident: Option<ModelHandle>,
}

impl fmt::Debug for DigitClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitClassifier")
            .field("backend", &self.backend.name())
            .field("source", &self.source)
            .field("policy", &self.policy)
            .field("resident", &self.resident.is_some())
            .finish()
    }
}

impl DigitClassifier {
    /// Create a classifier with the `PerFrame` policy. No model is loaded yet.
    pub fn new(backend: Box<dyn Backend>, source: ModelSource) -> Self {
        Self {
            backend,
            source,
            policy: SessionPolicy::default(),
            resident: None,
        }
    }

    /// Set the session policy (builder pattern). Switching away from
    /// `Persistent` releases a resident model.
    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        if policy == SessionPolicy::PerFrame {
            self.resident = None;
        }
        self
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// Whether a persistent model is currently loaded.
    pub fn is_resident(&self) -> bool {
        self.resident.is_some()
    }

    /// Downscale, normalize, run the model and pick the digit.
    ///
    /// # Errors
    ///
    /// Returns `InferError` if the bitmap cannot be preprocessed, the model
    /// cannot be loaded, or inference fails. Under `PerFrame` the model is
    /// released on every path.
    pub fn classify(&mut self, bitmap: &Bitmap) -> Result<Prediction, InferError> {
        let input = preprocess(bitmap)?;
        self.classify_tensor(&input)
    }

    /// Classify an already preprocessed input.
    pub fn classify_tensor(&mut self, input: &InputTensor) -> Result<Prediction, InferError> {
        let scores = match self.policy {
            SessionPolicy::PerFrame => {
                let mut handle = ModelHandle::acquire(self.backend.as_ref(), &self.source)?;
                handle.infer(input)?
            }
            SessionPolicy::Persistent => {
                let handle = match &mut self.resident {
                    Some(handle) => handle,
                    resident => {
                        resident.insert(ModelHandle::acquire(self.backend.as_ref(), &self.source)?)
                    }
                };
                handle.infer(input)?
            }
        };

        let prediction = Prediction::from_scores(scores);
        log::debug!(
            "predicted {} (score {:.3})",
            prediction.digit,
            prediction.confidence()
        );
        Ok(prediction)
    }
}
