use crate::{InferError, ModelSource, Session};

pub trait Backend: Send {
    fn name(&self) -> &str;
    fn load_model(&self, model: &ModelSource) -> Result<Box<dyn Session>, InferError>;
}
