use crate::InferError;
use digit_base::Tensor;
use std::collections::HashMap;

/// A loaded model ready to run. Dropping the session releases it.
pub trait Session: Send {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}
