//! ONNX inference wrapper (pure Rust via `tract-onnx`).
//!
//! Loads the trained ECG classifier once at startup and specializes it to a
//! fixed `f32` (1, 4096, 12) input so the optimized plan can be shared
//! read-only across concurrent requests.

use tract_onnx::prelude::*;

use crate::domain::{ECG_CONDITIONS, ECG_LEADS, ECG_TIME_STEPS};
use crate::error::{EcgdError, Result};
use crate::model::Predictor;

/// Batch-of-one input shape the model contract expects.
pub const MODEL_INPUT_SHAPE: [usize; 3] = [1, ECG_TIME_STEPS, ECG_LEADS];

#[derive(Clone)]
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("input_shape", &MODEL_INPUT_SHAPE)
            .field("output_dim", &ECG_CONDITIONS.len())
            .finish()
    }
}

impl OnnxModel {
    /// Load the classifier and pin its input fact to `f32` (1, 4096, 12).
    ///
    /// The output dimension is verified against the condition label set by
    /// running one dummy forward pass, so a mismatched artifact fails at
    /// startup instead of on the first request.
    pub fn load(path: &str) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| EcgdError::Inference(format!("onnx load failed: {e}")))?;

        let mut shape = tvec!();
        for d in MODEL_INPUT_SHAPE {
            shape.push(d);
        }

        let model = model
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), shape))
            .map_err(|e| EcgdError::Inference(format!("onnx input fact failed: {e}")))?;

        let plan = model
            .into_optimized()
            .map_err(|e| EcgdError::Inference(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| EcgdError::Inference(format!("onnx runnable failed: {e}")))?;

        let this = Self { plan };
        let dummy = vec![0.0_f32; ECG_TIME_STEPS * ECG_LEADS];
        let out = this.forward(&dummy)?;
        if out.len() != ECG_CONDITIONS.len() {
            return Err(EcgdError::Inference(format!(
                "model outputs {} scores, expected {} (one per condition)",
                out.len(),
                ECG_CONDITIONS.len()
            )));
        }

        Ok(this)
    }

    fn forward(&self, sample: &[f32]) -> Result<Vec<f32>> {
        let expected = ECG_TIME_STEPS * ECG_LEADS;
        if sample.len() != expected {
            return Err(EcgdError::Validation(format!(
                "onnx input element mismatch: got {}, expected {expected}",
                sample.len()
            )));
        }

        let tensor = tract_ndarray::ArrayD::<f32>::from_shape_vec(
            tract_ndarray::IxDyn(&MODEL_INPUT_SHAPE),
            sample.to_vec(),
        )
        .map_err(|e| EcgdError::Inference(format!("onnx input reshape failed: {e}")))?
        .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| EcgdError::Inference(format!("onnx run failed: {e}")))?;
        if outputs.is_empty() {
            return Err(EcgdError::Inference("onnx produced no outputs".to_string()));
        }

        let arr = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| EcgdError::Inference(format!("onnx output decode failed: {e}")))?;

        Ok(arr.iter().copied().collect())
    }
}

impl Predictor for OnnxModel {
    fn scores(&self, sample: &[f32]) -> Result<Vec<f32>> {
        self.forward(sample)
    }
}
