//! Model handle abstraction.
//!
//! The server only ever sees a `Predictor`; the tract-onnx implementation
//! lives in `onnx` and tests substitute a stub.

pub mod onnx;

use std::sync::Arc;

use crate::error::Result;

/// A loaded inference artifact that scores one flattened (4096, 12) sample
/// and returns one probability per condition, in condition order.
pub trait Predictor: Send + Sync {
    fn scores(&self, sample: &[f32]) -> Result<Vec<f32>>;
}

/// Shared, read-only model handle. Absent when loading failed at startup.
pub type ModelHandle = Option<Arc<dyn Predictor>>;

pub use onnx::OnnxModel;
