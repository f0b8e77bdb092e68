pub mod api;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod model;

pub use config::AppConfig;
pub use domain::{EcgSample, ECG_CONDITIONS, ECG_LEADS, ECG_TIME_STEPS};
pub use error::{EcgdError, Result};
pub use model::{ModelHandle, OnnxModel, Predictor};
