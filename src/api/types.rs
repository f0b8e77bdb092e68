use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ECG_CONDITIONS;
use crate::error::{EcgdError, Result};

// ============================================================================
// Predict Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Nested numeric array, expected shape (4096, 12). Kept as raw JSON so
    /// presence, emptiness and shape failures produce our own messages.
    #[serde(default)]
    pub ecg_data: Option<Value>,
}

/// One scored sample. Field declaration order matches `ECG_CONDITIONS`, which
/// fixes the JSON key order clients rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(rename = "1dAVb")]
    pub first_degree_av_block: f32,
    #[serde(rename = "RBBB")]
    pub rbbb: f32,
    #[serde(rename = "LBBB")]
    pub lbbb: f32,
    #[serde(rename = "SB")]
    pub sinus_bradycardia: f32,
    #[serde(rename = "AF")]
    pub atrial_fibrillation: f32,
    #[serde(rename = "ST")]
    pub sinus_tachycardia: f32,
}

impl PredictionRecord {
    /// Label an output row. The model contract is one score per condition.
    pub fn from_scores(scores: &[f32]) -> Result<Self> {
        if scores.len() != ECG_CONDITIONS.len() {
            return Err(EcgdError::Inference(format!(
                "model returned {} scores, expected {}",
                scores.len(),
                ECG_CONDITIONS.len()
            )));
        }
        Ok(Self {
            first_degree_av_block: scores[0],
            rbbb: scores[1],
            lbbb: scores[2],
            sinus_bradycardia: scores[3],
            atrial_fibrillation: scores[4],
            sinus_tachycardia: scores[5],
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionRecord>,
    pub message: String,
}

// ============================================================================
// Model Info Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Health Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub uptime_secs: u64,
}

// ============================================================================
// Error Body
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys_follow_condition_order() {
        let record = PredictionRecord::from_scores(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        let body = serde_json::to_string(&record).unwrap();
        let mut last = 0;
        for label in ECG_CONDITIONS {
            let key = format!("\"{label}\"");
            let pos = body.find(&key).unwrap_or_else(|| panic!("missing {label}"));
            assert!(pos >= last, "{label} out of order in {body}");
            last = pos;
        }
    }

    #[test]
    fn record_rejects_wrong_score_count() {
        assert!(PredictionRecord::from_scores(&[0.1, 0.2]).is_err());
    }
}
