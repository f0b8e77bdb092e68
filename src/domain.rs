//! Core ECG domain types: the fixed input shape, the condition label set,
//! and validation of client-supplied matrices.

use serde_json::Value;

use crate::error::{EcgdError, Result};

/// Time-steps per ECG sample.
pub const ECG_TIME_STEPS: usize = 4096;

/// Leads per time-step.
pub const ECG_LEADS: usize = 12;

/// The six cardiac abnormality categories the model scores, in output order.
/// This order defines the field order of every prediction record.
pub const ECG_CONDITIONS: [&str; 6] = ["1dAVb", "RBBB", "LBBB", "SB", "AF", "ST"];

/// A validated ECG sample: exactly `ECG_TIME_STEPS` rows of `ECG_LEADS`
/// `f32` values, stored flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct EcgSample {
    data: Vec<f32>,
}

impl EcgSample {
    /// Coerce a JSON value into a (4096, 12) f32 matrix.
    ///
    /// Rejects non-matrix and non-numeric content explicitly instead of
    /// surfacing an engine-level exception. Shape mismatches report the
    /// received shape in the same `(rows, cols)` form the clients expect.
    pub fn from_json(value: &Value) -> Result<Self> {
        let rows = value.as_array().ok_or_else(|| {
            EcgdError::Validation("ECG data must be a two-dimensional numeric array".to_string())
        })?;

        let mut data = Vec::with_capacity(ECG_TIME_STEPS * ECG_LEADS);
        let mut cols: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_array().ok_or_else(|| {
                EcgdError::Validation(format!(
                    "ECG data must be a two-dimensional numeric array (row {i} is not an array)"
                ))
            })?;

            match cols {
                None => cols = Some(row.len()),
                Some(c) if c != row.len() => {
                    return Err(EcgdError::Validation(format!(
                        "ragged ECG data: row {i} has {} values, expected {c}",
                        row.len()
                    )));
                }
                Some(_) => {}
            }

            for (j, v) in row.iter().enumerate() {
                let v = v.as_f64().ok_or_else(|| {
                    EcgdError::Validation(format!(
                        "ECG data must be numeric (row {i}, column {j} is not a number)"
                    ))
                })?;
                data.push(v as f32);
            }
        }

        let shape = (rows.len(), cols.unwrap_or(0));
        if shape != (ECG_TIME_STEPS, ECG_LEADS) {
            return Err(EcgdError::Validation(format!(
                "Expected ECG data shape ({ECG_TIME_STEPS}, {ECG_LEADS}), got ({}, {})",
                shape.0, shape.1
            )));
        }

        Ok(Self { data })
    }

    /// Flattened row-major view, length `ECG_TIME_STEPS * ECG_LEADS`.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matrix(rows: usize, cols: usize) -> Value {
        json!(vec![vec![0.0_f64; cols]; rows])
    }

    #[test]
    fn accepts_exact_shape() {
        let sample = EcgSample::from_json(&matrix(4096, 12)).unwrap();
        assert_eq!(sample.as_slice().len(), 4096 * 12);
    }

    #[test]
    fn rejects_wrong_lead_count_naming_received_shape() {
        let err = EcgSample::from_json(&matrix(4096, 13)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(4096, 13)"), "got: {msg}");
        assert!(msg.contains("Expected ECG data shape (4096, 12)"));
    }

    #[test]
    fn rejects_wrong_row_count() {
        let err = EcgSample::from_json(&matrix(100, 12)).unwrap_err();
        assert!(err.to_string().contains("(100, 12)"));
    }

    #[test]
    fn rejects_ragged_rows() {
        let value = json!([[0.0, 1.0], [0.0]]);
        let err = EcgSample::from_json(&value).unwrap_err();
        assert!(err.to_string().contains("ragged"));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let value = json!([["a", 1.0]]);
        let err = EcgSample::from_json(&value).unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn rejects_flat_vector() {
        let value = json!([1.0, 2.0, 3.0]);
        assert!(matches!(
            EcgSample::from_json(&value),
            Err(EcgdError::Validation(_))
        ));
    }

    #[test]
    fn condition_order_is_fixed() {
        assert_eq!(ECG_CONDITIONS, ["1dAVb", "RBBB", "LBBB", "SB", "AF", "ST"]);
    }
}
