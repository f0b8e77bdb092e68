use chrono::{DateTime, Utc};

use crate::model::ModelHandle;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded model, read-only for the process lifetime. `None` when
    /// loading failed at startup.
    pub model: ModelHandle,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self {
            model,
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }
}
