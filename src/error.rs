use thiserror::Error;

use crate::services::StoreError;

/// Errors surfaced by the matching engines. Mapped to HTTP statuses at the
/// route layer; low compatibility scores are never errors.
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Profile incomplete: {0}")]
    ProfileIncomplete(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Weight drift rejected for zone {zone}: {detail}")]
    WeightDriftRejected { zone: String, detail: String },

    #[error("Analytics write failed: {0}")]
    AnalyticsWriteFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
