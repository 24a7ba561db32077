use serde::{Deserialize, Serialize};

use crate::models::prediction::MatchPrediction;

/// Response for the single-pair analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "memberA")]
    pub member_a: String,
    #[serde(rename = "memberB")]
    pub member_b: String,
    pub prediction: MatchPrediction,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// One entry in a ranked recommendation batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatch {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub prediction: MatchPrediction,
    /// Headline strength, shown as the match reason.
    pub reason: String,
    /// Prediction confidence in [0, 0.95].
    pub confidence: f64,
}

/// Response for the find-matches endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<RankedMatch>,
    #[serde(rename = "totalEvaluated")]
    pub total_evaluated: usize,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Response after recording an outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcomeResponse {
    pub success: bool,
    #[serde(rename = "matchId")]
    pub match_id: String,
    /// 100 - |actual - predicted| for the rated pairing.
    #[serde(rename = "predictionError")]
    pub prediction_error: u8,
}

/// Response after recording engagement metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEngagementResponse {
    pub success: bool,
    #[serde(rename = "matchId")]
    pub match_id: String,
    pub stage: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
