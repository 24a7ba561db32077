use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    InteractionMetrics, MatchPredictionRecord, MatchStage, OutcomeRecord, ProfileDocument,
    RegionWeightProfile,
};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transient store failure: {0}")]
    Transient(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable after {attempts} attempts: {source}")]
    Unavailable {
        attempts: u32,
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Transient(_) => true,
            StoreError::Sqlx(err) => matches!(
                err,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            ),
            _ => false,
        }
    }
}

/// Constraints applied when pulling a candidate pool.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    /// The requesting member, always excluded.
    pub exclude_member_id: String,
    /// Inclusive [min, max] age bounds; members without a stored age pass.
    pub age_range: Option<(u8, u8)>,
    /// Hard pool cap; the store never returns more than this.
    pub limit: usize,
}

/// One row of batch recommendation analytics, appended per find-matches call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSummary {
    #[serde(rename = "memberId")]
    pub member_id: String,
    #[serde(rename = "recommendationCount")]
    pub recommendation_count: usize,
    #[serde(rename = "avgCompatibilityScore")]
    pub avg_compatibility_score: f64,
    #[serde(rename = "avgConfidence")]
    pub avg_confidence: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Persistence boundary for profiles, predictions, outcomes and weights.
///
/// Implementations must keep prediction appends idempotent per member pair
/// and outcome appends idempotent per match id; both are append-only.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, member_id: &str) -> Result<Option<ProfileDocument>, StoreError>;

    async fn upsert_profile(&self, document: &ProfileDocument) -> Result<(), StoreError>;

    /// Verified, active candidates matching the filter, capped at
    /// `filter.limit`.
    async fn query_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<ProfileDocument>, StoreError>;

    async fn append_match_prediction(
        &self,
        record: &MatchPredictionRecord,
    ) -> Result<(), StoreError>;

    async fn get_match_prediction(
        &self,
        match_id: &str,
    ) -> Result<Option<MatchPredictionRecord>, StoreError>;

    async fn set_match_stage(&self, match_id: &str, stage: MatchStage) -> Result<(), StoreError>;

    async fn record_interaction(
        &self,
        match_id: &str,
        metrics: &InteractionMetrics,
    ) -> Result<(), StoreError>;

    async fn get_interaction(
        &self,
        match_id: &str,
    ) -> Result<Option<InteractionMetrics>, StoreError>;

    async fn append_outcome_record(&self, record: &OutcomeRecord) -> Result<(), StoreError>;

    /// Resolved outcomes, newest first, optionally restricted to one zone.
    async fn list_outcomes_since(
        &self,
        zone: Option<&str>,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<OutcomeRecord>, StoreError>;

    /// Highest-version weight profile for a zone.
    async fn get_region_weight_profile(
        &self,
        zone: &str,
    ) -> Result<Option<RegionWeightProfile>, StoreError>;

    async fn put_region_weight_profile(
        &self,
        profile: &RegionWeightProfile,
    ) -> Result<(), StoreError>;

    async fn append_recommendation_summary(
        &self,
        summary: &RecommendationSummary,
    ) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Retry a store call with exponential backoff while the failure looks
/// transient; exhaustion maps to `Unavailable`.
macro_rules! with_retry {
    ($self:expr, $op:expr) => {{
        let mut attempt: u32 = 0;
        loop {
            match $op.await {
                Ok(value) => break Ok(value),
                Err(err) if err.is_transient() && attempt + 1 < $self.max_attempts => {
                    attempt += 1;
                    let delay = $self.base_delay * 2u32.saturating_pow(attempt - 1);
                    tracing::warn!(
                        attempt,
                        max_attempts = $self.max_attempts,
                        error = %err,
                        "transient store failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) if err.is_transient() => {
                    break Err(StoreError::Unavailable {
                        attempts: $self.max_attempts,
                        source: Box::new(err),
                    });
                }
                Err(err) => break Err(err),
            }
        }
    }};
}

/// Decorator adding retry-with-backoff to any `ProfileStore`.
pub struct Retrying<S> {
    inner: S,
    max_attempts: u32,
    base_delay: Duration,
}

impl<S> Retrying<S> {
    pub fn new(inner: S, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }
}

#[async_trait]
impl<S: ProfileStore> ProfileStore for Retrying<S> {
    async fn get_profile(&self, member_id: &str) -> Result<Option<ProfileDocument>, StoreError> {
        with_retry!(self, self.inner.get_profile(member_id))
    }

    async fn upsert_profile(&self, document: &ProfileDocument) -> Result<(), StoreError> {
        with_retry!(self, self.inner.upsert_profile(document))
    }

    async fn query_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<ProfileDocument>, StoreError> {
        with_retry!(self, self.inner.query_candidates(filter))
    }

    async fn append_match_prediction(
        &self,
        record: &MatchPredictionRecord,
    ) -> Result<(), StoreError> {
        with_retry!(self, self.inner.append_match_prediction(record))
    }

    async fn get_match_prediction(
        &self,
        match_id: &str,
    ) -> Result<Option<MatchPredictionRecord>, StoreError> {
        with_retry!(self, self.inner.get_match_prediction(match_id))
    }

    async fn set_match_stage(&self, match_id: &str, stage: MatchStage) -> Result<(), StoreError> {
        with_retry!(self, self.inner.set_match_stage(match_id, stage))
    }

    async fn record_interaction(
        &self,
        match_id: &str,
        metrics: &InteractionMetrics,
    ) -> Result<(), StoreError> {
        with_retry!(self, self.inner.record_interaction(match_id, metrics))
    }

    async fn get_interaction(
        &self,
        match_id: &str,
    ) -> Result<Option<InteractionMetrics>, StoreError> {
        with_retry!(self, self.inner.get_interaction(match_id))
    }

    async fn append_outcome_record(&self, record: &OutcomeRecord) -> Result<(), StoreError> {
        with_retry!(self, self.inner.append_outcome_record(record))
    }

    async fn list_outcomes_since(
        &self,
        zone: Option<&str>,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        with_retry!(self, self.inner.list_outcomes_since(zone, since))
    }

    async fn get_region_weight_profile(
        &self,
        zone: &str,
    ) -> Result<Option<RegionWeightProfile>, StoreError> {
        with_retry!(self, self.inner.get_region_weight_profile(zone))
    }

    async fn put_region_weight_profile(
        &self,
        profile: &RegionWeightProfile,
    ) -> Result<(), StoreError> {
        with_retry!(self, self.inner.put_region_weight_profile(profile))
    }

    async fn append_recommendation_summary(
        &self,
        summary: &RecommendationSummary,
    ) -> Result<(), StoreError> {
        with_retry!(self, self.inner.append_recommendation_summary(summary))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        with_retry!(self, self.inner.health_check())
    }
}
