use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{pair_distance_km, saudade_intensity};
use crate::error::MatchingError;
use crate::models::{
    CompatibilityProfile, DimensionWeights, FeedbackRatings, LearningFeatures, MatchStage,
    OutcomeClass, OutcomeRecord, ProfileDocument, ProgressionSnapshot, RecordEngagementRequest,
    RecordOutcomeRequest, RegionWeightProfile, SubScores, SuccessPattern,
};
use crate::services::{CacheKey, ProfileStore, SnapshotCache};

const WEIGHT_DRIFT_TOLERANCE: f64 = 0.5;
const MIN_SAMPLE_SIZE: usize = 20;
const MIN_COMMIT_CONFIDENCE: f64 = 0.6;

/// Outcome-quality thresholds splitting the evidence into high and low sets;
/// records between them carry no optimization signal.
const HIGH_QUALITY_THRESHOLD: f64 = 75.0;
const LOW_QUALITY_THRESHOLD: f64 = 40.0;

/// What a batch optimization pass steers toward. The target picks the scalar
/// by which outcomes are split into high- and low-quality evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationTarget {
    /// Blend of outcome classification and feedback ratings.
    Compatibility,
    /// Outcome classification alone (excellent/good vs poor/failed).
    SuccessRate,
    /// Feedback ratings alone.
    Satisfaction,
}

impl Default for OptimizationTarget {
    fn default() -> Self {
        OptimizationTarget::SuccessRate
    }
}

impl std::str::FromStr for OptimizationTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compatibility" => Ok(OptimizationTarget::Compatibility),
            "success_rate" => Ok(OptimizationTarget::SuccessRate),
            "satisfaction" => Ok(OptimizationTarget::Satisfaction),
            other => Err(format!("unknown optimization target: {}", other)),
        }
    }
}

/// Per-member learning counters, maintained copy-on-write in a TTL cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLearningData {
    pub member_id: String,
    pub outcomes_recorded: u32,
    pub high_outcomes: u32,
    pub low_outcomes: u32,
    pub mean_prediction_error: f64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Acknowledgement returned after an outcome is recorded.
#[derive(Debug, Clone)]
pub struct RecordedOutcome {
    pub match_id: String,
    pub outcome: OutcomeClass,
    pub prediction_error: u8,
}

/// Result of one batch weight-optimization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub zone: String,
    pub target: OptimizationTarget,
    #[serde(rename = "sampleSize")]
    pub sample_size: usize,
    pub confidence: f64,
    pub committed: bool,
    pub weights: DimensionWeights,
    pub version: Option<u32>,
}

/// Learning boundary. The heuristic implementation contrasts sub-score means
/// of high- and low-outcome pairings; a trained model could sit behind the
/// same trait later.
#[async_trait]
pub trait OutcomeLearner: Send + Sync {
    async fn record_outcome(
        &self,
        request: &RecordOutcomeRequest,
    ) -> Result<RecordedOutcome, MatchingError>;

    async fn record_engagement(
        &self,
        request: &RecordEngagementRequest,
    ) -> Result<MatchStage, MatchingError>;

    async fn optimize_weights(
        &self,
        zone: &str,
        target: OptimizationTarget,
    ) -> Result<OptimizationReport, MatchingError>;
}

pub struct HeuristicLearner {
    store: Arc<dyn ProfileStore>,
    weight_cache: Arc<SnapshotCache<RegionWeightProfile>>,
    learning_cache: SnapshotCache<MemberLearningData>,
    /// How far back outcomes are considered for optimization.
    lookback: chrono::Duration,
}

impl HeuristicLearner {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        weight_cache: Arc<SnapshotCache<RegionWeightProfile>>,
        cache_capacity: u64,
        cache_ttl: Duration,
        lookback_days: i64,
    ) -> Self {
        Self {
            store,
            weight_cache,
            learning_cache: SnapshotCache::new(cache_capacity, cache_ttl),
            lookback: chrono::Duration::days(lookback_days),
        }
    }

    async fn profile_or_default(&self, member_id: &str) -> CompatibilityProfile {
        match self.store.get_profile(member_id).await {
            Ok(Some(document)) => document.into_profile(),
            _ => ProfileDocument {
                member_id: member_id.to_string(),
                ..Default::default()
            }
            .into_profile(),
        }
    }

    /// Copy-on-write counter update: read the snapshot, build a fresh value,
    /// replace the entry whole.
    async fn update_learning_counters(&self, member_id: &str, outcome: OutcomeClass, error: u8) {
        let key = CacheKey::member_learning(member_id);
        let previous = self.learning_cache.get(&key).await;

        let mut data = previous.as_deref().cloned().unwrap_or(MemberLearningData {
            member_id: member_id.to_string(),
            outcomes_recorded: 0,
            high_outcomes: 0,
            low_outcomes: 0,
            mean_prediction_error: 0.0,
            updated_at: chrono::Utc::now(),
        });

        let n = data.outcomes_recorded as f64;
        data.mean_prediction_error = (data.mean_prediction_error * n + error as f64) / (n + 1.0);
        data.outcomes_recorded += 1;
        if outcome.is_high() {
            data.high_outcomes += 1;
        }
        if outcome.is_low() {
            data.low_outcomes += 1;
        }
        data.updated_at = chrono::Utc::now();

        self.learning_cache.put(key, data).await;
    }

    pub async fn learning_snapshot(&self, member_id: &str) -> Option<Arc<MemberLearningData>> {
        self.learning_cache
            .get(&CacheKey::member_learning(member_id))
            .await
    }
}

fn features_from_sub_scores(sub: &SubScores) -> LearningFeatures {
    LearningFeatures {
        cultural_depth_similarity: sub.cultural_harmony,
        saudade_resonance: sub.saudade_resonance,
        lifestyle_alignment: sub.lifestyle_match,
        regional_proximity: sub.regional_compatibility,
        conversation_quality: sub.conversation_potential,
        value_alignment: sub.shared_values,
    }
}

/// Mean of the two members' own saudade intensity, kept on the outcome record
/// for analytics bucketing.
fn pair_saudade_intensity(a: &CompatibilityProfile, b: &CompatibilityProfile) -> u8 {
    ((saudade_intensity(&a.emotional) as u16 + saudade_intensity(&b.emotional) as u16) / 2) as u8
}

/// Bucket the pair's language preference from average fluency levels.
fn language_bucket(a: &CompatibilityProfile, b: &CompatibilityProfile) -> String {
    let primary = (a.heritage.primary_fluency as f64 + b.heritage.primary_fluency as f64) / 2.0;
    let secondary =
        (a.heritage.secondary_fluency as f64 + b.heritage.secondary_fluency as f64) / 2.0;

    if primary - secondary >= 3.0 {
        "portuguese_dominant".to_string()
    } else if secondary - primary >= 3.0 {
        "english_dominant".to_string()
    } else {
        "balanced".to_string()
    }
}

fn mean_features(records: &[&OutcomeRecord]) -> [f64; 6] {
    if records.is_empty() {
        return [0.0; 6];
    }
    let mut sums = [0.0f64; 6];
    for record in records {
        let f = &record.features;
        sums[0] += f.cultural_depth_similarity as f64;
        sums[1] += f.saudade_resonance as f64;
        sums[2] += f.value_alignment as f64;
        sums[3] += f.lifestyle_alignment as f64;
        sums[4] += f.conversation_quality as f64;
        sums[5] += f.regional_proximity as f64;
    }
    let n = records.len() as f64;
    sums.map(|s| s / n)
}

fn ratio(high: f64, low: f64) -> f64 {
    if low <= f64::EPSILON {
        1.0
    } else {
        high / low
    }
}

/// Mean of the four 1-5 feedback ratings, rescaled to 0-100.
fn satisfaction_score(feedback: &FeedbackRatings) -> f64 {
    let sum = feedback.cultural_connection_rating as f64
        + feedback.communication_quality as f64
        + feedback.expectation_match as f64
        + feedback.recommendation_likelihood as f64;
    (sum / 4.0) * 20.0
}

/// Scalar quality of one resolved outcome under the chosen target.
fn outcome_quality(record: &OutcomeRecord, target: OptimizationTarget) -> f64 {
    match target {
        OptimizationTarget::SuccessRate => record.outcome.success_score() as f64,
        OptimizationTarget::Satisfaction => satisfaction_score(&record.feedback),
        OptimizationTarget::Compatibility => {
            (record.outcome.success_score() as f64 + satisfaction_score(&record.feedback)) / 2.0
        }
    }
}

#[async_trait]
impl OutcomeLearner for HeuristicLearner {
    async fn record_outcome(
        &self,
        request: &RecordOutcomeRequest,
    ) -> Result<RecordedOutcome, MatchingError> {
        let outcome: OutcomeClass = request
            .outcome
            .parse()
            .map_err(MatchingError::InvalidRequest)?;

        let record = self
            .store
            .get_match_prediction(&request.match_id)
            .await?
            .ok_or_else(|| {
                MatchingError::InvalidRequest(format!("unknown match id: {}", request.match_id))
            })?;

        let predicted = record.prediction.compatibility_score;
        let actual = outcome.success_score();
        let prediction_error = 100 - (actual as i16 - predicted as i16).unsigned_abs().min(100) as u8;

        // Already resolved: acknowledge without writing anything again.
        if record.stage == MatchStage::Resolved {
            return Ok(RecordedOutcome {
                match_id: request.match_id.clone(),
                outcome,
                prediction_error,
            });
        }

        let interaction = self
            .store
            .get_interaction(&request.match_id)
            .await?
            .unwrap_or_default();

        let member_a = self.profile_or_default(&record.member_a).await;
        let member_b = self.profile_or_default(&record.member_b).await;

        let outcome_record = OutcomeRecord {
            match_id: request.match_id.clone(),
            member_a: record.member_a.clone(),
            member_b: record.member_b.clone(),
            interaction,
            progression: ProgressionSnapshot::default(),
            outcome,
            feedback: FeedbackRatings {
                member_ratings: request.member_ratings.clone(),
                cultural_connection_rating: request.cultural_connection_rating,
                communication_quality: request.communication_quality,
                expectation_match: request.expectation_match,
                recommendation_likelihood: request.recommendation_likelihood,
            },
            features: features_from_sub_scores(&record.prediction.sub_scores),
            predicted_score: predicted,
            prediction_error,
            residence_zone: member_a.regional.residence_zone.clone(),
            saudade_intensity: pair_saudade_intensity(&member_a, &member_b),
            distance_km: pair_distance_km(&member_a, &member_b),
            language_bucket: language_bucket(&member_a, &member_b),
            created_at: chrono::Utc::now(),
        };

        self.store.append_outcome_record(&outcome_record).await?;

        if record.stage.can_advance_to(MatchStage::Resolved) {
            self.store
                .set_match_stage(&request.match_id, MatchStage::Resolved)
                .await?;
        }

        self.update_learning_counters(&record.member_a, outcome, prediction_error)
            .await;
        self.update_learning_counters(&record.member_b, outcome, prediction_error)
            .await;

        tracing::info!(
            match_id = %request.match_id,
            outcome = ?outcome,
            prediction_error,
            "outcome recorded"
        );

        Ok(RecordedOutcome {
            match_id: request.match_id.clone(),
            outcome,
            prediction_error,
        })
    }

    async fn record_engagement(
        &self,
        request: &RecordEngagementRequest,
    ) -> Result<MatchStage, MatchingError> {
        let record = self
            .store
            .get_match_prediction(&request.match_id)
            .await?
            .ok_or_else(|| {
                MatchingError::InvalidRequest(format!("unknown match id: {}", request.match_id))
            })?;

        if record.stage == MatchStage::Resolved {
            return Err(MatchingError::InvalidRequest(format!(
                "match {} is already resolved",
                request.match_id
            )));
        }

        self.store
            .record_interaction(&request.match_id, &request.interaction)
            .await?;

        if record.stage.can_advance_to(MatchStage::Engaged) {
            self.store
                .set_match_stage(&request.match_id, MatchStage::Engaged)
                .await?;
        }

        Ok(MatchStage::Engaged)
    }

    async fn optimize_weights(
        &self,
        zone: &str,
        target: OptimizationTarget,
    ) -> Result<OptimizationReport, MatchingError> {
        let since = chrono::Utc::now() - self.lookback;
        let outcomes = self.store.list_outcomes_since(Some(zone), since).await?;

        let high: Vec<&OutcomeRecord> = outcomes
            .iter()
            .filter(|r| outcome_quality(r, target) >= HIGH_QUALITY_THRESHOLD)
            .collect();
        let low: Vec<&OutcomeRecord> = outcomes
            .iter()
            .filter(|r| outcome_quality(r, target) <= LOW_QUALITY_THRESHOLD)
            .collect();

        let sample_size = outcomes.len();
        let confidence = (high.len() as f64 / 100.0).min(0.95);

        let current = self.store.get_region_weight_profile(zone).await?;
        let current_weights = current
            .as_ref()
            .map(|p| p.weights)
            .unwrap_or_default();

        if sample_size < MIN_SAMPLE_SIZE || confidence < MIN_COMMIT_CONFIDENCE {
            tracing::debug!(
                zone,
                sample_size,
                confidence,
                "not enough evidence to re-optimize weights"
            );
            return Ok(OptimizationReport {
                zone: zone.to_string(),
                target,
                sample_size,
                confidence,
                committed: false,
                weights: current_weights,
                version: current.map(|p| p.version),
            });
        }

        let high_means = mean_features(&high);
        let low_means = mean_features(&low);
        let baseline = DimensionWeights::default();

        let proposed = DimensionWeights {
            cultural_harmony: baseline.cultural_harmony * ratio(high_means[0], low_means[0]),
            saudade_resonance: baseline.saudade_resonance * ratio(high_means[1], low_means[1]),
            shared_values: baseline.shared_values * ratio(high_means[2], low_means[2]),
            lifestyle_match: baseline.lifestyle_match * ratio(high_means[3], low_means[3]),
            conversation_potential: baseline.conversation_potential
                * ratio(high_means[4], low_means[4]),
            regional_compatibility: baseline.regional_compatibility
                * ratio(high_means[5], low_means[5]),
        }
        .normalized();

        if !proposed.within_drift_rail(&baseline, WEIGHT_DRIFT_TOLERANCE) {
            return Err(MatchingError::WeightDriftRejected {
                zone: zone.to_string(),
                detail: format!(
                    "proposed weights leave the ±{:.0}% rail around the baseline",
                    WEIGHT_DRIFT_TOLERANCE * 100.0
                ),
            });
        }

        let version = current.map(|p| p.version + 1).unwrap_or(1);

        let profile = RegionWeightProfile {
            zone: zone.to_string(),
            version,
            weights: proposed,
            demographics: Default::default(),
            success_patterns: success_patterns(&high_means, high.len(), sample_size),
            sample_size: high.len(),
            created_at: chrono::Utc::now(),
        };

        self.store.put_region_weight_profile(&profile).await?;
        self.weight_cache
            .put(CacheKey::zone_weights(zone), profile)
            .await;

        tracing::info!(zone, version, confidence, ?target, "zone weights re-optimized");

        Ok(OptimizationReport {
            zone: zone.to_string(),
            target,
            sample_size,
            confidence,
            committed: true,
            weights: proposed,
            version: Some(version),
        })
    }
}

/// Describe the strongest signals among high-outcome pairings.
fn success_patterns(high_means: &[f64; 6], high_count: usize, total: usize) -> Vec<SuccessPattern> {
    const FACTORS: [&str; 6] = [
        "cultural_depth_similarity",
        "saudade_resonance",
        "value_alignment",
        "lifestyle_alignment",
        "conversation_quality",
        "regional_proximity",
    ];

    let mut indexed: Vec<(usize, f64)> =
        high_means.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let top: Vec<String> = indexed
        .iter()
        .take(3)
        .map(|(i, _)| FACTORS[*i].to_string())
        .collect();

    vec![SuccessPattern {
        description: "Factors most pronounced among successful pairings".to_string(),
        factors: top,
        success_rate: if total > 0 {
            high_count as f64 / total as f64
        } else {
            0.0
        },
    }]
}
