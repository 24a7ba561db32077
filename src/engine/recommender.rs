use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use uuid::Uuid;

use crate::core::{build_prediction, match_reason, pair_distance_km, CompatibilityScorer};
use crate::error::MatchingError;
use crate::models::{
    AnalyzeOptions, AnalyzeRequest, AnalyzeResponse, CompatibilityProfile, DimensionWeights,
    FindMatchesRequest, FindMatchesResponse, MatchPrediction, MatchPredictionRecord, MatchStage,
    RankedMatch, RegionWeightProfile,
};
use crate::services::{
    CacheKey, CandidateFilter, ProfileStore, RecommendationSummary, SnapshotCache,
};

const MIN_CONFIDENCE: f64 = 0.6;
const MAX_RESULTS_CAP: u16 = 50;

/// Orchestrates pairwise analysis and batch recommendations over the store.
pub struct RecommendationEngine {
    store: Arc<dyn ProfileStore>,
    weight_cache: Arc<SnapshotCache<RegionWeightProfile>>,
    /// Concurrent candidate evaluations per batch.
    max_concurrency: usize,
    /// Per-candidate budget for store writes during a batch.
    candidate_timeout: Duration,
    /// Hard cap on the candidate pool.
    pool_cap: usize,
}

struct EvaluatedCandidate {
    match_id: String,
    candidate_id: String,
    candidate_zone: String,
    prediction: MatchPrediction,
    confidence: f64,
}

impl RecommendationEngine {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        weight_cache: Arc<SnapshotCache<RegionWeightProfile>>,
        max_concurrency: usize,
        candidate_timeout: Duration,
        pool_cap: usize,
    ) -> Self {
        Self {
            store,
            weight_cache,
            max_concurrency: max_concurrency.max(1),
            candidate_timeout,
            pool_cap: pool_cap.clamp(1, 100),
        }
    }

    /// Active weights for a zone: cache, then store, then the baseline.
    async fn resolve_weights(&self, zone: &str) -> DimensionWeights {
        let key = CacheKey::zone_weights(zone);
        if let Some(profile) = self.weight_cache.get(&key).await {
            return profile.weights;
        }
        match self.store.get_region_weight_profile(zone).await {
            Ok(Some(profile)) => {
                let weights = profile.weights;
                self.weight_cache.put(key, profile).await;
                weights
            }
            Ok(None) => DimensionWeights::default(),
            Err(err) => {
                tracing::warn!(zone, error = %err, "weight lookup failed, using defaults");
                DimensionWeights::default()
            }
        }
    }

    async fn load_profile(&self, member_id: &str) -> Result<CompatibilityProfile, MatchingError> {
        let document = self
            .store
            .get_profile(member_id)
            .await?
            .ok_or_else(|| MatchingError::ProfileNotFound(member_id.to_string()))?;
        Ok(document.into_profile())
    }

    /// Analyze one pairing and persist the resulting prediction.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, MatchingError> {
        if request.member_a == request.member_b {
            return Err(MatchingError::InvalidRequest(
                "cannot analyze a member against themselves".to_string(),
            ));
        }

        let a = self.load_profile(&request.member_a).await?;
        let b = self.load_profile(&request.member_b).await?;

        // One weight set per pairing: averaging the two zones' weights keeps
        // analysis symmetric across zone boundaries.
        let weights_a = self.resolve_weights(&a.regional.residence_zone).await;
        let weights_b = self.resolve_weights(&b.regional.residence_zone).await;
        let scorer = CompatibilityScorer::new(weights_a.mean(&weights_b));

        let (overall, sub) = scorer.evaluate(&a, &b, &request.options);
        let distance_km = pair_distance_km(&a, &b);
        let prediction = build_prediction(&a, &b, overall, sub, distance_km);

        let match_id = Uuid::new_v4().to_string();
        let record = MatchPredictionRecord {
            match_id: match_id.clone(),
            member_a: a.member_id.clone(),
            member_b: b.member_id.clone(),
            prediction: prediction.clone(),
            stage: MatchStage::Proposed,
            created_at: chrono::Utc::now(),
        };
        if let Err(err) = self.store.append_match_prediction(&record).await {
            tracing::warn!(match_id = %match_id, error = %err, "prediction append failed");
        }

        Ok(AnalyzeResponse {
            match_id,
            member_a: a.member_id,
            member_b: b.member_id,
            prediction,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Produce a ranked, confidence-filtered recommendation batch.
    ///
    /// An empty result is a valid success. Candidate failures and analytics
    /// write failures never fail the batch.
    pub async fn find_matches(
        &self,
        request: &FindMatchesRequest,
    ) -> Result<FindMatchesResponse, MatchingError> {
        let max_results = request.max_results.clamp(1, MAX_RESULTS_CAP) as usize;

        let requester_doc = self
            .store
            .get_profile(&request.member_id)
            .await?
            .ok_or_else(|| MatchingError::ProfileNotFound(request.member_id.clone()))?;
        if !requester_doc.is_complete() {
            return Err(MatchingError::ProfileIncomplete(request.member_id.clone()));
        }
        let requester = Arc::new(requester_doc.into_profile());
        let requester_completeness = requester.completeness();

        let filter = CandidateFilter {
            exclude_member_id: request.member_id.clone(),
            age_range: request.age_range,
            limit: self.pool_cap,
        };
        let candidates = self.store.query_candidates(&filter).await?;
        let total_evaluated = candidates.len();

        let weights = self.resolve_weights(&requester.regional.residence_zone).await;
        let scorer = Arc::new(CompatibilityScorer::new(weights));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let options = AnalyzeOptions::default();

        let mut handles = Vec::with_capacity(candidates.len());
        for candidate_doc in candidates {
            let requester = Arc::clone(&requester);
            let scorer = Arc::clone(&scorer);
            let semaphore = Arc::clone(&semaphore);
            let store = Arc::clone(&self.store);
            let candidate_timeout = self.candidate_timeout;

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                let candidate = candidate_doc.into_profile();
                let candidate_id = candidate.member_id.clone();
                let candidate_zone = candidate.regional.residence_zone.clone();

                let (overall, sub) = scorer.evaluate(&requester, &candidate, &options);
                let distance_km = pair_distance_km(&requester, &candidate);
                let prediction =
                    build_prediction(&requester, &candidate, overall, sub, distance_km);

                let match_id = Uuid::new_v4().to_string();
                let record = MatchPredictionRecord {
                    match_id: match_id.clone(),
                    member_a: requester.member_id.clone(),
                    member_b: candidate_id.clone(),
                    prediction: prediction.clone(),
                    stage: MatchStage::Proposed,
                    created_at: chrono::Utc::now(),
                };
                match timeout(candidate_timeout, store.append_match_prediction(&record)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        tracing::warn!(
                            candidate = %candidate_id,
                            error = %err,
                            "prediction append failed, keeping candidate"
                        );
                    }
                    Err(_) => {
                        tracing::warn!(
                            candidate = %candidate_id,
                            "store write timed out, excluding candidate"
                        );
                        return None;
                    }
                }

                let confidence = recommendation_confidence(&prediction, requester_completeness);
                Some(EvaluatedCandidate {
                    match_id,
                    candidate_id,
                    candidate_zone,
                    prediction,
                    confidence,
                })
            }));
        }

        let mut evaluated = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Some(candidate)) => evaluated.push(candidate),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "candidate evaluation task failed");
                }
            }
        }

        let requester_zone = requester.regional.residence_zone.clone();
        let mut passing: Vec<EvaluatedCandidate> = evaluated
            .into_iter()
            .filter(|c| {
                c.prediction.compatibility_score >= request.min_compatibility_score
                    && c.confidence >= MIN_CONFIDENCE
            })
            .collect();

        passing.sort_by(|a, b| {
            let rank_a = rank_score(a);
            let rank_b = rank_score(b);
            rank_b
                .partial_cmp(&rank_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    if request.prioritize_regional {
                        let a_local = a.candidate_zone == requester_zone;
                        let b_local = b.candidate_zone == requester_zone;
                        b_local.cmp(&a_local)
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
        });
        passing.truncate(max_results);

        let matches: Vec<RankedMatch> = passing
            .into_iter()
            .map(|c| RankedMatch {
                match_id: c.match_id,
                candidate_id: c.candidate_id,
                reason: match_reason(&c.prediction.sub_scores),
                confidence: c.confidence,
                prediction: c.prediction,
            })
            .collect();

        // One summary per batch run; an all-filtered batch is still signal.
        let summary = RecommendationSummary {
            member_id: request.member_id.clone(),
            recommendation_count: matches.len(),
            avg_compatibility_score: if matches.is_empty() {
                0.0
            } else {
                matches
                    .iter()
                    .map(|m| m.prediction.compatibility_score as f64)
                    .sum::<f64>()
                    / matches.len() as f64
            },
            avg_confidence: if matches.is_empty() {
                0.0
            } else {
                matches.iter().map(|m| m.confidence).sum::<f64>() / matches.len() as f64
            },
            created_at: chrono::Utc::now(),
        };
        if let Err(err) = self.store.append_recommendation_summary(&summary).await {
            tracing::warn!(error = %err, "batch analytics append failed");
        }

        Ok(FindMatchesResponse {
            total_results: matches.len(),
            total_evaluated,
            matches,
        })
    }
}

fn rank_score(candidate: &EvaluatedCandidate) -> f64 {
    candidate.prediction.compatibility_score as f64 * 0.7 + candidate.confidence * 100.0 * 0.3
}

/// Confidence in a recommendation: strong scores and a complete requester
/// profile raise it; capped at 0.95.
fn recommendation_confidence(prediction: &MatchPrediction, requester_completeness: u8) -> f64 {
    let mut confidence = 0.5;
    if prediction.compatibility_score > 80 {
        confidence += 0.2;
    }
    if prediction.sub_scores.cultural_harmony > 85 {
        confidence += 0.15;
    }
    if prediction.sub_scores.conversation_potential > 75 {
        confidence += 0.1;
    }
    confidence += (requester_completeness as f64 / 100.0) * 0.15;
    confidence.min(0.95)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubScores, SuccessIndicators};

    fn prediction(score: u8, harmony: u8, conversation: u8) -> MatchPrediction {
        MatchPrediction {
            compatibility_score: score,
            sub_scores: SubScores {
                cultural_harmony: harmony,
                saudade_resonance: 70,
                shared_values: 70,
                lifestyle_match: 70,
                conversation_potential: conversation,
                regional_compatibility: 70,
            },
            relationship_longevity: 70,
            reasoning: Default::default(),
            success_indicators: SuccessIndicators {
                short_term: 70,
                medium_term: 65,
                long_term: 60,
            },
        }
    }

    #[test]
    fn test_confidence_accumulates_and_caps() {
        let weak = recommendation_confidence(&prediction(60, 60, 60), 0);
        assert!((weak - 0.5).abs() < 1e-9);

        let strong = recommendation_confidence(&prediction(90, 90, 90), 100);
        assert!((strong - 0.95).abs() < 1e-9);

        let mid = recommendation_confidence(&prediction(85, 60, 60), 100);
        assert!((mid - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_rank_blends_score_and_confidence() {
        let high_score = EvaluatedCandidate {
            match_id: "m1".to_string(),
            candidate_id: "a".to_string(),
            candidate_zone: "camden".to_string(),
            prediction: prediction(90, 60, 60),
            confidence: 0.6,
        };
        let high_confidence = EvaluatedCandidate {
            match_id: "m2".to_string(),
            candidate_id: "b".to_string(),
            candidate_zone: "camden".to_string(),
            prediction: prediction(80, 60, 60),
            confidence: 0.95,
        };
        // 90*0.7 + 60*0.3 = 81 vs 80*0.7 + 95*0.3 = 84.5
        assert!(rank_score(&high_confidence) > rank_score(&high_score));
    }
}
