use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

use crate::models::{
    InteractionMetrics, MatchPredictionRecord, MatchStage, OutcomeRecord, ProfileDocument,
    RegionWeightProfile,
};
use crate::services::store::{
    CandidateFilter, ProfileStore, RecommendationSummary, StoreError,
};

/// In-memory `ProfileStore` used by tests and local development. Supports
/// injected transient failures so retry behavior can be exercised.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, ProfileDocument>>,
    predictions: RwLock<HashMap<String, MatchPredictionRecord>>,
    interactions: RwLock<HashMap<String, InteractionMetrics>>,
    outcomes: RwLock<Vec<OutcomeRecord>>,
    weight_profiles: RwLock<HashMap<String, RegionWeightProfile>>,
    summaries: RwLock<Vec<RecommendationSummary>>,
    failures_remaining: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` store calls fail with a transient error.
    pub fn fail_next(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Transient("injected failure".to_string()));
        }
        Ok(())
    }

    pub async fn outcome_count(&self) -> usize {
        self.outcomes.read().await.len()
    }

    pub async fn summary_count(&self) -> usize {
        self.summaries.read().await.len()
    }
}

fn same_pair(record: &MatchPredictionRecord, a: &str, b: &str) -> bool {
    (record.member_a == a && record.member_b == b)
        || (record.member_a == b && record.member_b == a)
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, member_id: &str) -> Result<Option<ProfileDocument>, StoreError> {
        self.check_failure()?;
        Ok(self.profiles.read().await.get(member_id).cloned())
    }

    async fn upsert_profile(&self, document: &ProfileDocument) -> Result<(), StoreError> {
        self.check_failure()?;
        self.profiles
            .write()
            .await
            .insert(document.member_id.clone(), document.clone());
        Ok(())
    }

    async fn query_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<ProfileDocument>, StoreError> {
        self.check_failure()?;
        let profiles = self.profiles.read().await;
        let mut candidates: Vec<ProfileDocument> = profiles
            .values()
            .filter(|p| p.member_id != filter.exclude_member_id)
            .filter(|p| p.is_active && p.is_verified)
            .filter(|p| match (filter.age_range, p.age) {
                (Some((min, max)), Some(age)) => age >= min && age <= max,
                _ => true,
            })
            .cloned()
            .collect();
        candidates.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        candidates.truncate(filter.limit);
        Ok(candidates)
    }

    async fn append_match_prediction(
        &self,
        record: &MatchPredictionRecord,
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut predictions = self.predictions.write().await;
        // Idempotent per pairing: the first prediction for a pair wins.
        let exists = predictions
            .values()
            .any(|r| same_pair(r, &record.member_a, &record.member_b));
        if !exists {
            predictions.insert(record.match_id.clone(), record.clone());
        }
        Ok(())
    }

    async fn get_match_prediction(
        &self,
        match_id: &str,
    ) -> Result<Option<MatchPredictionRecord>, StoreError> {
        self.check_failure()?;
        Ok(self.predictions.read().await.get(match_id).cloned())
    }

    async fn set_match_stage(&self, match_id: &str, stage: MatchStage) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut predictions = self.predictions.write().await;
        match predictions.get_mut(match_id) {
            Some(record) => {
                record.stage = stage;
                Ok(())
            }
            None => Err(StoreError::Conflict(format!("unknown match: {}", match_id))),
        }
    }

    async fn record_interaction(
        &self,
        match_id: &str,
        metrics: &InteractionMetrics,
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        self.interactions
            .write()
            .await
            .insert(match_id.to_string(), *metrics);
        Ok(())
    }

    async fn get_interaction(
        &self,
        match_id: &str,
    ) -> Result<Option<InteractionMetrics>, StoreError> {
        self.check_failure()?;
        Ok(self.interactions.read().await.get(match_id).copied())
    }

    async fn append_outcome_record(&self, record: &OutcomeRecord) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut outcomes = self.outcomes.write().await;
        // One outcome per match, ever.
        if outcomes.iter().any(|r| r.match_id == record.match_id) {
            return Ok(());
        }
        outcomes.push(record.clone());
        Ok(())
    }

    async fn list_outcomes_since(
        &self,
        zone: Option<&str>,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        self.check_failure()?;
        let outcomes = self.outcomes.read().await;
        let mut matching: Vec<OutcomeRecord> = outcomes
            .iter()
            .filter(|r| r.created_at >= since)
            .filter(|r| zone.map(|z| r.residence_zone == z).unwrap_or(true))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn get_region_weight_profile(
        &self,
        zone: &str,
    ) -> Result<Option<RegionWeightProfile>, StoreError> {
        self.check_failure()?;
        Ok(self.weight_profiles.read().await.get(zone).cloned())
    }

    async fn put_region_weight_profile(
        &self,
        profile: &RegionWeightProfile,
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        let mut profiles = self.weight_profiles.write().await;
        if let Some(existing) = profiles.get(&profile.zone) {
            if existing.version >= profile.version {
                return Err(StoreError::Conflict(format!(
                    "weight profile for {} already at version {}",
                    profile.zone, existing.version
                )));
            }
        }
        profiles.insert(profile.zone.clone(), profile.clone());
        Ok(())
    }

    async fn append_recommendation_summary(
        &self,
        summary: &RecommendationSummary,
    ) -> Result<(), StoreError> {
        self.check_failure()?;
        self.summaries.write().await.push(summary.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.check_failure()?;
        Ok(true)
    }
}
