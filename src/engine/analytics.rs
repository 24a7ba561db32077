use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::MatchingError;
use crate::models::{OutcomeRecord, RegionWeightProfile, SuccessPattern};
use crate::services::{CacheKey, ProfileStore, SnapshotCache};

/// Window over which regional insights aggregate outcomes.
const INSIGHTS_LOOKBACK_DAYS: i64 = 90;

/// Reporting window for the performance endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn duration(self) -> chrono::Duration {
        match self {
            Timeframe::Daily => chrono::Duration::days(1),
            Timeframe::Weekly => chrono::Duration::weeks(1),
            Timeframe::Monthly => chrono::Duration::days(30),
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            other => Err(format!("unknown timeframe: {}", other)),
        }
    }
}

/// Success statistics for one aggregation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BucketStats {
    pub total: usize,
    /// Share of outcomes classified excellent or good.
    #[serde(rename = "successRate")]
    pub success_rate: f64,
}

/// Aggregated matching performance over a timeframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingPerformanceData {
    pub timeframe: Timeframe,
    #[serde(rename = "totalOutcomes")]
    pub total_outcomes: usize,
    #[serde(rename = "successRate")]
    pub success_rate: f64,
    #[serde(rename = "avgPredictedScore")]
    pub avg_predicted_score: f64,
    #[serde(rename = "avgPredictionError")]
    pub avg_prediction_error: f64,
    #[serde(rename = "byZone")]
    pub by_zone: HashMap<String, BucketStats>,
    #[serde(rename = "byDistanceBand")]
    pub by_distance_band: HashMap<String, BucketStats>,
    #[serde(rename = "bySaudadeBucket")]
    pub by_saudade_bucket: HashMap<String, BucketStats>,
    #[serde(rename = "byLanguageBucket")]
    pub by_language_bucket: HashMap<String, BucketStats>,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Zone-level report combining recent outcomes with the active weight profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalMatchingInsights {
    pub zone: String,
    #[serde(rename = "totalOutcomes")]
    pub total_outcomes: usize,
    #[serde(rename = "successRate")]
    pub success_rate: f64,
    #[serde(rename = "avgPredictedScore")]
    pub avg_predicted_score: f64,
    #[serde(rename = "weightVersion")]
    pub weight_version: u32,
    pub weights: crate::models::DimensionWeights,
    #[serde(rename = "successPatterns")]
    pub success_patterns: Vec<SuccessPattern>,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

pub struct PerformanceAnalytics {
    store: Arc<dyn ProfileStore>,
    insights_cache: SnapshotCache<RegionalMatchingInsights>,
}

fn distance_band(km: f64) -> &'static str {
    if km < 5.0 {
        "<5km"
    } else if km < 15.0 {
        "5-15km"
    } else if km < 30.0 {
        "15-30km"
    } else {
        ">30km"
    }
}

fn saudade_bucket(intensity: u8) -> &'static str {
    match intensity {
        0..=30 => "low",
        31..=60 => "moderate",
        61..=80 => "high",
        _ => "very_high",
    }
}

fn success_rate(records: &[&OutcomeRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let high = records.iter().filter(|r| r.outcome.is_high()).count();
    high as f64 / records.len() as f64
}

fn bucket_by<F>(records: &[OutcomeRecord], key: F) -> HashMap<String, BucketStats>
where
    F: Fn(&OutcomeRecord) -> String,
{
    let mut grouped: HashMap<String, Vec<&OutcomeRecord>> = HashMap::new();
    for record in records {
        grouped.entry(key(record)).or_default().push(record);
    }
    grouped
        .into_iter()
        .map(|(bucket, members)| {
            (
                bucket,
                BucketStats {
                    total: members.len(),
                    success_rate: success_rate(&members),
                },
            )
        })
        .collect()
}

impl PerformanceAnalytics {
    pub fn new(store: Arc<dyn ProfileStore>, cache_capacity: u64, cache_ttl: Duration) -> Self {
        Self {
            store,
            insights_cache: SnapshotCache::new(cache_capacity, cache_ttl),
        }
    }

    /// Success-rate breakdown across zones, distance bands, saudade buckets
    /// and language-preference buckets for the requested window.
    pub async fn performance(
        &self,
        timeframe: Timeframe,
    ) -> Result<MatchingPerformanceData, MatchingError> {
        let since = chrono::Utc::now() - timeframe.duration();
        let outcomes = self.store.list_outcomes_since(None, since).await?;

        let all: Vec<&OutcomeRecord> = outcomes.iter().collect();
        let total = outcomes.len();
        let (avg_predicted, avg_error) = if total > 0 {
            let predicted: f64 = outcomes.iter().map(|r| r.predicted_score as f64).sum();
            let error: f64 = outcomes.iter().map(|r| r.prediction_error as f64).sum();
            (predicted / total as f64, error / total as f64)
        } else {
            (0.0, 0.0)
        };

        Ok(MatchingPerformanceData {
            timeframe,
            total_outcomes: total,
            success_rate: success_rate(&all),
            avg_predicted_score: avg_predicted,
            avg_prediction_error: avg_error,
            by_zone: bucket_by(&outcomes, |r| r.residence_zone.clone()),
            by_distance_band: bucket_by(&outcomes, |r| distance_band(r.distance_km).to_string()),
            by_saudade_bucket: bucket_by(&outcomes, |r| {
                saudade_bucket(r.saudade_intensity).to_string()
            }),
            by_language_bucket: bucket_by(&outcomes, |r| r.language_bucket.clone()),
            generated_at: chrono::Utc::now(),
        })
    }

    /// Zone report, served from a TTL cache; a miss rebuilds the report from
    /// recent outcomes and the zone's active weight profile.
    pub async fn regional_insights(
        &self,
        zone: &str,
    ) -> Result<Arc<RegionalMatchingInsights>, MatchingError> {
        let key = CacheKey::region_insights(zone);
        if let Some(cached) = self.insights_cache.get(&key).await {
            return Ok(cached);
        }

        let since = chrono::Utc::now() - chrono::Duration::days(INSIGHTS_LOOKBACK_DAYS);
        let outcomes = self.store.list_outcomes_since(Some(zone), since).await?;
        let refs: Vec<&OutcomeRecord> = outcomes.iter().collect();

        let avg_predicted = if outcomes.is_empty() {
            0.0
        } else {
            outcomes.iter().map(|r| r.predicted_score as f64).sum::<f64>() / outcomes.len() as f64
        };

        let weight_profile = self
            .store
            .get_region_weight_profile(zone)
            .await?
            .unwrap_or_else(|| RegionWeightProfile::baseline(zone));

        let insights = RegionalMatchingInsights {
            zone: zone.to_string(),
            total_outcomes: outcomes.len(),
            success_rate: success_rate(&refs),
            avg_predicted_score: avg_predicted,
            weight_version: weight_profile.version,
            weights: weight_profile.weights,
            success_patterns: weight_profile.success_patterns,
            generated_at: chrono::Utc::now(),
        };

        self.insights_cache.put(key, insights.clone()).await;
        Ok(Arc::new(insights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        FeedbackRatings, InteractionMetrics, LearningFeatures, OutcomeClass, ProgressionSnapshot,
    };

    fn outcome(match_id: &str, zone: &str, km: f64, saudade: u8, class: OutcomeClass) -> OutcomeRecord {
        OutcomeRecord {
            match_id: match_id.to_string(),
            member_a: format!("{}-a", match_id),
            member_b: format!("{}-b", match_id),
            interaction: InteractionMetrics::default(),
            progression: ProgressionSnapshot::default(),
            outcome: class,
            feedback: FeedbackRatings {
                member_ratings: HashMap::new(),
                cultural_connection_rating: 3,
                communication_quality: 3,
                expectation_match: 3,
                recommendation_likelihood: 3,
            },
            features: LearningFeatures {
                cultural_depth_similarity: 80,
                // Deliberately in a different band than the member intensity
                // below: the buckets must follow the members, not the pair.
                saudade_resonance: 95,
                lifestyle_alignment: 70,
                regional_proximity: 75,
                conversation_quality: 70,
                value_alignment: 80,
            },
            predicted_score: 80,
            prediction_error: 90,
            residence_zone: zone.to_string(),
            saudade_intensity: saudade,
            language_bucket: "balanced".to_string(),
            distance_km: km,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_distance_bands() {
        assert_eq!(distance_band(2.0), "<5km");
        assert_eq!(distance_band(5.0), "5-15km");
        assert_eq!(distance_band(22.0), "15-30km");
        assert_eq!(distance_band(55.0), ">30km");
    }

    #[test]
    fn test_saudade_buckets() {
        assert_eq!(saudade_bucket(10), "low");
        assert_eq!(saudade_bucket(45), "moderate");
        assert_eq!(saudade_bucket(80), "high");
        assert_eq!(saudade_bucket(95), "very_high");
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!("weekly".parse::<Timeframe>(), Ok(Timeframe::Weekly));
        assert!("yearly".parse::<Timeframe>().is_err());
    }

    #[tokio::test]
    async fn test_performance_aggregation() {
        use crate::services::MemoryStore;

        let store = Arc::new(MemoryStore::new());
        for (id, zone, km, class) in [
            ("m1", "camden", 3.0, OutcomeClass::Excellent),
            ("m2", "camden", 12.0, OutcomeClass::Failed),
            ("m3", "lambeth", 3.0, OutcomeClass::Good),
        ] {
            store
                .append_outcome_record(&outcome(id, zone, km, 70, class))
                .await
                .unwrap();
        }

        let analytics = PerformanceAnalytics::new(
            store as Arc<dyn ProfileStore>,
            100,
            Duration::from_secs(60),
        );
        let data = analytics.performance(Timeframe::Monthly).await.unwrap();

        assert_eq!(data.total_outcomes, 3);
        assert!((data.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(data.by_zone["camden"].total, 2);
        assert!((data.by_zone["camden"].success_rate - 0.5).abs() < 1e-9);
        assert_eq!(data.by_distance_band["<5km"].total, 2);
        assert_eq!(data.by_saudade_bucket["high"].total, 3);
    }

    #[tokio::test]
    async fn test_regional_insights_cached() {
        use crate::services::MemoryStore;

        let store = Arc::new(MemoryStore::new());
        store
            .append_outcome_record(&outcome("m1", "camden", 3.0, 70, OutcomeClass::Good))
            .await
            .unwrap();

        let analytics = PerformanceAnalytics::new(
            store.clone() as Arc<dyn ProfileStore>,
            100,
            Duration::from_secs(60),
        );

        let first = analytics.regional_insights("camden").await.unwrap();
        assert_eq!(first.total_outcomes, 1);
        assert_eq!(first.weight_version, 0);

        // A second outcome lands, but the cached report is still served.
        store
            .append_outcome_record(&outcome("m2", "camden", 3.0, 70, OutcomeClass::Failed))
            .await
            .unwrap();
        let second = analytics.regional_insights("camden").await.unwrap();
        assert_eq!(second.total_outcomes, 1);
    }
}
