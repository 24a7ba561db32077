use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Five-point classification of how a realized pairing turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeClass {
    Excellent,
    Good,
    Moderate,
    Poor,
    Failed,
}

impl OutcomeClass {
    /// Fixed mapping from classification to a numeric actual-success value,
    /// comparable with predicted compatibility scores.
    pub fn success_score(self) -> u8 {
        match self {
            OutcomeClass::Excellent => 90,
            OutcomeClass::Good => 75,
            OutcomeClass::Moderate => 60,
            OutcomeClass::Poor => 40,
            OutcomeClass::Failed => 20,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, OutcomeClass::Excellent | OutcomeClass::Good)
    }

    pub fn is_low(self) -> bool {
        matches!(self, OutcomeClass::Poor | OutcomeClass::Failed)
    }
}

impl std::str::FromStr for OutcomeClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excellent" => Ok(OutcomeClass::Excellent),
            "good" => Ok(OutcomeClass::Good),
            "moderate" => Ok(OutcomeClass::Moderate),
            "poor" => Ok(OutcomeClass::Poor),
            "failed" => Ok(OutcomeClass::Failed),
            other => Err(format!("unknown outcome classification: {}", other)),
        }
    }
}

/// Observed interaction metrics for an engaged pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionMetrics {
    #[serde(rename = "messageFrequency")]
    pub message_frequency: f64,
    #[serde(rename = "responseTimeAvgSecs")]
    pub response_time_avg_secs: f64,
    #[serde(rename = "conversationDepth")]
    pub conversation_depth: u8,
    #[serde(rename = "culturalReferences")]
    pub cultural_references: u32,
    #[serde(rename = "meetupFrequency")]
    pub meetup_frequency: f64,
}

impl Default for InteractionMetrics {
    fn default() -> Self {
        Self {
            message_frequency: 0.0,
            response_time_avg_secs: 0.0,
            conversation_depth: 0,
            cultural_references: 0,
            meetup_frequency: 0.0,
        }
    }
}

/// Snapshot of how far the relationship progressed, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    #[serde(rename = "initialInterest")]
    pub initial_interest: u8,
    #[serde(rename = "sustainedEngagement")]
    pub sustained_engagement: u8,
    #[serde(rename = "meetingSuccess")]
    pub meeting_success: u8,
    #[serde(rename = "relationshipSatisfaction")]
    pub relationship_satisfaction: u8,
    #[serde(rename = "culturalBonding")]
    pub cultural_bonding: u8,
}

impl Default for ProgressionSnapshot {
    fn default() -> Self {
        // Neutral mid-range snapshot used when no progression data was
        // recorded before the pairing was rated.
        Self {
            initial_interest: 75,
            sustained_engagement: 60,
            meeting_success: 50,
            relationship_satisfaction: 60,
            cultural_bonding: 65,
        }
    }
}

/// Subjective ratings submitted alongside an outcome classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRatings {
    /// Per-member 1-5 rating of the pairing.
    #[serde(rename = "memberRatings")]
    pub member_ratings: HashMap<String, u8>,
    #[serde(rename = "culturalConnectionRating")]
    pub cultural_connection_rating: u8,
    #[serde(rename = "communicationQuality")]
    pub communication_quality: u8,
    #[serde(rename = "expectationMatch")]
    pub expectation_match: u8,
    #[serde(rename = "recommendationLikelihood")]
    pub recommendation_likelihood: u8,
}

/// Feature vector derived at resolution time, consumed in aggregate by the
/// learning engine when contrasting high- and low-outcome pairings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningFeatures {
    #[serde(rename = "culturalDepthSimilarity")]
    pub cultural_depth_similarity: u8,
    #[serde(rename = "saudadeResonance")]
    pub saudade_resonance: u8,
    #[serde(rename = "lifestyleAlignment")]
    pub lifestyle_alignment: u8,
    #[serde(rename = "regionalProximity")]
    pub regional_proximity: u8,
    #[serde(rename = "conversationQuality")]
    pub conversation_quality: u8,
    #[serde(rename = "valueAlignment")]
    pub value_alignment: u8,
}

/// Immutable record linking a realized pairing to its outcome. Created once,
/// when the pairing is rated; superseded only by nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "memberA")]
    pub member_a: String,
    #[serde(rename = "memberB")]
    pub member_b: String,
    pub interaction: InteractionMetrics,
    pub progression: ProgressionSnapshot,
    pub outcome: OutcomeClass,
    pub feedback: FeedbackRatings,
    pub features: LearningFeatures,
    /// The compatibility score the engine predicted for this pairing.
    #[serde(rename = "predictedScore")]
    pub predicted_score: u8,
    /// 100 - |actual - predicted|; higher is a better prediction.
    #[serde(rename = "predictionError")]
    pub prediction_error: u8,
    /// Residence zone of the requesting member at prediction time, kept for
    /// regional aggregation.
    #[serde(rename = "residenceZone")]
    pub residence_zone: String,
    /// Mean saudade intensity of the two members at resolution time, driving
    /// the analytics intensity buckets.
    #[serde(rename = "saudadeIntensity")]
    pub saudade_intensity: u8,
    /// Language-preference bucket of the pair at resolution time
    /// (portuguese_dominant / balanced / english_dominant).
    #[serde(rename = "languageBucket")]
    pub language_bucket: String,
    /// Haversine distance between the pair at prediction time, km.
    #[serde(rename = "distanceKm")]
    pub distance_km: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
