use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::models::outcome::InteractionMetrics;

/// Options for a single-pair analysis. All dimensions run by default; a
/// skipped dimension contributes its neutral score instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    #[serde(default = "default_true", rename = "includeSaudadeAnalysis")]
    pub include_saudade_analysis: bool,
    #[serde(default = "default_true", rename = "includeConversationPrediction")]
    pub include_conversation_prediction: bool,
    #[serde(default = "default_true", rename = "includeRegionalFactors")]
    pub include_regional_factors: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            include_saudade_analysis: true,
            include_conversation_prediction: true,
            include_regional_factors: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Request to analyze one pairing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "member_a", rename = "memberA")]
    pub member_a: String,
    #[validate(length(min = 1))]
    #[serde(alias = "member_b", rename = "memberB")]
    pub member_b: String,
    #[serde(default)]
    pub options: AnalyzeOptions,
}

/// Request to produce a ranked recommendation batch for one member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "member_id", rename = "memberId")]
    pub member_id: String,
    #[serde(default = "default_max_results", rename = "maxResults")]
    pub max_results: u16,
    #[serde(default = "default_min_score", rename = "minCompatibilityScore")]
    pub min_compatibility_score: u8,
    /// Inclusive [min, max] age bounds for candidates.
    #[serde(default, rename = "ageRange")]
    pub age_range: Option<(u8, u8)>,
    /// Weight same-zone candidates more heavily when truncating the pool.
    #[serde(default, rename = "prioritizeRegional")]
    pub prioritize_regional: bool,
}

fn default_max_results() -> u16 {
    10
}

fn default_min_score() -> u8 {
    70
}

/// Feedback submitted when a realized pairing is rated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordOutcomeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "match_id", rename = "matchId")]
    pub match_id: String,
    /// One of: excellent, good, moderate, poor, failed.
    #[validate(length(min = 1))]
    pub outcome: String,
    /// Per-member 1-5 rating of the pairing.
    #[serde(default, rename = "memberRatings")]
    pub member_ratings: HashMap<String, u8>,
    #[serde(default = "default_rating", rename = "culturalConnectionRating")]
    pub cultural_connection_rating: u8,
    #[serde(default = "default_rating", rename = "communicationQuality")]
    pub communication_quality: u8,
    #[serde(default = "default_rating", rename = "expectationMatch")]
    pub expectation_match: u8,
    #[serde(default = "default_rating", rename = "recommendationLikelihood")]
    pub recommendation_likelihood: u8,
}

fn default_rating() -> u8 {
    3
}

/// Interaction metrics reported while a pairing is active. Advances the match
/// record from proposed to engaged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordEngagementRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "match_id", rename = "matchId")]
    pub match_id: String,
    #[serde(default)]
    pub interaction: InteractionMetrics,
}
