use serde::{Deserialize, Serialize};

/// The six scored dimensions of a pairing, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    #[serde(rename = "culturalHarmony")]
    pub cultural_harmony: u8,
    #[serde(rename = "saudadeResonance")]
    pub saudade_resonance: u8,
    #[serde(rename = "sharedValues")]
    pub shared_values: u8,
    #[serde(rename = "lifestyleMatch")]
    pub lifestyle_match: u8,
    #[serde(rename = "conversationPotential")]
    pub conversation_potential: u8,
    #[serde(rename = "regionalCompatibility")]
    pub regional_compatibility: u8,
}

/// Structured reasoning attached to a prediction. Text is short and
/// presentation-agnostic; the client renders and localizes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchReasoning {
    pub strengths: Vec<String>,
    #[serde(rename = "potentialChallenges")]
    pub potential_challenges: Vec<String>,
    #[serde(rename = "conversationStarters")]
    pub conversation_starters: Vec<String>,
    #[serde(rename = "sharedExperiences")]
    pub shared_experiences: Vec<String>,
    #[serde(rename = "culturalActivities")]
    pub cultural_activities: Vec<String>,
    #[serde(rename = "culturalFactors")]
    pub cultural_factors: Vec<String>,
    #[serde(rename = "emotionalFactors")]
    pub emotional_factors: Vec<String>,
    #[serde(rename = "practicalFactors")]
    pub practical_factors: Vec<String>,
    #[serde(rename = "growthPotential")]
    pub growth_potential: Vec<String>,
}

/// Success probability bands, bounded by fixed ceilings (95/90/85).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessIndicators {
    /// First month.
    #[serde(rename = "shortTerm")]
    pub short_term: u8,
    /// Six months.
    #[serde(rename = "mediumTerm")]
    pub medium_term: u8,
    /// One year and beyond.
    #[serde(rename = "longTerm")]
    pub long_term: u8,
}

/// Immutable result of one pairwise evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    #[serde(rename = "relationshipLongevity")]
    pub relationship_longevity: u8,
    pub reasoning: MatchReasoning,
    #[serde(rename = "successIndicators")]
    pub success_indicators: SuccessIndicators,
}

/// Progress of a produced match through its lifecycle. Forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStage {
    Proposed,
    Engaged,
    Resolved,
}

impl MatchStage {
    pub fn can_advance_to(self, next: MatchStage) -> bool {
        matches!(
            (self, next),
            (MatchStage::Proposed, MatchStage::Engaged)
                | (MatchStage::Proposed, MatchStage::Resolved)
                | (MatchStage::Engaged, MatchStage::Resolved)
        )
    }
}

/// A prediction as persisted: the pairing, the stage, and the immutable
/// prediction body. Append-only; idempotent per pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPredictionRecord {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "memberA")]
    pub member_a: String,
    #[serde(rename = "memberB")]
    pub member_b: String,
    pub prediction: MatchPrediction,
    pub stage: MatchStage,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions_forward_only() {
        assert!(MatchStage::Proposed.can_advance_to(MatchStage::Engaged));
        assert!(MatchStage::Proposed.can_advance_to(MatchStage::Resolved));
        assert!(MatchStage::Engaged.can_advance_to(MatchStage::Resolved));

        assert!(!MatchStage::Engaged.can_advance_to(MatchStage::Proposed));
        assert!(!MatchStage::Resolved.can_advance_to(MatchStage::Engaged));
        assert!(!MatchStage::Resolved.can_advance_to(MatchStage::Proposed));
        assert!(!MatchStage::Resolved.can_advance_to(MatchStage::Resolved));
    }
}
