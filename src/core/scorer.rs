use crate::core::{
    conversation::conversation_quality, geography::geographic_feasibility,
    heritage::heritage_alignment, lifestyle::lifestyle_match, saudade::saudade_resonance,
    values::shared_values,
};
use crate::models::{AnalyzeOptions, CompatibilityProfile, DimensionWeights, SubScores};

/// Neutral stand-ins used when a dimension is skipped by request.
const NEUTRAL_SAUDADE: u8 = 75;
const NEUTRAL_REGIONAL: u8 = 80;
const NEUTRAL_CONVERSATION: u8 = 70;

/// Weighted pairwise scorer. Holds one normalized weight set; zone-specific
/// weights are handled by constructing a scorer from the zone's profile.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: DimensionWeights,
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self::new(DimensionWeights::default())
    }
}

impl CompatibilityScorer {
    pub fn new(weights: DimensionWeights) -> Self {
        Self {
            weights: weights.normalized(),
        }
    }

    pub fn weights(&self) -> &DimensionWeights {
        &self.weights
    }

    /// Compute the six sub-scores for a pairing.
    pub fn sub_scores(
        &self,
        a: &CompatibilityProfile,
        b: &CompatibilityProfile,
        options: &AnalyzeOptions,
    ) -> SubScores {
        SubScores {
            cultural_harmony: heritage_alignment(&a.heritage, &b.heritage),
            saudade_resonance: if options.include_saudade_analysis {
                saudade_resonance(&a.emotional, &b.emotional)
            } else {
                NEUTRAL_SAUDADE
            },
            shared_values: shared_values(a, b),
            lifestyle_match: lifestyle_match(&a.lifestyle, &b.lifestyle),
            conversation_potential: if options.include_conversation_prediction {
                conversation_quality(a, b)
            } else {
                NEUTRAL_CONVERSATION
            },
            regional_compatibility: if options.include_regional_factors {
                geographic_feasibility(a, b)
            } else {
                NEUTRAL_REGIONAL
            },
        }
    }

    /// Overall weighted score for a pairing, with its sub-scores.
    pub fn evaluate(
        &self,
        a: &CompatibilityProfile,
        b: &CompatibilityProfile,
        options: &AnalyzeOptions,
    ) -> (u8, SubScores) {
        let sub = self.sub_scores(a, b, options);
        (self.combine(&sub), sub)
    }

    /// Weighted combination of already-computed sub-scores.
    pub fn combine(&self, sub: &SubScores) -> u8 {
        let score = sub.cultural_harmony as f64 * self.weights.cultural_harmony
            + sub.saudade_resonance as f64 * self.weights.saudade_resonance
            + sub.shared_values as f64 * self.weights.shared_values
            + sub.lifestyle_match as f64 * self.weights.lifestyle_match
            + sub.conversation_potential as f64 * self.weights.conversation_potential
            + sub.regional_compatibility as f64 * self.weights.regional_compatibility;
        score.round().clamp(0.0, 100.0) as u8
    }
}
