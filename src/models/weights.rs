use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-dimension weights used by the scorer. Always normalized so the six
/// values sum to exactly 1.0 before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    #[serde(rename = "culturalHarmony")]
    pub cultural_harmony: f64,
    #[serde(rename = "saudadeResonance")]
    pub saudade_resonance: f64,
    #[serde(rename = "sharedValues")]
    pub shared_values: f64,
    #[serde(rename = "lifestyleMatch")]
    pub lifestyle_match: f64,
    #[serde(rename = "conversationPotential")]
    pub conversation_potential: f64,
    #[serde(rename = "regionalCompatibility")]
    pub regional_compatibility: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            cultural_harmony: 0.25,
            saudade_resonance: 0.20,
            shared_values: 0.18,
            lifestyle_match: 0.15,
            conversation_potential: 0.12,
            regional_compatibility: 0.10,
        }
    }
}

impl DimensionWeights {
    pub fn sum(&self) -> f64 {
        self.cultural_harmony
            + self.saudade_resonance
            + self.shared_values
            + self.lifestyle_match
            + self.conversation_potential
            + self.regional_compatibility
    }

    /// Rescale so the weights sum to exactly 1.0. A zero-sum set falls back
    /// to the defaults rather than dividing by zero.
    pub fn normalized(&self) -> Self {
        let sum = self.sum();
        if sum <= f64::EPSILON {
            return Self::default();
        }
        Self {
            cultural_harmony: self.cultural_harmony / sum,
            saudade_resonance: self.saudade_resonance / sum,
            shared_values: self.shared_values / sum,
            lifestyle_match: self.lifestyle_match / sum,
            conversation_potential: self.conversation_potential / sum,
            regional_compatibility: self.regional_compatibility / sum,
        }
    }

    /// Element-wise mean of two weight sets. Symmetric in its arguments, so a
    /// cross-zone pairing resolves to one weight set regardless of member
    /// order.
    pub fn mean(&self, other: &Self) -> Self {
        Self {
            cultural_harmony: (self.cultural_harmony + other.cultural_harmony) / 2.0,
            saudade_resonance: (self.saudade_resonance + other.saudade_resonance) / 2.0,
            shared_values: (self.shared_values + other.shared_values) / 2.0,
            lifestyle_match: (self.lifestyle_match + other.lifestyle_match) / 2.0,
            conversation_potential: (self.conversation_potential + other.conversation_potential)
                / 2.0,
            regional_compatibility: (self.regional_compatibility + other.regional_compatibility)
                / 2.0,
        }
    }

    /// Drift safety rail: every weight must stay within `tolerance` (as a
    /// fraction, e.g. 0.5 for ±50%) of the corresponding baseline weight.
    pub fn within_drift_rail(&self, baseline: &DimensionWeights, tolerance: f64) -> bool {
        let pairs = [
            (self.cultural_harmony, baseline.cultural_harmony),
            (self.saudade_resonance, baseline.saudade_resonance),
            (self.shared_values, baseline.shared_values),
            (self.lifestyle_match, baseline.lifestyle_match),
            (self.conversation_potential, baseline.conversation_potential),
            (self.regional_compatibility, baseline.regional_compatibility),
        ];
        pairs.iter().all(|&(w, base)| {
            w >= base * (1.0 - tolerance) - f64::EPSILON && w <= base * (1.0 + tolerance) + f64::EPSILON
        })
    }
}

/// A recurring pattern observed among high-outcome pairings in a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPattern {
    pub description: String,
    pub factors: Vec<String>,
    #[serde(rename = "successRate")]
    pub success_rate: f64,
}

/// Versioned, zone-keyed weight configuration. Created and replaced whole by
/// the learning engine; the scorer only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionWeightProfile {
    pub zone: String,
    pub version: u32,
    pub weights: DimensionWeights,
    /// Age-group preference multipliers and similar demographic context,
    /// carried for regional insight reporting.
    #[serde(default)]
    pub demographics: HashMap<String, f64>,
    #[serde(default, rename = "successPatterns")]
    pub success_patterns: Vec<SuccessPattern>,
    /// Number of resolved outcomes the weights were derived from.
    #[serde(rename = "sampleSize")]
    pub sample_size: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl RegionWeightProfile {
    pub fn baseline(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            version: 0,
            weights: DimensionWeights::default(),
            demographics: HashMap::new(),
            success_patterns: Vec::new(),
            sample_size: 0,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = DimensionWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let weights = DimensionWeights {
            cultural_harmony: 0.30,
            saudade_resonance: 0.25,
            shared_values: 0.20,
            lifestyle_match: 0.15,
            conversation_potential: 0.10,
            regional_compatibility: 0.10,
        };
        assert!((weights.normalized().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weights_fall_back_to_defaults() {
        let zero = DimensionWeights {
            cultural_harmony: 0.0,
            saudade_resonance: 0.0,
            shared_values: 0.0,
            lifestyle_match: 0.0,
            conversation_potential: 0.0,
            regional_compatibility: 0.0,
        };
        assert_eq!(zero.normalized(), DimensionWeights::default());
    }

    #[test]
    fn test_mean_is_symmetric() {
        let base = DimensionWeights::default();
        let skewed = DimensionWeights {
            cultural_harmony: 0.35,
            saudade_resonance: 0.15,
            shared_values: 0.18,
            lifestyle_match: 0.12,
            conversation_potential: 0.10,
            regional_compatibility: 0.10,
        };

        assert_eq!(base.mean(&skewed), skewed.mean(&base));
        assert_eq!(base.mean(&base), base);
        assert!((base.mean(&skewed).cultural_harmony - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_drift_rail() {
        let base = DimensionWeights::default();

        let mut ok = base;
        ok.cultural_harmony = 0.25 * 1.4;
        assert!(ok.within_drift_rail(&base, 0.5));

        let mut too_far = base;
        too_far.cultural_harmony = 0.25 * 1.6;
        assert!(!too_far.within_drift_rail(&base, 0.5));

        let mut too_low = base;
        too_low.regional_compatibility = 0.10 * 0.4;
        assert!(!too_low.within_drift_rail(&base, 0.5));
    }
}
