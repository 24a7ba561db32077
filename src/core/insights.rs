use crate::core::matrix::shared_tags;
use crate::models::{
    CompatibilityProfile, MatchPrediction, MatchReasoning, SubScores, SuccessIndicators,
};

const STRENGTH_HARMONY: u8 = 80;
const STRENGTH_SAUDADE: u8 = 85;
const STRENGTH_CONVERSATION: u8 = 75;
const CHALLENGE_DISTANCE_KM: f64 = 20.0;
const CHALLENGE_HERITAGE_GAP: u8 = 30;

/// Threshold-rule reasoning for a scored pairing.
pub fn generate_reasoning(
    a: &CompatibilityProfile,
    b: &CompatibilityProfile,
    sub: &SubScores,
    distance_km: f64,
) -> MatchReasoning {
    let mut reasoning = MatchReasoning::default();

    if sub.cultural_harmony > STRENGTH_HARMONY {
        reasoning.strengths.push("Strong cultural connection".to_string());
        reasoning
            .cultural_factors
            .push("Closely aligned heritage backgrounds".to_string());
    }
    if sub.saudade_resonance > STRENGTH_SAUDADE {
        reasoning.strengths.push("Deep emotional understanding".to_string());
        reasoning
            .emotional_factors
            .push("Shared intensity of saudade".to_string());
    }
    if sub.conversation_potential > STRENGTH_CONVERSATION {
        reasoning
            .strengths
            .push("Excellent communication compatibility".to_string());
    }

    if distance_km > CHALLENGE_DISTANCE_KM {
        reasoning
            .potential_challenges
            .push("Long travel distance between home areas".to_string());
        reasoning
            .practical_factors
            .push(format!("{:.0} km between residences", distance_km));
    }
    let heritage_gap =
        (a.heritage.heritage_strength as i16 - b.heritage.heritage_strength as i16).unsigned_abs();
    if heritage_gap > CHALLENGE_HERITAGE_GAP as u16 {
        reasoning
            .potential_challenges
            .push("Different levels of cultural connection".to_string());
    }

    let shared_regions = shared_tags(&a.heritage.origin_regions, &b.heritage.origin_regions);
    let shared_music = shared_tags(&a.emotional.music_affinities, &b.emotional.music_affinities);
    let shared_practices =
        shared_tags(&a.heritage.cultural_practices, &b.heritage.cultural_practices);

    for region in shared_regions.iter().take(3) {
        reasoning
            .conversation_starters
            .push(format!("Memories of {}", region));
    }
    for music in shared_music.iter().take(3) {
        reasoning
            .conversation_starters
            .push(format!("Shared love of {} music", music));
    }
    reasoning.conversation_starters.truncate(3);

    reasoning
        .shared_experiences
        .extend(shared_practices.iter().take(3).cloned());

    reasoning.cultural_activities = suggest_activities(&shared_practices, &shared_music);

    if overall_hint(sub) > 75 {
        reasoning
            .growth_potential
            .push("High potential for lasting cultural connection".to_string());
    }
    if a.insights.growth_potential > 70 && b.insights.growth_potential > 70 {
        reasoning
            .growth_potential
            .push("Both members show strong potential for cultural growth together".to_string());
    }

    reasoning
}

// Reasoning is generated before the weighted overall is known in some paths;
// a plain mean of sub-scores is close enough for the growth hint.
fn overall_hint(sub: &SubScores) -> u16 {
    let total = sub.cultural_harmony as u16
        + sub.saudade_resonance as u16
        + sub.shared_values as u16
        + sub.lifestyle_match as u16
        + sub.conversation_potential as u16
        + sub.regional_compatibility as u16;
    total / 6
}

fn suggest_activities(shared_practices: &[String], shared_music: &[String]) -> Vec<String> {
    let mut activities = Vec::new();
    for practice in shared_practices.iter().take(2) {
        match practice.as_str() {
            "fado" => activities.push("Attend a fado night together".to_string()),
            "cuisine" => activities.push("Cook a traditional meal together".to_string()),
            "festivals" => activities.push("Visit a community festival together".to_string()),
            "family_gatherings" => {
                activities.push("Join a community family event".to_string())
            }
            other => activities.push(format!("Explore {} together", other)),
        }
    }
    if !shared_music.is_empty() {
        activities.push("Go to a live music evening".to_string());
    }
    if activities.is_empty() {
        activities.push("Explore cultural events together".to_string());
    }
    activities
}

/// Success probability bands. Multipliers accumulate from the strongest
/// signals, and each band is capped by a fixed ceiling.
pub fn success_indicators(overall: u8, sub: &SubScores, distance_km: f64) -> SuccessIndicators {
    let base = overall as f64 / 100.0;

    let mut short = 1.0;
    let mut medium = 1.0;
    let mut long = 1.0;

    if sub.cultural_harmony > STRENGTH_HARMONY {
        short += 0.10;
        medium += 0.15;
        long += 0.20;
    }
    if sub.conversation_potential > STRENGTH_CONVERSATION {
        short += 0.15;
        medium += 0.10;
    }
    if distance_km > CHALLENGE_DISTANCE_KM {
        medium -= 0.10;
        long -= 0.05;
    }

    SuccessIndicators {
        short_term: (base * short * 100.0).round().min(95.0) as u8,
        medium_term: (base * medium * 100.0).round().min(90.0) as u8,
        long_term: (base * long * 100.0).round().min(85.0) as u8,
    }
}

/// Expected relationship longevity (0-95): mean of overall score and cultural
/// harmony, nudged up when either is strong.
pub fn relationship_longevity(overall: u8, cultural_harmony: u8) -> u8 {
    let base = (overall as f64 + cultural_harmony as f64) / 2.0;
    let mut bonus = 0.0;
    if cultural_harmony > 85 {
        bonus += 5.0;
    }
    if overall > 80 {
        bonus += 3.0;
    }
    (base + bonus).round().min(95.0) as u8
}

/// Assemble the full immutable prediction for a pairing.
pub fn build_prediction(
    a: &CompatibilityProfile,
    b: &CompatibilityProfile,
    overall: u8,
    sub: SubScores,
    distance_km: f64,
) -> MatchPrediction {
    let reasoning = generate_reasoning(a, b, &sub, distance_km);
    let indicators = success_indicators(overall, &sub, distance_km);
    let longevity = relationship_longevity(overall, sub.cultural_harmony);

    MatchPrediction {
        compatibility_score: overall,
        sub_scores: sub,
        relationship_longevity: longevity,
        reasoning,
        success_indicators: indicators,
    }
}

/// Headline reason shown on a ranked match: the two strongest signals.
pub fn match_reason(sub: &SubScores) -> String {
    let mut reasons: Vec<&str> = Vec::new();

    if sub.cultural_harmony > 85 {
        reasons.push("Strong cultural connection");
    }
    if sub.saudade_resonance > 80 {
        reasons.push("Deep emotional understanding");
    }
    if sub.conversation_potential > 75 {
        reasons.push("Excellent communication compatibility");
    }
    if sub.regional_compatibility > 80 {
        reasons.push("Great geographical compatibility");
    }

    if reasons.is_empty() {
        return "Good overall compatibility".to_string();
    }
    reasons.truncate(2);
    reasons.join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileDocument;

    fn profile(member_id: &str) -> CompatibilityProfile {
        ProfileDocument {
            member_id: member_id.to_string(),
            ..Default::default()
        }
        .into_profile()
    }

    fn sub(harmony: u8, saudade: u8, conversation: u8, regional: u8) -> SubScores {
        SubScores {
            cultural_harmony: harmony,
            saudade_resonance: saudade,
            shared_values: 70,
            lifestyle_match: 70,
            conversation_potential: conversation,
            regional_compatibility: regional,
        }
    }

    #[test]
    fn test_strength_thresholds() {
        let a = profile("m1");
        let b = profile("m2");
        let reasoning = generate_reasoning(&a, &b, &sub(90, 90, 80, 70), 5.0);

        assert!(reasoning.strengths.iter().any(|s| s.contains("cultural")));
        assert!(reasoning.strengths.iter().any(|s| s.contains("emotional")));
        assert!(reasoning.strengths.iter().any(|s| s.contains("communication")));
        assert!(reasoning.potential_challenges.is_empty());
    }

    #[test]
    fn test_distance_and_heritage_gap_challenges() {
        let a = profile("m1");
        let mut b = profile("m2");
        b.heritage.heritage_strength = 30; // default a is 70, gap 40

        let reasoning = generate_reasoning(&a, &b, &sub(60, 60, 60, 40), 35.0);
        assert_eq!(reasoning.potential_challenges.len(), 2);
    }

    #[test]
    fn test_starters_capped_at_three() {
        let mut a = profile("m1");
        let mut b = profile("m2");
        let regions: Vec<String> =
            ["norte", "centro", "lisboa", "algarve"].iter().map(|s| s.to_string()).collect();
        a.heritage.origin_regions = regions.clone();
        b.heritage.origin_regions = regions;

        let reasoning = generate_reasoning(&a, &b, &sub(90, 90, 80, 70), 5.0);
        assert_eq!(reasoning.conversation_starters.len(), 3);
    }

    #[test]
    fn test_success_bands_respect_ceilings() {
        let indicators = success_indicators(100, &sub(95, 95, 95, 95), 2.0);
        assert_eq!(indicators.short_term, 95);
        assert_eq!(indicators.medium_term, 90);
        assert_eq!(indicators.long_term, 85);
    }

    #[test]
    fn test_distance_challenge_lowers_later_bands() {
        let near = success_indicators(70, &sub(70, 70, 70, 70), 5.0);
        let far = success_indicators(70, &sub(70, 70, 70, 70), 45.0);
        assert_eq!(near.short_term, far.short_term);
        assert!(far.medium_term < near.medium_term);
        assert!(far.long_term < near.long_term);
    }

    #[test]
    fn test_longevity() {
        assert_eq!(relationship_longevity(80, 90), 90); // (80+90)/2 + 5
        assert_eq!(relationship_longevity(85, 90), 95); // 87.5 + 8 capped
        assert_eq!(relationship_longevity(60, 60), 60);
    }

    #[test]
    fn test_match_reason_fallback() {
        assert_eq!(match_reason(&sub(60, 60, 60, 60)), "Good overall compatibility");
        let reason = match_reason(&sub(90, 90, 90, 90));
        assert!(reason.contains(" and "));
    }
}
