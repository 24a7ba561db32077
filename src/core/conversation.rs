use crate::core::lifestyle::communication_match;
use crate::core::matrix::{similarity, tag_overlap, CompatibilityMatrix};
use crate::core::saudade::{expression_match, saudade_alignment};
use crate::models::{CommunicationStyle, CompatibilityProfile, ExpressionStyle};

/// Humor style, inferred from regional background and communication habits
/// rather than self-reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HumorStyle {
    WarmTraditional,
    DryWitty,
    PlayfulModern,
    Sophisticated,
}

static HUMOR_MATRIX: CompatibilityMatrix<HumorStyle> = CompatibilityMatrix::new(
    &[
        ((HumorStyle::WarmTraditional, HumorStyle::WarmTraditional), 95),
        ((HumorStyle::WarmTraditional, HumorStyle::DryWitty), 70),
        ((HumorStyle::WarmTraditional, HumorStyle::PlayfulModern), 80),
        ((HumorStyle::WarmTraditional, HumorStyle::Sophisticated), 75),
        ((HumorStyle::DryWitty, HumorStyle::DryWitty), 90),
        ((HumorStyle::DryWitty, HumorStyle::PlayfulModern), 75),
        ((HumorStyle::DryWitty, HumorStyle::Sophisticated), 85),
        ((HumorStyle::PlayfulModern, HumorStyle::PlayfulModern), 95),
        ((HumorStyle::PlayfulModern, HumorStyle::Sophisticated), 70),
        ((HumorStyle::Sophisticated, HumorStyle::Sophisticated), 90),
    ],
    70,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConflictStyle {
    FamilyMediated,
    DirectDiscussion,
    GentleApproach,
    TraditionalHierarchy,
}

static CONFLICT_MATRIX: CompatibilityMatrix<ConflictStyle> = CompatibilityMatrix::new(
    &[
        ((ConflictStyle::FamilyMediated, ConflictStyle::FamilyMediated), 95),
        ((ConflictStyle::FamilyMediated, ConflictStyle::DirectDiscussion), 75),
        ((ConflictStyle::FamilyMediated, ConflictStyle::GentleApproach), 85),
        ((ConflictStyle::FamilyMediated, ConflictStyle::TraditionalHierarchy), 80),
        ((ConflictStyle::DirectDiscussion, ConflictStyle::DirectDiscussion), 90),
        ((ConflictStyle::DirectDiscussion, ConflictStyle::GentleApproach), 70),
        ((ConflictStyle::DirectDiscussion, ConflictStyle::TraditionalHierarchy), 65),
        ((ConflictStyle::GentleApproach, ConflictStyle::GentleApproach), 95),
        ((ConflictStyle::GentleApproach, ConflictStyle::TraditionalHierarchy), 80),
        ((ConflictStyle::TraditionalHierarchy, ConflictStyle::TraditionalHierarchy), 90),
    ],
    75,
);

/// Communication pace table. Direct pairings are unlisted and fall to the
/// default: directness says little about conversational rhythm.
static RHYTHM_MATRIX: CompatibilityMatrix<CommunicationStyle> = CompatibilityMatrix::new(
    &[
        ((CommunicationStyle::Formal, CommunicationStyle::Formal), 90),
        ((CommunicationStyle::Formal, CommunicationStyle::Casual), 60),
        ((CommunicationStyle::Formal, CommunicationStyle::Warm), 70),
        ((CommunicationStyle::Casual, CommunicationStyle::Casual), 85),
        ((CommunicationStyle::Casual, CommunicationStyle::Warm), 80),
        ((CommunicationStyle::Warm, CommunicationStyle::Warm), 95),
    ],
    70,
);

/// Regions that pair well without overlapping: traditional + modern, rural +
/// coastal, the two island cultures.
const COMPLEMENTARY_REGIONS: &[(&str, &str)] =
    &[("norte", "lisboa"), ("alentejo", "algarve"), ("acores", "madeira")];

/// Characteristic conversational pace per origin region.
fn region_rhythm(region: Option<&String>) -> f64 {
    match region.map(String::as_str) {
        Some("norte") => 80.0,
        Some("centro") => 85.0,
        Some("lisboa") => 90.0,
        Some("alentejo") => 75.0,
        Some("algarve") => 88.0,
        Some("acores") => 82.0,
        Some("madeira") => 85.0,
        _ => 80.0,
    }
}

fn infer_humor_style(profile: &CompatibilityProfile) -> HumorStyle {
    let region = profile.heritage.origin_regions.first().map(String::as_str);
    let communication = profile.lifestyle.communication_style;
    let expression = profile.emotional.expression_style;

    if region == Some("norte") && communication == CommunicationStyle::Warm {
        HumorStyle::WarmTraditional
    } else if region == Some("lisboa") && expression == ExpressionStyle::Expressive {
        HumorStyle::PlayfulModern
    } else if communication == CommunicationStyle::Formal {
        HumorStyle::Sophisticated
    } else {
        HumorStyle::DryWitty
    }
}

fn infer_conflict_style(profile: &CompatibilityProfile) -> ConflictStyle {
    if profile.lifestyle.family_values > 85 && profile.heritage.heritage_strength > 80 {
        ConflictStyle::FamilyMediated
    } else if profile.lifestyle.communication_style == CommunicationStyle::Direct {
        ConflictStyle::DirectDiscussion
    } else if profile.lifestyle.communication_style == CommunicationStyle::Warm {
        ConflictStyle::GentleApproach
    } else {
        ConflictStyle::TraditionalHierarchy
    }
}

fn linguistic_compatibility(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let primary_diff =
        (a.heritage.primary_fluency as i16 - b.heritage.primary_fluency as i16).abs() as f64;
    let primary = (100.0 - primary_diff * 10.0).max(0.0);

    let secondary_diff =
        (a.heritage.secondary_fluency as i16 - b.heritage.secondary_fluency as i16).abs() as f64;
    let secondary = (100.0 - secondary_diff * 8.0).max(0.0);

    let dialects = tag_overlap(&a.heritage.dialects, &b.heritage.dialects);

    primary * 0.50 + secondary * 0.30 + dialects * 0.20
}

fn complementary_region_bonus(a: &[String], b: &[String]) -> f64 {
    for &(first, second) in COMPLEMENTARY_REGIONS {
        let forward = a.iter().any(|r| r == first) && b.iter().any(|r| r == second);
        let reverse = a.iter().any(|r| r == second) && b.iter().any(|r| r == first);
        if forward || reverse {
            return 10.0;
        }
    }
    0.0
}

fn cultural_reference_alignment(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let practices = tag_overlap(&a.heritage.cultural_practices, &b.heritage.cultural_practices);

    let regional = (tag_overlap(&a.heritage.origin_regions, &b.heritage.origin_regions)
        + complementary_region_bonus(&a.heritage.origin_regions, &b.heritage.origin_regions))
    .min(100.0);

    let music = tag_overlap(&a.emotional.music_affinities, &b.emotional.music_affinities);
    let tradition = similarity(a.emotional.tradition_importance, b.emotional.tradition_importance);

    practices * 0.30 + regional * 0.25 + music * 0.25 + tradition * 0.20
}

fn emotional_intelligence_match(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let expression =
        expression_match(a.emotional.expression_style, b.emotional.expression_style) as f64;
    let connection = similarity(a.emotional.emotional_connection, b.emotional.emotional_connection);
    let saudade = saudade_alignment(&a.emotional, &b.emotional);

    // EQ in communication: how the stated style and the emotional register
    // line up across the pair.
    let communication_eq = (communication_match(
        a.lifestyle.communication_style,
        b.lifestyle.communication_style,
    ) as f64
        + expression_match(a.emotional.expression_style, b.emotional.expression_style) as f64)
        / 2.0;

    expression * 0.25 + connection * 0.25 + saudade * 0.30 + communication_eq * 0.20
}

fn topic_interest_overlap(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let events = tag_overlap(&a.lifestyle.event_interests, &b.lifestyle.event_interests);

    let cultural = (tag_overlap(&a.heritage.cultural_practices, &b.heritage.cultural_practices)
        + tag_overlap(&a.emotional.music_affinities, &b.emotional.music_affinities))
        / 2.0;

    let institutions = tag_overlap(
        &a.regional.institution_affiliations,
        &b.regional.institution_affiliations,
    );

    let community = (tag_overlap(&a.regional.venue_affiliations, &b.regional.venue_affiliations)
        + similarity(a.lifestyle.community_involvement, b.lifestyle.community_involvement))
        / 2.0;

    events * 0.25 + cultural * 0.30 + institutions * 0.20 + community * 0.25
}

fn communication_rhythm(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let style_rhythm = RHYTHM_MATRIX.lookup(
        a.lifestyle.communication_style,
        b.lifestyle.communication_style,
    ) as f64;

    let regional_rhythm = (region_rhythm(a.heritage.origin_regions.first())
        + region_rhythm(b.heritage.origin_regions.first()))
        / 2.0;

    (style_rhythm + regional_rhythm) / 2.0
}

fn future_vision_alignment(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let goals = tag_overlap(&a.lifestyle.relationship_goals, &b.lifestyle.relationship_goals);
    let growth = similarity(a.insights.growth_potential, b.insights.growth_potential);
    let community = similarity(a.lifestyle.community_involvement, b.lifestyle.community_involvement);
    let family = similarity(a.lifestyle.family_values, b.lifestyle.family_values);

    goals * 0.30 + growth * 0.25 + community * 0.25 + family * 0.20
}

/// Conversation quality score (0-100)
///
/// Eight weighted metrics spanning language, shared references, emotional
/// register, humor, topics, pace, conflict handling, and future vision.
pub fn conversation_quality(a: &CompatibilityProfile, b: &CompatibilityProfile) -> u8 {
    let linguistic = linguistic_compatibility(a, b);
    let references = cultural_reference_alignment(a, b);
    let emotional = emotional_intelligence_match(a, b);
    let humor = HUMOR_MATRIX.lookup(infer_humor_style(a), infer_humor_style(b)) as f64;
    let topics = topic_interest_overlap(a, b);
    let rhythm = communication_rhythm(a, b);
    let conflict = CONFLICT_MATRIX.lookup(infer_conflict_style(a), infer_conflict_style(b)) as f64;
    let future = future_vision_alignment(a, b);

    let score = linguistic * 0.15
        + references * 0.20
        + emotional * 0.18
        + humor * 0.12
        + topics * 0.15
        + rhythm * 0.10
        + conflict * 0.05
        + future * 0.05;

    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileDocument, SocialStyle};

    fn profile(member_id: &str) -> CompatibilityProfile {
        ProfileDocument {
            member_id: member_id.to_string(),
            ..Default::default()
        }
        .into_profile()
    }

    #[test]
    fn test_identical_profiles_score_high() {
        let a = profile("m1");
        let score = conversation_quality(&a, &a.clone());
        assert!(score >= 85, "identical pair should converse well, got {}", score);
        assert!(score <= 100);
    }

    #[test]
    fn test_symmetry() {
        let a = profile("m1");
        let mut b = profile("m2");
        b.heritage.origin_regions = vec!["norte".to_string()];
        b.lifestyle.communication_style = CommunicationStyle::Direct;
        b.lifestyle.social_style = SocialStyle::ProfessionalFocused;
        b.emotional.emotional_connection = 30;

        assert_eq!(conversation_quality(&a, &b), conversation_quality(&b, &a));
    }

    #[test]
    fn test_humor_inference() {
        let mut warm_norte = profile("m1");
        warm_norte.heritage.origin_regions = vec!["norte".to_string()];
        warm_norte.lifestyle.communication_style = CommunicationStyle::Warm;
        assert_eq!(infer_humor_style(&warm_norte), HumorStyle::WarmTraditional);

        let mut formal = profile("m2");
        formal.lifestyle.communication_style = CommunicationStyle::Formal;
        assert_eq!(infer_humor_style(&formal), HumorStyle::Sophisticated);

        let mut expressive_lisboa = profile("m3");
        expressive_lisboa.emotional.expression_style = ExpressionStyle::Expressive;
        assert_eq!(infer_humor_style(&expressive_lisboa), HumorStyle::PlayfulModern);
    }

    #[test]
    fn test_conflict_inference() {
        let mut traditional = profile("m1");
        traditional.lifestyle.family_values = 90;
        traditional.heritage.heritage_strength = 85;
        assert_eq!(infer_conflict_style(&traditional), ConflictStyle::FamilyMediated);

        let mut direct = profile("m2");
        direct.lifestyle.family_values = 60;
        direct.lifestyle.communication_style = CommunicationStyle::Direct;
        assert_eq!(infer_conflict_style(&direct), ConflictStyle::DirectDiscussion);
    }

    #[test]
    fn test_complementary_region_bonus() {
        let norte = vec!["norte".to_string()];
        let lisboa = vec!["lisboa".to_string()];
        assert_eq!(complementary_region_bonus(&norte, &lisboa), 10.0);
        assert_eq!(complementary_region_bonus(&lisboa, &norte), 10.0);
        assert_eq!(complementary_region_bonus(&norte, &norte), 0.0);
    }
}
