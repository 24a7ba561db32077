use crate::core::matrix::{similarity, tag_overlap, CompatibilityMatrix};
use crate::models::{CommunicationStyle, LifestyleProfile, SocialStyle};

static SOCIAL_MATRIX: CompatibilityMatrix<SocialStyle> = CompatibilityMatrix::new(
    &[
        ((SocialStyle::FamilyOriented, SocialStyle::FamilyOriented), 95),
        ((SocialStyle::CommunityActive, SocialStyle::CommunityActive), 95),
        ((SocialStyle::ProfessionalFocused, SocialStyle::ProfessionalFocused), 95),
        ((SocialStyle::CulturalImmersive, SocialStyle::CulturalImmersive), 95),
        ((SocialStyle::FamilyOriented, SocialStyle::CommunityActive), 85),
        ((SocialStyle::FamilyOriented, SocialStyle::CulturalImmersive), 80),
        ((SocialStyle::CommunityActive, SocialStyle::CulturalImmersive), 90),
        ((SocialStyle::ProfessionalFocused, SocialStyle::CommunityActive), 75),
    ],
    70,
);

/// Communication style pairings. Warm/direct is the hardest mismatch; the
/// default covers nothing here since all pairs are listed, but stays at 50 to
/// be conservative if a style is ever added.
static COMMUNICATION_MATRIX: CompatibilityMatrix<CommunicationStyle> = CompatibilityMatrix::new(
    &[
        ((CommunicationStyle::Formal, CommunicationStyle::Formal), 95),
        ((CommunicationStyle::Formal, CommunicationStyle::Casual), 60),
        ((CommunicationStyle::Formal, CommunicationStyle::Warm), 70),
        ((CommunicationStyle::Formal, CommunicationStyle::Direct), 80),
        ((CommunicationStyle::Casual, CommunicationStyle::Casual), 90),
        ((CommunicationStyle::Casual, CommunicationStyle::Warm), 85),
        ((CommunicationStyle::Casual, CommunicationStyle::Direct), 75),
        ((CommunicationStyle::Warm, CommunicationStyle::Warm), 95),
        ((CommunicationStyle::Warm, CommunicationStyle::Direct), 65),
        ((CommunicationStyle::Direct, CommunicationStyle::Direct), 90),
    ],
    50,
);

pub fn social_match(a: SocialStyle, b: SocialStyle) -> u8 {
    SOCIAL_MATRIX.lookup(a, b)
}

pub fn communication_match(a: CommunicationStyle, b: CommunicationStyle) -> u8 {
    COMMUNICATION_MATRIX.lookup(a, b)
}

/// Lifestyle match score (0-100)
pub fn lifestyle_match(a: &LifestyleProfile, b: &LifestyleProfile) -> u8 {
    let social = SOCIAL_MATRIX.lookup(a.social_style, b.social_style) as f64;
    let events = tag_overlap(&a.event_interests, &b.event_interests);
    let goals = tag_overlap(&a.relationship_goals, &b.relationship_goals);
    let communication =
        COMMUNICATION_MATRIX.lookup(a.communication_style, b.communication_style) as f64;
    let family = similarity(a.family_values, b.family_values);
    let community = similarity(a.community_involvement, b.community_involvement);

    let score = social * 0.20
        + events * 0.20
        + goals * 0.15
        + communication * 0.15
        + family * 0.15
        + community * 0.15;

    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifestyle(style: SocialStyle, communication: CommunicationStyle) -> LifestyleProfile {
        LifestyleProfile {
            social_style: style,
            event_interests: vec!["cultural_events".to_string()],
            relationship_goals: vec!["long_term_relationship".to_string()],
            communication_style: communication,
            family_values: 85,
            community_involvement: 70,
        }
    }

    #[test]
    fn test_lifestyle_in_range_and_symmetric() {
        let a = lifestyle(SocialStyle::FamilyOriented, CommunicationStyle::Warm);
        let b = lifestyle(SocialStyle::ProfessionalFocused, CommunicationStyle::Direct);
        let score = lifestyle_match(&a, &b);
        assert!(score <= 100);
        assert_eq!(score, lifestyle_match(&b, &a));
    }

    #[test]
    fn test_warm_direct_is_hard_mismatch() {
        assert_eq!(
            communication_match(CommunicationStyle::Warm, CommunicationStyle::Direct),
            65
        );
        assert_eq!(
            communication_match(CommunicationStyle::Warm, CommunicationStyle::Warm),
            95
        );
    }

    #[test]
    fn test_unlisted_social_pair_uses_default() {
        assert_eq!(
            social_match(SocialStyle::ProfessionalFocused, SocialStyle::FamilyOriented),
            70
        );
    }
}
