use crate::core::matrix::similarity;
use crate::models::CompatibilityProfile;

/// Shared values score (0-100)
///
/// Pure similarity blend: family values .30, community involvement .25,
/// tradition importance .25, heritage strength .20. Identical profiles score
/// exactly 100.
pub fn shared_values(a: &CompatibilityProfile, b: &CompatibilityProfile) -> u8 {
    let family = similarity(a.lifestyle.family_values, b.lifestyle.family_values);
    let community = similarity(a.lifestyle.community_involvement, b.lifestyle.community_involvement);
    let tradition = similarity(a.emotional.tradition_importance, b.emotional.tradition_importance);
    let heritage = similarity(a.heritage.heritage_strength, b.heritage.heritage_strength);

    let score = family * 0.30 + community * 0.25 + tradition * 0.25 + heritage * 0.20;
    score.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileDocument;

    fn profile(family: u8, community: u8, tradition: u8, strength: u8) -> CompatibilityProfile {
        let mut p = ProfileDocument {
            member_id: "test".to_string(),
            ..Default::default()
        }
        .into_profile();
        p.lifestyle.family_values = family;
        p.lifestyle.community_involvement = community;
        p.emotional.tradition_importance = tradition;
        p.heritage.heritage_strength = strength;
        p
    }

    #[test]
    fn test_identical_profiles_score_100() {
        let a = profile(85, 70, 75, 80);
        assert_eq!(shared_values(&a, &a.clone()), 100);
    }

    #[test]
    fn test_divergent_values_score_low() {
        let a = profile(100, 100, 100, 100);
        let b = profile(0, 0, 0, 0);
        assert_eq!(shared_values(&a, &b), 0);
    }

    #[test]
    fn test_symmetry() {
        let a = profile(90, 40, 60, 85);
        let b = profile(30, 80, 55, 20);
        assert_eq!(shared_values(&a, &b), shared_values(&b, &a));
    }
}
