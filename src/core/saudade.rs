use crate::core::matrix::{similarity, tag_overlap, CompatibilityMatrix};
use crate::models::{EmotionalProfile, ExpressionStyle};

/// Expression style pairings. A reserved pair understands each other better
/// than a reserved/expressive mismatch.
static EXPRESSION_MATRIX: CompatibilityMatrix<ExpressionStyle> = CompatibilityMatrix::new(
    &[
        ((ExpressionStyle::Expressive, ExpressionStyle::Expressive), 95),
        ((ExpressionStyle::Expressive, ExpressionStyle::Reserved), 60),
        ((ExpressionStyle::Expressive, ExpressionStyle::Balanced), 80),
        ((ExpressionStyle::Reserved, ExpressionStyle::Reserved), 90),
        ((ExpressionStyle::Reserved, ExpressionStyle::Balanced), 85),
        ((ExpressionStyle::Balanced, ExpressionStyle::Balanced), 95),
    ],
    70,
);

pub fn expression_match(a: ExpressionStyle, b: ExpressionStyle) -> u8 {
    EXPRESSION_MATRIX.lookup(a, b)
}

/// Emotional resonance score (0-100)
///
/// The emotional core of the algorithm: alignment of homesickness and
/// nostalgia levels, shared music affinities, and compatible expression
/// styles. An identical pair rounds up to 100.
pub fn saudade_resonance(a: &EmotionalProfile, b: &EmotionalProfile) -> u8 {
    let connection = similarity(a.emotional_connection, b.emotional_connection);
    let homeland = similarity(a.homeland_attachment, b.homeland_attachment);
    let nostalgia = similarity(a.nostalgia_level, b.nostalgia_level);
    let music = tag_overlap(&a.music_affinities, &b.music_affinities);
    let expression = EXPRESSION_MATRIX.lookup(a.expression_style, b.expression_style) as f64;
    let tradition = similarity(a.tradition_importance, b.tradition_importance);

    let score = connection * 0.25
        + homeland * 0.20
        + nostalgia * 0.15
        + music * 0.20
        + expression * 0.10
        + tradition * 0.10;

    score.round().clamp(0.0, 100.0) as u8
}

/// Mean alignment of the three longing-related levels, used inside the
/// conversation emotional-intelligence metric.
pub fn saudade_alignment(a: &EmotionalProfile, b: &EmotionalProfile) -> f64 {
    (similarity(a.emotional_connection, b.emotional_connection)
        + similarity(a.homeland_attachment, b.homeland_attachment)
        + similarity(a.nostalgia_level, b.nostalgia_level))
        / 3.0
}

/// How strongly a single member experiences saudade, for analytics bucketing.
pub fn saudade_intensity(profile: &EmotionalProfile) -> u8 {
    let total = profile.emotional_connection as u16
        + profile.homeland_attachment as u16
        + profile.nostalgia_level as u16
        + profile.tradition_importance as u16;
    (total as f64 / 4.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emotional(connection: u8, homeland: u8, nostalgia: u8) -> EmotionalProfile {
        EmotionalProfile {
            emotional_connection: connection,
            homeland_attachment: homeland,
            nostalgia_level: nostalgia,
            expression_style: ExpressionStyle::Balanced,
            music_affinities: vec!["fado".to_string()],
            tradition_importance: 70,
        }
    }

    #[test]
    fn test_identical_profiles_score_100() {
        let a = emotional(85, 80, 75);
        // expression contributes 95, everything else 100: 99.5 rounds to 100
        assert_eq!(saudade_resonance(&a, &a.clone()), 100);
    }

    #[test]
    fn test_divergent_profiles_score_low() {
        let a = emotional(100, 100, 100);
        let mut b = emotional(0, 0, 0);
        b.music_affinities = vec!["kuduro".to_string()];
        b.expression_style = ExpressionStyle::Expressive;
        b.tradition_importance = 0;
        let score = saudade_resonance(&a, &b);
        assert!(score < 30, "expected low resonance, got {}", score);
    }

    #[test]
    fn test_symmetry() {
        let a = emotional(85, 60, 40);
        let b = emotional(30, 90, 70);
        assert_eq!(saudade_resonance(&a, &b), saudade_resonance(&b, &a));
    }

    #[test]
    fn test_intensity_buckets() {
        let low = emotional(20, 20, 20);
        let high = emotional(90, 90, 90);
        assert!(saudade_intensity(&low) < saudade_intensity(&high));
        // (90+90+90+70)/4 = 85
        assert_eq!(saudade_intensity(&high), 85);
    }
}
