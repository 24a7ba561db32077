use crate::core::matrix::{region_overlap, similarity, tag_overlap, CompatibilityMatrix};
use crate::models::{Generation, HeritageProfile};

/// Generation pairings: identical generations score 100, adjacent ones are
/// still highly compatible, the recent-arrival / third-generation gap is the
/// widest.
static GENERATION_MATRIX: CompatibilityMatrix<Generation> = CompatibilityMatrix::new(
    &[
        ((Generation::RecentArrival, Generation::RecentArrival), 100),
        ((Generation::FirstGeneration, Generation::FirstGeneration), 100),
        ((Generation::SecondGeneration, Generation::SecondGeneration), 100),
        ((Generation::ThirdGeneration, Generation::ThirdGeneration), 100),
        ((Generation::RecentArrival, Generation::FirstGeneration), 85),
        ((Generation::FirstGeneration, Generation::SecondGeneration), 85),
        ((Generation::SecondGeneration, Generation::ThirdGeneration), 85),
        ((Generation::RecentArrival, Generation::SecondGeneration), 70),
        ((Generation::FirstGeneration, Generation::ThirdGeneration), 70),
        ((Generation::RecentArrival, Generation::ThirdGeneration), 55),
    ],
    70,
);

/// Language fluency compatibility across the pair
///
/// Primary-language gaps cost 10 points per fluency level, secondary 8;
/// primary carries 70% of the weight.
pub fn language_compatibility(a: &HeritageProfile, b: &HeritageProfile) -> f64 {
    let primary_diff = (a.primary_fluency as i16 - b.primary_fluency as i16).abs() as f64;
    let primary_score = (100.0 - primary_diff * 10.0).max(0.0);

    let secondary_diff = (a.secondary_fluency as i16 - b.secondary_fluency as i16).abs() as f64;
    let secondary_score = (100.0 - secondary_diff * 8.0).max(0.0);

    primary_score * 0.70 + secondary_score * 0.30
}

/// Heritage alignment score (0-100)
///
/// Weighted blend of origin-region overlap, heritage-strength similarity,
/// generation pairing, language fluency, and shared cultural practices.
pub fn heritage_alignment(a: &HeritageProfile, b: &HeritageProfile) -> u8 {
    let regions = region_overlap(&a.origin_regions, &b.origin_regions);
    let strength = similarity(a.heritage_strength, b.heritage_strength);
    let generation = GENERATION_MATRIX.lookup(a.generation, b.generation) as f64;
    let language = language_compatibility(a, b);
    let practices = tag_overlap(&a.cultural_practices, &b.cultural_practices);

    let score = regions * 0.25
        + strength * 0.20
        + generation * 0.20
        + language * 0.20
        + practices * 0.15;

    score.round().clamp(0.0, 100.0) as u8
}

pub fn generation_match(a: Generation, b: Generation) -> u8 {
    GENERATION_MATRIX.lookup(a, b)
}
