// Core algorithm exports
pub mod conversation;
pub mod geography;
pub mod heritage;
pub mod insights;
pub mod lifestyle;
pub mod matrix;
pub mod saudade;
pub mod scorer;
pub mod values;

pub use conversation::conversation_quality;
pub use geography::{geographic_feasibility, haversine_distance, pair_distance_km};
pub use heritage::heritage_alignment;
pub use insights::{build_prediction, match_reason, relationship_longevity, success_indicators};
pub use lifestyle::lifestyle_match;
pub use matrix::{region_overlap, shared_tags, similarity, tag_overlap, CompatibilityMatrix};
pub use saudade::{saudade_intensity, saudade_resonance};
pub use scorer::CompatibilityScorer;
pub use values::shared_values;
