//! saudade-algo - Cultural compatibility matching service
//!
//! Pairwise cultural-affinity scoring and match recommendation for the
//! Portuguese community platform: six weighted compatibility dimensions,
//! outcome-driven weight learning per residence zone, and regional
//! performance analytics.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{haversine_distance, CompatibilityScorer};
pub use engine::{
    HeuristicLearner, OptimizationTarget, OutcomeLearner, PerformanceAnalytics,
    RecommendationEngine, Timeframe,
};
pub use error::MatchingError;
pub use models::{
    AnalyzeRequest, CompatibilityProfile, DimensionWeights, FindMatchesRequest,
    FindMatchesResponse, MatchPrediction, ProfileDocument,
};
pub use services::{MemoryStore, ProfileStore};
