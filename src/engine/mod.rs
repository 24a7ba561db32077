pub mod analytics;
pub mod learning;
pub mod recommender;

pub use analytics::{
    BucketStats, MatchingPerformanceData, PerformanceAnalytics, RegionalMatchingInsights,
    Timeframe,
};
pub use learning::{
    HeuristicLearner, MemberLearningData, OptimizationReport, OptimizationTarget, OutcomeLearner,
    RecordedOutcome,
};
pub use recommender::RecommendationEngine;
