// Model exports
pub mod outcome;
pub mod prediction;
pub mod profile;
pub mod requests;
pub mod responses;
pub mod weights;

pub use outcome::{
    FeedbackRatings, InteractionMetrics, LearningFeatures, OutcomeClass, OutcomeRecord,
    ProgressionSnapshot,
};
pub use prediction::{
    MatchPrediction, MatchPredictionRecord, MatchReasoning, MatchStage, SubScores,
    SuccessIndicators,
};
pub use profile::{
    CommunicationStyle, CompatibilityProfile, ConversationStyle, DerivedInsights,
    EmotionalProfile, ExpressionStyle, Generation, HeritageProfile, LifestyleProfile,
    ProfileDocument, RegionalProfile, SocialStyle,
};
pub use requests::{
    AnalyzeOptions, AnalyzeRequest, FindMatchesRequest, RecordEngagementRequest,
    RecordOutcomeRequest,
};
pub use responses::{
    AnalyzeResponse, ErrorResponse, FindMatchesResponse, HealthResponse, RankedMatch,
    RecordEngagementResponse, RecordOutcomeResponse,
};
pub use weights::{DimensionWeights, RegionWeightProfile, SuccessPattern};
