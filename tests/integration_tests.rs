// End-to-end engine tests for saudade-algo, running against the in-memory store

use std::sync::Arc;
use std::time::Duration;

use saudade_algo::engine::{
    HeuristicLearner, OptimizationTarget, OutcomeLearner, RecommendationEngine,
};
use saudade_algo::models::{
    AnalyzeRequest, CommunicationStyle, ConversationStyle, DerivedInsights, DimensionWeights,
    EmotionalProfile, ExpressionStyle, FindMatchesRequest, Generation, HeritageProfile,
    LifestyleProfile, ProfileDocument, RecordEngagementRequest, RecordOutcomeRequest,
    RegionWeightProfile, RegionalProfile, SocialStyle,
};
use saudade_algo::services::{MemoryStore, ProfileStore, SnapshotCache};
use saudade_algo::MatchingError;

fn community_member(id: &str, zone: &str, lat: f64, lon: f64) -> ProfileDocument {
    ProfileDocument {
        member_id: id.to_string(),
        heritage: Some(HeritageProfile {
            origin_regions: vec!["norte".to_string()],
            generation: Generation::FirstGeneration,
            heritage_strength: 88,
            cultural_practices: vec![
                "fado".to_string(),
                "cuisine".to_string(),
                "family_gatherings".to_string(),
            ],
            primary_fluency: 8,
            secondary_fluency: 6,
            dialects: vec!["nortenho".to_string()],
        }),
        emotional: Some(EmotionalProfile {
            emotional_connection: 88,
            homeland_attachment: 82,
            nostalgia_level: 78,
            expression_style: ExpressionStyle::Expressive,
            music_affinities: vec!["fado".to_string()],
            tradition_importance: 86,
        }),
        lifestyle: Some(LifestyleProfile {
            social_style: SocialStyle::FamilyOriented,
            event_interests: vec!["festivals".to_string()],
            relationship_goals: vec!["long_term_relationship".to_string()],
            communication_style: CommunicationStyle::Warm,
            family_values: 92,
            community_involvement: 80,
        }),
        regional: Some(RegionalProfile {
            residence_zone: zone.to_string(),
            preferred_meeting_zones: vec![zone.to_string()],
            travel_willingness: 80,
            venue_affiliations: vec!["casa_do_povo".to_string()],
            institution_affiliations: vec![],
        }),
        insights: Some(DerivedInsights {
            personality_type: "cultural_connector".to_string(),
            compatibility_factors: vec!["cultural_heritage".to_string()],
            conversation_style: ConversationStyle::Emotional,
            relationship_readiness: 80,
            growth_potential: 75,
            community_influence: 70,
        }),
        is_verified: true,
        age: Some(30),
        latitude: Some(lat),
        longitude: Some(lon),
        ..Default::default()
    }
}

fn distant_member(id: &str) -> ProfileDocument {
    let mut doc = community_member(id, "east_london", 52.2, 0.1);
    if let Some(heritage) = doc.heritage.as_mut() {
        heritage.origin_regions = vec!["algarve".to_string()];
        heritage.generation = Generation::ThirdGeneration;
        heritage.heritage_strength = 20;
        heritage.cultural_practices = vec!["surfing".to_string()];
        heritage.primary_fluency = 1;
    }
    if let Some(emotional) = doc.emotional.as_mut() {
        emotional.emotional_connection = 15;
        emotional.homeland_attachment = 10;
        emotional.nostalgia_level = 10;
        emotional.expression_style = ExpressionStyle::Reserved;
        emotional.music_affinities = vec!["electronic".to_string()];
        emotional.tradition_importance = 10;
    }
    if let Some(lifestyle) = doc.lifestyle.as_mut() {
        lifestyle.social_style = SocialStyle::ProfessionalFocused;
        lifestyle.communication_style = CommunicationStyle::Direct;
        lifestyle.family_values = 25;
        lifestyle.community_involvement = 15;
        lifestyle.event_interests = vec!["networking".to_string()];
        lifestyle.relationship_goals = vec!["casual".to_string()];
    }
    if let Some(regional) = doc.regional.as_mut() {
        regional.travel_willingness = 10;
        regional.venue_affiliations = vec![];
    }
    doc
}

struct Harness {
    store: Arc<MemoryStore>,
    engine: RecommendationEngine,
    learner: HeuristicLearner,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let weight_cache: Arc<SnapshotCache<RegionWeightProfile>> =
        Arc::new(SnapshotCache::new(100, Duration::from_secs(300)));

    let engine = RecommendationEngine::new(
        store.clone() as Arc<dyn ProfileStore>,
        Arc::clone(&weight_cache),
        20,
        Duration::from_secs(2),
        100,
    );
    let learner = HeuristicLearner::new(
        store.clone() as Arc<dyn ProfileStore>,
        weight_cache,
        100,
        Duration::from_secs(300),
        90,
    );

    Harness {
        store,
        engine,
        learner,
    }
}

fn analyze_request(a: &str, b: &str) -> AnalyzeRequest {
    AnalyzeRequest {
        member_a: a.to_string(),
        member_b: b.to_string(),
        options: Default::default(),
    }
}

fn find_request(member_id: &str, min_score: u8) -> FindMatchesRequest {
    FindMatchesRequest {
        member_id: member_id.to_string(),
        max_results: 10,
        min_compatibility_score: min_score,
        age_range: None,
        prioritize_regional: false,
    }
}

#[tokio::test]
async fn test_analyze_is_symmetric_end_to_end() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();
    h.store
        .upsert_profile(&community_member("bruno", "lambeth", 51.49, -0.11))
        .await
        .unwrap();

    let forward = h.engine.analyze(&analyze_request("ana", "bruno")).await.unwrap();
    let reverse = h.engine.analyze(&analyze_request("bruno", "ana")).await.unwrap();

    assert_eq!(
        forward.prediction.compatibility_score,
        reverse.prediction.compatibility_score
    );
    assert_eq!(forward.prediction.sub_scores, reverse.prediction.sub_scores);
}

#[tokio::test]
async fn test_analyze_symmetric_across_zone_weight_profiles() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();
    h.store
        .upsert_profile(&community_member("bruno", "lambeth", 51.49, -0.11))
        .await
        .unwrap();

    // Lambeth carries a committed, non-default weight profile; Stockwell
    // stays on the baseline. The pairing must still score the same both ways.
    let mut profile = RegionWeightProfile::baseline("lambeth");
    profile.version = 1;
    profile.weights = DimensionWeights {
        cultural_harmony: 0.35,
        saudade_resonance: 0.15,
        shared_values: 0.18,
        lifestyle_match: 0.12,
        conversation_potential: 0.10,
        regional_compatibility: 0.10,
    };
    h.store.put_region_weight_profile(&profile).await.unwrap();

    let forward = h.engine.analyze(&analyze_request("ana", "bruno")).await.unwrap();
    let reverse = h.engine.analyze(&analyze_request("bruno", "ana")).await.unwrap();

    assert_eq!(
        forward.prediction.compatibility_score,
        reverse.prediction.compatibility_score
    );
    assert_eq!(forward.prediction.sub_scores, reverse.prediction.sub_scores);
}

#[tokio::test]
async fn test_analyze_unknown_member_is_not_found() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();

    let result = h.engine.analyze(&analyze_request("ana", "ghost")).await;
    assert!(matches!(result, Err(MatchingError::ProfileNotFound(_))));
}

#[tokio::test]
async fn test_analyze_self_pair_rejected() {
    let h = harness();
    let result = h.engine.analyze(&analyze_request("ana", "ana")).await;
    assert!(matches!(result, Err(MatchingError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_find_matches_ranks_and_filters() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();
    // Three close community members, one culturally distant outlier.
    for (id, lat) in [("bruno", 51.47), ("carla", 51.48), ("diogo", 51.46)] {
        h.store
            .upsert_profile(&community_member(id, "stockwell_vauxhall", lat, -0.12))
            .await
            .unwrap();
    }
    h.store.upsert_profile(&distant_member("eva")).await.unwrap();

    let response = h.engine.find_matches(&find_request("ana", 70)).await.unwrap();

    assert_eq!(response.total_evaluated, 4);
    assert!(response.total_results >= 3);
    assert!(response.matches.iter().all(|m| m.candidate_id != "eva"));
    assert!(response.matches.iter().all(|m| m.candidate_id != "ana"));
    assert!(response
        .matches
        .iter()
        .all(|m| m.prediction.compatibility_score >= 70 && m.confidence >= 0.6));

    // Sorted by blended rank, descending.
    for pair in response.matches.windows(2) {
        let rank =
            |m: &saudade_algo::models::RankedMatch| {
                m.prediction.compatibility_score as f64 * 0.7 + m.confidence * 100.0 * 0.3
            };
        assert!(rank(&pair[0]) >= rank(&pair[1]));
    }
}

#[tokio::test]
async fn test_find_matches_empty_result_is_success() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();
    h.store.upsert_profile(&distant_member("eva")).await.unwrap();

    // No candidate clears a 95 bar.
    let response = h.engine.find_matches(&find_request("ana", 95)).await.unwrap();
    assert!(response.matches.is_empty());
    assert_eq!(response.total_results, 0);

    // The batch still leaves one analytics summary behind.
    assert_eq!(h.store.summary_count().await, 1);
}

#[tokio::test]
async fn test_find_matches_requires_complete_requester() {
    let h = harness();
    let bare = ProfileDocument {
        member_id: "ana".to_string(),
        is_verified: true,
        ..Default::default()
    };
    h.store.upsert_profile(&bare).await.unwrap();

    let result = h.engine.find_matches(&find_request("ana", 70)).await;
    assert!(matches!(result, Err(MatchingError::ProfileIncomplete(_))));
}

#[tokio::test]
async fn test_outcome_flow_beats_constant_predictor() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();
    h.store
        .upsert_profile(&community_member("bruno", "stockwell_vauxhall", 51.47, -0.12))
        .await
        .unwrap();

    let analysis = h.engine.analyze(&analyze_request("ana", "bruno")).await.unwrap();
    assert!(analysis.prediction.compatibility_score >= 80);

    h.learner
        .record_engagement(&RecordEngagementRequest {
            match_id: analysis.match_id.clone(),
            interaction: Default::default(),
        })
        .await
        .unwrap();

    let ack = h
        .learner
        .record_outcome(&RecordOutcomeRequest {
            match_id: analysis.match_id.clone(),
            outcome: "excellent".to_string(),
            member_ratings: Default::default(),
            cultural_connection_rating: 5,
            communication_quality: 5,
            expectation_match: 4,
            recommendation_likelihood: 5,
        })
        .await
        .unwrap();

    // A constant predictor at 50 would score 100 - |90 - 50| = 60 on an
    // excellent outcome; the engine's high prediction must beat that.
    assert!(ack.prediction_error > 60, "error {}", ack.prediction_error);
    assert_eq!(h.store.outcome_count().await, 1);
}

#[tokio::test]
async fn test_recorded_outcome_is_immutable() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();
    h.store
        .upsert_profile(&community_member("bruno", "stockwell_vauxhall", 51.47, -0.12))
        .await
        .unwrap();

    let analysis = h.engine.analyze(&analyze_request("ana", "bruno")).await.unwrap();
    let outcome = |class: &str| RecordOutcomeRequest {
        match_id: analysis.match_id.clone(),
        outcome: class.to_string(),
        member_ratings: Default::default(),
        cultural_connection_rating: 3,
        communication_quality: 3,
        expectation_match: 3,
        recommendation_likelihood: 3,
    };

    h.learner.record_outcome(&outcome("good")).await.unwrap();
    // A second rating acknowledges without rewriting the record.
    h.learner.record_outcome(&outcome("failed")).await.unwrap();
    assert_eq!(h.store.outcome_count().await, 1);

    // Engagement after resolution is rejected.
    let late = h
        .learner
        .record_engagement(&RecordEngagementRequest {
            match_id: analysis.match_id,
            interaction: Default::default(),
        })
        .await;
    assert!(matches!(late, Err(MatchingError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_optimized_weights_stay_normalized() {
    let h = harness();
    h.store
        .upsert_profile(&community_member("ana", "stockwell_vauxhall", 51.4646, -0.1227))
        .await
        .unwrap();

    // Drive enough resolved outcomes through the learner to clear the
    // optimization evidence bar.
    for i in 0..70 {
        let a = format!("pair{}a", i);
        let b = format!("pair{}b", i);
        h.store
            .upsert_profile(&community_member(&a, "stockwell_vauxhall", 51.4646, -0.1227))
            .await
            .unwrap();
        h.store
            .upsert_profile(&community_member(&b, "stockwell_vauxhall", 51.47, -0.12))
            .await
            .unwrap();

        let analysis = h.engine.analyze(&analyze_request(&a, &b)).await.unwrap();
        let class = if i % 7 == 0 { "failed" } else { "excellent" };
        h.learner
            .record_outcome(&RecordOutcomeRequest {
                match_id: analysis.match_id,
                outcome: class.to_string(),
                member_ratings: Default::default(),
                cultural_connection_rating: 3,
                communication_quality: 3,
                expectation_match: 3,
                recommendation_likelihood: 3,
            })
            .await
            .unwrap();
    }

    let report = h
        .learner
        .optimize_weights("stockwell_vauxhall", OptimizationTarget::SuccessRate)
        .await
        .unwrap();
    assert!(report.committed);
    assert!((report.weights.sum() - 1.0).abs() < 1e-9);

    let stored = h
        .store
        .get_region_weight_profile("stockwell_vauxhall")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.version, 1);
    assert!((stored.weights.sum() - 1.0).abs() < 1e-9);
}
