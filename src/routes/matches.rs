use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::engine::{
    HeuristicLearner, OptimizationTarget, OutcomeLearner, PerformanceAnalytics,
    RecommendationEngine, Timeframe,
};
use crate::error::MatchingError;
use crate::models::{
    AnalyzeRequest, ErrorResponse, FindMatchesRequest, HealthResponse, RecordEngagementRequest,
    RecordEngagementResponse, RecordOutcomeRequest, RecordOutcomeResponse,
};
use crate::services::ProfileStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub engine: Arc<RecommendationEngine>,
    pub learner: Arc<HeuristicLearner>,
    pub analytics: Arc<PerformanceAnalytics>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/compatibility/analyze", web::post().to(analyze_compatibility))
        .route("/matches/find", web::post().to(find_matches))
        .route("/matches/outcome", web::post().to(record_outcome))
        .route("/matches/engagement", web::post().to(record_engagement))
        .route(
            "/insights/regional/{zone}",
            web::get().to(regional_insights),
        )
        .route(
            "/insights/regional/{zone}/optimize",
            web::post().to(optimize_zone_weights),
        )
        .route(
            "/analytics/performance",
            web::get().to(matching_performance),
        );
}

fn error_response(err: &MatchingError) -> HttpResponse {
    let (status_code, error) = match err {
        MatchingError::ProfileNotFound(_) => (404, "Profile not found"),
        MatchingError::ProfileIncomplete(_) => (422, "Profile incomplete"),
        MatchingError::StoreUnavailable(_) => (503, "Store unavailable"),
        MatchingError::WeightDriftRejected { .. } => (409, "Weight drift rejected"),
        MatchingError::AnalyticsWriteFailed(_) => (500, "Analytics write failed"),
        MatchingError::InvalidRequest(_) => (400, "Invalid request"),
    };
    let body = ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code,
    };
    match status_code {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        409 => HttpResponse::Conflict().json(body),
        422 => HttpResponse::UnprocessableEntity().json(body),
        503 => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn validation_failure(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);
    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Analyze one pairing
///
/// POST /api/v1/compatibility/analyze
async fn analyze_compatibility(
    state: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }

    match state.engine.analyze(&req).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => {
            tracing::warn!(
                member_a = %req.member_a,
                member_b = %req.member_b,
                error = %err,
                "compatibility analysis failed"
            );
            error_response(&err)
        }
    }
}

/// Ranked recommendation batch
///
/// POST /api/v1/matches/find
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }

    tracing::info!(
        member_id = %req.member_id,
        max_results = req.max_results,
        "finding matches"
    );

    match state.engine.find_matches(&req).await {
        Ok(response) => {
            tracing::info!(
                member_id = %req.member_id,
                results = response.total_results,
                evaluated = response.total_evaluated,
                "recommendation batch complete"
            );
            HttpResponse::Ok().json(response)
        }
        Err(err) => {
            tracing::warn!(member_id = %req.member_id, error = %err, "find matches failed");
            error_response(&err)
        }
    }
}

/// Record a realized pairing outcome
///
/// POST /api/v1/matches/outcome
async fn record_outcome(
    state: web::Data<AppState>,
    req: web::Json<RecordOutcomeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }

    match state.learner.record_outcome(&req).await {
        Ok(ack) => HttpResponse::Ok().json(RecordOutcomeResponse {
            success: true,
            match_id: ack.match_id,
            prediction_error: ack.prediction_error,
        }),
        Err(err) => {
            tracing::warn!(match_id = %req.match_id, error = %err, "outcome recording failed");
            error_response(&err)
        }
    }
}

/// Record engagement metrics for a proposed pairing
///
/// POST /api/v1/matches/engagement
async fn record_engagement(
    state: web::Data<AppState>,
    req: web::Json<RecordEngagementRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failure(errors);
    }

    match state.learner.record_engagement(&req).await {
        Ok(stage) => HttpResponse::Ok().json(RecordEngagementResponse {
            success: true,
            match_id: req.match_id.clone(),
            stage: format!("{:?}", stage).to_lowercase(),
        }),
        Err(err) => {
            tracing::warn!(match_id = %req.match_id, error = %err, "engagement recording failed");
            error_response(&err)
        }
    }
}

/// Zone-level matching insights
///
/// GET /api/v1/insights/regional/{zone}
async fn regional_insights(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let zone = path.into_inner();
    match state.analytics.regional_insights(&zone).await {
        Ok(insights) => HttpResponse::Ok().json(insights.as_ref()),
        Err(err) => {
            tracing::warn!(zone = %zone, error = %err, "regional insights failed");
            error_response(&err)
        }
    }
}

/// Trigger a batch weight re-optimization for a zone
///
/// POST /api/v1/insights/regional/{zone}/optimize?target=success_rate
async fn optimize_zone_weights(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let zone = path.into_inner();
    let target = match query
        .get("target")
        .map(|s| s.parse::<OptimizationTarget>())
        .unwrap_or(Ok(OptimizationTarget::default()))
    {
        Ok(target) => target,
        Err(message) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid optimization target".to_string(),
                message,
                status_code: 400,
            });
        }
    };

    match state.learner.optimize_weights(&zone, target).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(err) => {
            tracing::warn!(zone = %zone, error = %err, "weight optimization failed");
            error_response(&err)
        }
    }
}

/// Aggregated matching performance
///
/// GET /api/v1/analytics/performance?timeframe=weekly
async fn matching_performance(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let timeframe = match query
        .get("timeframe")
        .map(|s| s.parse::<Timeframe>())
        .unwrap_or(Ok(Timeframe::Weekly))
    {
        Ok(tf) => tf,
        Err(message) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid timeframe".to_string(),
                message,
                status_code: 400,
            });
        }
    };

    match state.analytics.performance(timeframe).await {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(err) => {
            tracing::warn!(error = %err, "performance analytics failed");
            error_response(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_error_mapping() {
        let not_found = MatchingError::ProfileNotFound("m1".to_string());
        assert_eq!(error_response(&not_found).status().as_u16(), 404);

        let incomplete = MatchingError::ProfileIncomplete("m1".to_string());
        assert_eq!(error_response(&incomplete).status().as_u16(), 422);

        let drift = MatchingError::WeightDriftRejected {
            zone: "camden".to_string(),
            detail: "out of rail".to_string(),
        };
        assert_eq!(error_response(&drift).status().as_u16(), 409);

        let invalid = MatchingError::InvalidRequest("bad".to_string());
        assert_eq!(error_response(&invalid).status().as_u16(), 400);
    }
}
