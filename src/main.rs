mod config;
mod core;
mod engine;
mod error;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error as web_error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use config::Settings;
use engine::{HeuristicLearner, PerformanceAnalytics, RecommendationEngine};
use models::RegionWeightProfile;
use routes::matches::AppState;
use services::{PostgresStore, ProfileStore, Retrying, SnapshotCache};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl web_error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST),
        )
        .json(serde_json::json!({
            "error": self.error,
            "message": self.message,
            "status_code": self.status_code,
        }))
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: web_error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: web_error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting saudade-algo matching service...");

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    info!("Configuration loaded successfully");

    let postgres = PostgresStore::from_settings(
        &settings.database.url,
        settings.database.max_connections,
        settings.database.min_connections,
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to connect to PostgreSQL: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
    })?;

    info!("PostgreSQL store initialized");

    // Transient store failures are retried with exponential backoff before
    // they surface as StoreUnavailable.
    let store: Arc<dyn ProfileStore> =
        Arc::new(Retrying::new(postgres, 3, Duration::from_millis(100)));

    let cache = &settings.cache;
    let weight_cache: Arc<SnapshotCache<RegionWeightProfile>> = Arc::new(SnapshotCache::new(
        cache.capacity,
        Duration::from_secs(cache.weights_ttl_secs),
    ));

    let engine = Arc::new(RecommendationEngine::new(
        Arc::clone(&store),
        Arc::clone(&weight_cache),
        settings.matching.max_concurrency,
        Duration::from_secs(settings.matching.candidate_timeout_secs),
        settings.matching.pool_cap,
    ));

    let learner = Arc::new(HeuristicLearner::new(
        Arc::clone(&store),
        Arc::clone(&weight_cache),
        cache.capacity,
        Duration::from_secs(cache.learning_ttl_secs),
        settings.learning.lookback_days,
    ));

    let analytics = Arc::new(PerformanceAnalytics::new(
        Arc::clone(&store),
        cache.capacity,
        Duration::from_secs(cache.insights_ttl_secs),
    ));

    let app_state = AppState {
        store,
        engine,
        learner,
        analytics,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_json_error_renders_its_status_code() {
        let err = JsonError {
            error: "invalid_json".to_string(),
            message: "bad body".to_string(),
            status_code: 400,
        };
        assert_eq!(err.error_response().status().as_u16(), 400);
    }
}
