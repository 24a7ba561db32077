use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{
    InteractionMetrics, MatchPredictionRecord, MatchStage, OutcomeRecord, ProfileDocument,
    RegionWeightProfile,
};
use crate::services::store::{
    CandidateFilter, ProfileStore, RecommendationSummary, StoreError,
};

/// PostgreSQL-backed `ProfileStore`
///
/// Profile documents, predictions, outcomes and weight profiles are stored
/// as JSONB; the columns the candidate query filters on (activity,
/// verification, age) are lifted out into real columns.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");
        Self::new(url, max_connections.unwrap_or(10), min_connections.unwrap_or(1)).await
    }

    fn stage_str(stage: MatchStage) -> &'static str {
        match stage {
            MatchStage::Proposed => "proposed",
            MatchStage::Engaged => "engaged",
            MatchStage::Resolved => "resolved",
        }
    }
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get_profile(&self, member_id: &str) -> Result<Option<ProfileDocument>, StoreError> {
        let row = sqlx::query("SELECT document FROM member_profiles WHERE member_id = $1")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let document: serde_json::Value = row.get("document");
                Ok(Some(serde_json::from_value(document)?))
            }
            None => Ok(None),
        }
    }

    async fn upsert_profile(&self, document: &ProfileDocument) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO member_profiles (member_id, document, is_active, is_verified, age, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (member_id)
            DO UPDATE SET
                document = EXCLUDED.document,
                is_active = EXCLUDED.is_active,
                is_verified = EXCLUDED.is_verified,
                age = EXCLUDED.age,
                updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(&document.member_id)
            .bind(serde_json::to_value(document)?)
            .bind(document.is_active)
            .bind(document.is_verified)
            .bind(document.age.map(|a| a as i16))
            .execute(&self.pool)
            .await?;

        tracing::debug!(member_id = %document.member_id, "upserted profile");
        Ok(())
    }

    async fn query_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<ProfileDocument>, StoreError> {
        let (min_age, max_age) = match filter.age_range {
            Some((min, max)) => (min as i16, max as i16),
            None => (0, i16::MAX),
        };

        let query = r#"
            SELECT document
            FROM member_profiles
            WHERE member_id <> $1
              AND is_active = TRUE
              AND is_verified = TRUE
              AND (age IS NULL OR (age >= $2 AND age <= $3))
            ORDER BY updated_at DESC
            LIMIT $4
        "#;

        let rows = sqlx::query(query)
            .bind(&filter.exclude_member_id)
            .bind(min_age)
            .bind(max_age)
            .bind(filter.limit as i64)
            .fetch_all(&self.pool)
            .await?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let document: serde_json::Value = row.get("document");
            candidates.push(serde_json::from_value(document)?);
        }

        tracing::debug!(count = candidates.len(), "candidate pool loaded");
        Ok(candidates)
    }

    async fn append_match_prediction(
        &self,
        record: &MatchPredictionRecord,
    ) -> Result<(), StoreError> {
        // Unique index over the unordered pair makes this idempotent.
        let query = r#"
            INSERT INTO match_predictions (match_id, member_a, member_b, prediction, stage, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
        "#;

        sqlx::query(query)
            .bind(&record.match_id)
            .bind(&record.member_a)
            .bind(&record.member_b)
            .bind(serde_json::to_value(&record.prediction)?)
            .bind(Self::stage_str(record.stage))
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_match_prediction(
        &self,
        match_id: &str,
    ) -> Result<Option<MatchPredictionRecord>, StoreError> {
        let query = r#"
            SELECT match_id, member_a, member_b, prediction, stage, created_at
            FROM match_predictions
            WHERE match_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let prediction: serde_json::Value = row.get("prediction");
                let stage: String = row.get("stage");
                let stage = match stage.as_str() {
                    "engaged" => MatchStage::Engaged,
                    "resolved" => MatchStage::Resolved,
                    _ => MatchStage::Proposed,
                };
                Ok(Some(MatchPredictionRecord {
                    match_id: row.get("match_id"),
                    member_a: row.get("member_a"),
                    member_b: row.get("member_b"),
                    prediction: serde_json::from_value(prediction)?,
                    stage,
                    created_at: row.get("created_at"),
                }))
            }
            None => Ok(None),
        }
    }

    async fn set_match_stage(&self, match_id: &str, stage: MatchStage) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE match_predictions SET stage = $2 WHERE match_id = $1")
            .bind(match_id)
            .bind(Self::stage_str(stage))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("unknown match: {}", match_id)));
        }
        Ok(())
    }

    async fn record_interaction(
        &self,
        match_id: &str,
        metrics: &InteractionMetrics,
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO match_interactions (match_id, metrics, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (match_id)
            DO UPDATE SET metrics = EXCLUDED.metrics, updated_at = NOW()
        "#;

        sqlx::query(query)
            .bind(match_id)
            .bind(serde_json::to_value(metrics)?)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_interaction(
        &self,
        match_id: &str,
    ) -> Result<Option<InteractionMetrics>, StoreError> {
        let row = sqlx::query("SELECT metrics FROM match_interactions WHERE match_id = $1")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let metrics: serde_json::Value = row.get("metrics");
                Ok(Some(serde_json::from_value(metrics)?))
            }
            None => Ok(None),
        }
    }

    async fn append_outcome_record(&self, record: &OutcomeRecord) -> Result<(), StoreError> {
        // One outcome per match, ever: first insert wins.
        let query = r#"
            INSERT INTO outcome_records (match_id, record, residence_zone, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (match_id) DO NOTHING
        "#;

        sqlx::query(query)
            .bind(&record.match_id)
            .bind(serde_json::to_value(record)?)
            .bind(&record.residence_zone)
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_outcomes_since(
        &self,
        zone: Option<&str>,
        since: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        let query = r#"
            SELECT record
            FROM outcome_records
            WHERE created_at >= $1
              AND ($2::TEXT IS NULL OR residence_zone = $2)
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(since)
            .bind(zone)
            .fetch_all(&self.pool)
            .await?;

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            let record: serde_json::Value = row.get("record");
            outcomes.push(serde_json::from_value(record)?);
        }
        Ok(outcomes)
    }

    async fn get_region_weight_profile(
        &self,
        zone: &str,
    ) -> Result<Option<RegionWeightProfile>, StoreError> {
        let query = r#"
            SELECT profile
            FROM region_weight_profiles
            WHERE zone = $1
            ORDER BY version DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query).bind(zone).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let profile: serde_json::Value = row.get("profile");
                Ok(Some(serde_json::from_value(profile)?))
            }
            None => Ok(None),
        }
    }

    async fn put_region_weight_profile(
        &self,
        profile: &RegionWeightProfile,
    ) -> Result<(), StoreError> {
        // Versions are append-only; a duplicate version is a conflict.
        let query = r#"
            INSERT INTO region_weight_profiles (zone, version, profile, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (zone, version) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(&profile.zone)
            .bind(profile.version as i32)
            .bind(serde_json::to_value(profile)?)
            .bind(profile.created_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "weight profile for {} already at version {}",
                profile.zone, profile.version
            )));
        }

        tracing::info!(zone = %profile.zone, version = profile.version, "weight profile committed");
        Ok(())
    }

    async fn append_recommendation_summary(
        &self,
        summary: &RecommendationSummary,
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO recommendation_summaries (member_id, summary, created_at)
            VALUES ($1, $2, $3)
        "#;

        sqlx::query(query)
            .bind(&summary.member_id)
            .bind(serde_json::to_value(summary)?)
            .bind(summary.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
