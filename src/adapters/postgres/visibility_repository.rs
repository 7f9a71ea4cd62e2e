//! PostgreSQL implementation of VisibilityRepository.
//!
//! One row per profile, keyed by detective_id. All writes are upserts so the
//! row can be created on first touch from either the admin path or the
//! scoring path without coordination.

use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, Timestamp};
use crate::domain::visibility::VisibilityRecord;
use crate::ports::VisibilityRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the VisibilityRepository port.
pub struct PostgresVisibilityRepository {
    pool: PgPool,
}

impl PostgresVisibilityRepository {
    /// Creates a new PostgresVisibilityRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a visibility record.
#[derive(Debug, sqlx::FromRow)]
struct VisibilityRow {
    detective_id: Uuid,
    is_visible: bool,
    is_featured: bool,
    manual_rank: Option<i64>,
    visibility_score: i64,
    last_evaluated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VisibilityRow> for VisibilityRecord {
    fn from(row: VisibilityRow) -> Self {
        VisibilityRecord {
            detective_id: DetectiveId::from_uuid(row.detective_id),
            is_visible: row.is_visible,
            is_featured: row.is_featured,
            manual_rank: row.manual_rank,
            visibility_score: row.visibility_score,
            last_evaluated_at: row.last_evaluated_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

#[async_trait]
impl VisibilityRepository for PostgresVisibilityRepository {
    async fn find_by_detective(
        &self,
        id: &DetectiveId,
    ) -> Result<Option<VisibilityRecord>, DomainError> {
        let row: Option<VisibilityRow> = sqlx::query_as(
            r#"
            SELECT detective_id, is_visible, is_featured, manual_rank,
                   visibility_score, last_evaluated_at, created_at, updated_at
            FROM detective_visibility
            WHERE detective_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find visibility record: {}", e),
            )
        })?;

        Ok(row.map(VisibilityRecord::from))
    }

    async fn find_by_detectives(
        &self,
        ids: &[DetectiveId],
    ) -> Result<Vec<VisibilityRecord>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<VisibilityRow> = sqlx::query_as(
            r#"
            SELECT detective_id, is_visible, is_featured, manual_rank,
                   visibility_score, last_evaluated_at, created_at, updated_at
            FROM detective_visibility
            WHERE detective_id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find visibility records: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(VisibilityRecord::from).collect())
    }

    async fn ensure(&self, record: &VisibilityRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO detective_visibility (
                detective_id, is_visible, is_featured, manual_rank,
                visibility_score, last_evaluated_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (detective_id) DO NOTHING
            "#,
        )
        .bind(record.detective_id.as_uuid())
        .bind(record.is_visible)
        .bind(record.is_featured)
        .bind(record.manual_rank)
        .bind(record.visibility_score)
        .bind(record.last_evaluated_at.as_ref().map(Timestamp::as_datetime))
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to ensure visibility record: {}", e),
            )
        })?;

        Ok(())
    }

    async fn upsert_settings(&self, record: &VisibilityRecord) -> Result<(), DomainError> {
        // Score columns keep their stored values when the row already exists.
        sqlx::query(
            r#"
            INSERT INTO detective_visibility (
                detective_id, is_visible, is_featured, manual_rank,
                visibility_score, last_evaluated_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (detective_id) DO UPDATE SET
                is_visible = EXCLUDED.is_visible,
                is_featured = EXCLUDED.is_featured,
                manual_rank = EXCLUDED.manual_rank,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.detective_id.as_uuid())
        .bind(record.is_visible)
        .bind(record.is_featured)
        .bind(record.manual_rank)
        .bind(record.visibility_score)
        .bind(record.last_evaluated_at.as_ref().map(Timestamp::as_datetime))
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert visibility settings: {}", e),
            )
        })?;

        Ok(())
    }

    async fn record_score(
        &self,
        id: &DetectiveId,
        score: i64,
        evaluated_at: Timestamp,
    ) -> Result<(), DomainError> {
        // Insert arm mirrors VisibilityRecord::with_defaults for the
        // settings columns.
        sqlx::query(
            r#"
            INSERT INTO detective_visibility (
                detective_id, is_visible, is_featured, manual_rank,
                visibility_score, last_evaluated_at, created_at, updated_at
            ) VALUES ($1, TRUE, FALSE, NULL, $2, $3, $3, $3)
            ON CONFLICT (detective_id) DO UPDATE SET
                visibility_score = EXCLUDED.visibility_score,
                last_evaluated_at = EXCLUDED.last_evaluated_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(score)
        .bind(evaluated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record visibility score: {}", e),
            )
        })?;

        Ok(())
    }
}
