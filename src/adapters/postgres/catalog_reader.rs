//! PostgreSQL implementation of CatalogReader.
//!
//! Read-optimized batch queries over service listings and published reviews
//! for the ranking pipeline.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, ServiceId};
use crate::domain::ranking::{ServiceRef, ServiceReviewStats};
use crate::ports::CatalogReader;

/// PostgreSQL implementation of CatalogReader.
#[derive(Clone)]
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    /// Creates a new PostgresCatalogReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn services_by_detectives(
        &self,
        detective_ids: &[DetectiveId],
    ) -> Result<Vec<ServiceRef>, DomainError> {
        if detective_ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<uuid::Uuid> = detective_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, detective_id
            FROM services
            WHERE detective_id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to load services: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| ServiceRef {
                service_id: ServiceId::from_uuid(row.get("id")),
                detective_id: DetectiveId::from_uuid(row.get("detective_id")),
            })
            .collect())
    }

    async fn review_stats_by_services(
        &self,
        service_ids: &[ServiceId],
    ) -> Result<Vec<ServiceReviewStats>, DomainError> {
        if service_ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<uuid::Uuid> = service_ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT service_id,
                   COUNT(*) AS review_count,
                   COALESCE(AVG(rating)::float8, 0) AS average_rating
            FROM reviews
            WHERE service_id = ANY($1)
              AND is_published = TRUE
            GROUP BY service_id
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to load review stats: {}", e),
            )
        })?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let count: i64 = row.get("review_count");
                ServiceReviewStats {
                    service_id: ServiceId::from_uuid(row.get("service_id")),
                    count: u64::try_from(count).unwrap_or(0),
                    average: row.get("average_rating"),
                }
            })
            .collect())
    }
}
