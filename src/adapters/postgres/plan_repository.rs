//! PostgreSQL implementation of PlanRepository.
//!
//! Plan rows store badges as JSONB. Legacy rows use either the object or the
//! array encoding; both decode through [`PlanBadges`], so the lenient parse
//! lives in the domain type rather than here.

use crate::domain::foundation::{DomainError, ErrorCode, PlanId, Timestamp};
use crate::domain::plan::{PlanBadges, SubscriptionPlan};
use crate::ports::PlanRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the PlanRepository port.
pub struct PostgresPlanRepository {
    pool: PgPool,
}

impl PostgresPlanRepository {
    /// Creates a new PostgresPlanRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription plan.
#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    display_name: String,
    monthly_price_cents: i64,
    yearly_price_cents: i64,
    features: Vec<String>,
    badges: Option<Json<PlanBadges>>,
    service_limit: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for SubscriptionPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let service_limit = u32::try_from(row.service_limit).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid service_limit value: {}", row.service_limit),
            )
        })?;

        Ok(SubscriptionPlan {
            id: PlanId::from_uuid(row.id),
            name: row.name,
            display_name: row.display_name,
            monthly_price_cents: row.monthly_price_cents,
            yearly_price_cents: row.yearly_price_cents,
            features: row.features,
            badges: row.badges.map(|json| json.0).unwrap_or_default(),
            service_limit,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn create(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscription_plans (
                id, name, display_name, monthly_price_cents, yearly_price_cents,
                features, badges, service_limit, is_active, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.name)
        .bind(&plan.display_name)
        .bind(plan.monthly_price_cents)
        .bind(plan.yearly_price_cents)
        .bind(&plan.features)
        .bind(Json(&plan.badges))
        .bind(i64::from(plan.service_limit))
        .bind(plan.is_active)
        .bind(plan.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("subscription_plans_name_key") {
                    return DomainError::new(
                        ErrorCode::ValidationFailed,
                        format!("Plan name already exists: {}", plan.name),
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to create plan: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        // The name column stays as written at creation; admin tooling and
        // badge rules refer to plans by name.
        let result = sqlx::query(
            r#"
            UPDATE subscription_plans SET
                display_name = $2,
                monthly_price_cents = $3,
                yearly_price_cents = $4,
                features = $5,
                badges = $6,
                service_limit = $7,
                is_active = $8
            WHERE id = $1
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(&plan.display_name)
        .bind(plan.monthly_price_cents)
        .bind(plan.yearly_price_cents)
        .bind(&plan.features)
        .bind(Json(&plan.badges))
        .bind(i64::from(plan.service_limit))
        .bind(plan.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update plan: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PlanNotFound, "Plan not found"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, display_name, monthly_price_cents, yearly_price_cents,
                   features, badges, service_limit, is_active, created_at
            FROM subscription_plans
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find plan: {}", e))
        })?;

        row.map(SubscriptionPlan::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[PlanId]) -> Result<Vec<SubscriptionPlan>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, display_name, monthly_price_cents, yearly_price_cents,
                   features, badges, service_limit, is_active, created_at
            FROM subscription_plans
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find plans: {}", e))
        })?;

        rows.into_iter().map(SubscriptionPlan::try_from).collect()
    }

    async fn find_free(&self) -> Result<Option<SubscriptionPlan>, DomainError> {
        // Oldest qualifying plan wins so the resolved ID never flips between
        // two zero-price plans.
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, display_name, monthly_price_cents, yearly_price_cents,
                   features, badges, service_limit, is_active, created_at
            FROM subscription_plans
            WHERE monthly_price_cents = 0
              AND is_active = TRUE
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find free plan: {}", e))
        })?;

        row.map(SubscriptionPlan::try_from).transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>, DomainError> {
        let rows: Vec<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, display_name, monthly_price_cents, yearly_price_cents,
                   features, badges, service_limit, is_active, created_at
            FROM subscription_plans
            WHERE ($1 = FALSE OR is_active = TRUE)
            ORDER BY monthly_price_cents ASC, created_at ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list plans: {}", e))
        })?;

        rows.into_iter().map(SubscriptionPlan::try_from).collect()
    }
}
