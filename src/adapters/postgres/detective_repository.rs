//! PostgreSQL implementation of DetectiveRepository.
//!
//! Provides persistent storage for Detective aggregates using PostgreSQL.

use crate::domain::detective::{Detective, DetectiveLevel, DetectiveStatus};
use crate::domain::foundation::{DetectiveId, DomainError, ErrorCode, PlanId, Timestamp, UserId};
use crate::domain::subscription::BillingCycle;
use crate::ports::{DetectiveRepository, DirectoryFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the DetectiveRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresDetectiveRepository {
    pool: PgPool,
}

impl PostgresDetectiveRepository {
    /// Creates a new PostgresDetectiveRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a detective profile.
#[derive(Debug, sqlx::FromRow)]
struct DetectiveRow {
    id: Uuid,
    user_id: String,
    business_name: Option<String>,
    country: String,
    city: Option<String>,
    description: Option<String>,
    status: String,
    level: String,
    subscription_package_id: Option<Uuid>,
    billing_cycle: Option<String>,
    subscription_activated_at: Option<DateTime<Utc>>,
    subscription_expires_at: Option<DateTime<Utc>>,
    pending_package_id: Option<Uuid>,
    pending_billing_cycle: Option<String>,
    has_blue_tick: bool,
    blue_tick_activated_at: Option<DateTime<Utc>>,
    blue_tick_addon: bool,
    last_active: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DetectiveRow> for Detective {
    type Error = DomainError;

    fn try_from(row: DetectiveRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let level = parse_level(&row.level);
        let billing_cycle = row
            .billing_cycle
            .as_deref()
            .map(parse_billing_cycle)
            .transpose()?;
        let pending_billing_cycle = row
            .pending_billing_cycle
            .as_deref()
            .map(parse_billing_cycle)
            .transpose()?;

        Ok(Detective {
            id: DetectiveId::from_uuid(row.id),
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            business_name: row.business_name,
            country: row.country,
            city: row.city,
            description: row.description,
            status,
            level,
            subscription_package_id: row.subscription_package_id.map(PlanId::from_uuid),
            billing_cycle,
            subscription_activated_at: row.subscription_activated_at.map(Timestamp::from_datetime),
            subscription_expires_at: row.subscription_expires_at.map(Timestamp::from_datetime),
            pending_package_id: row.pending_package_id.map(PlanId::from_uuid),
            pending_billing_cycle,
            has_blue_tick: row.has_blue_tick,
            blue_tick_activated_at: row.blue_tick_activated_at.map(Timestamp::from_datetime),
            blue_tick_addon: row.blue_tick_addon,
            last_active: row.last_active.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<DetectiveStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(DetectiveStatus::Active),
        "pending" => Ok(DetectiveStatus::Pending),
        "suspended" => Ok(DetectiveStatus::Suspended),
        "inactive" => Ok(DetectiveStatus::Inactive),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )),
    }
}

/// Parses a stored level, falling back to level1 for unknown values.
///
/// Old rows carry free-form level strings; a junk value must not make the
/// whole profile unreadable.
fn parse_level(s: &str) -> DetectiveLevel {
    match s.to_lowercase().as_str() {
        "level2" => DetectiveLevel::Level2,
        "level3" => DetectiveLevel::Level3,
        "pro" => DetectiveLevel::Pro,
        _ => DetectiveLevel::Level1,
    }
}

fn parse_billing_cycle(s: &str) -> Result<BillingCycle, DomainError> {
    match s.to_lowercase().as_str() {
        "monthly" => Ok(BillingCycle::Monthly),
        "yearly" => Ok(BillingCycle::Yearly),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid billing cycle value: {}", s),
        )),
    }
}

fn status_to_string(status: &DetectiveStatus) -> &'static str {
    match status {
        DetectiveStatus::Active => "active",
        DetectiveStatus::Pending => "pending",
        DetectiveStatus::Suspended => "suspended",
        DetectiveStatus::Inactive => "inactive",
    }
}

fn level_to_string(level: &DetectiveLevel) -> &'static str {
    match level {
        DetectiveLevel::Level1 => "level1",
        DetectiveLevel::Level2 => "level2",
        DetectiveLevel::Level3 => "level3",
        DetectiveLevel::Pro => "pro",
    }
}

fn cycle_to_string(cycle: &BillingCycle) -> &'static str {
    match cycle {
        BillingCycle::Monthly => "monthly",
        BillingCycle::Yearly => "yearly",
    }
}

#[async_trait]
impl DetectiveRepository for PostgresDetectiveRepository {
    async fn create(&self, detective: &Detective) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO detectives (
                id, user_id, business_name, country, city, description, status, level,
                subscription_package_id, billing_cycle, subscription_activated_at,
                subscription_expires_at, pending_package_id, pending_billing_cycle,
                has_blue_tick, blue_tick_activated_at, blue_tick_addon, last_active,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
            )
            "#,
        )
        .bind(detective.id.as_uuid())
        .bind(detective.user_id.as_str())
        .bind(&detective.business_name)
        .bind(&detective.country)
        .bind(&detective.city)
        .bind(&detective.description)
        .bind(status_to_string(&detective.status))
        .bind(level_to_string(&detective.level))
        .bind(detective.subscription_package_id.map(|id| *id.as_uuid()))
        .bind(detective.billing_cycle.as_ref().map(cycle_to_string))
        .bind(
            detective
                .subscription_activated_at
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(
            detective
                .subscription_expires_at
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(detective.pending_package_id.map(|id| *id.as_uuid()))
        .bind(detective.pending_billing_cycle.as_ref().map(cycle_to_string))
        .bind(detective.has_blue_tick)
        .bind(
            detective
                .blue_tick_activated_at
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(detective.blue_tick_addon)
        .bind(detective.last_active.as_ref().map(Timestamp::as_datetime))
        .bind(detective.created_at.as_datetime())
        .bind(detective.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("detectives_user_id_key") {
                    return DomainError::new(
                        ErrorCode::ValidationFailed,
                        "User already has a detective profile",
                    );
                }
                if db_err.constraint() == Some("detectives_user_id_fkey") {
                    return DomainError::new(ErrorCode::UserNotFound, "User account not found");
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to create detective: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DetectiveId) -> Result<Option<Detective>, DomainError> {
        let row: Option<DetectiveRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, business_name, country, city, description, status, level,
                   subscription_package_id, billing_cycle, subscription_activated_at,
                   subscription_expires_at, pending_package_id, pending_billing_cycle,
                   has_blue_tick, blue_tick_activated_at, blue_tick_addon, last_active,
                   created_at, updated_at
            FROM detectives
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find detective: {}", e))
        })?;

        row.map(Detective::try_from).transpose()
    }

    async fn list_page(&self, filter: &DirectoryFilter) -> Result<Vec<Detective>, DomainError> {
        let text_match = filter.query.as_ref().map(|q| format!("%{}%", q));

        let rows: Vec<DetectiveRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, business_name, country, city, description, status, level,
                   subscription_package_id, billing_cycle, subscription_activated_at,
                   subscription_expires_at, pending_package_id, pending_billing_cycle,
                   has_blue_tick, blue_tick_activated_at, blue_tick_addon, last_active,
                   created_at, updated_at
            FROM detectives
            WHERE status = $1
              AND ($2::text IS NULL OR country = $2)
              AND ($3::text IS NULL OR business_name ILIKE $3 OR description ILIKE $3)
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(status_to_string(&filter.status))
        .bind(&filter.country)
        .bind(&text_match)
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list detectives: {}", e))
        })?;

        rows.into_iter().map(Detective::try_from).collect()
    }

    async fn update_subscription(&self, detective: &Detective) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE detectives SET
                subscription_package_id = $2,
                billing_cycle = $3,
                subscription_activated_at = $4,
                subscription_expires_at = $5,
                pending_package_id = $6,
                pending_billing_cycle = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(detective.id.as_uuid())
        .bind(detective.subscription_package_id.map(|id| *id.as_uuid()))
        .bind(detective.billing_cycle.as_ref().map(cycle_to_string))
        .bind(
            detective
                .subscription_activated_at
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(
            detective
                .subscription_expires_at
                .as_ref()
                .map(Timestamp::as_datetime),
        )
        .bind(detective.pending_package_id.map(|id| *id.as_uuid()))
        .bind(detective.pending_billing_cycle.as_ref().map(cycle_to_string))
        .bind(detective.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update subscription: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DetectiveNotFound,
                "Detective not found",
            ));
        }

        Ok(())
    }

    async fn set_blue_tick(
        &self,
        id: &DetectiveId,
        granted: bool,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        // Granting stamps the activation time; revoking keeps the old stamp.
        let result = sqlx::query(
            r#"
            UPDATE detectives SET
                has_blue_tick = $2,
                blue_tick_activated_at = CASE WHEN $2 THEN $3 ELSE blue_tick_activated_at END,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(granted)
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to set blue tick: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DetectiveNotFound,
                "Detective not found",
            ));
        }

        Ok(())
    }

    async fn find_expired_paid(
        &self,
        free_plan_id: &PlanId,
        now: &Timestamp,
    ) -> Result<Vec<Detective>, DomainError> {
        let rows: Vec<DetectiveRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, business_name, country, city, description, status, level,
                   subscription_package_id, billing_cycle, subscription_activated_at,
                   subscription_expires_at, pending_package_id, pending_billing_cycle,
                   has_blue_tick, blue_tick_activated_at, blue_tick_addon, last_active,
                   created_at, updated_at
            FROM detectives
            WHERE subscription_expires_at IS NOT NULL
              AND subscription_expires_at < $2
              AND subscription_package_id IS NOT NULL
              AND subscription_package_id != $1
            ORDER BY subscription_expires_at ASC
            "#,
        )
        .bind(free_plan_id.as_uuid())
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find expired subscriptions: {}", e),
            )
        })?;

        rows.into_iter().map(Detective::try_from).collect()
    }

    async fn find_due_pending(&self, now: &Timestamp) -> Result<Vec<Detective>, DomainError> {
        let rows: Vec<DetectiveRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, business_name, country, city, description, status, level,
                   subscription_package_id, billing_cycle, subscription_activated_at,
                   subscription_expires_at, pending_package_id, pending_billing_cycle,
                   has_blue_tick, blue_tick_activated_at, blue_tick_addon, last_active,
                   created_at, updated_at
            FROM detectives
            WHERE pending_package_id IS NOT NULL
              AND subscription_expires_at IS NOT NULL
              AND subscription_expires_at <= $1
            ORDER BY subscription_expires_at ASC
            "#,
        )
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find due plan switches: {}", e),
            )
        })?;

        rows.into_iter().map(Detective::try_from).collect()
    }
}
