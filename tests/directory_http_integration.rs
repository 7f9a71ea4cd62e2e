//! HTTP integration tests for the public directory and admin endpoints.
//!
//! Each test drives the full router with `tower::ServiceExt::oneshot` over
//! seeded in-memory ports, verifying:
//! - Ranked directory listing with scores, positions, and hidden profiles
//! - Profile registration and the free-plan starting state
//! - Profile reads with resolved plan, badges, and read-time repair
//! - Admin subscription activation and the error taxonomy on bad input
//! - The JSON error body shape shared by all areas

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use sleuthdex::adapters::http::{app_router, AppState, DirectoryLimits};
use sleuthdex::domain::detective::{Detective, DetectiveStatus};
use sleuthdex::domain::foundation::{
    DetectiveId, DomainError, ErrorCode, PlanId, ServiceId, Timestamp, UserId,
};
use sleuthdex::domain::plan::SubscriptionPlan;
use sleuthdex::domain::ranking::{ServiceRef, ServiceReviewStats};
use sleuthdex::domain::visibility::VisibilityRecord;
use sleuthdex::ports::{
    CatalogReader, DetectiveRepository, DirectoryFilter, PlanRepository, VisibilityRepository,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct MockDetectives {
    rows: Mutex<Vec<Detective>>,
}

impl MockDetectives {
    fn with(rows: Vec<Detective>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn stored(&self, id: &DetectiveId) -> Detective {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == *id)
            .cloned()
            .unwrap()
    }

    fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl DetectiveRepository for MockDetectives {
    async fn create(&self, detective: &Detective) -> Result<(), DomainError> {
        self.rows.lock().unwrap().push(detective.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &DetectiveId) -> Result<Option<Detective>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == *id)
            .cloned())
    }

    async fn list_page(&self, filter: &DirectoryFilter) -> Result<Vec<Detective>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut page: Vec<Detective> = rows
            .iter()
            .filter(|d| d.status == filter.status)
            .filter(|d| {
                filter
                    .country
                    .as_ref()
                    .map_or(true, |country| d.country == *country)
            })
            .cloned()
            .collect();
        page.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        page.truncate(filter.limit as usize);
        Ok(page)
    }

    async fn update_subscription(&self, detective: &Detective) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .iter_mut()
            .find(|d| d.id == detective.id)
            .ok_or_else(|| DomainError::new(ErrorCode::DetectiveNotFound, "missing"))?;
        stored.subscription_package_id = detective.subscription_package_id;
        stored.billing_cycle = detective.billing_cycle;
        stored.subscription_activated_at = detective.subscription_activated_at;
        stored.subscription_expires_at = detective.subscription_expires_at;
        stored.pending_package_id = detective.pending_package_id;
        stored.pending_billing_cycle = detective.pending_billing_cycle;
        stored.updated_at = detective.updated_at;
        Ok(())
    }

    async fn set_blue_tick(
        &self,
        id: &DetectiveId,
        granted: bool,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .iter_mut()
            .find(|d| d.id == *id)
            .ok_or_else(|| DomainError::new(ErrorCode::DetectiveNotFound, "missing"))?;
        stored.has_blue_tick = granted;
        stored.blue_tick_activated_at = granted.then_some(now);
        Ok(())
    }

    async fn find_expired_paid(
        &self,
        free_plan_id: &PlanId,
        now: &Timestamp,
    ) -> Result<Vec<Detective>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.subscription_expires_at
                    .map_or(false, |expires| expires.is_before(now))
                    && d.subscription_package_id
                        .map_or(false, |package| package != *free_plan_id)
            })
            .cloned()
            .collect())
    }

    async fn find_due_pending(&self, now: &Timestamp) -> Result<Vec<Detective>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|d| {
                d.pending_package_id.is_some()
                    && d.subscription_expires_at
                        .map_or(false, |expires| !expires.is_after(now))
            })
            .cloned()
            .collect())
    }
}

struct MockPlans {
    rows: Mutex<Vec<SubscriptionPlan>>,
}

impl MockPlans {
    fn with(rows: Vec<SubscriptionPlan>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl PlanRepository for MockPlans {
    async fn create(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        self.rows.lock().unwrap().push(plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = rows
            .iter_mut()
            .find(|p| p.id == plan.id)
            .ok_or_else(|| DomainError::new(ErrorCode::PlanNotFound, "missing"))?;
        *stored = plan.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn find_by_ids(&self, ids: &[PlanId]) -> Result<Vec<SubscriptionPlan>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_free(&self) -> Result<Option<SubscriptionPlan>, DomainError> {
        let rows = self.rows.lock().unwrap();
        let mut free: Vec<&SubscriptionPlan> =
            rows.iter().filter(|p| p.is_free() && p.is_active).collect();
        free.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(free.first().map(|p| (*p).clone()))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<SubscriptionPlan>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect())
    }
}

struct MockVisibility {
    rows: Mutex<HashMap<DetectiveId, VisibilityRecord>>,
}

impl MockVisibility {
    fn empty() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }

    fn with(records: Vec<VisibilityRecord>) -> Self {
        Self {
            rows: Mutex::new(records.into_iter().map(|r| (r.detective_id, r)).collect()),
        }
    }
}

#[async_trait]
impl VisibilityRepository for MockVisibility {
    async fn find_by_detective(
        &self,
        id: &DetectiveId,
    ) -> Result<Option<VisibilityRecord>, DomainError> {
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn find_by_detectives(
        &self,
        ids: &[DetectiveId],
    ) -> Result<Vec<VisibilityRecord>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn ensure(&self, record: &VisibilityRecord) -> Result<(), DomainError> {
        self.rows
            .lock()
            .unwrap()
            .entry(record.detective_id)
            .or_insert_with(|| record.clone());
        Ok(())
    }

    async fn upsert_settings(&self, record: &VisibilityRecord) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&record.detective_id) {
            Some(stored) => {
                stored.is_visible = record.is_visible;
                stored.is_featured = record.is_featured;
                stored.manual_rank = record.manual_rank;
                stored.updated_at = record.updated_at;
            }
            None => {
                rows.insert(record.detective_id, record.clone());
            }
        }
        Ok(())
    }

    async fn record_score(
        &self,
        id: &DetectiveId,
        score: i64,
        evaluated_at: Timestamp,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .entry(*id)
            .or_insert_with(|| VisibilityRecord::with_defaults(*id, evaluated_at));
        record.record_score(score, evaluated_at);
        Ok(())
    }
}

struct MockCatalog {
    services: Vec<ServiceRef>,
    stats: Vec<ServiceReviewStats>,
}

impl MockCatalog {
    fn empty() -> Self {
        Self {
            services: Vec::new(),
            stats: Vec::new(),
        }
    }
}

#[async_trait]
impl CatalogReader for MockCatalog {
    async fn services_by_detectives(
        &self,
        detective_ids: &[DetectiveId],
    ) -> Result<Vec<ServiceRef>, DomainError> {
        Ok(self
            .services
            .iter()
            .filter(|s| detective_ids.contains(&s.detective_id))
            .copied()
            .collect())
    }

    async fn review_stats_by_services(
        &self,
        service_ids: &[ServiceId],
    ) -> Result<Vec<ServiceReviewStats>, DomainError> {
        Ok(self
            .stats
            .iter()
            .filter(|s| service_ids.contains(&s.service_id))
            .copied()
            .collect())
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

fn test_app(
    detectives: Arc<MockDetectives>,
    plans: Arc<MockPlans>,
    visibility: Arc<MockVisibility>,
    catalog: Arc<MockCatalog>,
) -> axum::Router {
    let state = AppState::new(
        detectives,
        plans,
        visibility,
        catalog,
        DirectoryLimits {
            default_page_size: 20,
            max_page_size: 50,
        },
    );
    app_router().with_state(state)
}

fn free_plan() -> SubscriptionPlan {
    SubscriptionPlan::new(PlanId::new(), "free", "Free", 0, 0, 2, Timestamp::now()).unwrap()
}

fn pro_plan() -> SubscriptionPlan {
    let mut plan = SubscriptionPlan::new(
        PlanId::new(),
        "pro",
        "Pro",
        4900,
        49000,
        10,
        Timestamp::now(),
    )
    .unwrap();
    plan.badges.blue_tick = true;
    plan.badges.pro = true;
    plan
}

fn active_detective(business_name: &str, plan_id: PlanId) -> Detective {
    let mut detective = Detective::register(
        DetectiveId::new(),
        UserId::new(format!("user-{}", DetectiveId::new())).unwrap(),
        Some(business_name.to_string()),
        "GB".to_string(),
        plan_id,
        Timestamp::now(),
    );
    detective.status = DetectiveStatus::Active;
    detective
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_reports_ok() {
    let app = test_app(
        Arc::new(MockDetectives::with(vec![])),
        Arc::new(MockPlans::with(vec![])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_directory_ranks_seeded_profiles() {
    let free = free_plan();
    let free_id = free.id;

    // An admin override beats any computed score
    let boosted = active_detective("Boosted Bureau", free_id);
    let mut boosted_row = VisibilityRecord::with_defaults(boosted.id, Timestamp::now());
    boosted_row.manual_rank = Some(5000);
    boosted_row.is_featured = true;

    // Scored normally: level 100 + active today 100 + reviews 300. The free
    // package earns no badge points.
    let reviewed = active_detective("Reviewed Agency", free_id);
    let service = ServiceRef {
        service_id: ServiceId::new(),
        detective_id: reviewed.id,
    };
    let stats = ServiceReviewStats {
        service_id: service.service_id,
        count: 12,
        average: 4.6,
    };

    let app = test_app(
        Arc::new(MockDetectives::with(vec![boosted.clone(), reviewed.clone()])),
        Arc::new(MockPlans::with(vec![free])),
        Arc::new(MockVisibility::with(vec![boosted_row])),
        Arc::new(MockCatalog {
            services: vec![service],
            stats: vec![stats],
        }),
    );

    let response = app.oneshot(get("/api/detectives")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["degraded"], false);

    let entries = body["detectives"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["id"], boosted.id.to_string());
    assert_eq!(entries[0]["score"], 5000);
    assert_eq!(entries[0]["rank_position"], 1);
    assert_eq!(entries[0]["is_featured"], true);

    assert_eq!(entries[1]["id"], reviewed.id.to_string());
    assert_eq!(entries[1]["score"], 500);
    assert_eq!(entries[1]["rank_position"], 2);
    assert_eq!(entries[1]["review_stats"]["count"], 12);
}

#[tokio::test]
async fn test_directory_hides_invisible_profiles() {
    let free = free_plan();
    let free_id = free.id;

    let listed = active_detective("Listed Agency", free_id);
    let hidden = active_detective("Hidden Agency", free_id);
    let mut hidden_row = VisibilityRecord::with_defaults(hidden.id, Timestamp::now());
    hidden_row.is_visible = false;

    let app = test_app(
        Arc::new(MockDetectives::with(vec![listed.clone(), hidden])),
        Arc::new(MockPlans::with(vec![free])),
        Arc::new(MockVisibility::with(vec![hidden_row])),
        Arc::new(MockCatalog::empty()),
    );

    let response = app.oneshot(get("/api/detectives")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body["detectives"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], listed.id.to_string());
}

#[tokio::test]
async fn test_register_starts_on_the_free_plan() {
    let free = free_plan();
    let free_id = free.id;
    let detectives = Arc::new(MockDetectives::with(vec![]));

    let app = test_app(
        detectives.clone(),
        Arc::new(MockPlans::with(vec![free])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let request = post_json(
        "/api/detectives",
        json!({
            "user_id": "user-reg-1",
            "business_name": "Shade & Partners",
            "country": "DE"
        }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["subscription_package_id"], free_id.to_string());
    assert_eq!(body["status"], "pending");
    assert_eq!(body["country"], "DE");
    assert_eq!(body["has_blue_tick"], false);
    assert!(body["subscription_expires_at"].is_null());

    assert_eq!(detectives.count(), 1);
}

#[tokio::test]
async fn test_get_profile_resolves_plan_and_badges() {
    let free = free_plan();
    let pro = pro_plan();
    let pro_id = pro.id;

    let mut detective = active_detective("Hart Investigations", free.id);
    detective.subscription_package_id = Some(pro_id);
    detective.subscription_expires_at = Some(Timestamp::now().add_days(20));
    detective.has_blue_tick = true;
    let detective_id = detective.id;

    let app = test_app(
        Arc::new(MockDetectives::with(vec![detective])),
        Arc::new(MockPlans::with(vec![free, pro])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let uri = format!("/api/detectives/{detective_id}");
    let response = app.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["plan"]["name"], "pro");
    assert_eq!(body["badges"]["blue_tick"], true);
    assert_eq!(body["badges"]["pro"], true);
    assert_eq!(body["service_limit"], 10);
    assert_eq!(body["downgraded"], false);
}

#[tokio::test]
async fn test_get_profile_resets_lapsed_period() {
    let free = free_plan();
    let free_id = free.id;
    let pro = pro_plan();

    let mut detective = active_detective("Lapsed Agency", free_id);
    detective.subscription_package_id = Some(pro.id);
    detective.subscription_expires_at = Some(Timestamp::now().minus_days(2));
    detective.has_blue_tick = true;
    let detective_id = detective.id;

    let app = test_app(
        Arc::new(MockDetectives::with(vec![detective])),
        Arc::new(MockPlans::with(vec![free, pro])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let uri = format!("/api/detectives/{detective_id}");
    let response = app.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["downgraded"], true);
    assert_eq!(body["plan"]["name"], "free");
    assert_eq!(body["service_limit"], 2);
    assert_eq!(body["badges"]["blue_tick"], false);
    assert_eq!(
        body["detective"]["subscription_package_id"],
        free_id.to_string()
    );
}

#[tokio::test]
async fn test_get_unknown_profile_returns_404() {
    let app = test_app(
        Arc::new(MockDetectives::with(vec![])),
        Arc::new(MockPlans::with(vec![free_plan()])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let uri = format!("/api/detectives/{}", Uuid::new_v4());
    let response = app.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "DETECTIVE_NOT_FOUND");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_empty_visibility_patch_is_rejected() {
    let free = free_plan();
    let detective = active_detective("Patched Agency", free.id);
    let detective_id = detective.id;

    let app = test_app(
        Arc::new(MockDetectives::with(vec![detective])),
        Arc::new(MockPlans::with(vec![free])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let uri = format!("/api/admin/detectives/{detective_id}/visibility");
    let response = app.oneshot(patch_json(&uri, json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_unknown_billing_cycle_is_rejected() {
    let free = free_plan();
    let detective = active_detective("Cycle Agency", free.id);
    let detective_id = detective.id;

    let app = test_app(
        Arc::new(MockDetectives::with(vec![detective])),
        Arc::new(MockPlans::with(vec![free])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let uri = format!("/api/admin/detectives/{detective_id}/subscription");
    let request = post_json(
        &uri,
        json!({ "plan_id": Uuid::new_v4(), "billing_cycle": "weekly" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "INVALID_BILLING_CYCLE");
}

#[tokio::test]
async fn test_activate_subscription_over_http() {
    let free = free_plan();
    let pro = pro_plan();
    let pro_id = pro.id;
    let detective = active_detective("Upgrading Agency", free.id);
    let detective_id = detective.id;
    let detectives = Arc::new(MockDetectives::with(vec![detective]));

    let app = test_app(
        detectives.clone(),
        Arc::new(MockPlans::with(vec![free, pro])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let uri = format!("/api/admin/detectives/{detective_id}/subscription");
    let request = post_json(
        &uri,
        json!({ "plan_id": pro_id.as_uuid(), "billing_cycle": "monthly" }),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["renewed"], false);
    assert_eq!(body["subscription"]["package_id"], pro_id.to_string());
    assert_eq!(body["subscription"]["billing_cycle"], "monthly");
    assert_eq!(body["subscription"]["has_blue_tick"], true);
    assert!(body["subscription"]["expires_at"].is_string());

    // The mirror landed in the store, not just the response
    assert!(detectives.stored(&detective_id).has_blue_tick);
}

#[tokio::test]
async fn test_admin_sweep_endpoint_reports() {
    let app = test_app(
        Arc::new(MockDetectives::with(vec![])),
        Arc::new(MockPlans::with(vec![free_plan()])),
        Arc::new(MockVisibility::empty()),
        Arc::new(MockCatalog::empty()),
    );

    let response = app
        .oneshot(post_json("/api/admin/subscriptions/expire", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["checked"], 0);
    assert_eq!(body["downgraded"], 0);
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
}
