//! Sleuthdex server binary.
//!
//! Wires configuration, the Postgres adapters, the HTTP surface, and the
//! background maintenance loop, then serves until interrupted.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sleuthdex::adapters::http::{app_router, AppState, DirectoryLimits};
use sleuthdex::adapters::postgres::{
    PostgresCatalogReader, PostgresDetectiveRepository, PostgresPlanRepository,
    PostgresVisibilityRepository,
};
use sleuthdex::application::RefreshVisibilityScoresCommand;
use sleuthdex::config::{AppConfig, SchedulerConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    info!(
        environment = config.server.environment.as_str(),
        "Starting sleuthdex"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let state = AppState::new(
        Arc::new(PostgresDetectiveRepository::new(pool.clone())),
        Arc::new(PostgresPlanRepository::new(pool.clone())),
        Arc::new(PostgresVisibilityRepository::new(pool.clone())),
        Arc::new(PostgresCatalogReader::new(pool)),
        DirectoryLimits {
            default_page_size: config.directory.default_page_size,
            max_page_size: config.directory.max_page_size,
        },
    );

    if config.scheduler.enabled {
        spawn_scheduler(state.clone(), config.scheduler.clone());
    } else {
        warn!("Scheduler disabled; subscriptions will only expire via lazy checks");
    }

    let app = app_router()
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(cors_layer(&config.server))
                .layer(CompressionLayer::new())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state);

    let addr = config.server.socket_addr()?;
    info!(%addr, "Listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down cleanly");
    Ok(())
}

/// Env-filter logging; JSON output in production so log shippers can parse it.
///
/// `RUST_LOG` overrides the configured filter when set.
fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Configured origins get an allow-list; no configuration means permissive,
/// which is only suitable for development.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    }
}

/// Periodic maintenance: apply due plan switches, expire lapsed
/// subscriptions, then optionally refresh score snapshots.
///
/// The first tick fires immediately so a restart catches up on overdue work.
fn spawn_scheduler(state: AppState, config: SchedulerConfig) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval());
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_maintenance_tick(&state, &config).await;
        }
    });
}

async fn run_maintenance_tick(state: &AppState, config: &SchedulerConfig) {
    // Due plan switches go first: a profile whose scheduled switch is due
    // must land on its chosen plan before the sweep reads it as expired.
    match state.apply_pending_downgrade_handler().run_due().await {
        Ok(report) => {
            if report.checked > 0 {
                info!(
                    checked = report.checked,
                    applied = report.applied,
                    errors = report.errors.len(),
                    "Applied due plan switches"
                );
            }
        }
        Err(e) => error!(error = %e, "Pending downgrade pass failed"),
    }

    match state.expiry.sweep().await {
        Ok(report) => {
            if report.checked > 0 {
                info!(
                    checked = report.checked,
                    downgraded = report.downgraded,
                    errors = report.errors.len(),
                    "Expiry sweep finished"
                );
            }
        }
        Err(e) => error!(error = %e, "Expiry sweep failed"),
    }

    if config.refresh_scores {
        let refresh = state.refresh_visibility_scores_handler();
        match refresh
            .handle(RefreshVisibilityScoresCommand {
                limit: config.refresh_limit,
            })
            .await
        {
            Ok(result) => info!(
                refreshed = result.refreshed,
                errors = result.errors.len(),
                "Refreshed visibility scores"
            ),
            Err(e) => error!(error = %e, "Score refresh failed"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
