mod config;
mod db;
mod engine;
mod error;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod services;
mod startup;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

use db::{AttendanceRepository, EmployeeDirectory, LeaveRepository, PolicyRepository};
use services::{AttendanceService, LeaveService, PayrollService, PolicyService};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
    pub attendance: Arc<AttendanceService>,
    pub leave: Arc<LeaveService>,
    pub payroll: Arc<PayrollService>,
    pub policy: Arc<PolicyService>,
}

impl AppState {
    /// Wires every service to the PostgreSQL store behind `db`.
    pub fn new(db: sqlx::PgPool, config: AppConfig, metrics: Arc<MetricsState>) -> Self {
        let store = Arc::new(db::PgStore::new(db.clone()));
        Self::with_store(db, config, metrics, store)
    }

    pub fn with_store<S>(db: sqlx::PgPool, config: AppConfig, metrics: Arc<MetricsState>, store: Arc<S>) -> Self
    where
        S: PolicyRepository + EmployeeDirectory + AttendanceRepository + LeaveRepository + 'static,
    {
        Self {
            attendance: Arc::new(AttendanceService::new(store.clone(), store.clone())),
            leave: Arc::new(LeaveService::new(store.clone(), store.clone(), config.balance_cache_ttl)),
            payroll: Arc::new(PayrollService::new(store.clone(), store.clone(), store.clone())),
            policy: Arc::new(PolicyService::new(store)),
            db,
            config,
            metrics,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with conditional JSON/text output
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,hr_attendance=debug,tower_http=debug".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    let db = db::create_pool(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to create database pool: {}", e);
        e
    })?;
    tracing::info!("Database pool created successfully");

    if config.run_migrations {
        db::run_migrations(&db).await.map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            e
        })?;
        tracing::info!("Migrations applied");
    }

    let metrics_state = Arc::new(handlers::setup_metrics_recorder()?);
    tracing::info!("Metrics recorder initialized");

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(db, config, metrics_state));

    let app = startup::build_router(state)?;

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
