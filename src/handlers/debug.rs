use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct DebugInfo {
    pub version: String,
    pub git_sha: String,
    pub environment: String,
    pub uptime_seconds: u64,
    pub database_status: String,
    pub database_connections: u32,
    pub active_policy_id: Option<i32>,
    pub balance_cache_ttl_seconds: u64,
    pub timestamp: u64,
}

static START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

/// Handler for the /debug endpoint (behind `require_debug_key`)
#[utoipa::path(
    get,
    path = "/debug",
    responses(
        (status = 200, description = "Build, uptime and database diagnostics", body = DebugInfo),
        (status = 401, description = "Missing or wrong X-Debug-Key")
    ),
    tag = "health",
    security(("debug_key" = []))
)]
pub async fn debug_handler(State(state): State<Arc<AppState>>) -> Json<DebugInfo> {
    let db_status = match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    // Missing policy is reported as null, not as a failure
    let active_policy_id = state.policy.active().await.ok().map(|p| p.id);

    let info = DebugInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_sha: option_env!("GIT_SHA").unwrap_or("unknown").to_string(),
        environment: std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string()),
        uptime_seconds: START_TIME.elapsed().unwrap_or_default().as_secs(),
        database_status: db_status,
        database_connections: state.db.size(),
        active_policy_id,
        balance_cache_ttl_seconds: state.config.balance_cache_ttl.as_secs(),
        timestamp: SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    };

    Json(info)
}
