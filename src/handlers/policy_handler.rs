use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    models::{Policy, UpdatePolicyInput},
    AppResult, AppState,
};

/// GET /api/policy
#[utoipa::path(
    get,
    path = "/api/policy",
    responses(
        (status = 200, description = "The active policy", body = Policy),
        (status = 404, description = "No policy configured yet")
    ),
    tag = "policy"
)]
pub async fn get_policy(State(state): State<Arc<AppState>>) -> AppResult<Json<Policy>> {
    Ok(Json(state.policy.active().await?))
}

/// PUT /api/policy - Saves a new version which becomes active
#[utoipa::path(
    put,
    path = "/api/policy",
    request_body = UpdatePolicyInput,
    responses(
        (status = 200, description = "Policy saved", body = Policy),
        (status = 422, description = "Duplicate non-working day or negative unit value")
    ),
    tag = "policy"
)]
pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UpdatePolicyInput>,
) -> AppResult<Json<Policy>> {
    Ok(Json(state.policy.update(input).await?))
}
