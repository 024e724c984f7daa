use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Datelike, Local};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    middleware::RequestId,
    models::{
        CreateLeaveTypeInput, LeaveActionInput, LeaveBalance, LeaveMutationResponse, LeaveRequest, LeaveStatus,
        LeaveType, SubmitLeaveRequestInput,
    },
    AppError, AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetLeaveRequestsQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<i32>,
    /// Pending, Approved or Rejected
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetLeaveBalanceQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: i32,
    #[serde(rename = "leaveTypeId")]
    pub leave_type_id: i32,
    /// Defaults to the current year
    pub year: Option<i32>,
}

/// GET /api/leave/types
#[utoipa::path(
    get,
    path = "/api/leave/types",
    responses(
        (status = 200, description = "All leave types", body = Vec<LeaveType>)
    ),
    tag = "leave"
)]
pub async fn get_leave_types(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<LeaveType>>> {
    Ok(Json(state.leave.list_types().await?))
}

/// POST /api/leave/types
#[utoipa::path(
    post,
    path = "/api/leave/types",
    request_body = CreateLeaveTypeInput,
    responses(
        (status = 200, description = "Leave type created", body = LeaveType),
        (status = 422, description = "Invalid name or yearly cap, or duplicate name")
    ),
    tag = "leave"
)]
pub async fn create_leave_type(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateLeaveTypeInput>,
) -> AppResult<Json<LeaveType>> {
    Ok(Json(state.leave.create_type(input).await?))
}

/// DELETE /api/leave/types/{id}
#[utoipa::path(
    delete,
    path = "/api/leave/types/{id}",
    params(
        ("id" = i32, Path, description = "Leave type ID")
    ),
    responses(
        (status = 200, description = "Leave type deleted", body = LeaveMutationResponse),
        (status = 404, description = "Leave type not found"),
        (status = 409, description = "Leave type is referenced by requests")
    ),
    tag = "leave"
)]
pub async fn delete_leave_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<LeaveMutationResponse>> {
    state.leave.delete_type(id).await?;

    Ok(Json(LeaveMutationResponse {
        success: true,
        message: Some("Leave type deleted".to_string()),
    }))
}

/// GET /api/leave/requests?employeeId=&status=
#[utoipa::path(
    get,
    path = "/api/leave/requests",
    params(GetLeaveRequestsQuery),
    responses(
        (status = 200, description = "Leave requests, newest first", body = Vec<LeaveRequest>),
        (status = 400, description = "Unknown status filter")
    ),
    tag = "leave"
)]
pub async fn get_leave_requests(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetLeaveRequestsQuery>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<LeaveStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    Ok(Json(state.leave.list_requests(query.employee_id, status).await?))
}

/// POST /api/leave/requests
#[utoipa::path(
    post,
    path = "/api/leave/requests",
    request_body = SubmitLeaveRequestInput,
    responses(
        (status = 200, description = "Request stored as Pending", body = LeaveRequest),
        (status = 404, description = "Unknown employee or leave type"),
        (status = 409, description = "Employee already has a pending request"),
        (status = 422, description = "Past start date, insufficient balance, or invalid input")
    ),
    tag = "leave"
)]
pub async fn submit_leave_request(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(input): Json<SubmitLeaveRequestInput>,
) -> AppResult<Json<LeaveRequest>> {
    tracing::debug!(request_id = %request_id.0, employee_id = input.employee_id, "submit_leave_request called");
    let request = state.leave.submit(input, Local::now().naive_local()).await?;
    Ok(Json(request))
}

/// POST /api/leave/requests/{id}/action
#[utoipa::path(
    post,
    path = "/api/leave/requests/{id}/action",
    params(
        ("id" = i32, Path, description = "Leave request ID")
    ),
    request_body = LeaveActionInput,
    responses(
        (status = 200, description = "Request approved or rejected", body = LeaveRequest),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    tag = "leave"
)]
pub async fn take_leave_action(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<i32>,
    Json(input): Json<LeaveActionInput>,
) -> AppResult<Json<LeaveRequest>> {
    tracing::debug!(request_id = %request_id.0, leave_request_id = id, action = ?input.action, "take_leave_action called");
    Ok(Json(state.leave.take_action(id, input.action).await?))
}

/// GET /api/leave/balance?employeeId=&leaveTypeId=&year=
#[utoipa::path(
    get,
    path = "/api/leave/balance",
    params(GetLeaveBalanceQuery),
    responses(
        (status = 200, description = "Used and remaining days for the year", body = LeaveBalance),
        (status = 404, description = "Unknown employee or leave type")
    ),
    tag = "leave"
)]
pub async fn get_leave_balance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetLeaveBalanceQuery>,
) -> AppResult<Json<LeaveBalance>> {
    let year = query.year.unwrap_or_else(|| Local::now().year());
    Ok(Json(state.leave.balance(query.employee_id, query.leave_type_id, year).await?))
}
