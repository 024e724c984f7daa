use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    middleware::RequestId,
    models::{AdminUpdateAttendanceInput, AttendanceEventInput, AttendanceFilter, AttendanceMutationResponse, AttendanceRecord},
    AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetAttendanceQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: Option<i32>,
    /// Inclusive lower bound (YYYY-MM-DD)
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound (YYYY-MM-DD)
    pub to: Option<NaiveDate>,
}

/// POST /api/attendance/check-in
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = AttendanceEventInput,
    responses(
        (status = 200, description = "Check-in recorded; delay hours computed against the schedule", body = AttendanceRecord),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "A record already exists for this day"),
        (status = 422, description = "Outside the permitted location")
    ),
    tag = "attendance"
)]
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(input): Json<AttendanceEventInput>,
) -> AppResult<Json<AttendanceRecord>> {
    tracing::debug!(request_id = %request_id.0, employee_id = input.employee_id, "check_in called");
    let at = input.time.unwrap_or_else(|| Local::now().naive_local());
    let record = state.attendance.check_in(input.employee_id, at, input.location()).await?;
    Ok(Json(record))
}

/// POST /api/attendance/check-out
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body = AttendanceEventInput,
    responses(
        (status = 200, description = "Check-out recorded; overtime or early-leave delay added", body = AttendanceRecord),
        (status = 404, description = "Unknown employee"),
        (status = 409, description = "The day's record is already closed"),
        (status = 422, description = "No open check-in, invalid sequence, or outside the permitted location")
    ),
    tag = "attendance"
)]
pub async fn check_out(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(input): Json<AttendanceEventInput>,
) -> AppResult<Json<AttendanceRecord>> {
    tracing::debug!(request_id = %request_id.0, employee_id = input.employee_id, "check_out called");
    let at = input.time.unwrap_or_else(|| Local::now().naive_local());
    let record = state.attendance.check_out(input.employee_id, at, input.location()).await?;
    Ok(Json(record))
}

/// GET /api/attendance?employeeId=&from=&to=
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(GetAttendanceQuery),
    responses(
        (status = 200, description = "Matching attendance records, newest date first", body = Vec<AttendanceRecord>),
        (status = 422, description = "'from' is later than 'to'")
    ),
    tag = "attendance"
)]
pub async fn get_attendance(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetAttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    tracing::debug!("get_attendance called with employee_id={:?}, from={:?}, to={:?}",
        query.employee_id, query.from, query.to);

    let records = state
        .attendance
        .query(AttendanceFilter {
            employee_id: query.employee_id,
            from: query.from,
            to: query.to,
        })
        .await?;

    Ok(Json(records))
}

/// PUT /api/attendance/{id} - Administrative overwrite
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(
        ("id" = i32, Path, description = "Attendance record ID")
    ),
    request_body = AdminUpdateAttendanceInput,
    responses(
        (status = 200, description = "Record overwritten as given; nothing is recomputed", body = AttendanceRecord),
        (status = 404, description = "Record or employee not found"),
        (status = 409, description = "Target employee/day already has a record")
    ),
    tag = "attendance"
)]
pub async fn update_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(input): Json<AdminUpdateAttendanceInput>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state.attendance.admin_update(id, input).await?;
    Ok(Json(record))
}

/// DELETE /api/attendance/{id}
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = i32, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Record deleted", body = AttendanceMutationResponse),
        (status = 404, description = "Record not found")
    ),
    tag = "attendance"
)]
pub async fn delete_attendance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<AttendanceMutationResponse>> {
    state.attendance.admin_delete(id).await?;

    Ok(Json(AttendanceMutationResponse {
        success: true,
        message: Some("Attendance record deleted".to_string()),
    }))
}
