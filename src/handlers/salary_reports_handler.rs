use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    models::{DetailedSalaryReport, SalaryReport},
    AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SalaryReportQuery {
    /// 1..=12
    pub month: u32,
    pub year: i32,
}

/// GET /api/salary-reports?month=&year=
#[utoipa::path(
    get,
    path = "/api/salary-reports",
    params(SalaryReportQuery),
    responses(
        (status = 200, description = "One report per employee, ordered by employee id", body = Vec<SalaryReport>),
        (status = 404, description = "No policy configured"),
        (status = 422, description = "Invalid month")
    ),
    tag = "salary-reports"
)]
pub async fn get_salary_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalaryReportQuery>,
) -> AppResult<Json<Vec<SalaryReport>>> {
    Ok(Json(state.payroll.salary_reports_for_month(query.month, query.year).await?))
}

/// GET /api/salary-reports/{employeeId}?month=&year=
#[utoipa::path(
    get,
    path = "/api/salary-reports/{employeeId}",
    params(
        ("employeeId" = i32, Path, description = "Employee ID"),
        SalaryReportQuery
    ),
    responses(
        (status = 200, description = "Monthly salary summary", body = SalaryReport),
        (status = 404, description = "Unknown employee or no policy configured"),
        (status = 422, description = "Invalid month")
    ),
    tag = "salary-reports"
)]
pub async fn get_salary_report(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i32>,
    Query(query): Query<SalaryReportQuery>,
) -> AppResult<Json<SalaryReport>> {
    Ok(Json(state.payroll.salary_report(employee_id, query.month, query.year).await?))
}

/// GET /api/salary-reports/{employeeId}/detailed?month=&year=
#[utoipa::path(
    get,
    path = "/api/salary-reports/{employeeId}/detailed",
    params(
        ("employeeId" = i32, Path, description = "Employee ID"),
        SalaryReportQuery
    ),
    responses(
        (status = 200, description = "Payable attendance days with hour sums and amounts", body = DetailedSalaryReport),
        (status = 404, description = "Unknown employee or no policy configured"),
        (status = 422, description = "Invalid month")
    ),
    tag = "salary-reports"
)]
pub async fn get_detailed_salary_report(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i32>,
    Query(query): Query<SalaryReportQuery>,
) -> AppResult<Json<DetailedSalaryReport>> {
    Ok(Json(state.payroll.detailed_salary_report(employee_id, query.month, query.year).await?))
}
