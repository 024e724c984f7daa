use axum::{
    http::{header, HeaderName, HeaderValue, Method, Uri},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{handlers, middleware, openapi::ApiDoc, AppError};

pub fn build_router(state: Arc<crate::AppState>) -> Result<Router, AppError> {
    let origin = state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| AppError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", state.config.cors_origin, e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")]);

    // Policy routes
    let policy_routes = Router::new()
        .route("/", get(handlers::policy_handler::get_policy))
        .route("/", put(handlers::policy_handler::update_policy));

    // Attendance routes
    let attendance_routes = Router::new()
        .route("/", get(handlers::attendance_handler::get_attendance))
        .route("/check-in", post(handlers::attendance_handler::check_in))
        .route("/check-out", post(handlers::attendance_handler::check_out))
        .route("/{id}", put(handlers::attendance_handler::update_attendance))
        .route("/{id}", delete(handlers::attendance_handler::delete_attendance));

    // Leave routes
    let leave_routes = Router::new()
        .route("/types", get(handlers::leave_handler::get_leave_types))
        .route("/types", post(handlers::leave_handler::create_leave_type))
        .route("/types/{id}", delete(handlers::leave_handler::delete_leave_type))
        .route("/requests", get(handlers::leave_handler::get_leave_requests))
        .route("/requests", post(handlers::leave_handler::submit_leave_request))
        .route("/requests/{id}/action", post(handlers::leave_handler::take_leave_action))
        .route("/balance", get(handlers::leave_handler::get_leave_balance));

    // Salary report routes
    let salary_report_routes = Router::new()
        .route("/", get(handlers::salary_reports_handler::get_salary_reports))
        .route("/{employee_id}", get(handlers::salary_reports_handler::get_salary_report))
        .route(
            "/{employee_id}/detailed",
            get(handlers::salary_reports_handler::get_detailed_salary_report),
        );

    let debug_route = get(handlers::debug_handler)
        .route_layer(from_fn_with_state(state.clone(), middleware::require_debug_key));

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/debug", debug_route)
        .nest("/api/policy", policy_routes)
        .nest("/api/attendance", attendance_routes)
        .nest("/api/leave", leave_routes)
        .nest("/api/salary-reports", salary_report_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .fallback(route_not_found)
        .route_layer(from_fn(middleware::metrics_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(router)
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
