use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::Modify;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Attendance API",
        version = "1.0.0",
        description = "Attendance ledger, leave management and monthly payroll reconciliation"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,
        crate::handlers::debug::debug_handler,

        // Policy
        crate::handlers::policy_handler::get_policy,
        crate::handlers::policy_handler::update_policy,

        // Attendance
        crate::handlers::attendance_handler::check_in,
        crate::handlers::attendance_handler::check_out,
        crate::handlers::attendance_handler::get_attendance,
        crate::handlers::attendance_handler::update_attendance,
        crate::handlers::attendance_handler::delete_attendance,

        // Leave
        crate::handlers::leave_handler::get_leave_types,
        crate::handlers::leave_handler::create_leave_type,
        crate::handlers::leave_handler::delete_leave_type,
        crate::handlers::leave_handler::get_leave_requests,
        crate::handlers::leave_handler::submit_leave_request,
        crate::handlers::leave_handler::take_leave_action,
        crate::handlers::leave_handler::get_leave_balance,

        // Salary reports
        crate::handlers::salary_reports_handler::get_salary_reports,
        crate::handlers::salary_reports_handler::get_salary_report,
        crate::handlers::salary_reports_handler::get_detailed_salary_report,
    ),
    components(
        schemas(
            // Core models
            crate::models::Policy,
            crate::models::RateBasis,
            crate::models::Employee,
            crate::models::GeoPoint,
            crate::models::AttendanceRecord,
            crate::models::LeaveType,
            crate::models::LeaveStatus,
            crate::models::LeaveAction,
            crate::models::LeaveRequest,
            crate::models::LeaveBalance,
            crate::models::SalaryReport,
            crate::models::DetailedSalaryReport,

            // Input models
            crate::models::UpdatePolicyInput,
            crate::models::AttendanceEventInput,
            crate::models::AdminUpdateAttendanceInput,
            crate::models::AttendanceMutationResponse,
            crate::models::SubmitLeaveRequestInput,
            crate::models::LeaveActionInput,
            crate::models::CreateLeaveTypeInput,
            crate::models::LeaveMutationResponse,

            crate::handlers::debug::DebugInfo,
        )
    ),
    tags(
        (name = "health", description = "Health and diagnostics"),
        (name = "policy", description = "Working-day and pay-rate policy"),
        (name = "attendance", description = "Check-in/check-out ledger"),
        (name = "leave", description = "Leave types, requests and balances"),
        (name = "salary-reports", description = "Monthly salary reports"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "debug_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Debug-Key"))),
            )
        }
    }
}
