use axum::http::StatusCode;

/// Validation failures raised by the attendance, leave and payroll core.
///
/// Every variant maps to a stable identifier returned by [`DomainError::code`],
/// so callers can translate them into user-facing text without parsing messages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("You are outside the allowed location range ({distance_km:.3} km from the permitted point, radius {radius_km:.3} km)")]
    OutOfRange { distance_km: f64, radius_km: f64 },

    #[error("Employee {employee_id} has already checked in on {date}")]
    DuplicateCheckIn { employee_id: i32, date: chrono::NaiveDate },

    #[error("Employee {employee_id} has no open check-in on {date}")]
    NoOpenCheckIn { employee_id: i32, date: chrono::NaiveDate },

    #[error("Invalid check-in or check-out time: {0}")]
    InvalidSequence(String),

    #[error("Attendance for employee {employee_id} on {date} is already closed")]
    AlreadyClosed { employee_id: i32, date: chrono::NaiveDate },

    #[error("You cannot request leave for a past date")]
    PastDateLeave,

    #[error("You have pending leave request")]
    PendingRequestExists,

    #[error("Insufficient {leave_type} leave balance: {remaining} day(s) remaining in {year}, {requested} requested")]
    InsufficientBalance {
        leave_type: String,
        year: i32,
        remaining: i32,
        requested: i32,
    },

    #[error("Leave request cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("No company policy has been configured")]
    PolicyNotFound,

    #[error("Employee {0} not found")]
    EmployeeNotFound(i32),

    #[error("Attendance record {0} not found")]
    AttendanceNotFound(i32),

    #[error("Leave request {0} not found")]
    LeaveRequestNotFound(i32),

    #[error("Leave type {0} not found")]
    LeaveTypeNotFound(i32),

    #[error("Leave type {0} is referenced by existing leave requests")]
    LeaveTypeInUse(i32),
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::OutOfRange { .. } => "OUT_OF_RANGE",
            DomainError::DuplicateCheckIn { .. } => "DUPLICATE_CHECK_IN",
            DomainError::NoOpenCheckIn { .. } => "NO_OPEN_CHECK_IN",
            DomainError::InvalidSequence(_) => "INVALID_SEQUENCE",
            DomainError::AlreadyClosed { .. } => "ALREADY_CLOSED",
            DomainError::PastDateLeave => "PAST_DATE_LEAVE",
            DomainError::PendingRequestExists => "PENDING_REQUEST_EXISTS",
            DomainError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            DomainError::InvalidTransition { .. } => "INVALID_TRANSITION",
            DomainError::PolicyNotFound => "POLICY_NOT_FOUND",
            DomainError::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            DomainError::AttendanceNotFound(_) => "ATTENDANCE_NOT_FOUND",
            DomainError::LeaveRequestNotFound(_) => "LEAVE_REQUEST_NOT_FOUND",
            DomainError::LeaveTypeNotFound(_) => "LEAVE_TYPE_NOT_FOUND",
            DomainError::LeaveTypeInUse(_) => "LEAVE_TYPE_IN_USE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            DomainError::PolicyNotFound
            | DomainError::EmployeeNotFound(_)
            | DomainError::AttendanceNotFound(_)
            | DomainError::LeaveRequestNotFound(_)
            | DomainError::LeaveTypeNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::DuplicateCheckIn { .. }
            | DomainError::AlreadyClosed { .. }
            | DomainError::PendingRequestExists
            | DomainError::InvalidTransition { .. }
            | DomainError::LeaveTypeInUse(_) => StatusCode::CONFLICT,
            DomainError::OutOfRange { .. }
            | DomainError::NoOpenCheckIn { .. }
            | DomainError::InvalidSequence(_)
            | DomainError::PastDateLeave
            | DomainError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
