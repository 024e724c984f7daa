//! Orchestration over the engine and the repositories. Services own no state
//! besides their repository handles and the balance cache.

pub mod attendance_service;
pub mod leave_service;
pub mod payroll_service;
pub mod policy_service;

pub use attendance_service::AttendanceService;
pub use leave_service::LeaveService;
pub use payroll_service::PayrollService;
pub use policy_service::PolicyService;
