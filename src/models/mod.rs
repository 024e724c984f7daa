pub mod attendance;
pub mod attendance_input;
pub mod employee;
pub mod leave;
pub mod leave_input;
pub mod policy;
pub mod policy_input;
pub mod salary;

pub use attendance::{AttendanceCheckOut, AttendanceFilter, AttendanceRecord, GeoPoint, NewAttendanceRecord};
pub use attendance_input::{AdminUpdateAttendanceInput, AttendanceEventInput, AttendanceMutationResponse};
pub use employee::Employee;
pub use leave::{LeaveAction, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest};
pub use leave_input::{CreateLeaveTypeInput, LeaveActionInput, LeaveMutationResponse, SubmitLeaveRequestInput};
pub use policy::{weekday_name, Policy, RateBasis};
pub use policy_input::UpdatePolicyInput;
pub use salary::{DetailedSalaryReport, SalaryReport};
