//! Storage seams used by the services.
//!
//! Implementations must enforce the ledger invariants themselves: the
//! one-record-per-day and one-pending-request rules are checked at write
//! time, not only by the service's earlier reads.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    models::{
        AdminUpdateAttendanceInput, AttendanceCheckOut, AttendanceFilter, AttendanceRecord,
        CreateLeaveTypeInput, Employee, LeaveRequest, LeaveStatus, LeaveType, NewAttendanceRecord,
        NewLeaveRequest, Policy, UpdatePolicyInput,
    },
    AppResult,
};

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    /// The latest policy version, if any was ever saved
    async fn active(&self) -> AppResult<Option<Policy>>;

    /// Appends a new version, which becomes the active one
    async fn insert(&self, input: &UpdatePolicyInput) -> AppResult<Policy>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn get(&self, id: i32) -> AppResult<Option<Employee>>;

    async fn list(&self) -> AppResult<Vec<Employee>>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_for_day(&self, employee_id: i32, date: NaiveDate) -> AppResult<Option<AttendanceRecord>>;

    /// Fails with `DuplicateCheckIn` when the (employee, date) slot is taken.
    async fn insert_check_in(&self, record: NewAttendanceRecord) -> AppResult<AttendanceRecord>;

    /// Closes an open record. Fails with `AlreadyClosed` when it was closed meanwhile.
    async fn apply_check_out(
        &self,
        record: &AttendanceRecord,
        check_out: AttendanceCheckOut,
    ) -> AppResult<AttendanceRecord>;

    /// Stores every field verbatim. Fails with `AttendanceNotFound` or,
    /// when moved onto an occupied day, `DuplicateCheckIn`.
    async fn overwrite(&self, id: i32, input: &AdminUpdateAttendanceInput) -> AppResult<AttendanceRecord>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Matching records, newest date first
    async fn query(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>>;
}

#[async_trait]
pub trait LeaveRepository: Send + Sync {
    async fn leave_types(&self) -> AppResult<Vec<LeaveType>>;

    async fn leave_type(&self, id: i32) -> AppResult<Option<LeaveType>>;

    async fn insert_leave_type(&self, input: &CreateLeaveTypeInput) -> AppResult<LeaveType>;

    /// Fails with `LeaveTypeNotFound`, or `LeaveTypeInUse` if any request references it.
    async fn delete_leave_type(&self, id: i32) -> AppResult<()>;

    async fn has_pending(&self, employee_id: i32) -> AppResult<bool>;

    /// Approved requests of one employee and type that overlap `year`
    async fn approved_in_year(&self, employee_id: i32, leave_type_id: i32, year: i32) -> AppResult<Vec<LeaveRequest>>;

    /// Inserts as `Pending`. Fails with `PendingRequestExists` if the employee already has one.
    async fn insert_request(&self, request: NewLeaveRequest) -> AppResult<LeaveRequest>;

    async fn request(&self, id: i32) -> AppResult<Option<LeaveRequest>>;

    /// Moves a request from `from` to `to`; returns `None` if it is no longer in `from`.
    async fn transition(&self, id: i32, from: LeaveStatus, to: LeaveStatus) -> AppResult<Option<LeaveRequest>>;

    /// Newest request first
    async fn list_requests(&self, employee_id: Option<i32>, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>>;
}
