//! In-process store used by the service tests. It enforces the same write-time
//! rules as the PostgreSQL tables.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc, Weekday};
use tokio::sync::Mutex;

use super::repository::{AttendanceRepository, EmployeeDirectory, LeaveRepository, PolicyRepository};
use crate::{
    engine::{balance, DomainError},
    models::{
        AdminUpdateAttendanceInput, AttendanceCheckOut, AttendanceFilter, AttendanceRecord, CreateLeaveTypeInput,
        Employee, LeaveRequest, LeaveStatus, LeaveType, NewAttendanceRecord, NewLeaveRequest, Policy, RateBasis,
        UpdatePolicyInput,
    },
    AppError, AppResult,
};

#[derive(Default)]
struct Tables {
    policies: Vec<Policy>,
    employees: BTreeMap<i32, Employee>,
    attendance: BTreeMap<i32, AttendanceRecord>,
    leave_types: BTreeMap<i32, LeaveType>,
    leave_requests: BTreeMap<i32, LeaveRequest>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_employee(&self, employee: Employee) {
        self.tables.lock().await.employees.insert(employee.id, employee);
    }

    pub async fn add_leave_type(&self, name: &str, max_days_per_year: i32) -> LeaveType {
        let mut tables = self.tables.lock().await;
        let id = tables.next_id();
        let leave_type = LeaveType {
            id,
            name: name.to_string(),
            max_days_per_year,
        };
        tables.leave_types.insert(id, leave_type.clone());
        leave_type
    }

    /// Stores a request verbatim, bypassing the one-pending rule
    pub async fn add_request(&self, mut request: LeaveRequest) -> LeaveRequest {
        let mut tables = self.tables.lock().await;
        request.id = tables.next_id();
        tables.leave_requests.insert(request.id, request.clone());
        request
    }
}

/// Nine-to-five employee permitted within 200 m of (30.0444, 31.2357)
pub fn sample_employee(id: i32) -> Employee {
    Employee {
        id,
        full_name: format!("Employee {}", id),
        department_name: Some("Development".to_string()),
        base_salary: 8000.0,
        scheduled_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        scheduled_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
        permitted_latitude: 30.0444,
        permitted_longitude: 31.2357,
        permitted_radius_km: 0.2,
    }
}

/// Friday/Saturday weekend, 50 per overtime hour, 20 per delay hour
pub fn sample_policy_input() -> UpdatePolicyInput {
    UpdatePolicyInput {
        non_working_day_1: Weekday::Fri,
        non_working_day_2: Some(Weekday::Sat),
        rate_basis: RateBasis::Money,
        bonus_unit_value: 50.0,
        deduction_unit_value: 20.0,
    }
}

#[async_trait]
impl PolicyRepository for MemoryStore {
    async fn active(&self) -> AppResult<Option<Policy>> {
        Ok(self.tables.lock().await.policies.last().cloned())
    }

    async fn insert(&self, input: &UpdatePolicyInput) -> AppResult<Policy> {
        let mut tables = self.tables.lock().await;
        let policy = Policy {
            id: tables.next_id(),
            non_working_day_1: input.non_working_day_1,
            non_working_day_2: input.non_working_day_2,
            rate_basis: input.rate_basis,
            bonus_unit_value: input.bonus_unit_value,
            deduction_unit_value: input.deduction_unit_value,
            updated_at: Utc::now(),
        };
        tables.policies.push(policy.clone());
        Ok(policy)
    }
}

#[async_trait]
impl EmployeeDirectory for MemoryStore {
    async fn get(&self, id: i32) -> AppResult<Option<Employee>> {
        Ok(self.tables.lock().await.employees.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Employee>> {
        Ok(self.tables.lock().await.employees.values().cloned().collect())
    }
}

#[async_trait]
impl AttendanceRepository for MemoryStore {
    async fn find_for_day(&self, employee_id: i32, date: NaiveDate) -> AppResult<Option<AttendanceRecord>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .attendance
            .values()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn insert_check_in(&self, record: NewAttendanceRecord) -> AppResult<AttendanceRecord> {
        let mut tables = self.tables.lock().await;
        let taken = tables
            .attendance
            .values()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date);
        if taken {
            return Err(DomainError::DuplicateCheckIn {
                employee_id: record.employee_id,
                date: record.date,
            }
            .into());
        }

        let stored = AttendanceRecord {
            id: tables.next_id(),
            employee_id: record.employee_id,
            date: record.date,
            check_in_time: Some(record.check_in_time),
            check_out_time: None,
            check_in_location: Some(record.check_in_location),
            check_out_location: None,
            overtime_hours: 0.0,
            delay_hours: record.delay_hours,
        };
        tables.attendance.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn apply_check_out(
        &self,
        record: &AttendanceRecord,
        check_out: AttendanceCheckOut,
    ) -> AppResult<AttendanceRecord> {
        let mut tables = self.tables.lock().await;
        let closed = DomainError::AlreadyClosed {
            employee_id: record.employee_id,
            date: record.date,
        };

        let stored = match tables.attendance.get_mut(&record.id) {
            Some(stored) if !stored.is_closed() => stored,
            _ => return Err(closed.into()),
        };
        stored.check_out_time = Some(check_out.check_out_time);
        stored.check_out_location = Some(check_out.check_out_location);
        stored.overtime_hours += check_out.overtime_hours;
        stored.delay_hours += check_out.extra_delay_hours;
        Ok(stored.clone())
    }

    async fn overwrite(&self, id: i32, input: &AdminUpdateAttendanceInput) -> AppResult<AttendanceRecord> {
        let mut tables = self.tables.lock().await;
        if !tables.attendance.contains_key(&id) {
            return Err(DomainError::AttendanceNotFound(id).into());
        }
        let clash = tables
            .attendance
            .values()
            .any(|r| r.id != id && r.employee_id == input.employee_id && r.date == input.date);
        if clash {
            return Err(DomainError::DuplicateCheckIn {
                employee_id: input.employee_id,
                date: input.date,
            }
            .into());
        }

        let stored = AttendanceRecord {
            id,
            employee_id: input.employee_id,
            date: input.date,
            check_in_time: input.check_in_time,
            check_out_time: input.check_out_time,
            check_in_location: input.check_in_location,
            check_out_location: input.check_out_location,
            overtime_hours: input.overtime_hours,
            delay_hours: input.delay_hours,
        };
        tables.attendance.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        match self.tables.lock().await.attendance.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::AttendanceNotFound(id).into()),
        }
    }

    async fn query(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let tables = self.tables.lock().await;
        let mut records: Vec<AttendanceRecord> =
            tables.attendance.values().filter(|r| filter.matches(r)).cloned().collect();
        records.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
        Ok(records)
    }
}

#[async_trait]
impl LeaveRepository for MemoryStore {
    async fn leave_types(&self) -> AppResult<Vec<LeaveType>> {
        Ok(self.tables.lock().await.leave_types.values().cloned().collect())
    }

    async fn leave_type(&self, id: i32) -> AppResult<Option<LeaveType>> {
        Ok(self.tables.lock().await.leave_types.get(&id).cloned())
    }

    async fn insert_leave_type(&self, input: &CreateLeaveTypeInput) -> AppResult<LeaveType> {
        let name = input.name.trim();
        let mut tables = self.tables.lock().await;
        if tables.leave_types.values().any(|t| t.name == name) {
            return Err(AppError::Validation(format!("Leave type '{}' already exists", name)));
        }

        let leave_type = LeaveType {
            id: tables.next_id(),
            name: name.to_string(),
            max_days_per_year: input.max_days_per_year,
        };
        tables.leave_types.insert(leave_type.id, leave_type.clone());
        Ok(leave_type)
    }

    async fn delete_leave_type(&self, id: i32) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.leave_types.contains_key(&id) {
            return Err(DomainError::LeaveTypeNotFound(id).into());
        }
        if tables.leave_requests.values().any(|r| r.leave_type_id == id) {
            return Err(DomainError::LeaveTypeInUse(id).into());
        }
        tables.leave_types.remove(&id);
        Ok(())
    }

    async fn has_pending(&self, employee_id: i32) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .leave_requests
            .values()
            .any(|r| r.employee_id == employee_id && r.status == LeaveStatus::Pending))
    }

    async fn approved_in_year(&self, employee_id: i32, leave_type_id: i32, year: i32) -> AppResult<Vec<LeaveRequest>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .leave_requests
            .values()
            .filter(|r| {
                r.employee_id == employee_id
                    && r.leave_type_id == leave_type_id
                    && r.status == LeaveStatus::Approved
                    && balance::days_in_year(r.start_date, r.end_date, year) > 0
            })
            .cloned()
            .collect())
    }

    async fn insert_request(&self, request: NewLeaveRequest) -> AppResult<LeaveRequest> {
        let mut tables = self.tables.lock().await;
        let pending = tables
            .leave_requests
            .values()
            .any(|r| r.employee_id == request.employee_id && r.status == LeaveStatus::Pending);
        if pending {
            return Err(DomainError::PendingRequestExists.into());
        }

        let stored = LeaveRequest {
            id: tables.next_id(),
            employee_id: request.employee_id,
            leave_type_id: request.leave_type_id,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            status: LeaveStatus::Pending,
            requested_at: request.requested_at,
        };
        tables.leave_requests.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn request(&self, id: i32) -> AppResult<Option<LeaveRequest>> {
        Ok(self.tables.lock().await.leave_requests.get(&id).cloned())
    }

    async fn transition(&self, id: i32, from: LeaveStatus, to: LeaveStatus) -> AppResult<Option<LeaveRequest>> {
        let mut tables = self.tables.lock().await;
        match tables.leave_requests.get_mut(&id) {
            Some(request) if request.status == from => {
                request.status = to;
                Ok(Some(request.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_requests(&self, employee_id: Option<i32>, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>> {
        let tables = self.tables.lock().await;
        let mut requests: Vec<LeaveRequest> = tables
            .leave_requests
            .values()
            .filter(|r| employee_id.map_or(true, |id| r.employee_id == id))
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by(|a, b| (b.requested_at, b.id).cmp(&(a.requested_at, a.id)));
        Ok(requests)
    }
}
