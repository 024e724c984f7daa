use std::sync::Arc;

use chrono::NaiveDateTime;
use metrics::counter;

use crate::{
    db::{AttendanceRepository, EmployeeDirectory},
    engine::{geofence, reconcile, DomainError},
    models::{
        AdminUpdateAttendanceInput, AttendanceCheckOut, AttendanceFilter, AttendanceRecord, Employee, GeoPoint,
        NewAttendanceRecord,
    },
    AppError, AppResult,
};

fn record_event(kind: &'static str, result: &AppResult<AttendanceRecord>) {
    let outcome = match result {
        Ok(_) => "accepted",
        Err(e) => e.code(),
    };
    counter!("attendance_events_total", "kind" => kind, "outcome" => outcome).increment(1);

    if let Err(e) = result {
        tracing::warn!(kind, code = outcome, error = %e, "Attendance event rejected");
    }
}

/// Check-in/check-out ledger with geofencing and per-day reconciliation
pub struct AttendanceService {
    employees: Arc<dyn EmployeeDirectory>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl AttendanceService {
    pub fn new(employees: Arc<dyn EmployeeDirectory>, attendance: Arc<dyn AttendanceRepository>) -> Self {
        Self { employees, attendance }
    }

    async fn employee(&self, employee_id: i32) -> AppResult<Employee> {
        self.employees
            .get(employee_id)
            .await?
            .ok_or_else(|| DomainError::EmployeeNotFound(employee_id).into())
    }

    pub async fn check_in(&self, employee_id: i32, at: NaiveDateTime, location: GeoPoint) -> AppResult<AttendanceRecord> {
        let result = self.try_check_in(employee_id, at, location).await;
        record_event("check_in", &result);
        result
    }

    async fn try_check_in(&self, employee_id: i32, at: NaiveDateTime, location: GeoPoint) -> AppResult<AttendanceRecord> {
        let employee = self.employee(employee_id).await?;
        geofence::ensure_within(location, employee.permitted_location(), employee.permitted_radius_km)?;

        let date = at.date();
        let existing = self.attendance.find_for_day(employee_id, date).await?;
        let delta = reconcile::plan_check_in(existing.as_ref(), employee_id, at, &employee.schedule())?;

        let record = self
            .attendance
            .insert_check_in(NewAttendanceRecord {
                employee_id,
                date,
                check_in_time: at.time(),
                check_in_location: location,
                delay_hours: delta.delay_hours,
            })
            .await?;

        tracing::info!(
            employee_id,
            record_id = record.id,
            %date,
            delay_hours = record.delay_hours,
            "Check-in recorded"
        );
        Ok(record)
    }

    pub async fn check_out(&self, employee_id: i32, at: NaiveDateTime, location: GeoPoint) -> AppResult<AttendanceRecord> {
        let result = self.try_check_out(employee_id, at, location).await;
        record_event("check_out", &result);
        result
    }

    async fn try_check_out(&self, employee_id: i32, at: NaiveDateTime, location: GeoPoint) -> AppResult<AttendanceRecord> {
        let employee = self.employee(employee_id).await?;
        geofence::ensure_within(location, employee.permitted_location(), employee.permitted_radius_km)?;

        let existing = self.attendance.find_for_day(employee_id, at.date()).await?;
        let delta = reconcile::plan_check_out(existing.as_ref(), employee_id, at, &employee.schedule())?;
        let Some(open) = existing else {
            return Err(DomainError::NoOpenCheckIn {
                employee_id,
                date: at.date(),
            }
            .into());
        };

        let record = self
            .attendance
            .apply_check_out(
                &open,
                AttendanceCheckOut {
                    check_out_time: at.time(),
                    check_out_location: location,
                    overtime_hours: delta.overtime_hours,
                    extra_delay_hours: delta.delay_hours,
                },
            )
            .await?;

        tracing::info!(
            employee_id,
            record_id = record.id,
            overtime_hours = record.overtime_hours,
            delay_hours = record.delay_hours,
            "Check-out recorded"
        );
        Ok(record)
    }

    /// Stores the given values as-is; overtime and delay are not recomputed.
    pub async fn admin_update(&self, id: i32, input: AdminUpdateAttendanceInput) -> AppResult<AttendanceRecord> {
        input.validate().map_err(AppError::Validation)?;
        self.employee(input.employee_id).await?;

        let record = self.attendance.overwrite(id, &input).await?;
        tracing::info!(record_id = id, employee_id = record.employee_id, "Attendance record overwritten");
        Ok(record)
    }

    pub async fn admin_delete(&self, id: i32) -> AppResult<()> {
        self.attendance.delete(id).await?;
        tracing::info!(record_id = id, "Attendance record deleted");
        Ok(())
    }

    pub async fn query(&self, filter: AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::Validation("'from' must not be later than 'to'".to_string()));
            }
        }
        self.attendance.query(&filter).await
    }
}
