use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{FromRow, PgPool};

use super::repository::{AttendanceRepository, EmployeeDirectory, LeaveRepository, PolicyRepository};
use crate::{
    engine::DomainError,
    models::{
        weekday_name, AdminUpdateAttendanceInput, AttendanceCheckOut, AttendanceFilter, AttendanceRecord,
        CreateLeaveTypeInput, Employee, GeoPoint, LeaveRequest, LeaveStatus, LeaveType, NewAttendanceRecord,
        NewLeaveRequest, Policy, UpdatePolicyInput,
    },
    AppError, AppResult,
};

/// PostgreSQL-backed implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, FromRow)]
struct PolicyRow {
    id: i32,
    non_working_day_1: String,
    non_working_day_2: Option<String>,
    rate_basis: String,
    bonus_unit_value: f64,
    deduction_unit_value: f64,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PolicyRow> for Policy {
    type Error = AppError;

    fn try_from(row: PolicyRow) -> Result<Self, Self::Error> {
        let corrupt = |e: String| AppError::Internal(format!("Corrupt policy row {}: {}", row.id, e));

        Ok(Policy {
            id: row.id,
            non_working_day_1: weekday_name::parse(&row.non_working_day_1).map_err(corrupt)?,
            non_working_day_2: row
                .non_working_day_2
                .as_deref()
                .map(weekday_name::parse)
                .transpose()
                .map_err(corrupt)?,
            rate_basis: row.rate_basis.parse().map_err(corrupt)?,
            bonus_unit_value: row.bonus_unit_value,
            deduction_unit_value: row.deduction_unit_value,
            updated_at: row.updated_at,
        })
    }
}

const POLICY_COLUMNS: &str = r#"
    id, non_working_day_1, non_working_day_2, rate_basis,
    bonus_unit_value, deduction_unit_value, updated_at
"#;

#[derive(Debug, FromRow)]
struct AttendanceRow {
    id: i32,
    employee_id: i32,
    attendance_date: NaiveDate,
    check_in_time: Option<NaiveTime>,
    check_out_time: Option<NaiveTime>,
    check_in_latitude: Option<f64>,
    check_in_longitude: Option<f64>,
    check_out_latitude: Option<f64>,
    check_out_longitude: Option<f64>,
    overtime_hours: f64,
    delay_hours: f64,
}

fn point(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
        _ => None,
    }
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            date: row.attendance_date,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            check_in_location: point(row.check_in_latitude, row.check_in_longitude),
            check_out_location: point(row.check_out_latitude, row.check_out_longitude),
            overtime_hours: row.overtime_hours,
            delay_hours: row.delay_hours,
        }
    }
}

const ATTENDANCE_COLUMNS: &str = r#"
    id, employee_id, attendance_date, check_in_time, check_out_time,
    check_in_latitude, check_in_longitude, check_out_latitude, check_out_longitude,
    overtime_hours, delay_hours
"#;

#[derive(Debug, FromRow)]
struct LeaveRequestRow {
    id: i32,
    employee_id: i32,
    leave_type_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
    status: String,
    requested_at: NaiveDateTime,
}

impl TryFrom<LeaveRequestRow> for LeaveRequest {
    type Error = AppError;

    fn try_from(row: LeaveRequestRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| AppError::Internal(format!("Corrupt leave request row {}: {}", row.id, e)))?;

        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            leave_type_id: row.leave_type_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status,
            requested_at: row.requested_at,
        })
    }
}

const LEAVE_REQUEST_COLUMNS: &str = r#"
    id, employee_id, leave_type_id, start_date, end_date, reason, status, requested_at
"#;

fn into_requests(rows: Vec<LeaveRequestRow>) -> AppResult<Vec<LeaveRequest>> {
    rows.into_iter().map(LeaveRequest::try_from).collect()
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

// ---------------------------------------------------------------------------
// Policy store
// ---------------------------------------------------------------------------

#[async_trait]
impl PolicyRepository for PgStore {
    async fn active(&self) -> AppResult<Option<Policy>> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            "SELECT {} FROM policies ORDER BY id DESC LIMIT 1",
            POLICY_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Policy::try_from).transpose()
    }

    async fn insert(&self, input: &UpdatePolicyInput) -> AppResult<Policy> {
        let row = sqlx::query_as::<_, PolicyRow>(&format!(
            r#"
            INSERT INTO policies (
                non_working_day_1, non_working_day_2, rate_basis,
                bonus_unit_value, deduction_unit_value, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING {}
            "#,
            POLICY_COLUMNS
        ))
        .bind(weekday_name::as_str(input.non_working_day_1))
        .bind(input.non_working_day_2.map(weekday_name::as_str))
        .bind(input.rate_basis.as_str())
        .bind(input.bonus_unit_value)
        .bind(input.deduction_unit_value)
        .fetch_one(&self.pool)
        .await?;

        Policy::try_from(row)
    }
}

// ---------------------------------------------------------------------------
// Employee directory (read-only)
// ---------------------------------------------------------------------------

const EMPLOYEE_COLUMNS: &str = r#"
    id, full_name, department_name, base_salary, scheduled_start, scheduled_end,
    permitted_latitude, permitted_longitude, permitted_radius_km
"#;

#[async_trait]
impl EmployeeDirectory for PgStore {
    async fn get(&self, id: i32) -> AppResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees WHERE id = $1",
            EMPLOYEE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn list(&self) -> AppResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {} FROM employees ORDER BY id",
            EMPLOYEE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}

// ---------------------------------------------------------------------------
// Attendance ledger
// ---------------------------------------------------------------------------

#[async_trait]
impl AttendanceRepository for PgStore {
    async fn find_for_day(&self, employee_id: i32, date: NaiveDate) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            "SELECT {} FROM attendance_records WHERE employee_id = $1 AND attendance_date = $2",
            ATTENDANCE_COLUMNS
        ))
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AttendanceRecord::from))
    }

    async fn insert_check_in(&self, record: NewAttendanceRecord) -> AppResult<AttendanceRecord> {
        // The unique (employee_id, attendance_date) constraint decides concurrent check-ins
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            r#"
            INSERT INTO attendance_records (
                employee_id, attendance_date, check_in_time,
                check_in_latitude, check_in_longitude, overtime_hours, delay_hours
            )
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            ON CONFLICT (employee_id, attendance_date) DO NOTHING
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(record.employee_id)
        .bind(record.date)
        .bind(record.check_in_time)
        .bind(record.check_in_location.latitude)
        .bind(record.check_in_location.longitude)
        .bind(record.delay_hours)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::from).ok_or_else(|| {
            DomainError::DuplicateCheckIn {
                employee_id: record.employee_id,
                date: record.date,
            }
            .into()
        })
    }

    async fn apply_check_out(
        &self,
        record: &AttendanceRecord,
        check_out: AttendanceCheckOut,
    ) -> AppResult<AttendanceRecord> {
        let row = sqlx::query_as::<_, AttendanceRow>(&format!(
            r#"
            UPDATE attendance_records
            SET check_out_time = $1,
                check_out_latitude = $2,
                check_out_longitude = $3,
                overtime_hours = overtime_hours + $4,
                delay_hours = delay_hours + $5
            WHERE id = $6 AND check_out_time IS NULL
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(check_out.check_out_time)
        .bind(check_out.check_out_location.latitude)
        .bind(check_out.check_out_location.longitude)
        .bind(check_out.overtime_hours)
        .bind(check_out.extra_delay_hours)
        .bind(record.id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::from).ok_or_else(|| {
            DomainError::AlreadyClosed {
                employee_id: record.employee_id,
                date: record.date,
            }
            .into()
        })
    }

    async fn overwrite(&self, id: i32, input: &AdminUpdateAttendanceInput) -> AppResult<AttendanceRecord> {
        let result = sqlx::query_as::<_, AttendanceRow>(&format!(
            r#"
            UPDATE attendance_records
            SET employee_id = $1,
                attendance_date = $2,
                check_in_time = $3,
                check_out_time = $4,
                check_in_latitude = $5,
                check_in_longitude = $6,
                check_out_latitude = $7,
                check_out_longitude = $8,
                overtime_hours = $9,
                delay_hours = $10
            WHERE id = $11
            RETURNING {}
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(input.employee_id)
        .bind(input.date)
        .bind(input.check_in_time)
        .bind(input.check_out_time)
        .bind(input.check_in_location.map(|p| p.latitude))
        .bind(input.check_in_location.map(|p| p.longitude))
        .bind(input.check_out_location.map(|p| p.latitude))
        .bind(input.check_out_location.map(|p| p.longitude))
        .bind(input.overtime_hours)
        .bind(input.delay_hours)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(row.into()),
            Ok(None) => Err(DomainError::AttendanceNotFound(id).into()),
            Err(e) if is_unique_violation(&e) => Err(DomainError::DuplicateCheckIn {
                employee_id: input.employee_id,
                date: input.date,
            }
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AttendanceNotFound(id).into());
        }

        Ok(())
    }

    async fn query(&self, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(&format!(
            r#"
            SELECT {}
            FROM attendance_records
            WHERE ($1::int4 IS NULL OR employee_id = $1)
              AND ($2::date IS NULL OR attendance_date >= $2)
              AND ($3::date IS NULL OR attendance_date <= $3)
            ORDER BY attendance_date DESC, id DESC
            "#,
            ATTENDANCE_COLUMNS
        ))
        .bind(filter.employee_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Leave ledger
// ---------------------------------------------------------------------------

#[async_trait]
impl LeaveRepository for PgStore {
    async fn leave_types(&self) -> AppResult<Vec<LeaveType>> {
        let types = sqlx::query_as::<_, LeaveType>(
            "SELECT id, name, max_days_per_year FROM leave_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    async fn leave_type(&self, id: i32) -> AppResult<Option<LeaveType>> {
        let leave_type = sqlx::query_as::<_, LeaveType>(
            "SELECT id, name, max_days_per_year FROM leave_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave_type)
    }

    async fn insert_leave_type(&self, input: &CreateLeaveTypeInput) -> AppResult<LeaveType> {
        let result = sqlx::query_as::<_, LeaveType>(
            r#"
            INSERT INTO leave_types (name, max_days_per_year)
            VALUES ($1, $2)
            RETURNING id, name, max_days_per_year
            "#,
        )
        .bind(input.name.trim())
        .bind(input.max_days_per_year)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(leave_type) => Ok(leave_type),
            Err(e) if is_unique_violation(&e) => Err(AppError::Validation(format!(
                "Leave type '{}' already exists",
                input.name.trim()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_leave_type(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM leave_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DomainError::LeaveTypeNotFound(id).into()),
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(DomainError::LeaveTypeInUse(id).into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn has_pending(&self, employee_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM leave_requests WHERE employee_id = $1 AND status = 'Pending')",
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn approved_in_year(&self, employee_id: i32, leave_type_id: i32, year: i32) -> AppResult<Vec<LeaveRequest>> {
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::Validation(format!("Year {} is out of range", year)))?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::Validation(format!("Year {} is out of range", year)))?;

        let rows = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            r#"
            SELECT {}
            FROM leave_requests
            WHERE employee_id = $1
              AND leave_type_id = $2
              AND status = 'Approved'
              AND start_date <= $4
              AND end_date >= $3
            ORDER BY start_date
            "#,
            LEAVE_REQUEST_COLUMNS
        ))
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(first)
        .bind(last)
        .fetch_all(&self.pool)
        .await?;

        into_requests(rows)
    }

    async fn insert_request(&self, request: NewLeaveRequest) -> AppResult<LeaveRequest> {
        // The partial unique index on pending requests decides concurrent submissions
        let row = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            r#"
            INSERT INTO leave_requests (
                employee_id, leave_type_id, start_date, end_date, reason, status, requested_at
            )
            VALUES ($1, $2, $3, $4, $5, 'Pending', $6)
            ON CONFLICT (employee_id) WHERE status = 'Pending' DO NOTHING
            RETURNING {}
            "#,
            LEAVE_REQUEST_COLUMNS
        ))
        .bind(request.employee_id)
        .bind(request.leave_type_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(request.requested_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => LeaveRequest::try_from(row),
            None => Err(DomainError::PendingRequestExists.into()),
        }
    }

    async fn request(&self, id: i32) -> AppResult<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            "SELECT {} FROM leave_requests WHERE id = $1",
            LEAVE_REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn transition(&self, id: i32, from: LeaveStatus, to: LeaveStatus) -> AppResult<Option<LeaveRequest>> {
        let row = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            r#"
            UPDATE leave_requests
            SET status = $1, decided_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING {}
            "#,
            LEAVE_REQUEST_COLUMNS
        ))
        .bind(to.as_str())
        .bind(id)
        .bind(from.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn list_requests(&self, employee_id: Option<i32>, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>> {
        let rows = sqlx::query_as::<_, LeaveRequestRow>(&format!(
            r#"
            SELECT {}
            FROM leave_requests
            WHERE ($1::int4 IS NULL OR employee_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY requested_at DESC, id DESC
            "#,
            LEAVE_REQUEST_COLUMNS
        ))
        .bind(employee_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        into_requests(rows)
    }
}
