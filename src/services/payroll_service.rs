use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    db::{AttendanceRepository, EmployeeDirectory, PolicyRepository},
    engine::{payroll, DomainError},
    models::{AttendanceFilter, AttendanceRecord, DetailedSalaryReport, Employee, Policy, SalaryReport},
    AppError, AppResult,
};

/// First and last day of the month, or a validation error for a bad month/year
fn month_bounds(month: u32, year: i32) -> AppResult<(NaiveDate, NaiveDate)> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(format!("month must be between 1 and 12, got {}", month)));
    }

    let invalid = || AppError::Validation(format!("{}-{:02} is not a valid month", year, month));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;

    Ok((first, last))
}

/// Read-only monthly salary reports
pub struct PayrollService {
    policies: Arc<dyn PolicyRepository>,
    employees: Arc<dyn EmployeeDirectory>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl PayrollService {
    pub fn new(
        policies: Arc<dyn PolicyRepository>,
        employees: Arc<dyn EmployeeDirectory>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            policies,
            employees,
            attendance,
        }
    }

    async fn policy(&self) -> AppResult<Policy> {
        self.policies.active().await?.ok_or_else(|| DomainError::PolicyNotFound.into())
    }

    async fn employee(&self, employee_id: i32) -> AppResult<Employee> {
        self.employees
            .get(employee_id)
            .await?
            .ok_or_else(|| DomainError::EmployeeNotFound(employee_id).into())
    }

    async fn month_records(&self, employee_id: Option<i32>, month: u32, year: i32) -> AppResult<Vec<AttendanceRecord>> {
        let (from, to) = month_bounds(month, year)?;
        self.attendance
            .query(&AttendanceFilter {
                employee_id,
                from: Some(from),
                to: Some(to),
            })
            .await
    }

    pub async fn salary_report(&self, employee_id: i32, month: u32, year: i32) -> AppResult<SalaryReport> {
        month_bounds(month, year)?;
        let policy = self.policy().await?;
        let employee = self.employee(employee_id).await?;
        let records = self.month_records(Some(employee_id), month, year).await?;

        let report = payroll::salary_report(&employee, &policy, &records, month, year);
        tracing::debug!(employee_id, month, year, net_salary = report.net_salary, "Salary report computed");
        Ok(report)
    }

    pub async fn detailed_salary_report(&self, employee_id: i32, month: u32, year: i32) -> AppResult<DetailedSalaryReport> {
        month_bounds(month, year)?;
        let policy = self.policy().await?;
        let employee = self.employee(employee_id).await?;
        let records = self.month_records(Some(employee_id), month, year).await?;

        Ok(payroll::detailed_salary_report(&employee, &policy, &records, month, year))
    }

    /// One report per employee in the directory, ordered by employee id.
    pub async fn salary_reports_for_month(&self, month: u32, year: i32) -> AppResult<Vec<SalaryReport>> {
        month_bounds(month, year)?;
        let policy = self.policy().await?;
        let mut employees = self.employees.list().await?;
        employees.sort_by_key(|e| e.id);
        let records = self.month_records(None, month, year).await?;

        let reports: Vec<SalaryReport> = employees
            .iter()
            .map(|employee| {
                let own: Vec<AttendanceRecord> = records
                    .iter()
                    .filter(|r| r.employee_id == employee.id)
                    .cloned()
                    .collect();
                payroll::salary_report(employee, &policy, &own, month, year)
            })
            .collect();

        tracing::debug!(month, year, employees = reports.len(), "Monthly salary reports computed");
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{sample_employee, sample_policy_input, MemoryStore};
    use crate::models::{GeoPoint, RateBasis};
    use crate::services::AttendanceService;

    fn office() -> GeoPoint {
        GeoPoint {
            latitude: 30.0444,
            longitude: 31.2357,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup(with_policy: bool) -> (PayrollService, AttendanceService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.add_employee(sample_employee(2)).await;
        store.add_employee(sample_employee(1)).await;
        if with_policy {
            store.insert(&sample_policy_input()).await.unwrap();
        }
        let payroll = PayrollService::new(store.clone(), store.clone(), store.clone());
        let attendance = AttendanceService::new(store.clone(), store.clone());
        (payroll, attendance, store)
    }

    async fn work_day(attendance: &AttendanceService, employee_id: i32, day: NaiveDate, from: (u32, u32), to: (u32, u32)) {
        attendance
            .check_in(employee_id, day.and_hms_opt(from.0, from.1, 0).unwrap(), office())
            .await
            .unwrap();
        attendance
            .check_out(employee_id, day.and_hms_opt(to.0, to.1, 0).unwrap(), office())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_money_scenario_end_to_end() {
        let (payroll, attendance, _) = setup(true).await;
        // Monday
        work_day(&attendance, 1, date(2025, 3, 3), (9, 30), (19, 0)).await;

        let report = payroll.salary_report(1, 3, 2025).await.unwrap();
        assert_eq!(report.overtime_amount, 100.0);
        assert_eq!(report.deduction_amount, 10.0);
        assert_eq!(report.net_salary, 8090.0);

        let detailed = payroll.detailed_salary_report(1, 3, 2025).await.unwrap();
        assert_eq!(detailed.overtime_summation, 2.0);
        assert_eq!(detailed.delay_summation, 0.5);
        assert_eq!(detailed.attendances.len(), 1);
    }

    #[tokio::test]
    async fn test_weekend_attendance_is_ignored() {
        let (payroll, attendance, _) = setup(true).await;
        // Friday and Saturday are non-working under the sample policy
        work_day(&attendance, 1, date(2025, 3, 7), (9, 0), (20, 0)).await;
        work_day(&attendance, 1, date(2025, 3, 8), (11, 0), (17, 0)).await;

        let report = payroll.salary_report(1, 3, 2025).await.unwrap();
        assert_eq!(report.overtime_amount, 0.0);
        assert_eq!(report.deduction_amount, 0.0);
        assert_eq!(report.net_salary, 8000.0);
    }

    #[tokio::test]
    async fn test_policy_change_applies_on_recompute() {
        let (payroll, attendance, store) = setup(true).await;
        work_day(&attendance, 1, date(2025, 3, 3), (9, 30), (19, 0)).await;

        let mut input = sample_policy_input();
        input.rate_basis = RateBasis::Percentage;
        input.bonus_unit_value = 10.0;
        input.deduction_unit_value = 10.0;
        store.insert(&input).await.unwrap();

        // 8000 / 8h = 1000; 10% -> 100 per hour
        let report = payroll.salary_report(1, 3, 2025).await.unwrap();
        assert_eq!(report.overtime_amount, 200.0);
        assert_eq!(report.deduction_amount, 50.0);
    }

    #[tokio::test]
    async fn test_reports_are_idempotent() {
        let (payroll, attendance, _) = setup(true).await;
        work_day(&attendance, 1, date(2025, 3, 3), (9, 10), (17, 45)).await;
        work_day(&attendance, 1, date(2025, 3, 4), (8, 50), (16, 30)).await;

        let first = payroll.detailed_salary_report(1, 3, 2025).await.unwrap();
        let second = payroll.detailed_salary_report(1, 3, 2025).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.attendances[0].date, date(2025, 3, 3));
    }

    #[tokio::test]
    async fn test_missing_policy() {
        let (payroll, _, _) = setup(false).await;
        let err = payroll.salary_report(1, 3, 2025).await.unwrap_err();
        assert_eq!(err.code(), "POLICY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_employee() {
        let (payroll, _, _) = setup(true).await;
        let err = payroll.detailed_salary_report(7, 3, 2025).await.unwrap_err();
        assert_eq!(err.code(), "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_month_is_validated() {
        let (payroll, _, _) = setup(true).await;
        assert!(matches!(payroll.salary_report(1, 13, 2025).await, Err(AppError::Validation(_))));
        assert!(matches!(payroll.salary_reports_for_month(0, 2025).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_month_batch_covers_every_employee_in_id_order() {
        let (payroll, attendance, _) = setup(true).await;
        work_day(&attendance, 2, date(2025, 3, 3), (9, 0), (18, 0)).await;
        // Different month, must not leak into March
        work_day(&attendance, 1, date(2025, 4, 1), (9, 0), (18, 0)).await;

        let reports = payroll.salary_reports_for_month(3, 2025).await.unwrap();
        let ids: Vec<i32> = reports.iter().map(|r| r.employee_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(reports[0].overtime_amount, 0.0);
        assert_eq!(reports[1].overtime_amount, 50.0);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2, 2024).unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(month_bounds(12, 2025).unwrap(), (date(2025, 12, 1), date(2025, 12, 31)));
        assert!(month_bounds(0, 2025).is_err());
    }
}
