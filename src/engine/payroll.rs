//! Monthly salary arithmetic over an attendance snapshot.
//!
//! Every function here is pure: the same records, employee and policy always
//! produce the same report.

use chrono::Datelike;

use crate::models::{AttendanceRecord, DetailedSalaryReport, Employee, Policy, RateBasis, SalaryReport};

/// Turns a policy unit value into the amount paid (or deducted) per hour.
pub trait RateStrategy: Send + Sync {
    fn hourly_amount(&self, unit_value: f64, employee: &Employee) -> f64;
}

/// The unit value is a flat currency amount per hour.
pub struct MoneyRate;

impl RateStrategy for MoneyRate {
    fn hourly_amount(&self, unit_value: f64, _employee: &Employee) -> f64 {
        unit_value
    }
}

/// The unit value is a percentage of `base_salary / scheduled hours per day`.
pub struct PercentageRate;

impl RateStrategy for PercentageRate {
    fn hourly_amount(&self, unit_value: f64, employee: &Employee) -> f64 {
        let hours_per_day = employee.schedule().hours_per_day();
        if hours_per_day <= 0.0 {
            return 0.0;
        }
        unit_value / 100.0 * (employee.base_salary / hours_per_day)
    }
}

pub fn strategy_for(basis: RateBasis) -> &'static dyn RateStrategy {
    match basis {
        RateBasis::Money => &MoneyRate,
        RateBasis::Percentage => &PercentageRate,
    }
}

pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Records of `month`/`year` that fall on working days, oldest first.
pub fn payable_records(
    records: &[AttendanceRecord],
    policy: &Policy,
    month: u32,
    year: i32,
) -> Vec<AttendanceRecord> {
    let mut payable: Vec<AttendanceRecord> = records
        .iter()
        .filter(|r| r.date.month() == month && r.date.year() == year)
        .filter(|r| !policy.is_non_working_day(r.date))
        .cloned()
        .collect();
    payable.sort_by_key(|r| (r.date, r.id));
    payable
}

/// Overtime and delay a record contributes to payroll; open records count zero.
pub fn effective_hours(record: &AttendanceRecord) -> (f64, f64) {
    if record.is_closed() {
        (record.overtime_hours, record.delay_hours)
    } else {
        (0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Totals {
    overtime_hours: f64,
    delay_hours: f64,
    overtime_amount: f64,
    deduction_amount: f64,
}

fn totals(payable: &[AttendanceRecord], employee: &Employee, policy: &Policy) -> Totals {
    let (overtime_hours, delay_hours) = payable
        .iter()
        .map(effective_hours)
        .fold((0.0, 0.0), |(ot, delay), (o, d)| (ot + o, delay + d));

    let strategy = strategy_for(policy.rate_basis);
    Totals {
        overtime_hours,
        delay_hours,
        overtime_amount: round_money(overtime_hours * strategy.hourly_amount(policy.bonus_unit_value, employee)),
        deduction_amount: round_money(delay_hours * strategy.hourly_amount(policy.deduction_unit_value, employee)),
    }
}

pub fn salary_report(
    employee: &Employee,
    policy: &Policy,
    records: &[AttendanceRecord],
    month: u32,
    year: i32,
) -> SalaryReport {
    let payable = payable_records(records, policy, month, year);
    let totals = totals(&payable, employee, policy);

    SalaryReport {
        employee_id: employee.id,
        employee_name: employee.full_name.clone(),
        department_name: employee.department_name.clone(),
        month,
        year,
        basic_salary: employee.base_salary,
        overtime_amount: totals.overtime_amount,
        deduction_amount: totals.deduction_amount,
        net_salary: round_money(employee.base_salary + totals.overtime_amount - totals.deduction_amount),
    }
}

pub fn detailed_salary_report(
    employee: &Employee,
    policy: &Policy,
    records: &[AttendanceRecord],
    month: u32,
    year: i32,
) -> DetailedSalaryReport {
    let payable = payable_records(records, policy, month, year);
    let totals = totals(&payable, employee, policy);
    let open_record_ids = payable.iter().filter(|r| !r.is_closed()).map(|r| r.id).collect();

    DetailedSalaryReport {
        employee_id: employee.id,
        month,
        year,
        attendances: payable,
        overtime_amount: totals.overtime_amount,
        delay_amount: totals.deduction_amount,
        overtime_summation: totals.overtime_hours,
        delay_summation: totals.delay_hours,
        open_record_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn employee() -> Employee {
        Employee {
            id: 3,
            full_name: "Mona Adel".to_string(),
            department_name: Some("Development".to_string()),
            base_salary: 8000.0,
            scheduled_start: t(9, 0),
            scheduled_end: t(17, 0),
            permitted_latitude: 30.0,
            permitted_longitude: 31.0,
            permitted_radius_km: 0.2,
        }
    }

    fn policy(basis: RateBasis) -> Policy {
        Policy {
            id: 1,
            non_working_day_1: Weekday::Fri,
            non_working_day_2: Some(Weekday::Sat),
            rate_basis: basis,
            bonus_unit_value: 50.0,
            deduction_unit_value: 20.0,
            updated_at: Utc::now(),
        }
    }

    fn closed(id: i32, date: NaiveDate, overtime: f64, delay: f64) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: 3,
            date,
            check_in_time: Some(t(9, 0)),
            check_out_time: Some(t(17, 0)),
            check_in_location: None,
            check_out_location: None,
            overtime_hours: overtime,
            delay_hours: delay,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_money_scenario() {
        // Monday 2025-03-03: in 09:30, out 19:00
        let records = vec![closed(1, date(2025, 3, 3), 2.0, 0.5)];
        let report = salary_report(&employee(), &policy(RateBasis::Money), &records, 3, 2025);

        assert_eq!(report.overtime_amount, 100.0);
        assert_eq!(report.deduction_amount, 10.0);
        assert_eq!(report.net_salary, 8090.0);
    }

    #[test]
    fn test_non_working_days_are_excluded() {
        let records = vec![
            closed(1, date(2025, 3, 3), 1.0, 0.0),  // Monday
            closed(2, date(2025, 3, 7), 5.0, 0.0),  // Friday
            closed(3, date(2025, 3, 8), 5.0, 3.0),  // Saturday
        ];
        let detailed = detailed_salary_report(&employee(), &policy(RateBasis::Money), &records, 3, 2025);

        assert_eq!(detailed.attendances.len(), 1);
        assert_eq!(detailed.attendances[0].id, 1);
        assert_eq!(detailed.overtime_summation, 1.0);
        assert_eq!(detailed.delay_summation, 0.0);
    }

    #[test]
    fn test_other_months_are_excluded() {
        let records = vec![
            closed(1, date(2025, 2, 24), 4.0, 0.0),
            closed(2, date(2025, 3, 4), 1.0, 0.0),
        ];
        let report = salary_report(&employee(), &policy(RateBasis::Money), &records, 3, 2025);
        assert_eq!(report.overtime_amount, 50.0);
    }

    #[test]
    fn test_open_records_contribute_nothing() {
        let mut open = closed(1, date(2025, 3, 3), 0.0, 1.5);
        open.check_out_time = None;

        let detailed = detailed_salary_report(&employee(), &policy(RateBasis::Money), &[open], 3, 2025);
        assert_eq!(detailed.attendances.len(), 1);
        assert_eq!(detailed.delay_summation, 0.0);
        assert_eq!(detailed.delay_amount, 0.0);
        assert_eq!(detailed.open_record_ids, vec![1]);
    }

    #[test]
    fn test_percentage_basis() {
        // 8000 / 8h = 1000 per hour-unit; 50% bonus -> 500/h, 20% deduction -> 200/h
        let records = vec![closed(1, date(2025, 3, 3), 2.0, 0.5)];
        let report = salary_report(&employee(), &policy(RateBasis::Percentage), &records, 3, 2025);

        assert_eq!(report.overtime_amount, 1000.0);
        assert_eq!(report.deduction_amount, 100.0);
    }

    #[test]
    fn test_net_salary_is_not_clamped() {
        let records = vec![closed(1, date(2025, 3, 3), 0.0, 500.0)];
        let report = salary_report(&employee(), &policy(RateBasis::Money), &records, 3, 2025);
        assert_eq!(report.net_salary, 8000.0 - 10_000.0);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let records = vec![
            closed(2, date(2025, 3, 4), 1.25, 0.0),
            closed(1, date(2025, 3, 3), 0.0, 0.75),
        ];
        let p = policy(RateBasis::Money);

        let first = detailed_salary_report(&employee(), &p, &records, 3, 2025);
        let second = detailed_salary_report(&employee(), &p, &records, 3, 2025);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.attendances[0].id, 1);
    }
}
