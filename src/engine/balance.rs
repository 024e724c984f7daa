//! Leave balances derived from approved-request history.
//!
//! Nothing here is persisted: a balance is always `max_days_per_year` minus
//! the calendar days of approved requests that fall inside the year.

use chrono::{Datelike, NaiveDate};

use crate::models::{LeaveRequest, LeaveStatus, LeaveType};

use super::DomainError;

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}

/// Calendar days of the inclusive range `[start, end]` that fall inside `year`.
pub fn days_in_year(start: NaiveDate, end: NaiveDate, year: i32) -> i32 {
    let Some((first, last)) = year_bounds(year) else {
        return 0;
    };

    let from = start.max(first);
    let to = end.min(last);
    if to < from {
        return 0;
    }

    (to - from).num_days() as i32 + 1
}

/// Splits an inclusive date range into `(year, days)` shares, oldest year first.
pub fn yearly_spans(start: NaiveDate, end: NaiveDate) -> Vec<(i32, i32)> {
    (start.year()..=end.year())
        .map(|year| (year, days_in_year(start, end, year)))
        .filter(|(_, days)| *days > 0)
        .collect()
}

/// Days consumed in `year` by approved requests of one employee and leave type.
pub fn used_days(requests: &[LeaveRequest], employee_id: i32, leave_type_id: i32, year: i32) -> i32 {
    requests
        .iter()
        .filter(|r| {
            r.employee_id == employee_id
                && r.leave_type_id == leave_type_id
                && r.status == LeaveStatus::Approved
        })
        .map(|r| days_in_year(r.start_date, r.end_date, year))
        .sum()
}

pub fn remaining_days(
    leave_type: &LeaveType,
    requests: &[LeaveRequest],
    employee_id: i32,
    year: i32,
) -> i32 {
    leave_type.max_days_per_year - used_days(requests, employee_id, leave_type.id, year)
}

/// Rejects a request whose share of any year exceeds that year's remaining days.
///
/// `remaining_for` is asked once per year the request touches.
pub fn ensure_sufficient<F>(
    leave_type: &LeaveType,
    start: NaiveDate,
    end: NaiveDate,
    mut remaining_for: F,
) -> Result<(), DomainError>
where
    F: FnMut(i32) -> i32,
{
    for (year, requested) in yearly_spans(start, end) {
        let remaining = remaining_for(year);
        if remaining < requested {
            return Err(DomainError::InsufficientBalance {
                leave_type: leave_type.name.clone(),
                year,
                remaining,
                requested,
            });
        }
    }

    Ok(())
}
