//! Overtime and delay derivation for a single attendance day.
//!
//! Times are wall-clock times of day on the employee's local date. Arriving
//! early never banks overtime; leaving early is delay on top of late arrival.

use chrono::{NaiveDateTime, NaiveTime};

use crate::models::AttendanceRecord;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Schedule {
    pub fn hours_per_day(&self) -> f64 {
        hours_between(self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoursDelta {
    pub overtime_hours: f64,
    pub delay_hours: f64,
}

fn hours_between(from: NaiveTime, to: NaiveTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

pub fn reconcile(event: NaiveTime, schedule: &Schedule, kind: EventKind) -> HoursDelta {
    match kind {
        EventKind::CheckIn => HoursDelta {
            overtime_hours: 0.0,
            delay_hours: hours_between(schedule.start, event).max(0.0),
        },
        EventKind::CheckOut if event > schedule.end => HoursDelta {
            overtime_hours: hours_between(schedule.end, event),
            delay_hours: 0.0,
        },
        EventKind::CheckOut => HoursDelta {
            overtime_hours: 0.0,
            delay_hours: hours_between(event, schedule.end),
        },
    }
}

/// Validates a check-in against the day's existing record and returns the
/// delay it introduces.
pub fn plan_check_in(
    existing: Option<&AttendanceRecord>,
    employee_id: i32,
    at: NaiveDateTime,
    schedule: &Schedule,
) -> Result<HoursDelta, DomainError> {
    if existing.is_some() {
        return Err(DomainError::DuplicateCheckIn {
            employee_id,
            date: at.date(),
        });
    }

    Ok(reconcile(at.time(), schedule, EventKind::CheckIn))
}

/// Validates a check-out against the day's record and returns the overtime or
/// extra delay it adds.
pub fn plan_check_out(
    existing: Option<&AttendanceRecord>,
    employee_id: i32,
    at: NaiveDateTime,
    schedule: &Schedule,
) -> Result<HoursDelta, DomainError> {
    let date = at.date();
    let record = existing.ok_or(DomainError::NoOpenCheckIn { employee_id, date })?;

    if record.date != date {
        return Err(DomainError::InvalidSequence(format!(
            "check-out on {} does not match the check-in day {}",
            date, record.date
        )));
    }

    if record.is_closed() {
        return Err(DomainError::AlreadyClosed { employee_id, date });
    }

    let check_in = record.check_in_time.ok_or_else(|| {
        DomainError::InvalidSequence("check-out without a matching check-in".to_string())
    })?;

    if at.time() < check_in {
        return Err(DomainError::InvalidSequence(format!(
            "check-out at {} is earlier than check-in at {}",
            at.time(),
            check_in
        )));
    }

    Ok(reconcile(at.time(), schedule, EventKind::CheckOut))
}
