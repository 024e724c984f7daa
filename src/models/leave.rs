use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::engine::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveType {
    pub id: i32,
    pub name: String,
    pub max_days_per_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    /// `Pending` is the only state with outgoing transitions.
    pub fn apply(self, action: LeaveAction) -> Result<LeaveStatus, DomainError> {
        let target = action.target();
        match self {
            LeaveStatus::Pending => Ok(target),
            from => Err(DomainError::InvalidTransition {
                from: from.as_str().to_string(),
                to: target.as_str().to_string(),
            }),
        }
    }
}

impl std::str::FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(LeaveStatus::Pending),
            "Approved" => Ok(LeaveStatus::Approved),
            "Rejected" => Ok(LeaveStatus::Rejected),
            other => Err(format!("Unknown leave status: {}", other)),
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HR decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LeaveAction {
    Approve,
    Reject,
}

impl LeaveAction {
    pub fn target(self) -> LeaveStatus {
        match self {
            LeaveAction::Approve => LeaveStatus::Approved,
            LeaveAction::Reject => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: i32,
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub requested_at: NaiveDateTime,
}

impl LeaveRequest {
    pub fn span_days(&self) -> i32 {
        (self.end_date - self.start_date).num_days() as i32 + 1
    }
}

/// Values written when a request passes the submission gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub requested_at: NaiveDateTime,
}

/// Remaining allowance of one leave type for one employee and year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaveBalance {
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub leave_type_name: String,
    pub year: i32,
    pub max_days_per_year: i32,
    pub used_days: i32,
    pub remaining_days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        assert_eq!(LeaveStatus::Pending.apply(LeaveAction::Approve), Ok(LeaveStatus::Approved));
        assert_eq!(LeaveStatus::Pending.apply(LeaveAction::Reject), Ok(LeaveStatus::Rejected));
    }

    #[test]
    fn test_terminal_states_reject_every_action() {
        for from in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            for action in [LeaveAction::Approve, LeaveAction::Reject] {
                let err = from.apply(action).unwrap_err();
                assert_eq!(err.code(), "INVALID_TRANSITION");
            }
        }
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected] {
            assert_eq!(status.as_str().parse::<LeaveStatus>(), Ok(status));
        }
        assert!("Cancelled".parse::<LeaveStatus>().is_err());
    }
}
