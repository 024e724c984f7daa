use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::LeaveAction;

/// Input for submitting a leave request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitLeaveRequestInput {
    pub employee_id: i32,
    pub leave_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl SubmitLeaveRequestInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.end_date < self.start_date {
            return Err("end_date must not be earlier than start_date".to_string());
        }
        let reason_len = self.reason.trim().chars().count();
        if !(5..=300).contains(&reason_len) {
            return Err("reason must be between 5 and 300 characters".to_string());
        }
        Ok(())
    }
}

/// Input for approving or rejecting a pending request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveActionInput {
    pub action: LeaveAction,
}

/// Input for adding a leave type to the catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateLeaveTypeInput {
    pub name: String,
    pub max_days_per_year: i32,
}

impl CreateLeaveTypeInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if !(1..=365).contains(&self.max_days_per_year) {
            return Err("max_days_per_year must be between 1 and 365".to_string());
        }
        Ok(())
    }
}

/// Response for leave mutations that return no entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}
