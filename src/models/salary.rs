use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AttendanceRecord;

/// Monthly pay summary, recomputed on demand from attendance and policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalaryReport {
    pub employee_id: i32,
    pub employee_name: String,
    pub department_name: Option<String>,
    pub month: u32,
    pub year: i32,
    pub basic_salary: f64,
    pub overtime_amount: f64,
    pub deduction_amount: f64,
    pub net_salary: f64,
}

/// Per-day breakdown behind a [`SalaryReport`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DetailedSalaryReport {
    pub employee_id: i32,
    pub month: u32,
    pub year: i32,
    pub attendances: Vec<AttendanceRecord>,
    pub overtime_amount: f64,
    pub delay_amount: f64,
    #[serde(rename = "over_time_summation")]
    pub overtime_summation: f64,
    pub delay_summation: f64,
    /// Records in `attendances` still awaiting check-out; they add nothing to the sums or amounts
    pub open_record_ids: Vec<i32>,
}
