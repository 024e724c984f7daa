use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::GeoPoint;

/// Input for a check-in or check-out event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceEventInput {
    pub employee_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Local wall-clock time of the event; defaults to the server clock
    pub time: Option<NaiveDateTime>,
}

impl AttendanceEventInput {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Input for an administrative overwrite of an attendance record.
/// Nothing is recomputed: the values are stored as given.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminUpdateAttendanceInput {
    pub employee_id: i32,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub check_in_location: Option<GeoPoint>,
    pub check_out_location: Option<GeoPoint>,
    pub overtime_hours: f64,
    pub delay_hours: f64,
}

impl AdminUpdateAttendanceInput {
    pub fn validate(&self) -> Result<(), String> {
        if !self.overtime_hours.is_finite() || self.overtime_hours < 0.0 {
            return Err("overtime_hours must be a non-negative number".to_string());
        }
        if !self.delay_hours.is_finite() || self.delay_hours < 0.0 {
            return Err("delay_hours must be a non-negative number".to_string());
        }
        Ok(())
    }
}

/// Response for attendance mutations that return no record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}
