use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One employee's attendance for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: i32,
    pub employee_id: i32,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_time: Option<NaiveTime>,
    pub check_in_location: Option<GeoPoint>,
    pub check_out_location: Option<GeoPoint>,
    pub overtime_hours: f64,
    pub delay_hours: f64,
}

impl AttendanceRecord {
    pub fn is_closed(&self) -> bool {
        self.check_out_time.is_some()
    }
}

/// Values written when a record is created at first check-in
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub employee_id: i32,
    pub date: NaiveDate,
    pub check_in_time: NaiveTime,
    pub check_in_location: GeoPoint,
    pub delay_hours: f64,
}

/// Values applied to an open record at check-out
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceCheckOut {
    pub check_out_time: NaiveTime,
    pub check_out_location: GeoPoint,
    pub overtime_hours: f64,
    pub extra_delay_hours: f64,
}

/// Filter for listing attendance; every field is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub employee_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.map_or(true, |id| record.employee_id == id)
            && self.from.map_or(true, |from| record.date >= from)
            && self.to.map_or(true, |to| record.date <= to)
    }
}
