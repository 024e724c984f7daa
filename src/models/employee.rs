use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::GeoPoint;
use crate::engine::reconcile::Schedule;

/// Read-only view of an employee as maintained by the HR directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub department_name: Option<String>,
    pub base_salary: f64,
    pub scheduled_start: NaiveTime,
    pub scheduled_end: NaiveTime,
    pub permitted_latitude: f64,
    pub permitted_longitude: f64,
    pub permitted_radius_km: f64,
}

impl Employee {
    pub fn schedule(&self) -> Schedule {
        Schedule {
            start: self.scheduled_start,
            end: self.scheduled_end,
        }
    }

    pub fn permitted_location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.permitted_latitude,
            longitude: self.permitted_longitude,
        }
    }
}
