use chrono::Weekday;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::policy::{weekday_name, RateBasis};

/// Input for replacing the active company policy
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePolicyInput {
    #[serde(with = "weekday_name")]
    #[schema(value_type = String, example = "Friday")]
    pub non_working_day_1: Weekday,
    #[serde(with = "weekday_name::option", default)]
    #[schema(value_type = Option<String>, example = "Saturday")]
    pub non_working_day_2: Option<Weekday>,
    pub rate_basis: RateBasis,
    pub bonus_unit_value: f64,
    pub deduction_unit_value: f64,
}

impl UpdatePolicyInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.non_working_day_2 == Some(self.non_working_day_1) {
            return Err("The second non-working day must differ from the first".to_string());
        }
        if !self.bonus_unit_value.is_finite() || self.bonus_unit_value < 0.0 {
            return Err("bonus_unit_value must be a non-negative number".to_string());
        }
        if !self.deduction_unit_value.is_finite() || self.deduction_unit_value < 0.0 {
            return Err("deduction_unit_value must be a non-negative number".to_string());
        }
        Ok(())
    }
}
