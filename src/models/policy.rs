use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How bonus and deduction unit values are turned into an hourly amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RateBasis {
    Money,
    Percentage,
}

impl RateBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateBasis::Money => "Money",
            RateBasis::Percentage => "Percentage",
        }
    }
}

impl std::str::FromStr for RateBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Money" => Ok(RateBasis::Money),
            "Percentage" => Ok(RateBasis::Percentage),
            other => Err(format!("Unknown rate basis: {}", other)),
        }
    }
}

/// The company policy governing non-working days and pay-rate arithmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Policy {
    pub id: i32,
    #[serde(with = "weekday_name")]
    #[schema(value_type = String, example = "Friday")]
    pub non_working_day_1: Weekday,
    #[serde(with = "weekday_name::option", default)]
    #[schema(value_type = Option<String>, example = "Saturday")]
    pub non_working_day_2: Option<Weekday>,
    pub rate_basis: RateBasis,
    pub bonus_unit_value: f64,
    pub deduction_unit_value: f64,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    pub fn is_non_working_day(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday();
        weekday == self.non_working_day_1 || self.non_working_day_2 == Some(weekday)
    }
}

/// Full English weekday names ("Saturday"), matching what HR picks in the settings form.
pub mod weekday_name {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn as_str(day: Weekday) -> &'static str {
        match day {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    pub fn parse(s: &str) -> Result<Weekday, String> {
        s.parse::<Weekday>()
            .map_err(|_| format!("Unknown weekday: {}", s))
    }

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(as_str(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::Weekday;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(day: &Option<Weekday>, serializer: S) -> Result<S::Ok, S::Error> {
            match day {
                Some(day) => serializer.serialize_some(super::as_str(*day)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Weekday>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) if !s.is_empty() => super::parse(&s).map(Some).map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy {
            id: 1,
            non_working_day_1: Weekday::Fri,
            non_working_day_2: Some(Weekday::Sat),
            rate_basis: RateBasis::Money,
            bonus_unit_value: 50.0,
            deduction_unit_value: 20.0,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_non_working_days() {
        let p = policy();
        // 2025-03-07 is a Friday, 2025-03-08 a Saturday
        assert!(p.is_non_working_day(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()));
        assert!(p.is_non_working_day(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap()));
        assert!(!p.is_non_working_day(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()));
    }

    #[test]
    fn test_weekday_serializes_as_full_name() {
        let json = serde_json::to_value(policy()).unwrap();
        assert_eq!(json["non_working_day_1"], "Friday");
        assert_eq!(json["non_working_day_2"], "Saturday");
        assert_eq!(json["rate_basis"], "Money");
    }

    #[test]
    fn test_empty_second_day_deserializes_as_none() {
        let mut json = serde_json::to_value(policy()).unwrap();
        json["non_working_day_2"] = serde_json::json!("");
        let parsed: Policy = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.non_working_day_2, None);
    }
}
