//! Warehouse order entity
//!
//! One row per order. Orders are produced once (by the generator or an
//! upstream system) and are read-only afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Floor applied to processing time and labor cost
pub const MIN_MEASUREMENT: f64 = 5.0;

/// Experimental condition an order was handled under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProcessGroup {
    /// Current process (control)
    A,
    /// Candidate process (treatment)
    B,
}

impl ProcessGroup {
    /// Both groups, in reporting order
    pub const ALL: [ProcessGroup; 2] = [ProcessGroup::A, ProcessGroup::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessGroup::A => "A",
            ProcessGroup::B => "B",
        }
    }
}

impl fmt::Display for ProcessGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Labels must match exactly; `a` or ` B` are not group labels
impl FromStr for ProcessGroup {
    type Err = GroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(ProcessGroup::A),
            "B" => Ok(ProcessGroup::B),
            other => Err(GroupParseError(other.to_string())),
        }
    }
}

/// Error for a process group label outside {A, B}
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid process group '{0}' (expected A or B)")]
pub struct GroupParseError(pub String);

/// A single warehouse order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier (`ORD_<n>`)
    pub order_id: String,

    pub order_date: NaiveDate,

    pub process_group: ProcessGroup,

    pub warehouse_id: String,

    pub picker_id: String,

    pub items_count: u32,

    /// Minutes from pick start to pack complete
    pub processing_time_min: f64,

    /// Labor cost in currency units
    pub labor_cost: f64,

    #[serde(with = "flag")]
    pub error_flag: bool,

    #[serde(with = "flag")]
    pub on_time_delivery: bool,
}

impl Order {
    /// Project the order down to the columns the analysis uses
    pub fn observation(&self) -> Observation {
        Observation {
            process_group: self.process_group,
            processing_time_min: self.processing_time_min,
            labor_cost: self.labor_cost,
        }
    }
}

/// The analysis view of an order: group label plus the two measured metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub process_group: ProcessGroup,
    pub processing_time_min: f64,
    pub labor_cost: f64,
}

impl Observation {
    pub fn new(process_group: ProcessGroup, processing_time_min: f64, labor_cost: f64) -> Self {
        Self {
            process_group,
            processing_time_min,
            labor_cost,
        }
    }
}

/// Boolean flags travel as `0`/`1` in the flat file
mod flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim() {
            "1" | "true" | "True" | "TRUE" => Ok(true),
            "0" | "false" | "False" | "FALSE" => Ok(false),
            other => Err(D::Error::custom(format!("invalid flag value '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_parse() {
        assert_eq!("A".parse::<ProcessGroup>().unwrap(), ProcessGroup::A);
        assert_eq!("B".parse::<ProcessGroup>().unwrap(), ProcessGroup::B);
        assert_eq!(
            "C".parse::<ProcessGroup>().unwrap_err(),
            GroupParseError("C".to_string())
        );
        assert!("a".parse::<ProcessGroup>().is_err());
        assert!(" B".parse::<ProcessGroup>().is_err());
    }

    #[test]
    fn test_group_display() {
        assert_eq!(ProcessGroup::A.to_string(), "A");
        assert_eq!(ProcessGroup::B.to_string(), "B");
    }

    #[test]
    fn test_observation_projection() {
        let order = Order {
            order_id: "ORD_1".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            process_group: ProcessGroup::B,
            warehouse_id: "WH_01".to_string(),
            picker_id: "P_3".to_string(),
            items_count: 4,
            processing_time_min: 26.5,
            labor_cost: 14.25,
            error_flag: false,
            on_time_delivery: true,
        };

        let obs = order.observation();
        assert_eq!(obs, Observation::new(ProcessGroup::B, 26.5, 14.25));
    }

    #[test]
    fn test_flags_serialize_as_integers() {
        let order = Order {
            order_id: "ORD_7".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            process_group: ProcessGroup::A,
            warehouse_id: "WH_01".to_string(),
            picker_id: "P_1".to_string(),
            items_count: 1,
            processing_time_min: 5.0,
            labor_cost: 5.0,
            error_flag: true,
            on_time_delivery: false,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["error_flag"], 1);
        assert_eq!(json["on_time_delivery"], 0);
        assert_eq!(json["order_date"], "2024-01-02");
    }
}
