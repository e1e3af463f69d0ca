use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use validator::Validate;

/// Collection urgency of a bin.
///
/// Variant order is the canonical display order (most urgent first).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Colour token used by the map layer
    pub fn colour(&self) -> &'static str {
        match self {
            Priority::High => "red",
            Priority::Medium => "orange",
            Priority::Low => "green",
        }
    }

    /// Urgency rank, higher is more urgent
    pub fn urgency(&self) -> u8 {
        match self {
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Low => 0,
        }
    }
}

/// One physical waste bin as loaded from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BinRecord {
    /// Unique identifier
    #[validate(length(min = 1, max = 255))]
    pub bin_id: String,

    /// Capacity in kg
    pub capacity_kg: f64,

    /// Current fill in kg
    pub current_fill_kg: f64,

    /// Average daily increase in kg/day
    pub avg_daily_increase_kg: f64,

    /// Area within the city
    #[validate(length(min = 1))]
    pub area: String,

    /// City
    #[validate(length(min = 1))]
    pub city: String,

    /// Ground-truth priority (training only)
    pub priority: Priority,

    pub latitude: f64,

    pub longitude: f64,

    /// Precomputed days until the bin is full
    pub days_to_full: f64,
}

impl BinRecord {
    /// Fill ratio, rejecting capacities that would produce inf/NaN
    pub fn fill_ratio(&self) -> crate::error::Result<f64> {
        if !self.capacity_kg.is_finite() || self.capacity_kg <= 0.0 {
            return Err(crate::error::PipelineError::InvalidRecord(format!(
                "bin {} has non-positive capacity {}",
                self.bin_id, self.capacity_kg
            )));
        }
        if !self.current_fill_kg.is_finite() {
            return Err(crate::error::PipelineError::InvalidRecord(format!(
                "bin {} has non-finite fill {}",
                self.bin_id, self.current_fill_kg
            )));
        }
        Ok(self.current_fill_kg / self.capacity_kg)
    }
}

/// A bin together with its predicted priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedBin {
    #[serde(flatten)]
    pub record: BinRecord,

    pub predicted_priority: Priority,
}

impl ClassifiedBin {
    pub fn new(record: BinRecord, predicted_priority: Priority) -> Self {
        Self {
            record,
            predicted_priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn record(capacity: f64, fill: f64) -> BinRecord {
        BinRecord {
            bin_id: "B001".to_string(),
            capacity_kg: capacity,
            current_fill_kg: fill,
            avg_daily_increase_kg: 2.0,
            area: "North".to_string(),
            city: "Leeds".to_string(),
            priority: Priority::High,
            latitude: 53.8,
            longitude: -1.55,
            days_to_full: 3.0,
        }
    }

    #[test]
    fn test_priority_parse_is_case_sensitive() {
        assert_eq!(Priority::from_str("High").unwrap(), Priority::High);
        assert_eq!(Priority::from_str("Medium").unwrap(), Priority::Medium);
        assert_eq!(Priority::from_str("Low").unwrap(), Priority::Low);
        assert!(Priority::from_str("high").is_err());
        assert!(Priority::from_str("Urgent").is_err());
    }

    #[test]
    fn test_priority_canonical_order() {
        let all: Vec<Priority> = Priority::iter().collect();
        assert_eq!(all, vec![Priority::High, Priority::Medium, Priority::Low]);
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_priority_colours() {
        assert_eq!(Priority::High.colour(), "red");
        assert_eq!(Priority::Medium.colour(), "orange");
        assert_eq!(Priority::Low.colour(), "green");
    }

    #[test]
    fn test_fill_ratio() {
        assert_eq!(record(100.0, 90.0).fill_ratio().unwrap(), 0.9);
        // overfull bins are allowed
        assert_eq!(record(50.0, 75.0).fill_ratio().unwrap(), 1.5);
    }

    #[test]
    fn test_fill_ratio_zero_capacity() {
        let err = record(0.0, 10.0).fill_ratio().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RECORD");
    }

    #[test]
    fn test_validation_rejects_empty_id() {
        let mut bin = record(100.0, 10.0);
        bin.bin_id = String::new();
        assert!(bin.validate().is_err());
        assert!(record(100.0, 10.0).validate().is_ok());
    }
}
