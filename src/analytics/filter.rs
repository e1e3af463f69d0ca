//! Record selection applied before ranking and aggregation

use crate::models::ClassifiedBin;
use serde::{Deserialize, Serialize};

/// Which bins a view covers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scope", content = "name")]
pub enum BinFilter {
    /// Every bin
    #[default]
    All,

    /// Bins in one city (case-sensitive)
    City(String),
}

impl BinFilter {
    pub fn matches(&self, bin: &ClassifiedBin) -> bool {
        match self {
            BinFilter::All => true,
            BinFilter::City(city) => bin.record.city == *city,
        }
    }

    /// Predicate form, for the ranking and aggregation functions
    pub fn as_predicate(&self) -> impl Fn(&ClassifiedBin) -> bool + '_ {
        move |bin| self.matches(bin)
    }
}
