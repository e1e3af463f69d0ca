//! Urgency ranking by days-to-full

use crate::models::ClassifiedBin;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Row of the "bins needing collection" table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopBinRow {
    pub bin_id: String,
    pub area: String,
    pub days_to_full: f64,
    pub priority: String,
}

impl From<&ClassifiedBin> for TopBinRow {
    fn from(bin: &ClassifiedBin) -> Self {
        Self {
            bin_id: bin.record.bin_id.clone(),
            area: bin.record.area.clone(),
            days_to_full: bin.record.days_to_full,
            priority: bin.predicted_priority.to_string(),
        }
    }
}

/// The `n` bins closest to full, most urgent first.
///
/// The sort is stable, so bins with equal days-to-full keep their input
/// order. NaN values sort after every number.
pub fn top_urgent<'a, F>(bins: &'a [ClassifiedBin], n: usize, predicate: F) -> Vec<&'a ClassifiedBin>
where
    F: Fn(&ClassifiedBin) -> bool,
{
    let mut selected: Vec<&ClassifiedBin> = bins.iter().filter(|&b| predicate(b)).collect();
    selected.sort_by(|a, b| compare_days(a.record.days_to_full, b.record.days_to_full));
    selected.truncate(n);
    selected
}

fn compare_days(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        // -0.0 and 0.0 tie, so input order decides
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BinRecord, Priority};

    fn bin(id: &str, city: &str, days: f64) -> ClassifiedBin {
        ClassifiedBin::new(
            BinRecord {
                bin_id: id.to_string(),
                capacity_kg: 100.0,
                current_fill_kg: 50.0,
                avg_daily_increase_kg: 2.0,
                area: "Centre".to_string(),
                city: city.to_string(),
                priority: Priority::Medium,
                latitude: 0.0,
                longitude: 0.0,
                days_to_full: days,
            },
            Priority::Medium,
        )
    }

    fn ids(bins: &[&ClassifiedBin]) -> Vec<String> {
        bins.iter().map(|b| b.record.bin_id.clone()).collect()
    }

    #[test]
    fn test_top_urgent_stable_on_ties() {
        let bins: Vec<ClassifiedBin> = [5.0, 1.0, 3.0, 1.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, &d)| bin(&format!("idx{}", i), "Leeds", d))
            .collect();

        let top = top_urgent(&bins, 3, |_| true);
        assert_eq!(ids(&top), vec!["idx1", "idx3", "idx4"]);

        let all = top_urgent(&bins, 10, |_| true);
        assert_eq!(ids(&all), vec!["idx1", "idx3", "idx4", "idx2", "idx0"]);
    }

    #[test]
    fn test_top_urgent_sorted_non_decreasing() {
        let bins: Vec<ClassifiedBin> = [9.5, 0.0, 4.25, 4.25, 12.0, 0.5, 7.0]
            .iter()
            .enumerate()
            .map(|(i, &d)| bin(&format!("B{}", i), "Leeds", d))
            .collect();

        let top = top_urgent(&bins, bins.len(), |_| true);
        for pair in top.windows(2) {
            assert!(pair[0].record.days_to_full <= pair[1].record.days_to_full);
        }
    }

    #[test]
    fn test_top_urgent_with_filter() {
        let bins = vec![
            bin("L1", "Leeds", 4.0),
            bin("Y1", "York", 1.0),
            bin("L2", "Leeds", 2.0),
        ];

        let top = top_urgent(&bins, 10, |b| b.record.city == "Leeds");
        assert_eq!(ids(&top), vec!["L2", "L1"]);
        assert_eq!(bins.len(), 3);
    }

    #[test]
    fn test_nan_sorts_last() {
        let bins = vec![
            bin("A", "Leeds", f64::NAN),
            bin("B", "Leeds", 3.0),
            bin("C", "Leeds", -1.0),
        ];
        let top = top_urgent(&bins, 3, |_| true);
        assert_eq!(ids(&top), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_signed_zero_is_a_tie() {
        let bins = vec![bin("pos", "Leeds", 0.0), bin("neg", "Leeds", -0.0)];
        let top = top_urgent(&bins, 2, |_| true);
        assert_eq!(ids(&top), vec!["pos", "neg"]);
    }

    #[test]
    fn test_top_urgent_zero_and_empty() {
        let bins = vec![bin("A", "Leeds", 1.0)];
        assert!(top_urgent(&bins, 0, |_| true).is_empty());
        assert!(top_urgent(&[], 5, |_| true).is_empty());
    }

    #[test]
    fn test_top_bin_row() {
        let row = TopBinRow::from(&bin("B7", "Leeds", 2.5));
        assert_eq!(row.bin_id, "B7");
        assert_eq!(row.area, "Centre");
        assert_eq!(row.days_to_full, 2.5);
        assert_eq!(row.priority, "Medium");
    }
}
