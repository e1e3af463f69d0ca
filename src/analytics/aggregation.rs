//! Per-priority counts

use crate::models::{ClassifiedBin, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Row of the priority summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub priority: String,
    pub count: usize,
}

/// Count bins per predicted priority.
///
/// Priorities with no bins are omitted. Iteration follows the canonical
/// order High, Medium, Low regardless of which categories occur.
pub fn summarize<F>(bins: &[ClassifiedBin], predicate: F) -> BTreeMap<Priority, usize>
where
    F: Fn(&ClassifiedBin) -> bool,
{
    let mut counts = BTreeMap::new();
    for bin in bins.iter().filter(|&b| predicate(b)) {
        *counts.entry(bin.predicted_priority).or_insert(0) += 1;
    }
    counts
}

/// Summary as display rows
pub fn summary_rows(counts: &BTreeMap<Priority, usize>) -> Vec<SummaryRow> {
    counts
        .iter()
        .map(|(priority, &count)| SummaryRow {
            priority: priority.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BinRecord;

    fn bin(city: &str, predicted: Priority) -> ClassifiedBin {
        ClassifiedBin::new(
            BinRecord {
                bin_id: "B".to_string(),
                capacity_kg: 100.0,
                current_fill_kg: 50.0,
                avg_daily_increase_kg: 2.0,
                area: "Centre".to_string(),
                city: city.to_string(),
                priority: Priority::Low,
                latitude: 0.0,
                longitude: 0.0,
                days_to_full: 5.0,
            },
            predicted,
        )
    }

    #[test]
    fn test_summarize_canonical_order_without_zeros() {
        let bins = vec![
            bin("Leeds", Priority::Low),
            bin("Leeds", Priority::High),
            bin("Leeds", Priority::Low),
        ];

        let counts = summarize(&bins, |_| true);
        let entries: Vec<(Priority, usize)> = counts.into_iter().collect();
        assert_eq!(entries, vec![(Priority::High, 1), (Priority::Low, 2)]);
    }

    #[test]
    fn test_summarize_counts_sum_to_filtered_len() {
        let bins = vec![
            bin("Leeds", Priority::Medium),
            bin("York", Priority::High),
            bin("Leeds", Priority::High),
            bin("Leeds", Priority::Low),
            bin("York", Priority::Low),
        ];

        let in_leeds = |b: &ClassifiedBin| b.record.city == "Leeds";
        let counts = summarize(&bins, in_leeds);
        let expected = bins.iter().filter(|&b| in_leeds(b)).count();
        assert_eq!(counts.values().sum::<usize>(), expected);
        assert_eq!(counts.values().sum::<usize>(), 3);

        let all = summarize(&bins, |_| true);
        assert_eq!(all.values().sum::<usize>(), bins.len());
    }

    #[test]
    fn test_summary_rows() {
        let bins = vec![bin("Leeds", Priority::Medium), bin("Leeds", Priority::High)];
        let rows = summary_rows(&summarize(&bins, |_| true));
        assert_eq!(
            rows,
            vec![
                SummaryRow {
                    priority: "High".to_string(),
                    count: 1
                },
                SummaryRow {
                    priority: "Medium".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_summarize_empty_view() {
        let bins = vec![bin("Leeds", Priority::High)];
        assert!(summarize(&bins, |b| b.record.city == "York").is_empty());
    }
}
