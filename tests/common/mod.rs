//! Shared fixtures for integration tests
//!
//! Builds bin datasets whose ground-truth priority follows the fill ratio,
//! and renders them as CSV the way the upstream exporter does.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "bin_id,capacity_kg,current_fill_kg,avg_daily_increase_kg,area,city,priority,latitude,longitude,days_to_full";

/// One CSV row per bin, priorities derived from the fill ratio
pub fn graded_rows(n: usize, cities: &[(&str, f64, f64)]) -> Vec<String> {
    (0..n)
        .map(|i| {
            let ratio = ((i * 7) % n) as f64 / n as f64;
            let capacity = [60.0, 80.0, 120.0, 240.0][i % 4];
            let fill = ratio * capacity;
            let daily = 0.5 + ratio * 8.0;
            let priority = if ratio >= 0.7 {
                "High"
            } else if ratio >= 0.4 {
                "Medium"
            } else {
                "Low"
            };
            let (city, lat, lon) = cities[i % cities.len()];
            let days_to_full = (capacity - fill) / daily;
            format!(
                "BIN{:04},{},{},{},Area{},{},{},{},{},{:.2}",
                i,
                capacity,
                fill,
                daily,
                i % 5,
                city,
                priority,
                lat + (i as f64) * 0.0005,
                lon - (i as f64) * 0.0005,
                days_to_full
            )
        })
        .collect()
}

pub fn csv_text(rows: &[String]) -> String {
    let mut text = String::from(HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

/// Write a CSV file into `dir` and return its path
pub fn write_csv(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture csv");
    file.write_all(text.as_bytes()).expect("write fixture csv");
    path
}

pub fn two_city_csv(n: usize) -> String {
    csv_text(&graded_rows(
        n,
        &[("Leeds", 53.80, -1.55), ("Sheffield", 53.38, -1.47)],
    ))
}
