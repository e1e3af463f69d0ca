//! Dashboard data: city selection, map layer, and the display tables

use crate::analytics::aggregation::{summarize, summary_rows, SummaryRow};
use crate::analytics::filter::BinFilter;
use crate::analytics::ranking::{top_urgent, TopBinRow};
use crate::error::{PipelineError, Result};
use crate::ml::PipelineOutput;
use crate::models::{BinRecord, ClassifiedBin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct cities, sorted
pub fn cities<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a BinRecord>,
{
    records
        .into_iter()
        .map(|r| r.city.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// The city a dashboard view is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySelection {
    /// Display name of the selection
    pub label: String,

    pub filter: BinFilter,
}

impl CitySelection {
    /// Pick the city to show.
    ///
    /// With several cities the requested one is used, defaulting to the
    /// first in sorted order. A single-city dataset is shown whole.
    pub fn resolve(bins: &[ClassifiedBin], requested: Option<&str>) -> Result<Self> {
        let available = cities(bins.iter().map(|b| &b.record));

        if let Some(name) = requested {
            if !available.iter().any(|c| c == name) {
                return Err(PipelineError::Configuration(format!(
                    "unknown city {:?}, available: {}",
                    name,
                    available.join(", ")
                )));
            }
        }

        match available.len() {
            0 => Ok(Self {
                label: "All".to_string(),
                filter: BinFilter::All,
            }),
            1 => Ok(Self {
                label: available[0].clone(),
                filter: BinFilter::All,
            }),
            _ => {
                let name = requested
                    .map(str::to_string)
                    .unwrap_or_else(|| available[0].clone());
                Ok(Self {
                    label: name.clone(),
                    filter: BinFilter::City(name),
                })
            }
        }
    }
}

/// Map centre as plain lat/lon averages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCentre {
    pub latitude: f64,
    pub longitude: f64,
}

/// Centroid of the given bins, `None` if there are none
pub fn map_centre<'a, I>(bins: I) -> Option<MapCentre>
where
    I: IntoIterator<Item = &'a ClassifiedBin>,
{
    let (mut lat, mut lon, mut n) = (0.0, 0.0, 0usize);
    for bin in bins {
        lat += bin.record.latitude;
        lon += bin.record.longitude;
        n += 1;
    }

    if n == 0 {
        return None;
    }
    Some(MapCentre {
        latitude: lat / n as f64,
        longitude: lon / n as f64,
    })
}

/// One colour-coded map marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub bin_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub colour: String,
    pub popup: String,
}

impl From<&ClassifiedBin> for MapMarker {
    fn from(bin: &ClassifiedBin) -> Self {
        let r = &bin.record;
        Self {
            bin_id: r.bin_id.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
            colour: bin.predicted_priority.colour().to_string(),
            popup: format!(
                "Bin ID: {}\nArea: {}\nDays to Full: {}\nPredicted Priority: {}",
                r.bin_id, r.area, r.days_to_full, bin.predicted_priority
            ),
        }
    }
}

/// Markers for the given bins, in input order
pub fn markers<'a, I>(bins: I) -> Vec<MapMarker>
where
    I: IntoIterator<Item = &'a ClassifiedBin>,
{
    bins.into_iter().map(MapMarker::from).collect()
}

/// Everything the display layer renders for one selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub selection: String,

    /// Holdout accuracy (0.0 - 1.0)
    pub accuracy: f64,

    pub converged: bool,

    pub top_bins: Vec<TopBinRow>,

    pub summary: Vec<SummaryRow>,

    pub centre: Option<MapCentre>,

    pub markers: Vec<MapMarker>,

    pub generated_at: DateTime<Utc>,
}

impl DashboardView {
    pub fn build(output: &PipelineOutput, selection: &CitySelection, top_n: usize) -> Self {
        let predicate = selection.filter.as_predicate();
        let scoped: Vec<&ClassifiedBin> = output.bins.iter().filter(|&b| predicate(b)).collect();

        let top_bins = top_urgent(&output.bins, top_n, &predicate)
            .into_iter()
            .map(TopBinRow::from)
            .collect();
        let summary = summary_rows(&summarize(&output.bins, &predicate));

        Self {
            selection: selection.label.clone(),
            accuracy: output.accuracy(),
            converged: output.convergence.converged,
            top_bins,
            summary,
            centre: map_centre(scoped.iter().copied()),
            markers: markers(scoped.iter().copied()),
            generated_at: Utc::now(),
        }
    }

    /// Accuracy the way the dashboard header shows it
    pub fn accuracy_display(&self) -> String {
        format!("{:.2}", self.accuracy)
    }
}
