//! Ranked and aggregated views over classified bins
//!
//! Everything here is computed fresh from the current classified bin set and
//! never mutates it.
//!
//! - **Ranking**: the bins closest to full, stable on ties
//! - **Aggregation**: counts per predicted priority in canonical order
//! - **Dashboard**: city selection, map centroid and colour-coded markers
//!
//! # Example
//!
//! ```no_run
//! use waste_priority::analytics::{top_urgent, summarize, BinFilter};
//! use waste_priority::data::load_bins;
//! use waste_priority::ml::PriorityPipeline;
//!
//! let records = load_bins("waste_bins.csv")?;
//! let output = PriorityPipeline::default().run(&records)?;
//!
//! let leeds = BinFilter::City("Leeds".to_string());
//! let urgent = top_urgent(&output.bins, 10, leeds.as_predicate());
//! let counts = summarize(&output.bins, leeds.as_predicate());
//! println!("{} urgent bins, {:?}", urgent.len(), counts);
//! # Ok::<(), waste_priority::PipelineError>(())
//! ```

mod aggregation;
mod dashboard;
mod filter;
mod ranking;

pub use aggregation::{summarize, summary_rows, SummaryRow};
pub use dashboard::{cities, map_centre, markers, CitySelection, DashboardView, MapCentre, MapMarker};
pub use filter::BinFilter;
pub use ranking::{top_urgent, TopBinRow};
