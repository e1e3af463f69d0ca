//! Waste bin collection priority.
//!
//! Turns per-bin sensor records into a trained priority classifier, labels
//! every bin with a predicted priority (High, Medium, Low), and derives the
//! views a collection dashboard renders: the bins closest to full, counts per
//! priority, and a colour-coded map layer.
//!
//! The pipeline runs left to right, passing the fitted model and label codec
//! explicitly as values:
//!
//! records → [`ml::build_features`] → [`ml::train`] → [`ml::predict`] →
//! [`analytics::top_urgent`] / [`analytics::summarize`]
//!
//! # Modules
//!
//! - [`models`]: bin records and priorities
//! - [`data`]: CSV loading and export
//! - [`ml`]: features, training, prediction and the end-to-end pipeline
//! - [`analytics`]: ranking, aggregation and dashboard views
//! - [`config`]: layered configuration
//! - [`error`]: error taxonomy

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod ml;
pub mod models;

pub use error::{PipelineError, Result};
