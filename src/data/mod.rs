//! Dataset loading and export
//!
//! The input is a CSV file with one row per bin. Loading is all-or-nothing:
//! either every row parses and validates, or an error is returned and no
//! records are produced.

mod loader;

pub use loader::{load_bins, load_first_available, read_bins, write_classified, REQUIRED_COLUMNS};
