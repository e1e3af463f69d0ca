use crate::error::{PipelineError, Result};
use crate::models::{BinRecord, ClassifiedBin, Priority};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use validator::Validate;

/// Columns every dataset must carry
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "bin_id",
    "capacity_kg",
    "current_fill_kg",
    "avg_daily_increase_kg",
    "area",
    "city",
    "priority",
    "latitude",
    "longitude",
    "days_to_full",
];

/// Load every bin from a CSV file
pub fn load_bins<P: AsRef<Path>>(path: P) -> Result<Vec<BinRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let bins = read_bins(file)?;
    info!("Loaded {} bins from {}", bins.len(), path.display());
    Ok(bins)
}

/// Load from the first candidate path that exists.
///
/// Only missing files are skipped; a file that exists but fails to parse is
/// returned as an error rather than falling through to the next candidate.
pub fn load_first_available(candidates: &[PathBuf]) -> Result<(PathBuf, Vec<BinRecord>)> {
    for candidate in candidates {
        if !candidate.exists() {
            debug!("Dataset candidate {} not found", candidate.display());
            continue;
        }
        let bins = load_bins(candidate)?;
        return Ok((candidate.clone(), bins));
    }

    let names: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
    Err(PipelineError::DataUnavailable(format!(
        "none of [{}] found",
        names.join(", ")
    )))
}

/// Parse bins from any CSV reader
pub fn read_bins<R: io::Read>(reader: R) -> Result<Vec<BinRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut bins = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        bins.push(columns.parse_row(&row, idx + 1)?);
    }

    Ok(bins)
}

/// Write bins with their predicted priority as CSV
pub fn write_classified<W: io::Write>(writer: W, bins: &[ClassifiedBin]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
    header.push("predicted_priority");
    writer.write_record(&header)?;

    for bin in bins {
        let r = &bin.record;
        writer.write_record(&[
            r.bin_id.clone(),
            r.capacity_kg.to_string(),
            r.current_fill_kg.to_string(),
            r.avg_daily_increase_kg.to_string(),
            r.area.clone(),
            r.city.clone(),
            r.priority.to_string(),
            r.latitude.to_string(),
            r.longitude.to_string(),
            r.days_to_full.to_string(),
            bin.predicted_priority.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Header name -> position for the required columns
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let mut positions = HashMap::new();
        for column in REQUIRED_COLUMNS {
            let pos = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| PipelineError::MissingColumn(column.to_string()))?;
            positions.insert(column, pos);
        }
        Ok(Self { positions })
    }

    fn text<'r>(&self, row: &'r csv::StringRecord, column: &str, line: usize) -> Result<&'r str> {
        let value = self
            .positions
            .get(column)
            .and_then(|&pos| row.get(pos))
            .unwrap_or("");

        if value.is_empty() {
            return Err(PipelineError::InvalidRecord(format!(
                "row {}: missing value for {}",
                line, column
            )));
        }
        Ok(value)
    }

    fn number(&self, row: &csv::StringRecord, column: &str, line: usize) -> Result<f64> {
        let raw = self.text(row, column, line)?;
        raw.parse::<f64>().map_err(|_| {
            PipelineError::InvalidRecord(format!(
                "row {}: {} is not a number ({:?})",
                line, column, raw
            ))
        })
    }

    fn parse_row(&self, row: &csv::StringRecord, line: usize) -> Result<BinRecord> {
        let priority_raw = self.text(row, "priority", line)?;
        let priority = Priority::from_str(priority_raw).map_err(|_| {
            PipelineError::InvalidRecord(format!(
                "row {}: unknown priority {:?}",
                line, priority_raw
            ))
        })?;

        let bin = BinRecord {
            bin_id: self.text(row, "bin_id", line)?.to_string(),
            capacity_kg: self.number(row, "capacity_kg", line)?,
            current_fill_kg: self.number(row, "current_fill_kg", line)?,
            avg_daily_increase_kg: self.number(row, "avg_daily_increase_kg", line)?,
            area: self.text(row, "area", line)?.to_string(),
            city: self.text(row, "city", line)?.to_string(),
            priority,
            latitude: self.number(row, "latitude", line)?,
            longitude: self.number(row, "longitude", line)?,
            days_to_full: self.number(row, "days_to_full", line)?,
        };

        bin.validate()?;
        Ok(bin)
    }
}
