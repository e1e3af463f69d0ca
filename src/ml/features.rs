use crate::error::{PipelineError, Result};
use crate::models::{BinRecord, Priority};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Numeric columns that precede the one-hot blocks
const NUMERIC_COLUMNS: [&str; 2] = ["fill_ratio", "avg_daily_increase_kg"];

/// Fitted column layout for bin features.
///
/// Category lists are sorted, so two schemas fitted over the same category
/// sets always produce the same column order. Categories not seen at fit time
/// encode as all-zero indicator blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// Distinct areas, sorted
    areas: Vec<String>,

    /// Distinct cities, sorted
    cities: Vec<String>,
}

impl FeatureSchema {
    /// Fit the schema on a batch of bins
    pub fn fit(records: &[BinRecord]) -> Self {
        let areas: BTreeSet<&str> = records.iter().map(|r| r.area.as_str()).collect();
        let cities: BTreeSet<&str> = records.iter().map(|r| r.city.as_str()).collect();

        Self {
            areas: areas.into_iter().map(str::to_string).collect(),
            cities: cities.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn areas(&self) -> &[String] {
        &self.areas
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Total number of feature columns
    pub fn n_features(&self) -> usize {
        NUMERIC_COLUMNS.len() + self.areas.len() + self.cities.len()
    }

    /// Column names in matrix order
    pub fn column_names(&self) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.areas.iter().map(|a| format!("area_{}", a)))
            .chain(self.cities.iter().map(|c| format!("city_{}", c)))
            .collect()
    }

    /// Encode one bin into a feature row
    pub fn encode(&self, record: &BinRecord) -> Result<Vec<f64>> {
        let fill_ratio = record.fill_ratio()?;
        if !record.avg_daily_increase_kg.is_finite() {
            return Err(PipelineError::InvalidRecord(format!(
                "bin {} has non-finite daily increase {}",
                record.bin_id, record.avg_daily_increase_kg
            )));
        }

        let mut row = vec![0.0; self.n_features()];
        row[0] = fill_ratio;
        row[1] = record.avg_daily_increase_kg;

        let mut offset = NUMERIC_COLUMNS.len();
        if let Ok(idx) = self.areas.binary_search(&record.area) {
            row[offset + idx] = 1.0;
        }
        offset += self.areas.len();
        if let Ok(idx) = self.cities.binary_search(&record.city) {
            row[offset + idx] = 1.0;
        }

        Ok(row)
    }

    /// Encode a batch of bins, preserving input order
    pub fn transform(&self, records: &[BinRecord]) -> Result<FeatureMatrix> {
        let n_features = self.n_features();
        let mut values = Array2::zeros((records.len(), n_features));

        for (i, record) in records.iter().enumerate() {
            let row = self.encode(record)?;
            for (j, v) in row.into_iter().enumerate() {
                values[[i, j]] = v;
            }
        }

        Ok(FeatureMatrix {
            values,
            schema: self.clone(),
        })
    }
}

/// Feature table aligned row-for-row with the records it was built from
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Values (n_samples × n_features)
    pub values: Array2<f64>,

    /// Schema that produced the columns
    pub schema: FeatureSchema,
}

impl FeatureMatrix {
    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.column_names()
    }
}

/// Bijection between priority labels and integer class codes.
///
/// Codes follow lexical order of the label strings, so a codec fitted on all
/// three priorities maps High=0, Low=1, Medium=2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    classes: Vec<Priority>,
}

impl LabelCodec {
    /// Fit on the labels present in the data
    pub fn fit(labels: &[Priority]) -> Self {
        let mut classes: Vec<Priority> = labels.to_vec();
        classes.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        classes.dedup();
        Self { classes }
    }

    /// Classes in code order
    pub fn classes(&self) -> &[Priority] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn encode(&self, label: Priority) -> Result<usize> {
        self.classes
            .iter()
            .position(|&c| c == label)
            .ok_or_else(|| {
                PipelineError::InvalidRecord(format!("label {} was not seen when fitting", label))
            })
    }

    pub fn decode(&self, code: usize) -> Result<Priority> {
        self.classes.get(code).copied().ok_or_else(|| {
            PipelineError::Internal(format!(
                "class code {} outside codec of {} classes",
                code,
                self.classes.len()
            ))
        })
    }

    pub fn encode_all(&self, labels: &[Priority]) -> Result<Array1<usize>> {
        labels
            .iter()
            .map(|&l| self.encode(l))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }

    pub fn decode_all(&self, codes: &[usize]) -> Result<Vec<Priority>> {
        codes.iter().map(|&c| self.decode(c)).collect()
    }
}

/// Build the feature matrix, encoded labels and label codec for a batch of bins
pub fn build_features(records: &[BinRecord]) -> Result<(FeatureMatrix, Array1<usize>, LabelCodec)> {
    if records.is_empty() {
        return Err(PipelineError::InsufficientData(
            "cannot build features from an empty dataset".to_string(),
        ));
    }

    let schema = FeatureSchema::fit(records);
    let features = schema.transform(records)?;

    let labels: Vec<Priority> = records.iter().map(|r| r.priority).collect();
    let codec = LabelCodec::fit(&labels);
    let encoded = codec.encode_all(&labels)?;

    tracing::debug!(
        n_samples = features.n_samples(),
        n_features = features.n_features(),
        n_classes = codec.len(),
        "Built feature matrix"
    );

    Ok((features, encoded, codec))
}
