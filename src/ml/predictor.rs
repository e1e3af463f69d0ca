use crate::error::{PipelineError, Result};
use crate::ml::classifier::TrainedClassifier;
use crate::ml::features::{FeatureMatrix, LabelCodec};
use crate::models::{BinRecord, ClassifiedBin, Priority};
use tracing::debug;

/// Predict a priority for every row of `features`.
///
/// There is no train/serve split here: rows the model was trained on are
/// classified like any other.
pub fn predict(
    model: &TrainedClassifier,
    features: &FeatureMatrix,
    codec: &LabelCodec,
) -> Result<Vec<Priority>> {
    if features.schema != *model.schema() {
        return Err(PipelineError::ShapeMismatch {
            expected: model.schema().column_names().join(","),
            actual: features.column_names().join(","),
        });
    }

    if let Some(&max_code) = model.classes().iter().max() {
        if max_code >= codec.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("codec covering class code {}", max_code),
                actual: format!("codec of {} classes", codec.len()),
            });
        }
    }

    let codes = model.predict_codes(&features.values)?;
    let labels = codec.decode_all(&codes)?;

    debug!(n_predictions = labels.len(), "Decoded priority predictions");
    Ok(labels)
}

/// Encode bins with the model's own schema and attach predictions
pub fn classify(
    model: &TrainedClassifier,
    codec: &LabelCodec,
    records: &[BinRecord],
) -> Result<Vec<ClassifiedBin>> {
    let features = model.schema().transform(records)?;
    let labels = predict(model, &features, codec)?;

    Ok(records
        .iter()
        .cloned()
        .zip(labels)
        .map(|(record, label)| ClassifiedBin::new(record, label))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::train;
    use crate::ml::features::{build_features, FeatureSchema};
    use crate::ml::models::TrainingConfig;

    fn bins() -> Vec<BinRecord> {
        (0..30)
            .map(|i| {
                let ratio = (i as f64 + 0.5) / 30.0;
                let priority = if ratio > 0.66 {
                    Priority::High
                } else if ratio > 0.33 {
                    Priority::Medium
                } else {
                    Priority::Low
                };
                BinRecord {
                    bin_id: format!("B{}", i),
                    capacity_kg: 120.0,
                    current_fill_kg: ratio * 120.0,
                    avg_daily_increase_kg: ratio * 8.0,
                    area: if i % 2 == 0 { "North" } else { "South" }.to_string(),
                    city: "York".to_string(),
                    priority,
                    latitude: 53.96,
                    longitude: -1.08,
                    days_to_full: (1.0 - ratio) * 15.0,
                }
            })
            .collect()
    }

    fn fitted() -> (Vec<BinRecord>, FeatureMatrix, LabelCodec, TrainedClassifier) {
        let records = bins();
        let (features, labels, codec) = build_features(&records).unwrap();
        let (model, _) = train(&features, &labels, &codec, &TrainingConfig::default()).unwrap();
        (records, features, codec, model)
    }

    #[test]
    fn test_predict_covers_every_row() {
        let (records, features, codec, model) = fitted();
        let labels = predict(&model, &features, &codec).unwrap();

        assert_eq!(labels.len(), records.len());
        for label in labels {
            assert!(codec.classes().contains(&label));
        }
    }

    #[test]
    fn test_schema_drift_is_shape_mismatch() {
        let (mut records, _, codec, model) = fitted();
        records[0].area = "Harbour".to_string();
        let drifted = FeatureSchema::fit(&records).transform(&records).unwrap();

        assert!(matches!(
            predict(&model, &drifted, &codec),
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_short_codec_is_shape_mismatch() {
        let (_, features, _, model) = fitted();
        let short = LabelCodec::fit(&[Priority::High]);

        assert!(matches!(
            predict(&model, &features, &short),
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_classify_unseen_category() {
        let (records, _, codec, model) = fitted();
        let mut fresh = records[0].clone();
        fresh.area = "Harbour".to_string();
        fresh.city = "Hull".to_string();

        let classified = classify(&model, &codec, &[fresh.clone()]).unwrap();
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].record, fresh);
    }

    #[test]
    fn test_classify_preserves_order() {
        let (records, _, codec, model) = fitted();
        let classified = classify(&model, &codec, &records).unwrap();

        let ids: Vec<&str> = classified.iter().map(|c| c.record.bin_id.as_str()).collect();
        let expected: Vec<&str> = records.iter().map(|r| r.bin_id.as_str()).collect();
        assert_eq!(ids, expected);
    }
}
