use crate::error::Result;
use crate::ml::classifier::{train, TrainedClassifier};
use crate::ml::features::{build_features, FeatureSchema, LabelCodec};
use crate::ml::models::{ConvergenceReport, ModelMetrics, TrainingConfig};
use crate::ml::predictor::predict;
use crate::models::{BinRecord, ClassifiedBin};
use tracing::{info, instrument};

/// Everything one pipeline run produces
#[derive(Debug)]
pub struct PipelineOutput {
    /// Input bins with their predicted priority, in input order
    pub bins: Vec<ClassifiedBin>,

    /// Holdout metrics
    pub metrics: ModelMetrics,

    pub convergence: ConvergenceReport,

    pub schema: FeatureSchema,

    pub codec: LabelCodec,

    pub model: TrainedClassifier,
}

impl PipelineOutput {
    /// Holdout accuracy
    pub fn accuracy(&self) -> f64 {
        self.metrics.accuracy
    }
}

/// Feature building, training and prediction as one all-or-nothing run.
///
/// Nothing is cached between runs; each call retrains from scratch.
#[derive(Debug, Clone, Default)]
pub struct PriorityPipeline {
    config: TrainingConfig,
}

impl PriorityPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[instrument(skip_all, fields(n_records = records.len()))]
    pub fn run(&self, records: &[BinRecord]) -> Result<PipelineOutput> {
        let (features, labels, codec) = build_features(records)?;
        let (model, metrics) = train(&features, &labels, &codec, &self.config)?;
        let predictions = predict(&model, &features, &codec)?;

        let bins: Vec<ClassifiedBin> = records
            .iter()
            .cloned()
            .zip(predictions)
            .map(|(record, label)| ClassifiedBin::new(record, label))
            .collect();

        info!(
            n_bins = bins.len(),
            accuracy = metrics.accuracy,
            "Pipeline run completed"
        );

        Ok(PipelineOutput {
            bins,
            metrics,
            convergence: model.convergence().clone(),
            schema: features.schema,
            codec,
            model,
        })
    }
}
