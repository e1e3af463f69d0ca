/// Bin priority classification
///
/// This module provides the classification pipeline:
/// - Feature building (fill ratio, daily increase, one-hot area/city)
/// - Label encoding between priorities and class codes
/// - Multinomial logistic regression training on a seeded holdout split
/// - Prediction over the full bin population

pub mod classifier;
pub mod features;
pub mod models;
pub mod predictor;
pub mod service;

pub use classifier::{train, TrainedClassifier};
pub use features::{build_features, FeatureMatrix, FeatureSchema, LabelCodec};
pub use models::{
    ClassMetrics, ConvergenceReport, ModelMetadata, ModelMetrics, TrainingConfig,
    TrainingDataset,
};
pub use predictor::{classify, predict};
pub use service::{PipelineOutput, PriorityPipeline};
