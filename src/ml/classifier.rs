use crate::error::{PipelineError, Result};
use crate::ml::features::{FeatureMatrix, FeatureSchema, LabelCodec};
use crate::ml::models::{
    ConvergenceReport, ModelMetadata, ModelMetrics, TrainingConfig, TrainingDataset,
};
use linfa::prelude::{Dataset, Fit, Predict};
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2, Axis};
use std::collections::HashMap;
use tracing::{info, warn};

/// Fitted multinomial logistic regression over bin features.
///
/// Carries the feature schema it was fitted on; prediction rejects any
/// feature matrix whose layout differs.
pub struct TrainedClassifier {
    model: MultiFittedLogisticRegression<f64, usize>,
    schema: FeatureSchema,
    /// Class codes seen in the training partition, ascending
    classes: Vec<usize>,
    convergence: ConvergenceReport,
    metadata: ModelMetadata,
}

impl std::fmt::Debug for TrainedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedClassifier")
            .field("schema", &self.schema)
            .field("classes", &self.classes)
            .field("convergence", &self.convergence)
            .finish_non_exhaustive()
    }
}

impl TrainedClassifier {
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn n_features(&self) -> usize {
        self.schema.n_features()
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    pub fn convergence(&self) -> &ConvergenceReport {
        &self.convergence
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Predict class codes for raw feature values.
    ///
    /// Width is checked here; column naming is checked by the predictor.
    pub fn predict_codes(&self, values: &Array2<f64>) -> Result<Vec<usize>> {
        if values.ncols() != self.n_features() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} feature columns", self.n_features()),
                actual: format!("{} feature columns", values.ncols()),
            });
        }
        if values.nrows() == 0 {
            return Ok(Vec::new());
        }

        let predictions: Array1<usize> = self.model.predict(values);
        Ok(predictions.to_vec())
    }
}

/// Train on a seeded holdout split and report holdout metrics.
///
/// Returns the fitted model and the metrics computed on the held-out rows;
/// `metrics.accuracy` is the headline accuracy figure.
pub fn train(
    features: &FeatureMatrix,
    labels: &Array1<usize>,
    codec: &LabelCodec,
    config: &TrainingConfig,
) -> Result<(TrainedClassifier, ModelMetrics)> {
    config.validate()?;

    let dataset = TrainingDataset::new(features.values.clone(), labels.clone())?;
    let (train_set, test_set) = dataset.train_test_split(config.test_size, config.seed)?;

    let classes = train_set.classes();
    if classes.len() < 2 {
        return Err(PipelineError::InsufficientData(format!(
            "training partition holds {} distinct class(es), need at least 2",
            classes.len()
        )));
    }

    info!(
        n_train = train_set.n_samples,
        n_test = test_set.n_samples,
        n_features = train_set.n_features,
        n_classes = classes.len(),
        "Training priority classifier"
    );

    let linfa_dataset = Dataset::new(train_set.features.clone(), train_set.labels.clone());
    let model = MultiLogisticRegression::default()
        .alpha(config.alpha)
        .max_iterations(config.max_iterations)
        .fit(&linfa_dataset)?;

    let gradient_norm = objective_gradient_norm(
        &model,
        &train_set.features,
        &train_set.labels,
        &classes,
        config.alpha,
    );
    let convergence =
        ConvergenceReport::new(gradient_norm, config.gradient_tolerance, config.max_iterations);
    if !convergence.converged {
        warn!(
            gradient_norm = convergence.gradient_norm,
            tolerance = convergence.tolerance,
            max_iterations = convergence.max_iterations,
            "Classifier did not converge within the iteration cap"
        );
    }

    let metadata = ModelMetadata {
        name: "Multinomial Logistic Regression".to_string(),
        trained_at: chrono::Utc::now(),
        n_training_samples: train_set.n_samples,
        n_test_samples: test_set.n_samples,
        n_features: train_set.n_features,
        hyperparameters: [
            ("alpha".to_string(), config.alpha.to_string()),
            ("max_iterations".to_string(), config.max_iterations.to_string()),
            ("test_size".to_string(), config.test_size.to_string()),
            ("seed".to_string(), config.seed.to_string()),
        ]
        .into_iter()
        .collect::<HashMap<_, _>>(),
    };

    let classifier = TrainedClassifier {
        model,
        schema: features.schema.clone(),
        classes,
        convergence,
        metadata,
    };

    let predicted = classifier.predict_codes(&test_set.features)?;
    let class_names: Vec<String> = codec.classes().iter().map(|c| c.to_string()).collect();
    let metrics = ModelMetrics::calculate(&test_set.labels.to_vec(), &predicted, &class_names);

    info!(
        accuracy = metrics.accuracy,
        converged = classifier.convergence.converged,
        "Priority classifier trained - Accuracy: {:.2}%",
        metrics.accuracy * 100.0
    );

    Ok((classifier, metrics))
}

/// Gradient norm of the multinomial objective the solver minimises:
/// `-Σ log p(y|x) + α/2 ‖W‖²`, with an unpenalised intercept.
fn objective_gradient_norm(
    model: &MultiFittedLogisticRegression<f64, usize>,
    x: &Array2<f64>,
    y: &Array1<usize>,
    classes: &[usize],
    alpha: f64,
) -> f64 {
    let weights: Array2<f64> = model.params().to_owned();
    let intercept: Array1<f64> = model.intercept().to_owned();

    let mut probs = x.dot(&weights) + &intercept;
    for mut row in probs.axis_iter_mut(Axis(0)) {
        let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }

    // residual = softmax - one_hot(y)
    for (mut row, label) in probs.axis_iter_mut(Axis(0)).zip(y.iter()) {
        if let Some(col) = classes.iter().position(|c| c == label) {
            row[col] -= 1.0;
        }
    }

    let grad_weights = x.t().dot(&probs) + &(&weights * alpha);
    let grad_intercept = probs.sum_axis(Axis(0));

    let squared = grad_weights.iter().map(|g| g * g).sum::<f64>()
        + grad_intercept.iter().map(|g| g * g).sum::<f64>();
    squared.sqrt()
}
