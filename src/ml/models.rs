use crate::error::{PipelineError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Classifier training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out for accuracy (0.0 - 1.0)
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Seed for the train/test shuffle
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Solver iteration cap
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,

    /// L2 regularisation strength
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Gradient norm above which the fit is reported as not converged
    #[serde(default = "default_gradient_tolerance")]
    pub gradient_tolerance: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            seed: default_seed(),
            max_iterations: default_max_iterations(),
            alpha: default_alpha(),
            gradient_tolerance: default_gradient_tolerance(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::Configuration(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.max_iterations == 0 {
            return Err(PipelineError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.alpha >= 0.0) {
            return Err(PipelineError::Configuration(format!(
                "alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

fn default_test_size() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_max_iterations() -> u64 {
    200
}

fn default_alpha() -> f64 {
    1.0
}

fn default_gradient_tolerance() -> f64 {
    1e-3
}

/// Encoded training data
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    /// Feature matrix (n_samples × n_features)
    pub features: Array2<f64>,

    /// Class codes
    pub labels: Array1<usize>,

    /// Number of samples
    pub n_samples: usize,

    /// Number of features
    pub n_features: usize,
}

impl TrainingDataset {
    pub fn new(features: Array2<f64>, labels: Array1<usize>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(PipelineError::InsufficientData(format!(
                "{} feature rows but {} labels",
                features.nrows(),
                labels.len()
            )));
        }

        let (n_samples, n_features) = features.dim();
        Ok(Self {
            features,
            labels,
            n_samples,
            n_features,
        })
    }

    /// Distinct class codes, ascending
    pub fn classes(&self) -> Vec<usize> {
        let mut classes = self.labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Shuffled train/test split.
    ///
    /// The test partition holds `ceil(test_size * n)` rows. The same seed
    /// always yields the same partitions.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(TrainingDataset, TrainingDataset)> {
        let n_test = (self.n_samples as f64 * test_size).ceil() as usize;
        if n_test == 0 || n_test >= self.n_samples {
            return Err(PipelineError::InsufficientData(format!(
                "{} rows cannot form both a training and a test partition",
                self.n_samples
            )));
        }
        let n_train = self.n_samples - n_test;

        let mut indices: Vec<usize> = (0..self.n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (train_idx, test_idx) = indices.split_at(n_train);
        Ok((self.subset(train_idx), self.subset(test_idx)))
    }

    fn subset(&self, indices: &[usize]) -> TrainingDataset {
        let features = self.features.select(Axis(0), indices);
        let labels = self.labels.select(Axis(0), indices);
        TrainingDataset {
            n_samples: indices.len(),
            n_features: self.n_features,
            features,
            labels,
        }
    }
}

/// Holdout evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Accuracy
    pub accuracy: f64,

    /// Macro-averaged precision
    pub precision: f64,

    /// Macro-averaged recall
    pub recall: f64,

    /// Macro-averaged F1 score
    pub f1_score: f64,

    /// Number of evaluated rows
    pub n_evaluated: usize,

    /// Per-class metrics, keyed by priority name
    pub per_class_metrics: BTreeMap<String, ClassMetrics>,
}

/// Per-class evaluation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

impl ModelMetrics {
    pub fn new() -> Self {
        Self {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
            n_evaluated: 0,
            per_class_metrics: BTreeMap::new(),
        }
    }

    /// Compare true and predicted codes; `class_names[code]` names each class.
    ///
    /// Codes outside `class_names` count towards accuracy only.
    pub fn calculate(y_true: &[usize], y_pred: &[usize], class_names: &[String]) -> Self {
        let n_samples = y_true.len().min(y_pred.len());
        if n_samples == 0 {
            return Self::new();
        }

        let k = class_names.len();
        // confusion[t][p]: rows are true classes, columns predicted
        let mut confusion = vec![vec![0usize; k]; k];
        let mut correct = 0;
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t == p {
                correct += 1;
            }
            if t < k && p < k {
                confusion[t][p] += 1;
            }
        }

        let ratio = |num: usize, den: usize| if den > 0 { num as f64 / den as f64 } else { 0.0 };

        let mut per_class = BTreeMap::new();
        for (class, name) in class_names.iter().enumerate() {
            let tp = confusion[class][class];
            let predicted = (0..k).map(|t| confusion[t][class]).sum::<usize>();
            let support = y_true.iter().take(n_samples).filter(|&&t| t == class).count();

            let precision = ratio(tp, predicted);
            let recall = ratio(tp, support);
            let f1_score = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            per_class.insert(
                name.clone(),
                ClassMetrics {
                    precision,
                    recall,
                    f1_score,
                    support,
                },
            );
        }

        let macro_avg = |f: fn(&ClassMetrics) -> f64| {
            per_class.values().map(f).sum::<f64>() / k.max(1) as f64
        };

        Self {
            accuracy: ratio(correct, n_samples),
            precision: macro_avg(|m| m.precision),
            recall: macro_avg(|m| m.recall),
            f1_score: macro_avg(|m| m.f1_score),
            n_evaluated: n_samples,
            per_class_metrics: per_class,
        }
    }
}

impl Default for ModelMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Solver convergence diagnostics.
///
/// Not converging is a soft condition: the model is still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Gradient norm of the regularised objective at the fitted parameters
    pub gradient_norm: f64,

    /// Threshold used to judge convergence
    pub tolerance: f64,

    /// Iteration cap the solver ran under
    pub max_iterations: u64,

    pub converged: bool,
}

impl ConvergenceReport {
    pub fn new(gradient_norm: f64, tolerance: f64, max_iterations: u64) -> Self {
        Self {
            gradient_norm,
            tolerance,
            max_iterations,
            converged: gradient_norm.is_finite() && gradient_norm <= tolerance,
        }
    }
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,

    /// Training timestamp
    pub trained_at: chrono::DateTime<chrono::Utc>,

    /// Number of training samples
    pub n_training_samples: usize,

    /// Number of held-out samples
    pub n_test_samples: usize,

    /// Number of features
    pub n_features: usize,

    /// Hyperparameters
    pub hyperparameters: HashMap<String, String>,
}
