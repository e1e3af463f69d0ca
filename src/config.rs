use crate::ml::TrainingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset location
    #[serde(default)]
    pub data: DataConfig,

    /// Classifier training
    #[serde(default)]
    pub model: TrainingConfig,

    /// Dashboard tables
    #[serde(default)]
    pub report: ReportConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, an optional file and
    /// the environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ));

        // Override with config file if given
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        builder
            // Override with environment variables (prefix: WASTE_PRIORITY)
            .add_source(
                config::Environment::with_prefix("WASTE_PRIORITY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse a TOML document layered over the embedded defaults
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Candidate dataset paths, tried in order
    #[serde(default = "default_candidates")]
    pub candidates: Vec<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rows in the "bins needing collection" table
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

fn default_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("waste_bins_multi.csv"),
        PathBuf::from("waste_bins.csv"),
    ]
}

fn default_top_n() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_code_defaults() {
        let config = Config::from_toml_str("").unwrap();
        let defaults = Config::default();

        assert_eq!(config.data.candidates, defaults.data.candidates);
        assert_eq!(config.model, defaults.model);
        assert_eq!(config.report.top_n, 10);
        assert_eq!(config.observability.log_level, "info");
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_file_overrides() {
        let config = Config::from_toml_str(
            r#"
            [model]
            seed = 7
            max_iterations = 500

            [report]
            top_n = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.model.seed, 7);
        assert_eq!(config.model.max_iterations, 500);
        assert_eq!(config.model.test_size, 0.2);
        assert_eq!(config.report.top_n, 5);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Config::load(Some(Path::new("/nonexistent/waste-priority.toml")));
        assert!(result.is_err());
    }
}
