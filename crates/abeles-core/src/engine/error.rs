use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::layer_model::ModelError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid model: {source}")]
    InvalidModel {
        #[from]
        source: ModelError,
    },

    #[error("Resolution array has {resolution_len} entries but Q has {q_len}")]
    ShapeMismatch { q_len: usize, resolution_len: usize },

    #[error("Resolution at point {index} must be a finite non-negative FWHM, got {value}")]
    InvalidResolution { index: usize, value: f64 },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}
