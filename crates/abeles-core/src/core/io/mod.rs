//! Reading and writing the small text formats the engine exchanges with callers.
//!
//! - [`dataset`] - Column files of Q, reflectivity, uncertainty and resolution
//! - [`model_file`] - Slab models in TOML, as a raw coefficient vector or as tables
//!
//! Instrument formats (NeXus/HDF5, XML) are handled outside this crate.

pub mod dataset;
pub mod model_file;

use crate::core::models::layer_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid value in '{path}' at line {line}: {message}")]
    InvalidValue {
        path: String,
        line: u64,
        message: String,
    },
    #[error("Invalid model in '{path}': {source}")]
    Model { path: String, source: ModelError },
}
