use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::headers::Field;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing column for {field}, expected one of {aliases:?}")]
    MissingColumn { field: Field, aliases: Vec<String> },

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Could not write staged input {path}: {source}")]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Problems confined to one input row. These never abort a batch.
#[derive(Error, Debug, PartialEq)]
pub enum RowError {
    #[error("Missing value for {0}")]
    MissingValue(Field),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: Field, value: String },

    #[error("Season mismatch: '{0}' is neither spring nor fall")]
    Season(String),
}
