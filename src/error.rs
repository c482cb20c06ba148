//! Error types for corpus generation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Dataset '{dataset}' is missing required identity field '{field}'")]
    MissingIdentityField { dataset: String, field: &'static str },

    #[error("Publication '{title}' cites unknown dataset '{key}'")]
    UnresolvedDatasetReference { title: String, key: String },

    #[error("Publication '{title}' is missing required field '{field}'")]
    MissingPublicationField { title: String, field: &'static str },

    #[error("Malformed Turtle corpus: {0}")]
    MalformedGraphText(String),

    #[error("JSON-LD output failed to re-parse: {0}")]
    SerializationRoundTripFailure(String),

    #[error("Invalid JSON-LD context: {0}")]
    InvalidContext(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Invalid override pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
