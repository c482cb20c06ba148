//! Explicit pipeline configuration
//!
//! Read once from a TOML file and passed to each stage; nothing in the
//! crate consults process-wide settings.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// Default configuration file name
pub const CONFIG_FILE: &str = "corpus.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// JSON list of dataset records
    pub dataset_path: PathBuf,
    /// JSON publication metadata stream
    #[serde(default = "default_stream_path")]
    pub stream_path: PathBuf,
    /// Glob matching the manual override files
    #[serde(default = "default_override_glob")]
    pub override_glob: String,
    /// JSON-LD context (vocabulary term to IRI)
    #[serde(default = "default_vocab_path")]
    pub vocab_path: PathBuf,
    /// Turtle output
    #[serde(default = "default_ttl_path")]
    pub ttl_path: PathBuf,
    /// JSON-LD output
    #[serde(default = "default_jsonld_path")]
    pub jsonld_path: PathBuf,
}

fn default_stream_path() -> PathBuf {
    PathBuf::from("stream.json")
}

fn default_override_glob() -> String {
    "partitions/*.json".to_string()
}

fn default_vocab_path() -> PathBuf {
    PathBuf::from("vocab.json")
}

fn default_ttl_path() -> PathBuf {
    PathBuf::from("corpus.ttl")
}

fn default_jsonld_path() -> PathBuf {
    PathBuf::from("corpus.jsonld")
}

impl CorpusConfig {
    /// Configuration with every optional path at its default
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            stream_path: default_stream_path(),
            override_glob: default_override_glob(),
            vocab_path: default_vocab_path(),
            ttl_path: default_ttl_path(),
            jsonld_path: default_jsonld_path(),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CorpusError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CorpusError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }
}
