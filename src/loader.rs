//! Input records and the JSON files they are read from
//!
//! Every input file is a JSON array of records. Fields the pipeline checks
//! for presence are deserialized as `Option` so a missing value surfaces
//! as a corpus error naming the record, not a bare serde message.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CorpusError, Result};

/// One entry of the dataset list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub id: Option<String>,
    pub provider: Option<String>,
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alt_title: Vec<String>,
}

/// One entry of the publication metadata stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// A manually curated correction for one publication
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub title: String,
    pub manual: ManualCorrection,
}

/// Correction fields of an override; present fields replace the raw value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualCorrection {
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub datasets: Vec<String>,
}

/// Read a JSON array of records from a file
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| CorpusError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let records: Vec<T> = serde_json::from_str(&content).map_err(|e| CorpusError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}

pub fn load_datasets(path: &Path) -> Result<Vec<DatasetRecord>> {
    read_records(path)
}

pub fn load_publications(path: &Path) -> Result<Vec<PublicationRecord>> {
    read_records(path)
}

pub fn load_overrides(path: &Path) -> Result<Vec<OverrideRecord>> {
    read_records(path)
}

/// Expand the override glob into a sorted list of files
pub fn override_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| CorpusError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CorpusError::LoadError {
            path: e.path().display().to_string(),
            reason: e.error().to_string(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
