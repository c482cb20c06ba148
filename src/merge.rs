//! Override merge for publication metadata
//!
//! Manually curated corrections are indexed by publication title and
//! applied to the raw metadata stream: correction fields replace the raw
//! value, dataset links are unioned without duplicates.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::CorpusConfig;
use crate::error::Result;
use crate::loader::{
    load_overrides, load_publications, override_files, ManualCorrection, OverrideRecord,
    PublicationRecord,
};

/// Curated corrections keyed by publication title
#[derive(Debug, Clone, Default)]
pub struct OverrideIndex {
    by_title: HashMap<String, ManualCorrection>,
}

impl OverrideIndex {
    /// Index override records; a later record for the same title replaces an earlier one
    pub fn from_records(records: impl IntoIterator<Item = OverrideRecord>) -> Self {
        let mut index = Self::default();
        index.extend(records);
        index
    }

    /// Load and index every file, in order; later files win per title
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut index = Self::default();
        for path in paths {
            let records = load_overrides(path.as_ref())?;
            debug!(
                path = %path.as_ref().display(),
                count = records.len(),
                "Loaded override file"
            );
            index.extend(records);
        }
        info!(
            files = paths.len(),
            titles = index.len(),
            "Override index built"
        );
        Ok(index)
    }

    fn extend(&mut self, records: impl IntoIterator<Item = OverrideRecord>) {
        for record in records {
            self.by_title.insert(record.title, record.manual);
        }
    }

    pub fn get(&self, title: &str) -> Option<&ManualCorrection> {
        self.by_title.get(title)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.by_title.keys().map(String::as_str)
    }
}

/// Apply one correction to a raw publication record
pub fn apply_override(record: &mut PublicationRecord, correction: &ManualCorrection) {
    for (field, value) in [
        (&mut record.doi, &correction.doi),
        (&mut record.pdf, &correction.pdf),
        (&mut record.publisher, &correction.publisher),
        (&mut record.url, &correction.url),
    ] {
        if let Some(v) = value {
            *field = Some(v.clone());
        }
    }

    let mut present: HashSet<String> = record.datasets.iter().cloned().collect();
    for key in &correction.datasets {
        if present.insert(key.clone()) {
            record.datasets.push(key.clone());
        }
    }
}

/// Lazy sequence of corrected publication records
pub struct CorrectedPublications<'a> {
    raw: std::vec::IntoIter<PublicationRecord>,
    overrides: &'a OverrideIndex,
    applied: HashSet<String>,
}

impl<'a> CorrectedPublications<'a> {
    /// Override titles that have not matched any record yielded so far
    pub fn unmatched_overrides(&self) -> Vec<&'a str> {
        let mut titles: Vec<&str> = self
            .overrides
            .titles()
            .filter(|t| !self.applied.contains(*t))
            .collect();
        titles.sort_unstable();
        titles
    }
}

impl Iterator for CorrectedPublications<'_> {
    type Item = PublicationRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = self.raw.next()?;
        if let Some(correction) = self.overrides.get(&record.title) {
            apply_override(&mut record, correction);
            self.applied.insert(record.title.clone());
            debug!(title = %record.title, "Applied override");
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

/// Merge the raw stream with an already built override index
pub fn merge_publications(
    raw: Vec<PublicationRecord>,
    overrides: &OverrideIndex,
) -> CorrectedPublications<'_> {
    CorrectedPublications {
        raw: raw.into_iter(),
        overrides,
        applied: HashSet::new(),
    }
}

/// Corrected publications read from configured files
///
/// Owns its override index; every call rebuilds it from disk.
pub struct PublicationStream {
    raw: Vec<PublicationRecord>,
    overrides: OverrideIndex,
}

impl PublicationStream {
    pub fn iter(&self) -> CorrectedPublications<'_> {
        merge_publications(self.raw.clone(), &self.overrides)
    }
}

/// Load all override files, then the raw stream, ready for merging
pub fn iter_publications(config: &CorpusConfig) -> Result<PublicationStream> {
    let files = override_files(&config.override_glob)?;
    if files.is_empty() {
        warn!(pattern = %config.override_glob, "No override files matched");
    }
    let overrides = OverrideIndex::from_files(&files)?;
    let raw = load_publications(&config.stream_path)?;
    Ok(PublicationStream { raw, overrides })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn publication(title: &str, doi: &str, datasets: &[&str]) -> PublicationRecord {
        PublicationRecord {
            title: title.to_string(),
            publisher: Some("Lab".to_string()),
            url: Some("http://x".to_string()),
            doi: Some(doi.to_string()),
            pdf: Some("http://x.pdf".to_string()),
            datasets: datasets.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn override_for(title: &str, manual: serde_json::Value) -> OverrideRecord {
        serde_json::from_value(json!({"title": title, "manual": manual})).unwrap()
    }

    #[test]
    fn test_override_field_wins() {
        let index = OverrideIndex::from_records([override_for("T", json!({"doi": "D2"}))]);
        let merged: Vec<_> = merge_publications(vec![publication("T", "D1", &["a"])], &index).collect();

        assert_eq!(merged[0].doi.as_deref(), Some("D2"));
        // untouched fields survive
        assert_eq!(merged[0].url.as_deref(), Some("http://x"));
        assert_eq!(merged[0].publisher.as_deref(), Some("Lab"));
    }

    #[test]
    fn test_override_replaces_all_designated_fields() {
        let index = OverrideIndex::from_records([override_for(
            "T",
            json!({"doi": "D2", "pdf": "http://y.pdf", "publisher": "Press", "url": "http://y"}),
        )]);
        let merged: Vec<_> = merge_publications(vec![publication("T", "D1", &[])], &index).collect();

        assert_eq!(merged[0].doi.as_deref(), Some("D2"));
        assert_eq!(merged[0].pdf.as_deref(), Some("http://y.pdf"));
        assert_eq!(merged[0].publisher.as_deref(), Some("Press"));
        assert_eq!(merged[0].url.as_deref(), Some("http://y"));
    }

    #[test]
    fn test_dataset_union_without_duplicates() {
        let index = OverrideIndex::from_records([override_for("T", json!({"datasets": ["b", "c"]}))]);
        let merged: Vec<_> =
            merge_publications(vec![publication("T", "D1", &["a", "b"])], &index).collect();

        let links: HashSet<&str> = merged[0].datasets.iter().map(String::as_str).collect();
        assert_eq!(links, HashSet::from(["a", "b", "c"]));
        assert_eq!(merged[0].datasets.len(), 3);
    }

    #[test]
    fn test_union_into_absent_list() {
        let raw: PublicationRecord = serde_json::from_value(json!({"title": "T"})).unwrap();
        let index = OverrideIndex::from_records([override_for("T", json!({"datasets": ["a"]}))]);
        let merged: Vec<_> = merge_publications(vec![raw], &index).collect();
        assert_eq!(merged[0].datasets, vec!["a"]);
    }

    #[test]
    fn test_no_override_passes_through() {
        let index = OverrideIndex::from_records([override_for("Other", json!({"doi": "D2"}))]);
        let raw = publication("T", "D1", &["a"]);
        let merged: Vec<_> = merge_publications(vec![raw.clone()], &index).collect();
        assert_eq!(merged, vec![raw]);
    }

    #[test]
    fn test_later_override_wins() {
        let index = OverrideIndex::from_records([
            override_for("T", json!({"doi": "D2"})),
            override_for("T", json!({"doi": "D3"})),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("T").unwrap().doi.as_deref(), Some("D3"));
    }

    #[test]
    fn test_unmatched_overrides() {
        let index = OverrideIndex::from_records([
            override_for("T", json!({"doi": "D2"})),
            override_for("Ghost", json!({"doi": "D9"})),
        ]);
        let mut merged = merge_publications(vec![publication("T", "D1", &[])], &index);
        assert_eq!(merged.by_ref().count(), 1);
        assert_eq!(merged.unmatched_overrides(), vec!["Ghost"]);
    }

    #[test]
    fn test_from_files_later_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");
        std::fs::write(
            &first,
            json!([{"title": "T", "manual": {"doi": "D2", "datasets": ["a"]}}]).to_string(),
        )
        .unwrap();
        std::fs::write(
            &second,
            json!([{"title": "T", "manual": {"doi": "D3"}}]).to_string(),
        )
        .unwrap();

        let index = OverrideIndex::from_files(&[first, second]).unwrap();
        let correction = index.get("T").unwrap();
        assert_eq!(correction.doi.as_deref(), Some("D3"));
        assert!(correction.datasets.is_empty());
    }
}
