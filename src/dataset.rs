//! Dataset entities and the identifier index
//!
//! Datasets are loaded first: each record gets a content-addressed
//! identifier and a statement block, and the resulting [`DatasetIndex`]
//! is what publications resolve their citations through.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::emit::{CorpusBuffer, StatementBlock};
use crate::error::{CorpusError, Result};
use crate::id::EntityKind;
use crate::loader::DatasetRecord;
use crate::vocab::PLACEHOLDER_URL;

/// Immutable mapping from source dataset key to generated identifier
#[derive(Debug, Clone, Default)]
pub struct DatasetIndex {
    ids: HashMap<String, String>,
}

impl DatasetIndex {
    /// Generated identifier for a source key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.ids.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Identity fields of a validated dataset record
struct DatasetIdentity<'a> {
    key: &'a str,
    provider: &'a str,
    title: &'a str,
}

fn identity(record: &DatasetRecord, position: usize) -> Result<DatasetIdentity<'_>> {
    let key = record
        .id
        .as_deref()
        .ok_or_else(|| CorpusError::MissingIdentityField {
            dataset: format!("#{}", position),
            field: "id",
        })?;
    let provider = record
        .provider
        .as_deref()
        .ok_or_else(|| CorpusError::MissingIdentityField {
            dataset: key.to_string(),
            field: "provider",
        })?;
    let title = record
        .title
        .as_deref()
        .ok_or_else(|| CorpusError::MissingIdentityField {
            dataset: key.to_string(),
            field: "title",
        })?;
    Ok(DatasetIdentity {
        key,
        provider,
        title,
    })
}

/// Statement block for one dataset entity
pub fn dataset_block(
    id: &str,
    provider: &str,
    title: &str,
    url: &str,
    alt_titles: &[String],
) -> StatementBlock {
    let mut block = StatementBlock::for_entity(id, "Dataset")
        .uri("foaf:page", url)
        .literal("dct:publisher", provider)
        .literal("dct:title", title);
    for alt in alt_titles {
        block = block.literal("dct:alternative", alt);
    }
    block
}

/// Assign identifiers to all datasets and emit their statement blocks
///
/// Every record is validated before anything is appended, so a missing
/// identity field leaves the buffer untouched.
pub fn build_dataset_index(
    records: &[DatasetRecord],
    buffer: &mut CorpusBuffer,
) -> Result<DatasetIndex> {
    let identities = records
        .iter()
        .enumerate()
        .map(|(i, r)| identity(r, i))
        .collect::<Result<Vec<_>>>()?;

    let mut ids = HashMap::with_capacity(records.len());

    for (record, ident) in records.iter().zip(identities) {
        let id = EntityKind::Dataset.id_for(&[ident.provider, ident.title]);

        let url = match record.url.as_deref() {
            Some(url) => url,
            None => {
                debug!(dataset = ident.key, "No page URL, using placeholder");
                PLACEHOLDER_URL
            }
        };

        buffer.push(dataset_block(
            &id,
            ident.provider,
            ident.title,
            url,
            &record.alt_title,
        ));

        if let Some(previous) = ids.insert(ident.key.to_string(), id) {
            warn!(
                dataset = ident.key,
                previous = %previous,
                "Duplicate dataset key, later record wins"
            );
        }
    }

    let index = DatasetIndex { ids };
    info!(datasets = records.len(), keys = index.len(), "Dataset index built");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, provider: &str, title: &str) -> DatasetRecord {
        DatasetRecord {
            id: Some(id.to_string()),
            provider: Some(provider.to_string()),
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_index_keyed_by_source_key() {
        let mut buffer = CorpusBuffer::new();
        let index = build_dataset_index(&[record("d1", "ACME", "Census")], &mut buffer).unwrap();

        let expected = EntityKind::Dataset.id_for(&["ACME", "Census"]);
        assert_eq!(index.get("d1"), Some(expected.as_str()));
        assert_eq!(index.get(&expected), None);
        assert_eq!(buffer.block_count(), 1);
    }

    #[test]
    fn test_ids_independent_of_order() {
        let a = record("d1", "ACME", "Census");
        let b = record("d2", "Bureau", "Survey");

        let forward = build_dataset_index(&[a.clone(), b.clone()], &mut CorpusBuffer::new()).unwrap();
        let reverse = build_dataset_index(&[b, a], &mut CorpusBuffer::new()).unwrap();

        assert_eq!(forward.get("d1"), reverse.get("d1"));
        assert_eq!(forward.get("d2"), reverse.get("d2"));
        assert_ne!(forward.get("d1"), forward.get("d2"));
    }

    #[test]
    fn test_same_identity_same_id() {
        let index = build_dataset_index(
            &[record("d1", "ACME", "Census"), record("d2", "ACME", "Census")],
            &mut CorpusBuffer::new(),
        )
        .unwrap();
        assert_eq!(index.get("d1"), index.get("d2"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_key_later_record_wins() {
        let mut buffer = CorpusBuffer::new();
        let index = build_dataset_index(
            &[record("d1", "ACME", "Census"), record("d1", "Bureau", "Survey")],
            &mut buffer,
        )
        .unwrap();
        let later = EntityKind::Dataset.id_for(&["Bureau", "Survey"]);
        assert_eq!(index.get("d1"), Some(later.as_str()));
        assert_eq!(index.len(), 1);
        assert_eq!(buffer.block_count(), 2);
    }

    #[test]
    fn test_placeholder_url_and_alt_titles() {
        let mut rec = record("d1", "ACME", "Census");
        rec.alt_title = vec!["Decennial Census".to_string(), "US Census".to_string()];

        let mut buffer = CorpusBuffer::new();
        build_dataset_index(&[rec], &mut buffer).unwrap();

        let text = &buffer.blocks()[1];
        assert!(text.contains("foaf:page \"http://example.com\"^^xsd:anyURI"));
        assert!(text.contains("dct:alternative \"Decennial Census\""));
        assert!(text.contains("dct:alternative \"US Census\""));
    }

    #[test]
    fn test_missing_identity_field_is_fatal() {
        let mut bad = record("d2", "ACME", "Survey");
        bad.provider = None;

        let mut buffer = CorpusBuffer::new();
        let err = build_dataset_index(&[record("d1", "ACME", "Census"), bad], &mut buffer)
            .unwrap_err();

        match err {
            CorpusError::MissingIdentityField { dataset, field } => {
                assert_eq!(dataset, "d2");
                assert_eq!(field, "provider");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(buffer.block_count(), 0);
    }

    #[test]
    fn test_missing_title_and_key() {
        let mut no_title = record("d1", "ACME", "Census");
        no_title.title = None;
        assert!(matches!(
            build_dataset_index(&[no_title], &mut CorpusBuffer::new()),
            Err(CorpusError::MissingIdentityField { field: "title", .. })
        ));

        let mut no_key = record("d1", "ACME", "Census");
        no_key.id = None;
        assert!(matches!(
            build_dataset_index(&[no_key], &mut CorpusBuffer::new()),
            Err(CorpusError::MissingIdentityField { field: "id", .. })
        ));
    }
}
