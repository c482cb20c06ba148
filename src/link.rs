//! Publication entities and their citation links
//!
//! Runs after the dataset index is complete. Each corrected publication
//! that still links to at least one dataset becomes an entity whose
//! `cito:citesAsDataSource` statement points at the resolved dataset
//! identifiers.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::dataset::DatasetIndex;
use crate::emit::{CorpusBuffer, StatementBlock};
use crate::error::{CorpusError, Result};
use crate::id::EntityKind;
use crate::loader::PublicationRecord;

/// Counts from one linking pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkStats {
    /// Corrected records consumed
    pub publications_read: usize,
    /// Publication entities emitted
    pub publications_linked: usize,
    /// Records dropped for having no dataset links
    pub publications_skipped: usize,
    /// Citation links emitted across all publications
    pub citations: usize,
}

fn required<'a>(
    record: &'a PublicationRecord,
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| CorpusError::MissingPublicationField {
            title: record.title.clone(),
            field,
        })
}

/// Resolve dataset keys to identifiers, keeping first-seen order
pub fn resolve_citations(
    record: &PublicationRecord,
    index: &DatasetIndex,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(record.datasets.len());
    for key in &record.datasets {
        let id = index
            .get(key)
            .ok_or_else(|| CorpusError::UnresolvedDatasetReference {
                title: record.title.clone(),
                key: key.clone(),
            })?;
        if seen.insert(id) {
            resolved.push(id.to_string());
        }
    }
    Ok(resolved)
}

/// A publication entity ready to be appended to the corpus
#[derive(Debug, Clone)]
pub struct LinkedPublication {
    pub id: String,
    /// Resolved dataset identifiers
    pub citations: Vec<String>,
    pub block: StatementBlock,
}

/// Entity for one corrected publication, or `None` when it cites nothing
pub fn publication_block(
    record: &PublicationRecord,
    index: &DatasetIndex,
) -> Result<Option<LinkedPublication>> {
    if record.datasets.is_empty() {
        return Ok(None);
    }

    let publisher = required(record, &record.publisher, "publisher")?;
    let url = required(record, &record.url, "url")?;
    let doi = required(record, &record.doi, "doi")?;
    let pdf = required(record, &record.pdf, "pdf")?;
    let citations = resolve_citations(record, index)?;

    let id = EntityKind::Publication.id_for(&[publisher, record.title.as_str()]);
    let block = StatementBlock::for_entity(&id, "ResearchPublication")
        .uri("foaf:page", url)
        .literal("dct:publisher", publisher)
        .literal("dct:title", &record.title)
        .literal("dct:identifier", doi)
        .uri(":openAccess", pdf)
        .entity_refs("cito:citesAsDataSource", &citations);

    Ok(Some(LinkedPublication {
        id,
        citations,
        block,
    }))
}

/// Emit every linked publication, in sequence order
pub fn link_publications<I>(
    records: I,
    index: &DatasetIndex,
    buffer: &mut CorpusBuffer,
) -> Result<LinkStats>
where
    I: IntoIterator<Item = PublicationRecord>,
{
    let mut stats = LinkStats::default();

    for record in records {
        stats.publications_read += 1;
        match publication_block(&record, index)? {
            Some(linked) => {
                debug!(title = %record.title, id = %linked.id, "Linked publication");
                stats.publications_linked += 1;
                stats.citations += linked.citations.len();
                buffer.push(linked.block);
            }
            None => {
                debug!(title = %record.title, "No linked datasets, skipping");
                stats.publications_skipped += 1;
            }
        }
    }

    info!(
        read = stats.publications_read,
        linked = stats.publications_linked,
        skipped = stats.publications_skipped,
        citations = stats.citations,
        "Publications linked"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build_dataset_index;
    use crate::loader::DatasetRecord;

    fn index() -> DatasetIndex {
        let records = [("d1", "ACME", "Census"), ("d2", "Bureau", "Survey")]
            .into_iter()
            .map(|(id, provider, title)| DatasetRecord {
                id: Some(id.to_string()),
                provider: Some(provider.to_string()),
                title: Some(title.to_string()),
                ..Default::default()
            })
            .collect::<Vec<_>>();
        build_dataset_index(&records, &mut CorpusBuffer::new()).unwrap()
    }

    fn study(datasets: &[&str]) -> PublicationRecord {
        PublicationRecord {
            title: "Study".to_string(),
            publisher: Some("Lab".to_string()),
            url: Some("http://x".to_string()),
            doi: Some("10.1/x".to_string()),
            pdf: Some("http://x.pdf".to_string()),
            datasets: datasets.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_linked_publication_block() {
        let index = index();
        let mut buffer = CorpusBuffer::new();
        let stats = link_publications(vec![study(&["d1"])], &index, &mut buffer).unwrap();

        assert_eq!(stats.publications_linked, 1);
        assert_eq!(stats.citations, 1);

        let text = &buffer.blocks()[1];
        let pub_id = EntityKind::Publication.id_for(&["Lab", "Study"]);
        assert!(text.starts_with(&format!(":{}\n", pub_id)));
        assert!(text.contains("rdf:type :ResearchPublication"));
        assert!(text.contains("dct:identifier \"10.1/x\""));
        assert!(text.contains(":openAccess \"http://x.pdf\"^^xsd:anyURI"));
        assert!(text.contains(&format!(
            "cito:citesAsDataSource :{} ;",
            index.get("d1").unwrap()
        )));
    }

    #[test]
    fn test_empty_links_emit_nothing() {
        let mut buffer = CorpusBuffer::new();
        let stats = link_publications(vec![study(&[])], &index(), &mut buffer).unwrap();
        assert_eq!(stats.publications_skipped, 1);
        assert_eq!(stats.publications_linked, 0);
        assert_eq!(buffer.block_count(), 0);
    }

    #[test]
    fn test_unresolved_reference_is_fatal() {
        let err = link_publications(
            vec![study(&["d1", "missing"])],
            &index(),
            &mut CorpusBuffer::new(),
        )
        .unwrap_err();
        match err {
            CorpusError::UnresolvedDatasetReference { title, key } => {
                assert_eq!(title, "Study");
                assert_eq!(key, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_identifiers_cited_once() {
        let index = index();
        let citations = resolve_citations(&study(&["d2", "d1", "d2"]), &index).unwrap();
        assert_eq!(
            citations,
            vec![index.get("d2").unwrap().to_string(), index.get("d1").unwrap().to_string()]
        );
    }

    #[test]
    fn test_missing_doi_is_reported() {
        let mut record = study(&["d1"]);
        record.doi = None;
        assert!(matches!(
            publication_block(&record, &index()),
            Err(CorpusError::MissingPublicationField { field: "doi", .. })
        ));
    }

    #[test]
    fn test_order_preserved() {
        let mut second = study(&["d2"]);
        second.title = "Follow-up".to_string();
        let mut buffer = CorpusBuffer::new();
        link_publications(vec![study(&["d1"]), second], &index(), &mut buffer).unwrap();

        let first_id = EntityKind::Publication.id_for(&["Lab", "Study"]);
        let second_id = EntityKind::Publication.id_for(&["Lab", "Follow-up"]);
        assert!(buffer.blocks()[1].starts_with(&format!(":{}", first_id)));
        assert!(buffer.blocks()[2].starts_with(&format!(":{}", second_id)));
    }
}
