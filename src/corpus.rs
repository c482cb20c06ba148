//! Corpus generation pipeline
//!
//! Two phases, in order: the dataset index is built and its statements
//! emitted, then corrected publications are linked against that index.
//! The buffer is serialized only when both phases succeed, and output files
//! are published atomically only when both serializations re-parse.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::config::CorpusConfig;
use crate::dataset::build_dataset_index;
use crate::emit::CorpusBuffer;
use crate::error::{CorpusError, Result};
use crate::link::{link_publications, LinkStats};
use crate::loader::{load_datasets, DatasetRecord, PublicationRecord};
use crate::merge::iter_publications;
use crate::serialize::{serialize_corpus, JsonLdContext, SerializedCorpus};

/// Statistics from one corpus build
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorpusStats {
    /// Dataset entities emitted
    pub datasets: usize,
    /// Publication linking counts
    pub publications: LinkStats,
    /// Statements in the Turtle graph
    pub triples: usize,
    /// Statements recovered from the JSON-LD output
    pub jsonld_quads: usize,
}

/// A validated corpus, ready to be written
#[derive(Debug, Clone)]
pub struct CorpusResult {
    pub corpus: SerializedCorpus,
    pub stats: CorpusStats,
}

/// Build and validate a corpus from in-memory records
pub fn build_corpus<I>(
    datasets: &[DatasetRecord],
    publications: I,
    context: &JsonLdContext,
) -> Result<CorpusResult>
where
    I: IntoIterator<Item = PublicationRecord>,
{
    let mut buffer = CorpusBuffer::new();

    let index = build_dataset_index(datasets, &mut buffer)?;
    let links = link_publications(publications, &index, &mut buffer)?;
    let corpus = serialize_corpus(&buffer, context)?;

    let stats = CorpusStats {
        datasets: datasets.len(),
        publications: links,
        triples: corpus.graph.len(),
        jsonld_quads: corpus.jsonld_quads,
    };
    Ok(CorpusResult { corpus, stats })
}

/// Load the JSON-LD context file
pub fn load_context(path: &Path) -> Result<JsonLdContext> {
    let text = fs::read_to_string(path).map_err(|e| CorpusError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    JsonLdContext::parse(&text)
}

/// Stage content in a temporary file beside its target
fn stage(path: &Path, content: &str) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    Ok(tmp)
}

/// Write several files together
///
/// Every file is staged before any target is replaced, so a failure while
/// staging leaves all existing outputs untouched.
pub fn write_all_atomic(outputs: &[(&Path, &str)]) -> Result<()> {
    let staged = outputs
        .iter()
        .map(|(path, content)| stage(path, content).map(|tmp| (tmp, *path)))
        .collect::<Result<Vec<_>>>()?;

    for (tmp, path) in staged {
        tmp.persist(path).map_err(|e| CorpusError::Io(e.error))?;
    }
    Ok(())
}

/// Write a file through a temporary sibling, replacing the target only on success
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    write_all_atomic(&[(path, content)])
}

/// Run the full pipeline described by a configuration
pub fn run(config: &CorpusConfig) -> Result<CorpusStats> {
    let context = load_context(&config.vocab_path)?;
    let datasets = load_datasets(&config.dataset_path)?;
    let stream = iter_publications(config)?;

    let mut corrected = stream.iter();
    let result = build_corpus(&datasets, corrected.by_ref(), &context)?;

    let unmatched = corrected.unmatched_overrides();
    if !unmatched.is_empty() {
        warn!(
            count = unmatched.len(),
            titles = ?unmatched,
            "Override titles matched no publication"
        );
    }

    write_all_atomic(&[
        (config.ttl_path.as_path(), result.corpus.turtle.as_str()),
        (config.jsonld_path.as_path(), result.corpus.jsonld.as_str()),
    ])?;

    let stats = result.stats;
    info!(
        datasets = stats.datasets,
        publications = stats.publications.publications_linked,
        citations = stats.publications.citations,
        triples = stats.triples,
        ttl = %config.ttl_path.display(),
        jsonld = %config.jsonld_path.display(),
        "Corpus written"
    );
    Ok(stats)
}
