//! Linked-Data Corpus Builder
//!
//! This library turns curated JSON metadata about datasets and the research
//! publications that use them into a linked-data corpus, written both as
//! Turtle and as JSON-LD.
//!
//! # Overview
//!
//! Corpus generation runs as a two-phase pipeline:
//!
//! 1. Load the dataset list, give each dataset a content-addressed
//!    identifier derived from its provider and title, and build the
//!    [`DatasetIndex`] from source keys to identifiers
//! 2. Apply manually curated overrides to the raw publication stream
//!    (override fields win, dataset links are unioned)
//! 3. Emit every publication that still links to a dataset, with a
//!    `cito:citesAsDataSource` link to each resolved dataset
//! 4. Parse the Turtle text, compact it to JSON-LD with the vocabulary
//!    context, and parse the JSON-LD again before anything is written
//!
//! # Vocabulary
//!
//! Entities live in the corpus namespace ([`CORPUS_NS`]) and use terms
//! from Dublin Core (`dct:`), FOAF (`foaf:`) and CiTO (`cito:`):
//!
//! - `:Dataset` entities carry `foaf:page`, `dct:publisher`, `dct:title`
//!   and any `dct:alternative` titles
//! - `:ResearchPublication` entities add `dct:identifier` (the DOI) and
//!   `:openAccess` (the PDF link)
//!
//! # Usage
//!
//! ```ignore
//! use corpus_ld::{build_dataset_index, link_publications, merge_publications, CorpusBuffer};
//!
//! let mut buffer = CorpusBuffer::new();
//! let index = build_dataset_index(&datasets, &mut buffer)?;
//! let corrected = merge_publications(raw_publications, &overrides);
//! let stats = link_publications(corrected, &index, &mut buffer)?;
//!
//! let corpus = serialize_corpus(&buffer, &context)?;
//! println!("{}", corpus.turtle);
//! ```

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod emit;
pub mod error;
pub mod id;
pub mod link;
pub mod loader;
pub mod merge;
pub mod serialize;
pub mod vocab;

// Re-export main types for convenience
pub use crate::config::CorpusConfig;
pub use crate::corpus::{
    build_corpus, run, write_all_atomic, write_atomic, CorpusResult, CorpusStats,
};
pub use crate::dataset::{build_dataset_index, DatasetIndex};
pub use crate::emit::{CorpusBuffer, StatementBlock};
pub use crate::error::{CorpusError, Result};
pub use crate::id::{entity_id, EntityKind};
pub use crate::link::{link_publications, LinkStats};
pub use crate::loader::{DatasetRecord, ManualCorrection, OverrideRecord, PublicationRecord};
pub use crate::merge::{iter_publications, merge_publications, OverrideIndex};
pub use crate::serialize::{serialize_corpus, Graph, JsonLdContext, SerializedCorpus};
pub use crate::vocab::{CORPUS_BASE, CORPUS_NS, PLACEHOLDER_URL};
