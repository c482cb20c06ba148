//! Turtle statement emission
//!
//! Statement blocks are built as text and appended, in order, to a shared
//! [`CorpusBuffer`] that starts with the prefix preamble.

use crate::vocab::{entity_ref, preamble, turtle_string, turtle_uri};

/// Ordered, append-only buffer of Turtle text for one corpus
#[derive(Debug, Clone)]
pub struct CorpusBuffer {
    blocks: Vec<String>,
}

impl Default for CorpusBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusBuffer {
    /// A buffer holding only the preamble
    pub fn new() -> Self {
        Self {
            blocks: vec![preamble()],
        }
    }

    pub fn push(&mut self, block: StatementBlock) {
        self.blocks.push(block.finish());
    }

    /// Number of statement blocks, excluding the preamble
    pub fn block_count(&self) -> usize {
        self.blocks.len() - 1
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Concatenate all blocks into one Turtle document
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(block);
            out.push('\n');
        }
        out
    }
}

/// Predicate/object statements sharing one subject
#[derive(Debug, Clone)]
pub struct StatementBlock {
    subject: String,
    statements: Vec<(String, String)>,
}

impl StatementBlock {
    /// Start a block for an entity in the corpus namespace
    pub fn for_entity(id: &str, class: &str) -> Self {
        Self {
            subject: entity_ref(id),
            statements: vec![("rdf:type".to_string(), format!(":{}", class))],
        }
    }

    /// Plain string literal
    pub fn literal(mut self, predicate: &str, value: &str) -> Self {
        self.statements
            .push((predicate.to_string(), turtle_string(value)));
        self
    }

    /// `xsd:anyURI` literal
    pub fn uri(mut self, predicate: &str, value: &str) -> Self {
        self.statements.push((predicate.to_string(), turtle_uri(value)));
        self
    }

    /// One statement with a comma-separated object list of entity references
    pub fn entity_refs<S: AsRef<str>>(mut self, predicate: &str, ids: &[S]) -> Self {
        if ids.is_empty() {
            return self;
        }
        let objects: Vec<String> = ids.iter().map(|id| entity_ref(id.as_ref())).collect();
        self.statements
            .push((predicate.to_string(), objects.join(", ")));
        self
    }

    pub fn finish(self) -> String {
        let mut out = format!("{}\n", self.subject);
        for (predicate, object) in &self.statements {
            out.push_str(&format!("  {} {} ;\n", predicate, object));
        }
        out.push_str(".\n");
        out
    }
}
