//! Turtle and JSON-LD serialization of the corpus
//!
//! The Turtle buffer is parsed into an in-memory [`Graph`], compacted into
//! a JSON-LD document with the vocabulary context, and the JSON-LD text is
//! parsed again. Both parses must succeed for the corpus to be published.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Map, Value};
use sophia::api::prelude::*;
use sophia::api::term::TermKind;
use sophia::jsonld::JsonLdParser;
use tracing::{debug, info, warn};

use crate::emit::CorpusBuffer;
use crate::error::{CorpusError, Result};
use crate::vocab::{RDF_TYPE, XSD_STRING};

/// Subject or object node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    Iri(String),
    Blank(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    Node(Node),
    Literal {
        lexical: String,
        datatype: String,
        language: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Node,
    pub predicate: String,
    pub object: Object,
}

/// Deduplicated statements in first-seen order
#[derive(Debug, Clone, Default)]
pub struct Graph {
    statements: Vec<Statement>,
    seen: HashSet<Statement>,
}

impl Graph {
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.seen.insert(statement.clone()) {
            self.statements.push(statement);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Subjects asserted to have the given `rdf:type`
    pub fn subjects_of_type(&self, class_iri: &str) -> Vec<&Node> {
        self.statements
            .iter()
            .filter(|s| {
                s.predicate == RDF_TYPE
                    && matches!(&s.object, Object::Node(Node::Iri(iri)) if iri == class_iri)
            })
            .map(|s| &s.subject)
            .collect()
    }

    /// Objects of every statement with this subject and predicate
    pub fn objects(&self, subject: &Node, predicate: &str) -> Vec<&Object> {
        self.statements
            .iter()
            .filter(|s| &s.subject == subject && s.predicate == predicate)
            .map(|s| &s.object)
            .collect()
    }
}

fn node_from_term<T: Term>(term: T) -> Option<Node> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term.bnode_id().map(|b| Node::Blank(b.as_str().to_string())),
        _ => None,
    }
}

fn object_from_term<T: Term>(term: T) -> Option<Object> {
    match term.kind() {
        TermKind::Literal => Some(Object::Literal {
            lexical: term.lexical_form()?.to_string(),
            datatype: term
                .datatype()
                .map(|dt| dt.as_str().to_string())
                .unwrap_or_else(|| XSD_STRING.to_string()),
            language: term.language_tag().map(|tag| tag.as_str().to_string()),
        }),
        _ => node_from_term(term).map(Object::Node),
    }
}

/// Parse a Turtle document into a graph
pub fn parse_turtle(text: &str) -> Result<Graph> {
    let mut graph = Graph::default();
    let mut skipped = 0usize;

    sophia::turtle::parser::turtle::parse_str(text)
        .for_each_triple(|t| {
            let parts = (
                node_from_term(t.s()),
                node_from_term(t.p()),
                object_from_term(t.o()),
            );
            let statement = match parts {
                (Some(subject), Some(Node::Iri(predicate)), Some(object)) => Statement {
                    subject,
                    predicate,
                    object,
                },
                _ => {
                    skipped += 1;
                    return;
                }
            };
            graph.insert(statement);
        })
        .map_err(|e| CorpusError::MalformedGraphText(e.to_string()))?;

    if skipped > 0 {
        warn!(skipped, "Ignored triples with unsupported terms");
    }
    debug!(triples = graph.len(), "Parsed Turtle corpus");
    Ok(graph)
}

/// Count the statements in a JSON-LD document
pub fn parse_jsonld(text: &str) -> Result<usize> {
    let parser: JsonLdParser = JsonLdParser::new();
    let mut quads = 0usize;
    parser
        .parse_str(text)
        .for_each_quad(|_| quads += 1)
        .map_err(|e| CorpusError::SerializationRoundTripFailure(e.to_string()))?;
    debug!(quads, "Parsed JSON-LD corpus");
    Ok(quads)
}

// ============================================================================
// JSON-LD context
// ============================================================================

#[derive(Debug, Clone)]
struct TermDefinition {
    iri: String,
    /// Usable as the prefix of a compact IRI
    prefix: bool,
    /// Carries no coercion, container or language, so it can stand in for its IRI as a key
    simple: bool,
}

/// Vocabulary context used to compact the JSON-LD output
#[derive(Debug, Clone)]
pub struct JsonLdContext {
    raw: Map<String, Value>,
    terms: HashMap<String, TermDefinition>,
}

fn ends_with_gen_delim(iri: &str) -> bool {
    iri.ends_with(&['/', '#', ':', '?', '[', ']', '@'][..])
}

impl JsonLdContext {
    pub fn from_value(value: Value) -> Result<Self> {
        // Accept either a bare context or a document wrapping one
        let raw = match value {
            Value::Object(mut obj) => match obj.remove("@context") {
                Some(Value::Object(inner)) => inner,
                Some(other) => {
                    return Err(CorpusError::InvalidContext(format!(
                        "@context must be an object, found {}",
                        other
                    )))
                }
                None => obj,
            },
            other => {
                return Err(CorpusError::InvalidContext(format!(
                    "expected a JSON object, found {}",
                    other
                )))
            }
        };

        let mut terms = HashMap::new();
        for (term, definition) in &raw {
            if term.starts_with('@') {
                continue;
            }
            let parsed = match definition {
                Value::String(iri) if !iri.starts_with('@') => TermDefinition {
                    iri: iri.clone(),
                    prefix: !term.contains(':') && ends_with_gen_delim(iri),
                    simple: true,
                },
                Value::Object(obj) => match obj.get("@id").and_then(Value::as_str) {
                    Some(iri) if !iri.starts_with('@') => TermDefinition {
                        iri: iri.to_string(),
                        prefix: obj.get("@prefix") == Some(&Value::Bool(true)),
                        simple: obj.keys().all(|k| k == "@id" || k == "@prefix"),
                    },
                    _ => continue,
                },
                _ => continue,
            };
            terms.insert(term.clone(), parsed);
        }

        // Term IRIs may themselves be compact IRIs over other terms
        let prefixes: HashMap<String, String> = terms
            .iter()
            .filter(|(_, d)| d.prefix)
            .map(|(t, d)| (t.clone(), d.iri.clone()))
            .collect();
        for definition in terms.values_mut() {
            if let Some((prefix, suffix)) = definition.iri.split_once(':') {
                if !suffix.starts_with("//") {
                    if let Some(ns) = prefixes.get(prefix) {
                        definition.iri = format!("{}{}", ns, suffix);
                    }
                }
            }
        }

        Ok(Self { raw, terms })
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// The context object as written into the output document
    pub fn as_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }

    fn has_default_language(&self) -> bool {
        self.raw.contains_key("@language")
    }

    /// Compact an IRI in `@id` position: compact IRI or full IRI
    pub fn compact_iri(&self, iri: &str) -> String {
        let best = self
            .terms
            .iter()
            .filter(|(_, d)| d.prefix && iri.len() > d.iri.len() && iri.starts_with(&d.iri))
            .filter(|(_, d)| !iri[d.iri.len()..].starts_with("//"))
            .max_by(|(ta, a), (tb, b)| {
                Ord::cmp(&a.iri.len(), &b.iri.len()).then_with(|| Ord::cmp(*tb, *ta))
            });
        match best {
            Some((term, d)) => format!("{}:{}", term, &iri[d.iri.len()..]),
            None => iri.to_string(),
        }
    }

    /// Compact an IRI in vocabulary position (keys and `@type`): term first
    pub fn compact_vocab(&self, iri: &str) -> String {
        let exact = self
            .terms
            .iter()
            .filter(|(_, d)| d.simple && d.iri == iri)
            .map(|(t, _)| t)
            .min();
        match exact {
            Some(term) => term.clone(),
            None => self.compact_iri(iri),
        }
    }
}

// ============================================================================
// Graph to JSON-LD
// ============================================================================

fn node_id(node: &Node, context: &JsonLdContext) -> String {
    match node {
        Node::Iri(iri) => context.compact_iri(iri),
        Node::Blank(id) => format!("_:{}", id),
    }
}

fn object_value(object: &Object, context: &JsonLdContext) -> Value {
    match object {
        Object::Node(node) => json!({"@id": node_id(node, context)}),
        Object::Literal {
            lexical,
            language: Some(language),
            ..
        } => json!({"@value": lexical, "@language": language}),
        Object::Literal {
            lexical, datatype, ..
        } if datatype == XSD_STRING => {
            if context.has_default_language() {
                json!({"@value": lexical})
            } else {
                json!(lexical)
            }
        }
        Object::Literal {
            lexical, datatype, ..
        } => json!({"@value": lexical, "@type": context.compact_vocab(datatype)}),
    }
}

/// Add a value under a key, turning a single value into an array on the second insert
fn push_value(node: &mut Map<String, Value>, key: String, value: Value) {
    match node.get_mut(&key) {
        None => {
            node.insert(key, value);
        }
        Some(Value::Array(values)) => {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        Some(existing) => {
            if *existing != value {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
}

/// Compact a graph into a JSON-LD document with one node object per subject
pub fn to_jsonld(graph: &Graph, context: &JsonLdContext) -> Value {
    let mut order: HashMap<&Node, usize> = HashMap::new();
    let mut nodes: Vec<Map<String, Value>> = Vec::new();

    for statement in graph.iter() {
        let slot = *order.entry(&statement.subject).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_string(), json!(node_id(&statement.subject, context)));
            nodes.push(node);
            nodes.len() - 1
        });
        let node = &mut nodes[slot];

        match &statement.object {
            Object::Node(Node::Iri(class)) if statement.predicate == RDF_TYPE => {
                push_value(node, "@type".to_string(), json!(context.compact_vocab(class)));
            }
            object => {
                let key = context.compact_vocab(&statement.predicate);
                push_value(node, key, object_value(object, context));
            }
        }
    }

    json!({
        "@context": context.as_value(),
        "@graph": nodes.into_iter().map(Value::Object).collect::<Vec<_>>()
    })
}

/// Both serializations of a validated corpus
#[derive(Debug, Clone)]
pub struct SerializedCorpus {
    pub turtle: String,
    pub jsonld: String,
    pub graph: Graph,
    /// Statements recovered by re-parsing the JSON-LD output
    pub jsonld_quads: usize,
}

/// Serialize the buffer to Turtle and JSON-LD, validating both by re-parsing
pub fn serialize_corpus(
    buffer: &CorpusBuffer,
    context: &JsonLdContext,
) -> Result<SerializedCorpus> {
    let turtle = buffer.to_turtle();
    let graph = parse_turtle(&turtle)?;

    let document = to_jsonld(&graph, context);
    let jsonld = serde_json::to_string_pretty(&document)?;
    let jsonld_quads = parse_jsonld(&jsonld)?;

    if jsonld_quads != graph.len() {
        warn!(
            triples = graph.len(),
            quads = jsonld_quads,
            "JSON-LD statement count differs from Turtle"
        );
    }
    info!(
        blocks = buffer.block_count(),
        triples = graph.len(),
        "Corpus serialized"
    );

    Ok(SerializedCorpus {
        turtle,
        jsonld,
        graph,
        jsonld_quads,
    })
}
