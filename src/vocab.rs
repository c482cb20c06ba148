//! Vocabulary definitions for the corpus
//!
//! Namespaces, the Turtle preamble, and the statement-level helpers shared
//! by the dataset and publication emitters.

/// Base IRI of the corpus vocabulary
pub const CORPUS_BASE: &str = "https://github.com/Coleridge-Initiative/adrf-onto/wiki/Vocabulary";

/// Namespace bound to the empty prefix; entity identifiers live here
pub const CORPUS_NS: &str = "https://github.com/Coleridge-Initiative/adrf-onto/wiki/Vocabulary#";

pub const CITO_NS: &str = "http://purl.org/spar/cito/";
pub const DCT_NS: &str = "http://purl.org/dc/terms/";
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Page URL used for datasets that carry none
pub const PLACEHOLDER_URL: &str = "http://example.com";

/// Prefix declarations that open every Turtle corpus
pub fn preamble() -> String {
    let mut out = format!("@base <{}> .\n\n", CORPUS_BASE);
    for (prefix, ns) in [
        ("", CORPUS_NS),
        ("cito", CITO_NS),
        ("dct", DCT_NS),
        ("foaf", FOAF_NS),
        ("rdf", RDF_NS),
        ("xsd", XSD_NS),
    ] {
        out.push_str(&format!("@prefix {}:\t<{}> .\n", prefix, ns));
    }
    out
}

/// Quote a string as a Turtle literal
pub fn turtle_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Quote a string as an `xsd:anyURI` typed literal
pub fn turtle_uri(s: &str) -> String {
    format!("{}^^xsd:anyURI", turtle_string(s))
}

/// Reference an entity in the corpus namespace
pub fn entity_ref(id: &str) -> String {
    format!(":{}", id)
}

/// Full IRI of an entity in the corpus namespace
pub fn entity_iri(id: &str) -> String {
    format!("{}{}", CORPUS_NS, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_declares_prefixes() {
        let text = preamble();
        assert!(text.starts_with("@base <"));
        assert!(text.contains(&format!("@prefix :\t<{}> .", CORPUS_NS)));
        assert!(text.contains("@prefix cito:"));
        assert!(text.contains("@prefix xsd:"));
    }

    #[test]
    fn test_turtle_string_escapes() {
        assert_eq!(turtle_string("plain"), "\"plain\"");
        assert_eq!(turtle_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(turtle_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(turtle_string("two\nlines"), "\"two\\nlines\"");
        assert_eq!(turtle_string("bell\u{7}"), "\"bell\\u0007\"");
    }

    #[test]
    fn test_entity_helpers() {
        assert_eq!(entity_ref("dataset-ab"), ":dataset-ab");
        assert_eq!(entity_iri("dataset-ab"), format!("{}dataset-ab", CORPUS_NS));
        assert_eq!(turtle_uri("http://x"), "\"http://x\"^^xsd:anyURI");
    }
}
