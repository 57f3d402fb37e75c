//! Column-label mini-language.
//!
//! A result column label names the output property and may carry one suffix:
//!
//! - `name->` or `name->segment`: object reference
//! - `name^^datatype`: typed literal
//! - `name@lang`: language-tagged literal (an empty tag means plain literal)
//!
//! Markers are located positionally and are not escapable. When a label holds
//! more than one marker, `->` wins over `^^`, which wins over `@`.

use rdfexport_core::{REFERENCE_MARKER, RdfField};

const DATATYPE_MARKER: &str = "^^";
const LANGUAGE_MARKER: char = '@';

/// Parse a column label into a property descriptor.
///
/// `fallback_datatype` is used only when the label carries no marker.
pub fn parse_label(label: &str, fallback_datatype: &str) -> RdfField {
    if let Some(p) = label.find(REFERENCE_MARKER) {
        return RdfField::new(&label[..p], &label[p..], "");
    }
    if let Some(p) = label.find(DATATYPE_MARKER) {
        return RdfField::new(&label[..p], &label[p + DATATYPE_MARKER.len()..], "");
    }
    if let Some(p) = label.find(LANGUAGE_MARKER) {
        return RdfField::new(&label[..p], "", &label[p + 1..]);
    }
    RdfField::new(label, fallback_datatype, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(field: &RdfField) -> (&str, &str, &str) {
        (&field.name, &field.datatype, &field.language)
    }

    #[test]
    fn test_reference_keeps_marker() {
        let f = parse_label("hasRef->export", "");
        assert_eq!(parts(&f), ("hasRef", "->export", ""));

        let f = parse_label("hasRef->", "xsd:string");
        assert_eq!(parts(&f), ("hasRef", "->", ""));
    }

    #[test]
    fn test_datatype() {
        let f = parse_label("price^^xsd:decimal", "");
        assert_eq!(parts(&f), ("price", "xsd:decimal", ""));
    }

    #[test]
    fn test_language_forces_plain_datatype() {
        let f = parse_label("title@de", "xsd:string");
        assert_eq!(parts(&f), ("title", "", "de"));

        let f = parse_label("rdfs:label@de", "");
        assert_eq!(parts(&f), ("rdfs:label", "", "de"));
    }

    #[test]
    fn test_empty_language_marker() {
        let f = parse_label("name@", "xsd:integer");
        assert_eq!(parts(&f), ("name", "", ""));
    }

    #[test]
    fn test_fallback_only_without_marker() {
        let f = parse_label("title", "xsd:string");
        assert_eq!(parts(&f), ("title", "xsd:string", ""));

        let f = parse_label("rdfs:label", "");
        assert_eq!(parts(&f), ("rdfs:label", "", ""));
    }

    #[test]
    fn test_precedence() {
        // A reference wins even when a datatype marker appears first.
        let f = parse_label("a^^b->c", "");
        assert_eq!(parts(&f), ("a^^b", "->c", ""));

        let f = parse_label("mail@home^^xsd:string", "");
        assert_eq!(parts(&f), ("mail@home", "xsd:string", ""));

        let f = parse_label("x^^y@z", "");
        assert_eq!(parts(&f), ("x", "y@z", ""));
        assert!(f.is_typed());
    }
}
