//! String escaping for markup text and IRI components.
//!
//! Two independent escapers are applied at different points of serialization:
//! [`escape_xml`] for literal text placed in element or attribute content, and
//! [`encode_iri`] for any value embedded in a resource identifier or reference.

use std::borrow::Cow;

fn xml_escape_for(c: char) -> Option<&'static str> {
    match c {
        '\'' => Some("&#39;"),
        '"' => Some("&quot;"),
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    }
}

// '+' is escaped because URL decoders commonly read it as a space.
fn iri_escape_for(c: char) -> Option<&'static str> {
    match c {
        ' ' => Some("%20"),
        '{' => Some("%7B"),
        '}' => Some("%7D"),
        '<' => Some("%3C"),
        '>' => Some("%3E"),
        '"' => Some("%22"),
        '|' => Some("%7C"),
        '\\' => Some("%5C"),
        '^' => Some("%5E"),
        '`' => Some("%60"),
        '+' => Some("%2B"),
        _ => None,
    }
}

fn escape_with(s: &str, table: fn(char) -> Option<&'static str>) -> Cow<'_, str> {
    let Some(first) = s.find(|c| table(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 8);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match table(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escape `& < > " '` for inclusion in markup text or attribute values.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    escape_with(s, xml_escape_for)
}

/// Percent-encode the characters that are not allowed in an IRI path segment.
///
/// Everything else, including `/`, `:` and non-ASCII characters, passes through.
pub fn encode_iri(s: &str) -> Cow<'_, str> {
    escape_with(s, iri_escape_for)
}

/// The segment name for a table: lower-cased, then IRI-encoded.
pub fn encode_segment(table: &str) -> String {
    encode_iri(&table.to_lowercase()).into_owned()
}
