//! Resolved property descriptors.

use serde::{Deserialize, Serialize};

/// Marker that starts an object-reference datatype.
pub const REFERENCE_MARKER: &str = "->";

/// A resolved output property: name, datatype and language.
///
/// `datatype` is one of:
/// - `""` for a plain literal,
/// - `"->"` or `"->segment"` for an object reference,
/// - a prefixed (`xsd:int`) or absolute datatype IRI for a typed literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RdfField {
    pub name: String,
    pub datatype: String,
    pub language: String,
}

impl RdfField {
    pub fn new(
        name: impl Into<String>,
        datatype: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            datatype: datatype.into(),
            language: language.into(),
        }
    }

    /// A plain literal property.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, "", "")
    }

    pub fn is_reference(&self) -> bool {
        self.datatype.starts_with(REFERENCE_MARKER)
    }

    /// The target segment of a reference field; empty when the value itself is the target.
    pub fn reference_segment(&self) -> Option<&str> {
        self.datatype.strip_prefix(REFERENCE_MARKER)
    }

    /// Whether the field carries a literal datatype (not a reference, not plain).
    pub fn is_typed(&self) -> bool {
        !self.datatype.is_empty() && !self.is_reference()
    }

    pub fn has_language(&self) -> bool {
        !self.language.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_segment() {
        assert_eq!(RdfField::new("hasRef", "->", "").reference_segment(), Some(""));
        assert_eq!(
            RdfField::new("hasRef", "->countries", "").reference_segment(),
            Some("countries")
        );
        assert_eq!(RdfField::new("n", "xsd:int", "").reference_segment(), None);
    }

    #[test]
    fn test_field_kinds() {
        let typed = RdfField::new("price", "xsd:decimal", "");
        assert!(typed.is_typed());
        assert!(!typed.is_reference());

        let tagged = RdfField::new("title", "", "de");
        assert!(!tagged.is_typed());
        assert!(tagged.has_language());

        assert!(!RdfField::plain("name").is_typed());
    }
}
