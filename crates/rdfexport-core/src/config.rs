//! The string-keyed configuration map that drives discovery and export.
//!
//! Keys understood by the exporter:
//!
//! | Key | Meaning |
//! |---|---|
//! | `tables` | whitespace-separated list of table segments to export |
//! | `vocabulary` | default (unprefixed) namespace |
//! | `baseurl` | base IRI; when absent subjects are fragment identifiers |
//! | `emptystringisnull` | suppress empty-string literals when `true` |
//! | `xmlns.<prefix>` | namespace declaration |
//! | `objectproperty.<column>` | make a column a reference to segment `<value>` |
//! | `datatype.<sqltype>` | override the RDF datatype of a SQL type |
//! | `<table>.class`, `<table>.vocabulary` | per-table class and vocabulary |
//! | `<table>.query[N]`, `<table>.key[N]` | queries and their single-record key column |
//! | `<table>.attributetable[N]`, `<table>.attributekey[N]` | attribute-table queries |
//! | `sqldialect.<dialect>.*` | quoting, key concatenation and skip-list per dialect |

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::field::REFERENCE_MARKER;

pub const TABLES: &str = "tables";
pub const VOCABULARY: &str = "vocabulary";
pub const BASE_URL: &str = "baseurl";
pub const EMPTY_STRING_IS_NULL: &str = "emptystringisnull";
pub const NAMESPACE_PREFIX: &str = "xmlns.";
pub const OBJECT_PROPERTY_PREFIX: &str = "objectproperty.";
pub const DATATYPE_PREFIX: &str = "datatype.";

/// Ordered configuration map.
///
/// Serializes as a flat JSON object so a configuration can be stored or shipped
/// alongside an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    entries: BTreeMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All entries whose key starts with `prefix`, in lexicographic key order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries under `prefix` with the prefix stripped from the key.
    pub fn stripped<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.with_prefix(prefix)
            .map(move |(k, v)| (&k[prefix.len()..], v))
    }

    pub fn vocabulary(&self) -> Option<&str> {
        self.get(VOCABULARY)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.get(BASE_URL)
    }

    /// `emptystringisnull`, false unless the value is `true` in any case.
    pub fn empty_string_is_null(&self) -> bool {
        self.get(EMPTY_STRING_IS_NULL)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// The configured table segments.
    pub fn tables(&self) -> Vec<String> {
        self.get(TABLES)
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Namespace declarations from `xmlns.<prefix>` keys.
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stripped(NAMESPACE_PREFIX)
    }

    /// Column name to reference datatype (`->segment`) from `objectproperty.<column>` keys.
    pub fn object_properties(&self) -> BTreeMap<String, String> {
        self.stripped(OBJECT_PROPERTY_PREFIX)
            .map(|(name, segment)| (name.to_string(), format!("{REFERENCE_MARKER}{segment}")))
            .collect()
    }

    /// SQL type name to RDF datatype overrides from `datatype.<name>` keys.
    pub fn datatype_overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stripped(DATATYPE_PREFIX)
    }

    /// RDF class for a table: `<table>.class`, else the name with only its first letter upper-cased.
    pub fn table_class(&self, table: &str) -> String {
        if let Some(class) = self.get(&format!("{table}.class")) {
            return class.to_string();
        }
        let mut chars = table.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Vocabulary in effect for a table: `<table>.vocabulary`, else the global one.
    pub fn table_vocabulary(&self, table: &str) -> Option<&str> {
        self.get(&format!("{table}.vocabulary"))
            .or_else(|| self.vocabulary())
    }

    /// Make sure a vocabulary is configured, deriving one from the base URL if needed.
    ///
    /// The derived value is `<baseurl>properties/`, or `#properties/` without a base URL.
    pub fn ensure_vocabulary(&mut self) -> &str {
        if !self.contains(VOCABULARY) {
            let derived = match self.base_url() {
                Some(base) => format!("{base}properties/"),
                None => "#properties/".to_string(),
            };
            tracing::debug!(vocabulary = %derived, "No vocabulary configured, using default");
            self.set(VOCABULARY, derived);
        }
        self.get(VOCABULARY).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Config::new();
        config.extend(iter);
        config
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Config {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl IntoIterator for Config {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
