//! The resource-writing protocol and the lifecycle state shared by all notations.

use std::collections::BTreeMap;
use std::io::Write;

use rdfexport_core::{
    ConfigErrorKind, Error, RdfField, Result, Value, encode_iri, format_value,
};

pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Class name that marks an anonymous (untyped) resource.
pub const RDF_DESCRIPTION: &str = "rdf:Description";

/// Writer lifecycle.
///
/// Configuration is accepted only while `Configuring`; resources only while
/// `Writing`. Writing the header moves to `Writing`, the footer to `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    Configuring,
    Writing,
    Finished,
}

/// Streams resources in one RDF notation.
///
/// A repeated [`write_header`](ResourceWriter::write_header) is a no-op in every
/// notation.
pub trait ResourceWriter {
    fn phase(&self) -> WriterPhase;

    /// Set the default namespace. Changing it after the header is an invalid-state error.
    fn set_vocabulary(&mut self, uri: &str) -> Result<()>;

    fn add_namespace(&mut self, prefix: &str, uri: &str) -> Result<()>;

    /// Set or clear the base IRI. Without one, subjects are written as fragments (`#segment/id`).
    fn set_base_url(&mut self, uri: Option<&str>) -> Result<()>;

    fn set_empty_string_is_null(&mut self, enabled: bool) -> Result<()>;

    fn write_header(&mut self) -> Result<()>;

    /// Open a resource with subject `segment/id` (or just `segment` when `id` is `None`).
    fn write_start_resource(
        &mut self,
        class: &str,
        segment: &str,
        id: Option<&str>,
    ) -> Result<()>;

    /// Emit one property of the open resource. NULL values are skipped.
    fn write_property(&mut self, field: &RdfField, value: &Value) -> Result<()>;

    fn write_end_resource(&mut self, class: &str) -> Result<()>;

    /// Close the document, writing the header first if it never was, and flush.
    fn write_footer(&mut self) -> Result<()>;

    fn header_written(&self) -> bool {
        self.phase() != WriterPhase::Configuring
    }
}

/// Sink plus configuration and lifecycle, shared by the concrete writers.
#[derive(Debug)]
pub(crate) struct WriterCore<W: Write> {
    out: W,
    phase: WriterPhase,
    pub(crate) vocabulary: Option<String>,
    pub(crate) namespaces: BTreeMap<String, String>,
    pub(crate) base_url: Option<String>,
    empty_string_is_null: bool,
}

impl<W: Write> WriterCore<W> {
    pub(crate) fn new(out: W) -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert("rdf".to_string(), RDF_NAMESPACE.to_string());
        Self {
            out,
            phase: WriterPhase::Configuring,
            vocabulary: None,
            namespaces,
            base_url: None,
            empty_string_is_null: false,
        }
    }

    pub(crate) fn phase(&self) -> WriterPhase {
        self.phase
    }

    fn guard_configuring(&self, operation: &str) -> Result<()> {
        match self.phase {
            WriterPhase::Configuring => Ok(()),
            _ => Err(Error::invalid_state(format!(
                "can't {} after output has started",
                operation
            ))),
        }
    }

    pub(crate) fn set_vocabulary(&mut self, uri: &str) -> Result<()> {
        if self.phase != WriterPhase::Configuring {
            if self.vocabulary.as_deref() == Some(uri) {
                return Ok(());
            }
            return Err(Error::invalid_state(
                "can't set vocabulary after output has started",
            ));
        }
        self.vocabulary = Some(uri.to_string());
        Ok(())
    }

    pub(crate) fn add_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.guard_configuring("add a namespace")?;
        self.namespaces.insert(prefix.to_string(), uri.to_string());
        Ok(())
    }

    pub(crate) fn set_base_url(&mut self, uri: Option<&str>) -> Result<()> {
        self.guard_configuring("set the base URL")?;
        self.base_url = uri.map(str::to_string);
        Ok(())
    }

    pub(crate) fn set_empty_string_is_null(&mut self, enabled: bool) -> Result<()> {
        self.guard_configuring("change empty-string handling")?;
        self.empty_string_is_null = enabled;
        Ok(())
    }

    /// Move to `Writing`. Returns `false` when the header was already written.
    pub(crate) fn begin_header(&mut self) -> Result<bool> {
        match self.phase {
            WriterPhase::Configuring => {
                self.phase = WriterPhase::Writing;
                Ok(true)
            }
            WriterPhase::Writing => Ok(false),
            WriterPhase::Finished => Err(Error::invalid_state("document already finished")),
        }
    }

    pub(crate) fn ensure_writing(&self, operation: &str) -> Result<()> {
        match self.phase {
            WriterPhase::Writing => Ok(()),
            WriterPhase::Configuring => Err(Error::invalid_state(format!(
                "can't {} before the header is written",
                operation
            ))),
            WriterPhase::Finished => Err(Error::invalid_state(format!(
                "can't {} after the footer is written",
                operation
            ))),
        }
    }

    pub(crate) fn finish(&mut self) -> Result<()> {
        self.phase = WriterPhase::Finished;
        self.out.flush()?;
        Ok(())
    }

    pub(crate) fn write_str(&mut self, s: &str) -> Result<()> {
        self.out.write_all(s.as_bytes())?;
        Ok(())
    }

    /// Whether a property value produces no output.
    pub(crate) fn suppresses(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Text(s) => self.empty_string_is_null && s.is_empty(),
            _ => false,
        }
    }

    /// Subject IRI: `#` without a base, then the segment, then `/` and the encoded id.
    pub(crate) fn subject(&self, segment: &str, id: Option<&str>) -> String {
        let mut iri = String::new();
        if self.base_url.is_none() {
            iri.push('#');
        }
        iri.push_str(segment);
        if let Some(id) = id {
            iri.push('/');
            iri.push_str(&encode_iri(id));
        }
        iri
    }

    /// Target IRI of a reference property.
    ///
    /// With a bare `->` the value is the target. With `->segment` the target is
    /// `segment/value`, as a fragment when there is no base and the segment has no colon.
    pub(crate) fn reference_target(&self, field: &RdfField, value: &Value) -> Result<String> {
        let text = format_value(value)?;
        let segment = field.reference_segment().unwrap_or_default();
        if segment.is_empty() {
            return Ok(encode_iri(&text).into_owned());
        }
        let mut iri = String::new();
        if self.base_url.is_none() && !segment.contains(':') {
            iri.push('#');
        }
        iri.push_str(&encode_iri(segment));
        iri.push('/');
        iri.push_str(&encode_iri(&text));
        Ok(iri)
    }

    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    pub(crate) fn get_ref(&self) -> &W {
        &self.out
    }
}

/// Only UTF-8 output is supported; any other encoding label is a configuration error.
pub fn check_encoding(label: &str) -> Result<()> {
    let normalized: String = label
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    if normalized == "utf8" {
        Ok(())
    } else {
        Err(Error::config(
            ConfigErrorKind::UnsupportedEncoding,
            format!("Only UTF-8 is supported! (got {})", label),
        ))
    }
}
