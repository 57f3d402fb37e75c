//! Turtle writer.

use std::io::Write;

use rdfexport_core::{RdfField, Result, Value, expand_datatype, format_value};

use crate::writer::{RDF_DESCRIPTION, ResourceWriter, WriterCore, WriterPhase};

const PROPERTY_SEPARATOR: &str = " ;\n    ";

/// Writes resources as Turtle statements.
///
/// Untyped resources (`rdf:Description`) have no `a` clause, so their subject is
/// held back until the first property. An untyped resource without properties
/// produces no output at all.
#[derive(Debug)]
pub struct TurtleWriter<W: Write> {
    core: WriterCore<W>,
    pending_subject: Option<String>,
    open: bool,
}

impl<W: Write> TurtleWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            core: WriterCore::new(out),
            pending_subject: None,
            open: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        self.core.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.core.into_inner()
    }

    fn header_text(&self) -> String {
        let mut head = String::new();
        for (prefix, uri) in &self.core.namespaces {
            head.push_str(&format!("@prefix {}: <{}> .\n", prefix, uri));
        }
        if let Some(vocabulary) = &self.core.vocabulary {
            head.push_str(&format!("@prefix : <{}> .\n", vocabulary));
        }
        if let Some(base) = &self.core.base_url {
            head.push_str(&format!("@base <{}> .\n", base));
        }
        head.push('\n');
        head
    }

    /// A literal datatype as a Turtle term.
    ///
    /// `xsd:` types and absolute IRIs are written in angle brackets; a name whose
    /// prefix is declared stays a prefixed name.
    fn datatype_term(&self, datatype: &str) -> String {
        let declared = datatype.split_once(':').is_some_and(|(prefix, _)| {
            prefix != "xsd" && self.core.namespaces.contains_key(prefix)
        });
        if declared && !datatype.contains("://") {
            datatype.to_string()
        } else {
            format!("<{}>", expand_datatype(datatype))
        }
    }
}

/// A class or predicate name as a Turtle term.
fn term(name: &str) -> String {
    if name.starts_with("http") {
        format!("<{}>", name)
    } else if name.contains(':') {
        name.to_string()
    } else {
        format!(":{}", name)
    }
}

fn quote_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

impl<W: Write> ResourceWriter for TurtleWriter<W> {
    fn phase(&self) -> WriterPhase {
        self.core.phase()
    }

    fn set_vocabulary(&mut self, uri: &str) -> Result<()> {
        self.core.set_vocabulary(uri)
    }

    fn add_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.core.add_namespace(prefix, uri)
    }

    fn set_base_url(&mut self, uri: Option<&str>) -> Result<()> {
        self.core.set_base_url(uri)
    }

    fn set_empty_string_is_null(&mut self, enabled: bool) -> Result<()> {
        self.core.set_empty_string_is_null(enabled)
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.core.begin_header()? {
            return Ok(());
        }
        let head = self.header_text();
        self.core.write_str(&head)
    }

    fn write_start_resource(
        &mut self,
        class: &str,
        segment: &str,
        id: Option<&str>,
    ) -> Result<()> {
        self.core.ensure_writing("start a resource")?;
        let subject = format!("<{}>", self.core.subject(segment, id));
        if class == RDF_DESCRIPTION {
            self.pending_subject = Some(subject);
            self.open = false;
            Ok(())
        } else {
            self.pending_subject = None;
            self.open = true;
            self.core
                .write_str(&format!("{} a {}", subject, term(class)))
        }
    }

    fn write_property(&mut self, field: &RdfField, value: &Value) -> Result<()> {
        self.core.ensure_writing("write a property")?;
        if self.core.suppresses(value) {
            return Ok(());
        }

        let object = if field.is_reference() {
            format!("<{}>", self.core.reference_target(field, value)?)
        } else {
            let literal = quote_literal(&format_value(value)?);
            if field.is_typed() {
                format!("{}^^{}", literal, self.datatype_term(&field.datatype))
            } else if field.has_language() {
                format!("{}@{}", literal, field.language)
            } else {
                literal
            }
        };

        let lead = match self.pending_subject.take() {
            Some(subject) => {
                self.open = true;
                format!("{} ", subject)
            }
            None => PROPERTY_SEPARATOR.to_string(),
        };
        self.core
            .write_str(&format!("{}{} {}", lead, term(&field.name), object))
    }

    fn write_end_resource(&mut self, _class: &str) -> Result<()> {
        self.core.ensure_writing("end a resource")?;
        self.pending_subject = None;
        if std::mem::take(&mut self.open) {
            self.core.write_str(" .\n")?;
        }
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        self.write_header()?;
        self.core.finish()
    }
}
