//! RDF/XML writer.

use std::io::Write;

use rdfexport_core::{RdfField, Result, Value, escape_xml, expand_datatype, format_value};

use crate::writer::{ResourceWriter, WriterCore, WriterPhase};

/// Writes resources as RDF/XML, one property element per line.
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    core: WriterCore<W>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            core: WriterCore::new(out),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.core.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.core.into_inner()
    }

    fn header_text(&self) -> String {
        let mut head = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rdf:RDF");
        for (prefix, uri) in &self.core.namespaces {
            head.push_str(&format!(" xmlns:{}=\"{}\"\n", prefix, escape_xml(uri)));
        }
        if let Some(vocabulary) = &self.core.vocabulary {
            head.push_str(&format!(" xmlns=\"{}\"", escape_xml(vocabulary)));
        }
        if let Some(base) = &self.core.base_url {
            head.push_str(&format!(" xml:base=\"{}\"", escape_xml(base)));
        }
        head.push_str(">\n\n");
        head
    }
}

impl<W: Write> ResourceWriter for XmlWriter<W> {
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
        let subject = self.core.subject(segment, id);
        self.core
            .write_str(&format!("<{} rdf:about=\"{}\">\n", class, escape_xml(&subject)))
    }

    fn write_property(&mut self, field: &RdfField, value: &Value) -> Result<()> {
        self.core.ensure_writing("write a property")?;
        if self.core.suppresses(value) {
            return Ok(());
        }

        let name = &field.name;
        let line = if field.is_reference() {
            let target = self.core.reference_target(field, value)?;
            format!(" <{} rdf:resource=\"{}\"/>\n", name, escape_xml(&target))
        } else {
            let attr = if field.is_typed() {
                format!(
                    " rdf:datatype=\"{}\"",
                    escape_xml(&expand_datatype(&field.datatype))
                )
            } else if field.has_language() {
                format!(" xml:lang=\"{}\"", escape_xml(&field.language))
            } else {
                String::new()
            };
            let text = format_value(value)?;
            format!(" <{}{}>{}</{}>\n", name, attr, escape_xml(&text), name)
        };
        self.core.write_str(&line)
    }

    fn write_end_resource(&mut self, class: &str) -> Result<()> {
        self.core.ensure_writing("end a resource")?;
        self.core.write_str(&format!("</{}>\n", class))
    }

    fn write_footer(&mut self) -> Result<()> {
        self.write_header()?;
        self.core.write_str("</rdf:RDF>\n")?;
        self.core.finish()
    }
}
