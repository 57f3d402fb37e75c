//! Output notation selection.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use rdfexport_core::{ConfigErrorKind, Error};

use crate::jsonld::JsonLdWriter;
use crate::turtle::TurtleWriter;
use crate::writer::ResourceWriter;
use crate::xml::XmlWriter;

/// The RDF serialization written by an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Notation {
    #[default]
    RdfXml,
    Turtle,
    JsonLd,
}

impl Notation {
    pub const fn name(self) -> &'static str {
        match self {
            Notation::RdfXml => "rdf/xml",
            Notation::Turtle => "turtle",
            Notation::JsonLd => "json-ld",
        }
    }

    pub const fn media_type(self) -> &'static str {
        match self {
            Notation::RdfXml => "application/rdf+xml",
            Notation::Turtle => "text/turtle",
            Notation::JsonLd => "application/ld+json",
        }
    }

    /// Create a writer for this notation over `out`.
    pub fn writer<'a, W: Write + 'a>(self, out: W) -> Box<dyn ResourceWriter + 'a> {
        tracing::debug!(notation = self.name(), "Creating resource writer");
        match self {
            Notation::RdfXml => Box::new(XmlWriter::new(out)),
            Notation::Turtle => Box::new(TurtleWriter::new(out)),
            Notation::JsonLd => Box::new(JsonLdWriter::new(out)),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Notation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rdf" | "xml" | "rdfxml" | "rdf/xml" | "rdf-xml" => Ok(Notation::RdfXml),
            "ttl" | "turtle" => Ok(Notation::Turtle),
            "jsonld" | "json-ld" => Ok(Notation::JsonLd),
            other => Err(Error::config(
                ConfigErrorKind::UnknownNotation,
                format!("unknown output notation '{}'", other),
            )),
        }
    }
}
