//! RDF resource writers for RDFExport Rust.
//!
//! Every notation implements [`ResourceWriter`], a streaming protocol of
//! header, resources with properties, and footer. [`Notation`] picks the
//! concrete writer at runtime.
//!
//! ```
//! use rdfexport_core::{RdfField, Value};
//! use rdfexport_format::{Notation, ResourceWriter};
//!
//! let mut out = Vec::new();
//! let mut writer = Notation::Turtle.writer(&mut out);
//! writer.set_vocabulary("http://example.org/voc#")?;
//! writer.write_header()?;
//! writer.write_start_resource("Person", "person", Some("1"))?;
//! writer.write_property(&RdfField::plain("name"), &Value::from("Alice"))?;
//! writer.write_end_resource("Person")?;
//! writer.write_footer()?;
//! drop(writer);
//! assert!(String::from_utf8(out).unwrap().contains("<#person/1> a :Person"));
//! # Ok::<(), rdfexport_core::Error>(())
//! ```

pub mod jsonld;
pub mod notation;
pub mod turtle;
pub mod writer;
pub mod xml;

pub use jsonld::JsonLdWriter;
pub use notation::Notation;
pub use turtle::TurtleWriter;
pub use writer::{RDF_DESCRIPTION, RDF_NAMESPACE, ResourceWriter, WriterPhase, check_encoding};
pub use xml::XmlWriter;
