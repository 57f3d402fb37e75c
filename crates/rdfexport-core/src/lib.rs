//! Core types and traits for RDFExport Rust.
//!
//! `rdfexport-core` is the **foundation layer** shared by every other crate in the
//! workspace.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Connection` and `Cursor` are implemented by database drivers
//!   and consumed by discovery and export.
//! - **Data model**: `Value`, `SqlType`, `Row` and `RdfField` describe result cells and
//!   resolved output properties.
//! - **Datatype registry**: `Datatypes` maps SQL types to RDF literal datatypes and is
//!   built fresh from a `Config` for each export.
//! - **Escaping**: markup and IRI escaping used by every serializer.
//!
//! # Who Uses This Crate
//!
//! - `rdfexport-query` parses column labels into `RdfField`s.
//! - `rdfexport-schema` reads catalog metadata through `Connection`.
//! - `rdfexport-format` writers consume `RdfField`, `Value` and the escapers.
//! - `rdfexport-session` runs configured queries and drives a writer.
//! - `rdfexport-sqlite` implements `Connection`.

pub mod config;
pub mod connection;
pub mod datatypes;
pub mod error;
pub mod escape;
pub mod field;
pub mod types;
pub mod value;

pub use config::Config;
pub use connection::{
    ColumnInfo, ColumnMeta, Connection, Cursor, ImportedKey, PrimaryKeyColumn, Row, RowSet,
    TableRef, dialect_from_url,
};
pub use datatypes::{Datatypes, XSD_NAMESPACE, expand_datatype, format_value};
pub use error::{
    AttributeTableError, ConfigError, ConfigErrorKind, DatabaseError, Error, Result,
};
pub use escape::{encode_iri, encode_segment, escape_xml};
pub use field::{REFERENCE_MARKER, RdfField};
pub use types::SqlType;
pub use value::Value;
