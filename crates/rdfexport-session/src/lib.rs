//! Export engine for RDFExport Rust.
//!
//! An [`ExportSession`] runs the queries configured for each table, groups
//! consecutive rows with the same identifier into one resource, and streams
//! the resources to a [`ResourceWriter`](rdfexport_format::ResourceWriter).
//!
//! # Configuration keys read here
//!
//! - `<table>.query[N]`: one property per result column; column 1 is the identifier
//! - `<table>.attributetable[N]`: identifier plus groups of (name, value, datatype, language)
//! - `<table>.key[N]` / `<table>.attributekey[N]`: column used to filter a single record
//! - `<table>.class`, `<table>.vocabulary`
//! - `query`, `attributetable` and `class` for document-level resources
//!
//! # Example
//!
//! ```ignore
//! let mut session = ExportSession::builder()
//!     .with_notation(Notation::Turtle)
//!     .build(&conn, &config, std::io::stdout())?;
//! session.export_all_tables()?;
//! session.export_document_information()?;
//! session.finish()?;
//! ```

pub mod grouping;
pub mod service;
pub mod session;

pub use grouping::{IdentifierRuns, ORDINAL_MARKER};
pub use service::ExportService;
pub use session::{ExportSession, ExportSessionBuilder};
