//! RDFExport Rust: export relational database tables as RDF.
//!
//! `rdfexport` is the facade crate. It re-exports the workspace crates and offers a
//! [`prelude`] with the types most applications need.
//!
//! # Workflow
//!
//! 1. Put export settings into a [`Config`]: at least a `vocabulary`, usually a `baseurl`
//!    and `xmlns.<prefix>` namespaces.
//! 2. Either write `<table>.query` entries by hand or let an [`Explorer`] generate them
//!    from the database catalog.
//! 3. Run an [`ExportSession`] (or the one-call [`ExportService`]) over any
//!    [`Connection`] and an output stream, choosing a [`Notation`].
//!
//! ```
//! use rdfexport::prelude::*;
//! use rdfexport_sqlite::SqliteConnection;
//!
//! let conn = SqliteConnection::open("sqlite::memory:")?;
//! conn.execute_batch(
//!     "CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT);
//!      INSERT INTO person VALUES (1, 'Alice');",
//! )?;
//!
//! let mut config = Config::new()
//!     .with("vocabulary", "http://example.org/people#")
//!     .with("sqldialect.sqlite.alias.before", "'")
//!     .with("sqldialect.sqlite.alias.after", "'");
//! Explorer::new(&conn, &mut config).discover(false)?;
//!
//! let mut out = Vec::new();
//! ExportService::new(&conn, &config)
//!     .with_notation(Notation::Turtle)
//!     .export_all_tables(&mut out)?;
//! let turtle = String::from_utf8(out)?;
//! assert!(turtle.contains("<#person/1> a :Person"));
//! # Ok::<(), rdfexport::Error>(())
//! ```
//!
//! # Crates
//!
//! - [`rdfexport_core`]: values, SQL types, datatype registry, configuration and the
//!   `Connection` contract
//! - [`rdfexport_query`]: column-label parsing and single-record query patching
//! - [`rdfexport_schema`]: catalog discovery and query generation
//! - [`rdfexport_format`]: RDF/XML, Turtle and JSON-LD writers
//! - [`rdfexport_session`]: the export engine
//! - `rdfexport_sqlite` (feature `sqlite`): a `rusqlite`-backed connection

pub use rdfexport_core;
pub use rdfexport_format;
pub use rdfexport_query;
pub use rdfexport_schema;
pub use rdfexport_session;

#[cfg(feature = "sqlite")]
pub use rdfexport_sqlite;

pub use rdfexport_core::{
    Config, ConfigErrorKind, Connection, Cursor, Datatypes, Error, RdfField, Result, SqlType,
    Value,
};
pub use rdfexport_format::{JsonLdWriter, Notation, ResourceWriter, TurtleWriter, XmlWriter};
pub use rdfexport_query::{inject_having, inject_where, parse_label};
pub use rdfexport_schema::{AssumeYes, Confirm, DialectConfig, Explorer};
pub use rdfexport_session::{ExportService, ExportSession, ExportSessionBuilder};

#[cfg(feature = "sqlite")]
pub use rdfexport_sqlite::SqliteConnection;

/// Commonly used types.
pub mod prelude {
    pub use rdfexport_core::{
        Config, Connection, Datatypes, Error, RdfField, Result, SqlType, Value,
    };
    pub use rdfexport_format::{Notation, ResourceWriter};
    pub use rdfexport_query::{inject_having, inject_where, parse_label};
    pub use rdfexport_schema::{AssumeYes, Confirm, Explorer};
    pub use rdfexport_session::{ExportService, ExportSession, ExportSessionBuilder};

    #[cfg(feature = "sqlite")]
    pub use rdfexport_sqlite::SqliteConnection;
}
