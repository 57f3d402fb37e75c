//! SQLite connection for RDFExport Rust.
//!
//! [`SqliteConnection`] implements [`Connection`](rdfexport_core::Connection) with
//! `rusqlite`: statements for export, `sqlite_master` and the `table_info` /
//! `foreign_key_list` pragmas for discovery. Declared column types are mapped to
//! [`SqlType`](rdfexport_core::SqlType) by SQLite's affinity rules.
//!
//! ```
//! use rdfexport_core::Connection;
//! use rdfexport_sqlite::SqliteConnection;
//!
//! let conn = SqliteConnection::open("sqlite::memory:")?;
//! conn.execute_batch("CREATE TABLE person (id INTEGER PRIMARY KEY, name TEXT)")?;
//! assert_eq!(conn.dialect(), "sqlite");
//! assert_eq!(conn.tables()?.len(), 1);
//! # Ok::<(), rdfexport_core::Error>(())
//! ```

pub mod connection;
pub mod types;

pub use connection::SqliteConnection;
pub use types::{declared_type, read_value};
