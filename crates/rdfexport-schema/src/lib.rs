//! Schema discovery for RDFExport Rust.
//!
//! Inspects database metadata through a [`Connection`](rdfexport_core::Connection),
//! finds primary and simple foreign keys, and generates one export query per table
//! using the SQL dialect settings from the configuration. Columns that reference
//! another table's single-column primary key are labeled as object references
//! (`billing->customer`) without any explicit configuration.

pub mod confirm;
pub mod dialect;
pub mod explore;
pub mod table_spec;

pub use confirm::{AssumeYes, Confirm};
pub use dialect::{ConcatStrategy, DialectConfig};
pub use explore::{DiscoveryPhase, Explorer};
pub use table_spec::{ForeignKeyGroup, ReferenceCandidate, ReferenceReason, TableSpec};
