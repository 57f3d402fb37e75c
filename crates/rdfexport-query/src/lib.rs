//! Column-label parsing and single-record query patching for RDFExport Rust.
//!
//! - [`parse_label`] turns a result column label such as `price^^xsd:decimal` or
//!   `country->countries` into an [`RdfField`](rdfexport_core::RdfField).
//! - [`inject_having`] and [`inject_where`] rewrite a configured query so it returns
//!   a single record.

pub mod label;
pub mod patch;

pub use label::parse_label;
pub use patch::{inject_having, inject_where, quote_literal};
