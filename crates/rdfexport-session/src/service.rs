//! One-call exports.

use std::io::Write;

use rdfexport_core::{Config, Connection, Result};
use rdfexport_format::Notation;

use crate::session::ExportSessionBuilder;

/// Runs complete exports: tables, document information and footer.
///
/// Each call builds a fresh [`ExportSession`](crate::ExportSession) over the given output.
pub struct ExportService<'a, C: Connection + ?Sized> {
    conn: &'a C,
    config: &'a Config,
    builder: ExportSessionBuilder,
}

impl<'a, C: Connection + ?Sized> ExportService<'a, C> {
    pub fn new(conn: &'a C, config: &'a Config) -> Self {
        Self {
            conn,
            config,
            builder: ExportSessionBuilder::new(),
        }
    }

    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.builder = self.builder.with_notation(notation);
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.builder = self.builder.with_encoding(label);
        self
    }

    /// Export one table, optionally a single record of it.
    pub fn export_table<W: Write + 'a>(
        &self,
        out: W,
        table: &str,
        identifier: Option<&str>,
    ) -> Result<usize> {
        let mut session = self.builder.clone().build(self.conn, self.config, out)?;
        let mut resources = session.export_table_with(table, identifier)?;
        resources += session.export_document_information()?;
        session.finish()?;
        Ok(resources)
    }

    /// Export every table listed under `tables`.
    pub fn export_all_tables<W: Write + 'a>(&self, out: W) -> Result<usize> {
        let mut session = self.builder.clone().build(self.conn, self.config, out)?;
        let mut resources = session.export_all_tables()?;
        resources += session.export_document_information()?;
        session.finish()?;
        tracing::info!(resources, "Export complete");
        Ok(resources)
    }
}
