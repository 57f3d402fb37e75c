//! Schema discovery.
//!
//! [`Explorer`] walks the catalog of a connection, registers every table with its
//! columns and keys, and writes one `<segment>.query` entry per table plus the
//! combined `tables` list back into the configuration.
//!
//! Discovery runs through explicit phases:
//!
//! ```text
//! Idle -> TablesListed -> TablesRegistered -> KeysDiscovered -> QueriesGenerated -> Idle
//! ```
//!
//! Calling a phase out of order is an invalid-state error.

use std::collections::{BTreeMap, HashSet};

use rdfexport_core::{
    Config, ConfigErrorKind, Connection, Datatypes, Error, Result, TableRef, config, encode_segment,
};

use crate::confirm::{AssumeYes, Confirm};
use crate::dialect::DialectConfig;
use crate::table_spec::TableSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPhase {
    Idle,
    TablesListed,
    TablesRegistered,
    KeysDiscovered,
    QueriesGenerated,
}

/// Discovers tables and generates export queries for one connection.
pub struct Explorer<'a, C: Connection + ?Sized> {
    conn: &'a C,
    config: &'a mut Config,
    dialect: DialectConfig,
    datatypes: Datatypes,
    confirm: Box<dyn Confirm + 'a>,
    interactive: bool,
    phase: DiscoveryPhase,
    tables: Vec<TableSpec>,
    declined: HashSet<String>,
    /// Table name and its single primary-key column, in registration order
    simple_pks: Vec<(String, String)>,
}

impl<'a, C: Connection + ?Sized> Explorer<'a, C> {
    /// Non-interactive explorer using the dialect detected from the connection URL.
    pub fn new(conn: &'a C, config: &'a mut Config) -> Self {
        let dialect_name = conn.dialect();
        let dialect = DialectConfig::from_config(config, &dialect_name);
        let datatypes = Datatypes::from_config(config);
        tracing::debug!(dialect = %dialect_name, "Created schema explorer");
        Self {
            conn,
            config,
            dialect,
            datatypes,
            confirm: Box::new(AssumeYes),
            interactive: false,
            phase: DiscoveryPhase::Idle,
            tables: Vec::new(),
            declined: HashSet::new(),
            simple_pks: Vec::new(),
        }
    }

    /// Ask `confirm` before keeping each table and each reference column.
    #[must_use]
    pub fn interactive(mut self, confirm: impl Confirm + 'a) -> Self {
        self.confirm = Box::new(confirm);
        self.interactive = true;
        self
    }

    pub fn phase(&self) -> DiscoveryPhase {
        self.phase
    }

    pub fn dialect(&self) -> &DialectConfig {
        &self.dialect
    }

    /// Registered tables in registration order.
    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Tables that have a single-column primary key, with that column.
    pub fn simple_primary_keys(&self) -> &[(String, String)] {
        &self.simple_pks
    }

    fn expect_phase(&self, allowed: &[DiscoveryPhase], operation: &str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(Error::invalid_state(format!(
                "cannot {} while discovery is in phase {:?}",
                operation, self.phase
            )))
        }
    }

    fn is_skipped(&self, table: &str) -> bool {
        self.dialect.skips(table) || self.declined.contains(&encode_segment(table))
    }

    /// Run every phase and write the results into the configuration.
    pub fn discover(&mut self, add_data_types: bool) -> Result<()> {
        let listed = self.list_tables()?;
        self.register_tables(listed)?;
        self.discover_keys()?;
        self.generate_queries(add_data_types)?;
        self.phase = DiscoveryPhase::Idle;
        Ok(())
    }

    /// Enumerate tables visible to the connection, minus the dialect skip-list.
    ///
    /// Starts a new discovery pass, discarding anything registered before.
    pub fn list_tables(&mut self) -> Result<Vec<TableRef>> {
        self.expect_phase(
            &[DiscoveryPhase::Idle, DiscoveryPhase::QueriesGenerated],
            "list tables",
        )?;
        self.tables.clear();
        self.simple_pks.clear();

        let mut seen = HashSet::new();
        let listed: Vec<TableRef> = self
            .conn
            .tables()?
            .into_iter()
            .filter(|t| !self.is_skipped(&t.name))
            .filter(|t| seen.insert(t.name.clone()))
            .collect();

        tracing::debug!(
            dialect = %self.dialect.name,
            count = listed.len(),
            "Listed tables"
        );
        self.phase = DiscoveryPhase::TablesListed;
        Ok(listed)
    }

    /// Load columns for each table and record the combined `tables` list.
    pub fn register_tables(&mut self, tables: Vec<TableRef>) -> Result<()> {
        self.expect_phase(&[DiscoveryPhase::TablesListed], "register tables")?;

        for table in tables {
            if self.is_skipped(&table.name) || self.table(&table.name).is_some() {
                continue;
            }
            if self.interactive
                && !self
                    .confirm
                    .confirm(&format!("Export table {}?", table.name))
            {
                self.declined.insert(encode_segment(&table.name));
                continue;
            }

            let mut spec = TableSpec::new(table);
            for column in self.conn.columns(&spec.table)? {
                spec.add_column(column.name, column.sql_type);
            }
            tracing::debug!(
                table = %spec.name(),
                columns = spec.columns.len(),
                "Registered table"
            );
            self.tables.push(spec);
        }

        let segments: Vec<String> = self.tables.iter().map(TableSpec::segment).collect();
        tracing::info!(tables = %segments.join(" "), "Discovered tables");
        self.config.set(config::TABLES, segments.join(" "));
        self.phase = DiscoveryPhase::TablesRegistered;
        Ok(())
    }

    /// Load primary and imported keys of every registered table.
    pub fn discover_keys(&mut self) -> Result<()> {
        self.expect_phase(&[DiscoveryPhase::TablesRegistered], "discover keys")?;

        for spec in &mut self.tables {
            let mut pk = self.conn.primary_keys(&spec.table)?;
            pk.sort_by_key(|c| c.key_seq);
            spec.primary_key = pk.into_iter().map(|c| c.column.to_lowercase()).collect();
            if let Some(column) = spec.simple_primary_key() {
                self.simple_pks
                    .push((spec.name().to_string(), column.to_string()));
            }

            for key in self.conn.imported_keys(&spec.table)? {
                spec.add_foreign_key_column(
                    &key.pk_table,
                    &key.fk_name,
                    &key.fk_column,
                    &key.pk_column,
                    key.key_seq,
                );
            }
        }

        tracing::debug!(
            simple_keys = self.simple_pks.len(),
            "Discovered primary and foreign keys"
        );
        self.phase = DiscoveryPhase::KeysDiscovered;
        Ok(())
    }

    /// Single-column foreign keys of `table` that point at a simple primary key.
    ///
    /// Maps the lower-cased local column to the referenced table.
    pub fn simple_foreign_keys(&self, table: &str) -> BTreeMap<String, String> {
        self.table(table)
            .map(|spec| spec.simple_foreign_keys(&self.simple_pks))
            .unwrap_or_default()
    }

    /// Build the export query of one table.
    pub fn create_query(&mut self, table: &str, add_data_types: bool) -> Result<String> {
        self.expect_phase(
            &[DiscoveryPhase::KeysDiscovered, DiscoveryPhase::QueriesGenerated],
            "create a query",
        )?;
        let index = self
            .tables
            .iter()
            .position(|t| t.name() == table)
            .ok_or_else(|| {
                Error::config(
                    ConfigErrorKind::Invalid,
                    format!("table {} was not discovered", table),
                )
            })?;
        Ok(self.build_query(index, add_data_types))
    }

    fn build_query(&mut self, index: usize, add_data_types: bool) -> String {
        let spec = &self.tables[index];
        let mut accepted = Vec::new();
        for candidate in spec.reference_candidates(&self.simple_pks) {
            if !self.interactive || self.confirm.confirm(&candidate.question(spec.name())) {
                tracing::info!(
                    table = %spec.name(),
                    column = %candidate.column,
                    target = %candidate.target_table,
                    "Column exported as reference"
                );
                accepted.push(candidate);
            }
        }
        spec.render_query(&self.dialect, &self.datatypes, &accepted, add_data_types)
    }

    /// Generate and store the query of every registered table as `<segment>.query`.
    pub fn generate_queries(&mut self, add_data_types: bool) -> Result<()> {
        self.expect_phase(&[DiscoveryPhase::KeysDiscovered], "generate queries")?;

        for index in 0..self.tables.len() {
            let sql = self.build_query(index, add_data_types);
            let spec = &mut self.tables[index];
            let segment = spec.segment();
            if !spec.freeze_query(sql.clone()) {
                return Err(Error::invalid_state(format!(
                    "query for table {} was already generated",
                    spec.name()
                )));
            }
            tracing::debug!(table = %spec.name(), sql = %sql, "Generated export query");
            self.config.set(format!("{segment}.query"), sql);
        }

        self.phase = DiscoveryPhase::QueriesGenerated;
        Ok(())
    }
}
