//! The relational-access contract consumed by discovery and export.
//!
//! Drivers implement [`Connection`] for catalog metadata and statement execution;
//! statements return a forward-only [`Cursor`] over labeled, typed columns.

use std::collections::VecDeque;

use crate::error::Result;
use crate::types::SqlType;
use crate::value::Value;

/// Label and type of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub label: String,
    pub sql_type: SqlType,
}

impl ColumnMeta {
    pub fn new(label: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            label: label.into(),
            sql_type,
        }
    }
}

/// One result row. Cells are addressed from 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Cell at `index`, treating a missing cell as NULL.
    pub fn value(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&Value::Null)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Forward-only result cursor.
pub trait Cursor {
    /// Column metadata, available before the first row is read.
    fn columns(&self) -> &[ColumnMeta];

    /// Advance to the next row; `None` once the result is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

/// A fully materialized result set.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Vec<ColumnMeta>,
    rows: VecDeque<Row>,
}

impl RowSet {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self {
            columns,
            rows: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, values: Vec<Value>) -> Self {
        self.push_row(values);
        self
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push_back(Row::new(values));
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Cursor for RowSet {
    fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}

/// Qualified name of a table or view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// A table column as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: SqlType,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
        }
    }
}

/// One column of a primary key with its 1-based key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyColumn {
    pub column: String,
    pub key_seq: u16,
}

/// One column of an imported (foreign) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedKey {
    /// Referenced table
    pub pk_table: String,
    /// Constraint name
    pub fk_name: String,
    /// Local column
    pub fk_column: String,
    /// Referenced column
    pub pk_column: String,
    pub key_seq: u16,
}

/// A database connection as seen by the exporter.
///
/// Failures are reported as data-access errors and are never retried by callers.
pub trait Connection {
    /// Connection URL, e.g. `jdbc:mysql://host/db` or `sqlite::memory:`.
    fn url(&self) -> &str;

    /// SQL dialect name, derived from the URL's sub-protocol.
    fn dialect(&self) -> String {
        dialect_from_url(self.url())
    }

    /// Run a statement and return a cursor over its result.
    fn query(&self, sql: &str) -> Result<Box<dyn Cursor + '_>>;

    /// Tables and views visible to this connection, in catalog order.
    fn tables(&self) -> Result<Vec<TableRef>>;

    /// Columns of a table, in declaration order.
    fn columns(&self, table: &TableRef) -> Result<Vec<ColumnInfo>>;

    fn primary_keys(&self, table: &TableRef) -> Result<Vec<PrimaryKeyColumn>>;

    fn imported_keys(&self, table: &TableRef) -> Result<Vec<ImportedKey>>;
}

/// The lower-cased sub-protocol of a connection URL.
///
/// A leading `jdbc:` is skipped, so `jdbc:MySQL://h/db` and `mysql://h/db` both
/// yield `mysql`.
pub fn dialect_from_url(url: &str) -> String {
    let rest = match url.get(..5) {
        Some(head) if head.eq_ignore_ascii_case("jdbc:") => &url[5..],
        _ => url,
    };
    let end = rest.find(':').unwrap_or(rest.len());
    rest[..end].to_lowercase()
}
