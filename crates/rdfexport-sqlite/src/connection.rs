//! [`Connection`] implementation over `rusqlite`.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::OpenFlags;

use rdfexport_core::{
    ColumnInfo, ColumnMeta, ConfigErrorKind, Connection, Cursor, Error, ImportedKey,
    PrimaryKeyColumn, Result, RowSet, SqlType, TableRef, Value,
};

use crate::types::{declared_type, inferred_type, read_value};

const URL_SCHEME: &str = "sqlite:";
const MEMORY: &str = ":memory:";

const TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' ORDER BY name";
const COLUMNS_SQL: &str = "SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid";
const FOREIGN_KEYS_SQL: &str =
    "SELECT id, seq, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq";

fn database_error(err: rusqlite::Error) -> Error {
    Error::database_source(format!("SQLite error: {}", err), err)
}

/// A SQLite database opened for export.
///
/// Result sets are read completely when a statement runs and handed out as a
/// [`RowSet`].
pub struct SqliteConnection {
    conn: rusqlite::Connection,
    url: String,
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl SqliteConnection {
    /// Open a database from a `sqlite:<path>` URL; `sqlite::memory:` opens an
    /// in-memory database. A leading `jdbc:` is accepted.
    pub fn open(url: &str) -> Result<Self> {
        let rest = url.strip_prefix("jdbc:").unwrap_or(url);
        let path = rest.strip_prefix(URL_SCHEME).ok_or_else(|| {
            Error::config(
                ConfigErrorKind::Invalid,
                format!("not a SQLite connection URL: {}", url),
            )
        })?;
        if path.is_empty() || path == MEMORY {
            return Self::open_in_memory();
        }
        Self::open_path(path)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory().map_err(database_error)?;
        tracing::debug!("Opened in-memory SQLite database");
        Ok(Self::from_rusqlite(conn, format!("{}{}", URL_SCHEME, MEMORY)))
    }

    /// Open an existing database file read-only.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = rusqlite::Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(database_error)?;
        tracing::debug!(path = %path.display(), "Opened SQLite database");
        Ok(Self::from_rusqlite(
            conn,
            format!("{}{}", URL_SCHEME, path.display()),
        ))
    }

    pub fn from_rusqlite(conn: rusqlite::Connection, url: impl Into<String>) -> Self {
        Self {
            conn,
            url: url.into(),
        }
    }

    /// Run one or more statements that return no rows.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| database_error(e).with_sql(sql))
    }

    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }

    fn catalog<T, F>(&self, sql: &str, table: &str, f: F) -> Result<Vec<T>>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let fail = |e: rusqlite::Error| database_error(e).with_sql(sql);
        let mut stmt = self.conn.prepare(sql).map_err(fail)?;
        let rows = stmt.query_map([table], f).map_err(fail)?;
        rows.collect::<rusqlite::Result<Vec<T>>>().map_err(fail)
    }

    fn table_info(&self, table: &TableRef) -> Result<Vec<(String, String, i64)>> {
        self.catalog(COLUMNS_SQL, &table.name, |row| {
            Ok((row.get(0)?, row.get::<_, Option<String>>(1)?.unwrap_or_default(), row.get(2)?))
        })
    }
}

impl Connection for SqliteConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn query(&self, sql: &str) -> Result<Box<dyn Cursor + '_>> {
        let fail = |e: rusqlite::Error| database_error(e).with_sql(sql);
        let mut stmt = self.conn.prepare(sql).map_err(fail)?;
        let columns: Vec<(String, Option<SqlType>)> = stmt
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.decl_type().and_then(declared_type)))
            .collect();

        let mut data: Vec<Vec<Value>> = Vec::new();
        let mut rows = stmt.query([]).map_err(fail)?;
        while let Some(row) = rows.next().map_err(fail)? {
            let mut values = Vec::with_capacity(columns.len());
            for (index, (_, ty)) in columns.iter().enumerate() {
                values.push(read_value(row.get_ref(index).map_err(fail)?, *ty)?);
            }
            data.push(values);
        }

        let metas = columns
            .into_iter()
            .enumerate()
            .map(|(index, (label, ty))| {
                let ty = ty.unwrap_or_else(|| inferred_type(data.iter().map(|r| &r[index])));
                ColumnMeta::new(label, ty)
            })
            .collect();

        tracing::debug!(sql, rows = data.len(), "SQLite query read");
        let mut set = RowSet::new(metas);
        for values in data {
            set.push_row(values);
        }
        Ok(Box::new(set))
    }

    fn tables(&self) -> Result<Vec<TableRef>> {
        let fail = |e: rusqlite::Error| database_error(e).with_sql(TABLES_SQL);
        let mut stmt = self.conn.prepare(TABLES_SQL).map_err(fail)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(fail)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(fail)?;
        Ok(names.into_iter().map(TableRef::new).collect())
    }

    fn columns(&self, table: &TableRef) -> Result<Vec<ColumnInfo>> {
        Ok(self
            .table_info(table)?
            .into_iter()
            .map(|(name, decl, _)| {
                ColumnInfo::new(name, declared_type(&decl).unwrap_or(SqlType::VarChar))
            })
            .collect())
    }

    fn primary_keys(&self, table: &TableRef) -> Result<Vec<PrimaryKeyColumn>> {
        let mut keys: Vec<PrimaryKeyColumn> = self
            .table_info(table)?
            .into_iter()
            .filter(|(_, _, pk)| *pk > 0)
            .map(|(column, _, pk)| PrimaryKeyColumn {
                column,
                key_seq: u16::try_from(pk).unwrap_or(u16::MAX),
            })
            .collect();
        keys.sort_by_key(|k| k.key_seq);
        Ok(keys)
    }

    /// Foreign keys of `table`. A key declared without target columns refers to
    /// the target table's primary key, matched by position.
    fn imported_keys(&self, table: &TableRef) -> Result<Vec<ImportedKey>> {
        let raw = self.catalog(FOREIGN_KEYS_SQL, &table.name, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut target_keys: HashMap<String, Vec<PrimaryKeyColumn>> = HashMap::new();
        let mut keys = Vec::with_capacity(raw.len());
        for (id, seq, pk_table, fk_column, to) in raw {
            let key_seq = u16::try_from(seq + 1).unwrap_or(u16::MAX);
            let pk_column = match to {
                Some(column) => column,
                None => {
                    if !target_keys.contains_key(&pk_table) {
                        let pks = self.primary_keys(&TableRef::new(pk_table.as_str()))?;
                        target_keys.insert(pk_table.clone(), pks);
                    }
                    target_keys
                        .get(&pk_table)
                        .and_then(|pks| pks.iter().find(|k| k.key_seq == key_seq))
                        .map(|k| k.column.clone())
                        .unwrap_or_default()
                }
            };
            keys.push(ImportedKey {
                pk_table,
                fk_name: format!("fk_{}", id),
                fk_column,
                pk_column,
                key_seq,
            });
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invoices() -> SqliteConnection {
        let conn = SqliteConnection::open("sqlite::memory:").unwrap();
        conn.execute_batch(
            "CREATE TABLE CUSTOMER (id INTEGER PRIMARY KEY, name VARCHAR(40));
             CREATE TABLE INVOICE (
                 id INTEGER PRIMARY KEY,
                 billing INTEGER REFERENCES CUSTOMER,
                 total DECIMAL(10, 2),
                 issued DATE
             );
             CREATE TABLE LINE (
                 invoice INTEGER,
                 line INTEGER,
                 text TEXT,
                 PRIMARY KEY (invoice, line),
                 FOREIGN KEY (invoice) REFERENCES INVOICE (id)
             );
             INSERT INTO CUSTOMER VALUES (1, 'Acme'), (2, NULL);
             INSERT INTO INVOICE VALUES (10, 1, 12.5, '2024-03-01');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_open_urls() {
        assert_eq!(SqliteConnection::open("sqlite::memory:").unwrap().dialect(), "sqlite");
        assert_eq!(SqliteConnection::open("jdbc:sqlite:").unwrap().url(), "sqlite::memory:");
        let err = SqliteConnection::open("postgres://localhost/db").unwrap_err();
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::Invalid));
    }

    #[test]
    fn test_tables_sorted() {
        let names: Vec<String> = invoices().tables().unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["CUSTOMER", "INVOICE", "LINE"]);
    }

    #[test]
    fn test_columns_and_keys() {
        let conn = invoices();
        let invoice = TableRef::new("INVOICE");
        let columns = conn.columns(&invoice).unwrap();
        assert_eq!(
            columns,
            vec![
                ColumnInfo::new("id", SqlType::Integer),
                ColumnInfo::new("billing", SqlType::Integer),
                ColumnInfo::new("total", SqlType::Decimal),
                ColumnInfo::new("issued", SqlType::Date),
            ]
        );

        let line = TableRef::new("LINE");
        let pks: Vec<(String, u16)> = conn
            .primary_keys(&line)
            .unwrap()
            .into_iter()
            .map(|k| (k.column, k.key_seq))
            .collect();
        assert_eq!(pks, vec![("invoice".to_string(), 1), ("line".to_string(), 2)]);
    }

    #[test]
    fn test_implicit_foreign_key_target() {
        let keys = invoices().imported_keys(&TableRef::new("INVOICE")).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].pk_table, "CUSTOMER");
        assert_eq!(keys[0].fk_column, "billing");
        assert_eq!(keys[0].pk_column, "id");
        assert_eq!(keys[0].key_seq, 1);
    }

    #[test]
    fn test_explicit_foreign_key_target() {
        let keys = invoices().imported_keys(&TableRef::new("LINE")).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].pk_table, "INVOICE");
        assert_eq!(keys[0].pk_column, "id");
    }

    #[test]
    fn test_query_values() {
        let conn = invoices();
        let mut cursor = conn
            .query("SELECT id, billing, total, issued, 'x' || id AS tag FROM INVOICE")
            .unwrap();
        let types: Vec<SqlType> = cursor.columns().iter().map(|c| c.sql_type).collect();
        assert_eq!(
            types,
            vec![
                SqlType::Integer,
                SqlType::Integer,
                SqlType::Decimal,
                SqlType::Date,
                SqlType::VarChar
            ]
        );
        let row = cursor.next_row().unwrap().unwrap();
        assert_eq!(row.value(0), &Value::BigInt(10));
        assert_eq!(row.value(2), &Value::Decimal("12.5".to_string()));
        assert_eq!(
            row.value(3),
            &Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(row.value(4), &Value::Text("x10".to_string()));
        assert!(cursor.next_row().unwrap().is_none());
    }

    #[test]
    fn test_null_cells() {
        let conn = invoices();
        let mut cursor = conn.query("SELECT id, name FROM CUSTOMER ORDER BY id").unwrap();
        cursor.next_row().unwrap();
        let second = cursor.next_row().unwrap().unwrap();
        assert!(second.value(1).is_null());
    }

    #[test]
    fn test_query_error_carries_sql() {
        let conn = invoices();
        match conn.query("SELECT * FROM missing") {
            Err(Error::Database(e)) => {
                assert_eq!(e.sql.as_deref(), Some("SELECT * FROM missing"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("query should fail"),
        }
    }
}
