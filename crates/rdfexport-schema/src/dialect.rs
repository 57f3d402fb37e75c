//! Per-dialect SQL text settings.
//!
//! Read from `sqldialect.<dialect>.*` configuration keys:
//! `column.before`, `column.after`, `alias.before`, `alias.after`, `concat` and
//! `skiptables`.

use std::collections::HashSet;

use rdfexport_core::{Config, encode_segment};

/// How primary-key columns are concatenated into one identifier expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConcatStrategy {
    /// `concat('', a, b)`
    Concat,
    /// `'' || a || b`
    And,
    /// `'' + CStr(a) + CStr(b)`
    Plus,
    /// Unrecognized strategy name; renders an `ERROR` marker into the SQL.
    Unknown(String),
}

impl ConcatStrategy {
    /// Strategy for a configured name. A missing name means [`ConcatStrategy::And`].
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            None | Some("and") => ConcatStrategy::And,
            Some("concat") => ConcatStrategy::Concat,
            Some("plus") => ConcatStrategy::Plus,
            Some(other) => {
                tracing::warn!(strategy = other, "Unknown key concatenation strategy");
                ConcatStrategy::Unknown(other.to_string())
            }
        }
    }

    /// Concatenation expression over `columns`, or `'@'` when there are none.
    pub fn render(&self, columns: &[String]) -> String {
        if columns.is_empty() {
            return "'@'".to_string();
        }
        match self {
            ConcatStrategy::Concat => {
                let mut sql = "concat(''".to_string();
                for col in columns {
                    sql.push_str(", ");
                    sql.push_str(col);
                }
                sql.push(')');
                sql
            }
            ConcatStrategy::And => chain(columns, |col| format!(" || {col}")),
            ConcatStrategy::Plus => chain(columns, |col| format!(" + CStr({col})")),
            ConcatStrategy::Unknown(_) => chain(columns, |col| format!(" ERROR {col}")),
        }
    }
}

fn chain(columns: &[String], piece: impl Fn(&str) -> String) -> String {
    let mut sql = "''".to_string();
    for col in columns {
        sql.push_str(&piece(col));
    }
    sql
}

/// Quoting, concatenation and skip-list for one SQL dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectConfig {
    pub name: String,
    pub column_before: String,
    pub column_after: String,
    pub alias_before: String,
    pub alias_after: String,
    pub concat: ConcatStrategy,
    /// Segments (lower-cased, IRI-encoded names) of tables never exported
    pub skip_tables: HashSet<String>,
}

impl DialectConfig {
    /// Settings for `dialect`; missing delimiters default to the empty string.
    pub fn from_config(config: &Config, dialect: &str) -> Self {
        let key = |suffix: &str| format!("sqldialect.{dialect}.{suffix}");
        let text = |suffix: &str| config.get(&key(suffix)).unwrap_or_default().to_string();

        let skip_tables = config
            .get(&key("skiptables"))
            .map(|list| list.split_whitespace().map(encode_segment).collect())
            .unwrap_or_default();

        Self {
            name: dialect.to_string(),
            column_before: text("column.before"),
            column_after: text("column.after"),
            alias_before: text("alias.before"),
            alias_after: text("alias.after"),
            concat: ConcatStrategy::from_name(config.get(&key("concat"))),
            skip_tables,
        }
    }

    pub fn quote_column(&self, column: &str) -> String {
        format!("{}{}{}", self.column_before, column, self.column_after)
    }

    pub fn quote_alias(&self, alias: &str) -> String {
        format!("{}{}{}", self.alias_before, alias, self.alias_after)
    }

    /// Whether a table is on the skip-list; the comparison uses the table's segment.
    pub fn skips(&self, table: &str) -> bool {
        self.skip_tables.contains(&encode_segment(table))
    }
}
