//! Single-record filtering by lexical query patching.
//!
//! The patcher does not parse SQL. It looks for clause keywords surrounded by
//! spaces or newlines, case-insensitively, and splices a filter in front of the
//! first one. A keyword appearing inside a string literal or a quoted identifier
//! with spaces around it will be taken for a clause boundary.

use std::sync::OnceLock;

use regex::Regex;

/// Clauses that must follow a `HAVING` filter.
const AFTER_HAVING: &str = "order|limit|procedure|into|for|lock";
/// Clauses that must follow a `WHERE` filter.
const AFTER_WHERE: &str = "group|having|order|limit|procedure|into|for|lock";

fn keyword(words: &str) -> Regex {
    let pattern = format!(r"(?i)[ \n](?:{words})[ \n]");
    Regex::new(&pattern).expect("static keyword pattern")
}

fn having_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| keyword(AFTER_HAVING))
}

fn where_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| keyword(AFTER_WHERE))
}

fn having_clause() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| keyword("having"))
}

fn where_clause() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| keyword("where"))
}

/// Quote a value as a SQL string literal, doubling single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn splice(
    query: &str,
    existing: &Regex,
    boundary: &Regex,
    clause: &str,
    condition: &str,
) -> String {
    if let Some(m) = existing.find(query) {
        let at = m.end();
        return format!("{}{} AND {}", &query[..at], condition, &query[at..]);
    }
    let at = boundary.find(query).map_or(query.len(), |m| m.start());
    format!("{} {} {}{}", &query[..at], clause, condition, &query[at..])
}

/// Restrict a query projecting an `id` column to one identifier via `HAVING`.
///
/// An existing `HAVING` clause is extended with `id='…' AND`. Otherwise the clause
/// is inserted before the first of `ORDER`, `LIMIT`, `PROCEDURE`, `INTO`, `FOR`,
/// `LOCK`, or appended.
pub fn inject_having(query: &str, identifier: &str) -> String {
    let condition = format!("id={}", quote_literal(identifier));
    let patched = splice(query, having_clause(), having_boundary(), "HAVING", &condition);
    tracing::debug!(sql = %patched, "Injected HAVING filter");
    patched
}

/// Restrict a query to one identifier via `WHERE <key_column>='…'`.
///
/// Same mechanism as [`inject_having`], inserting before `GROUP` and `HAVING` too.
pub fn inject_where(query: &str, key_column: &str, identifier: &str) -> String {
    let condition = format!("{}={}", key_column, quote_literal(identifier));
    let patched = splice(query, where_clause(), where_boundary(), "WHERE", &condition);
    tracing::debug!(sql = %patched, "Injected WHERE filter");
    patched
}
