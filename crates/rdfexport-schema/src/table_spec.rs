//! Discovered tables and the SELECT statements generated for them.

use std::collections::BTreeMap;

use rdfexport_core::{Datatypes, REFERENCE_MARKER, SqlType, TableRef, encode_segment};

use crate::dialect::DialectConfig;

/// One named foreign key: local column to referenced column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKeyGroup {
    pub name: String,
    /// Local column to referenced column
    pub columns: BTreeMap<String, String>,
    /// Key sequence to lower-cased local column
    pub positions: BTreeMap<u16, String>,
}

impl ForeignKeyGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_column(&mut self, fk_column: &str, pk_column: &str, key_seq: u16) {
        self.columns
            .insert(fk_column.to_string(), pk_column.to_string());
        self.positions.insert(key_seq, fk_column.to_lowercase());
    }

    /// The `(local, referenced)` pair of a single-column key.
    pub fn single_column(&self) -> Option<(&str, &str)> {
        if self.columns.len() != 1 {
            return None;
        }
        self.columns
            .iter()
            .next()
            .map(|(fk, pk)| (fk.as_str(), pk.as_str()))
    }

    pub fn is_compound(&self) -> bool {
        self.columns.len() > 1
    }
}

/// A reference decision for one column, produced while building a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCandidate {
    pub column: String,
    pub target_table: String,
    pub reason: ReferenceReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceReason {
    /// Declared single-column foreign key onto the target's primary key
    ForeignKey,
    /// Column named like another table's single-column primary key
    NameMatch,
}

impl ReferenceCandidate {
    /// Question put to the confirmation collaborator.
    pub fn question(&self, table: &str) -> String {
        match self.reason {
            ReferenceReason::ForeignKey => format!(
                "{}.{} is a FK to {}. Export as reference?",
                table, self.column, self.target_table
            ),
            ReferenceReason::NameMatch => format!(
                "{}.{} has the same name as PK in {}. Export as reference?",
                table, self.column, self.target_table
            ),
        }
    }
}

/// One exportable table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table: TableRef,
    /// Columns in declaration order
    pub columns: Vec<(String, SqlType)>,
    /// Lower-cased primary-key columns in key-sequence order
    pub primary_key: Vec<String>,
    /// Referenced table, then constraint name
    pub foreign_keys: BTreeMap<String, BTreeMap<String, ForeignKeyGroup>>,
    query: Option<String>,
}

impl TableSpec {
    pub fn new(table: TableRef) -> Self {
        Self {
            table,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: BTreeMap::new(),
            query: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Lower-cased, IRI-encoded table name.
    pub fn segment(&self) -> String {
        encode_segment(&self.table.name)
    }

    pub fn add_column(&mut self, name: impl Into<String>, sql_type: SqlType) {
        self.columns.push((name.into(), sql_type));
    }

    /// Record one column of an imported key.
    pub fn add_foreign_key_column(
        &mut self,
        pk_table: &str,
        fk_name: &str,
        fk_column: &str,
        pk_column: &str,
        key_seq: u16,
    ) {
        self.foreign_keys
            .entry(pk_table.to_string())
            .or_default()
            .entry(fk_name.to_string())
            .or_insert_with(|| ForeignKeyGroup::new(fk_name))
            .add_column(fk_column, pk_column, key_seq);
    }

    /// The primary-key column when the key has exactly one column.
    pub fn simple_primary_key(&self) -> Option<&str> {
        match self.primary_key.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Single-column foreign keys whose referenced column is the referenced table's
    /// own simple primary key. Maps the lower-cased local column to the referenced table.
    pub fn simple_foreign_keys(&self, simple_pks: &[(String, String)]) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        for (pk_table, groups) in &self.foreign_keys {
            let Some(target_pk) = lookup(simple_pks, pk_table) else {
                continue;
            };
            for group in groups.values() {
                if let Some((fk_column, pk_column)) = group.single_column() {
                    if pk_column.eq_ignore_ascii_case(target_pk) {
                        result.insert(fk_column.to_lowercase(), pk_table.clone());
                    }
                }
            }
        }
        result
    }

    /// Reference target for every column that should become an object reference.
    pub fn reference_candidates(&self, simple_pks: &[(String, String)]) -> Vec<ReferenceCandidate> {
        let declared = self.simple_foreign_keys(simple_pks);
        let mut candidates = Vec::new();
        for (column, _) in &self.columns {
            if let Some(target) = declared.get(&column.to_lowercase()) {
                candidates.push(ReferenceCandidate {
                    column: column.clone(),
                    target_table: target.clone(),
                    reason: ReferenceReason::ForeignKey,
                });
                continue;
            }
            let matched = simple_pks
                .iter()
                .find(|(_, pk)| pk.eq_ignore_ascii_case(column));
            if let Some((target, _)) = matched {
                if !target.eq_ignore_ascii_case(&self.table.name) {
                    candidates.push(ReferenceCandidate {
                        column: column.clone(),
                        target_table: target.clone(),
                        reason: ReferenceReason::NameMatch,
                    });
                }
            }
        }
        candidates
    }

    /// Build the export SELECT statement.
    ///
    /// `references` lists the accepted reference candidates; any other column is
    /// a literal. With `add_data_types`, literal labels get `^^<type>`, or `@` for
    /// plain strings. The type comes from the full `datatypes` registry, so
    /// built-in defaults apply as well as `datatype.<sqltype>` overrides.
    pub fn render_query(
        &self,
        dialect: &DialectConfig,
        datatypes: &Datatypes,
        references: &[ReferenceCandidate],
        add_data_types: bool,
    ) -> String {
        let mut sql = String::from("SELECT ");
        if self.primary_key.is_empty() {
            sql.push_str("'@' AS id");
        } else {
            let id = dialect.concat.render(&self.primary_key);
            sql.push_str(&format!(
                "{id} AS id, {id} AS {}",
                dialect.quote_alias("rdfs:label")
            ));
        }

        for (column, sql_type) in &self.columns {
            let mut label = column.to_lowercase().replace(' ', "_");
            let reference = references.iter().find(|r| &r.column == column);
            if let Some(reference) = reference {
                label.push_str(REFERENCE_MARKER);
                label.push_str(&encode_segment(&reference.target_table));
            } else if add_data_types {
                match datatypes.rdf_type(*sql_type) {
                    Some(rdf) if !rdf.is_empty() && rdf != "xsd:string" => {
                        label.push_str("^^");
                        label.push_str(rdf);
                    }
                    _ => label.push('@'),
                }
            }
            sql.push_str(&format!(
                ", {} AS {}",
                dialect.quote_column(column),
                dialect.quote_alias(&label)
            ));
        }

        sql.push_str(" FROM ");
        if let Some(schema) = &self.table.schema {
            sql.push_str(&dialect.quote_column(schema));
            sql.push('.');
        }
        sql.push_str(&dialect.quote_column(&self.table.name));
        sql
    }

    /// The generated query, once set.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Store the generated query. Returns `false` if one was already stored.
    pub(crate) fn freeze_query(&mut self, sql: String) -> bool {
        if self.query.is_some() {
            return false;
        }
        self.query = Some(sql);
        true
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], table: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(table))
        .map(|(_, pk)| pk.as_str())
}
