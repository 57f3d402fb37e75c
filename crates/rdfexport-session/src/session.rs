//! Export sessions: one connection, one writer, one forward pass over the
//! configured queries.

use std::collections::BTreeMap;
use std::io::Write;

use rdfexport_core::{
    ColumnMeta, Config, ConfigErrorKind, Connection, Datatypes, Error, RdfField, Result, Row,
    format_value,
};
use rdfexport_format::{Notation, RDF_DESCRIPTION, ResourceWriter, check_encoding};
use rdfexport_query::{inject_having, inject_where, parse_label};

use crate::grouping::IdentifierRuns;

const QUERY: &str = "query";
const ATTRIBUTE_TABLE: &str = "attributetable";
const KEY: &str = "key";
const ATTRIBUTE_KEY: &str = "attributekey";
/// Class of document-level resources.
const DOCUMENT_CLASS: &str = "class";

/// Cells per attribute group: property name, value, datatype, language.
const ATTRIBUTE_GROUP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryShape {
    /// One property per result column.
    Columns,
    /// `id` followed by groups of (name, value, datatype, language).
    Attributes,
}

// ============================================================================
// Builder
// ============================================================================

/// Options for an [`ExportSession`].
#[derive(Debug, Clone)]
pub struct ExportSessionBuilder {
    notation: Notation,
    encoding: String,
    identifier: Option<String>,
}

impl Default for ExportSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSessionBuilder {
    pub fn new() -> Self {
        Self {
            notation: Notation::default(),
            encoding: "UTF-8".to_string(),
            identifier: None,
        }
    }

    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    /// Output encoding label. Only UTF-8 is accepted by [`build`](Self::build).
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    /// Export only the record with this identifier from each table.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Create the writer over `out` and configure it from `config`.
    ///
    /// Fails when the encoding is not UTF-8 or no vocabulary is configured.
    pub fn build<'a, C, W>(
        self,
        conn: &'a C,
        config: &'a Config,
        out: W,
    ) -> Result<ExportSession<'a, C>>
    where
        C: Connection + ?Sized,
        W: Write + 'a,
    {
        check_encoding(&self.encoding)?;
        let vocabulary = config.vocabulary().ok_or_else(|| {
            Error::config(
                ConfigErrorKind::MissingVocabulary,
                "the 'vocabulary' property is not set",
            )
        })?;

        let mut writer = self.notation.writer(out);
        writer.set_vocabulary(vocabulary)?;
        for (prefix, uri) in config.namespaces() {
            writer.add_namespace(prefix, uri)?;
        }
        writer.set_base_url(config.base_url())?;
        writer.set_empty_string_is_null(config.empty_string_is_null())?;

        tracing::debug!(
            notation = %self.notation,
            dialect = %conn.dialect(),
            vocabulary,
            "Export session configured"
        );

        Ok(ExportSession {
            conn,
            config,
            writer,
            notation: self.notation,
            datatypes: Datatypes::from_config(config),
            object_properties: config.object_properties(),
            identifier: self.identifier,
            tables: config.tables(),
        })
    }
}

// ============================================================================
// Session
// ============================================================================

/// Runs configured queries and streams the resulting resources to a writer.
///
/// The document header is written before the first resource; per-table
/// vocabularies can therefore only differ from the global one until then.
pub struct ExportSession<'a, C: Connection + ?Sized> {
    conn: &'a C,
    config: &'a Config,
    writer: Box<dyn ResourceWriter + 'a>,
    notation: Notation,
    datatypes: Datatypes,
    object_properties: BTreeMap<String, String>,
    identifier: Option<String>,
    tables: Vec<String>,
}

impl ExportSession<'_, dyn Connection> {
    pub fn builder() -> ExportSessionBuilder {
        ExportSessionBuilder::new()
    }
}

impl<'a, C: Connection + ?Sized> ExportSession<'a, C> {
    pub fn notation(&self) -> Notation {
        self.notation
    }

    /// Table segments listed under `tables`.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn datatypes(&self) -> &Datatypes {
        &self.datatypes
    }

    /// Export one table, restricted to the session identifier if one was given.
    ///
    /// Returns the number of resources written.
    pub fn export_table(&mut self, table: &str) -> Result<usize> {
        let identifier = self.identifier.clone();
        self.export_table_with(table, identifier.as_deref())
    }

    /// Export one table, restricted to `identifier` when given.
    ///
    /// Runs every `<table>.query*` and then every `<table>.attributetable*`
    /// entry in key order. Resources of the first query get the table class,
    /// later queries write anonymous `rdf:Description` resources.
    pub fn export_table_with(&mut self, table: &str, identifier: Option<&str>) -> Result<usize> {
        let config = self.config;
        let vocabulary = config.table_vocabulary(table).ok_or_else(|| {
            Error::config(
                ConfigErrorKind::MissingVocabulary,
                format!("no vocabulary for table '{}'", table),
            )
        })?;
        self.writer.set_vocabulary(vocabulary)?;

        let class = config.table_class(table);
        let mut resources = 0;
        for (index, (shape, sql)) in self.table_queries(table, identifier).into_iter().enumerate() {
            let class = if index == 0 {
                class.as_str()
            } else {
                RDF_DESCRIPTION
            };
            resources += self.run(shape, table, &sql, class)?;
        }

        tracing::info!(table, resources, "Exported table");
        Ok(resources)
    }

    /// Export every table listed under `tables`.
    pub fn export_all_tables(&mut self) -> Result<usize> {
        let tables = self.tables.clone();
        let mut resources = 0;
        for table in &tables {
            resources += self.export_table(table)?;
        }
        Ok(resources)
    }

    /// Run the document-level `query` and `attributetable` entries.
    ///
    /// Their resources use the empty segment. The `class` entry applies to the
    /// first of them only; the second is anonymous.
    pub fn export_document_information(&mut self) -> Result<usize> {
        let config = self.config;
        let mut class = config.get(DOCUMENT_CLASS).unwrap_or(RDF_DESCRIPTION);
        let mut resources = 0;
        if let Some(sql) = config.get(QUERY) {
            resources += self.run(QueryShape::Columns, "", sql, class)?;
            class = RDF_DESCRIPTION;
        }
        if let Some(sql) = config.get(ATTRIBUTE_TABLE) {
            resources += self.run(QueryShape::Attributes, "", sql, class)?;
        }
        Ok(resources)
    }

    /// Write the footer and flush the output.
    pub fn finish(mut self) -> Result<()> {
        self.writer.write_footer()
    }

    /// The configured statements of `table`, patched for `identifier`.
    fn table_queries(&self, table: &str, identifier: Option<&str>) -> Vec<(QueryShape, String)> {
        let config = self.config;
        let kinds = [
            (QueryShape::Columns, QUERY, KEY),
            (QueryShape::Attributes, ATTRIBUTE_TABLE, ATTRIBUTE_KEY),
        ];

        let mut queries = Vec::new();
        for (shape, kind, key_kind) in kinds {
            let prefix = format!("{}.{}", table, kind);
            for (key, sql) in config.with_prefix(&prefix) {
                let suffix = &key[prefix.len()..];
                let sql = match identifier {
                    None => sql.to_string(),
                    Some(id) => match config.get(&format!("{}.{}{}", table, key_kind, suffix)) {
                        Some(column) => inject_where(sql, column, id),
                        None => inject_having(sql, id),
                    },
                };
                queries.push((shape, sql));
            }
        }
        queries
    }

    fn run(&mut self, shape: QueryShape, segment: &str, sql: &str, class: &str) -> Result<usize> {
        tracing::debug!(segment, sql, "Running export query");
        let conn = self.conn;
        let mut cursor = conn.query(sql).map_err(|e| e.with_sql(sql))?;

        let width = cursor.columns().len();
        let fields = match shape {
            QueryShape::Columns => self.resolve_fields(cursor.columns()),
            QueryShape::Attributes => {
                check_attribute_width(width)?;
                Vec::new()
            }
        };

        let mut runs = IdentifierRuns::new();
        let mut resources = 0;
        while let Some(row) = cursor.next_row().map_err(|e| e.with_sql(sql))? {
            let id = runs.identifier(&row)?;
            if self.step(&mut runs, id.as_deref(), segment, class)? {
                resources += 1;
            }
            match shape {
                QueryShape::Columns => {
                    for (index, field) in fields.iter().enumerate().skip(1) {
                        self.writer.write_property(field, row.value(index))?;
                    }
                }
                QueryShape::Attributes => {
                    for start in (1..width).step_by(ATTRIBUTE_GROUP) {
                        let field = self.attribute_field(&row, start, width)?;
                        self.writer.write_property(&field, row.value(start + 1))?;
                    }
                }
            }
        }
        if runs.has_open() {
            self.writer.write_end_resource(class)?;
        }

        tracing::debug!(rows = runs.rows(), resources, "Export query finished");
        Ok(resources)
    }

    /// Close the open resource and open the next one when the identifier changes.
    fn step(
        &mut self,
        runs: &mut IdentifierRuns,
        id: Option<&str>,
        segment: &str,
        class: &str,
    ) -> Result<bool> {
        let was_open = runs.has_open();
        if !runs.advance(id) {
            return Ok(false);
        }
        if was_open {
            self.writer.write_end_resource(class)?;
        }
        self.writer.write_header()?;
        self.writer.write_start_resource(class, segment, id)?;
        Ok(true)
    }

    /// Property descriptors for the result columns.
    ///
    /// The default datatype is the object-property mapping for the label, else the
    /// registry type of the column; markers in the label override both.
    fn resolve_fields(&self, columns: &[ColumnMeta]) -> Vec<RdfField> {
        columns
            .iter()
            .map(|column| {
                let fallback = self
                    .object_properties
                    .get(&column.label)
                    .map(String::as_str)
                    .or_else(|| self.datatypes.rdf_type(column.sql_type))
                    .unwrap_or("");
                parse_label(&column.label, fallback)
            })
            .collect()
    }

    fn attribute_field(&self, row: &Row, start: usize, width: usize) -> Result<RdfField> {
        let name = row.value(start);
        if name.is_null() {
            return Err(Error::malformed_attribute_table(
                width,
                format!("property name in column {} is NULL", start + 1),
            ));
        }
        let name = format_value(name)?;

        let datatype = match row.value(start + 2) {
            cell if cell.is_null() => self
                .object_properties
                .get(&name)
                .cloned()
                .unwrap_or_default(),
            cell => format_value(cell)?,
        };
        let language = match row.value(start + 3) {
            cell if cell.is_null() => String::new(),
            cell => format_value(cell)?,
        };
        Ok(RdfField::new(name, datatype, language))
    }
}

fn check_attribute_width(width: usize) -> Result<()> {
    if width > ATTRIBUTE_GROUP && (width - 1) % ATTRIBUTE_GROUP == 0 {
        Ok(())
    } else {
        Err(Error::malformed_attribute_table(
            width,
            "expected an id column followed by groups of name, value, datatype and language",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfexport_core::{
        ColumnInfo, Cursor, ImportedKey, PrimaryKeyColumn, RowSet, SqlType, TableRef, Value,
    };
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeDb {
        results: HashMap<String, RowSet>,
        executed: RefCell<Vec<String>>,
    }

    impl FakeDb {
        fn result(mut self, sql: &str, rows: RowSet) -> Self {
            self.results.insert(sql.to_string(), rows);
            self
        }
    }

    impl Connection for FakeDb {
        fn url(&self) -> &str {
            "jdbc:h2:mem:test"
        }

        fn query(&self, sql: &str) -> Result<Box<dyn Cursor + '_>> {
            self.executed.borrow_mut().push(sql.to_string());
            match self.results.get(sql) {
                Some(rows) => Ok(Box::new(rows.clone())),
                None => Err(Error::database("Table not found")),
            }
        }

        fn tables(&self) -> Result<Vec<TableRef>> {
            Ok(Vec::new())
        }

        fn columns(&self, _table: &TableRef) -> Result<Vec<ColumnInfo>> {
            Ok(Vec::new())
        }

        fn primary_keys(&self, _table: &TableRef) -> Result<Vec<PrimaryKeyColumn>> {
            Ok(Vec::new())
        }

        fn imported_keys(&self, _table: &TableRef) -> Result<Vec<ImportedKey>> {
            Ok(Vec::new())
        }
    }

    const PERSON_SQL: &str = "SELECT id, name FROM person ORDER BY id";

    fn people() -> RowSet {
        RowSet::new(vec![
            ColumnMeta::new("id", SqlType::Integer),
            ColumnMeta::new("name", SqlType::VarChar),
        ])
        .with_row(vec![Value::Int(1), "Alice".into()])
        .with_row(vec![Value::Int(1), "A.".into()])
        .with_row(vec![Value::Int(2), "Bob".into()])
    }

    fn person_config() -> Config {
        Config::new()
            .with("vocabulary", "http://voc")
            .with("tables", "person")
            .with("person.query", PERSON_SQL)
    }

    fn export<F>(db: &FakeDb, config: &Config, builder: ExportSessionBuilder, f: F) -> String
    where
        F: FnOnce(&mut ExportSession<'_, FakeDb>) -> Result<usize>,
    {
        let mut out = Vec::new();
        let mut session = builder.build(db, config, &mut out).unwrap();
        f(&mut session).unwrap();
        session.finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rows_grouped_by_identifier() {
        let db = FakeDb::default().result(PERSON_SQL, people());
        let config = person_config();
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            let count = s.export_all_tables()?;
            assert_eq!(count, 2);
            Ok(count)
        });
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n \
             xmlns=\"http://voc\">\n\n\
             <Person rdf:about=\"#person/1\">\n \
             <name>Alice</name>\n \
             <name>A.</name>\n\
             </Person>\n\
             <Person rdf:about=\"#person/2\">\n \
             <name>Bob</name>\n\
             </Person>\n\
             </rdf:RDF>\n"
        );
    }

    #[test]
    fn test_typed_columns_use_registry() {
        let sql = "SELECT id, age FROM person";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::Integer),
            ColumnMeta::new("age", SqlType::SmallInt),
        ])
        .with_row(vec![Value::Int(1), Value::SmallInt(42)]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc#")
            .with("person.query", sql);
        let out = export(
            &db,
            &config,
            ExportSessionBuilder::new().with_notation(Notation::Turtle),
            |s| s.export_table("person"),
        );
        assert!(out.ends_with(
            "<#person/1> a :Person ;\n    :age \"42\"^^<http://www.w3.org/2001/XMLSchema#int> .\n"
        ));
    }

    #[test]
    fn test_datatype_override_and_object_property() {
        let sql = "SELECT id, age, country FROM person";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::Integer),
            ColumnMeta::new("age", SqlType::SmallInt),
            ColumnMeta::new("country", SqlType::VarChar),
        ])
        .with_row(vec![Value::Int(1), Value::SmallInt(42), "dk".into()]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc#")
            .with("datatype.smallint", "xsd:short")
            .with("objectproperty.country", "countries")
            .with("person.query", sql);
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_table("person")
        });
        assert!(out.contains(
            " <age rdf:datatype=\"http://www.w3.org/2001/XMLSchema#short\">42</age>\n"
        ));
        assert!(out.contains(" <country rdf:resource=\"#countries/dk\"/>\n"));
    }

    #[test]
    fn test_later_queries_are_anonymous() {
        let extra = "SELECT id, nick FROM nicknames";
        let nicks = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::Integer),
            ColumnMeta::new("nick", SqlType::VarChar),
        ])
        .with_row(vec![Value::Int(1), "Al".into()]);
        let db = FakeDb::default()
            .result(PERSON_SQL, people())
            .result(extra, nicks);
        let config = person_config()
            .with("person.class", "foaf:Person")
            .with("person.query2", extra);
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_table("person")
        });
        assert!(out.contains("<foaf:Person rdf:about=\"#person/2\">"));
        assert!(out.contains(
            "<rdf:Description rdf:about=\"#person/1\">\n <nick>Al</nick>\n</rdf:Description>\n"
        ));
    }

    #[test]
    fn test_identifier_uses_having_without_key() {
        let patched = "SELECT id, name FROM person HAVING id='2' ORDER BY id";
        let db = FakeDb::default().result(patched, people());
        let config = person_config();
        export(
            &db,
            &config,
            ExportSessionBuilder::new().with_identifier("2"),
            |s| s.export_table("person"),
        );
        assert_eq!(db.executed.borrow().as_slice(), [patched]);
    }

    #[test]
    fn test_identifier_uses_where_with_key() {
        let patched = "SELECT id, name FROM person WHERE person.id='O''Neil' ORDER BY id";
        let db = FakeDb::default().result(patched, people());
        let config = person_config().with("person.key", "person.id");
        export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_table_with("person", Some("O'Neil"))
        });
        assert_eq!(db.executed.borrow().as_slice(), [patched]);
    }

    #[test]
    fn test_attribute_table() {
        let sql = "SELECT id, name, value, datatype, lang FROM attrs";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::VarChar),
            ColumnMeta::new("name", SqlType::VarChar),
            ColumnMeta::new("value", SqlType::VarChar),
            ColumnMeta::new("datatype", SqlType::VarChar),
            ColumnMeta::new("lang", SqlType::VarChar),
        ])
        .with_row(vec!["1".into(), "hasNumber".into(), "1366".into(), "xsd:int".into(), Value::Null])
        .with_row(vec!["1".into(), "hello".into(), "Welt".into(), Value::Null, "de".into()])
        .with_row(vec!["1".into(), "country".into(), "dk".into(), Value::Null, Value::Null])
        .with_row(vec!["2".into(), "note".into(), Value::Null, Value::Null, Value::Null]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc")
            .with("objectproperty.country", "countries")
            .with("thing.attributetable", sql);
        let mut count = 0;
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            count = s.export_table("thing")?;
            Ok(count)
        });
        assert_eq!(count, 2);
        assert!(out.contains(
            "<Thing rdf:about=\"#thing/1\">\n \
             <hasNumber rdf:datatype=\"http://www.w3.org/2001/XMLSchema#int\">1366</hasNumber>\n \
             <hello xml:lang=\"de\">Welt</hello>\n \
             <country rdf:resource=\"#countries/dk\"/>\n\
             </Thing>\n\
             <Thing rdf:about=\"#thing/2\">\n</Thing>\n"
        ));
    }

    #[test]
    fn test_attribute_table_width_is_checked() {
        let sql = "SELECT id, name, value FROM attrs";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::VarChar),
            ColumnMeta::new("name", SqlType::VarChar),
            ColumnMeta::new("value", SqlType::VarChar),
        ])
        .with_row(vec!["1".into(), "a".into(), "b".into()]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc")
            .with("thing.attributetable", sql);

        let mut out = Vec::new();
        let mut session = ExportSessionBuilder::new().build(&db, &config, &mut out).unwrap();
        let err = session.export_table("thing").unwrap_err();
        match err {
            Error::MalformedAttributeTable(e) => assert_eq!(e.columns, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_attribute_table_null_name_fails() {
        let sql = "SELECT * FROM attrs";
        let rows = RowSet::new(
            ["id", "name", "value", "datatype", "lang"]
                .iter()
                .map(|c| ColumnMeta::new(*c, SqlType::VarChar))
                .collect(),
        )
        .with_row(vec!["1".into(), Value::Null, "x".into(), Value::Null, Value::Null]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc")
            .with("thing.attributetable", sql);

        let mut out = Vec::new();
        let mut session = ExportSessionBuilder::new().build(&db, &config, &mut out).unwrap();
        assert!(matches!(
            session.export_table("thing"),
            Err(Error::MalformedAttributeTable(_))
        ));
    }

    #[test]
    fn test_ordinal_identifiers() {
        let sql = "SELECT '@' AS id, word FROM words";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::VarChar),
            ColumnMeta::new("word", SqlType::VarChar),
        ])
        .with_row(vec!["@".into(), "a".into()])
        .with_row(vec!["@".into(), "b".into()]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc")
            .with("words.query", sql);
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_table("words")
        });
        assert!(out.contains("<Words rdf:about=\"#words/1\">\n <word>a</word>\n</Words>\n"));
        assert!(out.contains("<Words rdf:about=\"#words/2\">\n <word>b</word>\n</Words>\n"));
    }

    #[test]
    fn test_null_identifier_absorbs_rows() {
        let sql = "SELECT id, name FROM odd";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::VarChar),
            ColumnMeta::new("name", SqlType::VarChar),
        ])
        .with_row(vec![Value::Null, "a".into()])
        .with_row(vec!["2".into(), "b".into()]);
        let db = FakeDb::default().result(sql, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc")
            .with("odd.query", sql);
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_table("odd")
        });
        assert!(out.contains(
            "<Odd rdf:about=\"#odd\">\n <name>a</name>\n <name>b</name>\n</Odd>\n"
        ));
    }

    #[test]
    fn test_document_information() {
        let doc = "SELECT 'doc' AS id, 'Dump' AS \"dcterms:title\"";
        let rows = RowSet::new(vec![
            ColumnMeta::new("id", SqlType::VarChar),
            ColumnMeta::new("dcterms:title", SqlType::VarChar),
        ])
        .with_row(vec!["doc".into(), "Dump".into()]);
        let db = FakeDb::default().result(doc, rows);
        let config = Config::new()
            .with("vocabulary", "http://voc")
            .with("xmlns.dcterms", "http://purl.org/dc/terms/")
            .with("class", "foaf:Document")
            .with("query", doc);
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_document_information()
        });
        assert!(out.contains(
            "<foaf:Document rdf:about=\"#/doc\">\n <dcterms:title>Dump</dcterms:title>\n</foaf:Document>\n"
        ));
    }

    #[test]
    fn test_empty_export_still_writes_document() {
        let db = FakeDb::default();
        let config = Config::new().with("vocabulary", "http://voc");
        let out = export(
            &db,
            &config,
            ExportSessionBuilder::new().with_notation(Notation::JsonLd),
            |s| s.export_all_tables(),
        );
        assert!(out.starts_with("{\"@context\":"));
        assert!(out.ends_with("\n]}\n"));
    }

    #[test]
    fn test_missing_vocabulary() {
        let db = FakeDb::default();
        let config = Config::new();
        let mut out = Vec::new();
        let err = ExportSessionBuilder::new()
            .build(&db, &config, &mut out)
            .err()
            .unwrap();
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::MissingVocabulary));
    }

    #[test]
    fn test_only_utf8_output() {
        let db = FakeDb::default();
        let config = person_config();
        let mut out = Vec::new();
        let err = ExportSessionBuilder::new()
            .with_encoding("ISO-8859-1")
            .build(&db, &config, &mut out)
            .err()
            .unwrap();
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::UnsupportedEncoding));
    }

    #[test]
    fn test_table_vocabulary_before_header() {
        let db = FakeDb::default().result(PERSON_SQL, people());
        let config = person_config().with("person.vocabulary", "http://people#");
        let out = export(&db, &config, ExportSessionBuilder::new(), |s| {
            s.export_table("person")
        });
        assert!(out.contains(" xmlns=\"http://people#\">"));
    }

    #[test]
    fn test_table_vocabulary_after_header_fails() {
        let db = FakeDb::default().result(PERSON_SQL, people());
        let config = person_config().with("animal.vocabulary", "http://animals#");
        let mut out = Vec::new();
        let mut session = ExportSessionBuilder::new().build(&db, &config, &mut out).unwrap();
        session.export_table("person").unwrap();
        assert!(session.export_table("animal").unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_database_error_carries_sql() {
        let db = FakeDb::default();
        let config = person_config();
        let mut out = Vec::new();
        let mut session = ExportSessionBuilder::new().build(&db, &config, &mut out).unwrap();
        match session.export_table("person").unwrap_err() {
            Error::Database(e) => assert_eq!(e.sql.as_deref(), Some(PERSON_SQL)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_builder_entry_point() {
        let db = FakeDb::default().result(PERSON_SQL, people());
        let config = person_config();
        let out = export(&db, &config, ExportSession::builder(), |s| {
            s.export_table("person")
        });
        assert!(out.contains("#person/2"));
    }

    #[test]
    fn test_check_attribute_width() {
        assert!(check_attribute_width(5).is_ok());
        assert!(check_attribute_width(9).is_ok());
        assert!(check_attribute_width(1).is_err());
        assert!(check_attribute_width(4).is_err());
        assert!(check_attribute_width(6).is_err());
    }
}
