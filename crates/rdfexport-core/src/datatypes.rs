//! Mapping from SQL types to RDF literal datatypes, and value formatting.
//!
//! A [`Datatypes`] registry is an ordinary value built per export from the
//! configuration; overrides from `datatype.<name>` keys win over the defaults.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::Result;
use crate::types::SqlType;
use crate::value::Value;

pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Default RDF datatype of a SQL type. `""` means plain literal.
fn default_rdf_type(ty: SqlType) -> Option<&'static str> {
    let rdf = match ty {
        SqlType::BigInt | SqlType::Integer => "xsd:integer",
        SqlType::Bit | SqlType::SmallInt | SqlType::TinyInt => "xsd:int",
        SqlType::Boolean => "xsd:boolean",
        SqlType::Date => "xsd:date",
        SqlType::Decimal | SqlType::Numeric | SqlType::Real => "xsd:decimal",
        SqlType::Double => "xsd:double",
        SqlType::Float => "xsd:float",
        SqlType::Time => "xsd:time",
        SqlType::Timestamp => "xsd:dateTime",
        SqlType::Binary
        | SqlType::Blob
        | SqlType::Char
        | SqlType::Clob
        | SqlType::LongNVarChar
        | SqlType::LongVarBinary
        | SqlType::LongVarChar
        | SqlType::NChar
        | SqlType::NClob
        | SqlType::NVarChar
        | SqlType::VarBinary
        | SqlType::VarChar => "",
        SqlType::Other(_) => return None,
    };
    Some(rdf)
}

/// SQL type to RDF datatype registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatypes {
    rdf_types: HashMap<SqlType, String>,
}

impl Default for Datatypes {
    fn default() -> Self {
        Self::new()
    }
}

impl Datatypes {
    /// Registry holding only the built-in defaults.
    pub fn new() -> Self {
        let rdf_types = SqlType::KNOWN
            .iter()
            .filter_map(|&ty| default_rdf_type(ty).map(|rdf| (ty, rdf.to_string())))
            .collect();
        Self { rdf_types }
    }

    /// Defaults with every `datatype.<name>` override from `config` applied.
    pub fn from_config(config: &Config) -> Self {
        let mut datatypes = Self::new();
        for (name, rdf) in config.datatype_overrides() {
            match SqlType::from_name(name) {
                Some(ty) => datatypes.set_rdf_type(ty, rdf),
                None => tracing::warn!(
                    sql_type = name,
                    rdf_type = rdf,
                    "Ignoring datatype override for unknown SQL type"
                ),
            }
        }
        datatypes
    }

    /// Numeric type code for a SQL type name.
    pub fn sql_type_code(name: &str) -> Option<i32> {
        SqlType::from_name(name).map(SqlType::code)
    }

    /// RDF datatype for a SQL type; `None` when the type has no mapping.
    pub fn rdf_type(&self, ty: SqlType) -> Option<&str> {
        self.rdf_types.get(&ty).map(String::as_str)
    }

    /// Override the datatype of a SQL type. Last write wins.
    pub fn set_rdf_type(&mut self, ty: SqlType, rdf: impl Into<String>) {
        self.rdf_types.insert(ty, rdf.into());
    }
}

/// Text form of a cell value as it appears in the output.
///
/// Dates become `yyyy-MM-dd`, timestamps `yyyy-MM-ddTHH:mm:ss` without zone or
/// fraction, binary values are decoded as UTF-8, and NULL becomes `""`.
pub fn format_value(value: &Value) -> Result<String> {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::TinyInt(v) => v.to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::BigInt(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::Decimal(s) | Value::Text(s) => s.clone(),
        Value::Bytes(bytes) => String::from_utf8(bytes.clone())?,
        Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        Value::Time(t) => t.format(TIME_FORMAT).to_string(),
        Value::Timestamp(ts) => ts.format(DATE_TIME_FORMAT).to_string(),
    };
    Ok(text)
}

/// Expand an `xsd:` prefixed datatype to its full IRI; other datatypes are returned unchanged.
pub fn expand_datatype(datatype: &str) -> String {
    match datatype.strip_prefix("xsd:") {
        Some(local) => format!("{XSD_NAMESPACE}{local}"),
        None => datatype.to_string(),
    }
}
