//! SQLite declared types and cell values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::ValueRef;

use rdfexport_core::{Result, SqlType, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S%.f";
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Map a declared column type to a SQL type.
///
/// Well-known names map directly; anything else follows SQLite's affinity
/// rules. An empty declaration has no type.
pub fn declared_type(decl: &str) -> Option<SqlType> {
    let upper = decl.trim().to_ascii_uppercase();
    let base = upper.split('(').next().unwrap_or_default().trim();
    if base.is_empty() {
        return None;
    }

    let ty = match base {
        "BOOLEAN" | "BOOL" => SqlType::Boolean,
        "DATE" => SqlType::Date,
        "TIME" => SqlType::Time,
        "DATETIME" | "TIMESTAMP" => SqlType::Timestamp,
        "DECIMAL" => SqlType::Decimal,
        "NUMERIC" => SqlType::Numeric,
        "FLOAT" => SqlType::Float,
        "REAL" => SqlType::Real,
        "CLOB" | "TEXT" => SqlType::Clob,
        "BLOB" => SqlType::Blob,
        _ => {
            if let Some(known) = SqlType::from_name(base) {
                known
            } else if base.contains("INT") {
                SqlType::Integer
            } else if base.contains("CHAR") || base.contains("CLOB") || base.contains("TEXT") {
                SqlType::VarChar
            } else if base.contains("BLOB") {
                SqlType::Blob
            } else if base.contains("REAL") || base.contains("FLOA") || base.contains("DOUB") {
                SqlType::Double
            } else {
                SqlType::Numeric
            }
        }
    };
    Some(ty)
}

/// Type of an untyped (expression) column, from the first non-NULL value.
pub fn inferred_type<'a>(mut values: impl Iterator<Item = &'a Value>) -> SqlType {
    match values.find(|v| !v.is_null()) {
        Some(Value::Bool(_)) => SqlType::Boolean,
        Some(Value::BigInt(_) | Value::Int(_) | Value::SmallInt(_) | Value::TinyInt(_)) => {
            SqlType::BigInt
        }
        Some(Value::Double(_) | Value::Float(_)) => SqlType::Double,
        Some(Value::Bytes(_)) => SqlType::Blob,
        _ => SqlType::VarChar,
    }
}

/// Convert a SQLite cell, using the declared type where the storage class is ambiguous.
///
/// Text in a DATE, TIME or TIMESTAMP column is parsed when it has the ISO form;
/// otherwise it stays text.
pub fn read_value(cell: ValueRef<'_>, ty: Option<SqlType>) -> Result<Value> {
    let value = match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => match ty {
            Some(SqlType::Boolean) => Value::Bool(i != 0),
            Some(SqlType::Decimal | SqlType::Numeric) => Value::Decimal(i.to_string()),
            _ => Value::BigInt(i),
        },
        ValueRef::Real(f) => match ty {
            Some(SqlType::Decimal | SqlType::Numeric) => Value::Decimal(f.to_string()),
            _ => Value::Double(f),
        },
        ValueRef::Text(bytes) => temporal(String::from_utf8(bytes.to_vec())?, ty),
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    };
    Ok(value)
}

fn temporal(text: String, ty: Option<SqlType>) -> Value {
    match ty {
        Some(SqlType::Date) => match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
            Ok(date) => Value::Date(date),
            Err(_) => Value::Text(text),
        },
        Some(SqlType::Time) => match NaiveTime::parse_from_str(&text, TIME_FORMAT) {
            Ok(time) => Value::Time(time),
            Err(_) => Value::Text(text),
        },
        Some(SqlType::Timestamp) => TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
            .map_or(Value::Text(text), Value::Timestamp),
        _ => Value::Text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type() {
        assert_eq!(declared_type("INTEGER"), Some(SqlType::Integer));
        assert_eq!(declared_type("bigint"), Some(SqlType::BigInt));
        assert_eq!(declared_type("VARCHAR(40)"), Some(SqlType::VarChar));
        assert_eq!(declared_type("DECIMAL(10, 2)"), Some(SqlType::Decimal));
        assert_eq!(declared_type("UNSIGNED BIG INT"), Some(SqlType::Integer));
        assert_eq!(declared_type("NATIVE CHARACTER(70)"), Some(SqlType::VarChar));
        assert_eq!(declared_type("DOUBLE PRECISION"), Some(SqlType::Double));
        assert_eq!(declared_type("DATETIME"), Some(SqlType::Timestamp));
        assert_eq!(declared_type("TEXT"), Some(SqlType::Clob));
        assert_eq!(declared_type("WHATEVER"), Some(SqlType::Numeric));
        assert_eq!(declared_type(""), None);
    }

    #[test]
    fn test_read_value() {
        assert_eq!(read_value(ValueRef::Null, None).unwrap(), Value::Null);
        assert_eq!(
            read_value(ValueRef::Integer(1), Some(SqlType::Boolean)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            read_value(ValueRef::Integer(5), Some(SqlType::Decimal)).unwrap(),
            Value::Decimal("5".to_string())
        );
        assert_eq!(
            read_value(ValueRef::Text(b"2024-03-01"), Some(SqlType::Date)).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(
            read_value(ValueRef::Text(b"yesterday"), Some(SqlType::Date)).unwrap(),
            Value::Text("yesterday".to_string())
        );
        assert!(read_value(ValueRef::Text(&[0xff, 0xfe]), None).is_err());
    }

    #[test]
    fn test_timestamps_parse_both_separators() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(13, 5, 9)
            .unwrap();
        for text in ["2024-03-01 13:05:09", "2024-03-01T13:05:09", "2024-03-01 13:05:09.000"] {
            assert_eq!(
                read_value(ValueRef::Text(text.as_bytes()), Some(SqlType::Timestamp)).unwrap(),
                Value::Timestamp(expected)
            );
        }
    }

    #[test]
    fn test_inferred_type() {
        let values = [Value::Null, Value::BigInt(3)];
        assert_eq!(inferred_type(values.iter()), SqlType::BigInt);
        assert_eq!(inferred_type([Value::Null].iter()), SqlType::VarChar);
        assert_eq!(inferred_type([Value::Double(0.5)].iter()), SqlType::Double);
    }
}
