//! SQL column types as reported by the database catalog.

use std::fmt;

/// SQL data types known to the exporter.
///
/// The numeric codes follow the JDBC `java.sql.Types` numbering that database
/// catalogs commonly report, so metadata from any driver can be mapped onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SqlType {
    BigInt,
    Binary,
    Bit,
    Blob,
    Boolean,
    Char,
    Clob,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    LongNVarChar,
    LongVarBinary,
    LongVarChar,
    NChar,
    NClob,
    Numeric,
    NVarChar,
    Real,
    SmallInt,
    Time,
    Timestamp,
    TinyInt,
    VarBinary,
    VarChar,
    /// A type code with no named mapping
    Other(i32),
}

impl SqlType {
    /// Every named type, in alphabetical order of its name.
    pub const KNOWN: [SqlType; 26] = [
        SqlType::BigInt,
        SqlType::Binary,
        SqlType::Bit,
        SqlType::Blob,
        SqlType::Boolean,
        SqlType::Char,
        SqlType::Clob,
        SqlType::Date,
        SqlType::Decimal,
        SqlType::Double,
        SqlType::Float,
        SqlType::Integer,
        SqlType::LongNVarChar,
        SqlType::LongVarBinary,
        SqlType::LongVarChar,
        SqlType::NChar,
        SqlType::NClob,
        SqlType::Numeric,
        SqlType::NVarChar,
        SqlType::Real,
        SqlType::SmallInt,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::TinyInt,
        SqlType::VarBinary,
        SqlType::VarChar,
    ];

    /// The lower-case type name used in `datatype.<name>` configuration keys.
    pub fn name(self) -> &'static str {
        match self {
            SqlType::BigInt => "bigint",
            SqlType::Binary => "binary",
            SqlType::Bit => "bit",
            SqlType::Blob => "blob",
            SqlType::Boolean => "boolean",
            SqlType::Char => "char",
            SqlType::Clob => "clob",
            SqlType::Date => "date",
            SqlType::Decimal => "decimal",
            SqlType::Double => "double",
            SqlType::Float => "float",
            SqlType::Integer => "integer",
            SqlType::LongNVarChar => "longnvarchar",
            SqlType::LongVarBinary => "longvarbinary",
            SqlType::LongVarChar => "longvarchar",
            SqlType::NChar => "nchar",
            SqlType::NClob => "nclob",
            SqlType::Numeric => "numeric",
            SqlType::NVarChar => "nvarchar",
            SqlType::Real => "real",
            SqlType::SmallInt => "smallint",
            SqlType::Time => "time",
            SqlType::Timestamp => "timestamp",
            SqlType::TinyInt => "tinyint",
            SqlType::VarBinary => "varbinary",
            SqlType::VarChar => "varchar",
            SqlType::Other(_) => "other",
        }
    }

    /// Look up a type by name, ignoring case.
    pub fn from_name(name: &str) -> Option<SqlType> {
        let name = name.trim();
        Self::KNOWN
            .iter()
            .copied()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
    }

    /// Numeric type code.
    pub fn code(self) -> i32 {
        match self {
            SqlType::BigInt => -5,
            SqlType::Binary => -2,
            SqlType::Bit => -7,
            SqlType::Blob => 2004,
            SqlType::Boolean => 16,
            SqlType::Char => 1,
            SqlType::Clob => 2005,
            SqlType::Date => 91,
            SqlType::Decimal => 3,
            SqlType::Double => 8,
            SqlType::Float => 6,
            SqlType::Integer => 4,
            SqlType::LongNVarChar => -16,
            SqlType::LongVarBinary => -4,
            SqlType::LongVarChar => -1,
            SqlType::NChar => -15,
            SqlType::NClob => 2011,
            SqlType::Numeric => 2,
            SqlType::NVarChar => -9,
            SqlType::Real => 7,
            SqlType::SmallInt => 5,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::TinyInt => -6,
            SqlType::VarBinary => -3,
            SqlType::VarChar => 12,
            SqlType::Other(code) => code,
        }
    }

    /// Map a numeric type code back to a type, keeping unknown codes as `Other`.
    pub fn from_code(code: i32) -> SqlType {
        Self::KNOWN
            .iter()
            .copied()
            .find(|ty| ty.code() == code)
            .unwrap_or(SqlType::Other(code))
    }

    /// Whether values of this type are character data.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::VarChar
                | SqlType::LongVarChar
                | SqlType::NChar
                | SqlType::NVarChar
                | SqlType::LongNVarChar
                | SqlType::Clob
                | SqlType::NClob
        )
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Other(code) => write!(f, "other({})", code),
            ty => f.write_str(ty.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(SqlType::from_name("VARCHAR"), Some(SqlType::VarChar));
        assert_eq!(SqlType::from_name("Timestamp"), Some(SqlType::Timestamp));
        assert_eq!(SqlType::from_name("datetime"), None);
    }

    #[test]
    fn test_code_round_trip_for_known_types() {
        for ty in SqlType::KNOWN {
            assert_eq!(SqlType::from_code(ty.code()), ty, "{}", ty);
        }
        assert_eq!(SqlType::from_code(1111), SqlType::Other(1111));
        assert_eq!(SqlType::Other(1111).code(), 1111);
    }

    #[test]
    fn test_known_names_are_sorted() {
        let names: Vec<&str> = SqlType::KNOWN.iter().map(|t| t.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
