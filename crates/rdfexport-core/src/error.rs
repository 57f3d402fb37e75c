//! Error types shared by every RDFExport crate.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::string::FromUtf8Error;

/// The main error type for discovery and export.
#[derive(Debug)]
pub enum Error {
    /// Configuration error (missing vocabulary, bad encoding, unknown notation)
    Config(ConfigError),
    /// An operation was called in the wrong lifecycle phase
    InvalidState(String),
    /// Failure reported by the relational-access collaborator
    Database(DatabaseError),
    /// Attribute-table result that is not `1 + 4k` columns wide or lacks a property name
    MalformedAttributeTable(AttributeTableError),
    /// Binary value that is not valid UTF-8
    Decode(FromUtf8Error),
    /// Output sink failure
    Io(io::Error),
    /// JSON serialization failure
    Json(serde_json::Error),
}

#[derive(Debug)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// No vocabulary in effect for a table
    MissingVocabulary,
    /// Output encoding other than UTF-8
    UnsupportedEncoding,
    /// Unknown serialization notation name
    UnknownNotation,
    /// Any other unusable configuration value
    Invalid,
}

#[derive(Debug)]
pub struct DatabaseError {
    pub message: String,
    /// SQL text that failed, when the failure came from running a statement
    pub sql: Option<String>,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTableError {
    /// Column count of the offending result
    pub columns: usize,
    pub message: String,
}

impl Error {
    /// Build a configuration error.
    pub fn config(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Error::Config(ConfigError {
            kind,
            message: message.into(),
        })
    }

    /// Build an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Error::InvalidState(message.into())
    }

    /// Build a data-access error without an underlying cause.
    pub fn database(message: impl Into<String>) -> Self {
        Error::Database(DatabaseError {
            message: message.into(),
            sql: None,
            source: None,
        })
    }

    /// Wrap a driver error as a data-access failure.
    pub fn database_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Database(DatabaseError {
            message: message.into(),
            sql: None,
            source: Some(Box::new(source)),
        })
    }

    pub fn malformed_attribute_table(columns: usize, message: impl Into<String>) -> Self {
        Error::MalformedAttributeTable(AttributeTableError {
            columns,
            message: message.into(),
        })
    }

    /// Attach the failing SQL statement to a data-access error.
    #[must_use]
    pub fn with_sql(self, sql: impl Into<String>) -> Self {
        match self {
            Error::Database(mut err) => {
                err.sql = Some(sql.into());
                Error::Database(err)
            }
            other => other,
        }
    }

    /// The configuration error kind, if this is a configuration error.
    pub fn config_kind(&self) -> Option<ConfigErrorKind> {
        match self {
            Error::Config(err) => Some(err.kind),
            _ => None,
        }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(err) => write!(f, "configuration error: {}", err),
            Error::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            Error::Database(err) => write!(f, "data access error: {}", err),
            Error::MalformedAttributeTable(err) => {
                write!(f, "malformed attribute table: {}", err)
            }
            Error::Decode(err) => write!(f, "utf-8 error: {}", err),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(sql) = &self.sql {
            write!(f, " (sql: {})", sql)?;
        }
        Ok(())
    }
}

impl fmt::Display for AttributeTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} columns)", self.message, self.columns)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Database(err) => err
                .source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
            Error::Decode(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl StdError for ConfigError {}
impl StdError for DatabaseError {}
impl StdError for AttributeTableError {}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Self {
        Error::Decode(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// Result type alias for RDFExport operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_sql_only_touches_database_errors() {
        let err = Error::database("table vanished").with_sql("SELECT * FROM gone");
        assert_eq!(
            err.to_string(),
            "data access error: table vanished (sql: SELECT * FROM gone)"
        );

        let err = Error::invalid_state("late").with_sql("SELECT 1");
        assert_eq!(err.to_string(), "invalid state: late");
    }

    #[test]
    fn test_config_kind() {
        let err = Error::config(ConfigErrorKind::UnsupportedEncoding, "Only UTF-8 is supported!");
        assert_eq!(err.config_kind(), Some(ConfigErrorKind::UnsupportedEncoding));
        assert_eq!(err.to_string(), "configuration error: Only UTF-8 is supported!");
        assert!(Error::database("x").config_kind().is_none());
    }

    #[test]
    fn test_decode_source() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: Error = bad.into();
        assert!(err.source().is_some());
        assert!(matches!(err, Error::Decode(_)));
    }
}
