// ABOUTME: Error taxonomy shared by the schema initializer and dump engine
// ABOUTME: Classifies driver failures into connection, schema, lookup, query, and I/O errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by provisioning and dump operations
///
/// None of these are retried. Every variant carries enough context (table,
/// statement, driver message) to diagnose the failure from the log alone.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Server unreachable, credentials rejected, or the link dropped mid-run
    #[error("Connection error: {0}")]
    Connection(String),

    /// A DDL statement was rejected by the server
    #[error("Schema error while executing `{statement}`: {message}")]
    Schema {
        statement: String,
        /// Server error code, when the server supplied one
        code: Option<u16>,
        message: String,
    },

    /// A table vanished between enumeration and capture
    #[error("Table '{table}' not found: {message}")]
    NotFound { table: String, message: String },

    /// A read was rejected by the server (permissions, malformed result)
    #[error("Query failed for {context}: {message}")]
    Query { context: String, message: String },

    /// The output artifact could not be opened or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `Can't create database; database exists`
pub const ER_DB_CREATE_EXISTS: u16 = 1007;
/// `Table already exists`
pub const ER_TABLE_EXISTS_ERROR: u16 = 1050;
/// `Table doesn't exist`
pub const ER_NO_SUCH_TABLE: u16 = 1146;

pub type Result<T> = std::result::Result<T, BackupError>;

impl BackupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BackupError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the server refused a CREATE because the object already exists
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            BackupError::Schema {
                code: Some(ER_DB_CREATE_EXISTS | ER_TABLE_EXISTS_ERROR),
                ..
            }
        )
    }

    /// True for errors caused by the database link rather than by a statement
    pub fn is_connection(&self) -> bool {
        matches!(self, BackupError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = BackupError::NotFound {
            table: "github_repo".to_string(),
            message: "Table 'githubstars.github_repo' doesn't exist".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("github_repo"));
        assert!(msg.contains("doesn't exist"));

        let err = BackupError::Schema {
            statement: "CREATE TABLE x".to_string(),
            code: Some(1064),
            message: "syntax error".to_string(),
        };
        assert!(err.to_string().contains("CREATE TABLE x"));
        assert!(!err.is_connection());
        assert!(!err.is_already_exists());
    }

    #[test]
    fn test_already_exists_codes() {
        for code in [ER_DB_CREATE_EXISTS, ER_TABLE_EXISTS_ERROR] {
            let err = BackupError::Schema {
                statement: "CREATE".to_string(),
                code: Some(code),
                message: "exists".to_string(),
            };
            assert!(err.is_already_exists());
        }
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = BackupError::io(
            "/tmp/out.sql",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out.sql"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
