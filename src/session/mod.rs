// ABOUTME: Database session abstraction used by the initializer and dump engine
// ABOUTME: Exposes the small set of catalog operations both components rely on

pub mod memory;

use crate::dump::SqlValue;
use crate::error::Result;
use async_trait::async_trait;

pub use memory::MemorySession;

/// Column names and rows from one `SELECT *`
///
/// Both halves come from the same result set, so `columns[i]` always
/// names the value at position `i` of every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl TableRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Operations the tool needs from a relational database
///
/// Implementations classify their own failures: connectivity problems map
/// to `BackupError::Connection`, a missing table to `BackupError::NotFound`,
/// and rejected DDL to `BackupError::Schema`.
#[async_trait]
pub trait Session: Send {
    /// Execute a statement that returns no rows
    async fn execute(&mut self, sql: &str) -> Result<()>;

    /// Tables in the current database, in catalog order
    async fn list_tables(&mut self) -> Result<Vec<String>>;

    /// The engine-native statement that recreates `table`
    async fn show_create_table(&mut self, table: &str) -> Result<String>;

    /// Every row of `table` with the column names of the same result
    async fn fetch_table(&mut self, table: &str) -> Result<TableRows>;

    async fn count_rows(&mut self, table: &str) -> Result<u64>;

    async fn server_version(&mut self) -> Result<String>;
}
