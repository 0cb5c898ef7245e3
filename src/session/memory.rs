// ABOUTME: In-memory session holding tables, DDL, and rows without a server
// ABOUTME: Records executed statements and simulates IF NOT EXISTS creation

use super::{Session, TableRows};
use crate::dump::SqlValue;
use crate::error::{BackupError, Result};
use async_trait::async_trait;

#[derive(Debug, Clone)]
struct MemoryTable {
    name: String,
    ddl: String,
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

/// A [`Session`] backed by plain vectors
///
/// Tables keep insertion order, which stands in for catalog order.
/// `CREATE DATABASE IF NOT EXISTS` and `CREATE TABLE IF NOT EXISTS` are
/// understood well enough to create missing objects and count changes;
/// every other statement is only recorded.
#[derive(Debug, Default)]
pub struct MemorySession {
    databases: Vec<String>,
    tables: Vec<MemoryTable>,
    phantom_tables: Vec<String>,
    rejected: Vec<(String, Option<u16>, String)>,
    executed: Vec<String>,
    schema_changes: usize,
    offline: bool,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with its DDL, column names, and rows
    pub fn with_table(
        mut self,
        name: &str,
        ddl: &str,
        columns: &[&str],
        rows: Vec<Vec<SqlValue>>,
    ) -> Self {
        self.tables.push(MemoryTable {
            name: name.to_string(),
            ddl: ddl.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        });
        self
    }

    /// A table that is listed by the catalog but gone by the time it is read
    pub fn with_phantom_table(mut self, name: &str) -> Self {
        self.phantom_tables.push(name.to_string());
        self
    }

    /// Reject any statement containing `pattern` with a server-style error
    pub fn with_rejected_statement(
        mut self,
        pattern: &str,
        code: Option<u16>,
        message: &str,
    ) -> Self {
        self.rejected
            .push((pattern.to_string(), code, message.to_string()));
        self
    }

    /// Simulate a dropped link: every further call fails with a connection error
    pub fn go_offline(&mut self) {
        self.offline = true;
    }

    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    /// Databases and tables actually created by executed statements
    pub fn schema_changes(&self) -> usize {
        self.schema_changes
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.databases.iter().any(|d| d == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline {
            return Err(BackupError::Connection(
                "Lost connection to server during query".to_string(),
            ));
        }
        Ok(())
    }

    fn table(&self, name: &str) -> Result<&MemoryTable> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| BackupError::NotFound {
                table: name.to_string(),
                message: format!("Table '{}' doesn't exist", name),
            })
    }
}

/// Name between the first pair of backticks following `prefix`
fn created_object_name(sql: &str, prefix: &str) -> Option<String> {
    let trimmed = sql.trim_start();
    if !trimmed.to_ascii_uppercase().starts_with(prefix) {
        return None;
    }
    let rest = &trimmed[prefix.len()..];
    let start = rest.find('`')? + 1;
    let len = rest[start..].find('`')?;
    Some(rest[start..start + len].to_string())
}

#[async_trait]
impl Session for MemorySession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.check_online()?;
        self.executed.push(sql.to_string());

        if let Some((_, code, message)) = self
            .rejected
            .iter()
            .find(|(p, _, _)| sql.contains(p.as_str()))
        {
            return Err(BackupError::Schema {
                statement: sql.trim().to_string(),
                code: *code,
                message: message.clone(),
            });
        }

        if let Some(db) = created_object_name(sql, "CREATE DATABASE IF NOT EXISTS") {
            if !self.has_database(&db) {
                self.databases.push(db);
                self.schema_changes += 1;
            }
        } else if let Some(table) = created_object_name(sql, "CREATE TABLE IF NOT EXISTS") {
            if !self.has_table(&table) {
                self.tables.push(MemoryTable {
                    name: table,
                    ddl: sql.trim().trim_end_matches(';').to_string(),
                    columns: Vec::new(),
                    rows: Vec::new(),
                });
                self.schema_changes += 1;
            }
        }
        Ok(())
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        self.check_online()?;
        Ok(self
            .tables
            .iter()
            .map(|t| t.name.clone())
            .chain(self.phantom_tables.iter().cloned())
            .collect())
    }

    async fn show_create_table(&mut self, table: &str) -> Result<String> {
        self.check_online()?;
        Ok(self.table(table)?.ddl.clone())
    }

    async fn fetch_table(&mut self, table: &str) -> Result<TableRows> {
        self.check_online()?;
        let t = self.table(table)?;
        Ok(TableRows {
            columns: t.columns.clone(),
            rows: t.rows.clone(),
        })
    }

    async fn count_rows(&mut self, table: &str) -> Result<u64> {
        self.check_online()?;
        Ok(self.table(table)?.rows.len() as u64)
    }

    async fn server_version(&mut self) -> Result<String> {
        self.check_online()?;
        Ok("8.0.36-memory".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_if_not_exists_counts_once() {
        let mut session = MemorySession::new();
        let ddl = "CREATE TABLE IF NOT EXISTS `t` (`id` INT)";
        session.execute(ddl).await.unwrap();
        session.execute(ddl).await.unwrap();
        assert_eq!(session.schema_changes(), 1);
        assert!(session.has_table("t"));
        assert_eq!(session.executed().len(), 2);
    }

    #[tokio::test]
    async fn test_phantom_table_is_listed_but_missing() {
        let mut session = MemorySession::new().with_phantom_table("gone");
        assert_eq!(session.list_tables().await.unwrap(), vec!["gone"]);
        let err = session.show_create_table("gone").await.unwrap_err();
        assert!(matches!(err, BackupError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_offline_session_reports_connection_error() {
        let mut session = MemorySession::new();
        session.go_offline();
        let err = session.list_tables().await.unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_created_object_name() {
        assert_eq!(
            created_object_name("  create table if not exists `a` (x int)", "CREATE TABLE IF NOT EXISTS"),
            Some("a".to_string())
        );
        assert_eq!(created_object_name("SELECT 1", "CREATE TABLE IF NOT EXISTS"), None);
    }
}
