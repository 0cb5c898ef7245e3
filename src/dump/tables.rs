// ABOUTME: Table enumeration and DDL capture for the dump engine
// ABOUTME: Preserves catalog order and copies CREATE TABLE text verbatim

use crate::error::Result;
use crate::session::Session;

/// Structure of one table as it will appear in the dump
///
/// `columns` comes from the data query, `ddl` from `SHOW CREATE TABLE`;
/// the DDL is never rebuilt from the column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<String>,
    pub ddl: String,
}

/// List all tables in the current database
///
/// Order is whatever the catalog returns and is kept as-is; every later
/// step processes tables in this order.
pub async fn list_tables<S: Session + ?Sized>(session: &mut S) -> Result<Vec<String>> {
    let tables = session.list_tables().await?;
    tracing::debug!("Catalog lists {} table(s)", tables.len());
    Ok(tables)
}

/// Fetch the statement that recreates `table`
///
/// Fails with `NotFound` if the table disappeared after enumeration.
pub async fn capture_ddl<S: Session + ?Sized>(session: &mut S, table: &str) -> Result<String> {
    let ddl = session.show_create_table(table).await?;
    tracing::debug!("Captured DDL for '{}' ({} bytes)", table, ddl.len());
    Ok(ddl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackupError;
    use crate::session::MemorySession;

    #[tokio::test]
    async fn test_list_tables_keeps_catalog_order() {
        let mut session = MemorySession::new()
            .with_table("sync_log", "CREATE TABLE `sync_log` (`id` bigint)", &["id"], vec![])
            .with_table("github_repo", "CREATE TABLE `github_repo` (`id` bigint)", &["id"], vec![])
            .with_table("a_table", "CREATE TABLE `a_table` (`id` int)", &["id"], vec![]);

        let tables = list_tables(&mut session).await.unwrap();
        assert_eq!(tables, vec!["sync_log", "github_repo", "a_table"]);
    }

    #[tokio::test]
    async fn test_capture_ddl_is_verbatim() {
        let ddl = "CREATE TABLE `t` (\n  `id` int NOT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";
        let mut session = MemorySession::new().with_table("t", ddl, &["id"], vec![]);
        assert_eq!(capture_ddl(&mut session, "t").await.unwrap(), ddl);
    }

    #[tokio::test]
    async fn test_capture_ddl_of_vanished_table_fails() {
        let mut session = MemorySession::new().with_phantom_table("gone");
        let err = capture_ddl(&mut session, "gone").await.unwrap_err();
        match err {
            BackupError::NotFound { table, .. } => assert_eq!(table, "gone"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_tables_on_lost_connection() {
        let mut session = MemorySession::new();
        session.go_offline();
        assert!(list_tables(&mut session).await.unwrap_err().is_connection());
    }
}
