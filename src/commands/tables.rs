// ABOUTME: Tables command: read-only listing of catalog tables and row counts
// ABOUTME: Shows what a dump would contain, in the order it would be written

use crate::config::ConnectionConfig;
use crate::dump::list_tables;
use crate::mysql::MySqlSession;
use crate::session::Session;
use anyhow::{Context, Result};

/// Table name and its current row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub name: String,
    pub rows: u64,
}

/// Count rows of every table, in catalog order
pub async fn count_tables<S: Session + ?Sized>(session: &mut S) -> Result<Vec<TableCount>> {
    let names = list_tables(session)
        .await
        .context("Failed to list tables")?;

    let mut counts = Vec::with_capacity(names.len());
    for name in names {
        let rows = session
            .count_rows(&name)
            .await
            .with_context(|| format!("Failed to count rows in '{}'", name))?;
        counts.push(TableCount { name, rows });
    }
    Ok(counts)
}

/// Print the tables a dump would export, with their row counts
pub async fn tables(config: &ConnectionConfig) -> Result<()> {
    let mut session = MySqlSession::connect(config)
        .await
        .context("Failed to connect to database")?;

    let result = count_tables(&mut session).await;
    session.close().await;
    let counts = result?;

    if counts.is_empty() {
        tracing::warn!("⚠ No tables found in '{}'", config.database);
        return Ok(());
    }

    println!();
    println!("{:<30} {:>10}", "Table", "Rows");
    println!("{}", "─".repeat(41));
    for table in &counts {
        println!("{:<30} {:>10}", table.name, table.rows);
    }
    println!("{}", "─".repeat(41));
    println!(
        "{} table(s), {} row(s) total",
        counts.len(),
        counts.iter().map(|t| t.rows).sum::<u64>()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::SqlValue;
    use crate::session::MemorySession;

    #[tokio::test]
    async fn test_count_tables_in_catalog_order() {
        let mut session = MemorySession::new()
            .with_table(
                "sync_log",
                "CREATE TABLE `sync_log` (`id` bigint)",
                &["id"],
                vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]],
            )
            .with_table("github_repo", "CREATE TABLE `github_repo` (`id` bigint)", &["id"], vec![]);

        let counts = count_tables(&mut session).await.unwrap();
        assert_eq!(
            counts,
            vec![
                TableCount {
                    name: "sync_log".to_string(),
                    rows: 2
                },
                TableCount {
                    name: "github_repo".to_string(),
                    rows: 0
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_count_tables_reports_vanished_table() {
        let mut session = MemorySession::new().with_phantom_table("gone");
        let err = count_tables(&mut session).await.unwrap_err();
        assert!(err.to_string().contains("gone"));
    }
}
