// ABOUTME: Dump command: exports schema and data of the catalog to a SQL file
// ABOUTME: Owns the output file and connection lifetime and prints the final summary

use crate::config::AppConfig;
use crate::dump::{write_dump, ArtifactWriter, DumpOptions, DumpSummary};
use crate::error::BackupError;
use crate::mysql::MySqlSession;
use crate::session::Session;
use crate::utils::{file_checksum, format_file_size};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write the dump of `session`'s database to `path`
///
/// The file is created (or truncated) up front. On failure it is left in
/// place, truncated, and must not be replayed.
pub async fn dump_to_file<S: Session + ?Sized>(
    session: &mut S,
    options: &DumpOptions,
    path: &Path,
) -> Result<DumpSummary> {
    let file = File::create(path).map_err(|e| BackupError::io(path, e))?;
    let mut out = ArtifactWriter::new(BufWriter::new(file), path);

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner} {pos} table(s) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );

    let result = write_dump(session, &mut out, options, |report| {
        progress.inc(1);
        progress.set_message(format!("exported {} ({} rows)", report.name, report.rows));
    })
    .await;

    match &result {
        Ok(_) => progress.finish_with_message("export complete"),
        Err(_) => progress.abandon_with_message("export failed"),
    }

    result.with_context(|| {
        format!(
            "Dump of '{}' failed; {} is incomplete and must be discarded",
            options.database,
            path.display()
        )
    })
}

/// Export the configured database to the configured output file
///
/// Connects once, writes the artifact, disconnects whatever the outcome,
/// then prints table count, per-table row counts, file size, and SHA-256.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use stars_backup::commands::dump;
/// # use stars_backup::config::AppConfig;
/// # async fn example() -> Result<()> {
/// let summary = dump(&AppConfig::default()).await?;
/// println!("{} tables exported", summary.table_count());
/// # Ok(())
/// # }
/// ```
pub async fn dump(config: &AppConfig) -> Result<DumpSummary> {
    let conn_config = &config.connection;
    let output = &config.dump.output;

    println!("{}", "=".repeat(50));
    println!("GitHub Stars database export");
    println!("{}", "=".repeat(50));

    tracing::info!(
        "Exporting '{}' to {}",
        conn_config.database,
        output.display()
    );

    let mut session = MySqlSession::connect(conn_config)
        .await
        .context("Failed to connect to source database")?;

    let options = DumpOptions::from_config(conn_config);
    let result = dump_to_file(&mut session, &options, output).await;
    session.close().await;
    let summary = result?;

    let size = std::fs::metadata(output)
        .with_context(|| format!("Failed to stat {}", output.display()))?
        .len();
    let checksum = file_checksum(output)?;

    print_summary(&summary, output, size, &checksum);
    Ok(summary)
}

fn print_summary(summary: &DumpSummary, path: &Path, size: u64, checksum: &str) {
    println!();
    println!("{:<30} {:>10}", "Table", "Rows");
    println!("{}", "─".repeat(41));
    for table in &summary.tables {
        println!("{:<30} {:>10}", table.name, table.rows);
    }
    println!("{}", "─".repeat(41));
    println!(
        "{} table(s), {} row(s) total",
        summary.table_count(),
        summary.total_rows()
    );
    println!();
    println!("{}", "=".repeat(50));
    println!("Export complete");
    println!("File:   {}", path.display());
    println!("Size:   {}", format_file_size(size));
    println!("SHA256: {}", checksum);
    println!("{}", "=".repeat(50));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::SqlValue;
    use crate::session::MemorySession;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn options() -> DumpOptions {
        DumpOptions {
            database: "githubstars".to_string(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_unicode_ci".to_string(),
            generated_at: NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_dump_to_file_writes_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.sql");
        let mut session = MemorySession::new().with_table(
            "sync_log",
            "CREATE TABLE `sync_log` (`id` bigint, `status` varchar(20))",
            &["id", "status"],
            vec![vec![SqlValue::Int(1), SqlValue::Text("SUCCESS".to_string())]],
        );

        let summary = dump_to_file(&mut session, &options(), &path).await.unwrap();
        assert_eq!(summary.total_rows(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("-- Generated at: 2025-01-02 03:04:05"));
        assert!(content.contains("(1, 'SUCCESS');"));
    }

    #[tokio::test]
    async fn test_dump_to_unwritable_path_fails() {
        let mut session = MemorySession::new();
        let err = dump_to_file(
            &mut session,
            &options(),
            Path::new("/nonexistent-dir/backup.sql"),
        )
        .await
        .unwrap_err();

        let backup_err = err.downcast_ref::<BackupError>().unwrap();
        assert!(matches!(backup_err, BackupError::Io { .. }));
    }

    #[tokio::test]
    async fn test_failed_dump_mentions_incomplete_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.sql");
        let mut session = MemorySession::new().with_phantom_table("gone");

        let err = dump_to_file(&mut session, &options(), &path)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("incomplete"));
        assert!(path.exists());
    }
}
