// ABOUTME: Assembles the full SQL dump artifact from live tables
// ABOUTME: Writes header, session pragmas, per-table DDL and data, then restores checks

use super::statements::export_table_data;
use super::tables::{capture_ddl, list_tables, TableDescriptor};
use super::value::quote_identifier;
use crate::config::ConnectionConfig;
use crate::error::{BackupError, Result};
use crate::session::Session;
use crate::utils::sanitize_identifier;
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::PathBuf;

const RULE: &str = "-- -------------------------------------------";

/// Settings that shape the artifact text
#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub database: String,
    pub charset: String,
    pub collation: String,
    /// Timestamp written into the header
    pub generated_at: NaiveDateTime,
}

impl DumpOptions {
    /// Options for `config`, stamped with the current local time
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            database: config.database.clone(),
            charset: config.charset.clone(),
            collation: config.collation.clone(),
            generated_at: chrono::Local::now().naive_local(),
        }
    }
}

/// What was written for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub name: String,
    pub rows: usize,
    pub statements: usize,
}

/// Outcome of a complete dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub database: String,
    pub tables: Vec<TableReport>,
}

impl DumpSummary {
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Output sink that remembers where it writes, for error reporting
pub struct ArtifactWriter<W: Write> {
    inner: W,
    path: PathBuf,
}

impl<W: Write> ArtifactWriter<W> {
    pub fn new(inner: W, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .map_err(|e| BackupError::io(&self.path, e))
    }

    fn line(&mut self, text: &str) -> Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| BackupError::io(&self.path, e))
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn write_header<W: Write>(
    out: &mut ArtifactWriter<W>,
    options: &DumpOptions,
    server_version: &str,
) -> Result<()> {
    let db = quote_identifier(&options.database);

    out.line("-- GitHub Stars database backup")?;
    out.line(&format!(
        "-- Generated at: {}",
        options.generated_at.format("%Y-%m-%d %H:%M:%S")
    ))?;
    out.line(&format!(
        "-- Database: {}",
        sanitize_identifier(&options.database)
    ))?;
    out.line(&format!(
        "-- Server version: {}",
        sanitize_identifier(server_version)
    ))?;
    out.line(RULE)?;
    out.line("")?;

    out.line(&format!(
        "CREATE DATABASE IF NOT EXISTS {} DEFAULT CHARACTER SET {} COLLATE {};",
        db, options.charset, options.collation
    ))?;
    out.line(&format!("USE {};", db))?;
    out.line("")?;

    out.line(&format!("SET NAMES {};", options.charset))?;
    out.line("SET FOREIGN_KEY_CHECKS = 0;")?;
    out.line("SET UNIQUE_CHECKS = 0;")?;
    out.line("")
}

fn write_table<W: Write>(
    out: &mut ArtifactWriter<W>,
    table: &TableDescriptor,
    statements: &[String],
    rows: usize,
) -> Result<()> {
    let shown = sanitize_identifier(&table.name);

    out.line(RULE)?;
    out.line(&format!("-- Table structure: {}", shown))?;
    out.line(RULE)?;
    out.line(&format!(
        "DROP TABLE IF EXISTS {};",
        quote_identifier(&table.name)
    ))?;
    out.line(&format!("{};", table.ddl.trim_end().trim_end_matches(';')))?;
    out.line("")?;

    if statements.is_empty() {
        return Ok(());
    }

    out.line(RULE)?;
    out.line(&format!("-- Data: {} ({} rows)", shown, rows))?;
    out.line(RULE)?;
    for statement in statements {
        out.line(statement)?;
        out.line("")?;
    }
    Ok(())
}

fn write_footer<W: Write>(out: &mut ArtifactWriter<W>) -> Result<()> {
    out.line("SET UNIQUE_CHECKS = 1;")?;
    out.line("SET FOREIGN_KEY_CHECKS = 1;")
}

/// Write a complete, replayable dump of the current database
///
/// Tables are processed in catalog order: for each, its DDL is captured,
/// all rows are read in one query, and the DDL plus batched INSERTs are
/// written before moving on. `on_table` is called after each table.
///
/// Any failure stops the dump; whatever was already written stays in
/// `out` and must be treated as truncated.
pub async fn write_dump<S, W, F>(
    session: &mut S,
    out: &mut ArtifactWriter<W>,
    options: &DumpOptions,
    mut on_table: F,
) -> Result<DumpSummary>
where
    S: Session + ?Sized,
    W: Write,
    F: FnMut(&TableReport),
{
    let server_version = session.server_version().await?;
    write_header(out, options, &server_version)?;

    let tables = list_tables(session).await?;
    tracing::info!(
        "Found {} table(s) in '{}': {}",
        tables.len(),
        options.database,
        tables.join(", ")
    );

    let mut summary = DumpSummary {
        database: options.database.clone(),
        tables: Vec::with_capacity(tables.len()),
    };

    for name in tables {
        tracing::info!("Exporting table '{}'", name);

        let ddl = capture_ddl(session, &name).await?;
        let export = export_table_data(session, &name).await?;
        let statements = export.statements;
        let rows = export.rows;

        let descriptor = TableDescriptor {
            name,
            columns: export.columns,
            ddl,
        };
        write_table(out, &descriptor, &statements, rows)?;

        tracing::info!(
            "  {} row(s), {} column(s), {} INSERT statement(s)",
            rows,
            descriptor.columns.len(),
            statements.len()
        );

        let report = TableReport {
            name: descriptor.name,
            rows,
            statements: statements.len(),
        };
        on_table(&report);
        summary.tables.push(report);
    }

    write_footer(out)?;
    out.flush()?;

    Ok(summary)
}
