// ABOUTME: Session implementation over a single mysql_async connection
// ABOUTME: Runs catalog queries and full-table reads for the dump engine

use super::connection::{connect, read_error, statement_error};
use super::value::{convert_value, ColumnKind};
use crate::config::ConnectionConfig;
use crate::dump::quote_identifier;
use crate::error::{BackupError, Result};
use crate::session::{Session, TableRows};
use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, Row, Value};

/// One live MySQL connection
///
/// Callers release it with [`MySqlSession::close`] after the work finishes,
/// whatever its outcome. If the session is dropped without closing (a
/// panic), the driver's own `Drop` still tears the connection down.
pub struct MySqlSession {
    conn: Conn,
    target: String,
}

impl MySqlSession {
    /// Connect with the configured database selected
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let conn = connect(config, true).await?;
        tracing::info!("Connected to {}", config.display_target());
        Ok(Self {
            conn,
            target: config.display_target(),
        })
    }

    /// Connect to the server without selecting a database
    pub async fn connect_server(config: &ConnectionConfig) -> Result<Self> {
        let conn = connect(config, false).await?;
        let target = format!("{}@{}:{}", config.user, config.host, config.port);
        tracing::info!("Connected to {}", target);
        Ok(Self { conn, target })
    }

    /// Disconnect, logging rather than failing if the server is already gone
    pub async fn close(self) {
        match self.conn.disconnect().await {
            Ok(()) => tracing::debug!("Disconnected from {}", self.target),
            Err(e) => tracing::warn!("Failed to close connection to {}: {}", self.target, e),
        }
    }
}

#[async_trait]
impl Session for MySqlSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        tracing::debug!("Executing: {}", sql.trim());
        self.conn
            .query_drop(sql)
            .await
            .map_err(|e| statement_error(e, sql))
    }

    async fn list_tables(&mut self) -> Result<Vec<String>> {
        self.conn
            .query::<String, _>("SHOW TABLES")
            .await
            .map_err(|e| read_error(e, None))
    }

    async fn show_create_table(&mut self, table: &str) -> Result<String> {
        let sql = format!("SHOW CREATE TABLE {}", quote_identifier(table));
        let row: Option<Row> = self
            .conn
            .query_first(sql)
            .await
            .map_err(|e| read_error(e, Some(table)))?;

        let not_found = || BackupError::NotFound {
            table: table.to_string(),
            message: "SHOW CREATE TABLE returned no rows".to_string(),
        };
        let row = row.ok_or_else(not_found)?;

        let statement_column = row
            .columns_ref()
            .get(1)
            .map(|c| c.name_str().into_owned())
            .unwrap_or_default();
        ensure_base_table(table, &statement_column)?;

        match row.get_opt::<String, usize>(1) {
            Some(Ok(ddl)) => Ok(ddl),
            Some(Err(e)) => Err(BackupError::Query {
                context: format!("table '{}'", table),
                message: format!("DDL is not valid text: {}", e),
            }),
            None => Err(not_found()),
        }
    }

    async fn fetch_table(&mut self, table: &str) -> Result<TableRows> {
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let mut result = self
            .conn
            .query_iter(sql)
            .await
            .map_err(|e| read_error(e, Some(table)))?;

        // names and kinds come from this result, never from a second query
        let (columns, kinds): (Vec<String>, Vec<ColumnKind>) = result
            .columns_ref()
            .iter()
            .map(|c| (c.name_str().into_owned(), ColumnKind::from(c)))
            .unzip();

        let raw_rows: Vec<Row> = result
            .collect()
            .await
            .map_err(|e| read_error(e, Some(table)))?;

        let rows = raw_rows
            .into_iter()
            .map(|mut row| {
                kinds
                    .iter()
                    .enumerate()
                    .map(|(idx, kind)| {
                        let value: Value = row.take(idx).unwrap_or(Value::NULL);
                        convert_value(value, *kind)
                    })
                    .collect()
            })
            .collect();

        Ok(TableRows { columns, rows })
    }

    async fn count_rows(&mut self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: Option<u64> = self
            .conn
            .query_first(sql)
            .await
            .map_err(|e| read_error(e, Some(table)))?;
        Ok(count.unwrap_or(0))
    }

    async fn server_version(&mut self) -> Result<String> {
        let version: Option<String> = self
            .conn
            .query_first("SELECT VERSION()")
            .await
            .map_err(|e| read_error(e, None))?;
        Ok(version.unwrap_or_default())
    }
}

/// `SHOW CREATE TABLE` names its second column `Create View` for views
///
/// A view replayed as `DROP TABLE` + `CREATE VIEW` + `INSERT` would write
/// its rows into the base tables a second time, so views are refused.
fn ensure_base_table(table: &str, statement_column: &str) -> Result<()> {
    if statement_column.eq_ignore_ascii_case("Create View") {
        return Err(BackupError::Query {
            context: format!("table '{}'", table),
            message: "is a view; only base tables can be dumped".to_string(),
        });
    }
    Ok(())
}
