// ABOUTME: Init command: provisions the catalog database and its tables
// ABOUTME: Connects without a default database, applies fixed DDL, always disconnects

use crate::config::ConnectionConfig;
use crate::mysql::MySqlSession;
use crate::schema;
use anyhow::{Context, Result};

/// Create the catalog database and tables if they do not exist yet
///
/// Safe to run repeatedly: every statement is `IF NOT EXISTS` and nothing
/// is dropped. The connection is closed before returning, including when
/// a statement fails.
///
/// # Errors
///
/// This function will return an error if:
/// - The server is unreachable or rejects the credentials
/// - The server rejects a CREATE for a reason other than pre-existence
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use stars_backup::commands::init;
/// # use stars_backup::config::ConnectionConfig;
/// # async fn example() -> Result<()> {
/// init(&ConnectionConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init(config: &ConnectionConfig) -> Result<()> {
    println!("{}", "=".repeat(50));
    println!("GitHub Stars database initialization");
    println!("{}", "=".repeat(50));

    tracing::info!(
        "Initializing database '{}' on {}:{}",
        config.database,
        config.host,
        config.port
    );

    let mut session = MySqlSession::connect_server(config)
        .await
        .context("Failed to connect to MySQL server")?;

    let result = schema::initialize(&mut session, config).await;
    session.close().await;
    result.with_context(|| format!("Failed to initialize database '{}'", config.database))?;

    println!("{}", "=".repeat(50));
    println!("Database initialization complete");
    println!("{}", "=".repeat(50));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_unreachable_server_fails() {
        let config = ConnectionConfig {
            port: 1,
            ..Default::default()
        };
        let err = init(&config).await.unwrap_err();
        assert!(err.to_string().contains("Failed to connect"));
    }

    // NOTE: This test requires a real MySQL instance
    #[tokio::test]
    #[ignore]
    async fn test_init_twice_is_idempotent() {
        let config = ConnectionConfig {
            host: std::env::var("TEST_MYSQL_HOST").expect("TEST_MYSQL_HOST must be set"),
            password: std::env::var("TEST_MYSQL_PWD").ok(),
            database: "stars_backup_init_test".to_string(),
            ..Default::default()
        };

        init(&config).await.unwrap();
        init(&config).await.unwrap();
    }
}
