// ABOUTME: Idempotent schema provisioning for the GitHub stars catalog
// ABOUTME: Creates the database and its fixed tables without ever dropping anything

pub mod definitions;

pub use definitions::{TableDefinition, GITHUB_REPO, SYNC_LOG, TABLES};

use crate::config::ConnectionConfig;
use crate::dump::quote_identifier;
use crate::error::Result;
use crate::session::Session;

/// Create the configured database if missing and switch to it
///
/// A server that still reports "database exists" (for example a proxy
/// that drops the `IF NOT EXISTS` clause) is treated as success.
pub async fn ensure_database<S: Session + ?Sized>(
    session: &mut S,
    config: &ConnectionConfig,
) -> Result<()> {
    let db = quote_identifier(&config.database);
    let create = format!(
        "CREATE DATABASE IF NOT EXISTS {} DEFAULT CHARACTER SET {} COLLATE {}",
        db, config.charset, config.collation
    );

    match session.execute(&create).await {
        Ok(()) => {}
        Err(e) if e.is_already_exists() => {
            tracing::info!("  Database '{}' already exists", config.database);
        }
        Err(e) => return Err(e),
    }

    session.execute(&format!("USE {}", db)).await?;
    tracing::info!("✓ Database '{}' created (or already exists)", config.database);
    Ok(())
}

/// Apply one fixed table definition
pub async fn ensure_table<S: Session + ?Sized>(
    session: &mut S,
    definition: &TableDefinition,
) -> Result<()> {
    match session.execute(definition.ddl).await {
        Ok(()) => {}
        Err(e) if e.is_already_exists() => {
            tracing::info!("  Table '{}' already exists", definition.name);
        }
        Err(e) => return Err(e),
    }
    tracing::info!("✓ Table '{}' created (or already exists)", definition.name);
    Ok(())
}

/// Provision the database and every catalog table
///
/// Stops at the first failure. DDL is not transactional in MySQL, so
/// statements that succeeded before the failure stay applied.
pub async fn initialize<S: Session + ?Sized>(
    session: &mut S,
    config: &ConnectionConfig,
) -> Result<()> {
    ensure_database(session, config).await?;
    for definition in TABLES.iter() {
        ensure_table(session, definition).await?;
    }
    Ok(())
}
