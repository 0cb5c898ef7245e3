// ABOUTME: MySQL connection setup and driver error classification
// ABOUTME: Builds connection options from config and maps failures to BackupError

use crate::config::ConnectionConfig;
use crate::error::{BackupError, ER_NO_SUCH_TABLE};
use mysql_async::{Conn, Opts, OptsBuilder};

/// Build driver options from configuration
///
/// `with_database` selects the configured database on connect; the schema
/// initializer connects without one because the database may not exist yet.
pub fn build_opts(config: &ConnectionConfig, with_database: bool) -> Opts {
    let mut builder = OptsBuilder::default()
        .ip_or_hostname(config.host.clone())
        .tcp_port(config.port)
        .user(Some(config.user.clone()))
        .pass(config.password.clone())
        .init(vec![format!("SET NAMES {}", config.charset)]);

    if with_database {
        builder = builder.db_name(Some(config.database.clone()));
    }

    builder.into()
}

/// Open a single connection to the MySQL server
pub async fn connect(config: &ConnectionConfig, with_database: bool) -> Result<Conn, BackupError> {
    tracing::debug!(
        "Connecting to {}:{} as '{}'",
        config.host,
        config.port,
        config.user
    );

    Conn::new(build_opts(config, with_database))
        .await
        .map_err(|e| describe_connect_error(&e, config))
}

/// Turn a failed connect into a connection error with a hint for the operator
fn describe_connect_error(err: &mysql_async::Error, config: &ConnectionConfig) -> BackupError {
    let error_msg = err.to_string();

    let message = match err {
        mysql_async::Error::Server(server) if server.code == 1045 => format!(
            "Authentication failed: Invalid username or password for '{}'.\n\
             Please verify your database credentials.",
            config.user
        ),
        mysql_async::Error::Server(server) if server.code == 1049 => format!(
            "Database does not exist: {}\n\
             Run `stars-backup init` first or check the database name.",
            config.database
        ),
        mysql_async::Error::Io(_)
            if error_msg.contains("refused") || error_msg.contains("No route") =>
        {
            format!(
                "Connection refused: Unable to reach database server at {}:{}.\n\
                 Please check:\n\
                 - The host and port are correct\n\
                 - The database server is running\n\
                 - Firewall rules allow connections\n\
                 Error: {}",
                config.host, config.port, error_msg
            )
        }
        _ if error_msg.contains("timeout") || error_msg.contains("timed out") => format!(
            "Connection timeout: Database server did not respond in time.\n\
             Error: {}",
            error_msg
        ),
        _ => format!("Failed to connect to database: {}", error_msg),
    };

    BackupError::Connection(message)
}

/// True when the failure came from the transport rather than the server
fn is_link_error(err: &mysql_async::Error) -> bool {
    matches!(
        err,
        mysql_async::Error::Io(_) | mysql_async::Error::Driver(_)
    )
}

/// Classify a failure of a statement that changes the schema
pub fn statement_error(err: mysql_async::Error, sql: &str) -> BackupError {
    if is_link_error(&err) {
        return BackupError::Connection(err.to_string());
    }
    let code = match &err {
        mysql_async::Error::Server(server) => Some(server.code),
        _ => None,
    };
    BackupError::Schema {
        statement: sql.trim().to_string(),
        code,
        message: err.to_string(),
    }
}

/// Classify a failure of a read against `table` (or the catalog when `None`)
pub fn read_error(err: mysql_async::Error, table: Option<&str>) -> BackupError {
    if is_link_error(&err) {
        return BackupError::Connection(err.to_string());
    }
    match (&err, table) {
        (mysql_async::Error::Server(server), Some(table)) if server.code == ER_NO_SUCH_TABLE => {
            BackupError::NotFound {
                table: table.to_string(),
                message: server.message.clone(),
            }
        }
        (_, Some(table)) => BackupError::Query {
            context: format!("table '{}'", table),
            message: err.to_string(),
        },
        (_, None) => BackupError::Query {
            context: "table listing".to_string(),
            message: err.to_string(),
        },
    }
}
