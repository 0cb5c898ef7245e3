// ABOUTME: Connection and dump configuration passed explicitly to each component
// ABOUTME: Loads optional TOML files and applies command-line overrides on top

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parameters needed to reach the catalog database
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub charset: String,
    pub collation: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3307,
            user: "root".to_string(),
            password: None,
            database: "githubstars".to_string(),
            charset: "utf8mb4".to_string(),
            collation: "utf8mb4_unicode_ci".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// `user@host:port/database`, without the password
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Where the SQL artifact is written
    pub output: PathBuf,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("githubstars_backup.sql"),
        }
    }
}

/// Top-level configuration file layout
///
/// ```toml
/// [connection]
/// host = "127.0.0.1"
/// port = 3307
/// user = "root"
/// database = "githubstars"
///
/// [dump]
/// output = "githubstars_backup.sql"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub connection: ConnectionConfig,
    pub dump: DumpConfig,
}

/// Values supplied on the command line or through the environment
///
/// Each `Some` replaces the corresponding file or default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
    pub output: Option<PathBuf>,
}

impl AppConfig {
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        let conn = &mut self.connection;
        if let Some(host) = overrides.host {
            conn.host = host;
        }
        if let Some(port) = overrides.port {
            conn.port = port;
        }
        if let Some(user) = overrides.user {
            conn.user = user;
        }
        if let Some(password) = overrides.password {
            conn.password = Some(password);
        }
        if let Some(database) = overrides.database {
            conn.database = database;
        }
        if let Some(output) = overrides.output {
            self.dump.output = output;
        }
        self
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<AppConfig> {
    toml::from_str(content).context("Failed to parse configuration TOML")
}

/// Load configuration from a TOML file
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Resolve the effective configuration: defaults, then file, then overrides
pub fn resolve_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<AppConfig> {
    let base = match path {
        Some(p) => load_config_from_file(p)?,
        None => AppConfig::default(),
    };
    Ok(base.apply(overrides))
}
