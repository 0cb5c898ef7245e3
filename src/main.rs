// ABOUTME: CLI entry point for stars-backup
// ABOUTME: Parses commands, resolves configuration, and routes to handlers

use clap::{Args, Parser, Subcommand};
use stars_backup::commands;
use stars_backup::config::{resolve_config, ConfigOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stars-backup")]
#[command(about = "Provision and back up the GitHub stars MySQL catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct ConnectionArgs {
    /// Path to a TOML config file with [connection] and [dump] sections
    #[arg(long = "config", global = true)]
    config_path: Option<PathBuf>,
    /// MySQL server host
    #[arg(long, env = "MYSQL_HOST", global = true)]
    host: Option<String>,
    /// MySQL server port
    #[arg(long, env = "MYSQL_PORT", global = true)]
    port: Option<u16>,
    /// MySQL user
    #[arg(long, env = "MYSQL_USER", global = true)]
    user: Option<String>,
    /// MySQL password
    #[arg(long, env = "MYSQL_PWD", global = true, hide_env_values = true)]
    password: Option<String>,
    /// Catalog database name
    #[arg(long, env = "MYSQL_DATABASE", global = true)]
    database: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog database and tables if they do not exist
    Init,
    /// Export schema and data of every table to a SQL file
    Dump {
        /// Output file (default: githubstars_backup.sql)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List tables and their row counts
    Tables,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let output = match &cli.command {
        Commands::Dump { output } => output.clone(),
        _ => None,
    };
    let overrides = ConfigOverrides {
        host: cli.connection.host,
        port: cli.connection.port,
        user: cli.connection.user,
        password: cli.connection.password,
        database: cli.connection.database,
        output,
    };
    let config = resolve_config(cli.connection.config_path.as_deref(), overrides)?;

    tracing::debug!("Target: {}", config.connection.display_target());

    match cli.command {
        Commands::Init => commands::init(&config.connection).await,
        Commands::Dump { .. } => commands::dump(&config).await.map(|_| ()),
        Commands::Tables => commands::tables(&config.connection).await,
    }
}
