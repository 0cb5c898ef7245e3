// ABOUTME: Command implementations for each CLI subcommand
// ABOUTME: Exports init, dump, and tables commands

pub mod dump;
pub mod init;
pub mod tables;

pub use dump::{dump, dump_to_file};
pub use init::init;
pub use tables::{count_tables, tables, TableCount};
