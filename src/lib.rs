// ABOUTME: Library module for stars-backup
// ABOUTME: Exports schema provisioning and dump functionality for the binary and tests

pub mod commands;
pub mod config;
pub mod dump;
pub mod error;
pub mod mysql;
pub mod schema;
pub mod session;
pub mod utils;
