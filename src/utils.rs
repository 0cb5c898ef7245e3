// ABOUTME: Utility functions for reporting on dump artifacts
// ABOUTME: Provides size formatting, file checksums, and identifier sanitizing

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Format a file size the way the dump summary prints it
///
/// Sizes above one megabyte are shown in MB, everything else in KB, both
/// with two decimal places.
///
/// # Examples
///
/// ```
/// # use stars_backup::utils::format_file_size;
/// assert_eq!(format_file_size(512), "0.50 KB");
/// assert_eq!(format_file_size(1536), "1.50 KB");
/// assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let size = bytes as f64;
    if size > MB {
        format!("{:.2} MB", size / MB)
    } else {
        format!("{:.2} KB", size / KB)
    }
}

/// Compute the SHA-256 of a file as lowercase hex
///
/// Streams the file in chunks so large dumps are not loaded into memory.
pub fn file_checksum(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {} for checksum", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Sanitize an identifier (table name, database name, etc.) for display
///
/// Removes control characters and limits length so a name can be placed in
/// a log line or a SQL comment without breaking it.
///
/// **Note**: This is for display purposes only. Identifiers inside SQL
/// statements go through `dump::quote_identifier`.
///
/// # Examples
///
/// ```
/// # use stars_backup::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("normal_table"), "normal_table");
/// assert_eq!(sanitize_identifier("table\x00name"), "tablename");
/// assert_eq!(sanitize_identifier("table\nname"), "tablename");
///
/// // Length limit
/// let long_name = "a".repeat(200);
/// assert_eq!(sanitize_identifier(&long_name).len(), 100);
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}
