// ABOUTME: Dump engine module
// ABOUTME: Converts live tables into a replayable script of DDL and batched INSERTs

pub mod artifact;
pub mod statements;
pub mod tables;
pub mod value;

pub use artifact::{write_dump, ArtifactWriter, DumpOptions, DumpSummary, TableReport};
pub use statements::{export_table_data, insert_statements, RowBatch, TableExport, BATCH_SIZE};
pub use tables::{capture_ddl, list_tables, TableDescriptor};
pub use value::{escape_string, quote_identifier, serialize_value, SqlValue};
