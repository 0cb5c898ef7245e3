// ABOUTME: Batched multi-row INSERT generation for table data
// ABOUTME: Splits rows into fixed-size batches and renders one statement per batch

use super::value::{quote_identifier, serialize_value, SqlValue};
use crate::error::Result;
use crate::session::{Session, TableRows};

/// Maximum rows per INSERT statement
pub const BATCH_SIZE: usize = 100;

/// A slice of at most [`BATCH_SIZE`] rows of one table
#[derive(Debug, Clone, Copy)]
pub struct RowBatch<'a> {
    pub table: &'a str,
    pub columns: &'a [String],
    pub rows: &'a [Vec<SqlValue>],
}

impl RowBatch<'_> {
    /// Render the batch as a single self-contained INSERT
    ///
    /// ```text
    /// INSERT INTO `t` (`id`, `name`) VALUES
    /// (1, 'a'),
    /// (2, NULL);
    /// ```
    pub fn to_sql(&self) -> String {
        let column_list = self
            .columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");

        let tuples = self
            .rows
            .iter()
            .map(|row| {
                let values = row.iter().map(serialize_value).collect::<Vec<_>>();
                format!("({})", values.join(", "))
            })
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "INSERT INTO {} ({}) VALUES\n{};",
            quote_identifier(self.table),
            column_list,
            tuples
        )
    }
}

/// Split already-fetched rows into batches in retrieval order
pub fn batches<'a>(table: &'a str, data: &'a TableRows) -> impl Iterator<Item = RowBatch<'a>> {
    data.rows.chunks(BATCH_SIZE).map(move |rows| RowBatch {
        table,
        columns: &data.columns,
        rows,
    })
}

/// Render INSERT statements for already-fetched rows; empty for no rows
pub fn insert_statements(table: &str, data: &TableRows) -> Vec<String> {
    batches(table, data).map(|batch| batch.to_sql()).collect()
}

/// Rendered data of one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableExport {
    /// Column names of the result the rows were read from
    pub columns: Vec<String>,
    pub rows: usize,
    /// Empty for an empty table
    pub statements: Vec<String>,
}

/// Read every row of `table` and render it as batched INSERT statements
///
/// The whole table is read in one query, so memory grows with table size.
pub async fn export_table_data<S: Session + ?Sized>(
    session: &mut S,
    table: &str,
) -> Result<TableExport> {
    let data = session.fetch_table(table).await?;
    let statements = insert_statements(table, &data);
    tracing::debug!(
        "Table '{}': {} row(s) in {} statement(s)",
        table,
        data.len(),
        statements.len()
    );
    Ok(TableExport {
        rows: data.len(),
        columns: data.columns,
        statements,
    })
}
