//! Loads an exported report into SQLite.
//!
//! The destination table is shaped after the report header at import time:
//! one untyped column per header cell, in header order, plus a synthetic
//! `id` primary key. Every import runs in a single transaction.

use crate::writer::ReportTable;
use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::Path;
use tracing::{debug, info, warn};

pub const PRIMARY_KEY_COLUMN: &str = "id";

/// Column names taken verbatim from a report header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSchema {
    columns: Vec<String>,
}

impl OrderedSchema {
    pub fn from_header(header: &[String]) -> Result<Self> {
        if header.is_empty() {
            return Err(Error::EmptyTable);
        }
        Ok(Self {
            columns: header.to_vec(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn create_table_sql(&self, table: &str) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({} INTEGER PRIMARY KEY AUTOINCREMENT, {})",
            quote_ident(table),
            quote_ident(PRIMARY_KEY_COLUMN),
            columns
        )
    }

    pub fn insert_sql(&self, table: &str) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; self.columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            columns,
            placeholders
        )
    }

    /// `row` is the 1-based data row number used in the error.
    pub fn check_row(&self, row: usize, cells: &[String]) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(Error::RowWidth {
                row,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        Ok(())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub struct SqliteImporter {
    pool: SqlitePool,
}

impl SqliteImporter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database file, creating it if it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    pub async fn import_csv(&self, table_name: &str, csv_path: impl AsRef<Path>) -> Result<u64> {
        let table = ReportTable::read_csv(csv_path)?;
        self.import(table_name, &table).await
    }

    /// Creates `table_name` if needed and appends every row of `table`.
    ///
    /// All or nothing: any failure, including a row whose width differs from
    /// the header, rolls back the table creation and every insert of this call.
    /// Rows are appended as-is; importing the same report twice duplicates it.
    pub async fn import(&self, table_name: &str, table: &ReportTable) -> Result<u64> {
        let schema = OrderedSchema::from_header(table.header())?;
        let mut tx = self.pool.begin().await?;

        let inserted = insert_all(&mut tx, table_name, &schema, table).await;
        match inserted {
            Ok(count) => {
                tx.commit().await?;
                info!("✅ imported {count} rows into {table_name}");
                Ok(count)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("rollback of {table_name} import failed: {rollback}");
                }
                warn!("❌ import into {table_name} failed: {e}");
                Err(e)
            }
        }
    }
}

async fn insert_all(
    tx: &mut Transaction<'_, Sqlite>,
    table_name: &str,
    schema: &OrderedSchema,
    table: &ReportTable,
) -> Result<u64> {
    sqlx::query(&schema.create_table_sql(table_name))
        .execute(&mut **tx)
        .await?;
    debug!(columns = schema.len(), "table {table_name} ready");

    let insert = schema.insert_sql(table_name);
    let mut inserted = 0;
    for (index, row) in table.rows().iter().enumerate() {
        schema.check_row(index + 1, row)?;

        let query = row
            .iter()
            .fold(sqlx::query::<Sqlite>(&insert), |query, cell| query.bind(cell.as_str()));
        inserted += query.execute(&mut **tx).await?.rows_affected();
    }

    Ok(inserted)
}
