//! Truncate-and-replace table synchronization

use super::catalog::{table_columns, table_exists};
use super::client::connect;
use super::copy::copy_dataset;
use super::ddl::{check_compatible, create_table_sql, truncate_sql};
use super::errors::classify;
use super::TableIdentifier;
use crate::config::{ConnectionString, DEFAULT_COPY_FLUSH_BYTES, DEFAULT_STATEMENT_TIMEOUT, PipelineConfig};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::etl::{LoadSummary, Loader};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// How the destination is prepared before the bulk copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Table did not exist and is created from the dataset's column types
    Create,
    /// Table existed; its rows are truncated and replaced
    AppendAfterTruncate,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::AppendAfterTruncate => f.write_str("append-after-truncate"),
        }
    }
}

/// Outcome of one [`TableSync::sync`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub mode: LoadMode,
    pub rows: u64,
}

/// Replaces the contents of a destination table with a dataset
///
/// Per call: probe the catalog, then in one transaction either create the
/// table or truncate it, and stream every row with COPY. The whole session
/// is bounded by the statement timeout, both server-side and client-side.
///
/// The probe runs before the transaction, so a concurrent writer that creates
/// or drops the table in between is not guarded against.
///
/// # Example
/// ```no_run
/// use simple_pipeline::config::ConnectionString;
/// use simple_pipeline::postgres::{TableIdentifier, TableSync};
///
/// # async fn example(dataset: simple_pipeline::dataset::Dataset) -> simple_pipeline::error::Result<()> {
/// let sync = TableSync::new(ConnectionString::new("postgresql://localhost/covid"));
/// let table: TableIdentifier = "public.us_counties".parse()?;
/// let report = sync.sync(&table, &dataset).await?;
/// println!("{} rows ({})", report.rows, report.mode);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TableSync {
    conn_string: ConnectionString,
    statement_timeout: Duration,
    flush_bytes: usize,
}

impl TableSync {
    pub fn new(conn_string: ConnectionString) -> Self {
        Self {
            conn_string,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            flush_bytes: DEFAULT_COPY_FLUSH_BYTES,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.conn_string.clone())
            .with_statement_timeout(config.statement_timeout)
            .with_flush_bytes(config.copy_flush_bytes)
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn with_flush_bytes(mut self, flush_bytes: usize) -> Self {
        self.flush_bytes = flush_bytes;
        self
    }

    /// Replace the contents of `table` with `dataset`
    ///
    /// # Errors
    /// - [`Error::Connection`] if the store cannot be reached
    /// - [`Error::Permission`] if the schema or table is not accessible
    /// - [`Error::Timeout`] if the session exceeds the statement timeout
    /// - [`Error::SchemaMismatch`] if the dataset does not fit an existing table
    pub async fn sync(&self, table: &TableIdentifier, dataset: &Dataset) -> Result<SyncReport> {
        if dataset.column_count() == 0 {
            return Err(Error::InvalidDataset(format!(
                "nothing to load into {table}: dataset has no columns"
            )));
        }

        let limit = self.statement_timeout;
        match tokio::time::timeout(limit, self.sync_session(table, dataset)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                limit,
                reason: format!("loading {table} did not finish"),
            }),
        }
    }

    async fn sync_session(&self, table: &TableIdentifier, dataset: &Dataset) -> Result<SyncReport> {
        let limit = self.statement_timeout;
        let name = table.to_string();
        let pg_err = |prefix: &str| {
            let name = name.clone();
            let prefix = prefix.to_string();
            move |e: tokio_postgres::Error| classify(&prefix, &e, limit, &name)
        };

        let mut client = connect(&self.conn_string, limit).await?;

        // Probe
        let mode = if table_exists(&client, table)
            .await
            .map_err(pg_err("Failed to probe catalog"))?
        {
            let existing = table_columns(&client, table)
                .await
                .map_err(pg_err("Failed to read table columns"))?;
            check_compatible(table, dataset, &existing)?;
            LoadMode::AppendAfterTruncate
        } else {
            LoadMode::Create
        };
        log::info!("Destination {} mode: {}", table, mode);

        // Prepare + bulk load
        let tx = client
            .transaction()
            .await
            .map_err(pg_err("Failed to begin transaction"))?;

        let ddl = match mode {
            LoadMode::Create => create_table_sql(table, dataset),
            LoadMode::AppendAfterTruncate => truncate_sql(table),
        };
        log::debug!("{}", ddl);
        tx.batch_execute(&ddl)
            .await
            .map_err(pg_err("Failed to prepare table"))?;

        let rows = copy_dataset(&tx, table, dataset, self.flush_bytes)
            .await
            .map_err(pg_err("COPY failed"))?;

        tx.commit()
            .await
            .map_err(pg_err("Failed to commit load"))?;

        Ok(SyncReport { mode, rows })
    }
}

/// [`Loader`] that syncs the dataset into one fixed table
#[derive(Debug, Clone)]
pub struct TableLoader {
    sync: TableSync,
    table: TableIdentifier,
}

impl TableLoader {
    pub fn new(sync: TableSync, table: TableIdentifier) -> Self {
        Self { sync, table }
    }

    pub fn table(&self) -> &TableIdentifier {
        &self.table
    }
}

#[async_trait]
impl Loader for TableLoader {
    async fn load(&self, dataset: &Dataset) -> Result<LoadSummary> {
        log::info!("Loading {} row(s) into {}", dataset.row_count(), self.table);
        let report = self.sync.sync(&self.table, dataset).await?;
        Ok(LoadSummary {
            destination: self.table.to_string(),
            rows: report.rows,
            created: report.mode == LoadMode::Create,
        })
    }
}
