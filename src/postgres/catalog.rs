//! System catalog probes

use super::TableIdentifier;
use tokio_postgres::Client;

/// A column as reported by `information_schema.columns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingColumn {
    pub name: String,
    pub data_type: String,
}

/// Whether `table` exists
pub(crate) async fn table_exists(
    client: &Client,
    table: &TableIdentifier,
) -> Result<bool, tokio_postgres::Error> {
    let rows = client
        .query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = $1::text AND table_name = $2::text",
            &[&table.schema(), &table.table()],
        )
        .await?;
    Ok(!rows.is_empty())
}

/// Columns of `table` in ordinal order
pub(crate) async fn table_columns(
    client: &Client,
    table: &TableIdentifier,
) -> Result<Vec<ExistingColumn>, tokio_postgres::Error> {
    let rows = client
        .query(
            "SELECT column_name::text, data_type::text FROM information_schema.columns \
             WHERE table_schema = $1::text AND table_name = $2::text \
             ORDER BY ordinal_position",
            &[&table.schema(), &table.table()],
        )
        .await?;
    Ok(rows
        .iter()
        .map(|row| ExistingColumn {
            name: row.get(0),
            data_type: row.get(1),
        })
        .collect())
}
