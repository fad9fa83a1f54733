//! COPY FROM STDIN write path (CSV framing).
//!
//! Rows are encoded into a byte buffer and streamed to the server in chunks,
//! so memory stays bounded by the flush threshold rather than the dataset.

use super::TableIdentifier;
use crate::dataset::{Dataset, Value};
use bytes::Bytes;
use futures_util::SinkExt;
use pg_escape::quote_identifier;
use std::io::Write;
use tokio_postgres::Transaction;

pub(crate) fn copy_statement(table: &TableIdentifier, dataset: &Dataset) -> String {
    let col_list = dataset
        .column_names()
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "COPY {} ({}) FROM STDIN WITH (FORMAT csv)",
        table.qualified(),
        col_list
    )
}

/// Append one value in COPY CSV format
///
/// - NULL: empty, unquoted
/// - Text: always quoted, inner quotes doubled, NUL bytes stripped
/// - Numbers and datetimes: bare literals
fn encode_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => {}
        Value::Text(s) => {
            buf.push(b'"');
            for byte in s.bytes() {
                match byte {
                    b'"' => buf.extend_from_slice(b"\"\""),
                    0 => {}
                    _ => buf.push(byte),
                }
            }
            buf.push(b'"');
        }
        other => {
            let _ = write!(buf, "{other}");
        }
    }
}

/// Append one row (values in column order) terminated by a newline
pub(crate) fn encode_row<'a>(buf: &mut Vec<u8>, row: impl Iterator<Item = &'a Value>) {
    for (pos, value) in row.enumerate() {
        if pos > 0 {
            buf.push(b',');
        }
        encode_value(buf, value);
    }
    buf.push(b'\n');
}

/// Stream every row of `dataset` into `table`. Returns rows written.
pub(crate) async fn copy_dataset(
    tx: &Transaction<'_>,
    table: &TableIdentifier,
    dataset: &Dataset,
    flush_bytes: usize,
) -> Result<u64, tokio_postgres::Error> {
    let copy_stmt = copy_statement(table, dataset);
    log::debug!("{}", copy_stmt);

    let sink = tx.copy_in(&copy_stmt).await?;
    let mut sink = Box::pin(sink);

    let flush_threshold = flush_bytes.max(1);
    let mut buf = Vec::with_capacity(flush_threshold);
    let mut total_rows: u64 = 0;

    for row_idx in 0..dataset.row_count() {
        encode_row(&mut buf, dataset.row(row_idx));
        total_rows += 1;

        if buf.len() >= flush_threshold {
            log::debug!("COPY flushing {} byte(s) after {} row(s)", buf.len(), total_rows);
            sink.send(Bytes::from(std::mem::take(&mut buf))).await?;
            buf = Vec::with_capacity(flush_threshold);
        }
    }

    if !buf.is_empty() {
        sink.send(Bytes::from(buf)).await?;
    }

    let copied = sink.as_mut().finish().await?;
    log::info!("COPY wrote {} row(s) to {}", copied, table);
    Ok(total_rows)
}
