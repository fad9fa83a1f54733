//! PostgreSQL session setup

use super::errors::classify;
use crate::config::ConnectionString;
use crate::error::{Error, Result};
use std::time::Duration;
use tokio_postgres::{Client, NoTls};

/// Open a session with `statement_timeout` applied
///
/// The connection task is spawned onto the runtime and ends when the
/// returned [`Client`] is dropped.
pub(crate) async fn connect(conn: &ConnectionString, statement_timeout: Duration) -> Result<Client> {
    let (client, connection) = tokio_postgres::connect(conn.expose(), NoTls)
        .await
        .map_err(|e| match classify("Connection failed", &e, statement_timeout, "") {
            Error::Database(message) => Error::Connection(message),
            other => other,
        })?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("PostgreSQL connection error: {}", e);
        }
    });

    client
        .batch_execute(&format!(
            "SET statement_timeout = {}",
            statement_timeout.as_millis()
        ))
        .await
        .map_err(|e| classify("Failed to set statement_timeout", &e, statement_timeout, ""))?;
    log::debug!(
        "Connected, statement_timeout = {}s",
        statement_timeout.as_secs()
    );

    Ok(client)
}
