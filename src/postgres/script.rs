//! Ad hoc SQL scripts run against the destination database

use super::client::connect;
use super::errors::classify;
use crate::config::PipelineConfig;
use crate::error::Result;

/// Substitute `$OWNER` and `$REPO`, then split into statements
///
/// Statements are separated by `;`. Blank statements are dropped. Semicolons
/// inside string literals are not understood, so scripts must not contain them.
pub fn render_script(sql: &str, owner: &str, repo: &str) -> Vec<String> {
    sql.replace("$OWNER", owner)
        .replace("$REPO", repo)
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run `statements` in order on a single session
///
/// Stops at the first failing statement. Returns the number executed.
pub async fn execute_script(config: &PipelineConfig, statements: &[String]) -> Result<usize> {
    let limit = config.statement_timeout;
    let client = connect(&config.conn_string, limit).await?;

    for (i, statement) in statements.iter().enumerate() {
        log::debug!("[{}/{}] {}", i + 1, statements.len(), statement);
        client.batch_execute(statement).await.map_err(|e| {
            classify(
                &format!("Statement {} of {} failed", i + 1, statements.len()),
                &e,
                limit,
                "",
            )
        })?;
    }

    log::info!("Executed {} statement(s)", statements.len());
    Ok(statements.len())
}
