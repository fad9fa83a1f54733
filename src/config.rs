//! Runtime configuration, read once at startup and passed by reference

use crate::client::DEFAULT_HTTP_TIMEOUT;
use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the Postgres connection string
pub const CONN_STRING_VAR: &str = "PG_CONN_STRING";

/// Ten minute cap on any statement, and on the load session as a whole
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(600);

/// COPY buffer size before a chunk is sent to the server
pub const DEFAULT_COPY_FLUSH_BYTES: usize = 4 * 1024 * 1024;

/// A credential-bearing connection string
///
/// Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString(String);

impl ConnectionString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw string, for handing to the database driver only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectionString(<redacted>)")
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub conn_string: ConnectionString,
    pub http_timeout: Duration,
    pub statement_timeout: Duration,
    pub copy_flush_bytes: usize,
}

impl PipelineConfig {
    /// Defaults for everything but the credential
    pub fn new(conn_string: ConnectionString) -> Self {
        Self {
            conn_string,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            copy_flush_bytes: DEFAULT_COPY_FLUSH_BYTES,
        }
    }

    /// Read the connection string from the environment
    ///
    /// When [`CONN_STRING_VAR`] is unset the dotenv file at `env_file` is
    /// sourced first. A missing dotenv file is not an error.
    ///
    /// # Errors
    /// Returns [`Error::MissingCredentials`] if the variable is still unset,
    /// or a parse error if the dotenv file is malformed
    pub fn from_env(env_file: impl AsRef<Path>) -> Result<Self> {
        let env_file = env_file.as_ref();
        if std::env::var_os(CONN_STRING_VAR).is_none() {
            match dotenvy::from_filename(env_file) {
                Ok(path) => log::debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => {
                    log::debug!("No dotenv file at {}", env_file.display())
                }
                Err(e) => {
                    return Err(Error::Parse {
                        origin: env_file.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        match std::env::var(CONN_STRING_VAR) {
            Ok(value) if !value.trim().is_empty() => Ok(Self::new(ConnectionString::new(value))),
            _ => Err(Error::MissingCredentials(CONN_STRING_VAR)),
        }
    }
}
