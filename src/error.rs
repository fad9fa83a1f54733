//! Error taxonomy shared by every pipeline stage

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result alias used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while extracting, transforming, validating or loading
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP request failed, timed out, or returned a non-2xx status
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// Source text is not valid UTF-8 or not well-formed delimited text
    #[error("failed to parse {origin}: {reason}")]
    Parse { origin: String, reason: String },

    /// A local source file does not exist
    #[error("source file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("unknown transform '{name}' (available: {})", available.join(", "))]
    UnknownTransform {
        name: String,
        available: Vec<String>,
    },

    #[error("unknown validation suite '{name}' (available: {})", available.join(", "))]
    UnknownSuite {
        name: String,
        available: Vec<String>,
    },

    /// A registered transform could not reshape or coerce the dataset
    #[error("transform '{name}' failed: {reason}")]
    Transform { name: String, reason: String },

    /// One or more validation tests failed; carries every failure message
    #[error("data validation failed: {}", failures.join("; "))]
    ValidationFailed { failures: Vec<String> },

    /// A dataset invariant was broken (ragged columns, duplicate names, missing column)
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("invalid table identifier '{0}': expected exactly one '.' as in schema.table")]
    InvalidIdentifier(String),

    #[error("no connection string: set {0} in the environment or the dotenv file")]
    MissingCredentials(&'static str),

    #[error("cannot connect to database: {0}")]
    Connection(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("operation exceeded the {}s timeout: {reason}", limit.as_secs())]
    Timeout { limit: Duration, reason: String },

    /// Dataset columns do not fit the existing destination table
    #[error("schema mismatch on {table}: {reason}")]
    SchemaMismatch { table: String, reason: String },

    #[error("database error: {0}")]
    Database(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Pipeline stage, used to label errors surfaced by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Transform,
    Validate,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extract => "extract",
            Self::Transform => "transform",
            Self::Validate => "validate",
            Self::Load => "load",
        };
        f.write_str(name)
    }
}

/// An [`Error`] tagged with the stage that raised it
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineError {
    pub stage: Stage,
    pub error: Error,
}

impl PipelineError {
    pub fn new(stage: Stage, error: Error) -> Self {
        Self { stage, error }
    }
}
