//! Loader trait for writing a dataset to its destination

use crate::dataset::Dataset;
use crate::error::Result;
use async_trait::async_trait;

/// What a loader did with the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Fully-qualified destination, for logging
    pub destination: String,
    /// Rows written
    pub rows: u64,
    /// Whether the destination had to be created
    pub created: bool,
}

/// Loader trait for loading a dataset to a destination
///
/// # Example
/// ```no_run
/// use async_trait::async_trait;
/// use simple_pipeline::dataset::Dataset;
/// use simple_pipeline::error::Result;
/// use simple_pipeline::etl::{LoadSummary, Loader};
///
/// struct CountingLoader;
///
/// #[async_trait]
/// impl Loader for CountingLoader {
///     async fn load(&self, dataset: &Dataset) -> Result<LoadSummary> {
///         Ok(LoadSummary {
///             destination: "nowhere".to_string(),
///             rows: dataset.row_count() as u64,
///             created: false,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Loader: Send + Sync {
    /// Load the dataset to the destination, replacing whatever was there
    ///
    /// # Errors
    /// Returns an error if loading fails (connection, permissions, timeout, schema)
    async fn load(&self, dataset: &Dataset) -> Result<LoadSummary>;
}
