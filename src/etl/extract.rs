//! Extractor trait for pulling a dataset out of a source

use crate::dataset::Dataset;
use crate::error::Result;

/// Extractor trait for extracting a dataset from a source
///
/// Implementors define where the table comes from:
/// - HTTP endpoints
/// - Local files
///
/// # Example
/// ```no_run
/// use simple_pipeline::dataset::Dataset;
/// use simple_pipeline::error::Result;
/// use simple_pipeline::etl::Extractor;
///
/// struct EmptySource;
///
/// impl Extractor for EmptySource {
///     async fn extract(&self) -> Result<Dataset> {
///         Ok(Dataset::default())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// Extract the full dataset from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (network, I/O, parsing, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Dataset>> + Send;
}
