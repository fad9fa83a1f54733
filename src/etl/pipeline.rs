//! Pipeline orchestration for ETL operations

use super::{Extractor, LoadSummary, Loader, Transformer};
use crate::error::{Error, PipelineError, Stage};
use crate::validate::{self, Suite, ValidationReport};

/// What a completed run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub extracted_rows: usize,
    pub transformed_rows: usize,
    pub validation: Option<ValidationReport>,
    pub load: LoadSummary,
}

/// ETL Pipeline that orchestrates Extract, Transform, Validate and Load
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type
/// - `L`: Loader type
///
/// Every stage is fatal: a failing extract never reaches the transform, and a
/// failing validation suite never reaches the loader.
///
/// # Example
/// ```no_run
/// use simple_pipeline::etl::{IdentityTransformer, Pipeline};
/// use simple_pipeline::postgres::{TableIdentifier, TableLoader, TableSync};
/// use simple_pipeline::storage::CsvFileReader;
/// use simple_pipeline::config::ConnectionString;
///
/// # async fn example() -> eyre::Result<()> {
/// let sync = TableSync::new(ConnectionString::new("postgres://localhost/db"));
/// let pipeline = Pipeline::new(
///     CsvFileReader::new("data.csv"),
///     IdentityTransformer::new(),
///     TableLoader::new(sync, "public.data".parse::<TableIdentifier>()?),
/// );
///
/// let summary = pipeline.run().await?;
/// println!("Loaded {} rows", summary.load.rows);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
    suite: Option<Suite>,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer,
    L: Loader,
{
    /// Create a new pipeline without a validation suite
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
            suite: None,
        }
    }

    /// Run `suite` between transform and load
    pub fn with_validation(mut self, suite: Suite) -> Self {
        self.suite = Some(suite);
        self
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract the dataset from source
    /// 2. Transform it
    /// 3. Validate it, if a suite is attached
    /// 4. Load it to the destination
    ///
    /// # Errors
    /// Returns a [`PipelineError`] naming the first stage that failed
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        log::info!("Starting extract...");
        let extracted = self
            .extractor
            .extract()
            .await
            .map_err(|e| PipelineError::new(Stage::Extract, e))?;
        let extracted_rows = extracted.row_count();
        log::info!(
            "Extracted {} row(s) x {} column(s)",
            extracted_rows,
            extracted.column_count()
        );

        log::info!("Starting transform with {}...", self.transformer.name());
        let transformed = self
            .transformer
            .transform(&extracted)
            .map_err(|e| PipelineError::new(Stage::Transform, e))?;
        log::info!("Transformed to {} row(s)", transformed.row_count());
        drop(extracted);

        let validation = match &self.suite {
            Some(suite) => {
                log::info!("Starting data validation with {}...", suite.name());
                let report = validate::run(&transformed, suite);
                if !report.all_passed() {
                    return Err(PipelineError::new(
                        Stage::Validate,
                        Error::ValidationFailed {
                            failures: report.failures(),
                        },
                    ));
                }
                Some(report)
            }
            None => {
                log::info!("No data validation specified, skipping to load step.");
                None
            }
        };

        if transformed.is_empty() {
            log::warn!("Dataset is empty, destination will be left with no rows");
        }

        log::info!("Starting load...");
        let load = self
            .loader
            .load(&transformed)
            .await
            .map_err(|e| PipelineError::new(Stage::Load, e))?;
        log::info!("Loaded {} row(s) to {}", load.rows, load.destination);

        Ok(RunSummary {
            extracted_rows,
            transformed_rows: transformed.row_count(),
            validation,
            load,
        })
    }
}
