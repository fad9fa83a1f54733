//! CLI helper functions

use crate::{
    client::HttpCsvSource,
    config::PipelineConfig,
    dataset::Dataset,
    error::{Error, PipelineError, Result, Stage},
    etl::{Extractor, IdentityTransformer, Pipeline, RunSummary, Transformer},
    postgres::{TableIdentifier, TableLoader, TableSync, execute_script, render_script},
    storage::CsvFileReader,
    transform::{NamedTransform, TransformRegistry},
    validate::{Suite, ValidationRegistry},
};
use std::path::Path;

/// Options given as `KEY=VALUE` pairs on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Transform name, also the name of its validation suite
    pub name: Option<String>,
}

impl RunOptions {
    /// Parse `KEY=VALUE` pairs. `name` is the only recognised key.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> std::result::Result<Self, String> {
        let mut options = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let Some((key, value)) = pair.split_once('=') else {
                return Err(format!("expected KEY=VALUE, got '{pair}'"));
            };
            let (key, value) = (key.trim(), value.trim());
            if value.is_empty() {
                return Err(format!("option '{key}' has no value"));
            }
            match key {
                "name" => options.name = Some(value.to_string()),
                other => return Err(format!("unknown option '{other}' (expected: name)")),
            }
        }
        Ok(options)
    }

    /// Fold in a transform name given as its own flag
    ///
    /// Giving two different names is an error.
    pub fn with_name(mut self, name: Option<String>) -> std::result::Result<Self, String> {
        if let Some(flag) = name {
            if let Some(existing) = &self.name
                && *existing != flag
            {
                return Err(format!(
                    "conflicting transform names '{existing}' and '{flag}'"
                ));
            }
            self.name = Some(flag);
        }
        Ok(self)
    }
}

/// One `run` invocation, as parsed from the command line
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source: String,
    pub destination: String,
    pub local_source: bool,
    pub validate_data: bool,
    pub options: RunOptions,
}

/// Where the dataset comes from
pub enum DatasetSource {
    Remote(HttpCsvSource),
    Local(CsvFileReader),
}

impl DatasetSource {
    /// A local path when `local` is set, otherwise a URL
    pub fn new(source: &str, local: bool, config: &PipelineConfig) -> Result<Self> {
        if local {
            Ok(Self::Local(CsvFileReader::new(source)))
        } else {
            HttpCsvSource::try_new(source, config.http_timeout).map(Self::Remote)
        }
    }
}

impl Extractor for DatasetSource {
    async fn extract(&self) -> Result<Dataset> {
        match self {
            Self::Remote(http) => http.extract().await,
            Self::Local(file) => file.extract().await,
        }
    }
}

/// The transform picked by `name`, or pass-through when none was given
#[derive(Debug)]
pub enum SelectedTransform {
    Identity(IdentityTransformer),
    Named(NamedTransform),
}

impl Transformer for SelectedTransform {
    fn name(&self) -> &str {
        match self {
            Self::Identity(t) => t.name(),
            Self::Named(t) => t.name(),
        }
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        match self {
            Self::Identity(t) => t.transform(input),
            Self::Named(t) => t.transform(input),
        }
    }
}

/// A `run` request with every name already resolved
///
/// Built without configuration or I/O, so a mistyped transform, suite or
/// destination is reported before credentials are even looked up.
#[derive(Debug)]
pub struct RunPlan {
    source: String,
    local_source: bool,
    transformer: SelectedTransform,
    suite: Option<Suite>,
    table: TableIdentifier,
}

impl RunPlan {
    /// Resolve the transform, the suite and the destination table
    pub fn prepare(
        request: &RunRequest,
        transforms: &TransformRegistry,
        suites: &ValidationRegistry,
    ) -> Result<Self, PipelineError> {
        let transformer = match &request.options.name {
            Some(name) => SelectedTransform::Named(
                transforms
                    .resolve(name)
                    .map_err(|e| PipelineError::new(Stage::Transform, e))?,
            ),
            None => {
                log::info!("No transformation specified, passing data through");
                SelectedTransform::Identity(IdentityTransformer::new())
            }
        };

        let suite = match (&request.options.name, request.validate_data) {
            (Some(name), true) => Some(
                suites
                    .resolve(name)
                    .map_err(|e| PipelineError::new(Stage::Validate, e))?
                    .clone(),
            ),
            (None, true) => {
                log::warn!("--validate-data needs a transform name, skipping validation");
                None
            }
            (_, false) => None,
        };

        let table: TableIdentifier = request
            .destination
            .parse()
            .map_err(|e| PipelineError::new(Stage::Load, e))?;

        Ok(Self {
            source: request.source.clone(),
            local_source: request.local_source,
            transformer,
            suite,
            table,
        })
    }

    pub fn table(&self) -> &TableIdentifier {
        &self.table
    }
}

/// Run one source → destination pipeline
///
/// Pipeline: DatasetSource → SelectedTransform → (Suite) → TableLoader
pub async fn run_etl(plan: RunPlan, config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let source = DatasetSource::new(&plan.source, plan.local_source, config)
        .map_err(|e| PipelineError::new(Stage::Extract, e))?;
    let loader = TableLoader::new(TableSync::from_config(config), plan.table);

    let pipeline = Pipeline::new(source, plan.transformer, loader);
    let pipeline = match plan.suite {
        Some(suite) => pipeline.with_validation(suite),
        None => pipeline,
    };

    let summary = pipeline.run().await?;
    log::info!(
        "✓ Loaded {} row(s) into {}{}",
        summary.load.rows,
        summary.load.destination,
        if summary.load.created {
            " (new table)"
        } else {
            ""
        }
    );
    Ok(summary)
}

/// Render and execute a SQL script with `$OWNER` and `$REPO` substituted
pub async fn run_sql_script(
    script: impl AsRef<Path>,
    owner: &str,
    repo: &str,
    config: &PipelineConfig,
) -> Result<usize> {
    let script = script.as_ref();
    let sql = std::fs::read_to_string(script).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound {
            path: script.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;

    let statements = render_script(&sql, owner, repo);
    log::info!(
        "Running {} statement(s) from {}",
        statements.len(),
        script.display()
    );
    let count = execute_script(config, &statements).await?;
    log::info!("✓ Executed {} statement(s)", count);
    Ok(count)
}

/// Registered transform and suite names, as printed by `list`
pub fn list_registered(
    transforms: &TransformRegistry,
    suites: &ValidationRegistry,
) -> (Vec<String>, Vec<String>) {
    (
        transforms.names().into_iter().map(str::to_string).collect(),
        suites.names().into_iter().map(str::to_string).collect(),
    )
}
