//! Simple Pipeline
//!
//! A minimal batch ETL pipeline: pull a CSV from a URL or file, optionally
//! apply a named transform and validation suite, then replace the contents of
//! a PostgreSQL table with the result via `COPY`.

pub mod cli;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod etl;
pub mod postgres;
pub mod storage;
pub mod transform;
pub mod validate;

// Re-exports for convenience
pub use client::HttpCsvSource;
pub use config::{ConnectionString, PipelineConfig};
pub use dataset::{Column, ColumnType, Dataset, Value};
pub use error::{Error, PipelineError, Result, Stage};
pub use etl::{Extractor, IdentityTransformer, Loader, Pipeline, Transformer};
pub use postgres::{TableIdentifier, TableLoader, TableSync};
pub use storage::CsvFileReader;
pub use transform::TransformRegistry;
pub use validate::{Suite, ValidationRegistry};
