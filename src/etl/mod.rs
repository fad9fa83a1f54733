//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides the stage traits and the [`Pipeline`] that runs them
//! in order, stopping at the first failing stage.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::{LoadSummary, Loader};
pub use pipeline::{Pipeline, RunSummary};
pub use transform::{IdentityTransformer, Transformer};
