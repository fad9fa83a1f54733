//! Named dataset transforms
//!
//! Transforms are plain functions from a borrowed [`Dataset`] to a new one.
//! [`TransformRegistry`] maps names to those functions so the CLI can pick one
//! by name without any reflection.

mod counties;
mod fips;

pub use counties::{acs_population_counties, cdc_vaccines_counties, nyt_cases_counties};
pub use fips::{FIPS_WIDTH, clean_fips, clean_fips_column};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::etl::Transformer;
use std::collections::BTreeMap;

/// Signature every registered transform implements
pub type TransformFn = fn(&Dataset) -> Result<Dataset>;

/// A transform function paired with the name it was registered under
#[derive(Debug, Clone)]
pub struct NamedTransform {
    name: String,
    func: TransformFn,
}

impl NamedTransform {
    pub fn new(name: impl Into<String>, func: TransformFn) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl Transformer for NamedTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        (self.func)(input).map_err(|e| match e {
            Error::Transform { .. } => e,
            other => Error::Transform {
                name: self.name.clone(),
                reason: other.to_string(),
            },
        })
    }
}

/// Registry of transforms, keyed by name
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, TransformFn>,
}

impl TransformRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the builtin transforms
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry
            .register("nyt_cases_counties", nyt_cases_counties)
            .register("cdc_vaccines_counties", cdc_vaccines_counties)
            .register("acs_population_counties", acs_population_counties);
        registry
    }

    /// Add a transform, replacing any previous one of the same name
    pub fn register(&mut self, name: impl Into<String>, func: TransformFn) -> &mut Self {
        self.transforms.insert(name.into(), func);
        self
    }

    /// Exact-name lookup
    ///
    /// # Errors
    /// Returns [`Error::UnknownTransform`] if no transform has that name
    pub fn resolve(&self, name: &str) -> Result<NamedTransform> {
        self.transforms
            .get(name)
            .map(|&func| NamedTransform::new(name, func))
            .ok_or_else(|| Error::UnknownTransform {
                name: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.keys().map(String::as_str).collect()
    }
}
