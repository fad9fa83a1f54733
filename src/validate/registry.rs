//! Name → validation suite lookup

use super::{Suite, suites};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Registry of validation suites, keyed by the transform name they check
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    suites: BTreeMap<String, Suite>,
}

impl ValidationRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the builtin suites
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(suites::nyt_cases_counties());
        registry.register(suites::cdc_vaccines_counties());
        registry.register(suites::acs_population_counties());
        registry
    }

    /// Add a suite under its own name, replacing any previous suite of that name
    pub fn register(&mut self, suite: Suite) -> &mut Self {
        self.suites.insert(suite.name().to_string(), suite);
        self
    }

    /// Exact-name lookup
    ///
    /// # Errors
    /// Returns [`Error::UnknownSuite`] if no suite has that name
    pub fn resolve(&self, name: &str) -> Result<&Suite> {
        self.suites.get(name).ok_or_else(|| Error::UnknownSuite {
            name: name.to_string(),
            available: self.names().into_iter().map(str::to_string).collect(),
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.suites.keys().map(String::as_str).collect()
    }
}
