//! Transformer trait for reshaping a dataset

use crate::dataset::Dataset;
use crate::error::Result;

/// Transformer trait for transforming a dataset
///
/// Implementors receive the dataset by shared reference and return a new one:
/// - Type coercion of designated columns
/// - Row filtering
/// - Column renaming and selection
///
/// # Example
/// ```
/// use simple_pipeline::dataset::Dataset;
/// use simple_pipeline::error::Result;
/// use simple_pipeline::etl::Transformer;
///
/// struct Lowercase;
///
/// impl Transformer for Lowercase {
///     fn name(&self) -> &str {
///         "lowercase"
///     }
///
///     fn transform(&self, input: &Dataset) -> Result<Dataset> {
///         input.rename_with(|name| name.to_lowercase())
///     }
/// }
/// ```
pub trait Transformer: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &str;

    /// Transform the dataset
    ///
    /// # Errors
    /// Returns an error if a column is missing or a value cannot be coerced
    fn transform(&self, input: &Dataset) -> Result<Dataset>;
}

/// Identity transformer that passes the dataset through unchanged
///
/// Used when no transform name is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTransformer;

impl IdentityTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for IdentityTransformer {
    fn name(&self) -> &str {
        "identity"
    }

    fn transform(&self, input: &Dataset) -> Result<Dataset> {
        Ok(input.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    #[test]
    fn test_identity_transformer() {
        let input = Dataset::from_rows(&["a"], vec![vec![Value::Int(1)], vec![Value::Int(2)]])
            .unwrap();
        let output = IdentityTransformer::new().transform(&input).unwrap();
        assert_eq!(input, output);
    }
}
