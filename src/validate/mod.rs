//! Data validation: named suites of predicates and a non-short-circuiting runner
//!
//! A [`Suite`] is an ordered list of [`ValidationTest`]s. [`run`] evaluates
//! every test, even after a failure, and reports each outcome so a single
//! run surfaces all problems with the data.

mod predicates;
mod registry;
mod suites;

pub use predicates::{column_le, range_check, unique_on};
pub use registry::ValidationRegistry;

use crate::dataset::Dataset;
use owo_colors::OwoColorize;
use std::sync::Arc;

/// Boolean check over a whole dataset
pub type Predicate = Arc<dyn Fn(&Dataset) -> bool + Send + Sync>;

/// A predicate plus the message reported when it fails
#[derive(Clone)]
pub struct ValidationTest {
    name: String,
    predicate: Predicate,
    message: String,
}

impl ValidationTest {
    pub fn new(name: impl Into<String>, predicate: Predicate, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            predicate,
            message: message.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn check(&self, dataset: &Dataset) -> bool {
        (self.predicate)(dataset)
    }
}

impl std::fmt::Debug for ValidationTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationTest")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// An ordered, named list of validation tests
#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    tests: Vec<ValidationTest>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Append a test (builder style)
    pub fn test<F>(mut self, name: &str, predicate: F, message: &str) -> Self
    where
        F: Fn(&Dataset) -> bool + Send + Sync + 'static,
    {
        self.tests
            .push(ValidationTest::new(name, Arc::new(predicate), message));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tests(&self) -> &[ValidationTest] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Outcome of a single validation test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

/// Outcome of a whole suite, in suite order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub suite: String,
    pub results: Vec<TestResult>,
}

impl ValidationReport {
    /// AND of every test result
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Failure messages of every failed test
    pub fn failures(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| format!("{}: {}", r.name, r.message))
            .collect()
    }
}

/// Run every test in `suite` against `dataset`
///
/// Predicates only ever see a shared borrow, so no test can alter the data
/// another test (or the load stage) sees. A failing test does not stop the run.
pub fn run(dataset: &Dataset, suite: &Suite) -> ValidationReport {
    let results: Vec<TestResult> = suite
        .tests
        .iter()
        .map(|test| {
            let passed = test.check(dataset);
            if passed {
                log::info!("Data test {} {}", test.name, "passed".green());
            } else {
                log::error!("Data test {} {}. {}", test.name, "failed".red(), test.message);
            }
            TestResult {
                name: test.name.clone(),
                passed,
                message: test.message.clone(),
            }
        })
        .collect();

    let report = ValidationReport {
        suite: suite.name.clone(),
        results,
    };
    log::info!(
        "{}/{} passed",
        report.passed_count(),
        report.results.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dataset() -> Dataset {
        Dataset::from_rows(&["a"], vec![vec![Value::Int(1)], vec![Value::Int(2)]]).unwrap()
    }

    #[test]
    fn test_runner_never_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = |calls: &Arc<AtomicUsize>, result: bool| {
            let calls = calls.clone();
            move |_: &Dataset| {
                calls.fetch_add(1, Ordering::SeqCst);
                result
            }
        };

        let suite = Suite::new("four")
            .test("first", counter(&calls, true), "first failed")
            .test("second", counter(&calls, false), "second failed")
            .test("third", counter(&calls, true), "third failed")
            .test("fourth", counter(&calls, true), "fourth failed");

        let report = run(&dataset(), &suite);

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(report.results.len(), 4);
        assert!(!report.all_passed());
        assert_eq!(report.passed_count(), 3);
        assert!(!report.results[1].passed);
        assert_eq!(report.failures(), vec!["second: second failed".to_string()]);
    }

    #[test]
    fn test_all_passing_suite() {
        let suite = Suite::new("ok")
            .test("non_empty", |d: &Dataset| !d.is_empty(), "empty")
            .test("range", range_check("a", 0.0, 10.0), "out of range");
        let report = run(&dataset(), &suite);
        assert!(report.all_passed());
        assert!(report.failures().is_empty());
    }

    #[test]
    fn test_empty_suite_passes() {
        let report = run(&dataset(), &Suite::new("empty"));
        assert!(report.all_passed());
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_dataset_unchanged_by_run() {
        let ds = dataset();
        let before = ds.clone();
        let suite = Suite::new("s").test("unique", unique_on(&["a"]), "dupes");
        run(&ds, &suite);
        assert_eq!(ds, before);
    }
}
