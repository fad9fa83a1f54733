//! HTTP client for remote sources
//!
//! Provides [`HttpCsvSource`], which fetches a CSV document with a bounded GET.

mod http;

pub use http::{DEFAULT_HTTP_TIMEOUT, HttpCsvSource};
