//! Mapping driver errors onto the pipeline's error taxonomy

use crate::error::Error;
use std::time::Duration;

/// SQLSTATE codes meaning the data does not fit the table
const SCHEMA_MISMATCH_CODES: &[&str] = &[
    "42703", // undefined_column
    "42804", // datatype_mismatch
    "22P02", // invalid_text_representation
    "22003", // numeric_value_out_of_range
    "23502", // not_null_violation
    "22007", // invalid_datetime_format
    "22008", // datetime_field_overflow
];

fn format_pg_error(prefix: &str, error: &tokio_postgres::Error) -> String {
    if let Some(db_error) = error.as_db_error() {
        let detail = db_error.detail().unwrap_or("n/a");
        let hint = db_error.hint().unwrap_or("n/a");
        format!(
            "{prefix}: {} (sqlstate={} detail={} hint={})",
            db_error.message(),
            db_error.code().code(),
            detail,
            hint
        )
    } else {
        format!("{prefix}: {error}")
    }
}

/// Classify a driver error by SQLSTATE
///
/// `limit` is the statement timeout in force, `table` the destination used in
/// schema mismatch messages.
pub(crate) fn classify(
    prefix: &str,
    error: &tokio_postgres::Error,
    limit: Duration,
    table: &str,
) -> Error {
    let message = format_pg_error(prefix, error);
    let Some(code) = error.code().map(|c| c.code()) else {
        let io_failure =
            std::error::Error::source(error).is_some_and(|s| s.is::<std::io::Error>());
        return if error.is_closed() || io_failure {
            Error::Connection(message)
        } else {
            Error::Database(message)
        };
    };

    classify_code(code, message, limit, table)
}

/// Map a SQLSTATE code onto the error taxonomy
fn classify_code(code: &str, message: String, limit: Duration, table: &str) -> Error {
    match code {
        "57014" => Error::Timeout {
            limit,
            reason: message,
        },
        "42501" => Error::Permission(message),
        c if SCHEMA_MISMATCH_CODES.contains(&c) => Error::SchemaMismatch {
            table: table.to_string(),
            reason: message,
        },
        c if c.starts_with("08") || c.starts_with("28") => Error::Connection(message),
        _ => Error::Database(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(600);

    fn code(code: &str) -> Error {
        classify_code(code, format!("sqlstate {code}"), LIMIT, "public.cases")
    }

    #[test]
    fn test_query_canceled_is_timeout() {
        match code("57014") {
            Error::Timeout { limit, reason } => {
                assert_eq!(limit, LIMIT);
                assert_eq!(reason, "sqlstate 57014");
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_insufficient_privilege_is_permission() {
        assert!(matches!(code("42501"), Error::Permission(_)));
    }

    #[test]
    fn test_bad_values_are_schema_mismatch() {
        for c in SCHEMA_MISMATCH_CODES {
            match code(c) {
                Error::SchemaMismatch { table, .. } => assert_eq!(table, "public.cases"),
                other => panic!("{c}: expected SchemaMismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_connection_classes() {
        assert!(matches!(code("08006"), Error::Connection(_)));
        assert!(matches!(code("08001"), Error::Connection(_)));
        assert!(matches!(code("28P01"), Error::Connection(_)));
    }

    #[test]
    fn test_other_codes_are_database_errors() {
        assert!(matches!(code("42P01"), Error::Database(_)));
        assert!(matches!(code("23505"), Error::Database(_)));
    }
}
