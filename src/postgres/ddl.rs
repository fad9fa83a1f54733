//! DDL and column-compatibility rules for the destination table

use super::TableIdentifier;
use super::catalog::ExistingColumn;
use crate::dataset::{ColumnType, Dataset};
use crate::error::{Error, Result};
use pg_escape::quote_identifier;

/// Map a dataset column type to the PostgreSQL type used on CREATE
pub(crate) fn pg_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Int => "BIGINT",
        ColumnType::Float => "DOUBLE PRECISION",
        ColumnType::Text => "TEXT",
        ColumnType::DateTime => "TIMESTAMP",
    }
}

pub(crate) fn create_table_sql(table: &TableIdentifier, dataset: &Dataset) -> String {
    let columns = dataset
        .columns()
        .iter()
        .map(|c| format!("{} {}", quote_identifier(c.name()), pg_type(c.column_type())))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({})", table.qualified(), columns)
}

pub(crate) fn truncate_sql(table: &TableIdentifier) -> String {
    format!("TRUNCATE TABLE {}", table.qualified())
}

fn normalize(info_schema_type: &str) -> &str {
    match info_schema_type {
        "smallint" | "integer" | "bigint" => "integer",
        "real" | "double precision" | "numeric" => "numeric",
        "text" | "character varying" | "character" | "citext" => "text",
        "timestamp without time zone" | "timestamp with time zone" | "date" => "timestamp",
        other => other,
    }
}

/// Whether values of `ty` can be copied into a column of `info_schema_type`
///
/// Text is accepted everywhere; the server parses it and rejects bad values.
pub(crate) fn compatible(ty: ColumnType, info_schema_type: &str) -> bool {
    let target = normalize(info_schema_type);
    match ty {
        ColumnType::Text => true,
        ColumnType::Int => matches!(target, "integer" | "numeric" | "text"),
        ColumnType::Float => matches!(target, "numeric" | "text"),
        ColumnType::DateTime => matches!(target, "timestamp" | "text"),
    }
}

/// Check every dataset column against the existing table before truncating it
pub(crate) fn check_compatible(
    table: &TableIdentifier,
    dataset: &Dataset,
    existing: &[ExistingColumn],
) -> Result<()> {
    let mismatch = |reason: String| Error::SchemaMismatch {
        table: table.to_string(),
        reason,
    };

    for column in dataset.columns() {
        let Some(target) = existing.iter().find(|e| e.name == column.name()) else {
            return Err(mismatch(format!(
                "column '{}' does not exist (table has: {})",
                column.name(),
                existing
                    .iter()
                    .map(|e| e.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        };
        if !compatible(column.column_type(), &target.data_type) {
            return Err(mismatch(format!(
                "column '{}' is {} in the dataset but {} in the table",
                column.name(),
                column.column_type(),
                target.data_type
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn existing(cols: &[(&str, &str)]) -> Vec<ExistingColumn> {
        cols.iter()
            .map(|(name, ty)| ExistingColumn {
                name: name.to_string(),
                data_type: ty.to_string(),
            })
            .collect()
    }

    fn dataset() -> Dataset {
        Dataset::from_rows(
            &["fips", "Cases"],
            vec![vec!["01001".into(), Value::Int(4)]],
        )
        .unwrap()
    }

    #[test]
    fn test_create_table_sql() {
        let table = TableIdentifier::new("covid", "counties");
        assert_eq!(
            create_table_sql(&table, &dataset()),
            r#"CREATE TABLE covid.counties (fips TEXT, "Cases" BIGINT)"#
        );
        assert_eq!(truncate_sql(&table), "TRUNCATE TABLE covid.counties");
    }

    #[test]
    fn test_compatible_existing_table() {
        let table = TableIdentifier::new("covid", "counties");
        let cols = existing(&[("fips", "text"), ("Cases", "integer"), ("extra", "text")]);
        assert!(check_compatible(&table, &dataset(), &cols).is_ok());
    }

    #[test]
    fn test_missing_column_is_mismatch() {
        let table = TableIdentifier::new("covid", "counties");
        let cols = existing(&[("fips", "text"), ("cases", "bigint")]);
        let err = check_compatible(&table, &dataset(), &cols).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { ref reason, .. } if reason.contains("Cases")));
    }

    #[test]
    fn test_incompatible_type_is_mismatch() {
        let table = TableIdentifier::new("covid", "counties");
        let cols = existing(&[("fips", "text"), ("Cases", "timestamp without time zone")]);
        assert!(check_compatible(&table, &dataset(), &cols).is_err());
    }

    #[test]
    fn test_type_rules() {
        assert!(compatible(ColumnType::Int, "double precision"));
        assert!(compatible(ColumnType::DateTime, "date"));
        assert!(!compatible(ColumnType::Float, "bigint"));
        assert!(compatible(ColumnType::Text, "boolean"));
    }
}
