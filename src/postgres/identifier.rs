//! `schema.table` destination identifiers

use crate::error::Error;
use pg_escape::quote_identifier;
use std::fmt;
use std::str::FromStr;

/// A destination table addressed as `schema.table`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableIdentifier {
    schema: String,
    table: String,
}

impl TableIdentifier {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted form safe to splice into SQL
    pub fn qualified(&self) -> String {
        format!(
            "{}.{}",
            quote_identifier(&self.schema),
            quote_identifier(&self.table)
        )
    }
}

impl FromStr for TableIdentifier {
    type Err = Error;

    /// Parse `schema.table`; exactly one `.` with text on both sides
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((schema, table))
                if !schema.is_empty() && !table.is_empty() && !table.contains('.') =>
            {
                Ok(Self::new(schema, table))
            }
            _ => Err(Error::InvalidIdentifier(s.to_string())),
        }
    }
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let id: TableIdentifier = "covid.nyt_cases_counties".parse().unwrap();
        assert_eq!(id.schema(), "covid");
        assert_eq!(id.table(), "nyt_cases_counties");
        assert_eq!(id.to_string(), "covid.nyt_cases_counties");
    }

    #[test]
    fn test_parse_rejects_wrong_separator_count() {
        for bad in ["no_schema", "a.b.c", ".table", "schema.", ""] {
            assert!(
                matches!(bad.parse::<TableIdentifier>(), Err(Error::InvalidIdentifier(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_qualified_quotes_awkward_names() {
        let id = TableIdentifier::new("user/repo", "Cases \"2021\"");
        assert_eq!(id.qualified(), r#""user/repo"."Cases ""2021""""#);
    }
}
