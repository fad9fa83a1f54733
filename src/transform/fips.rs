//! FIPS code normalization

use crate::dataset::{Column, ColumnType, Value};

/// Width of a county FIPS code
pub const FIPS_WIDTH: usize = 5;

/// Normalize one value to a zero-padded five character FIPS string
///
/// Integers are padded, floats lose their fractional part first, text keeps
/// whatever precedes the first `.`. Nulls (and NaN) stay null.
pub fn clean_fips(value: &Value) -> Value {
    match value {
        Value::Int(i) => Value::Text(format!("{:0>width$}", i, width = FIPS_WIDTH)),
        Value::Float(f) if f.is_finite() => {
            Value::Text(format!("{:0>width$}", f.trunc() as i64, width = FIPS_WIDTH))
        }
        Value::Text(s) => {
            let digits = s.split('.').next().unwrap_or_default().trim();
            if digits.is_empty() {
                Value::Null
            } else {
                Value::Text(format!("{:0>width$}", digits, width = FIPS_WIDTH))
            }
        }
        Value::Float(_) | Value::Null | Value::DateTime(_) => Value::Null,
    }
}

/// Apply [`clean_fips`] to a whole column, producing a text column
pub fn clean_fips_column(column: &Column) -> Result<Column, String> {
    column.map(ColumnType::Text, |v| Ok(clean_fips(v)))
}
