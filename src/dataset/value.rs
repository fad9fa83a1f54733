//! Cell values and column types

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Formats accepted when coercing text to a datetime
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Int,
    Float,
    DateTime,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The column type this value naturally belongs to, `None` for nulls
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(ColumnType::Text),
            Self::Int(_) => Some(ColumnType::Int),
            Self::Float(_) => Some(ColumnType::Float),
            Self::DateTime(_) => Some(ColumnType::DateTime),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view used by range and comparison checks
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Coerce to an integer value. Floats must be integral, text must parse.
    pub fn to_int(&self) -> Result<Value, String> {
        match self {
            Self::Int(i) => Ok(Self::Int(*i)),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(Self::Int(*f as i64)),
            Self::Float(f) => Err(format!("cannot convert float {f} to int")),
            Self::Text(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(Self::Int(i));
                }
                Self::Float(
                    trimmed
                        .parse::<f64>()
                        .map_err(|_| format!("cannot convert '{s}' to int"))?,
                )
                .to_int()
            }
            Self::Null => Err("cannot convert null to int".to_string()),
            Self::DateTime(dt) => Err(format!("cannot convert datetime {dt} to int")),
        }
    }

    /// Coerce to a datetime. Nulls stay null, text must match a known date or datetime format.
    pub fn to_datetime(&self) -> Result<Value, String> {
        match self {
            Self::Null => Ok(Self::Null),
            Self::DateTime(dt) => Ok(Self::DateTime(*dt)),
            Self::Text(s) => parse_datetime(s.trim())
                .map(Self::DateTime)
                .ok_or_else(|| format!("cannot parse '{s}' as a datetime")),
            other => Err(format!("cannot convert {other} to datetime")),
        }
    }

    /// Coerce to text using the canonical rendering
    pub fn to_text(&self) -> Value {
        match self {
            Self::Null => Self::Null,
            other => Self::Text(other.to_string()),
        }
    }

    /// Type-tagged key used for hashing and duplicate detection
    pub(crate) fn key(&self) -> String {
        match self {
            Self::Null => "n:".to_string(),
            Self::Text(s) => format!("s:{s}"),
            Self::Int(i) => format!("i:{i}"),
            Self::Float(f) => format!("f:{}", f.to_bits()),
            Self::DateTime(dt) => format!("d:{}", dt.and_utc().timestamp_micros()),
        }
    }

    /// Infer a typed value from a raw CSV field under the given column type
    pub(crate) fn parse_as(raw: &str, ty: ColumnType) -> Value {
        if raw.is_empty() {
            return Self::Null;
        }
        match ty {
            ColumnType::Int => raw
                .trim()
                .parse()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::Text(raw.to_string())),
            ColumnType::Float => raw
                .trim()
                .parse()
                .map(Self::Float)
                .unwrap_or_else(|_| Self::Text(raw.to_string())),
            ColumnType::DateTime => parse_datetime(raw.trim())
                .map(Self::DateTime)
                .unwrap_or_else(|| Self::Text(raw.to_string())),
            ColumnType::Text => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) if v.is_nan() => f.write_str("NaN"),
            Self::Float(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Float(v) => write!(f, "{v:?}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Narrowest type that can represent every non-empty raw field
pub(crate) fn infer_type<'a>(raw: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut ty: Option<ColumnType> = None;
    for field in raw.into_iter().filter(|f| !f.is_empty()) {
        let field = field.trim();
        let candidate = if field.parse::<i64>().is_ok() {
            ColumnType::Int
        } else if field.parse::<f64>().is_ok() {
            ColumnType::Float
        } else {
            return ColumnType::Text;
        };
        ty = Some(match (ty, candidate) {
            (Some(ColumnType::Float), _) | (_, ColumnType::Float) => ColumnType::Float,
            _ => ColumnType::Int,
        });
    }
    ty.unwrap_or(ColumnType::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_type(["1", "2", ""]), ColumnType::Int);
        assert_eq!(infer_type(["1", "2.5"]), ColumnType::Float);
        assert_eq!(infer_type(["1", "Puerto Rico"]), ColumnType::Text);
        assert_eq!(infer_type(["", ""]), ColumnType::Text);
        assert_eq!(infer_type(["01001"]), ColumnType::Int);
    }

    #[test]
    fn test_to_int() {
        assert_eq!(Value::Float(12.0).to_int(), Ok(Value::Int(12)));
        assert_eq!(Value::from(" 42 ").to_int(), Ok(Value::Int(42)));
        assert_eq!(Value::from("7.0").to_int(), Ok(Value::Int(7)));
        assert!(Value::Float(1.5).to_int().is_err());
        assert!(Value::Null.to_int().is_err());
    }

    #[test]
    fn test_to_datetime() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            Value::from("2021-03-04").to_datetime(),
            Ok(Value::DateTime(expected))
        );
        assert_eq!(
            Value::from("03/04/2021").to_datetime(),
            Ok(Value::DateTime(expected))
        );
        assert_eq!(Value::Null.to_datetime(), Ok(Value::Null));
        assert!(Value::from("yesterday").to_datetime().is_err());
    }

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(Value::Float(1001.0).to_string(), "1001.0");
        assert_eq!(Value::Int(1001).to_string(), "1001");
        assert_eq!(Value::Null.to_string(), "");
    }
}
