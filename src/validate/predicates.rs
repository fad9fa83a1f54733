//! Reusable predicate constructors for validation suites
//!
//! Nulls and non-numeric values fail numeric checks: a bound cannot be
//! proven for a value that is not a number.

use crate::dataset::Dataset;
use std::collections::HashSet;

/// Every value of `column` lies in `[min, max]`
pub fn range_check(
    column: &str,
    min: f64,
    max: f64,
) -> impl Fn(&Dataset) -> bool + Send + Sync + use<> {
    let column = column.to_string();
    move |dataset: &Dataset| {
        let Some(col) = dataset.column(&column) else {
            log::debug!("range check: column '{}' not found", column);
            return false;
        };
        col.values()
            .iter()
            .all(|v| v.as_f64().is_some_and(|x| x >= min && x <= max))
    }
}

/// No two rows share the same values across `columns`
pub fn unique_on(columns: &[&str]) -> impl Fn(&Dataset) -> bool + Send + Sync + use<> {
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    move |dataset: &Dataset| {
        let Ok(cols) = columns
            .iter()
            .map(|c| dataset.require(c))
            .collect::<Result<Vec<_>, _>>()
        else {
            log::debug!("uniqueness check: missing one of {:?}", columns);
            return false;
        };

        let mut seen = HashSet::with_capacity(dataset.row_count());
        (0..dataset.row_count()).all(|row| {
            let key: Vec<String> = cols.iter().map(|c| c.values()[row].key()).collect();
            seen.insert(key)
        })
    }
}

/// Element-wise `left <= right`
pub fn column_le(
    left: &str,
    right: &str,
) -> impl Fn(&Dataset) -> bool + Send + Sync + use<> {
    let (left, right) = (left.to_string(), right.to_string());
    move |dataset: &Dataset| {
        let (Some(l), Some(r)) = (dataset.column(&left), dataset.column(&right)) else {
            log::debug!("comparison: '{}' or '{}' not found", left, right);
            return false;
        };
        l.values()
            .iter()
            .zip(r.values())
            .all(|(a, b)| matches!((a.as_f64(), b.as_f64()), (Some(a), Some(b)) if a <= b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn counts() -> Dataset {
        Dataset::from_rows(
            &["date", "fips", "cases", "deaths"],
            vec![
                vec!["2020-03-01".into(), "01001".into(), Value::Int(10), Value::Int(1)],
                vec!["2020-03-01".into(), "01003".into(), Value::Int(4), Value::Int(4)],
                vec!["2020-03-02".into(), "01001".into(), Value::Int(12), Value::Int(2)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_range_inclusive() {
        let ds = counts();
        assert!(range_check("cases", 4.0, 12.0)(&ds));
        assert!(!range_check("cases", 5.0, 12.0)(&ds));
        assert!(!range_check("missing", 0.0, 1.0)(&ds));
    }

    #[test]
    fn test_range_fails_on_null() {
        let ds = Dataset::from_rows(&["x"], vec![vec![Value::Int(1)], vec![Value::Null]]).unwrap();
        assert!(!range_check("x", 0.0, 10.0)(&ds));
    }

    #[test]
    fn test_unique_on_key_columns() {
        let ds = counts();
        assert!(unique_on(&["date", "fips"])(&ds));
        assert!(!unique_on(&["date"])(&ds));
        assert!(!unique_on(&["nope"])(&ds));
    }

    #[test]
    fn test_column_le() {
        let ds = counts();
        assert!(column_le("deaths", "cases")(&ds));
        assert!(!column_le("cases", "deaths")(&ds));
    }
}
