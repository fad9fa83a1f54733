//! Builtin transforms for county-level public health datasets

use super::fips::clean_fips_column;
use crate::dataset::{Column, ColumnType, Dataset, Value};
use crate::error::{Error, Result};

const CDC_KEEP_COLUMNS: &[&str] = &[
    "date",
    "fips",
    "series_complete_pop_pct",
    "series_complete_yes",
    "series_complete_18plus",
    "series_complete_18pluspop_pct",
    "series_complete_65plus",
    "series_complete_65pluspop_pct",
    "completeness_pct",
];

/// (source column, output column) pairs cast to int by the ACS transform
const ACS_POPULATION_COLUMNS: &[(&str, &str)] = &[
    ("S0101_C01_001E", "total_population"),
    ("S0101_C01_025E", "population_16plus"),
    ("S0101_C01_026E", "population_18plus"),
    ("S0101_C01_030E", "population_65plus"),
];

fn failed(name: &str) -> impl Fn(String) -> Error + '_ {
    move |reason| Error::Transform {
        name: name.to_string(),
        reason,
    }
}

fn to_datetime(column: &Column) -> std::result::Result<Column, String> {
    column.map(ColumnType::DateTime, Value::to_datetime)
}

fn to_int(column: &Column) -> std::result::Result<Column, String> {
    column.map(ColumnType::Int, Value::to_int)
}

/// NYT county-level COVID cases and deaths
///
/// Casts `date` to datetime, normalizes `fips`, drops Puerto Rico (no deaths
/// data) and casts `deaths` to int.
pub fn nyt_cases_counties(input: &Dataset) -> Result<Dataset> {
    let err = failed("nyt_cases_counties");

    let df = input
        .with_column(to_datetime(input.require("date")?).map_err(&err)?)?
        .with_column(clean_fips_column(input.require("fips")?).map_err(&err)?)?;

    let state = df.require("state")?;
    let df = df.filter_rows(|row| state.values()[row].as_str() != Some("Puerto Rico"));

    df.with_column(to_int(df.require("deaths")?).map_err(&err)?)
}

/// CDC county-level vaccination data
///
/// Lowercases column names, keeps the completion series, casts `date` and
/// normalizes `fips`.
pub fn cdc_vaccines_counties(input: &Dataset) -> Result<Dataset> {
    let err = failed("cdc_vaccines_counties");

    let df = input
        .rename_with(|name| name.to_lowercase())?
        .select(CDC_KEEP_COLUMNS)?;
    let df = df.with_column(to_datetime(df.require("date")?).map_err(&err)?)?;
    df.with_column(clean_fips_column(df.require("fips")?).map_err(&err)?)
}

/// 5-year ACS population estimates
///
/// Drops the descriptive second header row, derives `fips` from the tail of
/// `GEO_ID` and casts the population estimates to int.
pub fn acs_population_counties(input: &Dataset) -> Result<Dataset> {
    let err = failed("acs_population_counties");
    let df = input.skip_rows(1);

    let geo_ids = df.require("GEO_ID")?;
    let fips = Column::new(
        "fips",
        ColumnType::Text,
        geo_ids.values().iter().map(fips_from_geo_id).collect(),
    )?;

    let mut columns = vec![fips];
    for (source, target) in ACS_POPULATION_COLUMNS {
        let cast = to_int(df.require(source)?).map_err(&err)?;
        columns.push(Column::new(*target, ColumnType::Int, cast.values().to_vec())?);
    }
    Dataset::new(columns)
}

/// Last five characters of a census GEO_ID (`0500000US01001` → `01001`)
fn fips_from_geo_id(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        other => {
            let text = other.to_string();
            let start = text
                .char_indices()
                .rev()
                .nth(super::fips::FIPS_WIDTH - 1)
                .map_or(0, |(i, _)| i);
            Value::Text(text[start..].to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_csv;

    #[test]
    fn test_nyt_cases_counties() {
        let csv = b"date,county,state,fips,cases,deaths\n\
2020-03-01,Autauga,Alabama,1001,5,0\n\
2020-03-01,San Juan,Puerto Rico,,3,\n\
2020-03-02,District of Columbia,District of Columbia,11001,7,1\n";
        let input = parse_csv(csv, "nyt").unwrap();
        let before = input.clone();

        let out = nyt_cases_counties(&input).unwrap();

        assert_eq!(input, before, "input must not be modified");
        assert_eq!(out.row_count(), 2);
        assert_eq!(
            out.require("fips").unwrap().values(),
            &[Value::from("01001"), Value::from("11001")]
        );
        assert_eq!(out.require("date").unwrap().column_type(), ColumnType::DateTime);
        assert_eq!(out.require("deaths").unwrap().column_type(), ColumnType::Int);
        assert_eq!(out.column_names(), input.column_names());
    }

    #[test]
    fn test_nyt_missing_deaths_outside_puerto_rico_fails() {
        let csv = b"date,county,state,fips,cases,deaths\n2020-03-01,Autauga,Alabama,1001,5,\n";
        let input = parse_csv(csv, "nyt").unwrap();
        let err = nyt_cases_counties(&input).unwrap_err();
        assert!(matches!(err, Error::Transform { .. }), "{err}");
    }

    #[test]
    fn test_cdc_vaccines_counties() {
        let csv = b"Date,FIPS,Recip_County,Series_Complete_Pop_Pct,Series_Complete_Yes,Series_Complete_18Plus,Series_Complete_18PlusPop_Pct,Series_Complete_65Plus,Series_Complete_65PlusPop_Pct,Completeness_pct\n\
05/01/2021,1001,Autauga County,20.5,11000,10900,25.1,5000,60.2,97.5\n\
05/01/2021,UNK,Unknown County,0,10,10,0,1,0,97.5\n";
        let out = cdc_vaccines_counties(&parse_csv(csv, "cdc").unwrap()).unwrap();

        assert_eq!(out.column_names(), CDC_KEEP_COLUMNS.to_vec());
        assert_eq!(
            out.require("fips").unwrap().values(),
            &[Value::from("01001"), Value::from("00UNK")]
        );
        assert_eq!(out.require("date").unwrap().column_type(), ColumnType::DateTime);
    }

    #[test]
    fn test_acs_population_counties() {
        let csv = b"GEO_ID,NAME,S0101_C01_001E,S0101_C01_025E,S0101_C01_026E,S0101_C01_030E\n\
id,Geographic Area Name,Estimate!!Total,Estimate!!16+,Estimate!!18+,Estimate!!65+\n\
0500000US01001,\"Autauga County, Alabama\",55380,43559,42124,8600\n";
        let out = acs_population_counties(&parse_csv(csv, "acs").unwrap()).unwrap();

        assert_eq!(
            out.column_names(),
            vec![
                "fips",
                "total_population",
                "population_16plus",
                "population_18plus",
                "population_65plus"
            ]
        );
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.require("fips").unwrap().values(), &[Value::from("01001")]);
        assert_eq!(
            out.require("total_population").unwrap().values(),
            &[Value::Int(55380)]
        );
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let input = Dataset::from_rows(&["x"], vec![vec![Value::Int(1)]]).unwrap();
        assert!(nyt_cases_counties(&input).is_err());
    }
}
