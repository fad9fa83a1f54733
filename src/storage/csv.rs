//! Delimited text parsing and local CSV files

use crate::dataset::{Column, Dataset, Value, infer_type};
use crate::error::{Error, Result};
use crate::etl::Extractor;
use std::path::{Path, PathBuf};

/// Parse CSV text (header row first) into a typed dataset
///
/// Column types are inferred per column: all-integer fields become int,
/// numeric fields become float, anything else is text. Empty fields are null.
pub fn parse_csv(data: &[u8], origin: &str) -> Result<Dataset> {
    let parse_err = |reason: String| Error::Parse {
        origin: origin.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_err(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(parse_err("no header row".to_string()));
    }

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| parse_err(e.to_string()))?;
    log::debug!(
        "Parsed {} record(s) with {} column(s) from {}",
        records.len(),
        headers.len(),
        origin
    );

    let columns = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let raw: Vec<&str> = records.iter().map(|r| r.get(i).unwrap_or("")).collect();
            let ty = infer_type(raw.iter().copied());
            let values = raw.iter().map(|field| Value::parse_as(field, ty)).collect();
            Column::new(name.clone(), ty, values)
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| parse_err(e.to_string()))?;

    Dataset::new(columns).map_err(|e| parse_err(e.to_string()))
}

/// Read a dataset from a CSV file on disk
pub struct CsvFileReader {
    path: PathBuf,
}

impl CsvFileReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file
    pub fn read(&self) -> Result<Dataset> {
        let data = std::fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound {
                path: self.path.clone(),
            },
            _ => Error::Io(e),
        })?;
        parse_csv(&data, &self.path.display().to_string())
    }
}

impl Extractor for CsvFileReader {
    async fn extract(&self) -> Result<Dataset> {
        log::info!("Reading CSV from {}", self.path.display());
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_types_and_nulls() {
        let csv = b"date,county,fips,cases,ratio\n2020-03-01,Autauga,1001,5,0.5\n2020-03-02,Baldwin,,7,\n";
        let ds = parse_csv(csv, "inline").unwrap();

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.require("date").unwrap().column_type(), ColumnType::Text);
        assert_eq!(ds.require("fips").unwrap().column_type(), ColumnType::Int);
        assert_eq!(ds.require("cases").unwrap().column_type(), ColumnType::Int);
        assert_eq!(ds.require("ratio").unwrap().column_type(), ColumnType::Float);
        assert_eq!(ds.require("fips").unwrap().values()[1], Value::Null);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let csv = b"name,note\n\"Smith, John\",\"said \"\"hi\"\"\nthen left\"\n";
        let ds = parse_csv(csv, "inline").unwrap();
        let note = ds.require("note").unwrap();
        assert_eq!(note.values()[0], Value::from("said \"hi\"\nthen left"));
        assert_eq!(
            ds.require("name").unwrap().values()[0],
            Value::from("Smith, John")
        );
    }

    #[test]
    fn test_ragged_rows_are_parse_errors() {
        let csv = b"a,b\n1,2\n3\n";
        assert!(matches!(
            parse_csv(csv, "inline"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(matches!(parse_csv(b"", "inline"), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a,b\n1,x\n2,y\n").unwrap();

        let ds = CsvFileReader::new(file.path()).read().unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(ds.row_count(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let reader = CsvFileReader::new("/definitely/not/here.csv");
        assert!(matches!(reader.read(), Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_extractor_impl() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "x\n1\n").unwrap();
        let ds = CsvFileReader::new(file.path()).extract().await.unwrap();
        assert_eq!(ds.row_count(), 1);
    }
}
