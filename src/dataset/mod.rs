//! In-memory tabular dataset exchanged between pipeline stages
//!
//! A [`Dataset`] is an ordered list of named, typed columns that all hold the
//! same number of rows. Every reshaping operation borrows the dataset and
//! returns a new one, so stages never observe each other's edits.

mod value;

pub use value::{ColumnType, Value};

pub(crate) use value::infer_type;

use crate::error::{Error, Result};
use std::collections::HashSet;

/// A named column of values sharing one logical type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    ty: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Build a column, checking that every non-null value matches `ty`
    pub fn new(name: impl Into<String>, ty: ColumnType, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        if let Some(bad) = values
            .iter()
            .find(|v| v.column_type().is_some_and(|t| t != ty))
        {
            return Err(Error::InvalidDataset(format!(
                "column '{name}' is {ty} but holds {bad:?}"
            )));
        }
        Ok(Self { name, ty, values })
    }

    /// Build a column whose type is taken from its first non-null value
    ///
    /// Mixed types fall back to text.
    pub fn infer(name: impl Into<String>, values: Vec<Value>) -> Self {
        let mut types = values.iter().filter_map(Value::column_type);
        let ty = match types.next() {
            Some(first) if types.all(|t| t == first) => first,
            Some(_) => {
                let values = values.iter().map(Value::to_text).collect();
                return Self {
                    name: name.into(),
                    ty: ColumnType::Text,
                    values,
                };
            }
            None => ColumnType::Text,
        };
        Self {
            name: name.into(),
            ty,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.ty
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `f` to every value, producing a column of type `ty`
    pub fn map<F>(&self, ty: ColumnType, f: F) -> std::result::Result<Column, String>
    where
        F: Fn(&Value) -> std::result::Result<Value, String>,
    {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(row, v)| f(v).map_err(|e| format!("column '{}', row {row}: {e}", self.name)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Column::new(self.name.clone(), ty, values).map_err(|e| e.to_string())
    }

    fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: self.ty,
            values: self.values.clone(),
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            ty: self.ty,
            values: rows.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }
}

/// Ordered collection of equal-length columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, enforcing equal column lengths and unique names
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            if let Some(ragged) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(Error::InvalidDataset(format!(
                    "column '{}' has {} rows, expected {}",
                    ragged.name,
                    ragged.len(),
                    first.len()
                )));
            }
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::InvalidDataset(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Build a dataset from row-major values, inferring each column's type
    pub fn from_rows<S: AsRef<str>>(names: &[S], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); names.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(Error::InvalidDataset(format!(
                    "row {i} has {} values, expected {}",
                    row.len(),
                    names.len()
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Self::new(
            names
                .iter()
                .zip(columns)
                .map(|(name, values)| Column::infer(name.as_ref(), values))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`Dataset::column`] but missing columns are an error
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name).ok_or_else(|| {
            Error::InvalidDataset(format!(
                "missing column '{name}' (have: {})",
                self.column_names().join(", ")
            ))
        })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Values of one row in column order
    pub fn row(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().map(move |c| &c.values[index])
    }

    /// Keep only the named columns, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Dataset> {
        let columns = names
            .iter()
            .map(|name| self.require(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(columns)
    }

    /// Rename every column through `f`
    pub fn rename_with<F>(&self, f: F) -> Result<Dataset>
    where
        F: Fn(&str) -> String,
    {
        Dataset::new(self.columns.iter().map(|c| c.renamed(f(&c.name))).collect())
    }

    /// Keep the rows for which `keep` returns true
    pub fn filter_rows<F>(&self, keep: F) -> Dataset
    where
        F: Fn(usize) -> bool,
    {
        let rows: Vec<usize> = (0..self.row_count()).filter(|&i| keep(i)).collect();
        Dataset {
            columns: self.columns.iter().map(|c| c.take(&rows)).collect(),
        }
    }

    /// Drop the first `n` rows
    pub fn skip_rows(&self, n: usize) -> Dataset {
        self.filter_rows(|i| i >= n)
    }

    /// Replace the column of the same name, or append it if absent
    pub fn with_column(&self, column: Column) -> Result<Dataset> {
        let mut columns = self.columns.clone();
        match columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => columns.push(column),
        }
        Dataset::new(columns)
    }
}
