//! Module to load the CSV files written by the simulator into named numeric columns.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};

/// Errors raised while loading a [`ColumnTable`].
#[derive(Debug, thiserror::Error)]
pub enum ColumnError {
    /// The file could not be opened, usually because the simulator did not produce it.
    #[error("Cannot open {path:?}: {source}")]
    Open { path: PathBuf, source: csv::Error },
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    /// A data row does not have one value per header field.
    #[error("Column number does not match in row {row}: header has {expected} fields, found {found}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Cannot parse {value:?} as a number (row {row}, column {column:?})")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },
    #[error("The file has no header row")]
    MissingHeader,
    #[error("Column {0:?} appears more than once in the header")]
    DuplicateColumn(String),
    #[error("No column named {0:?}")]
    MissingColumn(String),
}

/// A single named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

/// Numeric columns of a CSV file, in header order.
///
/// All columns have the same length, which is the number of data rows in the file (at least one).
/// A file with a single data row yields one-element columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnTable {
    columns: Vec<Column>,
    num_rows: usize,
}

impl ColumnTable {
    /// Get the values of the column `name`, if present.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Get the values of the column `name`, or fail with [`ColumnError::MissingColumn`].
    pub fn column(&self, name: &str) -> Result<&[f64], ColumnError> {
        self.get(name)
            .ok_or_else(|| ColumnError::MissingColumn(name.to_string()))
    }

    /// Column names in header order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of data rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn into_map(self) -> HashMap<String, Vec<f64>> {
        self.columns
            .into_iter()
            .map(|Column { name, values }| (name, values))
            .collect()
    }
}

/// Read a CSV file whose first row holds the column names and all other rows hold one number per
/// column.
pub fn read_columns(path: impl AsRef<Path>) -> Result<ColumnTable, ColumnError> {
    let path = path.as_ref();
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| ColumnError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let table = parse_columns(reader)?;
    log::trace!(
        "Loaded {} columns with {} rows from {path:?}",
        table.num_columns(),
        table.num_rows()
    );
    Ok(table)
}

/// Same as [`read_columns`], but reading from memory.
pub fn read_columns_from_str(data: &str) -> Result<ColumnTable, ColumnError> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(data.as_bytes());
    parse_columns(reader)
}

fn parse_columns<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<ColumnTable, ColumnError> {
    let header = reader.headers()?;
    if header.is_empty() || (header.len() == 1 && header[0].is_empty()) {
        return Err(ColumnError::MissingHeader);
    }
    let mut columns: Vec<Column> = Vec::new();
    for name in header.iter() {
        if columns.iter().any(|c| c.name == name) {
            return Err(ColumnError::DuplicateColumn(name.to_string()));
        }
        columns.push(Column {
            name: name.to_string(),
            values: Vec::new(),
        });
    }

    let mut num_rows = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // rows are numbered as in the file, the header being row 1
        let row = i + 2;
        if record.len() != columns.len() {
            return Err(ColumnError::SchemaMismatch {
                row,
                expected: columns.len(),
                found: record.len(),
            });
        }
        for (column, value) in columns.iter_mut().zip(record.iter()) {
            let x = value.parse::<f64>().map_err(|_| ColumnError::Parse {
                row,
                column: column.name.clone(),
                value: value.to_string(),
            })?;
            column.values.push(x);
        }
        num_rows += 1;
    }

    if num_rows == 0 {
        return Err(ColumnError::SchemaMismatch {
            row: 2,
            expected: columns.len(),
            found: 0,
        });
    }

    Ok(ColumnTable { columns, num_rows })
}
