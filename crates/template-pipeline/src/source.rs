//! Where raw sample values come from

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Loads one numeric column of a sample file
pub trait SampleSource {
    fn load(&self, path: &Path, column: &str) -> Result<Vec<f64>>;
}

impl<S: SampleSource + ?Sized> SampleSource for &S {
    fn load(&self, path: &Path, column: &str) -> Result<Vec<f64>> {
        (**self).load(path, column)
    }
}

/// Reads a named column from a CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvColumnSource {
    delimiter: u8,
}

impl Default for CsvColumnSource {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvColumnSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl SampleSource for CsvColumnSource {
    fn load(&self, path: &Path, column: &str) -> Result<Vec<f64>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(File::open(path)?);

        let index = reader
            .headers()?
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| {
                Error::InvalidInput(format!("{} has no column '{column}'", path.display()))
            })?;

        let mut values = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let field = record.get(index).unwrap_or("");
            let value = field.parse::<f64>().map_err(|_| {
                Error::InvalidInput(format!(
                    "{} row {}: '{field}' in column '{column}' is not a number",
                    path.display(),
                    row + 1
                ))
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

/// Serves preloaded columns keyed by `(path, column)`
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    columns: HashMap<(PathBuf, String), Vec<f64>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, column: impl Into<String>, values: Vec<f64>) {
        self.columns.insert((path.into(), column.into()), values);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, column: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(path, column, values);
        self
    }
}

impl SampleSource for InMemorySource {
    fn load(&self, path: &Path, column: &str) -> Result<Vec<f64>> {
        self.columns
            .get(&(path.to_path_buf(), column.to_string()))
            .cloned()
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "no column '{column}' loaded for {}",
                    path.display()
                ))
            })
    }
}
