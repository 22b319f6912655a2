//! Run-parameters file support: a TOML document of arbitrary user test
//! parameters with typed lookups, plus a CSV-style loader for parameterized
//! test data.

use anyhow::{Context, Result};
use std::path::Path;
use toml::value::Table;
use toml::Value;

/// Arbitrary run parameters loaded from a TOML file.
///
/// The document is a flat set of named values owned by the test author;
/// nothing in the reporting pipeline interprets them. Nested tables are
/// reachable with dotted keys (`suite.timeout`).
#[derive(Debug, Default, Clone)]
pub struct RunParams {
    values: Table,
}

/// One row of a CSV data file. Single-field rows collapse to a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataRow {
    Scalar(String),
    Fields(Vec<String>),
}

impl RunParams {
    /// Loads run parameters from the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read run parameters file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse run parameters file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let values: Table = toml::from_str(contents).context("run parameters must be a table")?;
        Ok(Self { values })
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.values.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(Value::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.lookup(key).and_then(Value::as_integer)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key).and_then(Value::as_bool)
    }

    /// Returns a list value with every element rendered as a string.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        let array = self.lookup(key)?.as_array()?;
        Some(
            array
                .iter()
                .map(|value| match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Loads a comma-separated data file into rows for parameterized tests.
///
/// Blank lines are skipped. A row with a single field collapses to
/// [`DataRow::Scalar`]; anything wider stays a field list.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<DataRow>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    Ok(parse_csv(&contents))
}

pub(crate) fn parse_csv(contents: &str) -> Vec<DataRow> {
    let mut rows = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields: Vec<String> = line.split(',').map(str::to_owned).collect();
        if fields.len() == 1 {
            rows.push(DataRow::Scalar(fields.swap_remove(0)));
        } else {
            rows.push(DataRow::Fields(fields));
        }
    }

    rows
}
