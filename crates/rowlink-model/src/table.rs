//! Row-oriented string table shared by ingest and matching.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// An ordered set of named columns with string cells.
///
/// Blank cells are empty strings; there is no separate null marker. Rows are
/// addressed by their zero-based position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        validate_columns(&columns)?;
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a table from a header and rows, checking every row's width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(columns)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cell by row and column position; out-of-range positions read as blank.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }

    /// Cell by row position and column name.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column_index(name)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Iterate over every cell of a named column, in row order.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a str> + use<'a>> {
        let column = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[column].as_str()))
    }

    /// Append a column with every cell set to `fill`.
    pub fn add_column(&mut self, name: impl Into<String>, fill: &str) -> Result<usize> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        if self.has_column(&name) {
            return Err(ModelError::DuplicateColumn(name));
        }
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(fill.to_string());
        }
        Ok(self.columns.len() - 1)
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> Result<()> {
        let height = self.rows.len();
        let width = self.columns.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(ModelError::RowOutOfBounds { row, height })?;
        if column >= width {
            return Err(ModelError::ColumnNotFound(format!("#{column}")));
        }
        cells[column] = value.into();
        Ok(())
    }
}

fn validate_columns(columns: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if column.trim().is_empty() {
            return Err(ModelError::EmptyColumnName);
        }
        if !seen.insert(column.as_str()) {
            return Err(ModelError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}
