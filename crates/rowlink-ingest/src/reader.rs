//! Delimited-text loading through Polars.

use std::path::Path;

use polars::prelude::*;
use rowlink_model::Table;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::format::TableFormat;

/// Read a CSV or TSV file into a [`Table`].
///
/// Every column is read as text; missing fields become empty strings.
pub fn read_table(path: &Path) -> Result<Table> {
    let format = TableFormat::from_path(path)?;
    check_readable(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_separator(format.separator()))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.height() == 0 {
        warn!(path = %path.display(), "table has a header but no rows");
    }
    let table = frame_to_table(&df)?;
    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "loaded table"
    );
    Ok(table)
}

/// Convert a DataFrame into a [`Table`], rendering nulls as empty strings.
pub fn frame_to_table(df: &DataFrame) -> Result<Table> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); df.height()];
    for column in df.get_columns() {
        let series = column.as_materialized_series().cast(&DataType::String)?;
        for (row, value) in series.str()?.into_iter().enumerate() {
            cells[row].push(value.unwrap_or_default().to_string());
        }
    }

    Ok(Table::from_rows(columns, cells)?)
}

fn check_readable(path: &Path) -> Result<()> {
    std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(())
}
