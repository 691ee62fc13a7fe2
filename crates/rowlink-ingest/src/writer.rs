//! Delimited-text output for result tables.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use rowlink_model::Table;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::format::TableFormat;

/// Write `table` as CSV or TSV, chosen by the extension of `path`.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    let file = File::create(path).map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let csv_error = |e: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.separator())
        .from_writer(BufWriter::new(file));
    writer.write_record(table.columns()).map_err(csv_error)?;
    for row in table.rows() {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| IngestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "wrote table"
    );
    Ok(())
}
