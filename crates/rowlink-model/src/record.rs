//! Per-row linkage results and the output table built from them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::status::MatchStatus;
use crate::table::Table;

/// Offset added to a zero-based reference row position when it is reported.
///
/// Accounts for the header line and 1-based row numbering of the source file,
/// so a reported index points at the spreadsheet row a reviewer would open.
pub const ROW_INDEX_OFFSET: usize = 2;

pub const MATCH_STATUS_COLUMN: &str = "match_status";
pub const ROW_INDEX_COLUMN: &str = "row_index";
pub const MATCH_SCORE_COLUMN: &str = "match_score";

/// Linkage result for a single target row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Zero-based position of the target row.
    pub target_row: usize,
    /// `None` until the row has been classified.
    pub status: Option<MatchStatus>,
    /// Composite score of the unique best candidate.
    pub score: Option<f64>,
    /// Zero-based reference positions claimed by this row.
    pub reference_rows: Vec<usize>,
    /// Values copied from the reference row for each get-column.
    pub fetched: Vec<String>,
}

impl MatchRecord {
    pub fn pending(target_row: usize) -> Self {
        Self {
            target_row,
            status: None,
            score: None,
            reference_rows: Vec::new(),
            fetched: Vec::new(),
        }
    }

    /// Reported reference positions, e.g. `"2"` or `"4, 7"`; empty when none.
    pub fn row_index_label(&self) -> String {
        self.reference_rows
            .iter()
            .map(|row| (row + ROW_INDEX_OFFSET).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn status_label(&self) -> &'static str {
        self.status.as_ref().map_or("", MatchStatus::as_str)
    }

    pub fn score_label(&self) -> String {
        self.score.map(format_score).unwrap_or_default()
    }
}

/// Shortest representation of a score, without a trailing `.0`.
pub fn format_score(score: f64) -> String {
    let text = format!("{score}");
    match text.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => text,
    }
}

/// Build the output table: target columns, then get-columns that the target
/// does not already carry, then status, row index and score.
///
/// Fetched values overwrite target cells when a get-column shares a target
/// column's name.
pub fn build_result_table(
    target: &Table,
    get_columns: &[String],
    records: &[MatchRecord],
) -> Result<Table> {
    let mut table = target.clone();
    let get_indices = get_columns
        .iter()
        .map(|column| ensure_column(&mut table, column))
        .collect::<Result<Vec<_>>>()?;
    let status_index = ensure_column(&mut table, MATCH_STATUS_COLUMN)?;
    let row_index = ensure_column(&mut table, ROW_INDEX_COLUMN)?;
    let score_index = ensure_column(&mut table, MATCH_SCORE_COLUMN)?;

    for record in records {
        let row = record.target_row;
        table.set_cell(row, status_index, record.status_label())?;
        table.set_cell(row, row_index, record.row_index_label())?;
        table.set_cell(row, score_index, record.score_label())?;
        for (column, value) in get_indices.iter().zip(&record.fetched) {
            table.set_cell(row, *column, value.as_str())?;
        }
    }
    Ok(table)
}

fn ensure_column(table: &mut Table, name: &str) -> Result<usize> {
    match table.column_index(name) {
        Some(index) => Ok(index),
        None => table.add_column(name, ""),
    }
}
