//! Error types for matching operations.

use rowlink_model::ModelError;
use thiserror::Error;

/// Errors raised before or while matching.
///
/// Configuration and input-shape problems are reported before the first
/// target row is scored; a failed run never yields a partial result table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// No target column is linked to any reference column.
    #[error("no target column is linked to a reference column")]
    EmptyColumnSet,

    /// Group column missing from one of the tables.
    #[error("group column '{column}' not found in {table} table")]
    UnknownGroupColumn { column: String, table: &'static str },

    /// Target column not present in the mapping.
    #[error("target column not mapped: {0}")]
    UnknownTargetColumn(String),

    /// Reference column requested but absent.
    #[error("reference column not found: {0}")]
    UnknownReferenceColumn(String),

    /// Threshold outside 0..=100.
    #[error("threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(f64),

    /// Table without rows where rows are required.
    #[error("{0} table has no rows")]
    EmptyInput(&'static str),

    /// The progress observer asked to stop.
    #[error("matching cancelled after {completed} of {total} rows")]
    Cancelled { completed: usize, total: usize },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatchError::UnknownGroupColumn {
            column: "region".to_string(),
            table: "reference",
        };
        assert_eq!(
            err.to_string(),
            "group column 'region' not found in reference table"
        );
        assert_eq!(
            MatchError::EmptyInput("target").to_string(),
            "target table has no rows"
        );
    }
}
