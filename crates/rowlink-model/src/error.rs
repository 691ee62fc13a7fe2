use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("column name must not be empty")]
    EmptyColumnName,
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("row {row} out of bounds for table with {height} rows")]
    RowOutOfBounds { row: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
