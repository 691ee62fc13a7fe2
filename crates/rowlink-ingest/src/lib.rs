//! Tabular I/O for rowlink: CSV/TSV files to [`rowlink_model::Table`] and back.

pub mod error;
pub mod format;
pub mod reader;
pub mod writer;

pub use error::{IngestError, Result};
pub use format::TableFormat;
pub use reader::{frame_to_table, read_table};
pub use writer::write_table;
