//! Data model for fuzzy record linkage: tables, match statuses and results.

pub mod error;
pub mod record;
pub mod status;
pub mod table;

pub use error::{ModelError, Result};
pub use record::{
    MATCH_SCORE_COLUMN, MATCH_STATUS_COLUMN, MatchRecord, ROW_INDEX_COLUMN, ROW_INDEX_OFFSET,
    build_result_table, format_score,
};
pub use status::MatchStatus;
pub use table::Table;
