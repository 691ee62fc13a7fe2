//! Post-pass flagging of reference rows claimed more than once.

use std::collections::HashMap;

use rowlink_model::{MatchRecord, MatchStatus};
use tracing::debug;

/// Mark every record whose claimed row index is shared with another record
/// as DUPLICATES, whatever its prior status.
///
/// Claims are compared by their rendered row-index label, so two AMBIGUOUS
/// rows listing the same tied positions also collide. Returns the number of
/// records flagged.
pub fn resolve_duplicates(records: &mut [MatchRecord]) -> usize {
    let labels: Vec<String> = records.iter().map(MatchRecord::row_index_label).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels.iter().filter(|label| !label.is_empty()) {
        *counts.entry(label.as_str()).or_default() += 1;
    }

    let mut flagged = 0;
    for (record, label) in records.iter_mut().zip(&labels) {
        if counts.get(label.as_str()).is_some_and(|count| *count > 1) {
            record.status = Some(MatchStatus::Duplicates);
            flagged += 1;
        }
    }
    if flagged > 0 {
        debug!(flagged, "flagged shared reference claims");
    }
    flagged
}
