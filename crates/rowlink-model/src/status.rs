//! Match status assigned to every target row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of linking one target row.
///
/// Ordering follows the display order used in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Single best candidate at or above the optimal threshold.
    Matched,
    /// Single best candidate that cleared the required threshold only.
    Review,
    /// Several candidates tie at the best score.
    Ambiguous,
    /// No candidate reached the required threshold.
    Unmatched,
    /// The claimed reference row is also claimed by another target row.
    Duplicates,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 5] = [
        MatchStatus::Matched,
        MatchStatus::Review,
        MatchStatus::Ambiguous,
        MatchStatus::Unmatched,
        MatchStatus::Duplicates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "MATCHED",
            MatchStatus::Review => "REVIEW",
            MatchStatus::Ambiguous => "AMBIGUOUS",
            MatchStatus::Unmatched => "UNMATCHED",
            MatchStatus::Duplicates => "DUPLICATES",
        }
    }

    /// True for the statuses that claim exactly one reference row.
    pub fn is_unique_claim(&self) -> bool {
        matches!(self, MatchStatus::Matched | MatchStatus::Review)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        MatchStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown match status: {s}"))
    }
}
