//! Aggregate match-quality statistics for a run.

use std::collections::BTreeMap;
use std::fmt;

use rowlink_model::{MatchRecord, MatchStatus, format_score};
use serde::Serialize;

use crate::classify::round2;

/// Sentinel reported for highest/lowest score when no row carries a score.
pub const NO_SCORE: f64 = -1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total_rows: usize,
    /// Rows per final status; statuses with no rows are absent.
    pub status_counts: BTreeMap<MatchStatus, usize>,
    /// MATCHED rows as a percentage of all target rows.
    pub match_rate: f64,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
}

impl MatchSummary {
    /// Summarize classified records.
    ///
    /// Score statistics cover every record carrying a score, including unique
    /// claims later flagged as DUPLICATES.
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut status_counts = BTreeMap::new();
        for status in records.iter().filter_map(|record| record.status) {
            *status_counts.entry(status).or_insert(0) += 1;
        }

        let total_rows = records.len();
        let matched = status_counts
            .get(&MatchStatus::Matched)
            .copied()
            .unwrap_or(0);
        let match_rate = if total_rows == 0 {
            0.0
        } else {
            matched as f64 / total_rows as f64 * 100.0
        };

        let scores: Vec<f64> = records.iter().filter_map(|record| record.score).collect();
        let (average_score, highest_score, lowest_score) = if scores.is_empty() {
            (0.0, NO_SCORE, NO_SCORE)
        } else {
            (
                scores.iter().sum::<f64>() / scores.len() as f64,
                scores.iter().copied().fold(f64::MIN, f64::max),
                scores.iter().copied().fold(f64::MAX, f64::min),
            )
        };

        Self {
            total_rows,
            status_counts,
            match_rate,
            average_score,
            highest_score,
            lowest_score,
        }
    }

    pub fn count(&self, status: MatchStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Ordered display pairs: the four score lines, then one line per status
    /// present.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("Total Match Score".to_string(), percent(self.match_rate)),
            ("Average Match Score".to_string(), percent(self.average_score)),
            ("Highest Match Score".to_string(), percent(self.highest_score)),
            ("Lowest Match Score".to_string(), percent(self.lowest_score)),
        ];
        entries.extend(
            self.status_counts
                .iter()
                .map(|(status, count)| (status.to_string(), count.to_string())),
        );
        entries
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.entries() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

fn percent(value: f64) -> String {
    format!("{}%", format_score(round2(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: MatchStatus, score: Option<f64>) -> MatchRecord {
        MatchRecord {
            target_row: 0,
            status: Some(status),
            score,
            reference_rows: Vec::new(),
            fetched: Vec::new(),
        }
    }

    #[test]
    fn summarizes_mixed_run() {
        let records = vec![
            record(MatchStatus::Matched, Some(100.0)),
            record(MatchStatus::Review, Some(80.5)),
            record(MatchStatus::Unmatched, None),
        ];
        let summary = MatchSummary::from_records(&records);
        assert_eq!(summary.count(MatchStatus::Matched), 1);
        assert_eq!(summary.count(MatchStatus::Duplicates), 0);
        insta::assert_snapshot!(summary.to_string().trim_end(), @r"
        Total Match Score: 33.33%
        Average Match Score: 90.25%
        Highest Match Score: 100%
        Lowest Match Score: 80.5%
        MATCHED: 1
        REVIEW: 1
        UNMATCHED: 1
        ");
    }

    #[test]
    fn no_scores_use_sentinels() {
        let records = vec![record(MatchStatus::Unmatched, None); 3];
        let summary = MatchSummary::from_records(&records);
        assert_eq!(
            summary.entries(),
            vec![
                ("Total Match Score".to_string(), "0%".to_string()),
                ("Average Match Score".to_string(), "0%".to_string()),
                ("Highest Match Score".to_string(), "-1%".to_string()),
                ("Lowest Match Score".to_string(), "-1%".to_string()),
                ("UNMATCHED".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn serializes_status_counts_by_name() {
        let summary = MatchSummary::from_records(&[record(MatchStatus::Matched, Some(90.0))]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status_counts"]["MATCHED"], 1);
        assert_eq!(json["match_rate"], 100.0);
    }
}
