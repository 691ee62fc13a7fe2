//! Threshold and tie-break classification of a row's score map.

use rowlink_model::MatchStatus;

use crate::scorer::ScoreMap;

/// Outcome of classifying one target row.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: MatchStatus,
    /// Unrounded composite score, present only for a unique best candidate.
    pub score: Option<f64>,
    /// Claimed reference positions, ascending.
    pub reference_rows: Vec<usize>,
}

impl Classification {
    fn unmatched() -> Self {
        Self {
            status: MatchStatus::Unmatched,
            score: None,
            reference_rows: Vec::new(),
        }
    }

    /// True when exactly one reference row was claimed.
    pub fn is_unique(&self) -> bool {
        self.status.is_unique_claim()
    }
}

/// Round to two decimals, the precision every threshold comparison uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classify a score map.
///
/// The best score must clear `required_threshold`. A single best candidate
/// is MATCHED at or above `optimal_threshold`, REVIEW below it; several
/// tied best candidates are AMBIGUOUS. Comparisons use [`round2`] values;
/// the recorded score is left unrounded.
pub fn classify(scores: &ScoreMap, required_threshold: f64, optimal_threshold: f64) -> Classification {
    let Some(best) = scores.values().copied().map(round2).reduce(f64::max) else {
        return Classification::unmatched();
    };
    if best < round2(required_threshold) {
        return Classification::unmatched();
    }

    let tied: Vec<usize> = scores
        .iter()
        .filter(|(_, score)| round2(**score) == best)
        .map(|(row, _)| *row)
        .collect();

    match tied.as_slice() {
        [row] => {
            let status = if best >= round2(optimal_threshold) {
                MatchStatus::Matched
            } else {
                MatchStatus::Review
            };
            Classification {
                status,
                score: scores.get(row).copied(),
                reference_rows: vec![*row],
            }
        }
        _ => Classification {
            status: MatchStatus::Ambiguous,
            score: None,
            reference_rows: tied,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(usize, f64)]) -> ScoreMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn empty_map_is_unmatched() {
        assert_eq!(classify(&ScoreMap::new(), 75.0, 75.0), Classification::unmatched());
    }

    #[test]
    fn below_required_threshold_is_unmatched() {
        let result = classify(&scores(&[(0, 74.994), (1, 10.0)]), 75.0, 75.0);
        assert_eq!(result.status, MatchStatus::Unmatched);
        assert!(result.reference_rows.is_empty());
    }

    #[test]
    fn rounding_lets_near_scores_clear_threshold() {
        let result = classify(&scores(&[(3, 74.996)]), 75.0, 80.0);
        assert_eq!(result.status, MatchStatus::Review);
        assert_eq!(result.score, Some(74.996));
        assert_eq!(result.reference_rows, vec![3]);
    }

    #[test]
    fn unique_best_at_optimal_is_matched() {
        let result = classify(&scores(&[(0, 90.0), (1, 80.0)]), 75.0, 90.0);
        assert_eq!(result.status, MatchStatus::Matched);
        assert_eq!(result.score, Some(90.0));
        assert_eq!(result.reference_rows, vec![0]);
        assert!(result.is_unique());
    }

    #[test]
    fn ties_are_ambiguous() {
        let result = classify(&scores(&[(4, 88.001), (1, 88.0), (2, 60.0)]), 75.0, 75.0);
        assert_eq!(result.status, MatchStatus::Ambiguous);
        assert_eq!(result.score, None);
        assert_eq!(result.reference_rows, vec![1, 4]);
    }
}
