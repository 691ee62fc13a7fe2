//! Composite weighted scoring of one target row against its candidate pool.

use std::collections::BTreeMap;

use rowlink_model::Table;
use tracing::trace;

use crate::config::MatchConfig;
use crate::similarity::Similarity;
use crate::subset::CandidatePool;
use crate::weighting::UniquenessWeights;

/// Reference-row position to accumulated composite score.
pub type ScoreMap = BTreeMap<usize, f64>;

#[derive(Debug, Clone)]
struct ScoredColumn {
    target: String,
    target_index: Option<usize>,
    weight: f64,
    threshold: f64,
    /// Comparison string of every reference row, by position.
    choices: Vec<String>,
}

/// Scores target rows against reference rows over the weighted links.
///
/// Reference comparison strings are joined once at construction; scoring a
/// row only reads shared state, so one scorer serves every worker thread.
pub struct CompositeScorer<'a, S: ?Sized> {
    columns: Vec<ScoredColumn>,
    similarity: &'a S,
    cutoff: bool,
}

impl<'a, S: Similarity + ?Sized> CompositeScorer<'a, S> {
    pub fn new(
        config: &MatchConfig,
        target: &Table,
        reference: &Table,
        weights: &UniquenessWeights,
        similarity: &'a S,
    ) -> Self {
        let columns = config
            .active_links()
            .filter(|link| weights.contains(&link.target))
            .map(|link| {
                let reference_indices: Vec<Option<usize>> = link
                    .references
                    .iter()
                    .map(|column| reference.column_index(column))
                    .collect();
                let choices = reference
                    .rows()
                    .iter()
                    .map(|row| {
                        reference_indices
                            .iter()
                            .map(|index| index.map_or("", |index| row[index].as_str()))
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect();
                ScoredColumn {
                    target: link.target.clone(),
                    target_index: target.column_index(&link.target),
                    weight: weights.weight(&link.target),
                    threshold: link.threshold,
                    choices,
                }
            })
            .collect();
        Self {
            columns,
            similarity,
            cutoff: config.cutoff,
        }
    }

    /// Weighted score of every candidate in `pool` for target row `row`.
    ///
    /// With cutoff enabled, a column score below that column's threshold adds
    /// nothing, and a candidate that passes no column is absent from the map.
    pub fn score_row(&self, target: &Table, row: usize, pool: CandidatePool<'_>) -> ScoreMap {
        let mut scores = ScoreMap::new();
        for column in &self.columns {
            let value = column
                .target_index
                .map_or("", |index| target.cell(row, index));
            for candidate in pool.rows() {
                let choice = column
                    .choices
                    .get(candidate)
                    .map_or("", String::as_str);
                let score = self.similarity.score(value, choice);
                if self.cutoff && score < column.threshold {
                    continue;
                }
                *scores.entry(candidate).or_insert(0.0) += score * column.weight;
            }
            trace!(row, column = %column.target, candidates = pool.len(), "scored column");
        }
        scores
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
