//! End-to-end linkage run over a target and a reference table.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rowlink_model::{MatchRecord, MatchStatus, Table, build_result_table};
use tracing::{debug, info, info_span, trace};

use crate::classify::classify;
use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::resolve::resolve_duplicates;
use crate::scorer::CompositeScorer;
use crate::similarity::{ScorerKind, Similarity};
use crate::subset::CandidateSubsetter;
use crate::summary::MatchSummary;
use crate::weighting::UniquenessWeights;

/// Row-granular progress observer.
///
/// Calls may arrive from several worker threads and out of row order.
pub trait MatchProgress: Send + Sync {
    fn on_start(&self, _total: usize) {}

    /// One more target row finished; `completed` counts finished rows.
    fn on_row(&self, completed: usize, total: usize);

    /// Polled before each row; returning true aborts the run.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Progress observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl MatchProgress for NoProgress {
    fn on_row(&self, _completed: usize, _total: usize) {}
}

/// Everything a successful run produces.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// One record per target row, in target order.
    pub records: Vec<MatchRecord>,
    /// Target table with get-columns and match columns appended.
    pub table: Table,
    pub summary: MatchSummary,
    pub weights: UniquenessWeights,
    pub optimal_threshold: f64,
}

/// Runs a [`MatchConfig`] with a pluggable [`Similarity`].
#[derive(Debug, Clone)]
pub struct Matcher<S = ScorerKind> {
    config: MatchConfig,
    similarity: S,
    parallel: bool,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            similarity: ScorerKind::default(),
            parallel: true,
        }
    }
}

impl<S: Similarity> Matcher<S> {
    /// Swap the similarity function, keeping configuration and options.
    pub fn with_similarity<T: Similarity>(self, similarity: T) -> Matcher<T> {
        Matcher {
            config: self.config,
            similarity,
            parallel: self.parallel,
        }
    }

    /// Score rows on the rayon pool; ignored without the `parallel` feature.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn run(&self, target: &Table, reference: &Table) -> Result<MatchOutcome> {
        self.run_with_progress(target, reference, &NoProgress)
    }

    /// Link every target row.
    ///
    /// Configuration problems are reported before the first row is scored;
    /// no partial outcome is returned on error or cancellation.
    pub fn run_with_progress(
        &self,
        target: &Table,
        reference: &Table,
        progress: &dyn MatchProgress,
    ) -> Result<MatchOutcome> {
        let span = info_span!(
            "match",
            target_rows = target.height(),
            reference_rows = reference.height()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let config = &self.config;
        config.validate(target, reference)?;
        let links = config.scored_links(target, reference);
        let weights =
            UniquenessWeights::compute(target, links.iter().map(|link| link.target.as_str()))?;
        let optimal_threshold = weights.optimal_threshold(links.iter().copied());
        let subsetter = CandidateSubsetter::new(target, reference, &config.group_columns)?;
        let scorer = CompositeScorer::new(config, target, reference, &weights, &self.similarity);
        let get_indices = config
            .get_columns
            .iter()
            .map(|column| {
                reference
                    .column_index(column)
                    .ok_or_else(|| MatchError::UnknownReferenceColumn(column.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(
            columns = scorer.column_count(),
            optimal_threshold,
            required_threshold = config.required_threshold,
            buckets = subsetter.bucket_count(),
            parallel = self.parallel,
            "prepared matcher"
        );

        let total = target.height();
        let completed = AtomicUsize::new(0);
        progress.on_start(total);

        let match_row = |row: usize| -> Result<MatchRecord> {
            if progress.is_cancelled() {
                return Err(MatchError::Cancelled {
                    completed: completed.load(Ordering::Relaxed),
                    total,
                });
            }
            let pool = subsetter.candidates(target, row);
            let scores = scorer.score_row(target, row, pool);
            let classification = classify(&scores, config.required_threshold, optimal_threshold);
            trace!(
                row,
                candidates = pool.len(),
                status = %classification.status,
                "classified row"
            );

            let fetched = match classification.reference_rows.as_slice() {
                [reference_row] if classification.is_unique() => get_indices
                    .iter()
                    .map(|&column| reference.cell(*reference_row, column).to_string())
                    .collect(),
                _ => Vec::new(),
            };
            let record = MatchRecord {
                target_row: row,
                status: Some(classification.status),
                score: classification.score,
                reference_rows: classification.reference_rows,
                fetched,
            };

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.on_row(done, total);
            Ok(record)
        };

        let mut records = self.match_rows(total, match_row)?;
        let duplicates = resolve_duplicates(&mut records);
        let summary = MatchSummary::from_records(&records);
        let table = build_result_table(target, &config.get_columns, &records)?;

        info!(
            rows = total,
            matched = summary.count(MatchStatus::Matched),
            duplicates,
            match_rate = summary.match_rate,
            duration_ms = start.elapsed().as_millis(),
            "matching complete"
        );

        Ok(MatchOutcome {
            records,
            table,
            summary,
            weights,
            optimal_threshold,
        })
    }

    #[cfg(feature = "parallel")]
    fn match_rows<F>(&self, total: usize, match_row: F) -> Result<Vec<MatchRecord>>
    where
        F: Fn(usize) -> Result<MatchRecord> + Sync + Send,
    {
        if self.parallel {
            (0..total).into_par_iter().map(match_row).collect()
        } else {
            (0..total).map(match_row).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn match_rows<F>(&self, total: usize, match_row: F) -> Result<Vec<MatchRecord>>
    where
        F: Fn(usize) -> Result<MatchRecord>,
    {
        (0..total).map(match_row).collect()
    }
}
