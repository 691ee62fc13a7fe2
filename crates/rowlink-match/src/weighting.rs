//! Per-column uniqueness weights.

use std::collections::{BTreeMap, HashSet};

use rowlink_model::Table;
use serde::Serialize;
use tracing::debug;

use crate::config::ColumnLink;
use crate::error::{MatchError, Result};

/// Share of distinct values in `column`, in `(0, 1]` for a non-empty table.
///
/// A column the table lacks has no values and scores 0.
pub fn uniqueness(table: &Table, column: &str) -> f64 {
    let rows = table.height();
    match table.column_values(column) {
        Some(values) if rows > 0 => values.collect::<HashSet<_>>().len() as f64 / rows as f64,
        _ => 0.0,
    }
}

/// Normalized uniqueness of each active column; the weights sum to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UniquenessWeights {
    weights: BTreeMap<String, f64>,
}

impl UniquenessWeights {
    pub fn compute<'a>(
        table: &Table,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let raw: BTreeMap<String, f64> = columns
            .into_iter()
            .filter(|column| {
                let present = table.has_column(column);
                if !present {
                    debug!(column = *column, "column missing from table, not weighted");
                }
                present
            })
            .map(|column| (column.to_string(), uniqueness(table, column)))
            .collect();
        if raw.is_empty() {
            return Err(MatchError::EmptyColumnSet);
        }
        if table.is_empty() {
            return Err(MatchError::EmptyInput("target"));
        }

        let total: f64 = raw.values().sum();
        let weights = raw
            .into_iter()
            .map(|(column, value)| (column, value / total))
            .collect::<BTreeMap<_, _>>();
        debug!(?weights, "computed uniqueness weights");
        Ok(Self { weights })
    }

    /// Weight of `column`; `0.0` when it is not part of the set.
    pub fn weight(&self, column: &str) -> f64 {
        self.weights.get(column).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.weights.contains_key(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights
            .iter()
            .map(|(column, weight)| (column.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weighted mean of the per-column thresholds.
    ///
    /// A unique best candidate at or above this value is MATCHED rather than
    /// REVIEW.
    pub fn optimal_threshold<'a>(&self, links: impl IntoIterator<Item = &'a ColumnLink>) -> f64 {
        links
            .into_iter()
            .map(|link| link.threshold * self.weight(&link.target))
            .sum()
    }
}
