//! Candidate-pool narrowing by grouping columns.

use std::collections::HashMap;

use rowlink_model::Table;
use tracing::debug;

use crate::error::{MatchError, Result};

/// Reference rows a target row is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePool<'a> {
    /// Every reference row.
    All(usize),
    /// Reference rows sharing the target row's group values, ascending.
    Group(&'a [usize]),
}

impl CandidatePool<'_> {
    pub fn len(&self) -> usize {
        match self {
            CandidatePool::All(height) => *height,
            CandidatePool::Group(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        let (range, subset) = match self {
            CandidatePool::All(height) => (0..*height, None),
            CandidatePool::Group(rows) => (0..0, Some(rows.iter().copied())),
        };
        range.chain(subset.into_iter().flatten())
    }
}

/// Reference rows bucketed by their group-column values.
///
/// Narrowing is a pool optimization only: a target row whose group values
/// match no bucket is scored against the whole reference table.
#[derive(Debug, Clone)]
pub struct CandidateSubsetter {
    target_columns: Vec<usize>,
    reference_height: usize,
    buckets: HashMap<Vec<String>, Vec<usize>>,
}

impl CandidateSubsetter {
    pub fn new(target: &Table, reference: &Table, group_columns: &[String]) -> Result<Self> {
        let target_columns = resolve_columns(target, group_columns, "target")?;
        let reference_columns = resolve_columns(reference, group_columns, "reference")?;

        let mut buckets: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
        if !reference_columns.is_empty() {
            for (position, row) in reference.rows().iter().enumerate() {
                let key = reference_columns
                    .iter()
                    .map(|&column| row[column].clone())
                    .collect();
                buckets.entry(key).or_default().push(position);
            }
        }
        debug!(
            group_columns = group_columns.len(),
            buckets = buckets.len(),
            "built candidate buckets"
        );

        Ok(Self {
            target_columns,
            reference_height: reference.height(),
            buckets,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Candidate pool for one target row.
    pub fn candidates(&self, target: &Table, row: usize) -> CandidatePool<'_> {
        if self.target_columns.is_empty() {
            return CandidatePool::All(self.reference_height);
        }
        let key: Vec<String> = self
            .target_columns
            .iter()
            .map(|&column| target.cell(row, column).to_string())
            .collect();
        match self.buckets.get(&key) {
            Some(rows) if !rows.is_empty() => CandidatePool::Group(rows),
            _ => CandidatePool::All(self.reference_height),
        }
    }
}

fn resolve_columns(table: &Table, columns: &[String], side: &'static str) -> Result<Vec<usize>> {
    columns
        .iter()
        .map(|column| {
            table
                .column_index(column)
                .ok_or_else(|| MatchError::UnknownGroupColumn {
                    column: column.clone(),
                    table: side,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            columns.iter().map(|column| (*column).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|value| (*value).to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn no_group_columns_yield_everything() {
        let target = table(&["name"], &[&["Ann"]]);
        let reference = table(&["name"], &[&["Ann"], &["Bob"]]);
        let subsetter = CandidateSubsetter::new(&target, &reference, &[]).unwrap();
        let pool = subsetter.candidates(&target, 0);
        assert_eq!(pool, CandidatePool::All(2));
        assert_eq!(pool.rows().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn matching_bucket_narrows_pool() {
        let target = table(&["name", "region"], &[&["Ann", "East"], &["Bob", "North"]]);
        let reference = table(
            &["name", "region"],
            &[&["Ann", "West"], &["Ann", "East"], &["Bob", "East"]],
        );
        let subsetter =
            CandidateSubsetter::new(&target, &reference, &["region".to_string()]).unwrap();
        assert_eq!(subsetter.bucket_count(), 2);

        let pool = subsetter.candidates(&target, 0);
        assert_eq!(pool.rows().collect::<Vec<_>>(), vec![1, 2]);

        let fallback = subsetter.candidates(&target, 1);
        assert_eq!(fallback, CandidatePool::All(3));
    }

    #[test]
    fn missing_group_column_is_reported() {
        let target = table(&["name", "region"], &[&["Ann", "East"]]);
        let reference = table(&["name"], &[&["Ann"]]);
        let err = CandidateSubsetter::new(&target, &reference, &["region".to_string()])
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::UnknownGroupColumn {
                column: "region".to_string(),
                table: "reference",
            }
        );
    }
}
