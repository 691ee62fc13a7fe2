//! Column diagnostics used to pick links and group columns.

use std::collections::{BTreeMap, HashMap, HashSet};

use rowlink_model::Table;
use serde::Serialize;

use crate::classify::round2;
use crate::weighting::uniqueness;

/// How well one shared column lines up across the two tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOverlap {
    /// Percentage of distinct target values also present in the reference.
    pub percent: f64,
    /// Target rows per shared value; `None` when no value is shared.
    pub average_rows_to_compare: Option<f64>,
}

/// Overlap of every column present in both tables, keyed by column name.
pub fn column_overlap(target: &Table, reference: &Table) -> BTreeMap<String, ColumnOverlap> {
    target
        .columns()
        .iter()
        .filter_map(|column| {
            let target_values: HashSet<&str> = target.column_values(column)?.collect();
            let reference_values: HashSet<&str> = reference.column_values(column)?.collect();
            Some((
                column.clone(),
                overlap(target.height(), &target_values, &reference_values),
            ))
        })
        .collect()
}

fn overlap(rows: usize, target: &HashSet<&str>, reference: &HashSet<&str>) -> ColumnOverlap {
    let shared = target.intersection(reference).count();
    let percent = if target.is_empty() {
        0.0
    } else {
        round2(shared as f64 / target.len() as f64 * 100.0)
    };
    ColumnOverlap {
        percent,
        average_rows_to_compare: (shared > 0).then(|| rows as f64 / shared as f64),
    }
}

/// Share of rows (percent) holding each distinct value of `column`.
pub fn group_percentage(table: &Table, column: &str) -> Option<BTreeMap<String, f64>> {
    let rows = table.height() as f64;
    let mut sizes: BTreeMap<String, usize> = BTreeMap::new();
    for value in table.column_values(column)? {
        *sizes.entry(value.to_string()).or_default() += 1;
    }
    Some(
        sizes
            .into_iter()
            .map(|(value, size)| (value, size as f64 / rows * 100.0))
            .collect(),
    )
}

/// Positions of rows whose `column` value is blank.
pub fn blank_rows(table: &Table, column: &str) -> Option<Vec<usize>> {
    let rows = table
        .column_values(column)?
        .enumerate()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(row, _)| row)
        .collect();
    Some(rows)
}

/// Positions of rows whose non-blank `column` value occurs more than once.
pub fn duplicate_rows(table: &Table, column: &str) -> Option<Vec<usize>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in table.column_values(column)? {
        if !value.trim().is_empty() {
            *counts.entry(value).or_default() += 1;
        }
    }
    let rows = table
        .column_values(column)?
        .enumerate()
        .filter(|(_, value)| counts.get(value).is_some_and(|count| *count > 1))
        .map(|(row, _)| row)
        .collect();
    Some(rows)
}

/// Display profile of one target column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub column: String,
    /// Distinct values over rows, 0–1.
    pub uniqueness: f64,
    /// Blank rows over rows, 0–1.
    pub blank_ratio: f64,
    pub duplicate_rows: usize,
    /// `None` when the reference table lacks the column.
    pub overlap: Option<ColumnOverlap>,
}

pub fn column_profiles(target: &Table, reference: &Table) -> Vec<ColumnProfile> {
    let mut overlaps = column_overlap(target, reference);
    let rows = target.height();
    target
        .columns()
        .iter()
        .map(|column| {
            let blanks = blank_rows(target, column).map_or(0, |rows| rows.len());
            ColumnProfile {
                column: column.clone(),
                uniqueness: uniqueness(target, column),
                blank_ratio: if rows == 0 {
                    0.0
                } else {
                    blanks as f64 / rows as f64
                },
                duplicate_rows: duplicate_rows(target, column).map_or(0, |rows| rows.len()),
                overlap: overlaps.remove(column),
            }
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
    fn overlap_counts_shared_distinct_values() {
        let target = table(
            &["city", "name"],
            &[&["NY", "Ann"], &["NY", "Bob"], &["LA", "Cid"], &["SF", "Dee"]],
        );
        let reference = table(&["city"], &[&["NY"], &["LA"], &["Boston"]]);
        let overlap = column_overlap(&target, &reference);
        assert_eq!(overlap.len(), 1);
        let city = &overlap["city"];
        assert_eq!(city.percent, 66.67);
        assert_eq!(city.average_rows_to_compare, Some(2.0));
    }

    #[test]
    fn disjoint_columns_have_no_average() {
        let target = table(&["city"], &[&["NY"]]);
        let reference = table(&["city"], &[&["LA"]]);
        let overlap = column_overlap(&target, &reference);
        assert_eq!(overlap["city"].percent, 0.0);
        assert_eq!(overlap["city"].average_rows_to_compare, None);
    }

    #[test]
    fn groups_blanks_and_duplicates() {
        let table = table(&["region"], &[&["East"], &[""], &["East"], &["West"], &[" "]]);
        let groups = group_percentage(&table, "region").unwrap();
        assert_eq!(groups["East"], 40.0);
        assert_eq!(groups["West"], 20.0);
        assert_eq!(blank_rows(&table, "region"), Some(vec![1, 4]));
        assert_eq!(duplicate_rows(&table, "region"), Some(vec![0, 2]));
        assert_eq!(blank_rows(&table, "zip"), None);
    }

    #[test]
    fn profiles_cover_every_target_column() {
        let target = table(&["name", "dob"], &[&["Ann", ""], &["Ann", "1990"]]);
        let reference = table(&["name"], &[&["Ann"]]);
        let profiles = column_profiles(&target, &reference);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].uniqueness, 0.5);
        assert_eq!(profiles[0].duplicate_rows, 2);
        assert_eq!(profiles[0].overlap.as_ref().map(|o| o.percent), Some(100.0));
        assert_eq!(profiles[1].blank_ratio, 0.5);
        assert!(profiles[1].overlap.is_none());
    }
}
