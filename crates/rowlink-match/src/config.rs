//! Column mapping and threshold configuration.
//!
//! A [`MatchConfig`] is an immutable value. It is derived from the two tables'
//! headers with [`MatchConfig::configure`] and refined through `with_*`
//! builders, each returning a new configuration.

use rowlink_model::Table;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MatchError, Result};

/// Default required match percentage for every column and for the run.
pub const DEFAULT_THRESHOLD: f64 = 75.0;

/// One target column and the reference columns it is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLink {
    /// Target column name.
    pub target: String,
    /// Reference columns whose values are space-joined into the comparison string.
    pub references: Vec<String>,
    /// Required match percentage for this column.
    pub threshold: f64,
}

impl ColumnLink {
    pub fn new(target: impl Into<String>, references: Vec<String>) -> Self {
        Self {
            target: target.into(),
            references,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// True when at least one reference column is linked.
    pub fn is_active(&self) -> bool {
        !self.references.is_empty()
    }
}

/// Complete matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// One entry per mapped target column, in target column order.
    pub links: Vec<ColumnLink>,
    /// Minimum composite score for any candidate to be accepted.
    pub required_threshold: f64,
    /// Columns present in both tables that narrow the candidate pool.
    pub group_columns: Vec<String>,
    /// Reference columns copied into the result for unique matches.
    pub get_columns: Vec<String>,
    /// Discard per-column scores below that column's threshold.
    pub cutoff: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            required_threshold: DEFAULT_THRESHOLD,
            group_columns: Vec::new(),
            get_columns: Vec::new(),
            cutoff: false,
        }
    }
}

impl MatchConfig {
    /// Derive a configuration from both headers.
    ///
    /// Every target column gets an entry, linked to the reference column of the
    /// same name when one exists, with the default threshold.
    pub fn configure(target_columns: &[String], reference_columns: &[String]) -> Self {
        let links = target_columns
            .iter()
            .map(|column| {
                let references = if reference_columns.contains(column) {
                    vec![column.clone()]
                } else {
                    Vec::new()
                };
                ColumnLink::new(column.clone(), references)
            })
            .collect::<Vec<_>>();
        debug!(
            target_columns = target_columns.len(),
            auto_linked = links.iter().filter(|link| link.is_active()).count(),
            "configured column mapping"
        );
        Self {
            links,
            ..Self::default()
        }
    }

    /// Shorthand for [`MatchConfig::configure`] over two tables.
    pub fn for_tables(target: &Table, reference: &Table) -> Self {
        Self::configure(target.columns(), reference.columns())
    }

    /// Re-derive the mapping for a new reference header.
    ///
    /// Linked reference columns that the new header lacks are dropped, as are
    /// get-columns it lacks.
    #[must_use]
    pub fn with_reference_columns(mut self, reference_columns: &[String]) -> Self {
        for link in self.links.iter_mut().filter(|link| link.is_active()) {
            link.references
                .retain(|column| reference_columns.contains(column));
        }
        self.get_columns
            .retain(|column| reference_columns.contains(column));
        self
    }

    /// Link `target` to one more reference column.
    #[must_use]
    pub fn with_link(mut self, target: &str, reference: &str) -> Self {
        match self.link_mut(target) {
            Some(link) => {
                if !link.references.iter().any(|column| column == reference) {
                    link.references.push(reference.to_string());
                }
            }
            None => self
                .links
                .push(ColumnLink::new(target, vec![reference.to_string()])),
        }
        self
    }

    #[must_use]
    pub fn without_link(mut self, target: &str, reference: &str) -> Self {
        if let Some(link) = self.link_mut(target) {
            link.references.retain(|column| column != reference);
        }
        self
    }

    /// Add or replace the whole entry for `target`, keeping its threshold.
    #[must_use]
    pub fn with_column(mut self, target: &str, references: Vec<String>) -> Self {
        match self.link_mut(target) {
            Some(link) => link.references = references,
            None => self.links.push(ColumnLink::new(target, references)),
        }
        self
    }

    #[must_use]
    pub fn without_column(mut self, target: &str) -> Self {
        self.links.retain(|link| link.target != target);
        self
    }

    pub fn with_threshold(mut self, target: &str, threshold: f64) -> Result<Self> {
        let threshold = check_threshold(threshold)?;
        let link = self
            .link_mut(target)
            .ok_or_else(|| MatchError::UnknownTargetColumn(target.to_string()))?;
        link.threshold = threshold;
        Ok(self)
    }

    pub fn with_required_threshold(mut self, threshold: f64) -> Result<Self> {
        self.required_threshold = check_threshold(threshold)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_group_columns(mut self, columns: Vec<String>) -> Self {
        self.group_columns = columns;
        self
    }

    #[must_use]
    pub fn with_get_columns(mut self, columns: Vec<String>) -> Self {
        self.get_columns = columns;
        self
    }

    #[must_use]
    pub fn with_cutoff(mut self, cutoff: bool) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn link(&self, target: &str) -> Option<&ColumnLink> {
        self.links.iter().find(|link| link.target == target)
    }

    fn link_mut(&mut self, target: &str) -> Option<&mut ColumnLink> {
        self.links.iter_mut().find(|link| link.target == target)
    }

    /// Links that take part in scoring.
    pub fn active_links(&self) -> impl Iterator<Item = &ColumnLink> {
        self.links.iter().filter(|link| link.is_active())
    }

    /// Target column names of the active links.
    pub fn active_columns(&self) -> Vec<&str> {
        self.active_links()
            .map(|link| link.target.as_str())
            .collect()
    }

    /// Active links that can score against these tables.
    ///
    /// A link is left out when the target lacks its column or the reference
    /// has none of its columns.
    pub fn scored_links(&self, target: &Table, reference: &Table) -> Vec<&ColumnLink> {
        self.active_links()
            .filter(|link| {
                let usable = target.has_column(&link.target)
                    && link
                        .references
                        .iter()
                        .any(|column| reference.has_column(column));
                if !usable {
                    debug!(
                        target = %link.target,
                        references = ?link.references,
                        "skipping link with missing columns"
                    );
                }
                usable
            })
            .collect()
    }

    /// Check the configuration against both tables before any row is scored.
    ///
    /// Mapped columns missing from either table are tolerated; links without
    /// columns on both sides are left out of scoring.
    pub fn validate(&self, target: &Table, reference: &Table) -> Result<()> {
        if self.active_links().next().is_none() {
            return Err(MatchError::EmptyColumnSet);
        }
        check_threshold(self.required_threshold)?;
        for link in &self.links {
            check_threshold(link.threshold)?;
        }
        for column in &self.group_columns {
            if !target.has_column(column) {
                return Err(MatchError::UnknownGroupColumn {
                    column: column.clone(),
                    table: "target",
                });
            }
            if !reference.has_column(column) {
                return Err(MatchError::UnknownGroupColumn {
                    column: column.clone(),
                    table: "reference",
                });
            }
        }
        if let Some(column) = self
            .get_columns
            .iter()
            .find(|column| !reference.has_column(column))
        {
            return Err(MatchError::UnknownReferenceColumn(column.clone()));
        }
        if target.is_empty() {
            return Err(MatchError::EmptyInput("target"));
        }
        Ok(())
    }
}

fn check_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(MatchError::InvalidThreshold(threshold))
    }
}
