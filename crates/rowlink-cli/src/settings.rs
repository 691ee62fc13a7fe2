//! Match settings loaded from JSON and command-line flags.
//!
//! Settings are layered on top of the mapping derived from the two table
//! headers: a settings file first, then flags. Later layers win field by
//! field.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rowlink_match::{MatchConfig, ScorerKind};
use serde::Deserialize;
use tracing::debug;

/// Optional overrides for a [`MatchConfig`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchSettings {
    /// Target column to reference columns; replaces the whole entry.
    pub links: BTreeMap<String, Vec<String>>,
    /// Target column to required percentage.
    pub thresholds: BTreeMap<String, f64>,
    pub required_threshold: Option<f64>,
    pub group_columns: Option<Vec<String>>,
    pub get_columns: Option<Vec<String>>,
    pub cutoff: Option<bool>,
    pub scorer: Option<ScorerKind>,
}

impl MatchSettings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse settings {}", path.display()))?;
        debug!(path = %path.display(), links = settings.links.len(), "loaded settings");
        Ok(settings)
    }

    /// Layer `other` on top of `self`; every field `other` sets wins.
    #[must_use]
    pub fn overlay(mut self, other: MatchSettings) -> Self {
        self.links.extend(other.links);
        self.thresholds.extend(other.thresholds);
        self.required_threshold = other.required_threshold.or(self.required_threshold);
        self.group_columns = other.group_columns.or(self.group_columns);
        self.get_columns = other.get_columns.or(self.get_columns);
        self.cutoff = other.cutoff.or(self.cutoff);
        self.scorer = other.scorer.or(self.scorer);
        self
    }

    /// Apply the overrides to a header-derived configuration.
    pub fn apply(&self, mut config: MatchConfig) -> Result<MatchConfig> {
        for (target, references) in &self.links {
            config = config.with_column(target, references.clone());
        }
        for (target, threshold) in &self.thresholds {
            config = config
                .with_threshold(target, *threshold)
                .with_context(|| format!("threshold for column '{target}'"))?;
        }
        if let Some(threshold) = self.required_threshold {
            config = config
                .with_required_threshold(threshold)
                .context("required threshold")?;
        }
        if let Some(columns) = &self.group_columns {
            config = config.with_group_columns(columns.clone());
        }
        if let Some(columns) = &self.get_columns {
            config = config.with_get_columns(columns.clone());
        }
        if let Some(cutoff) = self.cutoff {
            config = config.with_cutoff(cutoff);
        }
        Ok(config)
    }

    pub fn scorer(&self) -> ScorerKind {
        self.scorer.unwrap_or_default()
    }
}

/// Parse `target=ref1,ref2`; `target=` unlinks the column.
pub fn parse_link(value: &str) -> std::result::Result<(String, Vec<String>), String> {
    let (target, references) = split_pair(value)?;
    let references = references
        .split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(ToString::to_string)
        .collect();
    Ok((target, references))
}

/// Parse `column=value` with a value in `[0, 100]`.
pub fn parse_threshold(value: &str) -> std::result::Result<(String, f64), String> {
    let (column, threshold) = split_pair(value)?;
    let threshold: f64 = threshold
        .trim()
        .parse()
        .map_err(|_| format!("invalid threshold '{threshold}' in '{value}'"))?;
    if !(0.0..=100.0).contains(&threshold) {
        return Err(format!("threshold must be between 0 and 100, got {threshold}"));
    }
    Ok((column, threshold))
}

fn split_pair(value: &str) -> std::result::Result<(String, &str), String> {
    let (key, rest) = value
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{value}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing column name in '{value}'"));
    }
    Ok((key.to_string(), rest))
}
