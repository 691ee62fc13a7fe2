use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rowlink_cli::logging::redact_value;
use rowlink_cli::settings::MatchSettings;
use rowlink_ingest::{read_table, write_table};
use rowlink_match::{MatchConfig, MatchOutcome, Matcher, ScorerKind, column_profiles};
use rowlink_model::{MatchStatus, Table};
use tracing::{debug, info, info_span, trace};

use crate::cli::{MatchArgs, ScorerArg, TablePair};
use crate::progress::BarProgress;
use crate::summary::print_profile;

/// A finished `match` run.
pub struct MatchRun {
    pub outcome: MatchOutcome,
    pub output: PathBuf,
}

pub fn run_match(args: &MatchArgs) -> Result<MatchRun> {
    let span = info_span!("match_command", target = %args.tables.target.display());
    let _guard = span.enter();
    let start = Instant::now();

    let (target, reference) = load_pair(&args.tables)?;
    let settings = settings_from_args(args)?;
    let config = settings
        .apply(MatchConfig::for_tables(&target, &reference))
        .context("apply match settings")?;
    debug!(
        links = ?config.active_columns(),
        group_columns = ?config.group_columns,
        get_columns = ?config.get_columns,
        "resolved configuration"
    );

    let matcher = Matcher::new(config)
        .with_similarity(settings.scorer())
        .with_parallel(!args.no_parallel);
    let progress = BarProgress::new();
    let result = matcher.run_with_progress(&target, &reference, &progress);
    progress.finish();
    let outcome = result.context("match tables")?;
    log_unmatched(&target, matcher.config(), &outcome);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.tables.target));
    write_table(&outcome.table, &output)
        .with_context(|| format!("write {}", output.display()))?;
    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&outcome.summary).context("serialize summary")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    }

    info!(
        output = %output.display(),
        rows = outcome.records.len(),
        duration_ms = start.elapsed().as_millis(),
        "match command complete"
    );
    Ok(MatchRun { outcome, output })
}

pub fn run_profile(args: &TablePair) -> Result<()> {
    let (target, reference) = load_pair(args)?;
    print_profile(&column_profiles(&target, &reference));
    Ok(())
}

fn load_pair(tables: &TablePair) -> Result<(Table, Table)> {
    let target = read_table(&tables.target)
        .with_context(|| format!("read target {}", tables.target.display()))?;
    let reference = read_table(&tables.reference)
        .with_context(|| format!("read reference {}", tables.reference.display()))?;
    Ok((target, reference))
}

/// Settings file (if any) overlaid with command-line flags.
fn settings_from_args(args: &MatchArgs) -> Result<MatchSettings> {
    let base = match &args.config {
        Some(path) => MatchSettings::load(path)?,
        None => MatchSettings::default(),
    };
    let flags = MatchSettings {
        links: args.links.iter().cloned().collect(),
        thresholds: args.thresholds.iter().cloned().collect(),
        required_threshold: args.required_threshold,
        group_columns: (!args.group_columns.is_empty()).then(|| args.group_columns.clone()),
        get_columns: (!args.get_columns.is_empty()).then(|| args.get_columns.clone()),
        cutoff: args.cutoff.then_some(true),
        scorer: args.scorer.map(|scorer| match scorer {
            ScorerArg::Weighted => ScorerKind::Weighted,
            ScorerArg::Adaptive => ScorerKind::Adaptive,
        }),
    };
    Ok(base.overlay(flags))
}

/// `<dir>/<stem>_matched.csv` beside the target table.
fn default_output_path(target: &Path) -> PathBuf {
    let stem = target
        .file_stem()
        .map_or_else(|| "target".to_string(), |stem| stem.to_string_lossy().into_owned());
    target.with_file_name(format!("{stem}_matched.csv"))
}

fn log_unmatched(target: &Table, config: &MatchConfig, outcome: &MatchOutcome) {
    let Some(column) = config.active_columns().first().copied() else {
        return;
    };
    for record in &outcome.records {
        if record.status == Some(MatchStatus::Unmatched) {
            let value = target.value(record.target_row, column).unwrap_or_default();
            trace!(row = record.target_row, column, value = redact_value(value), "unmatched row");
        }
    }
}
