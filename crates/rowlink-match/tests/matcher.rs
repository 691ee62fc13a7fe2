//! End-to-end matcher scenarios.

use rowlink_match::{MatchConfig, MatchError, Matcher, ScorerKind};
use rowlink_model::{MatchStatus, Table};

fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_rows(
        columns.iter().map(|column| (*column).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|value| (*value).to_string()).collect())
            .collect(),
    )
    .expect("table")
}

fn statuses(table: &Table) -> Vec<&str> {
    table
        .column_values("match_status")
        .expect("match_status column")
        .collect()
}

#[test]
fn exact_row_is_matched() {
    let target = table(&["name", "city"], &[&["Ann", "NY"]]);
    let reference = table(&["name", "city"], &[&["Ann", "NY"], &["Ann", "LA"]]);
    let config = MatchConfig::for_tables(&target, &reference);

    let outcome = Matcher::new(config).run(&target, &reference).expect("run");

    assert_eq!(outcome.optimal_threshold, 75.0);
    assert_eq!(outcome.records[0].status, Some(MatchStatus::Matched));
    assert_eq!(outcome.records[0].score, Some(100.0));
    assert_eq!(outcome.table.value(0, "row_index"), Some("2"));
    assert_eq!(outcome.table.value(0, "match_score"), Some("100"));
}

#[test]
fn links_to_missing_columns_do_not_dilute_scores() {
    let target = table(&["name"], &[&["Ann"], &["Bob"]]);
    let reference = table(&["name"], &[&["Ann"], &["Bob"]]);
    let config = MatchConfig::for_tables(&target, &reference)
        .with_link("nickname", "nick");

    let outcome = Matcher::new(config).run(&target, &reference).expect("run");

    assert_eq!(statuses(&outcome.table), vec!["MATCHED", "MATCHED"]);
    assert_eq!(outcome.records[0].score, Some(100.0));
    assert_eq!(outcome.records[1].reference_rows, vec![1]);
    assert_eq!(outcome.weights.len(), 1);
    assert_eq!(outcome.optimal_threshold, 75.0);
}

#[test]
fn empty_reference_leaves_everything_unmatched() {
    let target = table(&["name"], &[&["Ann"], &["Bob"]]);
    let reference = table(&["name"], &[]);
    let config = MatchConfig::for_tables(&target, &reference);

    let outcome = Matcher::new(config).run(&target, &reference).expect("run");

    assert_eq!(statuses(&outcome.table), vec!["UNMATCHED", "UNMATCHED"]);
    let entries = outcome.summary.entries();
    assert_eq!(entries[0], ("Total Match Score".to_string(), "0%".to_string()));
    assert_eq!(entries[2], ("Highest Match Score".to_string(), "-1%".to_string()));
    assert_eq!(entries[3], ("Lowest Match Score".to_string(), "-1%".to_string()));
}

#[test]
fn group_columns_restrict_candidates_with_fallback() {
    let target = table(&["name", "region"], &[&["Ann Lee", "East"], &["Bob", "North"]]);
    let reference = table(
        &["name", "region"],
        &[&["Ann Lee", "West"], &["Ann Le", "East"], &["Bob", "West"]],
    );
    let config = MatchConfig::for_tables(&target, &reference)
        .without_column("region")
        .with_group_columns(vec!["region".to_string()]);

    let outcome = Matcher::new(config).run(&target, &reference).expect("run");

    // The exact "Ann Lee" row lives in another region.
    assert_eq!(outcome.records[0].reference_rows, vec![1]);
    assert_eq!(outcome.records[0].status, Some(MatchStatus::Matched));
    // No "North" bucket: the whole reference table is searched.
    assert_eq!(outcome.records[1].reference_rows, vec![2]);
    assert_eq!(outcome.table.value(1, "row_index"), Some("4"));
}

#[test]
fn shared_claims_are_duplicates() {
    let target = table(&["name"], &[&["Ann"], &["Anne"], &["Bob"]]);
    let reference = table(&["name"], &[&["Ann"], &["Bob"]]);
    let config = MatchConfig::for_tables(&target, &reference);

    let outcome = Matcher::new(config).run(&target, &reference).expect("run");

    assert_eq!(statuses(&outcome.table), vec!["DUPLICATES", "DUPLICATES", "MATCHED"]);
    assert_eq!(outcome.summary.count(MatchStatus::Duplicates), 2);
}

#[test]
fn tied_best_scores_are_ambiguous() {
    let target = table(&["name"], &[&["Ann"]]);
    let reference = table(&["name"], &[&["x"], &["y"], &["z"]]);
    let config = MatchConfig::for_tables(&target, &reference);

    let outcome = Matcher::new(config)
        .with_similarity(|_: &str, b: &str| if b == "y" { 10.0 } else { 80.0 })
        .run(&target, &reference)
        .expect("run");

    let record = &outcome.records[0];
    assert_eq!(record.status, Some(MatchStatus::Ambiguous));
    assert_eq!(record.reference_rows, vec![0, 2]);
    assert_eq!(record.score, None);
    assert_eq!(outcome.table.value(0, "row_index"), Some("2, 4"));
}

#[test]
fn required_threshold_compares_rounded_scores() {
    let target = table(&["name"], &[&["Ann"]]);
    let reference = table(&["name"], &[&["Ann"]]);
    let config = MatchConfig::for_tables(&target, &reference);

    let below = Matcher::new(config.clone())
        .with_similarity(|_: &str, _: &str| 74.994)
        .run(&target, &reference)
        .expect("run");
    assert_eq!(below.records[0].status, Some(MatchStatus::Unmatched));
    assert!(below.records[0].reference_rows.is_empty());

    let rounded_up = Matcher::new(config)
        .with_similarity(|_: &str, _: &str| 74.996)
        .run(&target, &reference)
        .expect("run");
    assert_eq!(rounded_up.records[0].status, Some(MatchStatus::Matched));
    assert_eq!(rounded_up.records[0].score, Some(74.996));
    assert_eq!(rounded_up.table.value(0, "match_score"), Some("74.996"));
}

#[test]
fn review_between_required_and_optimal() {
    let target = table(&["name"], &[&["Ann"]]);
    let reference = table(&["name"], &[&["Ann"]]);
    let config = MatchConfig::for_tables(&target, &reference)
        .with_threshold("name", 95.0)
        .expect("threshold")
        .with_required_threshold(60.0)
        .expect("required threshold");

    let outcome = Matcher::new(config)
        .with_similarity(|_: &str, _: &str| 80.0)
        .run(&target, &reference)
        .expect("run");

    assert_eq!(outcome.optimal_threshold, 95.0);
    assert_eq!(outcome.records[0].status, Some(MatchStatus::Review));
    assert_eq!(outcome.summary.match_rate, 0.0);
}

#[test]
fn runs_are_deterministic() {
    let target = table(
        &["name", "city"],
        &[
            &["Ann Lee", "New York"],
            &["Bob Stone", "Boston"],
            &["Cid", "Austin"],
            &["Dee Park", "Denver"],
        ],
    );
    let reference = table(
        &["name", "city"],
        &[
            &["Lee, Ann", "New York"],
            &["Robert Stone", "Boston"],
            &["Dee Parker", "Denver CO"],
            &["Ann", "NYC"],
        ],
    );
    let config = MatchConfig::for_tables(&target, &reference);

    let parallel = Matcher::new(config.clone())
        .run(&target, &reference)
        .expect("run");
    let again = Matcher::new(config.clone())
        .run(&target, &reference)
        .expect("run");
    let sequential = Matcher::new(config)
        .with_parallel(false)
        .run(&target, &reference)
        .expect("run");

    assert_eq!(parallel.table, again.table);
    assert_eq!(parallel.table, sequential.table);
    assert_eq!(parallel.summary, sequential.summary);
}

#[test]
fn adaptive_scorer_is_selectable() {
    let target = table(&["state"], &[&["NY"]]);
    let reference = table(&["state"], &[&["ny"], &["California"]]);
    let config = MatchConfig::for_tables(&target, &reference);

    let outcome = Matcher::new(config)
        .with_similarity(ScorerKind::Adaptive)
        .run(&target, &reference)
        .expect("run");

    assert_eq!(outcome.records[0].reference_rows, vec![0]);
    assert_eq!(outcome.records[0].status, Some(MatchStatus::Matched));
}

#[test]
fn invalid_configuration_fails_before_scoring() {
    let target = table(&["name"], &[&["Ann"]]);
    let reference = table(&["full_name"], &[&["Ann"]]);

    let unlinked = MatchConfig::for_tables(&target, &reference);
    assert_eq!(
        Matcher::new(unlinked).run(&target, &reference).unwrap_err(),
        MatchError::EmptyColumnSet
    );

    let linked = MatchConfig::for_tables(&target, &reference).with_link("name", "full_name");
    let missing_get = linked.clone().with_get_columns(vec!["id".to_string()]);
    assert_eq!(
        Matcher::new(missing_get).run(&target, &reference).unwrap_err(),
        MatchError::UnknownReferenceColumn("id".to_string())
    );

    let dangling = MatchConfig::for_tables(&target, &reference).with_link("name", "alias");
    assert_eq!(
        Matcher::new(dangling).run(&target, &reference).unwrap_err(),
        MatchError::EmptyColumnSet
    );

    let empty_target = table(&["name"], &[]);
    assert_eq!(
        Matcher::new(linked).run(&empty_target, &reference).unwrap_err(),
        MatchError::EmptyInput("target")
    );
}
