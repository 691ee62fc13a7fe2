//! Settings file loading and layering.

use std::collections::BTreeMap;

use rowlink_cli::settings::MatchSettings;
use rowlink_match::{MatchConfig, ScorerKind};
use tempfile::NamedTempFile;

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn test_load_and_apply_settings_file() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        r#"{
            "links": {"name": ["first", "last"]},
            "thresholds": {"city": 60},
            "required_threshold": 70,
            "group_columns": ["region"],
            "get_columns": ["id"],
            "scorer": "adaptive"
        }"#,
    )
    .unwrap();

    let settings = MatchSettings::load(file.path()).unwrap();
    assert_eq!(settings.scorer(), ScorerKind::Adaptive);

    let base = MatchConfig::configure(
        &columns(&["name", "city", "region"]),
        &columns(&["first", "last", "city", "region", "id"]),
    );
    let config = settings.apply(base).unwrap();

    assert_eq!(config.link("name").unwrap().references, columns(&["first", "last"]));
    assert_eq!(config.link("city").unwrap().threshold, 60.0);
    assert_eq!(config.required_threshold, 70.0);
    assert_eq!(config.group_columns, columns(&["region"]));
    assert_eq!(config.get_columns, columns(&["id"]));
    assert!(!config.cutoff);
}

#[test]
fn test_flags_override_file() {
    let file = MatchSettings {
        links: BTreeMap::from([("name".to_string(), columns(&["full_name"]))]),
        required_threshold: Some(70.0),
        cutoff: Some(true),
        ..MatchSettings::default()
    };
    let flags = MatchSettings {
        links: BTreeMap::from([("name".to_string(), Vec::new())]),
        required_threshold: Some(90.0),
        ..MatchSettings::default()
    };

    let merged = file.overlay(flags);

    assert_eq!(merged.links["name"], Vec::<String>::new());
    assert_eq!(merged.required_threshold, Some(90.0));
    assert_eq!(merged.cutoff, Some(true));
    assert_eq!(merged.scorer(), ScorerKind::Weighted);
}

#[test]
fn test_unknown_threshold_column_is_an_error() {
    let settings = MatchSettings {
        thresholds: BTreeMap::from([("zip".to_string(), 50.0)]),
        ..MatchSettings::default()
    };
    let base = MatchConfig::configure(&columns(&["name"]), &columns(&["name"]));
    let err = settings.apply(base).unwrap_err();
    assert!(format!("{err:#}").contains("target column not mapped: zip"));
}

#[test]
fn test_unknown_fields_are_rejected() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), r#"{"treshold": 50}"#).unwrap();
    assert!(MatchSettings::load(file.path()).is_err());
}
