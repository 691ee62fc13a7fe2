//! Reading and writing delimited tables on disk.

use std::io::Write;
use std::path::Path;

use rowlink_ingest::{IngestError, read_table, write_table};
use rowlink_model::Table;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{content}").unwrap();
    path
}

#[test]
fn test_reads_csv_as_text_with_blank_cells() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "people.csv",
        "name,zip,city\nAnn,01234,\"New York, NY\"\nBob,,LA\n",
    );

    let table = read_table(&path).unwrap();

    assert_eq!(table.columns(), ["name", "zip", "city"]);
    assert_eq!(table.height(), 2);
    assert_eq!(table.value(0, "zip"), Some("01234"));
    assert_eq!(table.value(0, "city"), Some("New York, NY"));
    assert_eq!(table.value(1, "zip"), Some(""));
}

#[test]
fn test_reads_tsv() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "people.tsv", "name\tcity\nAnn\tNY\n");

    let table = read_table(&path).unwrap();

    assert_eq!(table.row(0), Some(["Ann".to_string(), "NY".to_string()].as_slice()));
}

#[test]
fn test_write_then_read_keeps_cells() {
    let dir = TempDir::new().unwrap();
    let table = Table::from_rows(
        vec!["name".to_string(), "row_index".to_string()],
        vec![
            vec!["Ann".to_string(), "2".to_string()],
            vec!["Bob, Jr".to_string(), "3, 5".to_string()],
        ],
    )
    .unwrap();

    for name in ["out.csv", "out.tsv"] {
        let path = dir.path().join(name);
        write_table(&table, &path).unwrap();
        assert_eq!(read_table(&path).unwrap(), table, "{name}");
    }
}

#[test]
fn test_missing_file_is_reported() {
    let result = read_table(Path::new("/nonexistent/people.csv"));
    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "people.xlsx", "name\nAnn\n");
    assert!(matches!(
        read_table(&path),
        Err(IngestError::UnsupportedFormat { .. })
    ));
}
