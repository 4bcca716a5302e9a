//! Integration tests for dataset parsing and the character repository
//!
//! These tests verify:
//! - Header skipping, short-row rejection and quoted fields
//! - Reading filtering and the exceptional flag
//! - File-backed loading, including the BOM
//! - Repository search and idempotent loading

use camino::Utf8PathBuf;
use kanjicard::CharacterRepository;
use kanjicard::services::{
    DatasetError, FileDatasetSource, StaticDatasetSource, load_dataset, parse_dataset, split_row,
};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "常用漢字表\n出典\n版\nID,序,字,音1,音2,音3,音4,訓1\n";

fn data_row(id: &str, main: &str, counterpart: &str, flag: &str) -> String {
    let mut cols = vec![String::new(); 24];
    cols[0] = id.to_string();
    cols[1] = id.to_string();
    cols[2] = main.to_string();
    cols[3] = "ボク".to_string();
    cols[4] = "モク".to_string();
    cols[7] = "き".to_string();
    cols[8] = "こ".to_string();
    cols[17] = "\"木材, 樹木\"".to_string();
    cols[18] = "1".to_string();
    cols[19] = counterpart.to_string();
    cols[20] = "mù".to_string();
    cols[23] = flag.to_string();
    cols.join(",")
}

fn dataset(rows: &[String]) -> String {
    format!("{}{}\n", HEADER, rows.join("\n"))
}

fn sample_dataset() -> String {
    dataset(&[
        data_row("1", "木", "木", ""),
        data_row("2", "本（ほん）", "本", "否"),
        data_row("3", "森", "森", "是"),
        data_row("4", "来", "来", "否"),
    ])
}

#[test]
fn test_parse_sample_dataset() {
    let records = parse_dataset(&sample_dataset());

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].id, "1");
    assert_eq!(records[0].on_readings, vec!["ボク", "モク"]);
    assert_eq!(records[0].kun_readings, vec!["き", "こ"]);
    assert_eq!(records[0].example_usage, "木材, 樹木");
    assert_eq!(records[0].counterpart_readings, vec!["mù"]);
    assert_eq!(records[1].primary_glyph(), "本");
    assert!(!records[0].is_exceptional);
    assert!(!records[1].is_exceptional);
    assert!(records[2].is_exceptional);
}

#[test]
fn test_parse_header_only_dataset() {
    assert!(parse_dataset(HEADER).is_empty());
    assert!(parse_dataset("").is_empty());
}

#[test]
fn test_parse_rejects_short_rows() {
    let text = dataset(&["1,1,木,ボク".to_string(), data_row("2", "本", "本", "")]);
    let records = parse_dataset(&text);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "2");
}

#[test]
fn test_parse_handles_crlf_rows() {
    let text = sample_dataset().replace('\n', "\r\n");
    let records = parse_dataset(&text);

    assert_eq!(records.len(), 4);
    assert!(!records[3].is_exceptional);
}

#[test]
fn test_split_row_doubled_quotes() {
    let fields = split_row(r#"1,"say ""hi"", then go",end"#);
    assert_eq!(fields, vec!["1", r#"say "hi", then go"#, "end"]);
}

#[tokio::test]
async fn test_load_dataset_from_file_with_bom() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("data.csv")).unwrap();

    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(sample_dataset().as_bytes());
    fs::write(&path, bytes).unwrap();

    let records = load_dataset(&FileDatasetSource::new(&path)).await.unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].id, "1");
}

#[tokio::test]
async fn test_load_dataset_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("absent.csv")).unwrap();

    let result = load_dataset(&FileDatasetSource::new(&path)).await;
    assert!(matches!(result, Err(DatasetError::Unavailable { .. })));
}

#[tokio::test]
async fn test_repository_load_is_idempotent() {
    let mut repository = CharacterRepository::new();
    let source = StaticDatasetSource::new(sample_dataset());

    let first = repository.load(&source, false).await.unwrap().len();
    let other = StaticDatasetSource::new(dataset(&[data_row("9", "林", "林", "")]));
    let second = repository.load(&other, false).await.unwrap().len();

    assert_eq!(first, 4);
    assert_eq!(second, 4);
    assert!(repository.get("9").is_none());
}

#[test]
fn test_repository_search() {
    let repository = CharacterRepository::from_records(parse_dataset(&sample_dataset()));

    let hits = repository.search("木");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "1");

    // Annotated main forms match on the bare glyph
    assert_eq!(repository.search(" 本 ").len(), 1);

    assert!(repository.search("").is_empty());
    assert!(repository.search("   ").is_empty());
    assert!(repository.search("龍").is_empty());
}

proptest! {
    #[test]
    fn prop_parse_keeps_every_well_formed_row(ids in prop::collection::vec(1u32..100_000, 0..20)) {
        let rows: Vec<String> = ids
            .iter()
            .map(|id| data_row(&id.to_string(), "木", "木", ""))
            .collect();
        let text = dataset(&rows);
        let records = parse_dataset(&text);

        let parsed_ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let expected: Vec<String> = ids.iter().map(u32::to_string).collect();
        prop_assert_eq!(parsed_ids, expected);
        prop_assert_eq!(parse_dataset(&text), records);
    }

    #[test]
    fn prop_quoted_field_round_trips(value in "[a-z ,\"]{0,20}") {
        let quoted = format!("\"{}\"", value.replace('"', "\"\""));
        let fields = split_row(&format!("x,{},y", quoted));

        prop_assert_eq!(fields.len(), 3);
        prop_assert_eq!(fields[1].as_str(), value.trim());
    }

    #[test]
    fn prop_short_rows_are_rejected(columns in 1usize..24) {
        let row = vec!["7"; columns].join(",");
        prop_assert!(parse_dataset(&dataset(&[row])).is_empty());
    }
}
