use std::collections::HashMap;

use chunireport::catalog::{Catalog, MusicEntry};
use chunireport::config::ReportConfig;
use chunireport::records::{MusicResult, RecordSet};
use chunireport::report::write_report;
use chunireport::select::DEFAULT_MIN_CONST;
use chunireport::video::VideoLinks;
use serde_json::json;

fn record(
    id: &str,
    title: &str,
    diff: &str,
    level: f64,
    constant: f64,
    score: u32,
    rating: f64,
) -> serde_json::Value {
    json!({
        "id": id, "diff": diff, "level": level, "title": title,
        "const": constant, "score": score, "rating": rating,
        "is_const_unknown": false, "is_clear": true, "is_fullcombo": false,
        "is_alljustice": false, "is_fullchain": 0, "genre": "ORIGINAL",
        "updated_at": "2021-01-01T00:00:00+09:00", "is_played": true
    })
}

fn stub_records() -> RecordSet {
    let mut values = vec![
        record("a", "Alpha", "MAS", 14.5, 14.9, 1_008_000, 16.95),
        record("b", "Bravo", "MAS", 14.5, 14.5, 1_005_500, 16.1),
        record("c", "Charlie", "ULT", 15.0, 15.0, 995_000, 15.8),
        record("d", "Delta", "EXP", 13.5, 13.7, 1_009_500, 15.85),
        record("e", "Echo", "MAS", 14.5, 14.9, 990_000, 15.5),
    ];
    // Low-constant fillers that crowd everything below Bravo out of the best 30.
    for i in 0..28 {
        let id = format!("f{i}");
        let title = format!("Filler {i}");
        values.push(record(&id, &title, "MAS", 13.0, 13.0, 1_009_000, 17.0));
    }
    let records: Vec<MusicResult> = serde_json::from_value(json!(values)).unwrap();
    RecordSet::new(records)
}

fn stub_catalog() -> Catalog {
    let entries: Vec<MusicEntry> = serde_json::from_value(json!([
        {
            "meta": {"id": "a", "title": "Alpha", "genre": "ORIGINAL", "artist": "A",
                     "release": "2020-01-01", "bpm": 180},
            "data": {"MAS": {"level": 14.5, "const": 14.9, "maxcombo": 2020, "is_const_unknown": 0}}
        },
        {
            "meta": {"id": "c", "title": "Charlie", "genre": "ORIGINAL", "artist": "C",
                     "release": "2020-01-01", "bpm": 200},
            "data": {"ULT": {"level": 15.0, "const": 15.0, "maxcombo": 1000, "is_const_unknown": 0}}
        }
    ]))
    .unwrap();
    Catalog::from_entries(entries)
}

fn stub_links() -> VideoLinks {
    VideoLinks::new(HashMap::from([
        ("Alpha MAS".to_string(), "https://youtu.be/a".to_string()),
        ("Echo MAS".to_string(), "https://youtu.be/e".to_string()),
        ("Bravo EXP".to_string(), "https://youtu.be/wrong".to_string()),
    ]))
}

const EXPECTED: &str = "# 14+以上のリザルトと手元動画

スコアと対応してない動画があるのでがんばって撮る

|title|best|diff|Lv.|score|const|rate|yt|
|:---|:---:|:---:|:---:|---:|---:|---:|:---:|
|Charlie||ULT|15.0|`995000`|15.0|15.8||
|Alpha|\\*|MAS|14.5|`1008000`|14.9|16.95|[yt](https://youtu.be/a)|
|Echo||MAS|14.5|`990000`|14.9|15.5|[yt](https://youtu.be/e)|
|Bravo|\\*|MAS|14.5|`1005500`|14.5|16.1||
";

/// Run the report writer into a fresh temp dir and return the file contents.
fn write_and_read(records: &RecordSet) -> (String, usize) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme.md");
    let rows = write_report(
        records,
        &stub_links(),
        &ReportConfig::default(),
        DEFAULT_MIN_CONST,
        &path,
    )
    .unwrap();
    (std::fs::read_to_string(&path).unwrap(), rows)
}

#[test]
fn test_report_matches_golden() {
    let (written, rows) = write_and_read(&stub_records());
    assert_eq!(written, EXPECTED);
    assert_eq!(rows, 4);
}

#[test]
fn test_min_const_threshold_applied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme.md");
    let config = ReportConfig::default();
    let rows = write_report(&stub_records(), &stub_links(), &config, 15.0, &path).unwrap();
    assert_eq!(rows, 1);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("|Charlie||ULT|"));
    assert!(!written.contains("|Alpha|"));
}

#[test]
fn test_best_frame_is_fillers_plus_top_two() {
    let records = stub_records();
    let bests = records.bests();
    assert_eq!(bests.len(), 30);
    assert!(bests.iter().any(|r| r.title == "Alpha"));
    assert!(bests.iter().any(|r| r.title == "Bravo"));
    assert!(!bests.iter().any(|r| r.title == "Delta"));
}

#[test]
fn test_catalog_lookup_for_reported_charts() {
    let catalog = stub_catalog();
    let chart = catalog.chart("c", "ULT").unwrap();
    assert_eq!(chart.note_score().unwrap(), 1010.0);
    assert_eq!(catalog.chart("a", "MAS").unwrap().note_score().unwrap(), 500.0);
    assert!(catalog.get("e").is_err());
}

#[test]
fn test_report_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readme.md");
    std::fs::write(&path, "stale content that is much longer than nothing at all").unwrap();

    let config = ReportConfig::default();
    let rows = write_report(
        &RecordSet::default(),
        &stub_links(),
        &config,
        DEFAULT_MIN_CONST,
        &path,
    )
    .unwrap();
    assert_eq!(rows, 0);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# 14+"));
    assert!(written.ends_with(
        "|title|best|diff|Lv.|score|const|rate|yt|\n\
         |:---|:---:|:---:|:---:|---:|---:|---:|:---:|\n\n"
    ));
    assert!(!written.contains("stale"));
}
