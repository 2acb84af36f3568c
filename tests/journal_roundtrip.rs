//! Journal append and CSV export round-trip tests
//!
//! Verifies the core persistence property: every valid line of the JSONL
//! journal produces exactly one CSV row with matching timestamp, speed
//! and ping fields, in input order, and corrupt lines are skipped.

use chrono::{Duration as ChronoDuration, SecondsFormat, TimeZone, Utc};
use internet_speed_monitor::{
    journal::MeasurementJournal,
    models::{Config, MeasurementRecord},
    types::MeasurementStatus,
};
use proptest::prelude::*;

fn record_at(
    offset_secs: i64,
    speed: Option<&str>,
    ping: Option<&str>,
    status: MeasurementStatus,
) -> MeasurementRecord {
    let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    MeasurementRecord {
        timestamp: base + ChronoDuration::seconds(offset_secs),
        speed: speed.map(String::from),
        ping: ping.map(String::from),
        status,
    }
}

#[tokio::test]
async fn test_full_round_trip_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let journal = MeasurementJournal::new(dir.path().join("speed_log.json"), &Config::default());

    let records = vec![
        record_at(0, Some("48.3 Mbps"), Some("23.410 ms"), MeasurementStatus::Complete),
        record_at(1800, Some("51.0 Mbps"), None, MeasurementStatus::Partial),
        record_at(3600, None, None, MeasurementStatus::Failed),
    ];
    for record in &records {
        journal.append(record).await.unwrap();
    }

    let contents = journal.read_all().await.unwrap();
    assert_eq!(contents.records, records);
    assert_eq!(contents.skipped, 0);
}

#[tokio::test]
async fn test_export_row_fields_match_journal_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let journal = MeasurementJournal::new(dir.path().join("speed_log.json"), &Config::default());

    // Values deliberately keep their original formatting, trailing zeros
    // included, since the journal stores external readings verbatim.
    journal
        .append(&record_at(0, Some("7.20 Mbps"), Some("104.050 ms"), MeasurementStatus::Complete))
        .await
        .unwrap();

    let csv_path = dir.path().join("export.csv");
    journal.export_csv(&csv_path).await.unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let row = csv.lines().nth(1).unwrap();
    let fields: Vec<&str> = row.split(',').collect();
    assert_eq!(fields[0], "2025-06-01T00:00:00Z");
    assert_eq!(fields[1], "7.20 Mbps");
    assert_eq!(fields[2], "104.050 ms");
    assert_eq!(fields[3], "complete");

    // The CSV timestamp must reproduce the journal line's text exactly,
    // not a differently-rendered RFC 3339 form of the same instant.
    let line = std::fs::read_to_string(journal.path()).unwrap();
    let journal_ts = serde_json::from_str::<serde_json::Value>(line.trim()).unwrap()["timestamp"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(fields[0], journal_ts);
}

#[tokio::test]
async fn test_corrupt_lines_do_not_shift_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speed_log.json");
    let journal = MeasurementJournal::new(&path, &Config::default());

    let first = record_at(0, Some("40.0 Mbps"), None, MeasurementStatus::Partial);
    let second = record_at(60, Some("41.0 Mbps"), None, MeasurementStatus::Partial);

    let mut content = serde_json::to_string(&first).unwrap();
    content.push('\n');
    content.push_str("{{{ broken line }}}\n");
    content.push_str(&serde_json::to_string(&second).unwrap());
    content.push('\n');
    std::fs::write(&path, content).unwrap();

    let csv_path = dir.path().join("export.csv");
    let summary = journal.export_csv(&csv_path).await.unwrap();
    assert_eq!(summary.exported, 2);
    assert_eq!(summary.skipped, 1);

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert!(rows[0].contains("40.0 Mbps"));
    assert!(rows[1].contains("41.0 Mbps"));
}

fn arb_status() -> impl Strategy<Value = MeasurementStatus> {
    prop_oneof![
        Just(MeasurementStatus::Complete),
        Just(MeasurementStatus::Partial),
        Just(MeasurementStatus::Failed),
    ]
}

fn arb_record() -> impl Strategy<Value = MeasurementRecord> {
    (
        0i64..10_000_000,
        proptest::option::of(0.1f64..2000.0),
        proptest::option::of(0.1f64..500.0),
        arb_status(),
    )
        .prop_map(|(offset, speed, ping, status)| {
            record_at(
                offset,
                speed.map(|v| format!("{:.1} Mbps", v)).as_deref(),
                ping.map(|v| format!("{:.3} ms", v)).as_deref(),
                status,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every appended record comes back as exactly one CSV row, in the
    /// order it was appended, with speed and ping reproduced verbatim.
    #[test]
    fn prop_export_is_one_row_per_record_in_order(records in proptest::collection::vec(arb_record(), 0..20)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let outcome: Result<(), TestCaseError> = rt.block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let journal =
                MeasurementJournal::new(dir.path().join("speed_log.json"), &Config::default());

            for record in &records {
                journal.append(record).await.unwrap();
            }

            if records.is_empty() {
                // Nothing was ever appended, so there is no journal file
                prop_assert!(journal.read_all().await.is_err());
                return Ok(());
            }

            let csv_path = dir.path().join("export.csv");
            let summary = journal.export_csv(&csv_path).await.unwrap();
            prop_assert_eq!(summary.exported, records.len());
            prop_assert_eq!(summary.skipped, 0);

            let csv = std::fs::read_to_string(&csv_path).unwrap();
            let rows: Vec<&str> = csv.lines().skip(1).collect();
            prop_assert_eq!(rows.len(), records.len());

            for (row, record) in rows.iter().zip(&records) {
                let fields: Vec<&str> = row.split(',').collect();
                prop_assert_eq!(
                    fields[0],
                    record.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
                );
                prop_assert_eq!(fields[1], record.speed.as_deref().unwrap_or(""));
                prop_assert_eq!(fields[2], record.ping.as_deref().unwrap_or(""));
                prop_assert_eq!(fields[3], record.status.as_str());
            }

            Ok(())
        });
        outcome?;
    }
}
