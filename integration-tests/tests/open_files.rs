mod common;

use common::{WEB_LOG, WORKER_LOG};
use integration_tests::harness::LogDir;
use pretty_assertions::assert_eq;
use sawmill_core::SawmillError;
use sawmill_core::open::{IngestOptions, open_entries, open_files, open_records};
use sawmill_core::parse::ParserOptions;
use sawmill_core::processor::{
    BasicFieldsFilter, CountEntries, CountRecords, EntryQueue, FilterByBasicFields,
    FinishValue, If, LevelThreshold,
};

#[test]
fn gzipped_and_plain_files_are_merged() {
    // Arrange
    let dir = LogDir::new();
    dir.write("web.log", WEB_LOG);
    dir.write_gz("worker.log.gz", WORKER_LOG);
    let mut queue = EntryQueue::new();

    // Act
    open_files(
        [dir.glob("*.log"), dir.glob("*.gz")],
        &mut queue,
        IngestOptions::default(),
    )
    .unwrap();

    // Assert
    assert_eq!(
        common::messages(&queue.into_entries()),
        vec![
            "booting",
            "polling",
            "slow query\n  select * from users",
            "failed"
        ]
    );
}

#[test]
fn filtered_counts_over_files() {
    let dir = LogDir::new();
    dir.write("web.log", WEB_LOG);
    dir.write("worker.log", WORKER_LOG);
    let mut pipeline = If::new(
        FilterByBasicFields::new(BasicFieldsFilter {
            level: Some(LevelThreshold::named("WARN")),
            ..BasicFieldsFilter::default()
        }),
        CountEntries::new(),
        None,
    );

    let value =
        open_entries([dir.glob("*.log")], &mut pipeline, ParserOptions::default()).unwrap();

    assert_eq!(value, Some(FinishValue::List(vec![FinishValue::Count(2)])));
}

#[test]
fn incomplete_records_are_counted_when_flushed() {
    let dir = LogDir::new();
    dir.write("web.log", WEB_LOG);
    dir.write("worker.log", WORKER_LOG);

    let complete = open_records(
        [dir.glob("*.log")],
        CountRecords::new(),
        ParserOptions::default(),
    )
    .unwrap();
    let all = open_records(
        [dir.glob("*.log")],
        CountRecords::labeled("records: "),
        ParserOptions {
            emit_incomplete_records_at_eof: true,
            ..ParserOptions::default()
        },
    )
    .unwrap();

    assert_eq!(complete, Some(FinishValue::Count(1)));
    assert_eq!(all, Some(FinishValue::Text("records: 2".to_string())));
}

#[test]
fn malformed_pattern_is_a_glob_error() {
    let mut queue = EntryQueue::new();

    let err = open_files(["[oops"], &mut queue, IngestOptions::default()).unwrap_err();

    assert!(matches!(err, SawmillError::Glob { .. }));
    assert!(queue.is_empty());
}
