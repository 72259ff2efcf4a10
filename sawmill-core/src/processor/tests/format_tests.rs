use crate::entry::{BeginRecord, EndRecord, Entry, Message, Timestamp, UnknownData};
use crate::format::FormatOptions;
use crate::level::STANDARD_LEVELS;
use crate::parse::{Parser, ParserOptions};
use crate::processor::{EntryProcessor, FormatEntries, FormatRecords};
use crate::record::RecordBuilder;
use crate::rotate::{Rotater, RotaterOptions, ShiftingLogFile, ShiftingOptions};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

const LOG: &str = "\
junk
[INFO 2009-10-20 08:30:45.00 rails .] before
[ANY 2009-10-20 08:30:45.10 rails ^] BEGIN abc
[INFO 2009-10-20 08:30:45.20 rails =] user = jane
[INFO 2009-10-20 08:30:45.30 rails .] multi\\
line
[ANY 2009-10-20 08:30:45.40 rails $] END abc
";

fn ts() -> Timestamp {
    Utc.with_ymd_and_hms(2009, 10, 20, 8, 30, 45).unwrap()
}

#[test]
fn formatting_parsed_entries_reproduces_the_input() {
    // Arrange
    let mut formatter = FormatEntries::to_writer(Vec::<u8>::new(), FormatOptions::default());
    let mut parser = Parser::new(Cursor::new(LOG), ParserOptions::default());

    // Act
    parser.parse_all(&mut formatter).unwrap();
    formatter.finish().unwrap();

    // Assert
    let written = formatter
        .rotater()
        .with_strategy(|s| s.stream().cloned())
        .unwrap();
    assert_eq!(String::from_utf8(written).unwrap(), LOG);
}

#[test]
fn format_records_writes_whole_records() {
    let mut builder = RecordBuilder::new(FormatRecords::to_writer(
        Vec::<u8>::new(),
        FormatOptions::default(),
    ));
    let mut parser = Parser::new(Cursor::new(LOG), ParserOptions::default());

    parser.parse_all(&mut builder).unwrap();
    builder.finish().unwrap();

    let written = builder
        .processor()
        .rotater()
        .with_strategy(|s| s.stream().cloned())
        .unwrap();
    assert_eq!(String::from_utf8(written).unwrap(), LOG);
}

#[test]
fn a_record_stays_on_one_file_across_a_rotation() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let strategy = ShiftingLogFile::new(ShiftingOptions {
        path: path.clone(),
        max_file_size: Some(10),
        history_size: 3,
        ..ShiftingOptions::default()
    });
    let backup0 = strategy.backup_path(0);
    let rotater = Rotater::with_options(
        strategy,
        RotaterOptions {
            omit_directives: true,
            concurrent_writes: false,
        },
    );
    let mut formatter = FormatEntries::to_rotater(
        rotater,
        FormatOptions {
            include_id: true,
            ..FormatOptions::default()
        },
    );
    let any = STANDARD_LEVELS.get("ANY").unwrap();
    let info = STANDARD_LEVELS.get("INFO").unwrap();
    let entries: Vec<Entry> = vec![
        BeginRecord::new(any.clone(), ts(), "app", "a").into(),
        UnknownData::new("junk").into(),
        Message::new(info, ts(), "app", Some("a"), "inside").into(),
        UnknownData::new("junk2").into(),
        EndRecord::new(any, ts(), "app", "a").into(),
    ];

    // Act
    for entry in &entries {
        formatter.entry(entry).unwrap();
    }
    formatter.finish().unwrap();

    // Assert
    let rotated = fs::read_to_string(&backup0).unwrap();
    let current = fs::read_to_string(&path).unwrap();
    assert_eq!(rotated.lines().filter(|l| l.contains(" app a ")).count(), 3);
    assert_eq!(current, "junk2\n");
}
