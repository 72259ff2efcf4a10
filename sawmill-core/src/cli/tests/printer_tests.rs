use crate::cli::Printer;
use crate::entry::{
    Attribute, AttributeOp, BeginRecord, EndRecord, Entry, Message, Timestamp, UnknownData,
};
use crate::format::FormatOptions;
use crate::level::STANDARD_LEVELS;
use crate::logging::LogMode;
use crate::processor::{EntryProcessor, RecordProcessor};
use crate::record::Record;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn ts(sec: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, sec).unwrap()
}

fn message(level: &str, text: &str) -> Message {
    let level = STANDARD_LEVELS.get(level).unwrap();
    Message::new(level, ts(1), "app", None, text)
}

fn output(printer: Printer<Vec<u8>>) -> String {
    String::from_utf8(printer.into_inner()).unwrap()
}

#[test]
fn raw_mode_writes_the_wire_format() {
    let mut printer = Printer::new(Vec::new(), FormatOptions::default(), LogMode::Raw);

    printer.message(&message("WARN", "disk low")).unwrap();
    printer.unknown_data(&UnknownData::new("stray")).unwrap();

    assert_eq!(
        output(printer),
        "[WARN 2024-03-01 10:00:01.00 app .] disk low\nstray\n"
    );
}

#[test]
fn pretty_mode_colors_the_header_only() {
    let mut printer = Printer::new(Vec::new(), FormatOptions::default(), LogMode::Pretty);

    printer.message(&message("ERROR", "boom")).unwrap();

    let text = output(printer);
    assert!(text.starts_with('\u{1b}'));
    assert!(text.contains("[ERROR 2024-03-01 10:00:01.00 app .]"));
    assert!(text.ends_with("\u{1b}[0m boom\n"));
}

#[test]
fn pretty_records_get_a_summary_line() {
    // Arrange
    let info = STANDARD_LEVELS.get("INFO").unwrap();
    let entries: Vec<Entry> = vec![
        BeginRecord::new(info.clone(), ts(0), "app", "r9").into(),
        Attribute::new(info.clone(), ts(1), "app", Some("r9"), "user", "jane", AttributeOp::Set)
            .into(),
        EndRecord::new(info, ts(2), "app", "r9").into(),
    ];
    let record = Record::from_entries(entries).unwrap();
    let mut printer = Printer::new(Vec::new(), FormatOptions::default(), LogMode::Pretty);

    // Act
    printer.record(record).unwrap();

    // Assert
    let text = output(printer);
    let first = text.lines().next().unwrap();
    assert!(first.starts_with("== "));
    assert!(first.contains("r9 (complete, 0 messages) user=jane"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn finished_printer_writes_nothing() {
    let mut printer = Printer::new(Vec::new(), FormatOptions::default(), LogMode::Raw);

    EntryProcessor::finish(&mut printer).unwrap();
    let accepted = printer.message(&message("INFO", "late")).unwrap();

    assert!(!accepted);
    assert_eq!(output(printer), "");
}
