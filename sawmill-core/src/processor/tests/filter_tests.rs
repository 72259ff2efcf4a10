use crate::entry::{Entry, UnknownData};
use crate::level::{LevelGroup, STANDARD_LEVELS};
use crate::parse::{Parser, ParserOptions};
use crate::processor::{
    BasicFieldsFilter, EntryProcessor, FilterByAttributes, FilterByBasicFields, FilterByRecordId,
    LevelThreshold, RecordFilter,
};
use crate::record::Record;
use regex::Regex;
use std::io::Cursor;

fn entries(text: &str) -> Vec<Entry> {
    Parser::new(Cursor::new(text.to_string()), ParserOptions::default())
        .collect::<Result<_, _>>()
        .unwrap()
}

fn accepts(filter: &mut FilterByBasicFields, text: &str) -> Vec<bool> {
    entries(text)
        .iter()
        .map(|entry| filter.entry(entry).unwrap())
        .collect()
}

#[test]
fn level_threshold_by_name() {
    let mut filter = FilterByBasicFields::new(BasicFieldsFilter {
        level: Some(LevelThreshold::named("WARN")),
        ..BasicFieldsFilter::default()
    });

    let result = accepts(
        &mut filter,
        "\
[INFO 2009-10-20 08:30:45 rails .] quiet
[WARN 2009-10-20 08:30:45 rails .] loud
[FATAL 2009-10-20 08:30:45 rails .] louder
",
    );

    assert_eq!(result, vec![false, true, true]);
}

#[test]
fn progname_and_fixed_answers() {
    let mut filter = FilterByBasicFields::new(BasicFieldsFilter {
        progname: Some("rails".to_string()),
        accept_record_delimiters: Some(true),
        accept_attributes: Some(false),
        accept_unknown: true,
        ..BasicFieldsFilter::default()
    });

    let result = accepts(
        &mut filter,
        "\
[INFO 2009-10-20 08:30:45 rails .] ok
[INFO 2009-10-20 08:30:45 sidekiq .] wrong program
[ANY 2009-10-20 08:30:45 sidekiq ^] BEGIN a
[INFO 2009-10-20 08:30:45 rails =] k = v
junk
",
    );

    assert_eq!(result, vec![true, false, true, false, true]);
}

#[test]
fn incomparable_levels_are_rejected_unless_allowed() {
    let other = LevelGroup::builder()
        .add("LOW", &[])
        .add("HIGH", &[])
        .build()
        .unwrap();
    let threshold = LevelThreshold::from(other.get("LOW").unwrap());
    let mut strict = FilterByBasicFields::new(BasicFieldsFilter {
        level: Some(threshold.clone()),
        ..BasicFieldsFilter::default()
    });
    let mut lenient = FilterByBasicFields::new(BasicFieldsFilter {
        level: Some(threshold),
        accept_incomparable_levels: true,
        ..BasicFieldsFilter::default()
    });
    let line = "[FATAL 2009-10-20 08:30:45 rails .] standard level\n";

    assert_eq!(accepts(&mut strict, line), vec![false]);
    assert_eq!(accepts(&mut lenient, line), vec![true]);
    assert!(STANDARD_LEVELS.get("FATAL").is_some());
}

fn record(text: &str) -> Record {
    Record::from_entries(entries(text)).unwrap()
}

#[test]
fn record_id_filters_match_exactly_or_by_pattern() {
    let r = record("[ANY 2009-10-20 08:30:45 rails ^] BEGIN req-42\n");
    let orphan = Entry::UnknownData(UnknownData::new("junk"));

    assert!(FilterByRecordId::new("req-42").accept_record(&r));
    assert!(!FilterByRecordId::new("req-4").accept_record(&r));
    assert!(FilterByRecordId::matching(Regex::new(r"^req-\d+$").unwrap()).accept_record(&r));
    assert!(!FilterByRecordId::new("req-42").accept_extra_entry(&orphan));
}

#[test]
fn attribute_filter_checks_single_multiple_and_absent_values() {
    let r = record(
        "\
[ANY 2009-10-20 08:30:45 rails ^] BEGIN a
[INFO 2009-10-20 08:30:45 rails =] user = jane
[INFO 2009-10-20 08:30:45 rails =] tag + x
[INFO 2009-10-20 08:30:45 rails =] tag + y
",
    );

    assert!(
        FilterByAttributes::new()
            .require("user", "jane")
            .require("tag", "y")
            .require_absent("missing")
            .accept_record(&r)
    );
    assert!(!FilterByAttributes::new().require("user", "john").accept_record(&r));
    assert!(!FilterByAttributes::new().require_absent("user").accept_record(&r));
}
