use crate::entry::{Entry, EntryKind};
use crate::error::SawmillError;
use crate::parse::{Parser, ParserOptions};
use crate::processor::{EntryProcessor, FinishValue, RecordQueue};
use crate::record::{RecordBuilder, RecordBuilderOptions};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn entries(text: &str) -> Vec<Entry> {
    Parser::new(Cursor::new(text.to_string()), ParserOptions::default())
        .collect::<Result<_, _>>()
        .unwrap()
}

fn feed<P: EntryProcessor>(processor: &mut P, text: &str) -> Vec<bool> {
    entries(text)
        .iter()
        .map(|entry| processor.entry(entry).unwrap())
        .collect()
}

#[test]
fn completed_records_are_handed_over_by_value() {
    // Arrange
    let mut builder = RecordBuilder::new(RecordQueue::new());

    // Act
    let accepted = feed(
        &mut builder,
        "\
[ANY 2009-10-20 08:30:45 rails ^] BEGIN a
[ANY 2009-10-20 08:30:45 rails ^] BEGIN b
[INFO 2009-10-20 08:30:46 rails a .] for a
[ANY 2009-10-20 08:30:47 rails $] END a
",
    );

    // Assert
    assert_eq!(accepted, vec![true, true, true, true]);
    let queue = builder.processor();
    assert_eq!(queue.len(), 1);
    let record = queue.iter().next().unwrap();
    assert_eq!(record.record_id(), Some("a"));
    assert_eq!(record.entry_count(), 3);
    assert_eq!(builder.open_record_ids().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn orphans_and_unknown_data_go_to_extra_entries() {
    let mut builder = RecordBuilder::new(RecordQueue::new().keeping_extra_entries());

    let accepted = feed(
        &mut builder,
        "\
junk
[INFO 2009-10-20 08:30:45 rails .] no record
[ANY 2009-10-20 08:30:45 rails $] END nobody
[ANY 2009-10-20 08:30:45 rails ^] BEGIN a
[ANY 2009-10-20 08:30:45 rails ^] BEGIN a
",
    );

    assert_eq!(accepted, vec![false, false, false, true, false]);
    let kinds: Vec<_> = builder
        .processor()
        .extra_entries()
        .map(Entry::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::UnknownData,
            EntryKind::Message,
            EntryKind::EndRecord,
            EntryKind::BeginRecord,
        ]
    );
}

#[test]
fn illegal_additions_surface_as_errors() {
    let mut builder = RecordBuilder::new(RecordQueue::new());
    let lines = entries(
        "[ANY 2009-10-20 08:30:45 rails ^] BEGIN a\n[INFO 2009-10-20 08:30:44 rails a .] backwards\n",
    );
    builder.entry(&lines[0]).unwrap();

    let err = builder.entry(&lines[1]).unwrap_err();

    assert!(matches!(err, SawmillError::IllegalRecord(_)));
}

#[test]
fn finish_can_flush_incomplete_records_in_begin_order() {
    // Arrange
    let mut builder = RecordBuilder::with_options(
        RecordQueue::new(),
        RecordBuilderOptions {
            emit_incomplete_records_on_finish: true,
        },
    );
    feed(
        &mut builder,
        "\
[ANY 2009-10-20 08:30:47 rails ^] BEGIN late
[ANY 2009-10-20 08:30:45 rails ^] BEGIN zed
[ANY 2009-10-20 08:30:45 rails ^] BEGIN early
",
    );

    // Act
    let value = builder.finish().unwrap();

    // Assert
    assert_eq!(value, None);
    let ids: Vec<_> = builder
        .processor()
        .iter()
        .map(|r| r.record_id().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["early", "zed", "late"]);
    assert!(builder.processor().iter().all(|r| !r.complete()));
    assert!(builder.processor().is_closed());
}

#[test]
fn flushed_records_are_not_emitted_again() {
    let mut builder = RecordBuilder::new(RecordQueue::new());
    feed(&mut builder, "[ANY 2009-10-20 08:30:45 rails ^] BEGIN a\n");

    builder.emit_incomplete_records().unwrap();
    let accepted = feed(&mut builder, "[ANY 2009-10-20 08:30:46 rails $] END a\n");

    assert_eq!(accepted, vec![false]);
    assert_eq!(builder.processor().len(), 1);
}

#[test]
fn input_after_finish_is_ignored() {
    let mut builder = RecordBuilder::new(crate::processor::CountRecords::new());
    feed(
        &mut builder,
        "[ANY 2009-10-20 08:30:45 rails ^] BEGIN a\n[ANY 2009-10-20 08:30:46 rails $] END a\n",
    );

    assert_eq!(builder.finish().unwrap(), Some(FinishValue::Count(1)));
    let accepted = feed(&mut builder, "[ANY 2009-10-20 08:30:47 rails ^] BEGIN b\n");
    assert_eq!(accepted, vec![false]);
    assert_eq!(builder.finish().unwrap(), None);
}
