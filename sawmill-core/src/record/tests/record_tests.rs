use crate::entry::{Entry, EntryKind, UnknownData};
use crate::error::IllegalRecordError;
use crate::parse::{Parser, ParserOptions};
use crate::record::{AttributeValue, Record};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn entries(text: &str) -> Vec<Entry> {
    Parser::new(Cursor::new(text.to_string()), ParserOptions::default())
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn begin_and_end_make_a_complete_record() {
    let record = Record::from_entries(entries(
        "[ANY 2009-10-20 08:30:45.12 rails ^] BEGIN abcdefg\n[ANY 2009-10-20 08:30:46.98 rails $] END abcdefg\n",
    ))
    .unwrap();

    assert!(record.started());
    assert!(record.complete());
    assert_eq!(record.record_id(), Some("abcdefg"));
    assert_eq!(record.entry_count(), 2);
    assert_eq!(record.message_count(), 0);
}

#[test]
fn attributes_follow_set_and_append_rules() {
    let record = Record::from_entries(entries(
        "\
[ANY 2009-10-20 08:30:45 rails ^] BEGIN r1
[INFO 2009-10-20 08:30:45 rails =] user = jane
[INFO 2009-10-20 08:30:45 rails =] user = john
[INFO 2009-10-20 08:30:45 rails =] tag + a
[INFO 2009-10-20 08:30:45 rails =] tag + b
[INFO 2009-10-20 08:30:45 rails =] tag + c
[INFO 2009-10-20 08:30:46 rails .] hello
[ANY 2009-10-20 08:30:46 rails $] END r1
",
    ))
    .unwrap();

    assert_eq!(
        record.attribute("user"),
        Some(&AttributeValue::Single("john".to_string()))
    );
    assert_eq!(
        record.attribute("tag"),
        Some(&AttributeValue::Multiple(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string()
        ]))
    );
    assert_eq!(record.attribute_keys().collect::<Vec<_>>(), vec!["tag", "user"]);
    assert_eq!(record.message_count(), 1);
    assert_eq!(record.messages().next().map(|m| m.message()), Some("hello"));
}

#[test]
fn set_after_append_collapses_to_a_single_value() {
    let record = Record::from_entries(entries(
        "\
[ANY 2009-10-20 08:30:45 rails ^] BEGIN r1
[INFO 2009-10-20 08:30:45 rails =] tag + a
[INFO 2009-10-20 08:30:45 rails =] tag + b
[INFO 2009-10-20 08:30:45 rails =] tag = z
",
    ))
    .unwrap();

    assert_eq!(record.attribute("tag").map(AttributeValue::last), Some("z"));
    assert!(!record.complete());
}

#[test]
fn first_entry_must_be_a_begin() {
    let mut record = Record::new();
    let message = entries("[INFO 2009-10-20 08:30:45 rails r1 .] hi\n").remove(0);

    let err = record.add_entry(message).unwrap_err();

    assert_eq!(
        err,
        IllegalRecordError::FirstEntryNotBegin {
            found: EntryKind::Message
        }
    );
    assert!(!record.started());
}

#[test]
fn protocol_violations_are_rejected() {
    let mut lines = entries(
        "\
[ANY 2009-10-20 08:30:45 rails ^] BEGIN r1
[ANY 2009-10-20 08:30:45 rails ^] BEGIN r1
[INFO 2009-10-20 08:30:45 rails r2 .] other record
[INFO 2009-10-20 08:30:44 rails r1 .] too early
[ANY 2009-10-20 08:30:46 rails $] END r1
[INFO 2009-10-20 08:30:47 rails r1 .] too late
",
    )
    .into_iter();
    let mut record = Record::new();
    record.add_entry(lines.next().unwrap()).unwrap();

    let extra_begin = record.add_entry(lines.next().unwrap()).unwrap_err();
    let mismatched = record.add_entry(lines.next().unwrap()).unwrap_err();
    let regression = record.add_entry(lines.next().unwrap()).unwrap_err();
    record.add_entry(lines.next().unwrap()).unwrap();
    let after_end = record.add_entry(lines.next().unwrap()).unwrap_err();
    let unknown = record
        .add_entry(Entry::UnknownData(UnknownData::new("junk")))
        .unwrap_err();

    assert_eq!(
        extra_begin,
        IllegalRecordError::ExtraBegin {
            record_id: "r1".to_string()
        }
    );
    assert!(matches!(
        mismatched,
        IllegalRecordError::MismatchedRecordId { ref expected, found: Some(ref found) }
            if expected == "r1" && found == "r2"
    ));
    assert!(matches!(
        regression,
        IllegalRecordError::TimestampRegression { .. }
    ));
    assert_eq!(
        after_end,
        IllegalRecordError::EntryAfterEnd {
            found: EntryKind::Message
        }
    );
    assert_eq!(unknown, IllegalRecordError::UnknownData);
    assert_eq!(record.entry_count(), 2);
}
