//! The five kinds of log event.
//!
//! Entries are immutable values. Constructors normalize `progname`,
//! `record_id` and attribute keys by removing all whitespace, so two entries
//! built from differently spaced input compare equal.


use crate::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;

pub type Timestamp = DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    UnknownData,
    Message,
    BeginRecord,
    EndRecord,
    Attribute,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryKind::UnknownData => "unknown_data",
            EntryKind::Message => "message",
            EntryKind::BeginRecord => "begin_record",
            EntryKind::EndRecord => "end_record",
            EntryKind::Attribute => "attribute",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOp {
    Set,
    Append,
}

impl AttributeOp {
    pub fn symbol(self) -> char {
        match self {
            AttributeOp::Set => '=',
            AttributeOp::Append => '+',
        }
    }
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A line that did not match the log format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnknownData {
    line: String,
}

impl UnknownData {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    level: Level,
    timestamp: Timestamp,
    progname: String,
    record_id: Option<String>,
    message: String,
}

impl Message {
    pub fn new(
        level: Level,
        timestamp: Timestamp,
        progname: &str,
        record_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            timestamp,
            progname: strip_whitespace(progname),
            record_id: record_id.map(strip_whitespace),
            message: message.into(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Opens a record. The record id is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeginRecord {
    level: Level,
    timestamp: Timestamp,
    progname: String,
    record_id: String,
}

impl BeginRecord {
    pub fn new(level: Level, timestamp: Timestamp, progname: &str, record_id: &str) -> Self {
        Self {
            level,
            timestamp,
            progname: strip_whitespace(progname),
            record_id: strip_whitespace(record_id),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }
}

/// Closes a record. The record id is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndRecord {
    level: Level,
    timestamp: Timestamp,
    progname: String,
    record_id: String,
}

impl EndRecord {
    pub fn new(level: Level, timestamp: Timestamp, progname: &str, record_id: &str) -> Self {
        Self {
            level,
            timestamp,
            progname: strip_whitespace(progname),
            record_id: strip_whitespace(record_id),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    level: Level,
    timestamp: Timestamp,
    progname: String,
    record_id: Option<String>,
    key: String,
    value: String,
    operation: AttributeOp,
}

impl Attribute {
    pub fn new(
        level: Level,
        timestamp: Timestamp,
        progname: &str,
        record_id: Option<&str>,
        key: &str,
        value: impl Into<String>,
        operation: AttributeOp,
    ) -> Self {
        Self {
            level,
            timestamp,
            progname: strip_whitespace(progname),
            record_id: record_id.map(strip_whitespace),
            key: strip_whitespace(key),
            value: value.into(),
            operation,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn operation(&self) -> AttributeOp {
        self.operation
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entry {
    UnknownData(UnknownData),
    Message(Message),
    BeginRecord(BeginRecord),
    EndRecord(EndRecord),
    Attribute(Attribute),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::UnknownData(_) => EntryKind::UnknownData,
            Entry::Message(_) => EntryKind::Message,
            Entry::BeginRecord(_) => EntryKind::BeginRecord,
            Entry::EndRecord(_) => EntryKind::EndRecord,
            Entry::Attribute(_) => EntryKind::Attribute,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        match self {
            Entry::UnknownData(_) => None,
            Entry::Message(e) => Some(e.level()),
            Entry::BeginRecord(e) => Some(e.level()),
            Entry::EndRecord(e) => Some(e.level()),
            Entry::Attribute(e) => Some(e.level()),
        }
    }

    /// `None` only for unknown data, which carries no ordering information.
    pub fn timestamp(&self) -> Option<Timestamp> {
        match self {
            Entry::UnknownData(_) => None,
            Entry::Message(e) => Some(e.timestamp()),
            Entry::BeginRecord(e) => Some(e.timestamp()),
            Entry::EndRecord(e) => Some(e.timestamp()),
            Entry::Attribute(e) => Some(e.timestamp()),
        }
    }

    pub fn progname(&self) -> Option<&str> {
        match self {
            Entry::UnknownData(_) => None,
            Entry::Message(e) => Some(e.progname()),
            Entry::BeginRecord(e) => Some(e.progname()),
            Entry::EndRecord(e) => Some(e.progname()),
            Entry::Attribute(e) => Some(e.progname()),
        }
    }

    pub fn record_id(&self) -> Option<&str> {
        match self {
            Entry::UnknownData(_) => None,
            Entry::Message(e) => e.record_id(),
            Entry::BeginRecord(e) => Some(e.record_id()),
            Entry::EndRecord(e) => Some(e.record_id()),
            Entry::Attribute(e) => e.record_id(),
        }
    }
}

impl From<UnknownData> for Entry {
    fn from(value: UnknownData) -> Self {
        Entry::UnknownData(value)
    }
}

impl From<Message> for Entry {
    fn from(value: Message) -> Self {
        Entry::Message(value)
    }
}

impl From<BeginRecord> for Entry {
    fn from(value: BeginRecord) -> Self {
        Entry::BeginRecord(value)
    }
}

impl From<EndRecord> for Entry {
    fn from(value: EndRecord) -> Self {
        Entry::EndRecord(value)
    }
}

impl From<Attribute> for Entry {
    fn from(value: Attribute) -> Self {
        Entry::Attribute(value)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::UnknownData(e) => write!(f, "{}: {}", self.kind(), e.line()),
            Entry::Message(e) => write!(f, "{}: {}", self.kind(), e.message()),
            Entry::BeginRecord(e) => write!(f, "{}: {}", self.kind(), e.record_id()),
            Entry::EndRecord(e) => write!(f, "{}: {}", self.kind(), e.record_id()),
            Entry::Attribute(e) => write!(f, "{}: {}={:?}", self.kind(), e.key(), e.value()),
        }
    }
}
