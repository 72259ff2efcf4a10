use crate::entry::{AttributeOp, Entry, EntryKind, Message, Timestamp};
use crate::error::{IllegalRecordError, Result};
use std::collections::{BTreeMap, btree_map};

/// The accumulated value of one record attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AttributeValue {
    /// The single value, or the last appended one.
    pub fn last(&self) -> &str {
        match self {
            AttributeValue::Single(value) => value,
            AttributeValue::Multiple(values) => values.last().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            AttributeValue::Single(value) => vec![value.as_str()],
            AttributeValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn append(&mut self, value: String) {
        match self {
            AttributeValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = AttributeValue::Multiple(vec![first, value]);
            }
            AttributeValue::Multiple(values) => values.push(value),
        }
    }
}

/// An ordered run of entries from one `begin_record` to its `end_record`.
///
/// A record only ever grows through [`Record::add_entry`], which rejects any
/// entry that would break the begin/end protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<Entry>,
    record_id: Option<String>,
    complete: bool,
    message_count: usize,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Result<Self, IllegalRecordError>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut record = Self::new();
        for entry in entries {
            record.add_entry(entry)?;
        }
        Ok(record)
    }

    pub fn add_entry(&mut self, entry: Entry) -> Result<(), IllegalRecordError> {
        self.check(&entry)?;

        if self.record_id.is_none() {
            self.record_id = entry.record_id().map(str::to_string);
        }

        match &entry {
            Entry::EndRecord(_) => self.complete = true,
            Entry::Message(_) => self.message_count += 1,
            Entry::Attribute(attr) => {
                let key = attr.key().to_string();
                let value = attr.value().to_string();
                match attr.operation() {
                    AttributeOp::Set => {
                        self.attributes.insert(key, AttributeValue::Single(value));
                    }
                    AttributeOp::Append => match self.attributes.entry(key) {
                        btree_map::Entry::Occupied(mut slot) => slot.get_mut().append(value),
                        btree_map::Entry::Vacant(slot) => {
                            slot.insert(AttributeValue::Single(value));
                        }
                    },
                }
            }
            _ => {}
        }

        self.entries.push(entry);
        Ok(())
    }

    fn check(&self, entry: &Entry) -> Result<(), IllegalRecordError> {
        let kind = entry.kind();
        if kind == EntryKind::UnknownData {
            return Err(IllegalRecordError::UnknownData);
        }

        if self.entries.is_empty() {
            if kind != EntryKind::BeginRecord {
                return Err(IllegalRecordError::FirstEntryNotBegin { found: kind });
            }
        } else if kind == EntryKind::BeginRecord {
            return Err(IllegalRecordError::ExtraBegin {
                record_id: self.record_id.clone().unwrap_or_default(),
            });
        }

        if self.complete {
            return Err(IllegalRecordError::EntryAfterEnd { found: kind });
        }

        match &self.record_id {
            None if entry.record_id().is_none() => return Err(IllegalRecordError::MissingRecordId),
            Some(expected) if entry.record_id() != Some(expected.as_str()) => {
                return Err(IllegalRecordError::MismatchedRecordId {
                    expected: expected.clone(),
                    found: entry.record_id().map(str::to_string),
                });
            }
            _ => {}
        }

        if let (Some(previous), Some(found)) = (self.end_timestamp(), entry.timestamp())
            && found < previous
        {
            return Err(IllegalRecordError::TimestampRegression { previous, found });
        }

        Ok(())
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn started(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            _ => None,
        })
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Timestamp of the begin entry.
    pub fn begin_timestamp(&self) -> Option<Timestamp> {
        self.entries.first().and_then(Entry::timestamp)
    }

    /// Timestamp of the latest entry, which is the end entry once complete.
    pub fn end_timestamp(&self) -> Option<Timestamp> {
        self.entries.last().and_then(Entry::timestamp)
    }
}
