use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::level::Level;
use crate::processor::{EntryProcessor, FinishValue, RecordFilter};
use crate::record::{AttributeValue, Record};
use regex::Regex;

/// The minimum level an entry must reach.
#[derive(Debug, Clone)]
pub enum LevelThreshold {
    /// A level from a specific group. Entries from other groups are incomparable.
    Level(Level),
    /// A level name, resolved against each entry's own group.
    Named(String),
}

impl LevelThreshold {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<Level> for LevelThreshold {
    fn from(level: Level) -> Self {
        Self::Level(level)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasicFieldsFilter {
    pub level: Option<LevelThreshold>,
    pub progname: Option<String>,

    /// Fixed answer for begin/end entries. `None` applies the level and
    /// progname checks to them like any other entry.
    pub accept_record_delimiters: Option<bool>,

    /// Fixed answer for attributes, as above.
    pub accept_attributes: Option<bool>,

    pub accept_unknown: bool,

    /// Accept entries whose level cannot be compared with the threshold.
    pub accept_incomparable_levels: bool,
}

/// Accepts entries by level and progname. Useful as an [`super::If`] condition.
#[derive(Debug, Clone, Default)]
pub struct FilterByBasicFields {
    filter: BasicFieldsFilter,
}

impl FilterByBasicFields {
    pub fn new(filter: BasicFieldsFilter) -> Self {
        Self { filter }
    }

    fn check(&self, level: &Level, progname: &str) -> bool {
        if let Some(threshold) = &self.filter.level {
            let resolved = match threshold {
                LevelThreshold::Level(min) if min.same_group(level) => Some(min.clone()),
                LevelThreshold::Level(_) => None,
                LevelThreshold::Named(name) => level.group().get(name.as_str()),
            };
            match resolved {
                Some(min) if *level < min => return false,
                Some(_) => {}
                None if !self.filter.accept_incomparable_levels => return false,
                None => {}
            }
        }

        self.filter
            .progname
            .as_deref()
            .is_none_or(|expected| expected == progname)
    }
}

impl EntryProcessor for FilterByBasicFields {
    fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
        Ok(self
            .filter
            .accept_record_delimiters
            .unwrap_or_else(|| self.check(entry.level(), entry.progname())))
    }

    fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
        Ok(self
            .filter
            .accept_record_delimiters
            .unwrap_or_else(|| self.check(entry.level(), entry.progname())))
    }

    fn message(&mut self, entry: &Message) -> Result<bool> {
        Ok(self.check(entry.level(), entry.progname()))
    }

    fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
        Ok(self
            .filter
            .accept_attributes
            .unwrap_or_else(|| self.check(entry.level(), entry.progname())))
    }

    fn unknown_data(&mut self, _entry: &UnknownData) -> Result<bool> {
        Ok(self.filter.accept_unknown)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        Ok(None)
    }
}

#[derive(Debug, Clone)]
enum IdMatcher {
    Exact(String),
    Pattern(Regex),
}

/// Accepts records (and extra entries) with a given record id.
#[derive(Debug, Clone)]
pub struct FilterByRecordId {
    matcher: IdMatcher,
}

impl FilterByRecordId {
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            matcher: IdMatcher::Exact(record_id.into()),
        }
    }

    pub fn matching(pattern: Regex) -> Self {
        Self {
            matcher: IdMatcher::Pattern(pattern),
        }
    }

    fn matches(&self, record_id: Option<&str>) -> bool {
        match (&self.matcher, record_id) {
            (IdMatcher::Exact(expected), Some(id)) => expected == id,
            (IdMatcher::Pattern(pattern), Some(id)) => pattern.is_match(id),
            (_, None) => false,
        }
    }
}

impl RecordFilter for FilterByRecordId {
    fn accept_record(&mut self, record: &Record) -> bool {
        self.matches(record.record_id())
    }

    fn accept_extra_entry(&mut self, entry: &Entry) -> bool {
        self.matches(entry.record_id())
    }
}

/// Accepts records whose attributes hold the given values.
///
/// An expected value of `None` requires the attribute to be absent. A
/// multi-valued attribute matches if any of its values does.
#[derive(Debug, Clone, Default)]
pub struct FilterByAttributes {
    expected: Vec<(String, Option<String>)>,
}

impl FilterByAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected.push((key.into(), Some(value.into())));
        self
    }

    pub fn require_absent(mut self, key: impl Into<String>) -> Self {
        self.expected.push((key.into(), None));
        self
    }
}

impl RecordFilter for FilterByAttributes {
    fn accept_record(&mut self, record: &Record) -> bool {
        self.expected
            .iter()
            .all(|(key, expected)| match (record.attribute(key), expected) {
                (Some(AttributeValue::Single(value)), Some(expected)) => value == expected,
                (Some(AttributeValue::Multiple(values)), Some(expected)) => {
                    values.iter().any(|value| value == expected)
                }
                (None, None) => true,
                _ => false,
            })
    }

    fn accept_extra_entry(&mut self, _entry: &Entry) -> bool {
        false
    }
}
