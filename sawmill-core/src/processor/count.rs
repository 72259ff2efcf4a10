use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::processor::{EntryProcessor, FinishValue, RecordProcessor};
use crate::record::Record;

fn counted(label: Option<&str>, count: u64) -> FinishValue {
    match label {
        Some(label) => FinishValue::Text(format!("{label}{count}")),
        None => FinishValue::Count(count),
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountEntriesOptions {
    /// Report `"<label><count>"` instead of the bare count.
    pub label: Option<String>,
    pub omit_unknown_data: bool,
    pub omit_attributes: bool,
    pub omit_record_delimiters: bool,
}

/// Counts entries, accepting all of them.
#[derive(Debug, Clone, Default)]
pub struct CountEntries {
    options: CountEntriesOptions,
    count: u64,
    finished: bool,
}

impl CountEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CountEntriesOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    fn bump(&mut self, omit: bool) -> Result<bool> {
        if !self.finished && !omit {
            self.count += 1;
        }
        Ok(true)
    }
}

impl EntryProcessor for CountEntries {
    fn begin_record(&mut self, _entry: &BeginRecord) -> Result<bool> {
        self.bump(self.options.omit_record_delimiters)
    }

    fn end_record(&mut self, _entry: &EndRecord) -> Result<bool> {
        self.bump(self.options.omit_record_delimiters)
    }

    fn message(&mut self, _entry: &Message) -> Result<bool> {
        self.bump(false)
    }

    fn attribute(&mut self, _entry: &Attribute) -> Result<bool> {
        self.bump(self.options.omit_attributes)
    }

    fn unknown_data(&mut self, _entry: &UnknownData) -> Result<bool> {
        self.bump(self.options.omit_unknown_data)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        self.finished = true;
        Ok(Some(counted(self.options.label.as_deref(), self.count)))
    }
}

/// Counts records. Extra entries are accepted but not counted.
#[derive(Debug, Clone, Default)]
pub struct CountRecords {
    label: Option<String>,
    count: u64,
    finished: bool,
}

impl CountRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl RecordProcessor for CountRecords {
    fn record(&mut self, _record: Record) -> Result<bool> {
        if !self.finished {
            self.count += 1;
        }
        Ok(true)
    }

    fn extra_entry(&mut self, _entry: &Entry) -> Result<bool> {
        Ok(true)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        self.finished = true;
        Ok(Some(counted(self.label.as_deref(), self.count)))
    }
}
