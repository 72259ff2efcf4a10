use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::processor::{EntryProcessor, FinishValue, RecordProcessor};
use crate::record::Record;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RecordBuilderOptions {
    /// Hand still-open records to the record processor when finishing.
    pub emit_incomplete_records_on_finish: bool,
}

/// Assembles records from an entry stream.
///
/// Entries that cannot belong to an open record (unknown data, orphans, a
/// second begin for an open id) are passed to
/// [`RecordProcessor::extra_entry`] and reported as not accepted.
pub struct RecordBuilder<P> {
    processor: P,
    options: RecordBuilderOptions,
    open: HashMap<String, Record>,
    finished: bool,
}

impl<P: RecordProcessor> RecordBuilder<P> {
    pub fn new(processor: P) -> Self {
        Self::with_options(processor, RecordBuilderOptions::default())
    }

    pub fn with_options(processor: P, options: RecordBuilderOptions) -> Self {
        Self {
            processor,
            options,
            open: HashMap::new(),
            finished: false,
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    pub fn into_processor(self) -> P {
        self.processor
    }

    pub fn open_record_ids(&self) -> impl Iterator<Item = &str> {
        self.open.keys().map(String::as_str)
    }

    fn extra(&mut self, entry: Entry) -> Result<bool> {
        self.processor.extra_entry(&entry)?;
        Ok(false)
    }

    /// Appends to the open record for the entry's id, or treats it as extra.
    fn append(&mut self, entry: Entry) -> Result<bool> {
        match entry.record_id().and_then(|id| self.open.get_mut(id)) {
            Some(record) => {
                record.add_entry(entry)?;
                Ok(true)
            }
            None => self.extra(entry),
        }
    }
}

impl<P: RecordProcessor> EntryProcessor for RecordBuilder<P> {
    fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        if self.open.contains_key(entry.record_id()) {
            return self.extra(entry.clone().into());
        }

        let mut record = Record::new();
        record.add_entry(entry.clone().into())?;
        self.open.insert(entry.record_id().to_string(), record);
        Ok(true)
    }

    fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let Some(mut record) = self.open.remove(entry.record_id()) else {
            return self.extra(entry.clone().into());
        };

        if let Err(err) = record.add_entry(entry.clone().into()) {
            self.open.insert(entry.record_id().to_string(), record);
            return Err(err.into());
        }
        self.processor.record(record)?;
        Ok(true)
    }

    fn message(&mut self, entry: &Message) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        self.append(entry.clone().into())
    }

    fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        self.append(entry.clone().into())
    }

    fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        self.extra(entry.clone().into())
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        if self.finished {
            return Ok(None);
        }
        self.finished = true;
        if self.options.emit_incomplete_records_on_finish {
            self.emit_incomplete_records()?;
        }
        self.processor.finish()
    }

    /// Flushes open records oldest first; ties are broken by record id.
    fn emit_incomplete_records(&mut self) -> Result<()> {
        let mut pending: Vec<Record> = self.open.drain().map(|(_, record)| record).collect();
        if pending.is_empty() {
            return Ok(());
        }
        debug!(count = pending.len(), "emitting incomplete records");

        pending.sort_by(|a, b| {
            (a.begin_timestamp(), a.record_id()).cmp(&(b.begin_timestamp(), b.record_id()))
        });
        for record in pending {
            self.processor.record(record)?;
        }
        Ok(())
    }
}
