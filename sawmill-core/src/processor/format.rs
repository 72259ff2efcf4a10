use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::format::{EntryFormatter, FormatOptions};
use crate::processor::{EntryProcessor, FinishValue, RecordProcessor};
use crate::record::Record;
use crate::rotate::{Channel, RotationStrategy, Rotater, RotaterOptions, StreamStrategy};
use std::collections::HashMap;
use std::io::{Stdout, Write};

/// Writes entries in the sawmill line format.
///
/// With a rotater, every open record gets its own channel from its begin
/// entry to its end entry, so a record never spans two files. Everything else
/// goes through a standby channel that is offered a rotation after each
/// write; a record's channel becomes the standby once the record ends.
pub struct FormatEntries<S: RotationStrategy = StreamStrategy<Stdout>> {
    rotater: Rotater<S>,
    formatter: EntryFormatter,
    channels: HashMap<String, Channel<S>>,
    standby: Option<Channel<S>>,
    finished: bool,
}

impl<W: Write + Send> FormatEntries<StreamStrategy<W>> {
    /// Formats into a plain writer, without directive lines.
    pub fn to_writer(writer: W, options: FormatOptions) -> Self {
        let rotater = Rotater::with_options(
            StreamStrategy::new(writer),
            RotaterOptions {
                omit_directives: true,
                concurrent_writes: false,
            },
        );
        Self::to_rotater(rotater, options)
    }
}

impl<S: RotationStrategy> FormatEntries<S> {
    pub fn to_rotater(rotater: Rotater<S>, options: FormatOptions) -> Self {
        Self {
            rotater,
            formatter: EntryFormatter::new(options),
            channels: HashMap::new(),
            standby: None,
            finished: false,
        }
    }

    pub fn rotater(&self) -> &Rotater<S> {
        &self.rotater
    }

    fn standby(&mut self) -> Result<&mut Channel<S>> {
        let channel = match self.standby.take() {
            Some(channel) => channel,
            None => self.rotater.create_channel()?,
        };
        Ok(self.standby.insert(channel))
    }

    fn write_standby(&mut self, text: &str) -> Result<()> {
        let channel = self.standby()?;
        channel.write_str(text)?;
        channel.check_rotate()
    }

    fn write_for(&mut self, record_id: Option<&str>, text: &str) -> Result<()> {
        match record_id.and_then(|id| self.channels.get_mut(id)) {
            Some(channel) => channel.write_str(text),
            None => self.write_standby(text),
        }
    }

    fn format(&self, entry: impl Into<Entry>) -> String {
        self.formatter.format(&entry.into())
    }
}

impl<S: RotationStrategy> EntryProcessor for FormatEntries<S> {
    fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let mut channel = match self.standby.take() {
            Some(channel) => channel,
            None => self.rotater.create_channel()?,
        };
        channel.write_str(&self.format(entry.clone()))?;
        if let Some(mut previous) = self
            .channels
            .insert(entry.record_id().to_string(), channel)
        {
            previous.close()?;
        }
        Ok(true)
    }

    fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let text = self.format(entry.clone());
        if let Some(channel) = self.channels.remove(entry.record_id())
            && let Some(mut old) = self.standby.replace(channel)
        {
            old.close()?;
        }
        self.write_standby(&text)?;
        Ok(true)
    }

    fn message(&mut self, entry: &Message) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let text = self.format(entry.clone());
        self.write_for(entry.record_id(), &text)?;
        Ok(true)
    }

    fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let text = self.format(entry.clone());
        self.write_for(entry.record_id(), &text)?;
        Ok(true)
    }

    fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        let text = self.format(entry.clone());
        self.write_standby(&text)?;
        Ok(true)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        if self.finished {
            return Ok(None);
        }
        self.finished = true;
        if let Some(mut standby) = self.standby.take() {
            standby.close()?;
        }
        for (_, mut channel) in self.channels.drain() {
            channel.close()?;
        }
        Ok(None)
    }
}

/// Writes every entry of each record, plus extra entries, in the line format.
pub struct FormatRecords<S: RotationStrategy = StreamStrategy<Stdout>> {
    entries: FormatEntries<S>,
}

impl<W: Write + Send> FormatRecords<StreamStrategy<W>> {
    pub fn to_writer(writer: W, options: FormatOptions) -> Self {
        Self {
            entries: FormatEntries::to_writer(writer, options),
        }
    }
}

impl<S: RotationStrategy> FormatRecords<S> {
    pub fn to_rotater(rotater: Rotater<S>, options: FormatOptions) -> Self {
        Self {
            entries: FormatEntries::to_rotater(rotater, options),
        }
    }

    pub fn rotater(&self) -> &Rotater<S> {
        self.entries.rotater()
    }
}

impl<S: RotationStrategy> RecordProcessor for FormatRecords<S> {
    fn record(&mut self, record: Record) -> Result<bool> {
        for entry in record.entries() {
            self.entries.entry(entry)?;
        }
        Ok(true)
    }

    fn extra_entry(&mut self, entry: &Entry) -> Result<bool> {
        self.entries.entry(entry)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        self.entries.finish()
    }
}
