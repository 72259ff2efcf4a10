use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::format::{EntryFormatter, FormatOptions};
use crate::logging::LogMode;
use crate::processor::{EntryProcessor, FinishValue, RecordProcessor};
use crate::record::{AttributeValue, Record};
use owo_colors::OwoColorize;
use std::io::Write;

/// Prints entries and records to a terminal or pipe.
///
/// Raw mode writes the wire format unchanged. Pretty mode colors each header
/// by level and sets records off with a summary line.
pub struct Printer<W: Write> {
    writer: W,
    formatter: EntryFormatter,
    mode: LogMode,
    finished: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(writer: W, options: FormatOptions, mode: LogMode) -> Self {
        Self {
            writer,
            formatter: EntryFormatter::new(options),
            mode,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn print(&mut self, entry: &Entry) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }

        let line = self.formatter.format(entry);
        match self.mode {
            LogMode::Raw => self.writer.write_all(line.as_bytes())?,
            LogMode::Pretty => {
                let colored = paint(entry, &line);
                self.writer.write_all(colored.as_bytes())?;
            }
        }
        Ok(true)
    }

    fn print_record_header(&mut self, record: &Record) -> Result<()> {
        let id = record.record_id().unwrap_or("?");
        let state = if record.complete() {
            "complete"
        } else {
            "incomplete"
        };

        let mut summary = format!("{id} ({state}, {} messages)", record.message_count());
        for key in record.attribute_keys() {
            match record.attribute(key) {
                Some(AttributeValue::Single(value)) => {
                    summary.push_str(&format!(" {key}={value}"));
                }
                Some(AttributeValue::Multiple(values)) => {
                    summary.push_str(&format!(" {key}=[{}]", values.join(", ")));
                }
                None => {}
            }
        }

        writeln!(self.writer, "== {}", summary.bold())?;
        Ok(())
    }
}

/// Colors the bracketed header of a formatted line, leaving the payload alone.
fn paint(entry: &Entry, line: &str) -> String {
    let Some(split) = line.find("] ") else {
        return line.dimmed().to_string();
    };
    let (header, rest) = line.split_at(split + 1);

    let header = match entry {
        Entry::UnknownData(_) => return line.dimmed().to_string(),
        Entry::BeginRecord(_) | Entry::EndRecord(_) => header.cyan().to_string(),
        Entry::Attribute(_) => header.magenta().to_string(),
        Entry::Message(m) => match m.level().name() {
            "FATAL" | "ERROR" => header.red().bold().to_string(),
            "WARN" => header.yellow().to_string(),
            "INFO" => header.green().to_string(),
            "DEBUG" => header.blue().to_string(),
            _ => header.dimmed().to_string(),
        },
    };

    format!("{header}{rest}")
}

impl<W: Write> EntryProcessor for Printer<W> {
    fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
        self.print(&entry.clone().into())
    }

    fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
        self.print(&entry.clone().into())
    }

    fn message(&mut self, entry: &Message) -> Result<bool> {
        self.print(&entry.clone().into())
    }

    fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
        self.print(&entry.clone().into())
    }

    fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool> {
        self.print(&entry.clone().into())
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        if !self.finished {
            self.finished = true;
            self.writer.flush()?;
        }
        Ok(None)
    }
}

impl<W: Write> RecordProcessor for Printer<W> {
    fn record(&mut self, record: Record) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        if self.mode == LogMode::Pretty {
            self.print_record_header(&record)?;
        }
        for entry in record.entries() {
            self.print(entry)?;
        }
        Ok(true)
    }

    fn extra_entry(&mut self, _entry: &Entry) -> Result<bool> {
        Ok(false)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        EntryProcessor::finish(self)
    }
}
