use crate::entry::{Attribute, AttributeOp, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::level::{LevelGroup, STANDARD_LEVELS};
use crate::parse::line::{
    Header, Marker, chomp, parse_attribute, parse_directive, parse_header,
    split_trailing_backslashes, strip_keyword, strip_newline,
};
use crate::processor::EntryProcessor;
use std::collections::HashMap;
use std::io::BufRead;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Level group used to resolve level names. Defaults to the standard levels.
    pub levels: LevelGroup,

    /// At end of stream, ask the processor to flush records that never closed.
    pub emit_incomplete_records_at_eof: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            levels: STANDARD_LEVELS.clone(),
            emit_incomplete_records_at_eof: false,
        }
    }
}

/// Decodes one text stream into entries, one logical line at a time.
///
/// The only state carried between lines is the id of the currently open
/// record, which fills in the record id of message and attribute lines that
/// omit it.
pub struct Parser<R> {
    reader: R,
    options: ParserOptions,
    current_record_id: Option<String>,
    directives: HashMap<String, String>,
    buf: Vec<u8>,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R, options: ParserOptions) -> Self {
        Self {
            reader,
            options,
            current_record_id: None,
            directives: HashMap::new(),
            buf: Vec::new(),
        }
    }

    /// `# sawmill_format:` directives seen so far.
    pub fn directives(&self) -> &HashMap<String, String> {
        &self.directives
    }

    pub fn current_record_id(&self) -> Option<&str> {
        self.current_record_id.as_deref()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn read_physical_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }

    /// Decodes the next entry, or returns `Ok(None)` at end of stream.
    pub fn parse_one_entry(&mut self) -> Result<Option<Entry>> {
        let Some(raw) = self.read_physical_line()? else {
            return Ok(None);
        };

        let levels = self.options.levels.clone();
        match parse_header(strip_newline(&raw), &levels) {
            Some(header) => {
                let payload = self.read_payload(header.payload)?;
                Ok(Some(self.build_entry(&header, payload)))
            }
            None => {
                let line = chomp(&raw);
                if let Some((key, value)) = parse_directive(line) {
                    debug!(key = %key, value = %value, "sawmill_format directive");
                    self.directives.insert(key, value);
                } else {
                    trace!(line = %line, "unrecognized log line");
                }
                Ok(Some(Entry::UnknownData(UnknownData::new(line))))
            }
        }
    }

    /// Reassembles a payload split across physical lines by backslash continuation.
    fn read_payload(&mut self, first: &str) -> Result<String> {
        let (body, mut run) = split_trailing_backslashes(first);
        let mut payload = String::from(body);
        payload.extend(std::iter::repeat_n('\\', run / 2));

        while run % 2 == 1 {
            let Some(next) = self.read_physical_line()? else {
                break;
            };
            let (body, next_run) = split_trailing_backslashes(strip_newline(&next));
            payload.push('\n');
            payload.push_str(body);
            payload.extend(std::iter::repeat_n('\\', next_run / 2));
            run = next_run;
        }

        Ok(payload)
    }

    fn build_entry(&mut self, header: &Header<'_>, payload: String) -> Entry {
        let level = header.level.clone();
        let ts = header.timestamp;
        let progname = header.progname;

        match header.marker {
            Marker::Begin => {
                if let Some(id) = strip_keyword(&payload, "BEGIN")
                    && header.record_id.is_none_or(|h| h == id)
                {
                    let entry = BeginRecord::new(level, ts, progname, id);
                    self.current_record_id = Some(entry.record_id().to_string());
                    return Entry::BeginRecord(entry);
                }
            }
            Marker::End => {
                if let Some(id) = strip_keyword(&payload, "END")
                    && header.record_id.is_none_or(|h| h == id)
                {
                    self.current_record_id = None;
                    return Entry::EndRecord(EndRecord::new(level, ts, progname, id));
                }
            }
            Marker::Attribute => {
                if let Some((key, op, value)) = parse_attribute(&payload) {
                    let operation = if op == '+' {
                        AttributeOp::Append
                    } else {
                        AttributeOp::Set
                    };
                    let record_id = header.record_id.or(self.current_record_id.as_deref());
                    return Entry::Attribute(Attribute::new(
                        level, ts, progname, record_id, key, value, operation,
                    ));
                }
            }
            Marker::Message => {}
        }

        let record_id = header.record_id.or(self.current_record_id.as_deref());
        Entry::Message(Message::new(level, ts, progname, record_id, payload))
    }

    /// Decodes the next entry and hands it to `processor`.
    ///
    /// At end of stream, flushes incomplete records when configured to.
    pub fn parse_one_entry_with<P>(&mut self, processor: &mut P) -> Result<Option<Entry>>
    where
        P: EntryProcessor + ?Sized,
    {
        match self.parse_one_entry()? {
            Some(entry) => {
                processor.entry(&entry)?;
                Ok(Some(entry))
            }
            None => {
                if self.options.emit_incomplete_records_at_eof {
                    processor.emit_incomplete_records()?;
                }
                Ok(None)
            }
        }
    }

    /// Feeds the whole stream into `processor`.
    pub fn parse_all<P>(&mut self, processor: &mut P) -> Result<()>
    where
        P: EntryProcessor + ?Sized,
    {
        while self.parse_one_entry_with(processor)?.is_some() {}
        Ok(())
    }
}

impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_one_entry().transpose()
    }
}
