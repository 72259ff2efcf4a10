use crate::entry::{Entry, Timestamp};
use crate::error::Result;
use crate::parse::{Parser, ParserOptions};
use crate::processor::EntryProcessor;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::io::BufRead;
use tracing::trace;

/// A timestamped entry waiting in the heap for its turn.
struct InFlight {
    timestamp: Timestamp,
    source: usize,
    entry: Entry,
}

impl InFlight {
    fn key(&self) -> (Timestamp, usize) {
        (self.timestamp, self.source)
    }
}

impl PartialEq for InFlight {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for InFlight {}

impl PartialOrd for InFlight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InFlight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Merges several parsers into one timestamp-ordered stream.
///
/// Each source has at most one entry in the heap. Unknown data has no
/// timestamp, so it bypasses the heap and is queued as soon as its source is
/// advanced; queued lines are always returned before the heap is consulted.
/// Entries with equal timestamps come out in source order.
pub struct MultiParser<R> {
    sources: Vec<Parser<R>>,
    heap: BinaryHeap<Reverse<InFlight>>,
    unknown: VecDeque<Entry>,
    emit_incomplete_records_at_eof: bool,
    primed: bool,
}

impl<R: BufRead> MultiParser<R> {
    pub fn new(readers: Vec<R>, options: ParserOptions) -> Self {
        let emit_incomplete_records_at_eof = options.emit_incomplete_records_at_eof;
        let sources = readers
            .into_iter()
            .map(|reader| Parser::new(reader, options.clone()))
            .collect();

        Self {
            sources,
            heap: BinaryHeap::new(),
            unknown: VecDeque::new(),
            emit_incomplete_records_at_eof,
            primed: false,
        }
    }

    pub fn sources(&self) -> &[Parser<R>] {
        &self.sources
    }

    /// Advances one source until it yields a timestamped entry or runs out.
    fn refill(&mut self, source: usize) -> Result<()> {
        while let Some(entry) = self.sources[source].parse_one_entry()? {
            match entry.timestamp() {
                Some(timestamp) => {
                    self.heap.push(Reverse(InFlight {
                        timestamp,
                        source,
                        entry,
                    }));
                    return Ok(());
                }
                None => self.unknown.push_back(entry),
            }
        }
        trace!(source, "source exhausted");
        Ok(())
    }

    fn prime(&mut self) -> Result<()> {
        if !self.primed {
            self.primed = true;
            for source in 0..self.sources.len() {
                self.refill(source)?;
            }
        }
        Ok(())
    }

    /// Returns the next entry in merged order, or `Ok(None)` once every source
    /// is exhausted.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        self.prime()?;

        if let Some(entry) = self.unknown.pop_front() {
            return Ok(Some(entry));
        }

        match self.heap.pop() {
            Some(Reverse(in_flight)) => {
                self.refill(in_flight.source)?;
                Ok(Some(in_flight.entry))
            }
            None => Ok(None),
        }
    }

    /// Like [`MultiParser::next_entry`], delivering the entry to `processor`.
    pub fn next_entry_with<P>(&mut self, processor: &mut P) -> Result<Option<Entry>>
    where
        P: EntryProcessor + ?Sized,
    {
        match self.next_entry()? {
            Some(entry) => {
                processor.entry(&entry)?;
                Ok(Some(entry))
            }
            None => {
                if self.emit_incomplete_records_at_eof {
                    processor.emit_incomplete_records()?;
                }
                Ok(None)
            }
        }
    }

    pub fn drain_all<P>(&mut self, processor: &mut P) -> Result<()>
    where
        P: EntryProcessor + ?Sized,
    {
        while self.next_entry_with(processor)?.is_some() {}
        Ok(())
    }
}

impl<R: BufRead> Iterator for MultiParser<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
