use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::processor::{EntryProcessor, FinishValue, RecordProcessor};
use crate::record::Record;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueOptions {
    /// Maximum number of queued items. Unbounded when `None`.
    pub limit: Option<usize>,

    /// When full, discard the oldest item instead of rejecting the new one.
    pub drop_oldest: bool,
}

/// A FIFO buffer shared by both queue processors.
#[derive(Debug, Clone)]
struct Bounded<T> {
    items: VecDeque<T>,
    options: QueueOptions,
    closed: bool,
}

impl<T> Bounded<T> {
    fn new(options: QueueOptions) -> Self {
        Self {
            items: VecDeque::new(),
            options,
            closed: false,
        }
    }

    fn push(&mut self, item: T) -> bool {
        if self.closed {
            return false;
        }
        if let Some(limit) = self.options.limit
            && self.items.len() >= limit
        {
            if !self.options.drop_oldest || limit == 0 {
                return false;
            }
            self.items.pop_front();
        }
        self.items.push_back(item);
        true
    }
}

/// Collects entries in arrival order.
#[derive(Debug, Clone)]
pub struct EntryQueue {
    queue: Bounded<Entry>,
}

impl Default for EntryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryQueue {
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            queue: Bounded::new(options),
        }
    }

    pub fn dequeue(&mut self) -> Option<Entry> {
        self.queue.items.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.queue.items.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.queue.closed
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.queue.items.into()
    }
}

impl EntryProcessor for EntryQueue {
    fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
        Ok(self.queue.push(entry.clone().into()))
    }

    fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
        Ok(self.queue.push(entry.clone().into()))
    }

    fn message(&mut self, entry: &Message) -> Result<bool> {
        Ok(self.queue.push(entry.clone().into()))
    }

    fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
        Ok(self.queue.push(entry.clone().into()))
    }

    fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool> {
        Ok(self.queue.push(entry.clone().into()))
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        self.queue.closed = true;
        Ok(None)
    }
}

/// Collects records, and optionally the extra entries seen between them.
#[derive(Debug, Clone)]
pub struct RecordQueue {
    records: Bounded<Record>,
    extra_entries: Option<Bounded<Entry>>,
}

impl Default for RecordQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            records: Bounded::new(options),
            extra_entries: None,
        }
    }

    /// Also keep extra entries, in their own queue with the same bounds.
    pub fn keeping_extra_entries(mut self) -> Self {
        self.extra_entries = Some(Bounded::new(self.records.options));
        self
    }

    pub fn dequeue(&mut self) -> Option<Record> {
        self.records.items.pop_front()
    }

    pub fn dequeue_extra_entry(&mut self) -> Option<Entry> {
        self.extra_entries.as_mut()?.items.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.items.iter()
    }

    pub fn extra_entries(&self) -> impl Iterator<Item = &Entry> {
        self.extra_entries.iter().flat_map(|queue| queue.items.iter())
    }

    pub fn len(&self) -> usize {
        self.records.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.records.closed
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records.items.into()
    }
}

impl RecordProcessor for RecordQueue {
    fn record(&mut self, record: Record) -> Result<bool> {
        Ok(self.records.push(record))
    }

    fn extra_entry(&mut self, entry: &Entry) -> Result<bool> {
        Ok(match &mut self.extra_entries {
            Some(queue) => queue.push(entry.clone()),
            None => false,
        })
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        self.records.closed = true;
        if let Some(queue) = &mut self.extra_entries {
            queue.closed = true;
        }
        Ok(None)
    }
}
