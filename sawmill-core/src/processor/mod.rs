//! Entry and record consumers.
//!
//! Parsers push entries into an [`EntryProcessor`]; a
//! [`crate::record::RecordBuilder`] turns entries into records and pushes
//! them into a [`RecordProcessor`]. Every callback returns whether the input
//! was accepted, which lets processors double as predicates inside the
//! conditionals in [`conditionals`].
//!
//! Processors are composed with plain constructors:
//!
//! ```ignore
//! let errors_only = FilterByBasicFields::new(BasicFieldsFilter {
//!     level: Some(LevelThreshold::named("ERROR")),
//!     ..Default::default()
//! });
//! let mut pipeline = If::new(errors_only, EntryQueue::new(), None);
//! ```

pub mod conditionals;
pub mod count;
pub mod filter;
pub mod format;
pub mod queue;

#[cfg(test)]
mod tests;

pub use conditionals::{All, And, Any, If, Not, Or, RecordIf};
pub use count::{CountEntries, CountEntriesOptions, CountRecords};
pub use filter::{
    BasicFieldsFilter, FilterByAttributes, FilterByBasicFields, FilterByRecordId, LevelThreshold,
};
pub use format::{FormatEntries, FormatRecords};
pub use queue::{EntryQueue, QueueOptions, RecordQueue};

use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::record::Record;

/// The value a processor produces when the stream is finished.
///
/// A processor with nothing to report returns `None` from `finish`; a
/// composite returns the flattened [`FinishValue::List`] of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishValue {
    Count(u64),
    Text(String),
    List(Vec<FinishValue>),
}

/// Aggregates the finish values of several children.
///
/// `None` when no child produced a value; otherwise a list, with list values
/// spliced in rather than nested.
pub fn collect_finish_values<I>(values: I) -> Option<FinishValue>
where
    I: IntoIterator<Item = Option<FinishValue>>,
{
    let mut out = Vec::new();
    for value in values.into_iter().flatten() {
        match value {
            FinishValue::List(list) => out.extend(list),
            value => out.push(value),
        }
    }
    (!out.is_empty()).then_some(FinishValue::List(out))
}

/// Consumes a stream of entries.
pub trait EntryProcessor {
    fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool>;

    fn end_record(&mut self, entry: &EndRecord) -> Result<bool>;

    fn message(&mut self, entry: &Message) -> Result<bool>;

    fn attribute(&mut self, entry: &Attribute) -> Result<bool>;

    fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool>;

    /// Ends the stream. Once called, further input is ignored.
    fn finish(&mut self) -> Result<Option<FinishValue>>;

    /// Flushes records that were opened but never closed. Only record-building
    /// processors do anything here.
    fn emit_incomplete_records(&mut self) -> Result<()> {
        Ok(())
    }

    /// Routes an entry to the callback for its kind.
    fn entry(&mut self, entry: &Entry) -> Result<bool> {
        match entry {
            Entry::UnknownData(e) => self.unknown_data(e),
            Entry::Message(e) => self.message(e),
            Entry::BeginRecord(e) => self.begin_record(e),
            Entry::EndRecord(e) => self.end_record(e),
            Entry::Attribute(e) => self.attribute(e),
        }
    }
}

/// Consumes completed (or flushed incomplete) records, plus entries that did
/// not belong to any open record.
pub trait RecordProcessor {
    fn record(&mut self, record: Record) -> Result<bool>;

    fn extra_entry(&mut self, entry: &Entry) -> Result<bool>;

    fn finish(&mut self) -> Result<Option<FinishValue>>;
}

/// A yes/no test over records, used to route them in [`RecordIf`].
pub trait RecordFilter {
    fn accept_record(&mut self, record: &Record) -> bool;

    fn accept_extra_entry(&mut self, entry: &Entry) -> bool;
}

macro_rules! forward_entry_processor {
    ($($ty:ty),*) => {$(
        impl<P: EntryProcessor + ?Sized> EntryProcessor for $ty {
            fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
                (**self).begin_record(entry)
            }
            fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
                (**self).end_record(entry)
            }
            fn message(&mut self, entry: &Message) -> Result<bool> {
                (**self).message(entry)
            }
            fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
                (**self).attribute(entry)
            }
            fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool> {
                (**self).unknown_data(entry)
            }
            fn finish(&mut self) -> Result<Option<FinishValue>> {
                (**self).finish()
            }
            fn emit_incomplete_records(&mut self) -> Result<()> {
                (**self).emit_incomplete_records()
            }
        }
    )*};
}

forward_entry_processor!(Box<P>, &mut P);

impl<P: RecordProcessor + ?Sized> RecordProcessor for Box<P> {
    fn record(&mut self, record: Record) -> Result<bool> {
        (**self).record(record)
    }

    fn extra_entry(&mut self, entry: &Entry) -> Result<bool> {
        (**self).extra_entry(entry)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        (**self).finish()
    }
}

impl<P: RecordProcessor + ?Sized> RecordProcessor for &mut P {
    fn record(&mut self, record: Record) -> Result<bool> {
        (**self).record(record)
    }

    fn extra_entry(&mut self, entry: &Entry) -> Result<bool> {
        (**self).extra_entry(entry)
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        (**self).finish()
    }
}

impl<F: RecordFilter + ?Sized> RecordFilter for Box<F> {
    fn accept_record(&mut self, record: &Record) -> bool {
        (**self).accept_record(record)
    }

    fn accept_extra_entry(&mut self, entry: &Entry) -> bool {
        (**self).accept_extra_entry(entry)
    }
}
