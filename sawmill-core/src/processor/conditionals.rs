//! Boolean composition of processors.
//!
//! Every entry processor already answers "accepted or not" for each entry, so
//! any processor can serve as a condition. [`And`] and [`Or`] stop at the
//! first decisive child; [`All`] and [`Any`] always feed every child.

use crate::entry::{Attribute, BeginRecord, EndRecord, Entry, Message, UnknownData};
use crate::error::Result;
use crate::processor::{
    EntryProcessor, FinishValue, RecordFilter, RecordProcessor, collect_finish_values,
};
use crate::record::Record;

type BoxedEntryProcessor<'a> = Box<dyn EntryProcessor + 'a>;

macro_rules! routed_callbacks {
    () => {
        fn begin_record(&mut self, entry: &BeginRecord) -> Result<bool> {
            self.route(|p| p.begin_record(entry))
        }

        fn end_record(&mut self, entry: &EndRecord) -> Result<bool> {
            self.route(|p| p.end_record(entry))
        }

        fn message(&mut self, entry: &Message) -> Result<bool> {
            self.route(|p| p.message(entry))
        }

        fn attribute(&mut self, entry: &Attribute) -> Result<bool> {
            self.route(|p| p.attribute(entry))
        }

        fn unknown_data(&mut self, entry: &UnknownData) -> Result<bool> {
            self.route(|p| p.unknown_data(entry))
        }
    };
}

fn finish_all(children: &mut [BoxedEntryProcessor<'_>]) -> Result<Option<FinishValue>> {
    let mut values = Vec::with_capacity(children.len());
    for child in children {
        values.push(child.finish()?);
    }
    Ok(collect_finish_values(values))
}

/// Sends each entry to `on_true` when `condition` accepts it, otherwise to
/// `on_false` (if any).
pub struct If<'a> {
    condition: BoxedEntryProcessor<'a>,
    on_true: BoxedEntryProcessor<'a>,
    on_false: Option<BoxedEntryProcessor<'a>>,
}

impl<'a> If<'a> {
    pub fn new(
        condition: impl EntryProcessor + 'a,
        on_true: impl EntryProcessor + 'a,
        on_false: Option<BoxedEntryProcessor<'a>>,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            on_true: Box::new(on_true),
            on_false,
        }
    }

    fn route<F>(&mut self, mut call: F) -> Result<bool>
    where
        F: FnMut(&mut dyn EntryProcessor) -> Result<bool>,
    {
        if call(self.condition.as_mut())? {
            call(self.on_true.as_mut())
        } else if let Some(on_false) = self.on_false.as_mut() {
            call(on_false.as_mut())
        } else {
            Ok(false)
        }
    }
}

impl EntryProcessor for If<'_> {
    routed_callbacks!();

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        let on_true = self.on_true.finish()?;
        let on_false = match self.on_false.as_mut() {
            Some(on_false) => on_false.finish()?,
            None => None,
        };
        Ok(collect_finish_values([on_true, on_false]))
    }
}

/// Inverts its child's answer.
pub struct Not<'a> {
    child: BoxedEntryProcessor<'a>,
}

impl<'a> Not<'a> {
    pub fn new(child: impl EntryProcessor + 'a) -> Self {
        Self {
            child: Box::new(child),
        }
    }

    fn route<F>(&mut self, mut call: F) -> Result<bool>
    where
        F: FnMut(&mut dyn EntryProcessor) -> Result<bool>,
    {
        Ok(!call(self.child.as_mut())?)
    }
}

impl EntryProcessor for Not<'_> {
    routed_callbacks!();

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        self.child.finish()
    }
}

macro_rules! combinator {
    ($(#[$doc:meta])* $name:ident, |$acc:ident, $child:ident| $step:expr, $init:expr, $short:expr) => {
        $(#[$doc])*
        #[derive(Default)]
        pub struct $name<'a> {
            children: Vec<BoxedEntryProcessor<'a>>,
        }

        impl<'a> $name<'a> {
            pub fn new(children: Vec<BoxedEntryProcessor<'a>>) -> Self {
                Self { children }
            }

            pub fn with(mut self, child: impl EntryProcessor + 'a) -> Self {
                self.children.push(Box::new(child));
                self
            }

            fn route<F>(&mut self, mut call: F) -> Result<bool>
            where
                F: FnMut(&mut dyn EntryProcessor) -> Result<bool>,
            {
                let mut $acc = $init;
                for child in self.children.iter_mut() {
                    let $child = call(child.as_mut())?;
                    $acc = $step;
                    if $short($acc) {
                        break;
                    }
                }
                Ok($acc)
            }
        }

        impl EntryProcessor for $name<'_> {
            routed_callbacks!();

            fn finish(&mut self) -> Result<Option<FinishValue>> {
                finish_all(&mut self.children)
            }
        }
    };
}

combinator!(
    /// Accepts when every child accepts, stopping at the first rejection.
    And, |acc, child| acc && child, true, |acc: bool| !acc
);
combinator!(
    /// Accepts when any child accepts, stopping at the first acceptance.
    Or, |acc, child| acc || child, false, |acc: bool| acc
);
combinator!(
    /// Accepts when every child accepts. Every child sees every entry.
    All, |acc, child| child && acc, true, |_: bool| false
);
combinator!(
    /// Accepts when any child accepts. Every child sees every entry.
    Any, |acc, child| child || acc, false, |_: bool| false
);

/// Routes records by a [`RecordFilter`].
pub struct RecordIf<'a> {
    filter: Box<dyn RecordFilter + 'a>,
    on_true: Box<dyn RecordProcessor + 'a>,
    on_false: Option<Box<dyn RecordProcessor + 'a>>,
}

impl<'a> RecordIf<'a> {
    pub fn new(filter: impl RecordFilter + 'a, on_true: impl RecordProcessor + 'a) -> Self {
        Self {
            filter: Box::new(filter),
            on_true: Box::new(on_true),
            on_false: None,
        }
    }

    pub fn otherwise(mut self, on_false: impl RecordProcessor + 'a) -> Self {
        self.on_false = Some(Box::new(on_false));
        self
    }
}

impl RecordProcessor for RecordIf<'_> {
    fn record(&mut self, record: Record) -> Result<bool> {
        if self.filter.accept_record(&record) {
            self.on_true.record(record)
        } else if let Some(on_false) = self.on_false.as_mut() {
            on_false.record(record)
        } else {
            Ok(false)
        }
    }

    fn extra_entry(&mut self, entry: &Entry) -> Result<bool> {
        if self.filter.accept_extra_entry(entry) {
            self.on_true.extra_entry(entry)
        } else if let Some(on_false) = self.on_false.as_mut() {
            on_false.extra_entry(entry)
        } else {
            Ok(false)
        }
    }

    fn finish(&mut self) -> Result<Option<FinishValue>> {
        let on_true = self.on_true.finish()?;
        let on_false = match self.on_false.as_mut() {
            Some(on_false) => on_false.finish()?,
            None => None,
        };
        Ok(collect_finish_values([on_true, on_false]))
    }
}
