//! Output rotation.
//!
//! A [`Rotater`] owns a table of open physical outputs, keyed by the handles a
//! [`RotationStrategy`] hands out. Writers obtain a [`Channel`], which stays
//! bound to one handle until it is closed or explicitly offered a chance to
//! rotate, so a run of related writes never straddles two files.

mod channel;
mod date_based;
mod rotater;
mod shifting;
mod strategy;

#[cfg(test)]
mod tests;

pub use channel::{Channel, ChannelOptions};
pub use date_based::{
    DateBasedLogFile, DateBasedOptions, SimpleUniquifier, TurnoverFrequency, Uniquifier,
    UniquifierRequest,
};
pub use rotater::{Rotater, RotaterOptions};
pub use shifting::{ShiftPeriod, ShiftingLogFile, ShiftingOptions};
pub use strategy::{RotationStrategy, Sink, StreamSink, StreamStrategy};

use crate::entry::Timestamp;

/// Source of "now" for time-driven strategies.
pub type Clock = Box<dyn Fn() -> Timestamp + Send>;

pub(crate) fn system_clock() -> Clock {
    Box::new(chrono::Utc::now)
}
