//! Records: entries grouped under one record id.

mod builder;
#[allow(clippy::module_inception)]
mod record;

#[cfg(test)]
mod tests;

pub use builder::{RecordBuilder, RecordBuilderOptions};
pub use record::{AttributeValue, Record};
