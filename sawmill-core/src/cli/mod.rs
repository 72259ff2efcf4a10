//! Command implementations for the `sawmill` binary.
//!
//! Each command takes its clap argument struct and a [`LogMode`]; the binary
//! only parses arguments and installs logging.
//!
//! [`LogMode`]: crate::logging::LogMode

mod cat;
mod count;
mod ingest;
mod printer;
mod records;

#[cfg(test)]
mod tests;

pub use cat::{CatArgs, cat};
pub use count::{CountArgs, CountSummary, count, tally};
pub use ingest::{IngestArgs, ingest};
pub use printer::Printer;
pub use records::{RecordsArgs, records};
