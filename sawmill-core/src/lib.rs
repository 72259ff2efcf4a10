//! Structured, record-oriented logging.
//!
//! Log lines carry a level, a timestamp, a progname and an optional record id.
//! Lines sharing a record id between a begin and an end marker form a record.
//! This crate decodes such logs ([`parse`]), merges several files by time,
//! assembles records ([`record`]), routes entries through composable
//! processors ([`processor`]) and writes them back out through rotating files
//! ([`rotate`]) without splitting a record across files.

pub mod cli;
pub mod conf;
pub mod entry;
pub mod error;
pub mod format;
pub mod level;
pub mod logging;
pub mod open;
pub mod parse;
pub mod processor;
pub mod record;
pub mod rotate;

pub use error::{IllegalRecordError, Result, SawmillError};
