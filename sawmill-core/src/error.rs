use crate::entry::{EntryKind, Timestamp};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SawmillError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SawmillError {
    //-------------------------------------------------------------------------
    // Record protocol
    //-------------------------------------------------------------------------
    #[error(transparent)]
    IllegalRecord(#[from] IllegalRecordError),

    //-------------------------------------------------------------------------
    // Levels
    //-------------------------------------------------------------------------
    #[error("invalid level group: {reason}")]
    Level { reason: String },

    //-------------------------------------------------------------------------
    // Rotation
    //-------------------------------------------------------------------------
    #[error("could not find a unique log file path for {path}")]
    NoUniqueLogFile { path: PathBuf },

    #[error("rotation handle {handle} is not open")]
    UnknownHandle { handle: String },

    #[error("the output stream is already held by an open channel")]
    StreamInUse,

    //-------------------------------------------------------------------------
    // IO / Discovery
    //-------------------------------------------------------------------------
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glob pattern error: {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl SawmillError {
    pub fn level(reason: impl Into<String>) -> Self {
        Self::Level {
            reason: reason.into(),
        }
    }

    pub fn open_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OpenFile {
            path: path.into(),
            source,
        }
    }
}

/// A record was asked to accept an entry that would break its invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IllegalRecordError {
    #[error("you cannot add an unknown_data entry to a record")]
    UnknownData,

    #[error("first entry in a record must be a begin_record, found {found}")]
    FirstEntryNotBegin { found: EntryKind },

    #[error("extra begin_record found for record {record_id}")]
    ExtraBegin { record_id: String },

    #[error("cannot add a {found} entry after end_record")]
    EntryAfterEnd { found: EntryKind },

    #[error("entry has no record_id")]
    MissingRecordId,

    #[error("entry has a mismatching record_id: expected {expected}, found {found:?}")]
    MismatchedRecordId {
        expected: String,
        found: Option<String>,
    },

    #[error("entry's timestamp {found} is earlier than the previous entry ({previous})")]
    TimestampRegression {
        previous: Timestamp,
        found: Timestamp,
    },
}
