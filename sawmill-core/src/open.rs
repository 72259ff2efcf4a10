//! Reading log files from disk.
//!
//! Patterns are expanded with `glob`, files ending in `.gz` are decompressed
//! on the fly, and every file is merged through one [`MultiParser`].


use crate::error::{Result, SawmillError};
use crate::parse::{MultiParser, ParserOptions};
use crate::processor::{EntryProcessor, FinishValue, RecordProcessor};
use crate::record::RecordBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub parser: ParserOptions,

    /// Call `finish` on the processor afterwards and return its value.
    pub finish: bool,
}

/// Expands a glob pattern into the matching paths, sorted.
///
/// Unreadable entries are skipped.
///
/// # Errors
///
/// Returns `SawmillError::Glob` if the pattern is malformed.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<_> = glob::glob(pattern)
        .map_err(|e| SawmillError::Glob {
            pattern: pattern.to_string(),
            source: e,
        })?
        .filter_map(std::result::Result::ok)
        .collect();

    paths.sort();
    Ok(paths)
}

/// Opens `path` for line reading, transparently gunzipping `*.gz`.
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| SawmillError::open_file(path, e))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Expands every pattern, dropping duplicate paths but keeping first-seen order.
pub fn discover_all<I, P>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<str>,
{
    let mut seen = Vec::new();
    for pattern in patterns {
        for path in discover(pattern.as_ref())? {
            if !seen.contains(&path) {
                seen.push(path);
            }
        }
    }
    Ok(seen)
}

/// Runs every file matching `patterns` through `processor`, merged by timestamp.
///
/// Files are closed when this returns, whether or not parsing succeeded.
pub fn open_files<I, S, P>(
    patterns: I,
    processor: &mut P,
    options: IngestOptions,
) -> Result<Option<FinishValue>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: EntryProcessor + ?Sized,
{
    let paths = discover_all(patterns)?;
    debug!(files = paths.len(), "opening log files");

    let readers = paths
        .iter()
        .map(|path| open_reader(path))
        .collect::<Result<Vec<_>>>()?;

    MultiParser::new(readers, options.parser).drain_all(processor)?;

    if options.finish {
        processor.finish()
    } else {
        Ok(None)
    }
}

/// [`open_files`] with finishing, for entry processors.
pub fn open_entries<I, S, P>(
    patterns: I,
    processor: &mut P,
    parser: ParserOptions,
) -> Result<Option<FinishValue>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: EntryProcessor + ?Sized,
{
    open_files(
        patterns,
        processor,
        IngestOptions {
            parser,
            finish: true,
        },
    )
}

/// [`open_files`] with finishing, assembling records for `processor`.
pub fn open_records<I, S, P>(
    patterns: I,
    processor: P,
    parser: ParserOptions,
) -> Result<Option<FinishValue>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    P: RecordProcessor,
{
    let mut builder = RecordBuilder::new(processor);
    open_files(
        patterns,
        &mut builder,
        IngestOptions {
            parser,
            finish: true,
        },
    )
}
