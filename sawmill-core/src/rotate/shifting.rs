use crate::entry::Timestamp;
use crate::error::{Result, SawmillError};
use crate::rotate::{Clock, RotationStrategy, system_clock};
use chrono::TimeDelta;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How often a shifting log file turns over regardless of size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftPeriod {
    Yearly,
    Monthly,
    Daily,
    Hourly,
    #[serde(skip)]
    Seconds(i64),
}

impl ShiftPeriod {
    pub fn as_delta(self) -> TimeDelta {
        match self {
            ShiftPeriod::Yearly => TimeDelta::days(365),
            ShiftPeriod::Monthly => TimeDelta::days(30),
            ShiftPeriod::Daily => TimeDelta::days(1),
            ShiftPeriod::Hourly => TimeDelta::hours(1),
            ShiftPeriod::Seconds(secs) => TimeDelta::seconds(secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShiftingOptions {
    pub path: PathBuf,
    /// Shift once the active file grows beyond this many bytes.
    pub max_file_size: Option<u64>,
    pub shift_period: Option<ShiftPeriod>,
    /// Numbered backups to keep. At least 1 when a trigger is configured.
    pub history_size: usize,
}

impl Default for ShiftingOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sawmill.log"),
            max_file_size: None,
            shift_period: None,
            history_size: 0,
        }
    }
}

/// Writes to one path and shifts it down a chain of numbered backups
/// (`path.0`, `path.1`, ...) when it grows too large or too old.
///
/// Handles are generations. The current generation writes to `path`; an older
/// generation `g` still held by a channel writes to `path.(current - g - 1)`,
/// which is where its file ended up after shifting.
pub struct ShiftingLogFile {
    path: PathBuf,
    max_file_size: Option<u64>,
    shift_period: Option<TimeDelta>,
    history_size: u64,
    generation: u64,
    open_generations: BTreeSet<u64>,
    last_shift: Timestamp,
    clock: Clock,
}

impl ShiftingLogFile {
    pub fn new(options: ShiftingOptions) -> Self {
        let mut history_size = options.history_size as u64;
        if history_size < 1 && (options.max_file_size.is_some() || options.shift_period.is_some())
        {
            history_size = 1;
        }
        let clock = system_clock();

        Self {
            path: options.path,
            max_file_size: options.max_file_size,
            shift_period: options.shift_period.map(ShiftPeriod::as_delta),
            history_size,
            generation: 0,
            open_generations: BTreeSet::new(),
            last_shift: clock(),
            clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.last_shift = clock();
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history_size(&self) -> u64 {
        self.history_size
    }

    /// `path.N`
    pub fn backup_path(&self, index: u64) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn path_for(&self, generation: u64) -> PathBuf {
        if generation == self.generation {
            self.path.clone()
        } else {
            self.backup_path(self.generation - generation - 1)
        }
    }

    fn should_shift(&self, now: Timestamp) -> io::Result<bool> {
        if let Some(max) = self.max_file_size {
            match fs::metadata(&self.path) {
                Ok(meta) if meta.is_file() && meta.len() > max => return Ok(true),
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err),
            }
        }
        Ok(self
            .shift_period
            .is_some_and(|period| now - self.last_shift > period))
    }

    fn shift(&mut self, now: Timestamp) -> Result<()> {
        let oldest_open = self
            .open_generations
            .first()
            .copied()
            .unwrap_or(self.generation);
        let depth = (self.generation - oldest_open + 1).max(self.history_size);

        if depth > 0 {
            remove_if_exists(&self.backup_path(depth - 1))?;
        }
        for index in (1..depth).rev() {
            rename_if_exists(&self.backup_path(index - 1), &self.backup_path(index))?;
        }
        rename_if_exists(&self.path, &self.backup_path(0))?;

        self.generation += 1;
        self.last_shift = now;
        info!(path = %self.path.display(), generation = self.generation, "shifted log file");
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(SawmillError::Io(err)),
        _ => Ok(()),
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(SawmillError::Io(err)),
        _ => Ok(()),
    }
}

impl RotationStrategy for ShiftingLogFile {
    type Handle = u64;
    type Sink = File;

    fn preferred_handle(&self) -> u64 {
        self.generation
    }

    fn open_handle(&mut self, generation: &u64) -> Result<File> {
        let path = self.path_for(*generation);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| SawmillError::open_file(&path, err))?;
        self.open_generations.insert(*generation);
        debug!(path = %path.display(), generation, "opened shifting log file");
        Ok(file)
    }

    fn close_handle(&mut self, generation: &u64, sink: File) -> Result<()> {
        drop(sink);
        let age = self.generation - generation;
        if age > self.history_size {
            remove_if_exists(&self.backup_path(age - 1))?;
        }
        self.open_generations.remove(generation);
        Ok(())
    }

    fn before_write(&mut self) -> Result<()> {
        if self.max_file_size.is_none() && self.shift_period.is_none() {
            return Ok(());
        }
        let now = (self.clock)();
        if self.should_shift(now)? {
            self.shift(now)?;
        }
        Ok(())
    }
}
