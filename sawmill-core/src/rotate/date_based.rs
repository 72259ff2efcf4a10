use crate::error::{Result, SawmillError};
use crate::rotate::{Clock, RotationStrategy, system_clock};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnoverFrequency {
    #[default]
    None,
    Yearly,
    Monthly,
    Daily,
    Hourly,
}

impl TurnoverFrequency {
    fn date_pattern(self) -> Option<&'static str> {
        match self {
            TurnoverFrequency::None => None,
            TurnoverFrequency::Yearly => Some("%Y"),
            TurnoverFrequency::Monthly => Some("%Y-%m"),
            TurnoverFrequency::Daily => Some("%Y-%m-%d"),
            TurnoverFrequency::Hourly => Some("%Y-%m-%d-%H"),
        }
    }
}

/// What a [`Uniquifier`] knows when proposing a path.
#[derive(Debug)]
pub struct UniquifierRequest<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
    pub basedir: &'a Path,
    /// The path the strategy would use without uniquifying.
    pub original_path: &'a Path,
    /// The previous proposal, which already existed. `None` on the first call.
    pub last_path: Option<&'a Path>,
}

/// Proposes candidate paths until one can be created exclusively.
pub trait Uniquifier: Send {
    /// `None` gives up, failing the open with [`SawmillError::NoUniqueLogFile`].
    fn next_path(&mut self, request: &UniquifierRequest<'_>) -> Option<PathBuf>;
}

/// Inserts a counter before the suffix: `app.2024-01-01.log` becomes
/// `app.2024-01-01.0.log`, then `.1.log`, and so on.
#[derive(Debug, Clone, Default)]
pub struct SimpleUniquifier {
    pub min_digits: Option<usize>,
    pub start_value: u64,
    pub max_attempts: Option<u64>,
    value: u64,
    attempts: u64,
    pre: String,
    post: String,
}

impl SimpleUniquifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_digits(mut self, digits: usize) -> Self {
        self.min_digits = Some(digits);
        self
    }

    pub fn with_start_value(mut self, value: u64) -> Self {
        self.start_value = value;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u64) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

impl Uniquifier for SimpleUniquifier {
    fn next_path(&mut self, request: &UniquifierRequest<'_>) -> Option<PathBuf> {
        if request.last_path.is_some() {
            self.value += 1;
            self.attempts += 1;
        } else {
            let original = request.original_path.to_string_lossy();
            match original.strip_suffix(request.suffix) {
                Some(pre) if !request.suffix.is_empty() => {
                    self.pre = pre.to_string();
                    self.post = request.suffix.to_string();
                }
                _ => {
                    self.pre = original.into_owned();
                    self.post = String::new();
                }
            }
            self.value = self.start_value;
            self.attempts = 0;
        }

        if self.max_attempts.is_some_and(|max| self.attempts >= max) {
            return None;
        }

        let width = self.min_digits.unwrap_or(0);
        Some(PathBuf::from(format!(
            "{}.{:0width$}{}",
            self.pre, self.value, self.post
        )))
    }
}

pub struct DateBasedOptions {
    pub turnover_frequency: TurnoverFrequency,
    pub basedir: PathBuf,
    pub prefix: String,
    /// A leading `.` is added when missing.
    pub suffix: String,
    /// Stamp file names in local time instead of UTC.
    pub local_datestamps: bool,
    pub uniquifier: Option<Box<dyn Uniquifier>>,
}

impl Default for DateBasedOptions {
    fn default() -> Self {
        Self {
            turnover_frequency: TurnoverFrequency::None,
            basedir: PathBuf::from("."),
            prefix: "sawmill".to_string(),
            suffix: ".log".to_string(),
            local_datestamps: false,
            uniquifier: None,
        }
    }
}

/// Writes to `PREFIX.DATE.SUFFIX`, turning over when the formatted date
/// changes.
pub struct DateBasedLogFile {
    frequency: TurnoverFrequency,
    basedir: PathBuf,
    prefix: String,
    suffix: String,
    local_datestamps: bool,
    uniquifier: Option<Box<dyn Uniquifier>>,
    clock: Clock,
}

impl DateBasedLogFile {
    pub fn new(options: DateBasedOptions) -> Self {
        let mut suffix = options.suffix;
        if !suffix.is_empty() && !suffix.starts_with('.') {
            suffix.insert(0, '.');
        }

        Self {
            frequency: options.turnover_frequency,
            basedir: options.basedir,
            prefix: options.prefix,
            suffix,
            local_datestamps: options.local_datestamps,
            uniquifier: options.uniquifier,
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The path a handle maps to before any uniquifying.
    pub fn path_for(&self, handle: &str) -> PathBuf {
        let name = match self.frequency.date_pattern() {
            Some(_) => format!("{}.{}{}", self.prefix, handle, self.suffix),
            None => format!("{}{}", self.prefix, self.suffix),
        };
        self.basedir.join(name)
    }

    fn open_unique(&mut self, original: PathBuf) -> Result<File> {
        let Some(uniquifier) = self.uniquifier.as_mut() else {
            return OpenOptions::new()
                .create(true)
                .append(true)
                .open(&original)
                .map_err(|err| SawmillError::open_file(&original, err));
        };

        let mut last_path: Option<PathBuf> = None;
        loop {
            let request = UniquifierRequest {
                prefix: &self.prefix,
                suffix: &self.suffix,
                basedir: &self.basedir,
                original_path: &original,
                last_path: last_path.as_deref(),
            };
            let Some(candidate) = uniquifier.next_path(&request) else {
                return Err(SawmillError::NoUniqueLogFile { path: original });
            };

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => return Ok(file),
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %candidate.display(), "log file exists, trying another");
                    last_path = Some(candidate);
                }
                Err(err) => return Err(SawmillError::open_file(candidate, err)),
            }
        }
    }
}

impl RotationStrategy for DateBasedLogFile {
    type Handle = String;
    type Sink = File;

    fn preferred_handle(&self) -> String {
        let Some(pattern) = self.frequency.date_pattern() else {
            return String::new();
        };
        let now = (self.clock)();
        if self.local_datestamps {
            now.with_timezone(&chrono::Local).format(pattern).to_string()
        } else {
            now.format(pattern).to_string()
        }
    }

    fn open_handle(&mut self, handle: &String) -> Result<File> {
        let path = self.path_for(handle);
        let file = self.open_unique(path)?;
        info!(handle = %handle, "opened date-based log file");
        Ok(file)
    }

    fn close_handle(&mut self, handle: &String, sink: File) -> Result<()> {
        drop(sink);
        debug!(handle = %handle, "closed date-based log file");
        Ok(())
    }
}
