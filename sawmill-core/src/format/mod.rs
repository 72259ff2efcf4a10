//! Encoding entries into the sawmill line format.
//!
//! ```text
//! [LEVEL YYYY-MM-DD HH:MM:SS.ff PROGNAME[ RECORD_ID] MARKER] PAYLOAD
//! ```
//!
//! Embedded newlines in a payload become a backslash continuation: every
//! physical line except the last ends in an odd run of backslashes, and
//! trailing backslashes that belong to the payload are doubled so their run
//! is even. [`crate::parse::Parser`] reverses this exactly.


use crate::entry::{Entry, Timestamp};
use chrono::{FixedOffset, Offset};

pub const DIRECTIVE_PREFIX: &str = "# sawmill_format: ";

#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Write the record id into the header of every entry that has one.
    pub include_id: bool,

    /// Digits of fractional seconds, clamped to 0..=6.
    pub fractional_second_digits: u8,

    /// Right-justify level names to this width.
    pub level_width: Option<usize>,

    /// Use `T` between date and time, and `Z` for UTC.
    pub iso_8601_time: bool,

    /// Render times in this offset instead of UTC.
    pub utc_offset: Option<FixedOffset>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_id: false,
            fractional_second_digits: 2,
            level_width: None,
            iso_8601_time: false,
            utc_offset: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntryFormatter {
    options: FormatOptions,
}

impl EntryFormatter {
    pub fn new(mut options: FormatOptions) -> Self {
        options.fractional_second_digits = options.fractional_second_digits.min(6);
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Formats one entry as a complete logical line, including the final newline.
    pub fn format(&self, entry: &Entry) -> String {
        match entry {
            Entry::UnknownData(e) => format!("{}\n", e.line()),
            Entry::Message(e) => self.format_line(
                e.level().name(),
                e.timestamp(),
                e.progname(),
                e.record_id(),
                '.',
                e.message(),
            ),
            Entry::BeginRecord(e) => self.format_line(
                e.level().name(),
                e.timestamp(),
                e.progname(),
                Some(e.record_id()),
                '^',
                &format!("BEGIN {}", e.record_id()),
            ),
            Entry::EndRecord(e) => self.format_line(
                e.level().name(),
                e.timestamp(),
                e.progname(),
                Some(e.record_id()),
                '$',
                &format!("END {}", e.record_id()),
            ),
            Entry::Attribute(e) => self.format_line(
                e.level().name(),
                e.timestamp(),
                e.progname(),
                e.record_id(),
                '=',
                &format!("{} {} {}", e.key(), e.operation().symbol(), e.value()),
            ),
        }
    }

    fn format_line(
        &self,
        level: &str,
        timestamp: Timestamp,
        progname: &str,
        record_id: Option<&str>,
        marker: char,
        payload: &str,
    ) -> String {
        let level = match self.options.level_width {
            Some(width) => format!("{level:>width$}"),
            None => level.to_string(),
        };

        let id = match (self.options.include_id, record_id) {
            (true, Some(id)) => format!(" {id}"),
            _ => String::new(),
        };

        format!(
            "[{} {} {}{} {}] {}\n",
            level,
            self.format_time(timestamp),
            progname,
            id,
            marker,
            escape_payload(payload)
        )
    }

    fn format_time(&self, timestamp: Timestamp) -> String {
        let offset = self
            .options
            .utc_offset
            .unwrap_or_else(|| chrono::Utc.fix());
        let local = timestamp.with_timezone(&offset);

        let mut out = if self.options.iso_8601_time {
            local.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            local.format("%Y-%m-%d %H:%M:%S").to_string()
        };

        let digits = self.options.fractional_second_digits as usize;
        if digits > 0 {
            let micros = local.timestamp_subsec_micros() % 1_000_000;
            let scaled = micros / 10u32.pow(6 - digits as u32);
            out.push_str(&format!(".{scaled:0digits$}"));
        }

        match self.options.utc_offset {
            Some(offset) => {
                let secs = offset.local_minus_utc();
                let sign = if secs < 0 { '-' } else { '+' };
                let secs = secs.abs();
                let rendered = format!("{sign}{:02}{:02}", secs / 3600, (secs % 3600) / 60);
                if !self.options.iso_8601_time {
                    out.push(' ');
                }
                out.push_str(&rendered);
            }
            None if self.options.iso_8601_time => out.push('Z'),
            None => {}
        }

        out
    }
}

/// Escapes a payload so it survives as one logical line.
pub fn escape_payload(payload: &str) -> String {
    payload
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_end_matches('\\');
            let run = line.len() - trimmed.len();
            let mut out = String::with_capacity(line.len() + run);
            out.push_str(line);
            out.extend(std::iter::repeat_n('\\', run));
            out
        })
        .collect::<Vec<_>>()
        .join("\\\n")
}

/// The directive lines written at the top of every freshly opened log file.
pub fn directive_lines() -> [String; 2] {
    [
        format!("{DIRECTIVE_PREFIX}version=1\n"),
        format!("{DIRECTIVE_PREFIX}encoding=UTF-8\n"),
    ]
}
