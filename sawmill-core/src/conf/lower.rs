//! Lowers the deserialized config into the option structs the library takes.

use crate::conf::error::ConfigError;
use crate::conf::types::{OutputStrategy, SawmillConfig};
use crate::format::FormatOptions;
use crate::level::LevelGroup;
use crate::parse::ParserOptions;
use crate::rotate::{
    DateBasedOptions, RotaterOptions, ShiftingOptions, SimpleUniquifier, Uniquifier,
};
use chrono::FixedOffset;

/// Where configured output goes.
pub enum OutputTarget {
    Stdout,
    Shifting(ShiftingOptions),
    DateBased(DateBasedOptions),
}

impl SawmillConfig {
    pub fn output_target(&self) -> OutputTarget {
        let output = &self.output;
        match output.strategy {
            OutputStrategy::Stdout => OutputTarget::Stdout,
            OutputStrategy::Shifting => {
                let defaults = ShiftingOptions::default();
                OutputTarget::Shifting(ShiftingOptions {
                    path: output.path.clone().unwrap_or(defaults.path),
                    max_file_size: output.max_file_size,
                    shift_period: output.shift_period,
                    history_size: output.history_size.unwrap_or(defaults.history_size),
                })
            }
            OutputStrategy::DateBased => {
                let defaults = DateBasedOptions::default();
                let uniquifier = output.unique.as_ref().map(|unique| {
                    let mut uniquifier =
                        SimpleUniquifier::new().with_start_value(unique.start_value);
                    if let Some(digits) = unique.min_digits {
                        uniquifier = uniquifier.with_min_digits(digits);
                    }
                    if let Some(attempts) = unique.max_attempts {
                        uniquifier = uniquifier.with_max_attempts(attempts);
                    }
                    Box::new(uniquifier) as Box<dyn Uniquifier>
                });

                OutputTarget::DateBased(DateBasedOptions {
                    turnover_frequency: output.frequency,
                    basedir: output.basedir.clone().unwrap_or(defaults.basedir),
                    prefix: output.prefix.clone().unwrap_or(defaults.prefix),
                    suffix: output.suffix.clone().unwrap_or(defaults.suffix),
                    local_datestamps: output.local_datestamps,
                    uniquifier,
                })
            }
        }
    }

    pub fn format_options(&self) -> Result<FormatOptions, ConfigError> {
        let format = &self.format;
        let defaults = FormatOptions::default();
        let utc_offset = format
            .utc_offset
            .as_deref()
            .map(|raw| {
                parse_utc_offset(raw).ok_or_else(|| {
                    ConfigError::invalid(format!("format.utc_offset {raw:?} is not +HHMM or -HHMM"))
                })
            })
            .transpose()?;

        Ok(FormatOptions {
            include_id: format.include_id,
            fractional_second_digits: format
                .fractional_second_digits
                .unwrap_or(defaults.fractional_second_digits),
            level_width: format.level_width,
            iso_8601_time: format.iso_8601_time,
            utc_offset,
        })
    }

    pub fn rotater_options(&self) -> RotaterOptions {
        RotaterOptions {
            omit_directives: self.rotater.omit_directives,
            concurrent_writes: self.rotater.concurrent_writes,
        }
    }

    pub fn parser_options(&self) -> Result<ParserOptions, ConfigError> {
        let mut options = ParserOptions {
            emit_incomplete_records_at_eof: self.parser.emit_incomplete_records_at_eof,
            ..ParserOptions::default()
        };

        if let Some(names) = &self.parser.levels {
            options.levels = names
                .iter()
                .fold(LevelGroup::builder(), |builder, name| builder.add(name, &[]))
                .build()
                .map_err(|e| ConfigError::invalid(format!("parser.levels: {e}")))?;
        }

        Ok(options)
    }
}

fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, digits) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[0..2].parse().ok()?;
    let minutes: i32 = digits[2..4].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
