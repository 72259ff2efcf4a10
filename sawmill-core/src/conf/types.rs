use crate::rotate::{ShiftPeriod, TurnoverFrequency};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level shape of a sawmill HCL file. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SawmillConfig {
    pub output: OutputConfig,
    pub format: FormatConfig,
    pub rotater: RotaterConfig,
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputStrategy {
    #[default]
    Stdout,
    Shifting,
    DateBased,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub strategy: OutputStrategy,

    //-------------------------------------------------------------------------
    // Shifting
    //-------------------------------------------------------------------------
    pub path: Option<PathBuf>,
    pub max_file_size: Option<u64>,
    pub shift_period: Option<ShiftPeriod>,
    pub history_size: Option<usize>,

    //-------------------------------------------------------------------------
    // Date based
    //-------------------------------------------------------------------------
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub basedir: Option<PathBuf>,
    pub frequency: TurnoverFrequency,
    pub local_datestamps: bool,

    /// Append a counter when the dated path already exists.
    pub unique: Option<UniqueConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniqueConfig {
    pub min_digits: Option<usize>,
    pub start_value: u64,
    pub max_attempts: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub include_id: bool,
    pub fractional_second_digits: Option<u8>,
    pub level_width: Option<usize>,
    pub iso_8601_time: bool,

    /// `+HHMM` or `-HHMM`.
    pub utc_offset: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotaterConfig {
    pub omit_directives: bool,
    pub concurrent_writes: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    pub emit_incomplete_records_at_eof: bool,

    /// Custom level names, lowest first. The standard levels when absent.
    pub levels: Option<Vec<String>>,
}
