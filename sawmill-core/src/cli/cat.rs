use crate::cli::Printer;
use crate::format::FormatOptions;
use crate::logging::LogMode;
use crate::open::{IngestOptions, open_files};
use crate::parse::ParserOptions;
use crate::processor::{BasicFieldsFilter, FilterByBasicFields, If, LevelThreshold};
use clap::Args;
use std::io::Write;

#[derive(Args, Debug, Clone)]
pub struct CatArgs {
    /// Log files or glob patterns; `.gz` files are decompressed
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Digits of fractional seconds to print (0-6)
    #[arg(long, default_value_t = 2)]
    pub digits: u8,

    /// Print ISO 8601 timestamps
    #[arg(long)]
    pub iso: bool,

    /// Print record ids in every header
    #[arg(long)]
    pub include_id: bool,

    /// Only print entries at or above this level
    #[arg(long)]
    pub level: Option<String>,

    /// Only print entries from this progname
    #[arg(long)]
    pub progname: Option<String>,
}

impl CatArgs {
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            include_id: self.include_id,
            fractional_second_digits: self.digits,
            iso_8601_time: self.iso,
            ..FormatOptions::default()
        }
    }

    fn filter(&self) -> Option<FilterByBasicFields> {
        if self.level.is_none() && self.progname.is_none() {
            return None;
        }
        Some(FilterByBasicFields::new(BasicFieldsFilter {
            level: self.level.clone().map(LevelThreshold::named),
            progname: self.progname.clone(),
            accept_record_delimiters: Some(true),
            ..BasicFieldsFilter::default()
        }))
    }
}

/// Merges every matching file by timestamp and prints the entries.
pub fn cat(args: &CatArgs, mode: LogMode, out: impl Write) -> anyhow::Result<()> {
    let mut printer = Printer::new(out, args.format_options(), mode);
    let options = IngestOptions {
        parser: ParserOptions::default(),
        finish: true,
    };

    match args.filter() {
        Some(filter) => {
            let mut pipeline = If::new(filter, &mut printer, None);
            open_files(&args.files, &mut pipeline, options)?;
        }
        None => {
            open_files(&args.files, &mut printer, options)?;
        }
    }

    Ok(())
}
