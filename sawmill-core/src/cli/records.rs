use crate::cli::Printer;
use crate::format::FormatOptions;
use crate::logging::LogMode;
use crate::open::open_records;
use crate::parse::ParserOptions;
use crate::processor::{FilterByAttributes, FilterByRecordId, RecordIf, RecordProcessor};
use anyhow::{Context, anyhow};
use clap::Args;
use regex::Regex;
use std::io::Write;

#[derive(Args, Debug, Clone)]
pub struct RecordsArgs {
    /// Log files or glob patterns; `.gz` files are decompressed
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Only print records whose id matches this regex
    #[arg(long)]
    pub id: Option<String>,

    /// Only print records with this attribute value (repeatable)
    #[arg(long = "attr", value_name = "KEY=VALUE")]
    pub attributes: Vec<String>,

    /// Also print records that never ended
    #[arg(long)]
    pub incomplete: bool,

    /// Print record ids in every header
    #[arg(long)]
    pub include_id: bool,
}

impl RecordsArgs {
    fn attribute_filter(&self) -> anyhow::Result<Option<FilterByAttributes>> {
        if self.attributes.is_empty() {
            return Ok(None);
        }

        let mut filter = FilterByAttributes::new();
        for pair in &self.attributes {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow!("--attr expects KEY=VALUE, got {pair:?}"))?;
            filter = filter.require(key, value);
        }
        Ok(Some(filter))
    }
}

/// Assembles records from every matching file and prints those that pass the
/// filters.
pub fn records(args: &RecordsArgs, mode: LogMode, out: impl Write) -> anyhow::Result<()> {
    let printer = Printer::new(
        out,
        FormatOptions {
            include_id: args.include_id,
            ..FormatOptions::default()
        },
        mode,
    );

    let mut sink: Box<dyn RecordProcessor + '_> = Box::new(printer);
    if let Some(filter) = args.attribute_filter()? {
        sink = Box::new(RecordIf::new(filter, sink));
    }
    if let Some(pattern) = &args.id {
        let regex = Regex::new(pattern).with_context(|| format!("invalid --id regex {pattern:?}"))?;
        sink = Box::new(RecordIf::new(FilterByRecordId::matching(regex), sink));
    }

    let parser = ParserOptions {
        emit_incomplete_records_at_eof: args.incomplete,
        ..ParserOptions::default()
    };
    open_records(&args.files, sink, parser)?;

    Ok(())
}
