use crate::logging::LogMode;
use crate::open::{IngestOptions, open_files};
use crate::parse::ParserOptions;
use crate::processor::{All, CountEntries, CountEntriesOptions, CountRecords};
use crate::record::RecordBuilder;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    /// Log files or glob patterns; `.gz` files are decompressed
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountSummary {
    pub entries: u64,
    pub unknown: u64,
    pub records: u64,
}

/// Counts entries, unknown lines and complete records across every matching
/// file in one pass.
pub fn tally(files: &[String]) -> anyhow::Result<CountSummary> {
    let mut entries = CountEntries::new();
    let mut known = CountEntries::with_options(CountEntriesOptions {
        omit_unknown_data: true,
        ..CountEntriesOptions::default()
    });
    let mut records = RecordBuilder::new(CountRecords::new());

    {
        let mut pipeline = All::default()
            .with(&mut entries)
            .with(&mut known)
            .with(&mut records);
        open_files(
            files,
            &mut pipeline,
            IngestOptions {
                parser: ParserOptions::default(),
                finish: true,
            },
        )?;
    }

    Ok(CountSummary {
        entries: entries.count(),
        unknown: entries.count() - known.count(),
        records: records.processor().count(),
    })
}

pub fn count(args: &CountArgs, mode: LogMode, mut out: impl Write) -> anyhow::Result<()> {
    let summary = tally(&args.files)?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    let rows = [
        ("entries", summary.entries),
        ("unknown", summary.unknown),
        ("records", summary.records),
    ];
    for (label, value) in rows {
        match mode {
            LogMode::Pretty => writeln!(out, "{:<8} {}", label.bold(), value)?,
            LogMode::Raw => writeln!(out, "{label:<8} {value}")?,
        }
    }
    Ok(())
}
