use crate::conf::{OutputTarget, SawmillConfig, load_config};
use crate::format::FormatOptions;
use crate::open::{IngestOptions, open_files};
use crate::parse::{Parser, ParserOptions};
use crate::processor::{EntryProcessor, FormatEntries};
use crate::rotate::{
    DateBasedLogFile, RotationStrategy, Rotater, RotaterOptions, ShiftingLogFile, StreamStrategy,
};
use clap::Args;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    /// Path to the HCL config describing the output
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log files or glob patterns to read instead of stdin
    pub files: Vec<String>,
}

/// Decodes sawmill lines and rewrites them through the configured rotating
/// output, keeping every record on a single file.
pub fn ingest(args: &IngestArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SawmillConfig::default(),
    };

    let format = config.format_options()?;
    let parser = config.parser_options()?;
    let rotater = config.rotater_options();

    match config.output_target() {
        OutputTarget::Stdout => run(
            StreamStrategy::default(),
            rotater,
            format,
            parser,
            &args.files,
        ),
        OutputTarget::Shifting(options) => {
            info!(path = %options.path.display(), "ingesting into shifting log file");
            run(
                ShiftingLogFile::new(options),
                rotater,
                format,
                parser,
                &args.files,
            )
        }
        OutputTarget::DateBased(options) => {
            info!(basedir = %options.basedir.display(), "ingesting into date based log files");
            run(
                DateBasedLogFile::new(options),
                rotater,
                format,
                parser,
                &args.files,
            )
        }
    }
}

fn run<S: RotationStrategy>(
    strategy: S,
    rotater: RotaterOptions,
    format: FormatOptions,
    parser: ParserOptions,
    files: &[String],
) -> anyhow::Result<()> {
    let mut output = FormatEntries::to_rotater(Rotater::with_options(strategy, rotater), format);

    if files.is_empty() {
        read_stdin(io::stdin().lock(), &mut output, parser)?;
    } else {
        open_files(files, &mut output, IngestOptions { parser, finish: true })?;
    }

    Ok(())
}

fn read_stdin(
    input: impl BufRead,
    output: &mut impl EntryProcessor,
    parser: ParserOptions,
) -> anyhow::Result<()> {
    Parser::new(input, parser).parse_all(output)?;
    output.finish()?;
    Ok(())
}
