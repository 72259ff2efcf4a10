use clap::{Parser, Subcommand};
use sawmill_core::cli::{self, CatArgs, CountArgs, IngestArgs, RecordsArgs};
use sawmill_core::logging::{self, LogMode, init_logging};
use std::io;

#[derive(Parser, Debug)]
#[command(
    name = "sawmill",
    version,
    about = "Sawmill: structured, record-oriented log tooling"
)]
struct Cli {
    /// Print the wire format without colors
    #[arg(long, global = true, conflicts_with = "pretty")]
    raw: bool,

    /// Color output even when stdout is not a terminal
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge log files by timestamp and print their entries
    Cat(CatArgs),

    /// Assemble records and print them
    Records(RecordsArgs),

    /// Count entries, unknown lines and records
    Count(CountArgs),

    /// Rewrite log lines through a rotating output
    Ingest(IngestArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let mode = if cli.raw {
        LogMode::Raw
    } else if cli.pretty {
        LogMode::Pretty
    } else {
        logging::default_log_mode()
    };
    tracing::debug!(?mode, "starting");

    let stdout = io::stdout();
    match cli.command {
        Command::Cat(args) => cli::cat(&args, mode, stdout.lock()),
        Command::Records(args) => cli::records(&args, mode, stdout.lock()),
        Command::Count(args) => cli::count(&args, mode, stdout.lock()),
        Command::Ingest(args) => cli::ingest(&args),
    }
}
