//! CLI frontend for the TRPG log viewer.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{FilterArgs, SourceArgs};

#[derive(Parser)]
#[command(
    name = "tlv",
    about = "tlv, a viewer for TRPG session logs",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a log: title, entries, characters, channels
    Info {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List chapters with their start positions and pages
    Chapters {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print one page of the transcript
    Page {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Jump to the page where this chapter starts (id or name)
        #[arg(long, conflicts_with = "page")]
        chapter: Option<String>,

        /// Show every filtered entry instead of one page
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Search entries by text, speaker, or roll
    Search {
        /// Text to look for
        #[arg(value_name = "QUERY")]
        pattern: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Render the current view to a file format
    Render {
        /// Output format: html, markdown, text
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Render every filtered entry instead of one page
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Classify roll results: a given text, or every roll in a log
    Classify {
        /// Result text to classify (default: every roll in the log)
        text: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Info { source } => commands::info::run(&source),
        Commands::Chapters { source, filter } => commands::chapters::run(&source, &filter),
        Commands::Page {
            page,
            chapter,
            all,
            source,
            filter,
        } => commands::page::run(&source, &filter, page, chapter.as_deref(), all),
        Commands::Search {
            pattern,
            source,
            filter,
        } => commands::search::run(&source, &filter, &pattern),
        Commands::Render {
            format,
            output,
            page,
            all,
            source,
            filter,
        } => commands::render::run(&source, &filter, &format, output.as_deref(), page, all),
        Commands::Classify { text, source } => commands::classify::run(&source, text.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
