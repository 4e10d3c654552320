//! varmerge main executable

pub mod breakpoints;
pub mod common;
pub mod consensus;
pub mod err;
pub mod locations;
pub mod merge;
pub mod record;
pub mod summarize;

use clap::{Parser, Subcommand};
use console::{Emoji, Term};

/// CLI parser based on clap.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Merge SNV, indel and SV calls of several callers",
    long_about = "This tool merges the VCF files of several variant callers into one \
                  consensus VCF, normalizing the breakpoints of structural variants"
)]
struct Cli {
    /// Commonly used arguments
    #[command(flatten)]
    common: common::Args,

    /// The sub command to run
    #[command(subcommand)]
    command: Commands,
}

/// Enum supporting the parsing of top-level commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Merge callsets into one consensus VCF.
    Merge(merge::Args),
    /// Write regions around the breakpoints of a callset as BED.
    BkptRegions(breakpoints::regions::Args),
    /// Summarize a merged callset by caller.
    Summarize(summarize::Args),
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Build a tracing subscriber according to the configuration in `cli.common`.
    let collector = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(match cli.common.verbose.log_level() {
            Some(level) => match level {
                log::Level::Error => tracing::Level::ERROR,
                log::Level::Warn => tracing::Level::WARN,
                log::Level::Info => tracing::Level::INFO,
                log::Level::Debug => tracing::Level::DEBUG,
                log::Level::Trace => tracing::Level::TRACE,
            },
            None => tracing::Level::INFO,
        })
        .compact()
        .finish();

    // Install collector and go into sub commands.
    let term = Term::stderr();
    tracing::subscriber::with_default(collector, || {
        match &cli.command {
            Commands::Merge(args) => merge::run(&cli.common, args)?,
            Commands::BkptRegions(args) => breakpoints::regions::run(&cli.common, args)?,
            Commands::Summarize(args) => summarize::run(&cli.common, args)?,
        }

        Ok::<(), anyhow::Error>(())
    })?;
    term.write_line(&format!("All done. Have a nice day!{}", Emoji(" 😃", "")))?;

    Ok(())
}
