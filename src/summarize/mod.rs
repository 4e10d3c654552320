//! Read a merged callset back into per-caller call sets.

use std::{io::Write, path::PathBuf};

use clap::{command, Parser};
use indexmap::IndexMap;
use itertools::Itertools;
use thousands::Separable;

use crate::{
    common::{io::open_write_or_stdout, is_primary_chrom},
    record::VcfReader,
};

/// Command line arguments for `summarize` sub command.
#[derive(Parser, Debug)]
#[command(about = "Summarize a merged callset by caller as JSON", long_about = None)]
pub struct Args {
    /// Path to the merged VCF file.
    #[arg(long)]
    pub path_input: String,
    /// Path to the output JSON file, stdout if omitted.
    #[arg(long)]
    pub path_output: Option<PathBuf>,
    /// Callers to ignore.
    #[arg(long, value_delimiter = ',')]
    pub skip_callers: Vec<String>,
    /// Keep calls on unplaced contigs, decoys and the mitochondrion.
    #[arg(long, default_value_t = false)]
    pub no_filter_chroms: bool,
}

/// One call of the merged callset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MergedCall {
    pub num_callers: usize,
    pub chrom: String,
    pub pos: i64,
    pub reference: String,
    /// First alternate allele, `.` if there is none.
    pub alternate: String,
    /// Comma-separated caller names.
    pub callers: String,
}

/// Calls of a merged callset and which caller made them.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MergedCalls {
    /// Caller name to caller index, in order of first appearance.
    pub caller_idx: IndexMap<String, usize>,
    /// Indices into `calls` for each caller index.
    pub callsets: Vec<Vec<usize>>,
    pub calls: Vec<MergedCall>,
}

impl MergedCalls {
    /// Register a call of `callers`; calls without any caller are ignored.
    fn push(&mut self, call: MergedCall, callers: &[String]) {
        if callers.is_empty() {
            return;
        }
        let call_idx = self.calls.len();
        for caller in callers {
            let next_idx = self.caller_idx.len();
            let caller_idx = *self.caller_idx.entry(caller.clone()).or_insert(next_idx);
            if caller_idx == self.callsets.len() {
                self.callsets.push(Vec::new());
            }
            self.callsets[caller_idx].push(call_idx);
        }
        self.calls.push(call);
    }
}

/// Read the merged callset at `path`.
///
/// Callers in `skip_callers` are ignored; with `filter_chroms`, so are calls on
/// contigs that are not primary chromosomes.
pub fn read_merged_calls(
    path: &str,
    filter_chroms: bool,
    skip_callers: &[String],
) -> Result<MergedCalls, anyhow::Error> {
    let mut result = MergedCalls::default();
    for record in VcfReader::from_path(path)? {
        let record = record?;
        if filter_chroms && !is_primary_chrom(&record.chrom) {
            continue;
        }

        let callers: Vec<String> = record
            .info
            .values("Callers")
            .unwrap_or_default()
            .iter()
            .filter(|caller| !skip_callers.contains(caller))
            .unique()
            .cloned()
            .collect();

        let call = MergedCall {
            num_callers: callers.len(),
            chrom: record.chrom.clone(),
            pos: record.pos,
            reference: record.reference.clone(),
            alternate: record
                .alternates
                .first()
                .cloned()
                .unwrap_or_else(|| String::from(".")),
            callers: callers.join(","),
        };
        result.push(call, &callers);
    }
    Ok(result)
}

/// Main entry point for the `summarize` sub command.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("Starting `summarize`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let merged = read_merged_calls(&args.path_input, !args.no_filter_chroms, &args.skip_callers)?;
    tracing::info!(
        "read {} calls from {} callers",
        merged.calls.len().separate_with_commas(),
        merged.caller_idx.len()
    );

    let mut writer = open_write_or_stdout(args.path_output.as_ref())?;
    serde_json::to_writer_pretty(&mut writer, &merged)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
