//! Merge the callsets of several callers into one consensus VCF.

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Instant,
};

use clap::{command, Parser};
use thousands::Separable;

use crate::{
    breakpoints::Patterns,
    common::{
        io::{expand_path_list, open_write_or_stdout},
        is_primary_chrom, trace_rss_now,
    },
    consensus::{ConsensusStore, StoreConfig},
    record::VcfReader,
};

pub mod output;

pub use output::write_merged;

/// Command line arguments for `merge` sub command.
#[derive(Parser, Debug)]
#[command(about = "Merge variant calls from several callers", long_about = None)]
pub struct Args {
    /// Input VCF files, use `@path` to read paths from a file, one per line.
    #[arg(required = true)]
    pub path_input: Vec<String>,
    /// Path to the output VCF file, stdout if omitted.
    #[arg(long)]
    pub path_output: Option<PathBuf>,
    /// Caller labels, one per input file; default is the file name without
    /// its extension.
    #[arg(long, value_delimiter = ',')]
    pub labels: Vec<String>,
    /// Interpret all records as SVs, e.g., huge indels.
    #[arg(long, default_value_t = false)]
    pub force_sv: bool,
    /// Include records that failed one or more filters.
    #[arg(long, default_value_t = false)]
    pub include_filtered: bool,
    /// Window for comparing breakpoint positions.
    #[arg(long, default_value_t = 100)]
    pub sv_window: u32,
    /// Window for comparing positions of simple variants.
    #[arg(long, default_value_t = 0)]
    pub allele_window: u32,
    /// Match breakpoints regardless of strand and direction.
    #[arg(long, default_value_t = false)]
    pub unstranded: bool,
    /// Mark calls with fewer callers as LOWSUPPORT.
    #[arg(long, default_value_t = 1)]
    pub min_callers: usize,
    /// Keep records on unplaced contigs, decoys and the mitochondrion.
    #[arg(long, default_value_t = false)]
    pub no_filter_chroms: bool,
    /// Do not write the supporting records after each breakpoint call.
    #[arg(long, default_value_t = false)]
    pub no_audit_lines: bool,
    /// Sort output by chromosome and position.
    #[arg(long, default_value_t = false)]
    pub sort_output: bool,
}

/// Merge behaviour derived from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSettings {
    pub store: StoreConfig,
    pub force_sv: bool,
    pub include_filtered: bool,
    pub filter_chroms: bool,
    pub min_callers: usize,
    pub audit_lines: bool,
    pub sort_output: bool,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            force_sv: false,
            include_filtered: false,
            filter_chroms: true,
            min_callers: 1,
            audit_lines: true,
            sort_output: false,
        }
    }
}

impl From<&Args> for MergeSettings {
    fn from(args: &Args) -> Self {
        Self {
            store: StoreConfig {
                allele_window: args.allele_window,
                sv_window: args.sv_window,
                stranded: !args.unstranded,
            },
            force_sv: args.force_sv,
            include_filtered: args.include_filtered,
            filter_chroms: !args.no_filter_chroms,
            min_callers: args.min_callers,
            audit_lines: !args.no_audit_lines,
            sort_output: args.sort_output,
        }
    }
}

/// Labels for the callers behind `paths`.
///
/// Explicit `labels` must match `paths` in number.
pub fn caller_labels(paths: &[String], labels: &[String]) -> Result<Vec<String>, anyhow::Error> {
    if labels.is_empty() {
        Ok(paths
            .iter()
            .map(|path| {
                Path::new(path)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone())
            })
            .collect())
    } else if labels.len() == paths.len() {
        Ok(labels.to_vec())
    } else {
        anyhow::bail!(
            "got {} labels for {} input files",
            labels.len(),
            paths.len()
        )
    }
}

/// Add the records of the callset at `path` as calls of `caller`.
///
/// Returns the number of records added.  Records added before an error stay in
/// `store`.
pub fn add_source(
    store: &mut ConsensusStore,
    path: &str,
    caller: &str,
    settings: &MergeSettings,
    patterns: &Patterns,
) -> Result<usize, anyhow::Error> {
    let before_parsing = Instant::now();
    let mut prev = Instant::now();
    let mut count_records = 0usize;
    for record in VcfReader::from_path(path)? {
        let record = record?;
        if !settings.include_filtered && !record.filter.is_pass() {
            continue;
        }
        if settings.filter_chroms && !is_primary_chrom(&record.chrom) {
            continue;
        }

        let (chrom, pos) = (record.chrom.clone(), record.pos);
        store
            .add_record(record, caller, settings.force_sv, patterns)
            .map_err(|e| anyhow::anyhow!("problem with record at {}:{}: {}", &chrom, pos, e))?;

        // Write out progress indicator every 60 seconds.
        if prev.elapsed().as_secs() >= 60 {
            tracing::info!("at {}:{}", &chrom, pos);
            prev = Instant::now();
        }
        count_records += 1;
    }
    tracing::debug!(
        "total time spent reading {} records from {}: {:?}",
        count_records.separate_with_commas(),
        path,
        before_parsing.elapsed()
    );

    Ok(count_records)
}

/// Main entry point for the `merge` sub command.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("Starting `merge`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let paths = expand_path_list(&args.path_input)?;
    let labels = caller_labels(&paths, &args.labels)?;
    tracing::debug!(
        "final input file list is (#: {}): {:?}",
        paths.len(),
        &paths
    );

    let settings = MergeSettings::from(args);
    let patterns = Patterns::new()?;
    let mut store = ConsensusStore::new(settings.store);

    let before_merging = Instant::now();
    for (path, caller) in paths.iter().zip(labels.iter()) {
        match add_source(&mut store, path, caller, &settings, &patterns) {
            Ok(count) => tracing::info!(
                "added {} records of {} from {}",
                count.separate_with_commas(),
                caller,
                path
            ),
            Err(e) => tracing::warn!(
                "skipping rest of {} ({}): {}",
                path,
                caller,
                e
            ),
        }
        trace_rss_now();
    }
    tracing::info!(
        "merged {} files into {} calls in {:?}",
        paths.len().separate_with_commas(),
        store.len().separate_with_commas(),
        before_merging.elapsed()
    );

    let mut writer = open_write_or_stdout(args.path_output.as_ref())?;
    let count = write_merged(&mut writer, &store, &settings)?;
    writer.flush()?;
    tracing::info!("wrote {} consensus calls", count.separate_with_commas());

    Ok(())
}
