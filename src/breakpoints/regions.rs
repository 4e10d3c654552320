//! Regions around the breakpoints of a single callset, written as BED.

use std::{path::PathBuf, time::Instant};

use clap::{command, Parser};
use thousands::Separable;

use crate::{
    common::{io::open_write_or_stdout, trace_rss_now},
    locations::{Location, WindowedIndex},
    record::VcfReader,
};

use super::{breakpoints_from_record, BreakpointPair, Patterns};

/// Command line arguments for `bkpt-regions` sub command.
#[derive(Parser, Debug)]
#[command(about = "Write regions around SV breakpoints as BED", long_about = None)]
pub struct Args {
    /// Path to the input VCF file, may be gzip-compressed.
    #[arg(long)]
    pub path_input: String,
    /// Path to the output BED file, stdout if omitted.
    #[arg(long)]
    pub path_output: Option<PathBuf>,
    /// Width of the region around each breakpoint, also the tolerance for
    /// considering two breakpoints the same.
    #[arg(long, default_value_t = 300)]
    pub width: u32,
}

/// Breakpoint locations of a callset, split by first location and mate.
#[derive(Debug)]
pub struct BreakpointRegions {
    width: u32,
    firsts: WindowedIndex<()>,
    mates: WindowedIndex<()>,
}

impl BreakpointRegions {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            firsts: WindowedIndex::new(width),
            mates: WindowedIndex::new(width),
        }
    }

    pub fn add(&mut self, pair: &BreakpointPair) {
        self.firsts.get_or_insert_with(&pair.first, || ());
        if let Some(second) = &pair.second {
            self.mates.get_or_insert_with(second, || ());
        }
    }

    /// All distinct locations, first locations before mate-only ones.
    ///
    /// Also returns the number of locations that were seen only as first
    /// location or only as mate.
    pub fn finish(&mut self) -> (Vec<Location>, usize) {
        let mut unmatched = self
            .firsts
            .keys()
            .filter(|first| !self.mates.contains(first))
            .count();
        for mate in self.mates.keys() {
            if !self.firsts.contains(mate) {
                unmatched += 1;
                self.firsts.insert(mate.clone(), ());
            }
        }
        (self.firsts.keys().cloned().collect(), unmatched)
    }

    /// 0-based start and end of the region around `location`.
    pub fn region(&self, location: &Location) -> (i64, i64) {
        let half = self.width as i64 / 2;
        ((location.pos() - half).max(0), location.pos() + half)
    }
}

/// Main entry point for the `bkpt-regions` sub command.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("Starting `bkpt-regions`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let patterns = Patterns::new()?;
    let mut regions = BreakpointRegions::new(args.width);

    let before_parsing = Instant::now();
    let mut count_records = 0usize;
    for record in VcfReader::from_path(&args.path_input)? {
        let record = record?;
        if !record.filter.is_pass() {
            continue;
        }
        let pairs = breakpoints_from_record(&record, &patterns).map_err(|e| {
            anyhow::anyhow!("problem with record {}:{}: {}", &record.chrom, record.pos, e)
        })?;
        for pair in &pairs {
            regions.add(pair);
        }
        count_records += 1;
    }
    tracing::info!(
        "read {} passing records in {:?}",
        count_records.separate_with_commas(),
        before_parsing.elapsed()
    );
    trace_rss_now();

    let (locations, unmatched) = regions.finish();
    tracing::info!(
        "{} of {} breakpoints not found as both first location and mate",
        unmatched.separate_with_commas(),
        locations.len().separate_with_commas()
    );

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .from_writer(open_write_or_stdout(args.path_output.as_ref())?);
    for location in &locations {
        let (start, end) = regions.region(location);
        writer.write_record(&[
            location.chrom().to_string(),
            start.to_string(),
            end.to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
