//! Common functionality.

use std::cmp::Ordering;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

pub use io::{open_read_maybe_gz, open_write_maybe_gz, read_lines};

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Helper to print the current memory resident set size via `tracing`.
pub fn trace_rss_now() {
    let rss = procfs::process::Process::myself()
        .and_then(|me| me.stat())
        .map(|stat| stat.rss * procfs::page_size());
    match rss {
        Ok(rss) => tracing::debug!("RSS now: {}", bytesize::ByteSize::b(rss)),
        Err(e) => tracing::trace!("could not determine RSS: {}", e),
    }
}

/// Prefixes of contigs that are not primary chromosomes (unplaced, mitochondrial, decoy).
const NON_PRIMARY_PREFIXES: &[&str] = &["GL", "MT", "hs", "M"];

/// Is the variant on a primary chromosome rather than another contig?
pub fn is_primary_chrom(chrom: &str) -> bool {
    !NON_PRIMARY_PREFIXES
        .iter()
        .any(|prefix| chrom.starts_with(prefix))
}

/// Strip a leading `chr` from chromosome names.
///
/// Any name starting with `c` is assumed to carry the prefix.
pub fn canonical_chrom(chrom: &str) -> &str {
    if chrom.starts_with('c') {
        chrom.get(3..).unwrap_or_default()
    } else {
        chrom
    }
}

/// Compare chromosome names numerically if both are numbers, lexicographically otherwise.
pub fn compare_chroms(lhs: &str, rhs: &str) -> Ordering {
    match (lhs.parse::<i64>(), rhs.parse::<i64>()) {
        (Ok(lhs), Ok(rhs)) => lhs.cmp(&rhs),
        _ => lhs.cmp(rhs),
    }
}

/// Median of `values`; the lower of the two middle elements for even counts.
///
/// Returns `None` for empty input.
pub fn median<T: Ord + Clone>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    Some(sorted[(sorted.len() - 1) / 2].clone())
}

/// Return the version of the `varmerge` crate and `x.y.z` in tests.
pub fn worker_version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        env!("CARGO_PKG_VERSION")
    }
}
