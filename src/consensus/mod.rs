//! Consensus of the calls from several callers.
//!
//! Simple variants (SNVs and small indels) are keyed by location and allele.
//! Breakpoint pairs are keyed by a two-level index, outer by the first location
//! and inner by the mate; every level tolerates the configured position window.
//! Entries are never removed, later observations fold into the first matching
//! entry.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    breakpoints::{breakpoints_from_record, BreakpointPair, Patterns},
    common::median,
    locations::{Location, WindowedIndex},
    record::VcfRecord,
};

pub mod info;

pub use info::{aggregate_info, InfoSummary};

/// Callers supporting each `(reference, alternate)` allele at one location.
pub type AlleleCallers = IndexMap<(String, String), Vec<String>>;

/// Window sizes and strandedness of a `ConsensusStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Window for simple variant locations.
    pub allele_window: u32,
    /// Window for breakpoint locations, applied to both locations of a pair.
    pub sv_window: u32,
    /// Whether breakpoints only match with equal strand and direction.
    pub stranded: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            allele_window: 0,
            sv_window: 100,
            stranded: true,
        }
    }
}

/// Breakpoint pair supported by one or more calls.
#[derive(Debug, Clone)]
pub struct BreakpointEntry {
    /// First location as seen first.
    pub first: Location,
    /// Mate as seen first, `None` for looseends.
    pub second: Option<Location>,
    /// Distinct callers in order of appearance.
    pub callers: Vec<String>,
    /// Positions of the first location over all calls.
    pub first_positions: Vec<i64>,
    /// Positions of the mate over all calls.
    pub second_positions: Vec<i64>,
    /// Supporting records and the caller each came from.
    pub records: Vec<(String, Rc<VcfRecord>)>,
}

impl BreakpointEntry {
    fn new(first: Location, second: Option<Location>) -> Self {
        Self {
            first,
            second,
            callers: Vec::new(),
            first_positions: Vec::new(),
            second_positions: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Median positions of the first location and of the mate.
    pub fn median_positions(&self) -> (i64, Option<i64>) {
        (
            median(&self.first_positions).unwrap_or_else(|| self.first.pos()),
            median(&self.second_positions),
        )
    }
}

/// Both kinds of mates below one first location.
#[derive(Debug, Clone)]
struct MateSlots {
    paired: WindowedIndex<usize>,
    loose: Option<usize>,
}

/// Accumulates calls from all callers into consensus entries.
#[derive(Debug, Clone)]
pub struct ConsensusStore {
    config: StoreConfig,
    alleles: WindowedIndex<AlleleCallers>,
    pairs: WindowedIndex<MateSlots>,
    entries: Vec<BreakpointEntry>,
}

impl Default for ConsensusStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl ConsensusStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            alleles: WindowedIndex::with_strandedness(config.allele_window, config.stranded),
            pairs: WindowedIndex::with_strandedness(config.sv_window, config.stranded),
            entries: Vec::new(),
        }
    }

    /// Register that `caller` reports `reference` > `alternate` at `location`.
    pub fn add_simple_variant(
        &mut self,
        location: &Location,
        reference: &str,
        alternate: &str,
        caller: &str,
    ) {
        let callers = self
            .alleles
            .get_or_insert_with(location, IndexMap::new)
            .entry((reference.to_string(), alternate.to_string()))
            .or_default();
        if !callers.iter().any(|known| known == caller) {
            callers.push(caller.to_string());
        }
    }

    /// Register that `caller` reports the junction `pair` in `record`.
    pub fn add_breakpoint_pair(
        &mut self,
        pair: &BreakpointPair,
        caller: &str,
        record: Rc<VcfRecord>,
    ) {
        let first = self
            .pairs
            .find(&pair.first)
            .cloned()
            .unwrap_or_else(|| pair.first.clone());
        let (window, stranded) = (self.config.sv_window, self.config.stranded);
        let slots = self
            .pairs
            .get_or_insert_with(&pair.first, || MateSlots {
                paired: WindowedIndex::with_strandedness(window, stranded),
                loose: None,
            });

        let idx = match &pair.second {
            Some(second) => match slots.paired.get(second) {
                Some(idx) => *idx,
                None => {
                    let idx = self.entries.len();
                    slots.paired.insert(second.clone(), idx);
                    self.entries
                        .push(BreakpointEntry::new(first, Some(second.clone())));
                    idx
                }
            },
            None => match slots.loose {
                Some(idx) => idx,
                None => {
                    let idx = self.entries.len();
                    slots.loose = Some(idx);
                    self.entries.push(BreakpointEntry::new(first, None));
                    idx
                }
            },
        };

        let entry = &mut self.entries[idx];
        if !entry.callers.iter().any(|known| known == caller) {
            entry.callers.push(caller.to_string());
        }
        entry.first_positions.push(pair.first.pos());
        if let Some(second) = &pair.second {
            entry.second_positions.push(second.pos());
        }
        entry.records.push((caller.to_string(), record));
    }

    /// Register all calls of `record`.
    ///
    /// Records whose first alternate allele is in SV notation, and all records
    /// with `force_sv`, are registered as breakpoint pairs.  Otherwise each
    /// alternate allele is a simple variant at the record's position.
    pub fn add_record(
        &mut self,
        record: VcfRecord,
        caller: &str,
        force_sv: bool,
        patterns: &Patterns,
    ) -> Result<(), anyhow::Error> {
        let is_sv = force_sv
            || match record.alternates.first() {
                Some(alt) => patterns
                    .classify_alt(alt, &record.reference)?
                    .is_structural(),
                None => false,
            };

        if is_sv {
            let pairs = breakpoints_from_record(&record, patterns)?;
            let record = Rc::new(record);
            for pair in &pairs {
                self.add_breakpoint_pair(pair, caller, Rc::clone(&record));
            }
        } else {
            let location = Location::new(record.chrom.as_str(), record.pos);
            for alt in record.alternates.iter().filter(|alt| alt.as_str() != ".") {
                self.add_simple_variant(&location, &record.reference, alt, caller);
            }
        }

        Ok(())
    }

    pub fn contains_simple_variant(
        &self,
        location: &Location,
        reference: &str,
        alternate: &str,
    ) -> bool {
        self.alleles
            .get(location)
            .map(|alleles| alleles.contains_key(&(reference.to_string(), alternate.to_string())))
            .unwrap_or(false)
    }

    fn entry_idx(&self, first: &Location, second: Option<&Location>) -> Option<usize> {
        let slots = self.pairs.get(first)?;
        match second {
            Some(second) => slots.paired.get(second).copied(),
            None => slots.loose,
        }
    }

    pub fn contains_pair(&self, first: &Location, second: Option<&Location>) -> bool {
        self.entry_idx(first, second).is_some()
    }

    /// The entry that the pair `first`, `second` resolves to.
    pub fn get_pair(
        &self,
        first: &Location,
        second: Option<&Location>,
    ) -> Option<&BreakpointEntry> {
        self.entry_idx(first, second).map(|idx| &self.entries[idx])
    }

    /// Median positions of the entry `first`, `second` resolves to.
    pub fn median_positions(
        &self,
        first: &Location,
        second: Option<&Location>,
    ) -> Option<(i64, Option<i64>)> {
        self.get_pair(first, second)
            .map(BreakpointEntry::median_positions)
    }

    /// Simple variant locations with their alleles, in order of appearance.
    pub fn simple_variants(&self) -> impl Iterator<Item = (&Location, &AlleleCallers)> {
        self.alleles.iter()
    }

    /// Breakpoint entries in order of appearance.
    pub fn breakpoint_entries(&self) -> &[BreakpointEntry] {
        &self.entries
    }

    /// Number of simple variant alleles and breakpoint entries.
    pub fn len(&self) -> usize {
        self.alleles.values().map(IndexMap::len).sum::<usize>() + self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
