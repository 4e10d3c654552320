//! Signed genomic locations, e.g., the endpoints of half-intervals.

use std::{cmp::Ordering, fmt, ops::Add};

use crate::common::compare_chroms;

pub mod index;

pub use index::WindowedIndex;

/// Strand of a location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
pub enum Strand {
    #[default]
    #[strum(serialize = "+")]
    Forward,
    #[strum(serialize = "-")]
    Reverse,
}

impl Strand {
    /// The opposite strand.
    pub fn flipped(self) -> Self {
        match self {
            Strand::Forward => Strand::Reverse,
            Strand::Reverse => Strand::Forward,
        }
    }
}

/// A position on a chromosome with strand and the direction the half-interval opens to.
///
/// Equality and ordering only look at chromosome and position, strand and direction
/// are ignored.  Chromosomes compare numerically where both names are numbers.
#[derive(Debug, Clone)]
pub struct Location {
    chrom: String,
    pos: i64,
    strand: Strand,
    extends_right: bool,
}

impl Location {
    /// Forward-strand location extending to the left.
    pub fn new(chrom: impl Into<String>, pos: i64) -> Self {
        Self::with_orientation(chrom, pos, Strand::Forward, false)
    }

    pub fn with_orientation(
        chrom: impl Into<String>,
        pos: i64,
        strand: Strand,
        extends_right: bool,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            strand,
            extends_right,
        }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn pos(&self) -> i64 {
        self.pos
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn extends_right(&self) -> bool {
        self.extends_right
    }

    pub fn is_reverse(&self) -> bool {
        self.strand == Strand::Reverse
    }

    /// Same location, moved by `offset`.
    pub fn shifted(&self, offset: i64) -> Self {
        self.with_pos(self.pos + offset)
    }

    /// Same location, at `pos`.
    pub fn with_pos(&self, pos: i64) -> Self {
        Self {
            pos,
            ..self.clone()
        }
    }

    /// Same location on the opposite strand.
    pub fn reverse_complement(&self) -> Self {
        Self {
            strand: self.strand.flipped(),
            ..self.clone()
        }
    }

    /// Whether `other` lies on the same chromosome within `window` bases.
    ///
    /// With `strand_test`, the strands must match as well.
    pub fn overlaps(&self, other: &Location, strand_test: bool, window: i64) -> bool {
        self.chrom == other.chrom
            && (!strand_test || self.strand == other.strand)
            && (self.pos - other.pos).abs() <= window
    }

    /// Total order that breaks position ties by orientation.
    pub fn cmp_oriented(&self, other: &Location) -> Ordering {
        self.cmp(other)
            .then_with(|| (self.strand == Strand::Reverse).cmp(&(other.strand == Strand::Reverse)))
            .then_with(|| self.extends_right.cmp(&other.extends_right))
    }
}

impl Add<i64> for &Location {
    type Output = Location;

    fn add(self, offset: i64) -> Location {
        self.shifted(offset)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Location {}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_chroms(&self.chrom, &other.chrom).then_with(|| self.pos.cmp(&other.pos))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}", self.chrom, self.pos)?;
        if self.is_reverse() || self.extends_right {
            let extent = if self.extends_right { "R" } else { "L" };
            write!(f, ",{}{}", self.strand, extent)?;
        }
        write!(f, ")")
    }
}
