//! Conversion of variant records into canonical pairs of breakpoint locations.
//!
//! Callers describe the same junction in different ways: symbolic alleles such as
//! `<DEL>` with `INFO/END`, breakend notation such as `N[3:1200[`, single breakends
//! (looseends) such as `N.`, or simply a long reference/alternate allele.  All of
//! them are turned into ordered pairs of signed `Location`s here.

use std::{cmp::Ordering, fmt, str::FromStr};

use regex::Regex;

use crate::{
    common::canonical_chrom,
    err::BreakpointError,
    locations::{Location, Strand},
    record::{Filter, Info, VcfRecord},
};

pub mod regions;

/// Which ends of the two joined segments meet at a breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum ConnectionType {
    #[strum(serialize = "3to5")]
    ThreeToFive,
    #[strum(serialize = "5to3")]
    FiveToThree,
    #[strum(serialize = "5to5")]
    FiveToFive,
    #[strum(serialize = "3to3")]
    ThreeToThree,
}

impl ConnectionType {
    /// Whether the first location extends right, strand and direction of the second one.
    pub fn orientation(self) -> (bool, Strand, bool) {
        match self {
            ConnectionType::ThreeToFive => (false, Strand::Forward, true),
            ConnectionType::FiveToThree => (true, Strand::Forward, false),
            ConnectionType::FiveToFive => (true, Strand::Reverse, true),
            ConnectionType::ThreeToThree => (false, Strand::Reverse, false),
        }
    }

    /// Inverse of `orientation()`.
    pub fn from_orientation(
        first_extends_right: bool,
        second_strand: Strand,
        second_extends_right: bool,
    ) -> Option<Self> {
        [
            ConnectionType::ThreeToFive,
            ConnectionType::FiveToThree,
            ConnectionType::FiveToFive,
            ConnectionType::ThreeToThree,
        ]
        .into_iter()
        .find(|ct| ct.orientation() == (first_extends_right, second_strand, second_extends_right))
    }
}

/// Type of a structural variant as far as breakpoint construction is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SvType {
    Del,
    DelMeAlu,
    Dup,
    DupTandem,
    Ins,
    InsMeL1,
    Inv,
    Tra,
    Bnd,
    Other(String),
}

impl FromStr for SvType {
    type Err = std::convert::Infallible;

    /// Parse VCF SV type names and the `SVCLASS` vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DEL" | "deletion" => SvType::Del,
            "DEL:ME:ALU" => SvType::DelMeAlu,
            "DUP" | "duplication" => SvType::Dup,
            "DUP:TANDEM" | "tandem_dup" => SvType::DupTandem,
            "INS" => SvType::Ins,
            "INS:ME:L1" => SvType::InsMeL1,
            "INV" | "inversion" => SvType::Inv,
            "TRA" | "long_range" | "inter_chr" => SvType::Tra,
            "BND" => SvType::Bnd,
            _ => SvType::Other(s.to_string()),
        })
    }
}

impl fmt::Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SvType::Del => "DEL",
            SvType::DelMeAlu => "DEL:ME:ALU",
            SvType::Dup => "DUP",
            SvType::DupTandem => "DUP:TANDEM",
            SvType::Ins => "INS",
            SvType::InsMeL1 => "INS:ME:L1",
            SvType::Inv => "INV",
            SvType::Tra => "TRA",
            SvType::Bnd => "BND",
            SvType::Other(s) => s,
        };
        write!(f, "{}", s)
    }
}

/// Two breakpoint locations joined by a call; `second` is `None` for looseends.
#[derive(Debug, Clone)]
pub struct BreakpointPair {
    pub first: Location,
    pub second: Option<Location>,
}

impl BreakpointPair {
    /// Canonical pair for the breakpoints `a` and `b`, see `order_breakpoints()`.
    pub fn ordered(a: Location, b: Location) -> Self {
        let (first, second) = order_breakpoints(a, b);
        Self {
            first,
            second: Some(second),
        }
    }

    /// Pair without a known mate.
    pub fn loose(first: Location) -> Self {
        let first = if first.is_reverse() {
            first.reverse_complement()
        } else {
            first
        };
        Self {
            first,
            second: None,
        }
    }

    pub fn is_loose(&self) -> bool {
        self.second.is_none()
    }

    /// Connection type implied by the orientations of the two locations.
    pub fn connection_type(&self) -> Option<ConnectionType> {
        let second = self.second.as_ref()?;
        ConnectionType::from_orientation(
            self.first.extends_right(),
            second.strand(),
            second.extends_right(),
        )
    }
}

impl fmt::Display for BreakpointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.second {
            Some(second) => write!(f, "{}-{}", self.first, second),
            None => write!(f, "{}-.", self.first),
        }
    }
}

/// Put two breakpoints into canonical order.
///
/// The earlier location comes first, position ties are broken by orientation.  If
/// the first location is on the reverse strand, both locations are flipped to the
/// other strand so the pair describes the same junction from the forward strand.
/// The result does not depend on the order of the arguments.
pub fn order_breakpoints(a: Location, b: Location) -> (Location, Location) {
    let (first, second) = if a.cmp_oriented(&b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    };
    if first.is_reverse() {
        (first.reverse_complement(), second.reverse_complement())
    } else {
        (first, second)
    }
}

/// Junction between `chrom:pos` and the optional mate with the given connection type.
pub fn translocation(
    chrom: &str,
    pos: i64,
    mate: Option<(&str, i64)>,
    connection_type: ConnectionType,
) -> BreakpointPair {
    let (first_extends_right, second_strand, second_extends_right) =
        connection_type.orientation();
    let first = Location::with_orientation(chrom, pos, Strand::Forward, first_extends_right);
    match mate {
        Some((mate_chrom, mate_pos)) => BreakpointPair::ordered(
            first,
            Location::with_orientation(mate_chrom, mate_pos, second_strand, second_extends_right),
        ),
        None => BreakpointPair::loose(first),
    }
}

/// Alternate allele as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AltAllele<'a> {
    /// `.`
    Null,
    /// `<TYPE>`
    Symbolic(&'a str),
    /// `<prefix><delim><mate_chrom>:<mate_pos><delim><suffix>`
    Breakend {
        prefix: &'a str,
        delim: char,
        mate_chrom: &'a str,
        mate_pos: i64,
        suffix: &'a str,
    },
    /// `REF.` (`joined_after`) or `.REF`
    LooseEnd { joined_after: bool },
    /// Sequence
    Plain(&'a str),
}

impl AltAllele<'_> {
    /// Whether the allele is written in SV notation.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AltAllele::Symbolic(_) | AltAllele::Breakend { .. } | AltAllele::LooseEnd { .. }
        )
    }
}

/// Connection type and inserted sequence length encoded by breakend notation.
///
/// Sequence before the bracket means the mate is joined after it.  A `]` means
/// the mate does not extend to the right.
fn breakend_connection(
    prefix: &str,
    delim: char,
    suffix: &str,
    reference: &str,
) -> (ConnectionType, i64) {
    let (joined_after, inserted) = if !prefix.is_empty() || suffix.is_empty() {
        (true, prefix)
    } else {
        (false, suffix)
    };
    let extends_right = delim == '[';
    let connection_type = match (joined_after, extends_right) {
        (true, true) => ConnectionType::ThreeToFive,
        (true, false) => ConnectionType::ThreeToThree,
        (false, true) => ConnectionType::FiveToFive,
        (false, false) => ConnectionType::FiveToThree,
    };
    (
        connection_type,
        inserted.len() as i64 - reference.len() as i64,
    )
}

/// Compiled patterns for recognizing SV notation.
#[derive(Debug, Clone)]
pub struct Patterns {
    symbolic: Regex,
    breakend: Regex,
    looseend: Regex,
}

impl Patterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            symbolic: Regex::new(r"^<([^<>]+)>$")?,
            breakend: Regex::new(
                r"^([ACGTNacgtn.]*)([\[\]])([a-zA-Z0-9._]+):(\d+)([\[\]])([ACGTNacgtn.]*)",
            )?,
            looseend: Regex::new(r"(?i)looseend")?,
        })
    }

    /// Decide the kind of the alternate allele `alt` of a record with `reference`.
    pub fn classify_alt<'a>(
        &self,
        alt: &'a str,
        reference: &str,
    ) -> Result<AltAllele<'a>, BreakpointError> {
        if alt == "." {
            return Ok(AltAllele::Null);
        }
        if let Some(caps) = self.breakend.captures(alt) {
            let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
            let (open, close) = (group(2), group(5));
            if open != close {
                return Err(BreakpointError::MismatchedDelimiters(alt.to_string()));
            }
            let (prefix, suffix) = (group(1), group(6));
            if !prefix.is_empty() && !suffix.is_empty() {
                return Err(BreakpointError::SequenceOnBothSides(alt.to_string()));
            }
            let mate_pos = group(4)
                .parse()
                .map_err(|_| BreakpointError::InvalidMatePosition(alt.to_string()))?;
            return Ok(AltAllele::Breakend {
                prefix,
                delim: if open == "[" { '[' } else { ']' },
                mate_chrom: group(3),
                mate_pos,
                suffix,
            });
        }
        if let Some(caps) = self.symbolic.captures(alt) {
            if let Some(sv_type) = caps.get(1) {
                return Ok(AltAllele::Symbolic(sv_type.as_str()));
            }
        }
        if let Some(sequence) = alt.strip_suffix('.') {
            if sequence == reference {
                return Ok(AltAllele::LooseEnd { joined_after: true });
            }
        }
        if let Some(sequence) = alt.strip_prefix('.') {
            if sequence == reference {
                return Ok(AltAllele::LooseEnd {
                    joined_after: false,
                });
            }
        }
        Ok(AltAllele::Plain(alt))
    }

    /// Whether the FILTER column marks the record as a looseend.
    pub fn is_looseend_filter(&self, filter: &Filter) -> bool {
        match filter {
            Filter::Failed(_) => self.looseend.is_match(&filter.to_string()),
            Filter::Missing | Filter::Pass => false,
        }
    }
}

/// SV description from the INFO column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvHints {
    pub chrom2: Option<String>,
    pub end: Option<i64>,
    pub connection_type: Option<ConnectionType>,
    pub sv_type: Option<SvType>,
    /// Whether `sv_type` comes from `SVCLASS`.
    pub from_svclass: bool,
    pub sv_len: Option<i64>,
}

impl SvHints {
    /// Extract `CHR2`, `END`, `CT`, `SVTYPE` (overridden by `SVCLASS`) and `SVLEN`.
    pub fn from_info(info: &Info) -> Result<Self, anyhow::Error> {
        let connection_type = info.get_str("CT").and_then(|ct| match ct.parse() {
            Ok(ct) => Some(ct),
            Err(_) => {
                tracing::debug!("ignoring unknown connection type {:?}", ct);
                None
            }
        });
        let from_svclass = info.get_str("SVCLASS").is_some_and(|s| !s.is_empty());
        let sv_type = info
            .get_str("SVCLASS")
            .or_else(|| info.get_str("SVTYPE"))
            .filter(|s| !s.is_empty())
            .map(|s| match s.parse::<SvType>() {
                Ok(sv_type) => sv_type,
                Err(never) => match never {},
            });
        Ok(Self {
            chrom2: info
                .get_str("CHR2")
                .map(|chrom2| canonical_chrom(chrom2).to_string()),
            end: info.get_int("END")?,
            connection_type,
            sv_type,
            from_svclass,
            sv_len: info.get_int("SVLEN")?,
        })
    }
}

/// What one alternate allele of a record says about the SV.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSv {
    pub sv_type: Option<SvType>,
    pub connection_type: Option<ConnectionType>,
    /// `None` for looseends.
    pub mate_chrom: Option<String>,
    pub mate_pos: Option<i64>,
    pub sv_len: Option<i64>,
}

impl ResolvedSv {
    /// Combine INFO hints, the allele notation and the FILTER state.
    pub fn resolve(
        chrom: &str,
        pos: i64,
        reference: &str,
        alt: &str,
        allele: &AltAllele<'_>,
        hints: &SvHints,
        looseend_filter: bool,
    ) -> Self {
        let mut resolved = Self {
            sv_type: hints.sv_type.clone(),
            connection_type: hints.connection_type,
            mate_chrom: Some(hints.chrom2.clone().unwrap_or_else(|| chrom.to_string())),
            mate_pos: hints.end,
            sv_len: hints.sv_len,
        };

        match allele {
            AltAllele::Symbolic(sv_type) if !hints.from_svclass => {
                resolved.sv_type = Some(match sv_type.parse() {
                    Ok(sv_type) => sv_type,
                    Err(never) => match never {},
                });
            }
            AltAllele::Breakend {
                prefix,
                delim,
                mate_chrom,
                mate_pos,
                suffix,
            } => {
                let (connection_type, inserted_len) =
                    breakend_connection(prefix, *delim, suffix, reference);
                resolved.connection_type = Some(connection_type);
                resolved.mate_chrom = Some(canonical_chrom(mate_chrom).to_string());
                resolved.mate_pos = Some(*mate_pos);
                resolved.sv_len.get_or_insert(inserted_len);
            }
            AltAllele::Symbolic(_)
            | AltAllele::LooseEnd { .. }
            | AltAllele::Null
            | AltAllele::Plain(_) => (),
        }

        let loose_default = match allele {
            _ if looseend_filter => Some(ConnectionType::FiveToThree),
            AltAllele::LooseEnd { joined_after: true } => Some(ConnectionType::FiveToThree),
            AltAllele::LooseEnd {
                joined_after: false,
            } => Some(ConnectionType::ThreeToFive),
            _ => None,
        };
        if let Some(default) = loose_default {
            resolved.mate_chrom = None;
            resolved.mate_pos = Some(0);
            resolved.connection_type.get_or_insert(default);
        } else if resolved.sv_type.is_none()
            && !matches!(allele, AltAllele::Breakend { .. } | AltAllele::Symbolic(_))
        {
            // plain sequence change, interpret as indel
            let reference_len = reference.len() as i64;
            resolved.mate_pos.get_or_insert(pos + reference_len);
            let sv_len = *resolved
                .sv_len
                .get_or_insert(alt.len() as i64 - reference_len);
            resolved.sv_type = Some(if sv_len > 0 { SvType::Ins } else { SvType::Del });
        }

        resolved
    }

    fn require_same_chrom(&self, chrom: &str, sv_type: &SvType) -> Result<(), BreakpointError> {
        if self.mate_chrom.as_deref() == Some(chrom) {
            Ok(())
        } else {
            Err(BreakpointError::MateOnOtherChromosome {
                sv_type: sv_type.to_string(),
                chrom: chrom.to_string(),
                mate_chrom: self.mate_chrom.clone(),
            })
        }
    }

    fn require_mate_pos(
        &self,
        chrom: &str,
        pos: i64,
        sv_type: &str,
    ) -> Result<i64, BreakpointError> {
        self.mate_pos
            .ok_or_else(|| BreakpointError::MissingMatePosition {
                sv_type: sv_type.to_string(),
                chrom: chrom.to_string(),
                pos,
            })
    }

    /// Build the breakpoint pairs for a call at `chrom:pos`.
    pub fn breakpoint_pairs(
        &self,
        chrom: &str,
        pos: i64,
    ) -> Result<Vec<BreakpointPair>, BreakpointError> {
        let sv_type = self.sv_type.clone().unwrap_or(SvType::Bnd);
        let type_name = sv_type.to_string();
        Ok(match &sv_type {
            SvType::Inv => {
                self.require_same_chrom(chrom, &sv_type)?;
                let end = self.require_mate_pos(chrom, pos, &type_name)?;
                vec![
                    translocation(
                        chrom,
                        pos,
                        Some((chrom, end - 1)),
                        ConnectionType::ThreeToThree,
                    ),
                    translocation(
                        chrom,
                        pos + 1,
                        Some((chrom, end)),
                        ConnectionType::FiveToFive,
                    ),
                ]
            }
            SvType::Dup | SvType::DupTandem => {
                let mate_chrom = self.mate_chrom.as_deref().unwrap_or(chrom);
                let end = self.require_mate_pos(chrom, pos, &type_name)?;
                match self.connection_type {
                    None
                    | Some(ConnectionType::FiveToThree)
                    | Some(ConnectionType::ThreeToFive) => vec![translocation(
                        chrom,
                        pos.min(end),
                        Some((mate_chrom, pos.max(end))),
                        ConnectionType::FiveToThree,
                    )],
                    Some(connection_type) => vec![translocation(
                        chrom,
                        pos,
                        Some((mate_chrom, end)),
                        connection_type,
                    )],
                }
            }
            SvType::Ins | SvType::InsMeL1 => {
                self.require_same_chrom(chrom, &sv_type)?;
                vec![BreakpointPair::ordered(
                    Location::new(chrom, pos),
                    Location::with_orientation(chrom, pos + 1, Strand::Forward, true),
                )]
            }
            SvType::Del | SvType::DelMeAlu => {
                self.require_same_chrom(chrom, &sv_type)?;
                let end = self.require_mate_pos(chrom, pos, &type_name)?;
                vec![translocation(
                    chrom,
                    pos.min(end),
                    Some((chrom, pos.max(end))),
                    ConnectionType::ThreeToFive,
                )]
            }
            SvType::Tra | SvType::Bnd | SvType::Other(_) => {
                if let SvType::Other(name) = &sv_type {
                    tracing::warn!(
                        "unknown SV type {:?} at {}:{}, interpreting as translocation",
                        name,
                        chrom,
                        pos
                    );
                }
                let connection_type = self
                    .connection_type
                    .unwrap_or(ConnectionType::ThreeToFive);
                let mate = match &self.mate_chrom {
                    Some(mate_chrom) => Some((
                        mate_chrom.as_str(),
                        self.require_mate_pos(chrom, pos, &type_name)?,
                    )),
                    None => None,
                };
                vec![translocation(chrom, pos, mate, connection_type)]
            }
        })
    }
}

/// Canonical breakpoint pairs for all alternate alleles of `record`.
///
/// A record without alternate alleles is a looseend at its position.
pub fn breakpoints_from_record(
    record: &VcfRecord,
    patterns: &Patterns,
) -> Result<Vec<BreakpointPair>, anyhow::Error> {
    let chrom = canonical_chrom(&record.chrom);
    if record.alternates.is_empty() {
        return Ok(vec![BreakpointPair::loose(Location::new(chrom, record.pos))]);
    }

    let hints = SvHints::from_info(&record.info)?;
    let looseend_filter = patterns.is_looseend_filter(&record.filter);
    let mut pairs = Vec::new();
    for alt in &record.alternates {
        let allele = patterns.classify_alt(alt, &record.reference)?;
        let resolved = ResolvedSv::resolve(
            chrom,
            record.pos,
            &record.reference,
            alt,
            &allele,
            &hints,
            looseend_filter,
        );
        pairs.extend(resolved.breakpoint_pairs(chrom, record.pos)?);
    }
    Ok(pairs)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{
        breakend_connection, breakpoints_from_record, order_breakpoints, AltAllele,
        ConnectionType, Patterns, ResolvedSv, SvHints, SvType,
    };
    use crate::{
        err::BreakpointError,
        locations::{Location, Strand},
        record::{record_from_line, VcfRecord},
    };

    fn record(
        chrom: &str,
        pos: i64,
        reference: &str,
        alt: &str,
        filter: &str,
        info: &str,
    ) -> VcfRecord {
        record_from_line(&format!(
            "{}\t{}\t.\t{}\t{}\t.\t{}\t{}",
            chrom, pos, reference, alt, filter, info
        ))
    }

    /// Breakpoint pairs and connection types as strings.
    fn pairs_of(record: &VcfRecord) -> Result<Vec<(String, String)>, anyhow::Error> {
        let patterns = Patterns::new()?;
        Ok(breakpoints_from_record(record, &patterns)?
            .into_iter()
            .map(|pair| {
                let ct = pair
                    .connection_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_else(|| String::from("."));
                (pair.to_string(), ct)
            })
            .collect())
    }

    fn expected(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(pair, ct)| (pair.to_string(), ct.to_string()))
            .collect()
    }

    #[rstest::rstest]
    #[case("1", 100, "N", "<DEL>", "PASS", "SVTYPE=DEL;END=500", &[("(1,100)-(1,500,+R)", "3to5")])]
    #[case("chr1", 100, "N", "<DEL>", "PASS", "END=500", &[("(1,100)-(1,500,+R)", "3to5")])]
    #[case(
        "1", 100, "N", "<INV>", "PASS", "SVTYPE=INV;END=200",
        &[("(1,100)-(1,199,-L)", "3to3"), ("(1,101,+R)-(1,200,-R)", "5to5")]
    )]
    #[case(
        "1", 100, "N", "<DEL>", "PASS", "SVTYPE=DEL;SVCLASS=inversion;END=200",
        &[("(1,100)-(1,199,-L)", "3to3"), ("(1,101,+R)-(1,200,-R)", "5to5")]
    )]
    #[case("1", 100, "N", "<DUP>", "PASS", "END=500", &[("(1,100,+R)-(1,500)", "5to3")])]
    #[case(
        "1",
        500,
        "N",
        "<DUP:TANDEM>",
        ".",
        "END=100;CT=3to5",
        &[("(1,100,+R)-(1,500)", "5to3")]
    )]
    #[case("1", 100, "N", "<CNV>", ".", "END=500", &[("(1,100)-(1,500,+R)", "3to5")])]
    #[case("1", 100, "N", "<INS>", ".", ".", &[("(1,100)-(1,101,+R)", "3to5")])]
    #[case("1", 100, "N", "<INS:ME:L1>", ".", "SVTYPE=INS", &[("(1,100)-(1,101,+R)", "3to5")])]
    #[case("1", 100, "N", "<CN0>", ".", "END=500", &[("(1,100)-(1,500,+R)", "3to5")])]
    fn symbolic_alleles(
        #[case] chrom: &str,
        #[case] pos: i64,
        #[case] reference: &str,
        #[case] alt: &str,
        #[case] filter: &str,
        #[case] info: &str,
        #[case] pairs: &[(&str, &str)],
    ) -> Result<(), anyhow::Error> {
        assert_eq!(
            pairs_of(&record(chrom, pos, reference, alt, filter, info))?,
            expected(pairs)
        );
        Ok(())
    }

    #[rstest::rstest]
    #[case("2", 5000, "N", "N[3:1200[", &[("(2,5000)-(3,1200,+R)", "3to5")])]
    #[case("2", 321682, "T", "]13:123456]T", &[("(2,321682,+R)-(13,123456)", "5to3")])]
    #[case("13", 123456, "C", "C[2:321682[", &[("(2,321682,+R)-(13,123456)", "5to3")])]
    #[case("2", 321682, "A", "[17:198983[A", &[("(2,321682,+R)-(17,198983,-R)", "5to5")])]
    #[case("13", 500, "N", "N]2:100]", &[("(2,100)-(13,500,-L)", "3to3")])]
    #[case("2", 100, "N", "N]chr13:500]", &[("(2,100)-(13,500,-L)", "3to3")])]
    fn breakend_alleles(
        #[case] chrom: &str,
        #[case] pos: i64,
        #[case] reference: &str,
        #[case] alt: &str,
        #[case] pairs: &[(&str, &str)],
    ) -> Result<(), anyhow::Error> {
        assert_eq!(
            pairs_of(&record(chrom, pos, reference, alt, "PASS", "SVTYPE=BND"))?,
            expected(pairs)
        );
        Ok(())
    }

    #[rstest::rstest]
    #[case("N", "N.", ".", ".", "(1,100,+R)-.")]
    #[case("N", ".N", ".", ".", "(1,100)-.")]
    #[case("N", "<BND>", "LOOSEEND", "SVTYPE=BND", "(1,100,+R)-.")]
    #[case("N", "<BND>", "q10;looseEnd", "CT=3to5", "(1,100)-.")]
    #[case("N", ".", ".", ".", "(1,100)-.")]
    fn looseends(
        #[case] reference: &str,
        #[case] alt: &str,
        #[case] filter: &str,
        #[case] info: &str,
        #[case] pair: &str,
    ) -> Result<(), anyhow::Error> {
        let patterns = Patterns::new()?;
        let record = record("1", 100, reference, alt, filter, info);
        let pairs = breakpoints_from_record(&record, &patterns)?;

        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].is_loose());
        assert_eq!(pairs[0].connection_type(), None);
        assert_eq!(pairs[0].to_string(), pair);
        Ok(())
    }

    #[test]
    fn no_alternates() -> Result<(), anyhow::Error> {
        let record = record("chr1", 100, "N", ".", ".", ".");
        assert!(record.alternates.is_empty());
        assert_eq!(pairs_of(&record)?, expected(&[("(1,100)-.", ".")]));
        let patterns = Patterns::new()?;
        let pairs = breakpoints_from_record(&record, &patterns)?;
        insta::assert_snapshot!(pairs[0].first, @"(1,100)");
        Ok(())
    }

    #[rstest::rstest]
    #[case("A", "ACGT", ".", &[("(1,100)-(1,101,+R)", "3to5")])]
    #[case("ACGT", "A", ".", &[("(1,100)-(1,104,+R)", "3to5")])]
    #[case("A", "G", ".", &[("(1,100)-(1,101,+R)", "3to5")])]
    #[case("N", "N", "SVCLASS=deletion;END=300", &[("(1,100)-(1,300,+R)", "3to5")])]
    #[case("N", "N", "SVTYPE=DUP;SVCLASS=inversion;END=200", &[
        ("(1,100)-(1,199,-L)", "3to3"),
        ("(1,101,+R)-(1,200,-R)", "5to5"),
    ])]
    #[case("N", "N", "SVCLASS=inter_chr;CHR2=chr5;END=50", &[("(1,100)-(5,50,+R)", "3to5")])]
    #[case(
        "N",
        "N",
        "SVCLASS=long_range;CHR2=5;END=50;CT=5to5",
        &[("(1,100,+R)-(5,50,-R)", "5to5")]
    )]
    fn fallbacks_and_info(
        #[case] reference: &str,
        #[case] alt: &str,
        #[case] info: &str,
        #[case] pairs: &[(&str, &str)],
    ) -> Result<(), anyhow::Error> {
        assert_eq!(
            pairs_of(&record("chr1", 100, reference, alt, ".", info))?,
            expected(pairs)
        );
        Ok(())
    }

    #[rstest::rstest]
    #[case("NNN", '[', "", "N", ConnectionType::ThreeToFive, 2)]
    #[case("", '[', "A", "A", ConnectionType::FiveToFive, 0)]
    #[case("TT", ']', "", "T", ConnectionType::ThreeToThree, 1)]
    #[case("", ']', "ACG", "A", ConnectionType::FiveToThree, 2)]
    fn breakend_connection_length(
        #[case] prefix: &str,
        #[case] delim: char,
        #[case] suffix: &str,
        #[case] reference: &str,
        #[case] connection_type: ConnectionType,
        #[case] inserted: i64,
    ) {
        assert_eq!(
            breakend_connection(prefix, delim, suffix, reference),
            (connection_type, inserted)
        );
    }

    #[rstest::rstest]
    #[case("N", "NNN[3:100[", ".", Some(2), ConnectionType::ThreeToFive)]
    #[case("A", "[3:100[A", ".", Some(0), ConnectionType::FiveToFive)]
    #[case("A", "]3:100]ACG", ".", Some(2), ConnectionType::FiveToThree)]
    #[case("N", "NNN[3:100[", "SVLEN=-50", Some(-50), ConnectionType::ThreeToFive)]
    fn breakend_inserted_length(
        #[case] reference: &str,
        #[case] alt: &str,
        #[case] info: &str,
        #[case] sv_len: Option<i64>,
        #[case] connection_type: ConnectionType,
    ) -> Result<(), anyhow::Error> {
        let patterns = Patterns::new()?;
        let record = record("2", 500, reference, alt, "PASS", info);
        let hints = SvHints::from_info(&record.info)?;
        let allele = patterns.classify_alt(alt, reference)?;

        let resolved = ResolvedSv::resolve("2", 500, reference, alt, &allele, &hints, false);

        assert_eq!(resolved.sv_len, sv_len);
        assert_eq!(resolved.connection_type, Some(connection_type));
        assert_eq!(resolved.mate_chrom.as_deref(), Some("3"));
        assert_eq!(resolved.mate_pos, Some(100));
        Ok(())
    }

    #[test]
    fn multiple_alternates() -> Result<(), anyhow::Error> {
        assert_eq!(
            pairs_of(&record("1", 100, "N", "<DEL>,<DUP>", ".", "END=500"))?,
            expected(&[("(1,100)-(1,500,+R)", "3to5"), ("(1,100,+R)-(1,500)", "5to3")])
        );
        Ok(())
    }

    #[test]
    fn broken_records() -> Result<(), anyhow::Error> {
        let patterns = Patterns::new()?;
        let error_of = |record: VcfRecord| {
            breakpoints_from_record(&record, &patterns)
                .err()
                .and_then(|e| e.downcast_ref::<BreakpointError>().cloned())
        };

        assert_eq!(
            error_of(record("1", 100, "N", "<DEL>", ".", "CHR2=3;END=500")),
            Some(BreakpointError::MateOnOtherChromosome {
                sv_type: String::from("DEL"),
                chrom: String::from("1"),
                mate_chrom: Some(String::from("3")),
            })
        );
        assert_eq!(
            error_of(record("1", 100, "N", "<DEL>", ".", ".")),
            Some(BreakpointError::MissingMatePosition {
                sv_type: String::from("DEL"),
                chrom: String::from("1"),
                pos: 100,
            })
        );
        assert_eq!(
            error_of(record("1", 100, "N", "N[3:100]", ".", ".")),
            Some(BreakpointError::MismatchedDelimiters(String::from("N[3:100]")))
        );
        assert_eq!(
            error_of(record("1", 100, "A", "A[3:100[A", ".", ".")),
            Some(BreakpointError::SequenceOnBothSides(String::from("A[3:100[A")))
        );
        let mut end_not_a_number = record("1", 100, "N", "<DEL>", ".", ".");
        end_not_a_number.info.insert("END", vec![String::from("x")]);
        assert!(breakpoints_from_record(&end_not_a_number, &patterns).is_err());

        Ok(())
    }

    #[test]
    fn classify_alt() -> Result<(), anyhow::Error> {
        let patterns = Patterns::new()?;

        assert_eq!(patterns.classify_alt(".", "A")?, AltAllele::Null);
        assert_eq!(
            patterns.classify_alt("<DUP:TANDEM>", "A")?,
            AltAllele::Symbolic("DUP:TANDEM")
        );
        assert_eq!(
            patterns.classify_alt("<INS:ME:L1>", "A")?,
            AltAllele::Symbolic("INS:ME:L1")
        );
        assert_eq!(patterns.classify_alt("<CN0>", "A")?, AltAllele::Symbolic("CN0"));
        assert_eq!(
            patterns.classify_alt("G]17:198982]", "G")?,
            AltAllele::Breakend {
                prefix: "G",
                delim: ']',
                mate_chrom: "17",
                mate_pos: 198982,
                suffix: "",
            }
        );
        assert_eq!(patterns.classify_alt("A.", "A")?, AltAllele::LooseEnd { joined_after: true });
        assert_eq!(patterns.classify_alt(".A", "A")?, AltAllele::LooseEnd { joined_after: false });
        assert_eq!(patterns.classify_alt("C.", "A")?, AltAllele::Plain("C."));
        assert_eq!(patterns.classify_alt("ACGT", "A")?, AltAllele::Plain("ACGT"));

        assert!(patterns.classify_alt("<DEL>", "A")?.is_structural());
        assert!(patterns.classify_alt("A.", "A")?.is_structural());
        assert!(!patterns.classify_alt("ACGT", "A")?.is_structural());
        assert!(!patterns.classify_alt(".", "A")?.is_structural());

        Ok(())
    }

    #[test]
    fn sv_type_names() {
        assert_eq!("tandem_dup".parse::<SvType>(), Ok(SvType::DupTandem));
        assert_eq!("DEL:ME:ALU".parse::<SvType>(), Ok(SvType::DelMeAlu));
        assert_eq!(SvType::DupTandem.to_string(), "DUP:TANDEM");
        assert_eq!("CNV".parse::<SvType>().map(|t| t.to_string()), Ok(String::from("CNV")));
    }

    #[rstest::rstest]
    #[case(ConnectionType::ThreeToFive, "3to5")]
    #[case(ConnectionType::FiveToThree, "5to3")]
    #[case(ConnectionType::FiveToFive, "5to5")]
    #[case(ConnectionType::ThreeToThree, "3to3")]
    fn connection_types(#[case] ct: ConnectionType, #[case] name: &str) {
        assert_eq!(ct.to_string(), name);
        assert_eq!(name.parse::<ConnectionType>().ok(), Some(ct));
        let (first_right, strand, second_right) = ct.orientation();
        assert_eq!(
            ConnectionType::from_orientation(first_right, strand, second_right),
            Some(ct)
        );
    }

    #[rstest::rstest]
    #[case(Location::new("1", 100), Location::with_orientation("1", 500, Strand::Forward, true))]
    #[case(
        Location::new("13", 500),
        Location::with_orientation("2", 100, Strand::Reverse, false)
    )]
    #[case(
        Location::with_orientation("X", 10, Strand::Reverse, true),
        Location::with_orientation("X", 10, Strand::Forward, false)
    )]
    #[case(
        Location::with_orientation("5", 7, Strand::Reverse, true),
        Location::with_orientation("5", 7, Strand::Reverse, false)
    )]
    fn order_breakpoints_is_canonical(#[case] a: Location, #[case] b: Location) {
        let show = |(first, second): (Location, Location)| format!("{}-{}", first, second);

        let forward = order_breakpoints(a.clone(), b.clone());
        let backward = order_breakpoints(b, a);
        assert_eq!(show(forward.clone()), show(backward));
        assert!(forward.0 <= forward.1);
        assert!(!forward.0.is_reverse());

        let again = order_breakpoints(forward.0.clone(), forward.1.clone());
        assert_eq!(show(again), show(forward));
    }
}
